//! Subject handling module
//!
//! This module provides the token codec for dot-delimited subjects:
//! splitting published subjects into tokens, parsing wildcard patterns,
//! and the validity predicates built on top of them.

// Submodules
pub mod error;
pub mod subject_pattern;
pub mod subject_token;
pub mod tokenizer;

#[cfg(test)]
mod subject_pattern_tests;
#[cfg(test)]
mod subject_token_tests;

// Re-export commonly used types for convenience
pub use error::{SubjectError, SubjectResult, validation};
pub use subject_pattern::SubjectPattern;
pub use subject_token::SubjectToken;
pub use tokenizer::{TOKEN_SEPARATOR, Tokens, tokenize};
