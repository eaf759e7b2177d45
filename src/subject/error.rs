//! Error types and validation utilities for the subject module
//!
//! Every variant of [`SubjectError`] describes a malformed subject or
//! pattern. They are always surfaced to the caller, never corrected.

use thiserror::Error;

/// Errors produced while tokenizing a subject or parsing a pattern
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubjectError {
	/// Subject or pattern is the empty string
	#[error("Subject cannot be empty")]
	EmptySubject,

	/// Two consecutive dots, or a leading or trailing dot
	#[error("Subject '{subject}' has an empty token at position {position}")]
	EmptyToken { subject: String, position: usize },

	/// Space, tab, CR or LF inside the subject
	#[error("Subject '{subject}' contains whitespace")]
	Whitespace { subject: String },

	/// Wildcard character mixed with other characters in one token
	#[error("Invalid wildcard usage in token '{token}' at position {position}")]
	WildcardUsage { token: String, position: usize },

	/// `*` or `>` token in a subject used for publishing
	#[error("Published subject '{subject}' cannot contain wildcard '{token}'")]
	WildcardInPublish { subject: String, token: String },

	/// `>` followed by further tokens
	#[error(
		"Invalid pattern '{pattern}': > wildcard can only be the last token"
	)]
	FullWildcardPosition { pattern: String },
}

impl SubjectError {
	/// Creates a new EmptyToken error
	pub fn empty_token(subject: impl Into<String>, position: usize) -> Self {
		Self::EmptyToken {
			subject: subject.into(),
			position,
		}
	}

	/// Creates a new Whitespace error
	pub fn whitespace(subject: impl Into<String>) -> Self {
		Self::Whitespace {
			subject: subject.into(),
		}
	}

	/// Creates a new WildcardUsage error
	pub fn wildcard_usage(token: impl Into<String>, position: usize) -> Self {
		Self::WildcardUsage {
			token: token.into(),
			position,
		}
	}

	/// Creates a new WildcardInPublish error
	pub fn wildcard_in_publish(
		subject: impl Into<String>,
		token: impl Into<String>,
	) -> Self {
		Self::WildcardInPublish {
			subject: subject.into(),
			token: token.into(),
		}
	}

	/// Creates a new FullWildcardPosition error
	pub fn full_wildcard_position(pattern: impl Into<String>) -> Self {
		Self::FullWildcardPosition {
			pattern: pattern.into(),
		}
	}
}

/// Convenient Result type for subject operations
pub type SubjectResult<T> = Result<T, SubjectError>;

/// Validation predicates for caller-side pre-validation
pub mod validation {
	use super::super::subject_pattern::SubjectPattern;
	use super::super::tokenizer::{TOKEN_SEPARATOR, tokenize};

	/// Returns true if `subject` can be published to: non-empty tokens,
	/// no whitespace, no wildcards.
	pub fn is_valid_publish_subject(subject: &str) -> bool {
		tokenize(subject).is_ok()
	}

	/// Returns true if `pattern` can be subscribed to.
	pub fn is_valid_pattern(pattern: &str) -> bool {
		SubjectPattern::parse(pattern).is_ok()
	}

	/// Returns true if `token` is a single valid literal token.
	pub fn is_valid_token(token: &str) -> bool {
		!token.contains(TOKEN_SEPARATOR) && is_valid_publish_subject(token)
	}
}
