//! Subscription routing: the trie store, match engine, result cache and
//! the [`Sublist`] facade that ties them together.

pub mod config;
pub mod error;
pub mod match_result;
mod result_cache;
pub mod sublist;
pub mod subscription;
mod trie;


pub use config::{ConfigError, SublistConfig};
pub use error::{SublistError, SublistResult};
pub use match_result::MatchResult;
pub use sublist::{Sublist, SublistStats};
pub use subscription::Subscription;
