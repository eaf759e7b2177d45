//! # Sublist
//!
//! Subject-based publish/subscribe routing. Subscriptions register
//! dot-delimited patterns; a published subject is matched against all of
//! them through a token trie, without scanning unrelated subscriptions.
//!
//! ## Features
//!
//! - **Wildcards**: `*` matches exactly one token, `>` matches one or more
//!   trailing tokens
//! - **Queue groups**: subscriptions sharing a queue name are returned as one
//!   group, so a message can be handed to a single member
//! - **Match cache**: results for hot subjects are cached, bounded, and
//!   invalidated on every mutation
//! - **Concurrency**: lookups share a read lock; mutations are exclusive
//! - **Pub/Sub**: an in-process [`PubSub`] hub with callback, debug and
//!   channel subscribers
//!
//! ## Quick Start
//!
//! ```rust
//! use sublist::{Sublist, Subscription};
//!
//! let sublist = Sublist::new();
//! sublist.insert(Subscription::new("sensors.temperature.room1", "A"))?;
//! sublist.insert(Subscription::new("sensors.temperature.*", "B"))?;
//! sublist.insert(Subscription::new("sensors.>", "C"))?;
//! sublist.insert(Subscription::new("work.>", "W1").with_queue("workers"))?;
//!
//! let result = sublist.match_subject("sensors.temperature.room1");
//! assert_eq!(result.plain_len(), 3);
//!
//! let result = sublist.match_subject("work.task.1");
//! assert_eq!(result.group("workers").map(|g| g.len()), Some(1));
//! # Ok::<(), sublist::SublistError>(())
//! ```
//!
//! ## Pub/Sub
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! use sublist::PubSub;
//!
//! let hub = PubSub::<String>::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&seen);
//! let handle = hub.subscribe("greetings.*", move |_subject, _message| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! })?;
//!
//! assert_eq!(hub.publish("greetings.world", &"hello".to_string()), 1);
//! drop(handle);
//! assert_eq!(hub.publish("greetings.world", &"again".to_string()), 0);
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! # Ok::<(), sublist::SublistError>(())
//! ```

pub mod pubsub;
pub mod routing;
pub mod subject;

// === Core Public API ===
pub use pubsub::{
	ChannelSubscription, Handler, PubSub, SubscribeOptions, SubscriptionHandle,
};
pub use routing::{
	ConfigError, MatchResult, Sublist, SublistConfig, SublistError,
	SublistStats, Subscription,
};
pub use subject::validation::{
	is_valid_pattern, is_valid_publish_subject, is_valid_token,
};
pub use subject::{SubjectError, SubjectPattern, SubjectToken, tokenize};

/// Result type alias for sublist operations
pub type Result<T> = std::result::Result<T, SublistError>;

/// Prelude module for convenient imports
///
/// ```rust
/// use sublist::prelude::*;
/// ```
pub mod prelude {
	pub use crate::{
		MatchResult, PubSub, Result, SubscribeOptions, Sublist, SublistConfig,
		SublistError, Subscription, SubscriptionHandle,
	};
}

/// Error types used throughout the library
///
/// ```rust
/// use sublist::errors::*;
/// ```
pub mod errors {
	pub use crate::routing::{ConfigError, SublistError};
	pub use crate::subject::SubjectError;
}
