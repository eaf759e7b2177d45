//! In-process publish/subscribe on top of [`Sublist`](crate::Sublist).
//!
//! Handlers run synchronously on the publishing thread. Every plain
//! subscriber receives each matching message; each queue group receives it
//! once, delivered to a randomly chosen member.

pub mod handle;
pub mod handler;
pub mod options;
pub mod pub_sub;

pub use handle::{ChannelSubscription, SubscriptionHandle};
pub use handler::Handler;
pub use options::SubscribeOptions;
pub use pub_sub::PubSub;

pub use crate::subject::validation::{
	is_valid_publish_subject as is_valid_subject, is_valid_token,
};
