use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::seq::SliceRandom;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, trace, warn};

use super::handle::{ChannelSubscription, SubscriptionHandle};
use super::handler::Handler;
use super::options::SubscribeOptions;
use crate::routing::{
	ConfigError, MatchResult, Sublist, SublistConfig, SublistResult,
	Subscription,
};

/// Publish/subscribe hub for messages of type `M`.
pub struct PubSub<M> {
	subs: Arc<Sublist<Handler<M>>>,
	next_id: AtomicU64,
}

impl<M: 'static> Default for PubSub<M> {
	fn default() -> Self {
		Self::from_sublist(Sublist::new())
	}
}

impl<M> std::fmt::Debug for PubSub<M> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PubSub")
			.field("subs", &self.subs)
			.field("next_id", &self.next_id)
			.finish()
	}
}

impl<M: 'static> PubSub<M> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: SublistConfig) -> Result<Self, ConfigError> {
		Ok(Self::from_sublist(Sublist::with_config(config)?))
	}

	fn from_sublist(sublist: Sublist<Handler<M>>) -> Self {
		Self {
			subs: Arc::new(sublist),
			next_id: AtomicU64::new(0),
		}
	}

	/// Underlying subscription index.
	pub fn sublist(&self) -> &Sublist<Handler<M>> {
		&self.subs
	}

	/// Subscribes `handler` to a subject pattern.
	#[track_caller]
	pub fn subscribe<F>(
		&self,
		subject: &str,
		handler: F,
	) -> SublistResult<SubscriptionHandle<M>>
	where
		F: Fn(&str, &M) + Send + Sync + 'static,
	{
		self.subscribe_with(subject, SubscribeOptions::default(), handler)
	}

	#[track_caller]
	pub fn subscribe_with<F>(
		&self,
		subject: &str,
		options: SubscribeOptions,
		handler: F,
	) -> SublistResult<SubscriptionHandle<M>>
	where
		F: Fn(&str, &M) + Send + Sync + 'static,
	{
		self.register(subject, options, Handler::plain(handler))
	}

	/// Subscribes a handler that also receives the full match result of
	/// every message it is handed.
	#[track_caller]
	pub fn debug_subscribe<F>(
		&self,
		subject: &str,
		options: SubscribeOptions,
		handler: F,
	) -> SublistResult<SubscriptionHandle<M>>
	where
		F: Fn(&str, &M, &MatchResult<Handler<M>>) + Send + Sync + 'static,
	{
		self.register(subject, options, Handler::debug(handler))
	}

	/// Subscribes a bounded channel of `buffer` messages (at least one).
	#[track_caller]
	pub fn subscribe_channel(
		&self,
		subject: &str,
		options: SubscribeOptions,
		buffer: usize,
	) -> SublistResult<ChannelSubscription<M>>
	where
		M: Clone + Send,
	{
		let (tx, rx) = mpsc::channel(buffer.max(1));
		let handle =
			self.subscribe_with(subject, options, move |subject: &str, message: &M| {
				match tx.try_send((subject.to_string(), message.clone())) {
					| Ok(()) => {}
					| Err(TrySendError::Full(_)) => {
						warn!(subject, "Channel subscriber is full, dropping message");
					}
					| Err(TrySendError::Closed(_)) => {
						trace!(subject, "Channel subscriber closed");
					}
				}
			})?;
		Ok(ChannelSubscription::new(rx, handle))
	}

	#[track_caller]
	fn register(
		&self,
		subject: &str,
		options: SubscribeOptions,
		handler: Handler<M>,
	) -> SublistResult<SubscriptionHandle<M>> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let debug = handler.is_debug();
		let mut subscription = Subscription::new(subject, handler)
			.with_id(id.to_string())
			.with_debug(debug);
		if let Some(queue) = options.queue {
			subscription = subscription.with_queue(queue);
		}

		let subscription = self.subs.insert(subscription)?;
		debug!(
			subscription_id = id,
			subject,
			location = %subscription.location(),
			"Handler subscribed"
		);
		Ok(SubscriptionHandle::new(Arc::downgrade(&self.subs), subscription))
	}

	/// Delivers `message` to every plain subscriber of `subject` and to one
	/// random member of each matching queue group. Returns the number of
	/// handlers invoked; a malformed subject reaches nobody.
	pub fn publish(&self, subject: &str, message: &M) -> usize {
		let matches = self.subs.match_subject(subject);
		let mut delivered = 0;

		for subscription in matches.plain() {
			subscription.payload().invoke(subject, message, &matches);
			delivered += 1;
		}

		if !matches.groups().is_empty() {
			let mut rng = rand::thread_rng();
			for members in matches.groups().values() {
				if let Some(subscription) = members.choose(&mut rng) {
					subscription.payload().invoke(subject, message, &matches);
					delivered += 1;
				}
			}
		}

		trace!(subject, delivered, "Message published");
		delivered
	}
}
