use std::sync::{Arc, Weak};

use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, warn};

use super::handler::Handler;
use crate::routing::{Sublist, SublistResult, Subscription};

/// Registration of a handler in a [`PubSub`](super::PubSub).
///
/// Dropping the handle unsubscribes; use [`detach`](Self::detach) to keep
/// the subscription for the lifetime of the `PubSub`.
#[derive(Debug)]
pub struct SubscriptionHandle<M> {
	sublist: Weak<Sublist<Handler<M>>>,
	subscription: Arc<Subscription<Handler<M>>>,
	active: bool,
}

impl<M> SubscriptionHandle<M> {
	pub(crate) fn new(
		sublist: Weak<Sublist<Handler<M>>>,
		subscription: Arc<Subscription<Handler<M>>>,
	) -> Self {
		Self {
			sublist,
			subscription,
			active: true,
		}
	}

	/// Subscription id, unique within its `PubSub`.
	pub fn id(&self) -> &str {
		self.subscription.id()
	}

	pub fn subject(&self) -> &str {
		self.subscription.subject()
	}

	pub fn queue(&self) -> Option<&str> {
		self.subscription.queue()
	}

	pub fn subscription(&self) -> &Subscription<Handler<M>> {
		&self.subscription
	}

	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Removes the subscription. Calling it again, or after the `PubSub` is
	/// gone, is a no-op.
	pub fn unsubscribe(&mut self) -> SublistResult<()> {
		if !std::mem::take(&mut self.active) {
			return Ok(());
		}
		let Some(sublist) = self.sublist.upgrade() else {
			return Ok(());
		};
		match sublist.remove(&self.subscription) {
			| Ok(_) => Ok(()),
			| Err(err) if err.is_not_found() => Ok(()),
			| Err(err) => Err(err),
		}
	}

	/// Keeps the subscription registered after the handle is dropped.
	pub fn detach(mut self) {
		self.active = false;
	}
}

impl<M> Drop for SubscriptionHandle<M> {
	fn drop(&mut self) {
		if !self.active {
			return;
		}
		match self.unsubscribe() {
			| Ok(()) => {
				debug!(
					subscription_id = self.id(),
					subject = self.subject(),
					"Subscription unsubscribed in Drop"
				);
			}
			| Err(err) => {
				warn!(
					subscription_id = self.id(),
					error = %err,
					"Failed to unsubscribe in Drop"
				);
			}
		}
	}
}

/// Subscription delivering messages into a bounded channel.
///
/// Publishing never blocks: a message arriving while the channel is full is
/// dropped. Unsubscribing closes the channel after the buffered messages.
#[derive(Debug)]
pub struct ChannelSubscription<M> {
	receiver: Receiver<(String, M)>,
	handle: SubscriptionHandle<M>,
}

impl<M> ChannelSubscription<M> {
	pub(crate) fn new(
		receiver: Receiver<(String, M)>,
		handle: SubscriptionHandle<M>,
	) -> Self {
		Self { receiver, handle }
	}

	/// Receives the next `(subject, message)` pair.
	///
	/// Returns `None` once unsubscribed and drained.
	pub async fn recv(&mut self) -> Option<(String, M)> {
		self.receiver.recv().await
	}

	pub fn try_recv(&mut self) -> Option<(String, M)> {
		match self.receiver.try_recv() {
			| Ok(item) => Some(item),
			| Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
		}
	}

	pub fn handle(&self) -> &SubscriptionHandle<M> {
		&self.handle
	}

	pub fn unsubscribe(&mut self) -> SublistResult<()> {
		self.receiver.close();
		self.handle.unsubscribe()
	}
}
