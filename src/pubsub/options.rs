/// Per-subscription options for [`PubSub`](super::PubSub)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
	/// Queue group; each published message reaches one member of the group
	pub queue: Option<String>,
}

impl SubscribeOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
		self.queue = Some(queue.into());
		self
	}
}
