use std::fmt::{self, Display};
use std::panic::Location;

use arcstr::ArcStr;

/// A subscription to a subject pattern.
///
/// Two subscriptions are equal when subject, queue, payload and id are equal;
/// that is the identity [`Sublist::remove`](super::Sublist::remove) uses.
/// The recorded caller location and the debug flag take no part in it.
#[derive(Debug, Clone)]
pub struct Subscription<T> {
	subject: ArcStr,
	queue: Option<ArcStr>,
	payload: T,
	id: ArcStr,
	debug: bool,
	location: &'static Location<'static>,
}

impl<T> Subscription<T> {
	/// Creates a plain subscription, recording the caller's source location.
	///
	/// The subject is validated when the subscription is inserted.
	#[track_caller]
	pub fn new(subject: impl Into<ArcStr>, payload: T) -> Self {
		Self {
			subject: subject.into(),
			queue: None,
			payload,
			id: ArcStr::new(),
			debug: false,
			location: Location::caller(),
		}
	}

	/// Places the subscription in a queue group.
	pub fn with_queue(mut self, queue: impl Into<ArcStr>) -> Self {
		self.queue = Some(queue.into());
		self
	}

	/// Sets the subscription id.
	pub fn with_id(mut self, id: impl Into<ArcStr>) -> Self {
		self.id = id.into();
		self
	}

	/// Marks the subscription as a debug subscriber.
	pub fn with_debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}

	/// Overrides the recorded caller location.
	pub fn with_location(mut self, location: &'static Location<'static>) -> Self {
		self.location = location;
		self
	}

	/// Pattern the subscription was registered on.
	pub fn subject(&self) -> &str {
		&self.subject
	}

	/// Queue group name, if any.
	pub fn queue(&self) -> Option<&str> {
		self.queue.as_deref()
	}

	pub(crate) fn queue_name(&self) -> Option<&ArcStr> {
		self.queue.as_ref()
	}

	/// Value carried by the subscription.
	pub fn payload(&self) -> &T {
		&self.payload
	}

	/// Subscription id, empty unless set.
	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn is_debug(&self) -> bool {
		self.debug
	}

	/// Source location the subscription was created from.
	pub fn location(&self) -> &'static Location<'static> {
		self.location
	}
}

impl<T: PartialEq> PartialEq for Subscription<T> {
	fn eq(&self, other: &Self) -> bool {
		self.subject == other.subject
			&& self.queue == other.queue
			&& self.payload == other.payload
			&& self.id == other.id
	}
}

impl<T: Eq> Eq for Subscription<T> {}

impl<T> Display for Subscription<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Subscription({}", self.subject)?;
		if let Some(queue) = &self.queue {
			write!(f, ", queue: {queue}")?;
		}
		if !self.id.is_empty() {
			write!(f, ", id: {}", self.id)?;
		}
		write!(f, ") at {}:{}", self.location.file(), self.location.line())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_identity_ignores_location_and_debug() {
		let first = Subscription::new("a.b", 1).with_id("7");
		let second = Subscription::new("a.b", 1).with_id("7").with_debug(true);

		assert_ne!(first.location().line(), second.location().line());
		assert_eq!(first, second);
	}

	#[test]
	fn test_identity_covers_queue_payload_and_id() {
		let base = Subscription::new("a.b", 1);

		assert_ne!(base, Subscription::new("a.b", 2));
		assert_ne!(base, Subscription::new("a.c", 1));
		assert_ne!(base, Subscription::new("a.b", 1).with_queue("q"));
		assert_ne!(base, Subscription::new("a.b", 1).with_id("1"));
	}

	#[test]
	fn test_records_caller_location() {
		let sub = Subscription::new("a", ());
		assert!(sub.location().file().ends_with("subscription.rs"));
		assert!(sub.to_string().starts_with("Subscription(a) at "));
	}
}
