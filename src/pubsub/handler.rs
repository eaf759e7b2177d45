use std::fmt;
use std::sync::Arc;

use crate::routing::MatchResult;

/// Callback receiving the subject and the message
pub type PlainFn<M> = dyn Fn(&str, &M) + Send + Sync;

/// Callback additionally receiving every subscription the subject matched
pub type DebugFn<M> = dyn Fn(&str, &M, &MatchResult<Handler<M>>) + Send + Sync;

/// Subscription payload of a [`PubSub`](super::PubSub).
///
/// Two handlers are equal only if they share the same callback allocation.
pub enum Handler<M> {
	Plain(Arc<PlainFn<M>>),
	Debug(Arc<DebugFn<M>>),
}

impl<M> Handler<M> {
	pub fn plain<F>(f: F) -> Self
	where F: Fn(&str, &M) + Send + Sync + 'static {
		Self::Plain(Arc::new(f))
	}

	pub fn debug<F>(f: F) -> Self
	where F: Fn(&str, &M, &MatchResult<Handler<M>>) + Send + Sync + 'static {
		Self::Debug(Arc::new(f))
	}

	pub fn is_debug(&self) -> bool {
		matches!(self, Self::Debug(_))
	}

	pub(crate) fn invoke(
		&self,
		subject: &str,
		message: &M,
		matches: &MatchResult<Handler<M>>,
	) {
		match self {
			| Self::Plain(f) => f(subject, message),
			| Self::Debug(f) => f(subject, message, matches),
		}
	}
}

impl<M> Clone for Handler<M> {
	fn clone(&self) -> Self {
		match self {
			| Self::Plain(f) => Self::Plain(Arc::clone(f)),
			| Self::Debug(f) => Self::Debug(Arc::clone(f)),
		}
	}
}

impl<M> PartialEq for Handler<M> {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			| (Self::Plain(a), Self::Plain(b)) => Arc::ptr_eq(a, b),
			| (Self::Debug(a), Self::Debug(b)) => Arc::ptr_eq(a, b),
			| _ => false,
		}
	}
}

impl<M> fmt::Debug for Handler<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			| Self::Plain(_) => write!(f, "Handler::Plain(..)"),
			| Self::Debug(_) => write!(f, "Handler::Debug(..)"),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	#[test]
	fn test_equality_is_by_callback_identity() {
		let first = Handler::<u32>::plain(|_, _| {});
		let second = Handler::<u32>::plain(|_, _| {});

		assert_eq!(first, first.clone());
		assert_ne!(first, second);
		assert_ne!(first, Handler::debug(|_, _, _| {}));
	}

	#[test]
	fn test_invoke_dispatches_on_variant() {
		let calls = Arc::new(AtomicUsize::new(0));
		let plain_calls = Arc::clone(&calls);
		let plain = Handler::plain(move |subject: &str, message: &u32| {
			assert_eq!(subject, "a.b");
			plain_calls.fetch_add(*message as usize, Ordering::SeqCst);
		});
		let debug_calls = Arc::clone(&calls);
		let debug = Handler::debug(move |_: &str, _: &u32, matches: &MatchResult<Handler<u32>>| {
			assert!(matches.is_empty());
			debug_calls.fetch_add(100, Ordering::SeqCst);
		});

		let matches = MatchResult::default();
		plain.invoke("a.b", &5, &matches);
		debug.invoke("a.b", &5, &matches);

		assert_eq!(calls.load(Ordering::SeqCst), 105);
		assert!(debug.is_debug());
		assert!(!plain.is_debug());
	}
}
