use std::collections::HashMap;
use std::sync::Arc;

use arcstr::ArcStr;

use super::subscription::Subscription;

/// One contribution to the plain subscriber list
#[derive(Debug)]
enum PlainEntry<T> {
	One(Arc<Subscription<T>>),
	/// Shared snapshot of a node with many plain subscribers
	Slice(Arc<[Arc<Subscription<T>>]>),
}

impl<T> PlainEntry<T> {
	fn as_slice(&self) -> &[Arc<Subscription<T>>] {
		match self {
			| PlainEntry::One(subscription) => std::slice::from_ref(subscription),
			| PlainEntry::Slice(list) => &list[..],
		}
	}
}

/// Subscriptions matching one published subject.
///
/// Plain subscriptions come in traversal order, whether a node contributed
/// them one by one or as a shared slice. Queue groups are merged by name
/// across all matching patterns and keep insertion order within a pattern.
#[derive(Debug)]
pub struct MatchResult<T> {
	plain: Vec<PlainEntry<T>>,
	groups: HashMap<ArcStr, Vec<Arc<Subscription<T>>>>,
}

impl<T> Default for MatchResult<T> {
	fn default() -> Self {
		Self {
			plain: Vec::new(),
			groups: HashMap::new(),
		}
	}
}

impl<T> MatchResult<T> {
	/// Plain (non-queue) subscriptions.
	pub fn plain(&self) -> impl Iterator<Item = &Arc<Subscription<T>>> {
		self.plain.iter().flat_map(|entry| entry.as_slice().iter())
	}

	/// Number of plain subscriptions.
	pub fn plain_len(&self) -> usize {
		self.plain.iter().map(|entry| entry.as_slice().len()).sum()
	}

	/// Queue groups by name.
	pub fn groups(&self) -> &HashMap<ArcStr, Vec<Arc<Subscription<T>>>> {
		&self.groups
	}

	/// Members of one queue group, if any matched.
	pub fn group(&self, queue: &str) -> Option<&[Arc<Subscription<T>>]> {
		self.groups.get(queue).map(Vec::as_slice)
	}

	/// Total number of matching subscriptions, group members included.
	pub fn len(&self) -> usize {
		self.plain_len() + self.groups.values().map(Vec::len).sum::<usize>()
	}

	/// Returns true if nothing matched.
	pub fn is_empty(&self) -> bool {
		self.plain.is_empty() && self.groups.is_empty()
	}

	pub(crate) fn push_plain(&mut self, subscriptions: &[Arc<Subscription<T>>]) {
		self.plain.extend(
			subscriptions
				.iter()
				.map(|subscription| PlainEntry::One(Arc::clone(subscription))),
		);
	}

	pub(crate) fn push_flattened(&mut self, list: &Arc<[Arc<Subscription<T>>]>) {
		self.plain.push(PlainEntry::Slice(Arc::clone(list)));
	}

	pub(crate) fn push_group(
		&mut self,
		queue: &ArcStr,
		members: &[Arc<Subscription<T>>],
	) {
		self.groups
			.entry(queue.clone())
			.or_default()
			.extend(members.iter().cloned());
	}
}
