//! Bounded subject -> match result cache.
//!
//! Entries are tagged with the trie generation they were computed at and
//! only served while that generation is current. Removals clear it so that
//! unsubscribed payloads are released. When full, the cache drops
//! stale entries and then random ones until it is down to the sweep target;
//! there is no recency bookkeeping on the lookup path.

use std::collections::HashMap;
use std::sync::Arc;

use arcstr::ArcStr;
use rand::seq::IteratorRandom;

use super::match_result::MatchResult;

struct CacheEntry<T> {
	generation: u64,
	result: Arc<MatchResult<T>>,
}

pub(crate) struct ResultCache<T> {
	entries: HashMap<ArcStr, CacheEntry<T>>,
	capacity: usize,
	sweep_to: usize,
}

impl<T> ResultCache<T> {
	/// `sweep_to` must be lower than `capacity`; a zero capacity disables
	/// the cache.
	pub fn new(capacity: usize, sweep_to: usize) -> Self {
		debug_assert!(capacity == 0 || sweep_to < capacity);
		Self {
			entries: HashMap::new(),
			capacity,
			sweep_to,
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_enabled(&self) -> bool {
		self.capacity > 0
	}

	/// Returns the cached result for `subject` if it was computed at
	/// `generation`.
	pub fn get(
		&self,
		subject: &str,
		generation: u64,
	) -> Option<Arc<MatchResult<T>>> {
		self.entries
			.get(subject)
			.filter(|entry| entry.generation == generation)
			.map(|entry| Arc::clone(&entry.result))
	}

	/// Stores a result, sweeping first when the insert would exceed capacity.
	/// Returns the number of evicted entries.
	pub fn insert(
		&mut self,
		subject: ArcStr,
		generation: u64,
		result: Arc<MatchResult<T>>,
	) -> usize {
		if !self.is_enabled() {
			return 0;
		}
		let evicted = if self.entries.len() >= self.capacity
			&& !self.entries.contains_key(&subject)
		{
			self.sweep(generation)
		} else {
			0
		};
		self.entries
			.insert(subject, CacheEntry { generation, result });
		evicted
	}

	/// Drops every entry, releasing the subscriptions they hold.
	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Drops entries from older generations, then random entries until at
	/// most `sweep_to` remain.
	fn sweep(&mut self, generation: u64) -> usize {
		let before = self.entries.len();
		self.entries
			.retain(|_, entry| entry.generation == generation);

		let excess = self.entries.len().saturating_sub(self.sweep_to);
		if excess > 0 {
			let victims = self
				.entries
				.keys()
				.cloned()
				.choose_multiple(&mut rand::thread_rng(), excess);
			for key in victims {
				self.entries.remove(&key);
			}
		}
		before - self.entries.len()
	}

	/// Largest and mean result size over current entries.
	pub fn fanout(&self) -> (usize, f64) {
		if self.entries.is_empty() {
			return (0, 0.0);
		}
		let (max, total) = self
			.entries
			.values()
			.map(|entry| entry.result.len())
			.fold((0, 0), |(max, total), len| (max.max(len), total + len));
		(max, total as f64 / self.entries.len() as f64)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn result() -> Arc<MatchResult<u32>> {
		Arc::new(MatchResult::default())
	}

	#[test]
	fn test_hit_requires_current_generation() {
		let mut cache = ResultCache::new(8, 2);
		cache.insert(ArcStr::from("a.b"), 1, result());

		assert!(cache.get("a.b", 1).is_some());
		assert!(cache.get("a.b", 2).is_none());
		assert!(cache.get("a.c", 1).is_none());
	}

	#[test]
	fn test_sweep_keeps_count_within_capacity() {
		let mut cache = ResultCache::new(8, 2);
		for i in 0 .. 8 {
			assert_eq!(cache.insert(ArcStr::from(format!("s.{i}")), 0, result()), 0);
		}
		assert_eq!(cache.len(), 8);

		let evicted = cache.insert(ArcStr::from("s.new"), 0, result());
		assert_eq!(evicted, 6);
		assert_eq!(cache.len(), 3);
		assert!(cache.get("s.new", 0).is_some());

		for i in 0 .. 100 {
			cache.insert(ArcStr::from(format!("t.{i}")), 0, result());
			assert!(cache.len() <= 8);
		}
	}

	#[test]
	fn test_sweep_drops_stale_entries_first() {
		let mut cache = ResultCache::new(4, 2);
		cache.insert(ArcStr::from("old.1"), 0, result());
		cache.insert(ArcStr::from("old.2"), 0, result());
		cache.insert(ArcStr::from("new.1"), 1, result());
		cache.insert(ArcStr::from("new.2"), 1, result());

		let evicted = cache.insert(ArcStr::from("new.3"), 1, result());
		assert_eq!(evicted, 2);
		assert_eq!(cache.len(), 3);
		assert!(cache.get("new.1", 1).is_some());
		assert!(cache.get("new.2", 1).is_some());
	}

	#[test]
	fn test_replacing_existing_key_does_not_sweep() {
		let mut cache = ResultCache::new(2, 1);
		cache.insert(ArcStr::from("a"), 0, result());
		cache.insert(ArcStr::from("b"), 0, result());
		assert_eq!(cache.insert(ArcStr::from("a"), 1, result()), 0);
		assert_eq!(cache.len(), 2);
	}

	#[test]
	fn test_clear_releases_results() {
		let mut cache = ResultCache::new(8, 2);
		let stored = result();
		cache.insert(ArcStr::from("a"), 0, Arc::clone(&stored));
		assert_eq!(Arc::strong_count(&stored), 2);

		cache.clear();
		assert_eq!(cache.len(), 0);
		assert_eq!(Arc::strong_count(&stored), 1);
	}

	#[test]
	fn test_disabled_cache_stores_nothing() {
		let mut cache = ResultCache::new(0, 0);
		cache.insert(ArcStr::from("a"), 0, result());
		assert_eq!(cache.len(), 0);
		assert!(cache.get("a", 0).is_none());
	}
}
