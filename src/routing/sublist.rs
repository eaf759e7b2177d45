use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use arcstr::ArcStr;
use tracing::{debug, trace};

use super::config::{ConfigError, SublistConfig};
use super::error::SublistResult;
use super::match_result::MatchResult;
use super::result_cache::ResultCache;
use super::subscription::Subscription;
use super::trie::SubjectTrie;
use crate::subject::{SubjectPattern, tokenize, validation};

/// Snapshot of sublist counters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SublistStats {
	pub subscriptions: usize,
	pub cache_entries: usize,
	pub inserts: u64,
	pub removes: u64,
	pub matches: u64,
	pub cache_hits: u64,
	pub cache_hit_rate: f64,
	/// Largest cached result size
	pub max_fanout: usize,
	/// Mean cached result size
	pub avg_fanout: f64,
}

/// Subject-based subscription index.
///
/// The trie sits behind one reader-writer lock: [`insert`](Self::insert) and
/// [`remove`](Self::remove) take it exclusively,
/// [`match_subject`](Self::match_subject) takes it shared, so lookups run in
/// parallel. The result cache has its own mutex and is only touched while
/// the shared trie lock is held, so every cached result reflects one complete
/// trie generation.
pub struct Sublist<T> {
	trie: RwLock<SubjectTrie<T>>,
	cache: Mutex<ResultCache<T>>,
	config: SublistConfig,
	inserts: AtomicU64,
	removes: AtomicU64,
	matches: AtomicU64,
	cache_hits: AtomicU64,
}

impl<T> Default for Sublist<T> {
	fn default() -> Self {
		Self::from_valid_config(SublistConfig::default())
	}
}

impl<T> std::fmt::Debug for Sublist<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Sublist")
			.field("config", &self.config)
			.field("subscriptions", &self.len())
			.field("cache_entries", &self.cache_len())
			.finish()
	}
}

impl<T> Sublist<T> {
	/// Creates a sublist with the default configuration and a result cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a sublist without a result cache.
	pub fn without_cache() -> Self {
		Self::from_valid_config(SublistConfig::without_cache())
	}

	/// Creates a sublist from `config`, rejecting inconsistent cache bounds.
	pub fn with_config(config: SublistConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::from_valid_config(config))
	}

	fn from_valid_config(config: SublistConfig) -> Self {
		Self {
			trie: RwLock::new(SubjectTrie::new(config.fast_subtree_threshold)),
			cache: Mutex::new(ResultCache::new(
				config.cache_capacity,
				config.cache_sweep_to,
			)),
			config,
			inserts: AtomicU64::new(0),
			removes: AtomicU64::new(0),
			matches: AtomicU64::new(0),
			cache_hits: AtomicU64::new(0),
		}
	}

	pub fn config(&self) -> &SublistConfig {
		&self.config
	}

	fn lock_cache(&self) -> MutexGuard<'_, ResultCache<T>> {
		self.cache.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Registers a subscription and returns the shared handle stored in the
	/// index.
	///
	/// Fails with `MalformedSubject` if the subscription's pattern is invalid.
	/// Inserting an equal subscription twice registers it twice.
	pub fn insert(
		&self,
		subscription: Subscription<T>,
	) -> SublistResult<Arc<Subscription<T>>> {
		let pattern = SubjectPattern::parse(subscription.subject())?;
		let subscription = Arc::new(subscription);

		let mut trie = self.trie.write().unwrap_or_else(PoisonError::into_inner);
		trie.insert(&pattern, Arc::clone(&subscription));
		self.inserts.fetch_add(1, Ordering::Relaxed);
		debug!(
			subject = %pattern,
			queue = ?subscription.queue(),
			id = subscription.id(),
			generation = trie.generation(),
			"Subscription inserted"
		);
		Ok(subscription)
	}

	/// Removes the first registered subscription equal to `subscription`.
	///
	/// Fails with `NotFound` when none is registered, leaving the index
	/// untouched. Idempotent unsubscribe should ignore that case, see
	/// [`SublistError::is_not_found`](super::SublistError::is_not_found).
	/// A successful removal also clears the result cache.
	pub fn remove(
		&self,
		subscription: &Subscription<T>,
	) -> SublistResult<Arc<Subscription<T>>>
	where
		T: PartialEq,
	{
		let pattern = SubjectPattern::parse(subscription.subject())?;

		let mut trie = self.trie.write().unwrap_or_else(PoisonError::into_inner);
		let removed = trie.remove(&pattern, subscription)?;
		// Cached results still hold the removed subscription
		self.lock_cache().clear();
		self.removes.fetch_add(1, Ordering::Relaxed);
		debug!(
			subject = %pattern,
			queue = ?subscription.queue(),
			id = subscription.id(),
			generation = trie.generation(),
			"Subscription removed"
		);
		Ok(removed)
	}

	/// Removes several subscriptions under one write lock.
	///
	/// Subscriptions that are not registered are skipped. Returns the number
	/// removed; fails before removing anything if any subject is malformed.
	pub fn remove_batch(
		&self,
		subscriptions: &[Subscription<T>],
	) -> SublistResult<usize>
	where
		T: PartialEq,
	{
		let patterns = subscriptions
			.iter()
			.map(|sub| SubjectPattern::parse(sub.subject()))
			.collect::<Result<Vec<_>, _>>()?;

		let mut trie = self.trie.write().unwrap_or_else(PoisonError::into_inner);
		let mut removed = 0;
		for (pattern, subscription) in patterns.iter().zip(subscriptions) {
			match trie.remove(pattern, subscription) {
				| Ok(_) => removed += 1,
				| Err(err) if err.is_not_found() => {
					trace!(subject = %pattern, "Skipping unregistered subscription");
				}
				| Err(err) => return Err(err),
			}
		}
		if removed > 0 {
			self.lock_cache().clear();
		}
		self.removes.fetch_add(removed as u64, Ordering::Relaxed);
		debug!(
			requested = subscriptions.len(),
			removed,
			generation = trie.generation(),
			"Batch removal finished"
		);
		Ok(removed)
	}

	/// Returns every subscription matching a published subject.
	///
	/// A malformed subject, or one containing wildcards, matches nothing.
	pub fn match_subject(&self, subject: &str) -> Arc<MatchResult<T>> {
		self.matches.fetch_add(1, Ordering::Relaxed);
		let tokens = match tokenize(subject) {
			| Ok(tokens) => tokens,
			| Err(err) => {
				debug!(subject, error = %err, "Ignoring match on malformed subject");
				return Arc::new(MatchResult::default());
			}
		};

		let trie = self.trie.read().unwrap_or_else(PoisonError::into_inner);
		let generation = trie.generation();

		if let Some(result) = self.lock_cache().get(subject, generation) {
			self.cache_hits.fetch_add(1, Ordering::Relaxed);
			trace!(subject, "Match cache hit");
			return result;
		}

		let result = Arc::new(trie.collect_matches(&tokens));
		let mut cache = self.lock_cache();
		if cache.is_enabled() {
			trace!(subject, matches = result.len(), "Match cache miss");
			let evicted =
				cache.insert(ArcStr::from(subject), generation, Arc::clone(&result));
			if evicted > 0 {
				debug!(evicted, remaining = cache.len(), "Match cache swept");
			}
		}
		result
	}

	/// Number of registered subscriptions.
	pub fn len(&self) -> usize {
		self.trie
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Live trie nodes, the root included. A freshly created sublist has one.
	pub fn node_count(&self) -> usize {
		self.trie
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.node_count()
	}

	/// Number of subscriptions registered exactly on `pattern`, wildcards
	/// compared literally. Malformed patterns have none.
	pub fn pattern_len(&self, pattern: &str) -> usize {
		match SubjectPattern::parse(pattern) {
			| Ok(pattern) => self
				.trie
				.read()
				.unwrap_or_else(PoisonError::into_inner)
				.pattern_len(&pattern),
			| Err(_) => 0,
		}
	}

	/// Every registered subscription, in no particular order.
	pub fn subscriptions(&self) -> Vec<Arc<Subscription<T>>> {
		self.trie
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.subscriptions()
	}

	/// Number of cached match results. Entries made stale by an insert are
	/// counted until swept; removals clear the cache.
	pub fn cache_len(&self) -> usize {
		self.lock_cache().len()
	}

	/// Snapshot of operation counters and cache fan-out.
	pub fn stats(&self) -> SublistStats {
		let subscriptions = self.len();
		let cache = self.lock_cache();
		let (max_fanout, avg_fanout) = cache.fanout();
		let matches = self.matches.load(Ordering::Relaxed);
		let cache_hits = self.cache_hits.load(Ordering::Relaxed);
		SublistStats {
			subscriptions,
			cache_entries: cache.len(),
			inserts: self.inserts.load(Ordering::Relaxed),
			removes: self.removes.load(Ordering::Relaxed),
			matches,
			cache_hits,
			cache_hit_rate: if matches > 0 {
				cache_hits as f64 / matches as f64
			} else {
				0.0
			},
			max_fanout,
			avg_fanout,
		}
	}

	/// Returns true if `subject` can be published to.
	pub fn is_valid_publish_subject(subject: &str) -> bool {
		validation::is_valid_publish_subject(subject)
	}

	/// Returns true if `pattern` can be subscribed to.
	pub fn is_valid_pattern(pattern: &str) -> bool {
		validation::is_valid_pattern(pattern)
	}
}
