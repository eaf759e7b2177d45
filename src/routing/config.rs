//! Construction-time configuration for [`Sublist`](super::Sublist)

use thiserror::Error;

/// Errors for inconsistent [`SublistConfig`] values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
	/// Pruning target must leave room below the high-water mark
	#[error(
		"Cache sweep target {sweep_to} must be lower than cache capacity \
		 {capacity}"
	)]
	SweepTargetTooLarge { capacity: usize, sweep_to: usize },
}

/// Routing and cache tuning
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SublistConfig {
	/// High-water mark of the match result cache; `0` disables caching
	pub cache_capacity: usize,
	/// Entry count the cache is pruned down to once the high-water mark is hit
	pub cache_sweep_to: usize,
	/// Plain subscriber count at which a node keeps a flattened, shared
	/// subscriber list; `0` disables flattening
	pub fast_subtree_threshold: usize,
}

impl Default for SublistConfig {
	fn default() -> Self {
		Self {
			cache_capacity: 1024,
			cache_sweep_to: 256,
			fast_subtree_threshold: 256,
		}
	}
}

impl SublistConfig {
	/// Default configuration with the result cache turned off.
	pub fn without_cache() -> Self {
		Self {
			cache_capacity: 0,
			cache_sweep_to: 0,
			..Self::default()
		}
	}

	/// Sets the cache high-water mark and sweep target.
	pub fn with_cache(mut self, capacity: usize, sweep_to: usize) -> Self {
		self.cache_capacity = capacity;
		self.cache_sweep_to = sweep_to;
		self
	}

	/// Sets the flattening threshold; `0` disables it.
	pub fn with_fast_subtree_threshold(mut self, threshold: usize) -> Self {
		self.fast_subtree_threshold = threshold;
		self
	}

	/// Returns true if match results are cached.
	pub fn cache_enabled(&self) -> bool {
		self.cache_capacity > 0
	}

	/// Checks that the cache bounds are consistent.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.cache_enabled() && self.cache_sweep_to >= self.cache_capacity {
			return Err(ConfigError::SweepTargetTooLarge {
				capacity: self.cache_capacity,
				sweep_to: self.cache_sweep_to,
			});
		}
		Ok(())
	}
}
