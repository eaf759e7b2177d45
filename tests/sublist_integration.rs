//! Integration tests for the subscription index
//!
//! Checks the trie against the single-pattern reference matcher over
//! randomly generated patterns and subjects, and exercises the cache from
//! several threads.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sublist::{
	SubjectPattern, Sublist, SublistConfig, Subscription, is_valid_pattern,
	is_valid_publish_subject, tokenize,
};

const ALPHABET: [&str; 4] = ["a", "b", "c", "d"];

fn random_pattern(rng: &mut StdRng) -> String {
	let len = rng.gen_range(1 ..= 4);
	let mut tokens = Vec::with_capacity(len);
	for position in 0 .. len {
		let roll = rng.gen_range(0 .. 10);
		let token = match roll {
			| 0 | 1 => "*",
			| 2 if position == len - 1 => ">",
			| _ => ALPHABET[rng.gen_range(0 .. ALPHABET.len())],
		};
		tokens.push(token);
	}
	tokens.join(".")
}

fn random_subject(rng: &mut StdRng) -> String {
	let len = rng.gen_range(1 ..= 5);
	(0 .. len)
		.map(|_| ALPHABET[rng.gen_range(0 .. ALPHABET.len())])
		.collect::<Vec<_>>()
		.join(".")
}

fn check_agreement(config: SublistConfig, seed: u64) {
	let mut rng = StdRng::seed_from_u64(seed);
	let sublist = Sublist::with_config(config).unwrap();
	let mut registered: Vec<(SubjectPattern, usize)> = Vec::new();

	for id in 0 .. 200 {
		let pattern = random_pattern(&mut rng);
		assert!(is_valid_pattern(&pattern), "{pattern}");
		sublist.insert(Subscription::new(pattern.as_str(), id)).unwrap();
		registered.push((SubjectPattern::parse(pattern.as_str()).unwrap(), id));
	}

	// Remove a third of them again
	let mut kept = Vec::new();
	for (pattern, id) in registered {
		if id % 3 == 0 {
			sublist
				.remove(&Subscription::new(pattern.as_str(), id))
				.unwrap();
		} else {
			kept.push((pattern, id));
		}
	}
	assert_eq!(sublist.len(), kept.len());

	for _ in 0 .. 300 {
		let subject = random_subject(&mut rng);
		assert!(is_valid_publish_subject(&subject));
		let tokens = tokenize(&subject).unwrap();

		let expected: HashSet<usize> = kept
			.iter()
			.filter(|(pattern, _)| pattern.matches(&tokens))
			.map(|(_, id)| *id)
			.collect();
		let result = sublist.match_subject(&subject);
		let actual: Vec<usize> = result.plain().map(|s| *s.payload()).collect();

		assert_eq!(actual.len(), expected.len(), "duplicates for {subject}");
		assert_eq!(
			actual.into_iter().collect::<HashSet<_>>(),
			expected,
			"subject {subject}"
		);
	}
}

#[test]
fn test_trie_agrees_with_reference_matcher() {
	for seed in 0 .. 5 {
		check_agreement(SublistConfig::default(), seed);
	}
}

#[test]
fn test_trie_agrees_without_cache_and_with_flattening() {
	for seed in 10 .. 13 {
		check_agreement(SublistConfig::without_cache(), seed);
		check_agreement(
			SublistConfig::default()
				.with_cache(8, 2)
				.with_fast_subtree_threshold(2),
			seed,
		);
	}
}

#[test]
fn test_insert_remove_restores_structure() {
	let mut rng = StdRng::seed_from_u64(42);
	let sublist = Sublist::new();
	for id in 0 .. 50 {
		sublist
			.insert(Subscription::new(random_pattern(&mut rng), id))
			.unwrap();
	}
	let nodes = sublist.node_count();

	for id in 100 .. 150 {
		let pattern = random_pattern(&mut rng);
		let handle = sublist.insert(Subscription::new(pattern, id)).unwrap();
		sublist.remove(&handle).unwrap();
		assert_eq!(sublist.node_count(), nodes);
	}
}

#[test]
fn test_remove_absent_is_not_found_and_idempotent() {
	let sublist = Sublist::new();
	let handle = sublist.insert(Subscription::new("a.*", 1)).unwrap();
	let nodes = sublist.node_count();

	assert!(sublist.remove(&Subscription::new("a.*", 2)).unwrap_err().is_not_found());
	assert_eq!(sublist.node_count(), nodes);

	sublist.remove(&handle).unwrap();
	assert!(sublist.remove(&handle).unwrap_err().is_not_found());
	assert_eq!(sublist.node_count(), 1);
}

#[test]
fn test_parallel_readers_share_cache() {
	let sublist = Arc::new(Sublist::new());
	for (pattern, id) in [("feed.*", 1), ("feed.>", 2), ("feed.news", 3)] {
		sublist.insert(Subscription::new(pattern, id)).unwrap();
	}

	let handles: Vec<_> = (0 .. 8)
		.map(|_| {
			let sublist = Arc::clone(&sublist);
			thread::spawn(move || {
				for _ in 0 .. 1000 {
					assert_eq!(sublist.match_subject("feed.news").len(), 3);
					assert_eq!(sublist.match_subject("feed.sports").len(), 2);
					assert_eq!(sublist.match_subject("feed.a.b").len(), 1);
				}
			})
		})
		.collect();
	for handle in handles {
		handle.join().unwrap();
	}

	let stats = sublist.stats();
	assert_eq!(stats.matches, 8 * 3000);
	assert!(stats.cache_hits >= stats.matches - 8 * 3);
	assert_eq!(stats.cache_entries, 3);
}
