//! Arena-backed token trie holding every registered subscription.
//!
//! Nodes live in a `Vec` and refer to each other by index, so the whole
//! structure can sit behind a single lock without aliased references.
//! Freed slots are recycled through a free list.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use arcstr::{ArcStr, Substr};
use smallvec::SmallVec;

use super::error::{SublistError, SublistResult};
use super::match_result::MatchResult;
use super::subscription::Subscription;
use crate::subject::{SubjectPattern, SubjectToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

/// Subscriptions terminating at one point of the trie
#[derive(Debug)]
struct Terminal<T> {
	plain: Vec<Arc<Subscription<T>>>,
	/// Shared copy of `plain`, built by the first match once `plain` is at or
	/// above the fast subtree threshold and dropped by any change to `plain`
	flattened: OnceLock<Arc<[Arc<Subscription<T>>]>>,
	groups: HashMap<ArcStr, Vec<Arc<Subscription<T>>>>,
}

impl<T> Default for Terminal<T> {
	fn default() -> Self {
		Self {
			plain: Vec::new(),
			flattened: OnceLock::new(),
			groups: HashMap::new(),
		}
	}
}

impl<T> Terminal<T> {
	fn is_empty(&self) -> bool {
		self.plain.is_empty() && self.groups.is_empty()
	}

	fn len(&self) -> usize {
		self.plain.len() + self.groups.values().map(Vec::len).sum::<usize>()
	}

	fn push(&mut self, subscription: Arc<Subscription<T>>) {
		match subscription.queue_name() {
			| Some(queue) => self
				.groups
				.entry(queue.clone())
				.or_default()
				.push(subscription),
			| None => {
				self.plain.push(subscription);
				self.flattened.take();
			}
		}
	}

	/// Removes the first subscription equal to `target`.
	fn remove(
		&mut self,
		target: &Subscription<T>,
	) -> Option<Arc<Subscription<T>>>
	where
		T: PartialEq,
	{
		match target.queue() {
			| Some(queue) => {
				let members = self.groups.get_mut(queue)?;
				let index = members.iter().position(|s| **s == *target)?;
				let removed = members.remove(index);
				if members.is_empty() {
					self.groups.remove(queue);
				}
				Some(removed)
			}
			| None => {
				let index = self.plain.iter().position(|s| **s == *target)?;
				let removed = self.plain.remove(index);
				self.flattened.take();
				Some(removed)
			}
		}
	}

	fn collect_into(&self, result: &mut MatchResult<T>, threshold: usize) {
		if threshold > 0 && self.plain.len() >= threshold {
			let list = self
				.flattened
				.get_or_init(|| Arc::from(self.plain.as_slice()));
			result.push_flattened(list);
		} else {
			result.push_plain(&self.plain);
		}
		for (queue, members) in &self.groups {
			result.push_group(queue, members);
		}
	}

	fn collect_all(&self, out: &mut Vec<Arc<Subscription<T>>>) {
		out.extend(self.plain.iter().cloned());
		for members in self.groups.values() {
			out.extend(members.iter().cloned());
		}
	}
}

#[derive(Debug)]
struct TrieNode<T> {
	literals: HashMap<ArcStr, NodeId>,
	star: Option<NodeId>,
	/// Subscriptions of patterns ending in `>` right after this node
	full: Option<Box<Terminal<T>>>,
	/// Subscriptions of patterns ending exactly at this node
	terminal: Terminal<T>,
}

impl<T> Default for TrieNode<T> {
	fn default() -> Self {
		Self {
			literals: HashMap::new(),
			star: None,
			full: None,
			terminal: Terminal::default(),
		}
	}
}

impl<T> TrieNode<T> {
	fn is_empty(&self) -> bool {
		self.literals.is_empty()
			&& self.star.is_none()
			&& self.full.is_none()
			&& self.terminal.is_empty()
	}
}

/// Edge from a parent to a child node, recorded while descending
enum Edge {
	Literal(Substr),
	Star,
}

#[derive(Debug)]
pub(crate) struct SubjectTrie<T> {
	nodes: Vec<TrieNode<T>>,
	free: Vec<NodeId>,
	count: usize,
	generation: u64,
	fast_subtree_threshold: usize,
}

impl<T> SubjectTrie<T> {
	pub fn new(fast_subtree_threshold: usize) -> Self {
		Self {
			nodes: vec![TrieNode::default()],
			free: Vec::new(),
			count: 0,
			generation: 0,
			fast_subtree_threshold,
		}
	}

	/// Number of registered subscriptions.
	pub fn len(&self) -> usize {
		self.count
	}

	/// Live nodes, the root included.
	pub fn node_count(&self) -> usize {
		self.nodes.len() - self.free.len()
	}

	/// Bumped by every successful mutation.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	fn node(&self, id: NodeId) -> &TrieNode<T> {
		&self.nodes[id.0]
	}

	fn node_mut(&mut self, id: NodeId) -> &mut TrieNode<T> {
		&mut self.nodes[id.0]
	}

	fn alloc(&mut self) -> NodeId {
		match self.free.pop() {
			| Some(id) => id,
			| None => {
				self.nodes.push(TrieNode::default());
				NodeId(self.nodes.len() - 1)
			}
		}
	}

	fn release(&mut self, id: NodeId) {
		debug_assert_ne!(id, ROOT, "root node is never released");
		self.nodes[id.0] = TrieNode::default();
		self.free.push(id);
	}

	/// Appends a subscription at the end of the pattern's path, creating
	/// nodes as needed. Equal subscriptions are not deduplicated.
	pub fn insert(
		&mut self,
		pattern: &SubjectPattern,
		subscription: Arc<Subscription<T>>,
	) {
		let mut current = ROOT;

		for token in pattern.tokens() {
			current = match token {
				| SubjectToken::Literal(literal) => {
					match self.node(current).literals.get(literal.as_str()).copied()
					{
						| Some(child) => child,
						| None => {
							let child = self.alloc();
							self.node_mut(current)
								.literals
								.insert(ArcStr::from(literal.as_str()), child);
							child
						}
					}
				}
				| SubjectToken::Star => match self.node(current).star {
					| Some(child) => child,
					| None => {
						let child = self.alloc();
						self.node_mut(current).star = Some(child);
						child
					}
				},
				| SubjectToken::Full => {
					// `>` is always the last token
					self.node_mut(current)
						.full
						.get_or_insert_with(Box::default)
						.push(subscription);
					self.count += 1;
					self.generation += 1;
					return;
				}
			};
		}

		self.node_mut(current)
			.terminal
			.push(subscription);
		self.count += 1;
		self.generation += 1;
	}

	/// Removes the first subscription equal to `target` and prunes nodes left
	/// empty along the path. The trie is untouched when nothing matches.
	pub fn remove(
		&mut self,
		pattern: &SubjectPattern,
		target: &Subscription<T>,
	) -> SublistResult<Arc<Subscription<T>>>
	where
		T: PartialEq,
	{
		let not_found =
			|| SublistError::not_found(target.subject(), target.queue());
		let mut path: SmallVec<[(NodeId, Edge); 16]> = SmallVec::new();
		let mut current = ROOT;
		let mut full = false;

		for token in pattern.tokens() {
			let node = self.node(current);
			let (child, edge) = match token {
				| SubjectToken::Literal(literal) => (
					node.literals.get(literal.as_str()).copied(),
					Edge::Literal(literal.clone()),
				),
				| SubjectToken::Star => (node.star, Edge::Star),
				| SubjectToken::Full => {
					full = true;
					break;
				}
			};
			let child = child.ok_or_else(not_found)?;
			path.push((current, edge));
			current = child;
		}

		let node = self.node_mut(current);
		let removed = if full {
			let terminal = node.full.as_mut().ok_or_else(not_found)?;
			let removed = terminal.remove(target).ok_or_else(not_found)?;
			if terminal.is_empty() {
				node.full = None;
			}
			removed
		} else {
			node.terminal.remove(target).ok_or_else(not_found)?
		};

		self.count -= 1;
		self.generation += 1;
		self.prune(current, &path);
		Ok(removed)
	}

	/// Walks back up `path`, detaching and releasing empty nodes.
	fn prune(&mut self, mut node: NodeId, path: &[(NodeId, Edge)]) {
		for (parent, edge) in path.iter().rev() {
			if !self.node(node).is_empty() {
				break;
			}
			let parent_node = self.node_mut(*parent);
			match edge {
				| Edge::Literal(literal) => {
					parent_node.literals.remove(literal.as_str());
				}
				| Edge::Star => parent_node.star = None,
			}
			self.release(node);
			node = *parent;
		}
	}

	/// Collects every subscription matching a tokenized published subject.
	pub fn collect_matches(&self, tokens: &[&str]) -> MatchResult<T> {
		let mut result = MatchResult::default();
		self.collect_matching_subscriptions(ROOT, tokens, &mut result);
		result
	}

	fn collect_matching_subscriptions(
		&self,
		id: NodeId,
		tokens: &[&str],
		result: &mut MatchResult<T>,
	) {
		let node = self.node(id);
		match tokens {
			| [] => {
				// At end of subject, collect subscriptions ending here
				node.terminal.collect_into(result, self.fast_subtree_threshold);
			}
			| [token, remaining @ ..] => {
				// `>` matches the remainder, which holds at least one token
				if let Some(full) = &node.full {
					full.collect_into(result, self.fast_subtree_threshold);
				}
				if let Some(&child) = node.literals.get(*token) {
					self.collect_matching_subscriptions(child, remaining, result);
				}
				if let Some(star) = node.star {
					self.collect_matching_subscriptions(star, remaining, result);
				}
			}
		}
	}

	/// Every registered subscription, in no particular order.
	pub fn subscriptions(&self) -> Vec<Arc<Subscription<T>>> {
		let mut out = Vec::with_capacity(self.count);
		let mut stack = vec![ROOT];
		while let Some(id) = stack.pop() {
			let node = self.node(id);
			node.terminal.collect_all(&mut out);
			if let Some(full) = &node.full {
				full.collect_all(&mut out);
			}
			stack.extend(node.star);
			stack.extend(node.literals.values().copied());
		}
		out
	}

	/// Subscriptions registered exactly on the given pattern.
	pub fn pattern_len(&self, pattern: &SubjectPattern) -> usize {
		let mut current = ROOT;
		for token in pattern.tokens() {
			let node = self.node(current);
			let next = match token {
				| SubjectToken::Literal(literal) => {
					node.literals.get(literal.as_str()).copied()
				}
				| SubjectToken::Star => node.star,
				| SubjectToken::Full => {
					return node.full.as_ref().map_or(0, |full| full.len());
				}
			};
			match next {
				| Some(child) => current = child,
				| None => return 0,
			}
		}
		self.node(current).terminal.len()
	}
}
