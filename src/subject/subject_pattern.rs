//! Parsed subscription patterns

use std::fmt::{self, Display};

use arcstr::ArcStr;
use smallvec::SmallVec;

use super::error::{SubjectError, SubjectResult};
use super::subject_token::SubjectToken;
use super::tokenizer::split_tokens;

/// Parsed subject pattern with wildcard support.
///
/// Tokens share the allocation of the original pattern string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectPattern {
	pattern: ArcStr,
	tokens: SmallVec<[SubjectToken; 8]>,
}

impl SubjectPattern {
	/// Parses a pattern such as `sensors.*.temperature` or `logs.>`.
	pub fn parse(pattern: impl Into<ArcStr>) -> SubjectResult<Self> {
		let pattern = pattern.into();
		let tokens = split_tokens(&pattern)?
			.into_iter()
			.enumerate()
			.map(|(position, token)| {
				SubjectToken::parse(pattern.substr_from(token), position)
			})
			.collect::<SubjectResult<SmallVec<[SubjectToken; 8]>>>()?;

		if let Some(full_pos) =
			tokens.iter().position(|t| matches!(t, SubjectToken::Full))
		{
			if full_pos != tokens.len() - 1 {
				return Err(SubjectError::full_wildcard_position(
					pattern.as_str(),
				));
			}
		}

		Ok(Self { pattern, tokens })
	}

	/// Returns the pattern as originally given.
	pub fn as_str(&self) -> &str {
		&self.pattern
	}

	/// Returns the shared pattern string.
	pub fn pattern(&self) -> ArcStr {
		self.pattern.clone()
	}

	/// Parsed tokens in pattern order.
	pub fn tokens(&self) -> &[SubjectToken] {
		&self.tokens
	}

	/// Number of tokens, counting wildcards.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	/// Always false: a parsed pattern has at least one token.
	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// Returns true if the pattern contains no wildcards.
	pub fn is_literal(&self) -> bool {
		!self.tokens.iter().any(SubjectToken::is_wildcard)
	}

	/// Returns true if the pattern ends in `>`.
	pub fn has_full_wildcard(&self) -> bool {
		matches!(self.tokens.last(), Some(SubjectToken::Full))
	}

	/// Matches this single pattern against a tokenized published subject.
	///
	/// Linear in the pattern length; the trie answers the same question for
	/// every registered pattern at once.
	pub fn matches(&self, subject: &[&str]) -> bool {
		let mut remaining = subject;
		for token in &self.tokens {
			match (token, remaining) {
				| (SubjectToken::Full, rest) => return !rest.is_empty(),
				| (_, []) => return false,
				| (token, [head, rest @ ..]) => {
					if !token.matches(head) {
						return false;
					}
					remaining = rest;
				}
			}
		}
		remaining.is_empty()
	}
}

impl Display for SubjectPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

impl TryFrom<&str> for SubjectPattern {
	type Error = SubjectError;

	fn try_from(pattern: &str) -> Result<Self, Self::Error> {
		Self::parse(pattern)
	}
}
