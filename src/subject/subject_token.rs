//! Subject pattern token types

use arcstr::Substr;

use super::error::{SubjectError, SubjectResult};

/// Token matching exactly one subject token
pub const SINGLE_WILDCARD: &str = "*";

/// Token matching one or more trailing subject tokens
pub const FULL_WILDCARD: &str = ">";

/// Pattern token: literal string or wildcard
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubjectToken {
	/// Literal token, matched by string equality
	Literal(Substr),
	/// `*` wildcard, matches any single token
	Star,
	/// `>` wildcard, matches every remaining token (at least one)
	Full,
}

impl SubjectToken {
	/// Parses a single non-empty pattern token.
	///
	/// `position` is only used for error reporting.
	pub fn parse(token: Substr, position: usize) -> SubjectResult<Self> {
		let res = match token.as_str() {
			| SINGLE_WILDCARD => SubjectToken::Star,
			| FULL_WILDCARD => SubjectToken::Full,
			| "" => return Err(SubjectError::empty_token(token.as_str(), position)),
			| s if s.contains(['*', '>']) => {
				return Err(SubjectError::wildcard_usage(s, position));
			}
			| _ => SubjectToken::Literal(token),
		};
		Ok(res)
	}

	/// Returns string representation of the token.
	pub fn as_str(&self) -> &str {
		match self {
			| SubjectToken::Literal(s) => s,
			| SubjectToken::Star => SINGLE_WILDCARD,
			| SubjectToken::Full => FULL_WILDCARD,
		}
	}

	/// Returns true if this token is a wildcard (`*` or `>`).
	pub fn is_wildcard(&self) -> bool {
		matches!(self, SubjectToken::Star | SubjectToken::Full)
	}

	/// Returns true if this token matches the given subject token.
	pub fn matches(&self, token: &str) -> bool {
		match self {
			| SubjectToken::Literal(s) => s.as_str() == token,
			| SubjectToken::Star | SubjectToken::Full => true,
		}
	}
}

impl std::fmt::Display for SubjectToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}
