//! Splitting of dot-delimited subjects into tokens

use smallvec::SmallVec;

use super::error::{SubjectError, SubjectResult};
use super::subject_token::{FULL_WILDCARD, SINGLE_WILDCARD};

/// Separator between subject tokens
pub const TOKEN_SEPARATOR: char = '.';

/// Tokens of a subject, borrowed from the subject string
pub type Tokens<'a> = SmallVec<[&'a str; 16]>;

const WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

/// Splits a subject into tokens, checking only structure: the subject must be
/// non-empty, free of whitespace, and every token must be non-empty.
pub(crate) fn split_tokens(subject: &str) -> SubjectResult<Tokens<'_>> {
	if subject.is_empty() {
		return Err(SubjectError::EmptySubject);
	}
	if subject.contains(WHITESPACE) {
		return Err(SubjectError::whitespace(subject));
	}

	let mut tokens = Tokens::new();
	for (position, token) in subject.split(TOKEN_SEPARATOR).enumerate() {
		if token.is_empty() {
			return Err(SubjectError::empty_token(subject, position));
		}
		tokens.push(token);
	}
	Ok(tokens)
}

/// Tokenizes a subject used for publishing.
///
/// Fails for empty subjects, empty tokens (`a..b`, `.a`, `a.`), whitespace
/// and any wildcard, whether it stands alone as a token or is embedded in one.
pub fn tokenize(subject: &str) -> SubjectResult<Tokens<'_>> {
	let tokens = split_tokens(subject)?;
	for (position, token) in tokens.iter().enumerate() {
		match *token {
			| SINGLE_WILDCARD | FULL_WILDCARD => {
				return Err(SubjectError::wildcard_in_publish(subject, *token));
			}
			| _ if token.contains(['*', '>']) => {
				return Err(SubjectError::wildcard_usage(*token, position));
			}
			| _ => {}
		}
	}
	Ok(tokens)
}
