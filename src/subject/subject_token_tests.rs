//! Tests for SubjectToken functionality

use arcstr::Substr;

use super::{SubjectError, SubjectToken};

fn parse(token: &str) -> Result<SubjectToken, SubjectError> {
	SubjectToken::parse(Substr::from(token), 0)
}

#[test]
fn test_literal_token() {
	let token = parse("sensors").unwrap();

	assert_eq!(token, SubjectToken::Literal(Substr::from("sensors")));
	assert_eq!(token.as_str(), "sensors");
	assert!(!token.is_wildcard());
	assert!(token.matches("sensors"));
	assert!(!token.matches("sensor"));
}

#[test]
fn test_star_wildcard() {
	let token = parse("*").unwrap();

	assert_eq!(token, SubjectToken::Star);
	assert_eq!(token.as_str(), "*");
	assert!(token.is_wildcard());
	assert!(token.matches("anything"));
}

#[test]
fn test_full_wildcard() {
	let token = parse(">").unwrap();

	assert_eq!(token, SubjectToken::Full);
	assert_eq!(token.to_string(), ">");
	assert!(token.is_wildcard());
}

#[test]
fn test_embedded_wildcards_rejected() {
	for token in ["a*", "*b", "a>b", ">>", "**"] {
		match SubjectToken::parse(Substr::from(token), 3) {
			| Err(SubjectError::WildcardUsage { token: t, position }) => {
				assert_eq!(t, token);
				assert_eq!(position, 3);
			}
			| other => panic!("Expected WildcardUsage for '{token}', got {other:?}"),
		}
	}
}

#[test]
fn test_empty_token_rejected() {
	assert_eq!(parse(""), Err(SubjectError::empty_token("", 0)));
}

#[test]
fn test_other_punctuation_is_literal() {
	for token in ["+", "#", "a-b", "a_b", "{id}", "$SYS"] {
		assert_eq!(parse(token).unwrap().as_str(), token);
	}
}
