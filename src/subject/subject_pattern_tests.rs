//! Tests for SubjectPattern functionality

use super::{SubjectError, SubjectPattern, SubjectToken, tokenize};

fn create_pattern(pattern: &str) -> SubjectPattern {
	SubjectPattern::parse(pattern).expect("Pattern should be valid")
}

fn pattern_matches(pattern: &str, subject: &str) -> bool {
	let tokens = tokenize(subject).expect("Subject should be valid");
	create_pattern(pattern).matches(&tokens)
}

#[test]
fn test_literal_pattern() {
	let pattern = create_pattern("sensors.temperature.room1");

	assert_eq!(pattern.as_str(), "sensors.temperature.room1");
	assert_eq!(pattern.len(), 3);
	assert!(pattern.is_literal());
	assert!(!pattern.has_full_wildcard());
	assert_eq!(pattern.to_string(), "sensors.temperature.room1");
}

#[test]
fn test_wildcard_pattern_tokens() {
	let pattern = create_pattern("sensors.*.>");
	let tokens: Vec<&str> = pattern.tokens().iter().map(|t| t.as_str()).collect();

	assert_eq!(tokens, ["sensors", "*", ">"]);
	assert_eq!(pattern.tokens()[1], SubjectToken::Star);
	assert_eq!(pattern.tokens()[2], SubjectToken::Full);
	assert!(!pattern.is_literal());
	assert!(pattern.has_full_wildcard());
}

#[test]
fn test_full_wildcard_must_be_last() {
	assert_eq!(
		SubjectPattern::parse("a.>.b"),
		Err(SubjectError::full_wildcard_position("a.>.b"))
	);
	assert!(SubjectPattern::parse(">.a").is_err());
	assert!(SubjectPattern::parse(">").is_ok());
	assert!(SubjectPattern::parse("*.>").is_ok());
}

#[test]
fn test_malformed_patterns() {
	assert_eq!(SubjectPattern::parse(""), Err(SubjectError::EmptySubject));
	assert!(matches!(
		SubjectPattern::parse("a..b"),
		Err(SubjectError::EmptyToken { position: 1, .. })
	));
	assert!(matches!(
		SubjectPattern::parse("a.b*"),
		Err(SubjectError::WildcardUsage { .. })
	));
	assert!(matches!(
		SubjectPattern::parse("a. b"),
		Err(SubjectError::Whitespace { .. })
	));
	assert!(SubjectPattern::try_from("a.").is_err());
}

#[test]
fn test_literal_matching() {
	assert!(pattern_matches("a.b.c", "a.b.c"));
	assert!(!pattern_matches("a.b.c", "a.b"));
	assert!(!pattern_matches("a.b", "a.b.c"));
	assert!(!pattern_matches("a.b.c", "a.b.d"));
}

#[test]
fn test_star_matching() {
	assert!(pattern_matches("a.*.c", "a.b.c"));
	assert!(pattern_matches("*", "foo"));
	assert!(!pattern_matches("*", "foo.bar"));
	assert!(!pattern_matches("a.*", "a"));
	assert!(pattern_matches("*.*", "x.y"));
}

#[test]
fn test_full_wildcard_matching() {
	assert!(pattern_matches("a.>", "a.b"));
	assert!(pattern_matches("a.>", "a.b.c.d"));
	assert!(!pattern_matches("a.>", "a"));
	assert!(pattern_matches(">", "a"));
	assert!(pattern_matches("*.b.>", "x.b.c"));
	assert!(!pattern_matches("*.b.>", "x.c.d"));
}
