//! Regex-based value matcher.

use regex::Regex;

use super::Matcher;
use crate::error::{PolicyError, Result};

/// Matcher that accepts values matching a regular expression.
///
/// By default the pattern must match the *whole* value: `[0-9]+` accepts
/// `"42"` but rejects `"4x2"`. Use [`partial`](Self::partial) when a match
/// anywhere in the value is sufficient.
///
/// Patterns are compiled by the `regex` crate, which guarantees linear-time
/// matching, so a hostile value cannot trigger catastrophic backtracking.
///
/// # Example
///
/// ```
/// use html_allowlist::{Matcher, RegexMatcher};
///
/// let m = RegexMatcher::new(r"[0-9]+%?");
/// assert_eq!(m.test("50%").as_deref(), Some("50%"));
/// assert_eq!(m.test("fifty"), None);
/// ```
#[derive(Clone, Debug)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// Create a full-match `RegexMatcher` from `pattern`.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is invalid. Use [`try_new`](Self::try_new)
    /// for a fallible alternative.
    pub fn new(pattern: &str) -> Self {
        Self::try_new(pattern).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Fallible constructor that reports invalid patterns as
    /// [`PolicyError::InvalidPattern`].
    pub fn try_new(pattern: &str) -> Result<Self> {
        compile(&format!(r"\A(?:{pattern})\z"), pattern)
    }

    /// Create a matcher that accepts any value containing a match of `pattern`.
    pub fn partial(pattern: &str) -> Result<Self> {
        compile(pattern, pattern)
    }

    /// Returns the compiled expression, including the anchors added for
    /// full-match matchers.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn compile(source: &str, pattern: &str) -> Result<RegexMatcher> {
    let regex = Regex::new(source).map_err(|source| PolicyError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(RegexMatcher { regex })
}

impl Matcher for RegexMatcher {
    fn test(&self, value: &str) -> Option<String> {
        self.regex.is_match(value).then(|| value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_match_rejects_surrounding_text() {
        let m = RegexMatcher::new(r"[0-9]+");
        assert_eq!(m.test("123").as_deref(), Some("123"));
        assert_eq!(m.test("123abc"), None);
        assert_eq!(m.test("abc123"), None);
        assert_eq!(m.test(""), None);
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        // Without the non-capturing group, `^a|b$` would accept "ax".
        let m = RegexMatcher::new("(?i)left|right");
        assert!(m.test("LEFT").is_some());
        assert!(m.test("leftover").is_none());
        assert!(m.test("upright").is_none());
    }

    #[test]
    fn partial_accepts_embedded_match() {
        let m = RegexMatcher::partial(r"[0-9]+").unwrap();
        assert_eq!(m.test("abc123").as_deref(), Some("abc123"));
        assert_eq!(m.test("abc"), None);
    }

    #[test]
    fn empty_alternative_accepts_empty_string() {
        let m = RegexMatcher::new("(?i)|nowrap");
        assert!(m.test("").is_some());
        assert!(m.test("NOWRAP").is_some());
        assert!(m.test("wrap").is_none());
    }

    #[test]
    fn try_new_invalid_pattern() {
        let result = RegexMatcher::try_new("[invalid");
        match result {
            Err(PolicyError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "[invalid"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "Invalid pattern")]
    fn new_panics_on_invalid_pattern() {
        let _ = RegexMatcher::new("(unclosed");
    }

    #[test]
    fn as_str_exposes_anchored_expression() {
        let m = RegexMatcher::new("a+");
        assert_eq!(m.as_str(), r"\A(?:a+)\z");
    }
}
