//! Fixed-vocabulary matcher.

use std::collections::BTreeSet;

use super::Matcher;

/// Matcher that accepts values from a fixed set of keywords, compared
/// ASCII case-insensitively.
///
/// The accepted value is emitted exactly as supplied. Include `""` in the
/// vocabulary to accept empty values (legacy boolean attributes such as
/// `nowrap`).
///
/// # Example
///
/// ```
/// use html_allowlist::{KeywordMatcher, Matcher};
///
/// let dir = KeywordMatcher::new(["ltr", "rtl"]);
/// assert_eq!(dir.test("RTL").as_deref(), Some("RTL"));
/// assert_eq!(dir.test("up"), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordMatcher {
    keywords: BTreeSet<String>,
}

impl KeywordMatcher {
    /// Create a new `KeywordMatcher` from the given vocabulary.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Returns `true` if `value` is in the vocabulary.
    pub fn contains(&self, value: &str) -> bool {
        if value.bytes().any(|b| b.is_ascii_uppercase()) {
            self.keywords.contains(&value.to_ascii_lowercase())
        } else {
            self.keywords.contains(value)
        }
    }

    /// Iterate over the (lower-cased) vocabulary.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

impl Matcher for KeywordMatcher {
    fn test(&self, value: &str) -> Option<String> {
        self.contains(value).then(|| value.to_string())
    }
}
