//! Closure-backed matcher for custom validation logic.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use super::Matcher;

type Validator = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Matcher backed by a user-supplied closure.
///
/// A panic inside the closure is caught and treated as a rejection, so a
/// faulty validator can never abort a sanitization pass.
///
/// # Example
///
/// ```
/// use html_allowlist::{FnMatcher, Matcher};
///
/// // Accept hex colours and normalize them to lower case.
/// let colour = FnMatcher::new(|v: &str| {
///     let hex = v.strip_prefix('#')?;
///     (hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
///         .then(|| v.to_ascii_lowercase())
/// });
/// assert_eq!(colour.test("#FFAA00").as_deref(), Some("#ffaa00"));
/// assert_eq!(colour.test("red"), None);
/// ```
pub struct FnMatcher {
    validator: Box<Validator>,
}

impl FnMatcher {
    /// Wrap a closure returning `Some(normalized)` to accept or `None` to reject.
    pub fn new<F>(validator: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            validator: Box::new(validator),
        }
    }

    /// Wrap a fallible validator; any `Err` is treated as a rejection.
    pub fn fallible<F, E>(validator: F) -> Self
    where
        F: Fn(&str) -> Result<String, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self::new(move |value| match validator(value) {
            Ok(normalized) => Some(normalized),
            Err(e) => {
                tracing::trace!("Custom matcher rejected value: {e}");
                None
            }
        })
    }
}

impl fmt::Debug for FnMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMatcher").finish_non_exhaustive()
    }
}

impl Matcher for FnMatcher {
    fn test(&self, value: &str) -> Option<String> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.validator)(value))).unwrap_or_else(|_| {
            tracing::warn!("Custom matcher panicked; rejecting value");
            None
        })
    }
}
