//! Value matchers applied to candidate attribute values.
//!
//! A [`Matcher`] decides whether a raw attribute value is acceptable and,
//! if so, which (possibly normalized) value is emitted in its place.
//!
//! Built-in matchers:
//!
//! - [`RegexMatcher`] -- pattern-based validation (full match by default).
//! - [`KeywordMatcher`] -- case-insensitive membership in a fixed vocabulary.
//! - [`FnMatcher`] -- arbitrary validation logic supplied as a closure.
//!
//! The [`library`] module holds the shared set of ready-made matchers used by
//! the composite helpers on [`PolicyBuilder`](crate::PolicyBuilder).

mod func;
mod keyword;
pub mod library;
mod regex;

pub use self::regex::RegexMatcher;
pub use func::FnMatcher;
pub use keyword::KeywordMatcher;

use std::sync::Arc;

/// Trait for attribute value matchers.
///
/// `None` rejects the value; `Some(normalized)` accepts it and supplies the
/// value to emit. Implementations must be pure and `Send + Sync` so a frozen
/// [`Policy`](crate::Policy) can be queried from many threads at once.
pub trait Matcher: Send + Sync {
    /// Validate `value`, returning the value to keep or `None` to reject.
    fn test(&self, value: &str) -> Option<String>;
}

/// A reference-counted matcher, shareable between rules and policies.
pub type SharedMatcher = Arc<dyn Matcher>;

impl<M: Matcher + ?Sized> Matcher for Arc<M> {
    fn test(&self, value: &str) -> Option<String> {
        (**self).test(value)
    }
}

impl<M: Matcher + ?Sized> Matcher for Box<M> {
    fn test(&self, value: &str) -> Option<String> {
        (**self).test(value)
    }
}
