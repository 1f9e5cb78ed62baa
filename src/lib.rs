//! # html_allowlist
//!
//! An allowlist policy engine for sanitizing untrusted HTML.
//!
//! ## Overview
//!
//! A [`Policy`] describes which elements, attributes and attribute values
//! may survive sanitization. It is assembled once with a [`PolicyBuilder`]
//! and then queried, concurrently if needed, by a tree walker:
//!
//! - [`Policy::is_element_admissible`] -- may this element be emitted?
//! - [`Policy::evaluate`] -- keep, normalize or drop this attribute value,
//!   plus any attributes (such as `rel="nofollow"`) that must be injected.
//!
//! Values are validated by [`Matcher`]s. URL-bearing attributes additionally
//! pass through the [`UrlPolicy`], which checks schemes and relative URLs
//! and hardens links.
//!
//! [`Policy::sanitize`] is a reference walker built on `scraper` that applies
//! a policy to a whole HTML fragment.
//!
//! ## Quick start
//!
//! ```rust
//! use html_allowlist::{Decision, PolicyBuilder, Rejection};
//!
//! let policy = PolicyBuilder::new()
//!     .allow_elements(["p", "b", "i"])
//!     .allow_standard_attributes()
//!     .allow_standard_urls()
//!     .allow_attrs(["href"])
//!     .on_elements(["a"])
//!     .allow_tables()
//!     .build();
//!
//! assert_eq!(policy.evaluate("td", "colspan", "2").value(), Some("2"));
//! assert_eq!(
//!     policy.evaluate("a", "href", "javascript:alert(1)"),
//!     Decision::Drop(Rejection::Value)
//! );
//!
//! let kept = policy.evaluate("a", "href", "http://example.com");
//! assert_eq!(kept.injected()[0].name(), "rel");
//! assert_eq!(kept.injected()[0].value(), "nofollow");
//! ```

pub mod config;
pub mod error;
mod helpers;
pub mod matcher;
pub mod policies;
pub mod policy;
mod sanitize;

pub use config::{AttrRuleBuilder, PolicyBuilder};
pub use error::{PolicyError, Result};
pub use matcher::{FnMatcher, KeywordMatcher, Matcher, RegexMatcher, SharedMatcher};
pub use policies::{strict_policy, ugc_policy};
pub use policy::{
    AttributeRule, Decision, ElementRule, InjectMode, InjectedAttribute, Kept, Policy, Rejection,
    Scope, UrlPolicy,
};

use std::sync::OnceLock;

// Global state for the optional singleton pattern
static GLOBAL: OnceLock<Policy> = OnceLock::new();

/// Install `policy` as the process-wide [`Policy`].
///
/// Call once at application startup. Any part of the application can then
/// query it via [`global()`].
///
/// # Panics
///
/// Panics if called more than once.
pub fn init(policy: Policy) -> &'static Policy {
    let mut installed = false;
    let global = GLOBAL.get_or_init(|| {
        installed = true;
        policy
    });
    if !installed {
        panic!("Global policy already initialized");
    }
    tracing::debug!("Installed global policy");
    global
}

/// Retrieve the process-wide [`Policy`] installed with [`init()`].
///
/// Returns `None` if [`init()`] has not been called.
pub fn global() -> Option<&'static Policy> {
    GLOBAL.get()
}
