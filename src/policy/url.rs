//! URL admission: scheme and relativity checks plus link hardening.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use url::{ParseError, Url};

use super::Kept;

/// Attributes whose values are URLs and therefore pass through [`UrlPolicy`].
pub const URL_ATTRIBUTES: &[&str] = &[
    "action",
    "background",
    "cite",
    "codebase",
    "formaction",
    "href",
    "icon",
    "longdesc",
    "manifest",
    "poster",
    "profile",
    "src",
    "usemap",
];

/// Elements that receive `rel` hardening unless configured otherwise.
pub const DEFAULT_LINK_ELEMENTS: &[&str] = &["a", "area", "link"];

static RELATIVE_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://relative.invalid/").expect("relative base URL is valid"));

/// Returns `true` if `attribute` carries a URL.
pub fn is_url_attribute(attribute: &str) -> bool {
    URL_ATTRIBUTES.contains(&attribute)
}

/// Returns `true` if `scheme` is syntactically a URL scheme
/// (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`).
pub fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// How an attribute injected by link hardening combines with an existing
/// attribute of the same name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectMode {
    /// Union of space-separated tokens, existing tokens first (`rel`).
    MergeTokens,
    /// The injected value replaces the existing one (`target`).
    Replace,
}

/// An attribute that must be present on the emitted element even though it
/// may be absent from the source markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjectedAttribute {
    name: String,
    value: String,
    mode: InjectMode,
}

impl InjectedAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>, mode: InjectMode) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            mode,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn mode(&self) -> InjectMode {
        self.mode
    }

    /// Compute the final attribute value given the value already present on
    /// the element, if any.
    pub fn apply(&self, existing: Option<&str>) -> String {
        match (self.mode, existing) {
            (InjectMode::MergeTokens, Some(existing)) => merge_tokens(existing, &self.value),
            _ => self.value.clone(),
        }
    }
}

/// Union of two space-separated token lists, keeping the order of `existing`
/// and appending unseen tokens from `added`. Comparison is ASCII
/// case-insensitive.
pub fn merge_tokens(existing: &str, added: &str) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    for token in existing.split_ascii_whitespace().chain(added.split_ascii_whitespace()) {
        if !tokens.iter().any(|t| t.eq_ignore_ascii_case(token)) {
            tokens.push(token);
        }
    }
    tokens.join(" ")
}

/// Result of structurally classifying a URL.
#[derive(Debug, PartialEq, Eq)]
enum UrlKind {
    Absolute { scheme: String, has_host: bool },
    Relative { has_host: bool },
    Unparseable,
}

fn classify(raw: &str) -> UrlKind {
    match Url::parse(raw) {
        Ok(url) => UrlKind::Absolute {
            scheme: url.scheme().to_string(),
            has_host: url.host().is_some(),
        },
        Err(ParseError::RelativeUrlWithoutBase) => match RELATIVE_BASE.join(raw) {
            Ok(_) => UrlKind::Relative {
                has_host: is_network_path(raw),
            },
            Err(_) => UrlKind::Unparseable,
        },
        Err(_) => UrlKind::Unparseable,
    }
}

/// Returns `true` for a network-path reference such as `//example.com/x`.
///
/// Tabs and newlines are ignored and a backslash counts as `/`, as when
/// joining against a special-scheme base.
fn is_network_path(raw: &str) -> bool {
    let mut slashes = raw
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .take(2)
        .filter(|c| matches!(c, '/' | '\\'));
    slashes.next().is_some() && slashes.next().is_some()
}

/// Scheme of `raw` read lexically, for URLs that do not parse.
fn lexical_scheme(raw: &str) -> Option<String> {
    let end = raw.find([':', '/', '?', '#'])?;
    let scheme = &raw[..end];
    (raw[end..].starts_with(':') && is_valid_scheme(scheme)).then(|| scheme.to_ascii_lowercase())
}

/// Sub-policy governing URL-bearing attributes.
///
/// Validation is active once any of [`require_parseable`](Self::require_parseable),
/// [`allow_relative`](Self::allow_relative) or a scheme allowlist is
/// configured. Link hardening (`rel` tokens, `target`) applies to every
/// accepted URL on a link element, whether or not validation is active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlPolicy {
    pub(crate) require_parseable: bool,
    pub(crate) allow_relative: bool,
    pub(crate) allowed_schemes: BTreeSet<String>,
    pub(crate) force_no_follow: bool,
    pub(crate) force_no_referrer: bool,
    pub(crate) target_blank: bool,
    pub(crate) link_elements: BTreeSet<String>,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self {
            require_parseable: false,
            allow_relative: false,
            allowed_schemes: BTreeSet::new(),
            force_no_follow: false,
            force_no_referrer: false,
            target_blank: false,
            link_elements: DEFAULT_LINK_ELEMENTS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl UrlPolicy {
    pub fn require_parseable(&self) -> bool {
        self.require_parseable
    }

    pub fn allow_relative(&self) -> bool {
        self.allow_relative
    }

    pub fn force_no_follow(&self) -> bool {
        self.force_no_follow
    }

    /// Lower-cased allowed schemes.
    pub fn allowed_schemes(&self) -> impl Iterator<Item = &str> {
        self.allowed_schemes.iter().map(String::as_str)
    }

    /// Elements that receive link hardening.
    pub fn link_elements(&self) -> impl Iterator<Item = &str> {
        self.link_elements.iter().map(String::as_str)
    }

    /// Returns `true` if URL values are validated.
    pub fn is_active(&self) -> bool {
        self.require_parseable || self.allow_relative || !self.allowed_schemes.is_empty()
    }

    /// Admit or reject `raw` as the value of `attribute` on `element`.
    ///
    /// The accepted value is `raw` with surrounding whitespace removed.
    /// Any attributes the emitted element must additionally carry are
    /// returned in [`Kept::inject`].
    pub fn admit(&self, attribute: &str, raw: &str, element: &str) -> Option<Kept> {
        let value = raw.trim();

        let mut kind = classify(value);
        if kind == UrlKind::Unparseable {
            if self.require_parseable {
                tracing::trace!("Rejected unparseable URL in {element}.{attribute}");
                return None;
            }
            kind = match lexical_scheme(value) {
                Some(scheme) => UrlKind::Absolute {
                    scheme,
                    has_host: false,
                },
                None => UrlKind::Relative { has_host: false },
            };
        }

        let fully_qualified = match kind {
            UrlKind::Absolute { scheme, has_host } => {
                if self.is_active() && !self.allowed_schemes.contains(&scheme) {
                    tracing::trace!("Rejected URL scheme `{scheme}` in {element}.{attribute}");
                    return None;
                }
                has_host
            }
            UrlKind::Relative { has_host } => {
                if self.is_active() && !self.allow_relative {
                    tracing::trace!("Rejected relative URL in {element}.{attribute}");
                    return None;
                }
                has_host
            }
            UrlKind::Unparseable => false,
        };

        Some(Kept {
            value: value.to_string(),
            inject: self.hardening(element, fully_qualified),
        })
    }

    fn hardening(&self, element: &str, fully_qualified: bool) -> Vec<InjectedAttribute> {
        if !self.link_elements.contains(element) {
            return Vec::new();
        }

        let mut rel = Vec::new();
        if self.force_no_follow {
            rel.push("nofollow");
        }
        if self.force_no_referrer {
            rel.push("noreferrer");
        }

        let mut inject = Vec::new();
        if self.target_blank && fully_qualified {
            rel.push("noopener");
            inject.push(InjectedAttribute::new("target", "_blank", InjectMode::Replace));
        }
        if !rel.is_empty() {
            inject.insert(
                0,
                InjectedAttribute::new("rel", rel.join(" "), InjectMode::MergeTokens),
            );
        }
        inject
    }
}
