//! The frozen allowlist and its resolution algorithm.
//!
//! A [`Policy`] is assembled with [`PolicyBuilder`](crate::PolicyBuilder) and
//! then only queried. Queries never fail: hostile input is answered with a
//! [`Decision::Drop`] carrying the [`Rejection`] reason.

mod rule;
pub mod url;

pub use rule::{AttributeRule, ElementRule, Scope};
pub use self::url::{InjectMode, InjectedAttribute, UrlPolicy};

use std::collections::{BTreeSet, HashMap};

/// Why an element or attribute was rejected. All rejections are expected
/// outcomes of sanitizing untrusted input, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The element is not admissible; the walker drops the element.
    Element,
    /// No rule exists for the attribute on this element.
    Attribute,
    /// A rule exists but the matcher or the URL policy rejected the value.
    Value,
}

/// An accepted attribute value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Kept {
    /// The sanitized value to emit.
    pub value: String,
    /// Attributes the emitted element must carry in addition.
    pub inject: Vec<InjectedAttribute>,
}

/// Outcome of [`Policy::evaluate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Keep(Kept),
    Drop(Rejection),
}

impl Decision {
    pub fn is_keep(&self) -> bool {
        matches!(self, Decision::Keep(_))
    }

    /// The kept value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Decision::Keep(kept) => Some(&kept.value),
            Decision::Drop(_) => None,
        }
    }

    /// Injected attributes; empty for a drop.
    pub fn injected(&self) -> &[InjectedAttribute] {
        match self {
            Decision::Keep(kept) => &kept.inject,
            Decision::Drop(_) => &[],
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Decision::Keep(_) => None,
            Decision::Drop(reason) => Some(*reason),
        }
    }
}

/// An immutable allowlist of elements, attributes and attribute values.
///
/// `Policy` is `Send + Sync`; share it behind an `Arc` (or a `static`) and
/// query it from as many sanitization passes as needed.
#[derive(Clone, Debug, Default)]
pub struct Policy {
    pub(crate) elements: BTreeSet<String>,
    pub(crate) element_attrs: HashMap<String, HashMap<String, AttributeRule>>,
    pub(crate) global_attrs: HashMap<String, AttributeRule>,
    pub(crate) urls: UrlPolicy,
    pub(crate) skip_content: BTreeSet<String>,
}

impl Policy {
    /// Returns `true` if `element` has an element rule or is the scope of at
    /// least one attribute rule.
    pub fn is_element_admissible(&self, element: &str) -> bool {
        self.elements.contains(element) || self.element_attrs.contains_key(element)
    }

    /// All admissible element names, sorted.
    pub fn admissible_elements(&self) -> BTreeSet<&str> {
        self.elements
            .iter()
            .chain(self.element_attrs.keys())
            .map(String::as_str)
            .collect()
    }

    /// Returns `true` if the walker should discard the text content of a
    /// rejected `element` (e.g. `script`, `style`) instead of keeping it.
    pub fn skips_content(&self, element: &str) -> bool {
        self.skip_content.contains(element)
    }

    pub fn url_policy(&self) -> &UrlPolicy {
        &self.urls
    }

    /// The rule that governs `attribute` on `element`: the element-scoped
    /// rule if there is one, otherwise the global rule.
    pub fn attribute_rule(&self, element: &str, attribute: &str) -> Option<&AttributeRule> {
        self.element_attrs
            .get(element)
            .and_then(|attrs| attrs.get(attribute))
            .or_else(|| self.global_attrs.get(attribute))
    }

    /// Number of attribute rules: one per (element, attribute) pair plus one
    /// per global attribute.
    pub fn attribute_rule_count(&self) -> usize {
        self.element_attrs.values().map(HashMap::len).sum::<usize>() + self.global_attrs.len()
    }

    /// Decide whether `attribute="raw"` survives on `element`.
    ///
    /// Resolution order: element admissibility, then the element-scoped rule,
    /// then the global rule, then the rule's matcher, then the URL policy for
    /// URL-bearing attributes.
    pub fn evaluate(&self, element: &str, attribute: &str, raw: &str) -> Decision {
        if !self.is_element_admissible(element) {
            tracing::trace!("Dropped <{element}>: element not admissible");
            return Decision::Drop(Rejection::Element);
        }

        let Some(rule) = self.attribute_rule(element, attribute) else {
            tracing::trace!("Dropped {element}.{attribute}: no rule");
            return Decision::Drop(Rejection::Attribute);
        };

        let Some(value) = rule.test(raw) else {
            tracing::trace!("Dropped {element}.{attribute}: value rejected by matcher");
            return Decision::Drop(Rejection::Value);
        };

        if !url::is_url_attribute(attribute) {
            return Decision::Keep(Kept {
                value,
                inject: Vec::new(),
            });
        }

        match self.urls.admit(attribute, &value, element) {
            Some(kept) => Decision::Keep(kept),
            None => Decision::Drop(Rejection::Value),
        }
    }
}
