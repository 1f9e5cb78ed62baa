//! Builder for assembling an immutable [`Policy`].

use std::sync::Arc;

use crate::error::{PolicyError, Result};
use crate::matcher::{RegexMatcher, SharedMatcher};
use crate::policy::url::is_valid_scheme;
use crate::policy::{AttributeRule, ElementRule, Policy, Scope};

/// Elements whose content is discarded along with the element itself when
/// they are not admissible.
pub const DEFAULT_SKIP_CONTENT: &[&str] = &[
    "frameset", "iframe", "noembed", "noframes", "noscript", "nostyle", "object", "script",
    "style", "title",
];

/// Builder for configuring a [`Policy`].
///
/// Every call records complete rules immediately. Calls can be made in any
/// order; registering the same (element, attribute) pair again replaces the
/// earlier rule.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use html_allowlist::{PolicyBuilder, RegexMatcher};
///
/// let policy = PolicyBuilder::new()
///     .allow_elements(["p", "b", "i"])
///     .allow_attrs(["colspan", "rowspan"])
///     .matching(Arc::new(RegexMatcher::new("[0-9]+")))
///     .on_elements(["td", "th"])
///     .allow_standard_attributes()
///     .build();
///
/// assert_eq!(policy.evaluate("td", "colspan", "2").value(), Some("2"));
/// assert!(!policy.evaluate("td", "colspan", "two").is_keep());
/// ```
#[derive(Clone, Debug)]
pub struct PolicyBuilder {
    policy: Policy,
    problems: Vec<String>,
}

impl PolicyBuilder {
    /// Create a builder that admits nothing.
    ///
    /// The URL policy starts inactive and the content of
    /// [`DEFAULT_SKIP_CONTENT`] elements is discarded by the walker.
    pub fn new() -> Self {
        let mut policy = Policy::default();
        policy.skip_content = DEFAULT_SKIP_CONTENT.iter().map(|e| e.to_string()).collect();
        Self {
            policy,
            problems: Vec::new(),
        }
    }

    /// Admit the named elements without any attributes.
    pub fn allow_elements<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self = self.add_element_rule(ElementRule::new(name));
        }
        self
    }

    /// Start an attribute rule for the named attributes. Finish it with
    /// [`AttrRuleBuilder::on_elements`] or [`AttrRuleBuilder::globally`].
    pub fn allow_attrs<I, S>(self, names: I) -> AttrRuleBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttrRuleBuilder {
            builder: self,
            attributes: names.into_iter().map(Into::into).collect(),
            matcher: None,
        }
    }

    pub fn add_element_rule(mut self, rule: ElementRule) -> Self {
        if rule.name().is_empty() {
            self.problems.push("empty element name".to_string());
        } else {
            self.policy.elements.insert(rule.name().to_string());
        }
        self
    }

    /// Register a fully specified attribute rule. An element-set scope is
    /// stored as one rule per element, each admitting its element.
    pub fn add_attribute_rule(mut self, rule: AttributeRule) -> Self {
        if rule.attribute().is_empty() {
            self.problems.push("empty attribute name".to_string());
            return self;
        }
        if let Scope::Elements(elements) = rule.scope() {
            for element in elements {
                if element.is_empty() {
                    self.problems.push(format!(
                        "empty element name for attribute `{}`",
                        rule.attribute()
                    ));
                    continue;
                }
                self.policy
                    .element_attrs
                    .entry(element.clone())
                    .or_default()
                    .insert(rule.attribute().to_string(), rule.for_element(element));
            }
            return self;
        }
        self.policy
            .global_attrs
            .insert(rule.attribute().to_string(), rule);
        self
    }

    /// Validate URL values only if they parse as URLs (absolute or relative).
    pub fn require_parseable_urls(mut self, require: bool) -> Self {
        self.policy.urls.require_parseable = require;
        self
    }

    pub fn allow_relative_urls(mut self, allow: bool) -> Self {
        self.policy.urls.allow_relative = allow;
        self
    }

    /// Add schemes (compared case-insensitively) that absolute URLs may use.
    pub fn allow_url_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for scheme in schemes {
            let scheme = scheme.as_ref();
            if is_valid_scheme(scheme) {
                self.policy.urls.allowed_schemes.insert(scheme.to_ascii_lowercase());
            } else {
                self.problems.push(format!("invalid URL scheme `{scheme}`"));
            }
        }
        self
    }

    /// Merge `nofollow` into `rel` on link elements carrying an accepted URL.
    pub fn require_no_follow_on_links(mut self, require: bool) -> Self {
        self.policy.urls.force_no_follow = require;
        self
    }

    /// Merge `noreferrer` into `rel` on link elements carrying an accepted URL.
    pub fn require_no_referrer_on_links(mut self, require: bool) -> Self {
        self.policy.urls.force_no_referrer = require;
        self
    }

    /// Set `target="_blank"` and merge `noopener` into `rel` on link elements
    /// whose URL names a host.
    pub fn add_target_blank_to_fully_qualified_links(mut self, add: bool) -> Self {
        self.policy.urls.target_blank = add;
        self
    }

    /// Replace the set of elements that receive link hardening
    /// (default: `a`, `area`, `link`).
    pub fn no_follow_elements<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.urls.link_elements = elements.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the set of elements whose content the walker discards when
    /// the element itself is rejected.
    pub fn skip_elements_content<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.skip_content = elements.into_iter().map(Into::into).collect();
        self
    }

    /// Validate the configuration and freeze it into a [`Policy`].
    pub fn try_build(self) -> Result<Policy> {
        if !self.problems.is_empty() {
            return Err(PolicyError::Config(self.problems.join("; ")));
        }

        let policy = self.policy;
        if !policy.global_attrs.is_empty()
            && policy.elements.is_empty()
            && policy.element_attrs.is_empty()
        {
            tracing::warn!(
                "Policy has {} global attribute rules but admits no elements",
                policy.global_attrs.len()
            );
        }
        tracing::debug!(
            "Built policy: {} elements, {} attribute rules, URL validation {}",
            policy.admissible_elements().len(),
            policy.attribute_rule_count(),
            if policy.urls.is_active() { "on" } else { "off" }
        );
        Ok(policy)
    }

    /// Consume the builder and return the [`Policy`].
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid. Use
    /// [`try_build`](Self::try_build) for a fallible alternative.
    pub fn build(self) -> Policy {
        self.try_build().unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An attribute rule under construction, returned by
/// [`PolicyBuilder::allow_attrs`].
#[must_use = "finish the rule with `on_elements` or `globally`"]
pub struct AttrRuleBuilder {
    builder: PolicyBuilder,
    attributes: Vec<String>,
    matcher: Option<SharedMatcher>,
}

impl AttrRuleBuilder {
    /// Validate values with `matcher`. Without a matcher any value is accepted.
    pub fn matching(mut self, matcher: SharedMatcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Validate values against a full-match regular expression.
    pub fn matching_pattern(self, pattern: &str) -> Result<Self> {
        let matcher = RegexMatcher::try_new(pattern)?;
        Ok(self.matching(Arc::new(matcher)))
    }

    /// Register one rule per attribute on each named element, admitting
    /// those elements.
    pub fn on_elements<I, S>(self, elements: I) -> PolicyBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.finish(Scope::elements(elements))
    }

    /// Register the attributes on every admissible element. This does not
    /// admit any element by itself.
    pub fn globally(self) -> PolicyBuilder {
        self.finish(Scope::Global)
    }

    fn finish(self, scope: Scope) -> PolicyBuilder {
        let Self {
            mut builder,
            attributes,
            matcher,
        } = self;
        for attribute in attributes {
            let rule = AttributeRule::new(attribute, matcher.clone(), scope.clone());
            builder = builder.add_attribute_rule(rule);
        }
        builder
    }
}
