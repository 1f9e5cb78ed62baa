//! Element and attribute rules, the building blocks of a [`Policy`](crate::Policy).

use std::collections::BTreeSet;
use std::fmt;

use crate::matcher::{Matcher, SharedMatcher};

/// Where an [`AttributeRule`] applies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Applies to every admissible element.
    Global,
    /// Applies only to the named elements.
    Elements(BTreeSet<String>),
}

impl Scope {
    /// Scope covering the given element names.
    pub fn elements<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scope::Elements(names.into_iter().map(Into::into).collect())
    }
}

/// Declares an element admissible, independent of any attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRule {
    name: String,
}

impl ElementRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Binds an attribute name to an optional value [`Matcher`] and a [`Scope`].
///
/// A rule without a matcher accepts any value. Attribute names are compared
/// exactly as declared; register lower-case names to match parsed HTML.
#[derive(Clone)]
pub struct AttributeRule {
    attribute: String,
    matcher: Option<SharedMatcher>,
    scope: Scope,
}

impl AttributeRule {
    pub fn new(attribute: impl Into<String>, matcher: Option<SharedMatcher>, scope: Scope) -> Self {
        Self {
            attribute: attribute.into(),
            matcher,
            scope,
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn matcher(&self) -> Option<&SharedMatcher> {
        self.matcher.as_ref()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Run the rule's matcher, accepting any value when there is none.
    pub fn test(&self, value: &str) -> Option<String> {
        match &self.matcher {
            Some(m) => m.test(value),
            None => Some(value.to_string()),
        }
    }

    /// Copy of this rule narrowed to a single element.
    pub(crate) fn for_element(&self, element: &str) -> Self {
        Self {
            attribute: self.attribute.clone(),
            matcher: self.matcher.clone(),
            scope: Scope::elements([element]),
        }
    }
}

impl fmt::Debug for AttributeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeRule")
            .field("attribute", &self.attribute)
            .field("has_matcher", &self.matcher.is_some())
            .field("scope", &self.scope)
            .finish()
    }
}
