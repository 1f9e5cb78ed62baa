//! Reference tree walker that applies a [`Policy`] to an HTML fragment.
//!
//! The fragment is parsed with `scraper` and serialized back node by node.
//! Rejected elements are unwrapped (their children are kept) unless they are
//! skip-content elements such as `script`, whose whole subtree is dropped.
//! Comments, doctypes and processing instructions never survive. Attributes
//! are emitted sorted by name.

use scraper::{Html, node::Node};

use crate::policy::{Decision, Policy};

/// HTML5 void elements that must not have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

impl Policy {
    /// Sanitize an HTML fragment, returning markup that contains only what
    /// this policy admits.
    ///
    /// # Example
    ///
    /// ```
    /// use html_allowlist::PolicyBuilder;
    ///
    /// let policy = PolicyBuilder::new()
    ///     .allow_elements(["b"])
    ///     .allow_standard_urls()
    ///     .allow_attrs(["href"])
    ///     .on_elements(["a"])
    ///     .build();
    ///
    /// let html = r#"<a href="/docs" onclick="steal()">Read <b>me</b></a><script>x()</script>"#;
    /// assert_eq!(
    ///     policy.sanitize(html),
    ///     r#"<a href="/docs" rel="nofollow">Read <b>me</b></a>"#
    /// );
    /// ```
    pub fn sanitize(&self, html: &str) -> String {
        let document = Html::parse_fragment(html);
        let mut out = String::with_capacity(html.len());
        // Fragments are parsed under a synthetic <html> root.
        for child in document.root_element().children() {
            self.serialize_node(child, &mut out);
        }
        out
    }

    fn serialize_node(&self, node: ego_tree::NodeRef<Node>, out: &mut String) {
        match node.value() {
            Node::Element(el) => {
                let tag = el.name();

                if !self.is_element_admissible(tag) {
                    if self.skips_content(tag) {
                        tracing::trace!("Dropped <{tag}> with its content");
                    } else {
                        for child in node.children() {
                            self.serialize_node(child, out);
                        }
                    }
                    return;
                }

                let mut attrs = self.sanitize_attributes(tag, el.attrs());
                // The parser does not guarantee attribute order.
                attrs.sort_by(|a, b| a.0.cmp(&b.0));

                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(&name);
                    out.push_str("=\"");
                    escape_into(&value, true, out);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }

                for child in node.children() {
                    self.serialize_node(child, out);
                }

                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            Node::Text(text) => {
                escape_into(&**text, false, out);
            }
            // `<template>` contents live under a fragment node.
            Node::Fragment => {
                for child in node.children() {
                    self.serialize_node(child, out);
                }
            }
            _ => {}
        }
    }

    /// Evaluate every attribute of `element` and merge in the attributes
    /// injected by the URL policy. Source order is preserved; injected
    /// attributes that are not already present are appended.
    pub fn sanitize_attributes<'a>(
        &self,
        element: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Vec<(String, String)> {
        let mut kept: Vec<(String, String)> = Vec::new();
        let mut injected = Vec::new();

        for (name, value) in attrs {
            if let Decision::Keep(k) = self.evaluate(element, name, value) {
                kept.push((name.to_string(), k.value));
                injected.extend(k.inject);
            }
        }

        for attr in injected {
            match kept.iter_mut().find(|(name, _)| name == attr.name()) {
                Some((_, value)) => {
                    let merged = attr.apply(Some(value.as_str()));
                    *value = merged;
                }
                None => kept.push((attr.name().to_string(), attr.apply(None))),
            }
        }
        kept
    }
}

fn escape_into(s: &str, in_attribute: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&#34;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
