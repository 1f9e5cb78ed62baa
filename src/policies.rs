//! Ready-made policies.

use std::sync::Arc;

use crate::config::PolicyBuilder;
use crate::matcher::KeywordMatcher;
use crate::matcher::library::{direction, iso8601, names_and_spaces, number};
use crate::policy::Policy;

/// A policy that admits no elements: every tag is stripped and only text
/// survives.
pub fn strict_policy() -> Policy {
    PolicyBuilder::new().build()
}

/// A policy for user-generated content such as comments and forum posts.
///
/// Admits common inline and block formatting, links, images, lists and
/// tables. URLs must be relative or `mailto`/`http`/`https`, and links get
/// `rel="nofollow"`. No `style`, `class` or event handler attributes.
pub fn ugc_policy() -> Policy {
    ugc_builder().build()
}

/// The builder behind [`ugc_policy`], for callers who want to extend it.
pub fn ugc_builder() -> PolicyBuilder {
    PolicyBuilder::new()
        .allow_standard_attributes()
        .allow_standard_urls()
        // links
        .allow_attrs(["href"])
        .on_elements(["a"])
        .allow_attrs(["rel"])
        .matching(names_and_spaces())
        .on_elements(["a"])
        // quotations and edits may cite a source
        .allow_attrs(["cite"])
        .on_elements(["blockquote", "q", "del", "ins"])
        .allow_attrs(["datetime"])
        .matching(iso8601())
        .on_elements(["del", "ins", "time"])
        // bidirectional override needs a direction
        .allow_attrs(["dir"])
        .matching(direction())
        .on_elements(["bdi", "bdo"])
        .allow_attrs(["open"])
        .matching(Arc::new(KeywordMatcher::new(["", "open"])))
        .on_elements(["details"])
        .allow_attrs(["value", "min", "max", "low", "high", "optimum"])
        .matching(number())
        .on_elements(["meter"])
        .allow_attrs(["value", "max"])
        .matching(number())
        .on_elements(["progress"])
        .allow_elements([
            // sections
            "article", "aside", "footer", "header", "nav", "section", "summary",
            "h1", "h2", "h3", "h4", "h5", "h6", "hgroup",
            // grouping
            "blockquote", "br", "div", "figcaption", "figure", "hr", "p", "pre", "wbr",
            // text-level semantics
            "abbr", "acronym", "b", "cite", "code", "dfn", "em", "i", "kbd", "mark", "rp", "rt",
            "ruby", "s", "samp", "small", "span", "strike", "strong", "sub", "sup", "tt", "u",
            "var",
        ])
        .allow_images()
        .allow_lists()
        .allow_tables()
}
