//! Composite helpers: fixed sequences of primitive builder calls for common
//! groups of elements and attributes.

use crate::config::PolicyBuilder;
use crate::matcher::library::{
    cell_align, cell_vertical_align, direction, identifier, image_align, integer, language,
    list_type, names_and_spaces, nowrap, number_or_percent, paragraph, table_scope,
};

impl PolicyBuilder {
    /// Require parseable URLs that are either relative or use the `mailto`,
    /// `http` or `https` scheme, and add `rel="nofollow"` to `a`, `area` and
    /// `link`.
    pub fn allow_standard_urls(self) -> Self {
        self.require_parseable_urls(true)
            .allow_relative_urls(true)
            .allow_url_schemes(["mailto", "http", "https"])
            .require_no_follow_on_links(true)
    }

    /// Allow `dir`, `lang`, `id` and `title` on every admissible element.
    pub fn allow_standard_attributes(self) -> Self {
        self.allow_attrs(["dir"])
            .matching(direction())
            .globally()
            .allow_attrs(["lang"])
            .matching(language())
            .globally()
            .allow_attrs(["id"])
            .matching(identifier())
            .globally()
            .allow_attrs(["title"])
            .matching(paragraph())
            .globally()
    }

    /// Allow `img` with `align`, `alt`, `height`, `width` and a `src` that
    /// passes the standard URL policy. Data URIs are therefore rejected.
    pub fn allow_images(self) -> Self {
        self.allow_attrs(["align"])
            .matching(image_align())
            .on_elements(["img"])
            .allow_attrs(["alt"])
            .matching(paragraph())
            .on_elements(["img"])
            .allow_attrs(["height", "width"])
            .matching(number_or_percent())
            .on_elements(["img"])
            .allow_standard_urls()
            .allow_attrs(["src"])
            .on_elements(["img"])
    }

    /// Allow ordered, unordered and definition lists.
    pub fn allow_lists(self) -> Self {
        self.allow_attrs(["type"])
            .matching(list_type())
            .on_elements(["ol", "ul"])
            .allow_attrs(["type"])
            .matching(list_type())
            .on_elements(["li"])
            .allow_attrs(["value"])
            .matching(integer())
            .on_elements(["li"])
            .allow_elements(["dl", "dt", "dd"])
    }

    /// Allow tables with their structural elements and presentational
    /// attributes.
    pub fn allow_tables(self) -> Self {
        self
            // table
            .allow_attrs(["height", "width"])
            .matching(number_or_percent())
            .on_elements(["table"])
            .allow_attrs(["summary"])
            .matching(paragraph())
            .on_elements(["table"])
            // caption
            .allow_elements(["caption"])
            // col, colgroup
            .allow_attrs(["align"])
            .matching(cell_align())
            .on_elements(["col", "colgroup"])
            .allow_attrs(["height", "width"])
            .matching(number_or_percent())
            .on_elements(["col", "colgroup"])
            .allow_attrs(["span"])
            .matching(integer())
            .on_elements(["colgroup", "col"])
            .allow_attrs(["valign"])
            .matching(cell_vertical_align())
            .on_elements(["col", "colgroup"])
            // thead, tr
            .allow_attrs(["align"])
            .matching(cell_align())
            .on_elements(["thead", "tr"])
            .allow_attrs(["valign"])
            .matching(cell_vertical_align())
            .on_elements(["thead", "tr"])
            // td, th
            .allow_attrs(["abbr"])
            .matching(paragraph())
            .on_elements(["td", "th"])
            .allow_attrs(["align"])
            .matching(cell_align())
            .on_elements(["td", "th"])
            .allow_attrs(["colspan", "rowspan"])
            .matching(integer())
            .on_elements(["td", "th"])
            .allow_attrs(["headers"])
            .matching(names_and_spaces())
            .on_elements(["td", "th"])
            .allow_attrs(["height", "width"])
            .matching(number_or_percent())
            .on_elements(["td", "th"])
            .allow_attrs(["scope"])
            .matching(table_scope())
            .on_elements(["td", "th"])
            .allow_attrs(["valign"])
            .matching(cell_vertical_align())
            .on_elements(["td", "th"])
            .allow_attrs(["nowrap"])
            .matching(nowrap())
            .on_elements(["td", "th"])
            // tbody, tfoot
            .allow_attrs(["align"])
            .matching(cell_align())
            .on_elements(["tbody", "tfoot"])
            .allow_attrs(["valign"])
            .matching(cell_vertical_align())
            .on_elements(["tbody", "tfoot"])
    }
}
