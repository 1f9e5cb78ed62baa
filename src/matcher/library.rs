//! Ready-made matchers for common HTML attribute values.
//!
//! Each matcher is built once, on first use, and shared read-only by every
//! policy that references it. The functions return cheap [`SharedMatcher`]
//! clones.
//!
//! All regex-backed matchers here are full-match.

use std::sync::{Arc, LazyLock};

use super::{KeywordMatcher, RegexMatcher, SharedMatcher};

macro_rules! shared {
    ($(#[$meta:meta])* $name:ident, $init:expr) => {
        $(#[$meta])*
        pub fn $name() -> SharedMatcher {
            static MATCHER: LazyLock<SharedMatcher> = LazyLock::new(|| Arc::new($init));
            Arc::clone(&MATCHER)
        }
    };
}

/// Calendar, week and ordinal dates with optional time of day, fractional
/// part and zone offset. The extended (`-`/`:` separated) and basic forms
/// are alternatives, so separators cannot be mixed.
const ISO8601: &str = concat!(
    r"[+-]?[0-9]{4}(?:",
    // extended
    r"-(?:(?:0[1-9]|1[0-2])(?:-(?:0[1-9]|[12][0-9]|3[01]))?",
    r"|W(?:[0-4][0-9]|5[0-2])(?:-[1-7])?",
    r"|(?:00[1-9]|0[1-9][0-9]|[12][0-9]{2}|3(?:[0-5][0-9]|6[0-6])))",
    r"(?:[T\s](?:(?:[01][0-9]|2[0-3])(?::[0-5][0-9](?::[0-5][0-9])?)?(?:[.,][0-9]+)?",
    r"|24(?::00(?::00)?)?)",
    r"(?:[zZ]|[+-](?:[01][0-9]|2[0-3])(?::?[0-5][0-9])?)?)?",
    // basic
    r"|(?:(?:0[1-9]|1[0-2])(?:0[1-9]|[12][0-9]|3[01])",
    r"|W(?:[0-4][0-9]|5[0-2])[1-7]?",
    r"|(?:00[1-9]|0[1-9][0-9]|[12][0-9]{2}|3(?:[0-5][0-9]|6[0-6])))",
    r"(?:[T\s](?:(?:[01][0-9]|2[0-3])(?:[0-5][0-9](?:[0-5][0-9])?)?(?:[.,][0-9]+)?",
    r"|24(?:00(?:00)?)?)",
    r"(?:[zZ]|[+-](?:[01][0-9]|2[0-3])(?::?[0-5][0-9])?)?)?",
    r")?",
);

shared!(
    /// `td`/`th`/`col` horizontal alignment.
    cell_align,
    KeywordMatcher::new(["center", "justify", "left", "right", "char"])
);

shared!(
    /// `td`/`th`/`col` vertical alignment.
    cell_vertical_align,
    KeywordMatcher::new(["baseline", "bottom", "middle", "top"])
);

shared!(
    /// Text direction for `dir`.
    direction,
    KeywordMatcher::new(["rtl", "ltr"])
);

shared!(
    /// Legacy `img` alignment keywords.
    image_align,
    KeywordMatcher::new([
        "left",
        "right",
        "top",
        "texttop",
        "middle",
        "absmiddle",
        "baseline",
        "bottom",
        "absbottom",
    ])
);

shared!(
    /// Non-negative whole number, e.g. `colspan` or `li.value`.
    integer,
    RegexMatcher::new(r"[0-9]+")
);

shared!(
    /// ISO-8601 date or date-time, e.g. `time.datetime`.
    iso8601,
    RegexMatcher::new(ISO8601)
);

shared!(
    /// List marker types for `ol`, `ul` and `li`.
    list_type,
    KeywordMatcher::new(["circle", "disc", "square", "a", "i", "1"])
);

shared!(
    /// Space-separated names such as `class`, `rel` or `headers`.
    names_and_spaces,
    RegexMatcher::new(r"\s*[a-zA-Z0-9\-_$]+(?:\s+[a-zA-Z0-9\-_$]+)*\s*")
);

shared!(
    /// Signed decimal used by `meter` and `progress`.
    number,
    RegexMatcher::new(r"[-+]?[0-9]*\.?[0-9]+")
);

shared!(
    /// Whole number with an optional `%`, used by `width` and `height`.
    number_or_percent,
    RegexMatcher::new(r"[0-9]+%?")
);

shared!(
    /// Free text such as `title` or `alt`.
    ///
    /// Unicode letters, numbers and whitespace plus a small punctuation set.
    /// Characters that could close a tag (`<`, `>`) or an attribute (`"`)
    /// are excluded. The empty string is accepted.
    paragraph,
    RegexMatcher::new(r"[\p{L}\p{N}\s\-_',:\[\]!./\\()&]*")
);

shared!(
    /// Language tag for `lang`: 2 to 20 ASCII letters.
    language,
    RegexMatcher::new(r"[a-zA-Z]{2,20}")
);

shared!(
    /// Single identifier for `id`.
    identifier,
    RegexMatcher::new(r"[a-zA-Z0-9:\-_.]+")
);

shared!(
    /// `th`/`td` header scope.
    table_scope,
    KeywordMatcher::new(["row", "col", "rowgroup", "colgroup"])
);

shared!(
    /// Legacy boolean `nowrap`: either empty or the literal keyword.
    nowrap,
    KeywordMatcher::new(["", "nowrap"])
);
