use std::sync::Arc;
use std::thread;

use html_allowlist::matcher::library;
use html_allowlist::{
    AttributeRule, Decision, FnMatcher, KeywordMatcher, Matcher, Policy, PolicyBuilder,
    PolicyError, RegexMatcher, Rejection, Scope, SharedMatcher, strict_policy, ugc_policy,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The builder sequence used by most tests: a small blog-comment policy.
fn comment_builder() -> PolicyBuilder {
    PolicyBuilder::new()
        .allow_elements(["p", "b", "i", "em", "strong", "blockquote"])
        .allow_standard_attributes()
        .allow_standard_urls()
        .allow_attrs(["href"])
        .on_elements(["a"])
        .allow_images()
        .allow_lists()
        .allow_tables()
}

fn comment_policy() -> Policy {
    comment_builder().build()
}

/// A representative sample of hostile and benign attribute values.
const SAMPLE_VALUES: &[&str] = &[
    "",
    "0",
    "2",
    "two",
    "-1",
    "50%",
    "left",
    "CENTER",
    "rtl",
    "nowrap",
    "intro",
    "en",
    "Hello, world!",
    "<script>alert(1)</script>",
    "\"><img src=x onerror=alert(1)>",
    "javascript:alert(1)",
    "http://example.com",
    "/relative/path",
    "2014-05-20T10:00:00Z",
    "h1 h2",
];

/// Every (element, attribute, matcher) registered by `comment_builder`
/// through an element-scoped rule with a value matcher.
fn scoped_rules() -> Vec<(&'static str, &'static str, SharedMatcher)> {
    vec![
        ("img", "align", library::image_align()),
        ("img", "alt", library::paragraph()),
        ("img", "width", library::number_or_percent()),
        ("li", "type", library::list_type()),
        ("li", "value", library::integer()),
        ("ol", "type", library::list_type()),
        ("td", "colspan", library::integer()),
        ("th", "rowspan", library::integer()),
        ("td", "headers", library::names_and_spaces()),
        ("th", "scope", library::table_scope()),
        ("td", "nowrap", library::nowrap()),
        ("col", "span", library::integer()),
        ("tr", "valign", library::cell_vertical_align()),
        ("tfoot", "align", library::cell_align()),
        ("table", "summary", library::paragraph()),
    ]
}

// ---------------------------------------------------------------------------
// Matcher agreement
// ---------------------------------------------------------------------------

#[test]
fn evaluate_agrees_with_matcher_in_isolation() {
    let policy = comment_policy();
    for (element, attribute, matcher) in scoped_rules() {
        for value in SAMPLE_VALUES {
            let expected = matcher.test(value);
            let decision = policy.evaluate(element, attribute, value);
            assert_eq!(
                decision.value(),
                expected.as_deref(),
                "{element}.{attribute}={value:?}"
            );
            if expected.is_none() {
                assert_eq!(decision.rejection(), Some(Rejection::Value));
            }
        }
    }
}

#[test]
fn global_rules_agree_with_matcher_on_admitted_elements() {
    let policy = comment_policy();
    let globals = [
        ("dir", library::direction()),
        ("lang", library::language()),
        ("id", library::identifier()),
        ("title", library::paragraph()),
    ];
    for element in ["p", "td", "img", "li"] {
        for (attribute, matcher) in &globals {
            for value in SAMPLE_VALUES {
                assert_eq!(
                    policy.evaluate(element, attribute, value).value(),
                    matcher.test(value).as_deref(),
                    "{element}.{attribute}={value:?}"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scope and precedence
// ---------------------------------------------------------------------------

#[test]
fn scoped_rule_wins_over_global_even_when_global_would_accept() {
    let policy = PolicyBuilder::new()
        .allow_elements(["p", "div"])
        .allow_attrs(["data-kind"])
        .matching(Arc::new(RegexMatcher::new("[a-z]+")))
        .globally()
        .allow_attrs(["data-kind"])
        .matching(Arc::new(RegexMatcher::new("[0-9]+")))
        .on_elements(["p"])
        .build();

    // Global matcher accepts "abc", but the scoped rule on p does not.
    assert_eq!(
        policy.evaluate("p", "data-kind", "abc"),
        Decision::Drop(Rejection::Value)
    );
    assert_eq!(policy.evaluate("p", "data-kind", "123").value(), Some("123"));
    // Other elements fall back to the global rule.
    assert_eq!(policy.evaluate("div", "data-kind", "abc").value(), Some("abc"));
    assert_eq!(
        policy.evaluate("div", "data-kind", "123"),
        Decision::Drop(Rejection::Value)
    );
}

#[test]
fn precedence_does_not_depend_on_registration_order() {
    let scoped_first = PolicyBuilder::new()
        .allow_attrs(["align"])
        .matching(library::cell_align())
        .on_elements(["td"])
        .allow_attrs(["align"])
        .matching(library::image_align())
        .globally()
        .allow_elements(["p"])
        .build();
    let global_first = PolicyBuilder::new()
        .allow_elements(["p"])
        .allow_attrs(["align"])
        .matching(library::image_align())
        .globally()
        .allow_attrs(["align"])
        .matching(library::cell_align())
        .on_elements(["td"])
        .build();

    for policy in [&scoped_first, &global_first] {
        assert!(policy.evaluate("td", "align", "justify").is_keep());
        assert!(!policy.evaluate("td", "align", "absmiddle").is_keep());
        assert!(policy.evaluate("p", "align", "absmiddle").is_keep());
        assert!(!policy.evaluate("p", "align", "justify").is_keep());
    }
}

#[test]
fn attribute_rules_admit_elements_but_global_rules_do_not() {
    let policy = PolicyBuilder::new()
        .allow_attrs(["title"])
        .matching(library::paragraph())
        .globally()
        .allow_attrs(["cite"])
        .on_elements(["q"])
        .build();

    assert!(policy.is_element_admissible("q"));
    assert!(!policy.is_element_admissible("p"));
    // The global title applies to q because q is admitted by another rule.
    assert!(policy.evaluate("q", "title", "A quote").is_keep());
    assert_eq!(
        policy.evaluate("p", "title", "A quote"),
        Decision::Drop(Rejection::Element)
    );
}

#[test]
fn unknown_attribute_is_dropped_regardless_of_value() {
    let policy = comment_policy();
    for value in SAMPLE_VALUES {
        assert_eq!(
            policy.evaluate("p", "onclick", value),
            Decision::Drop(Rejection::Attribute)
        );
        assert_eq!(
            policy.evaluate("td", "style", value),
            Decision::Drop(Rejection::Attribute)
        );
    }
}

#[test]
fn attribute_names_are_case_sensitive_as_declared() {
    let policy = PolicyBuilder::new()
        .allow_attrs(["colspan"])
        .matching(library::integer())
        .on_elements(["td"])
        .build();
    assert!(policy.evaluate("td", "colspan", "2").is_keep());
    assert_eq!(
        policy.evaluate("td", "COLSPAN", "2").rejection(),
        Some(Rejection::Attribute)
    );
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[test]
fn builder_sequence_applied_twice_is_equivalent() {
    let once = comment_policy();
    let twice = comment_builder()
        .allow_elements(["p", "b", "i", "em", "strong", "blockquote"])
        .allow_standard_attributes()
        .allow_standard_urls()
        .allow_attrs(["href"])
        .on_elements(["a"])
        .allow_images()
        .allow_lists()
        .allow_tables()
        .build();

    assert_eq!(once.attribute_rule_count(), twice.attribute_rule_count());
    assert_eq!(once.admissible_elements(), twice.admissible_elements());
    assert_eq!(once.url_policy(), twice.url_policy());

    let elements: Vec<&str> = once.admissible_elements().into_iter().collect();
    for element in elements.iter().copied().chain(["script", "div"]) {
        for attribute in ["href", "src", "colspan", "title", "type", "nowrap", "onclick"] {
            for value in SAMPLE_VALUES {
                assert_eq!(
                    once.evaluate(element, attribute, value),
                    twice.evaluate(element, attribute, value),
                    "{element}.{attribute}={value:?}"
                );
            }
        }
    }
}

#[test]
fn explicit_rules_last_write_wins() {
    let policy = PolicyBuilder::new()
        .add_attribute_rule(AttributeRule::new(
            "type",
            Some(Arc::new(KeywordMatcher::new(["disc"]))),
            Scope::elements(["ul"]),
        ))
        .add_attribute_rule(AttributeRule::new(
            "type",
            Some(Arc::new(KeywordMatcher::new(["square"]))),
            Scope::elements(["ul"]),
        ))
        .build();
    assert_eq!(policy.attribute_rule_count(), 1);
    assert!(policy.evaluate("ul", "type", "square").is_keep());
    assert!(!policy.evaluate("ul", "type", "disc").is_keep());
}

// ---------------------------------------------------------------------------
// URL admission
// ---------------------------------------------------------------------------

#[test]
fn javascript_urls_are_dropped() {
    let policy = comment_policy();
    for url in [
        "javascript:alert(1)",
        "JAVASCRIPT:alert(1)",
        "  javascript:alert(1)",
        "java\tscript:alert(1)",
        "vbscript:msgbox(1)",
        "data:text/html,<script>alert(1)</script>",
    ] {
        assert_eq!(
            policy.evaluate("a", "href", url),
            Decision::Drop(Rejection::Value),
            "{url:?}"
        );
    }
}

#[test]
fn relative_url_kept_with_nofollow() {
    let decision = comment_policy().evaluate("a", "href", "/path");
    assert_eq!(decision.value(), Some("/path"));
    let rel = &decision.injected()[0];
    assert_eq!(rel.name(), "rel");
    assert!(rel.value().split(' ').any(|t| t == "nofollow"));
}

#[test]
fn absolute_url_kept_with_nofollow() {
    let decision = comment_policy().evaluate("a", "href", "http://example.com");
    assert_eq!(decision.value(), Some("http://example.com"));
    assert_eq!(decision.injected().len(), 1);
    assert_eq!(decision.injected()[0].value(), "nofollow");
    assert_eq!(decision.injected()[0].apply(Some("external")), "external nofollow");
}

#[test]
fn mailto_allowed_other_schemes_rejected() {
    let policy = comment_policy();
    assert!(policy.evaluate("a", "href", "mailto:someone@example.com").is_keep());
    assert!(!policy.evaluate("a", "href", "ftp://example.com/file").is_keep());
    assert!(!policy.evaluate("img", "src", "file:///etc/passwd").is_keep());
}

#[test]
fn relative_only_policy_rejects_every_absolute_url() {
    let policy = PolicyBuilder::new()
        .require_parseable_urls(true)
        .allow_relative_urls(true)
        .allow_attrs(["href"])
        .on_elements(["a"])
        .build();
    assert!(policy.evaluate("a", "href", "docs/index.html").is_keep());
    assert!(policy.evaluate("a", "href", "#section").is_keep());
    assert!(!policy.evaluate("a", "href", "https://example.com").is_keep());
    assert!(!policy.evaluate("a", "href", "mailto:x@example.com").is_keep());
}

#[test]
fn custom_url_schemes() {
    let policy = PolicyBuilder::new()
        .require_parseable_urls(true)
        .allow_url_schemes(["https", "tel"])
        .allow_attrs(["href"])
        .on_elements(["a"])
        .build();
    assert!(policy.evaluate("a", "href", "tel:+15555550100").is_keep());
    assert!(policy.evaluate("a", "href", "https://example.com").is_keep());
    assert!(!policy.evaluate("a", "href", "http://example.com").is_keep());
    assert!(!policy.evaluate("a", "href", "/relative").is_keep());
}

#[test]
fn url_matcher_runs_before_url_policy() {
    let only_example = FnMatcher::new(|v: &str| v.contains("example.com").then(|| v.to_string()));
    let policy = PolicyBuilder::new()
        .allow_standard_urls()
        .allow_attrs(["href"])
        .matching(Arc::new(only_example))
        .on_elements(["a"])
        .build();
    assert!(policy.evaluate("a", "href", "https://example.com/x").is_keep());
    assert!(!policy.evaluate("a", "href", "https://other.org/x").is_keep());
    assert!(!policy.evaluate("a", "href", "javascript:example.com").is_keep());
}

#[test]
fn link_hardening_options() {
    let policy = PolicyBuilder::new()
        .allow_standard_urls()
        .require_no_referrer_on_links(true)
        .add_target_blank_to_fully_qualified_links(true)
        .allow_attrs(["href"])
        .on_elements(["a", "area"])
        .build();

    let external = policy.evaluate("area", "href", "https://example.com");
    let names: Vec<&str> = external.injected().iter().map(|a| a.name()).collect();
    assert_eq!(names, ["rel", "target"]);
    assert_eq!(external.injected()[0].value(), "nofollow noreferrer noopener");

    let local = policy.evaluate("a", "href", "/local");
    assert_eq!(local.injected().len(), 1);
    assert_eq!(local.injected()[0].value(), "nofollow noreferrer");
}

// ---------------------------------------------------------------------------
// Built-in matchers
// ---------------------------------------------------------------------------

#[test]
fn iso8601_examples() {
    let m = library::iso8601();
    assert!(m.test("2014-05-20T10:00:00Z").is_some());
    assert!(m.test("2014").is_some());
    assert!(m.test("2014-13-40").is_none());
}

#[test]
fn free_text_never_admits_angle_brackets() {
    let m = library::paragraph();
    for value in ["<", ">", "a<b", "a>b", "<b>bold</b>", "text > more", "</title>"] {
        assert!(m.test(value).is_none(), "{value:?}");
    }
    assert!(m.test("Plain caption text, (c) 2014").is_some());
}

#[test]
fn table_matrix_examples() {
    let policy = comment_policy();
    assert_eq!(
        policy.evaluate("td", "colspan", "2"),
        Decision::Keep(html_allowlist::Kept {
            value: "2".to_string(),
            inject: Vec::new(),
        })
    );
    assert_eq!(
        policy.evaluate("td", "colspan", "two"),
        Decision::Drop(Rejection::Value)
    );
}

#[test]
fn custom_matcher_errors_degrade_to_reject() {
    let hex = FnMatcher::fallible(|v: &str| u32::from_str_radix(v, 16).map(|n| format!("{n:x}")));
    let policy = PolicyBuilder::new()
        .allow_attrs(["data-colour"])
        .matching(Arc::new(hex))
        .on_elements(["span"])
        .build();
    assert_eq!(policy.evaluate("span", "data-colour", "FF00").value(), Some("ff00"));
    assert_eq!(
        policy.evaluate("span", "data-colour", "zz"),
        Decision::Drop(Rejection::Value)
    );
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[test]
fn bad_pattern_fails_at_build_time() {
    let err = PolicyBuilder::new()
        .allow_attrs(["x"])
        .matching_pattern("[unclosed")
        .err();
    assert!(matches!(err, Some(PolicyError::InvalidPattern { .. })));
    assert!(RegexMatcher::try_new("(?P<").is_err());
}

#[test]
fn bad_scheme_fails_at_build_time() {
    let err = PolicyBuilder::new()
        .allow_url_schemes(["http", "://"])
        .try_build()
        .unwrap_err();
    assert!(err.to_string().contains("invalid URL scheme"));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_readers_see_identical_decisions() {
    let policy = Arc::new(ugc_policy());
    let expected: Vec<Decision> = SAMPLE_VALUES
        .iter()
        .map(|v| policy.evaluate("a", "href", v))
        .collect();

    thread::scope(|s| {
        for _ in 0..8 {
            let policy = Arc::clone(&policy);
            let expected = &expected;
            s.spawn(move || {
                for _ in 0..50 {
                    let got: Vec<Decision> = SAMPLE_VALUES
                        .iter()
                        .map(|v| policy.evaluate("a", "href", v))
                        .collect();
                    assert_eq!(&got, expected);
                }
            });
        }
    });
}

#[test]
fn global_policy_singleton() {
    assert!(html_allowlist::global().is_none());
    let installed = html_allowlist::init(strict_policy());
    assert!(installed.admissible_elements().is_empty());
    assert!(std::ptr::eq(installed, html_allowlist::global().unwrap()));
}

// ---------------------------------------------------------------------------
// End-to-end sanitization
// ---------------------------------------------------------------------------

#[test]
fn e2e_comment_sanitization() {
    let html = concat!(
        r#"<p id="c1" onmouseover="steal()">Nice post! "#,
        r#"<a href="https://example.com/more" rel="author">More</a> "#,
        r#"<a href="javascript:alert(1)">click</a></p>"#,
        r#"<script>document.cookie</script>"#,
        r#"<img src="data:image/png;base64,AAAA" alt="pixel">"#,
        r#"<ul type="disc"><li value="1">one</li></ul>"#,
    );
    let out = comment_policy().sanitize(html);
    assert_eq!(
        out,
        concat!(
            r#"<p id="c1">Nice post! "#,
            r#"<a href="https://example.com/more" rel="nofollow">More</a> "#,
            r#"<a>click</a></p>"#,
            r#"<img alt="pixel">"#,
            r#"<ul type="disc"><li value="1">one</li></ul>"#,
        )
    );
}

#[test]
fn e2e_ugc_keeps_existing_rel_tokens() {
    let out = ugc_policy().sanitize(r#"<a href="/x" rel="author">x</a>"#);
    assert_eq!(out, r#"<a href="/x" rel="author nofollow">x</a>"#);
}

#[test]
fn e2e_strict_policy_strips_all_markup() {
    let html = r#"<b>bold</b> <i onclick="x()">text</i><script>x()</script>"#;
    let out = strict_policy().sanitize(html);
    assert_eq!(out, "bold text");
}
