use crate::arguments::{is_js_whitespace, Argument};
use crate::attributes::parse_attributes;
use commentq_config::config;
use commentq_config::config_store;

/// Options that change how comment values are compared
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare attribute values with loose, type-coercing equality (`"3"` matches `3`). When
    /// false the attribute must equal the string form of the value.
    pub coerce_types: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { coerce_types: true }
    }
}

impl MatchOptions {
    #[must_use]
    pub fn from_config() -> Self {
        Self {
            coerce_types: config!(bool "query.coerce_types"),
        }
    }
}

/// Returns true when the comment text holds the pseudo-attribute `name` with the given value
#[must_use]
pub fn has_attribute(text: &str, name: &str, value: &Argument, options: MatchOptions) -> bool {
    if text.is_empty() {
        return false;
    }

    // Any attribute value appears verbatim in the text, so this avoids parsing most comments.
    let needle = value.to_string();
    if value.is_truthy() && !text.contains(&needle) {
        return false;
    }

    let attributes = parse_attributes(text);
    let actual = attributes.get(&name.to_lowercase()).map(String::as_str);

    if options.coerce_types {
        value.loose_equals(actual)
    } else {
        actual == Some(needle.as_str())
    }
}

/// Returns true when the comment text, without surrounding whitespace, equals the value
#[must_use]
pub fn has_text(text: &str, value: &str) -> bool {
    text.trim_matches(is_js_whitespace) == value
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT: MatchOptions = MatchOptions {
        coerce_types: false,
    };

    fn matches(text: &str, name: &str, value: impl Into<Argument>) -> bool {
        has_attribute(text, name, &value.into(), MatchOptions::default())
    }

    #[test]
    fn attribute_last_wins() {
        assert!(matches("x=1 x=2", "x", "2"));
        assert!(!matches("x=1 x=2", "x", "1"));
    }

    #[test]
    fn attribute_name_is_case_insensitive() {
        assert!(matches(r#" widget Name="Sidebar" "#, "NAME", "Sidebar"));
        assert!(!matches(r#" widget Name="Sidebar" "#, "name", "sidebar"));
    }

    #[test]
    fn empty_text_never_matches() {
        assert!(!matches("", "x", ""));
        assert!(!matches("", "x", "1"));
    }

    #[test]
    fn empty_value_matches_bare_or_empty_attribute() {
        assert!(matches("widget collapsed", "collapsed", ""));
        assert!(matches(r#"widget title="""#, "title", ""));
        assert!(!matches("widget", "collapsed", ""));
    }

    #[test]
    fn missing_value_in_text_short_circuits() {
        assert!(!matches(r#"name="abc""#, "name", "xyz"));
        // the value occurs in the text, but under another name
        assert!(!matches(r#"other="xyz" name="abc""#, "name", "xyz"));
    }

    #[test]
    fn loose_comparison() {
        assert!(matches("width=3", "width", 3));
        assert!(matches("width=3.0", "width", 3));
        assert!(!matches("open=true", "open", true));
        // "true" must occur in the text before values are compared
        assert!(!matches("open=1", "open", true));
        assert!(matches("open=1 true", "open", true));
    }

    #[test]
    fn strict_comparison() {
        assert!(has_attribute("width=3", "width", &Argument::from(3), STRICT));
        assert!(!has_attribute("width=3.0", "width", &Argument::from(3), STRICT));
        assert!(has_attribute("open=true", "open", &Argument::from(true), STRICT));
        assert!(!has_attribute("open=1", "open", &Argument::from(true), STRICT));
        assert!(has_attribute("a=b", "a", &Argument::from("b"), STRICT));
    }

    #[test]
    fn text_is_trimmed_at_both_ends_only() {
        assert!(has_text(" hello  ", "hello"));
        assert!(has_text("\n\thello\r\n", "hello"));
        assert!(!has_text("hello", " hello"));
        assert!(!has_text(" hello  world ", "hello world"));
        assert!(has_text(" hello  world ", "hello  world"));
        assert!(!has_text("Hello", "hello"));
        assert!(has_text("   ", ""));
    }

    #[test]
    fn text_trims_unicode_spaces_but_not_next_line() {
        assert!(has_text("\u{a0}hello\u{3000}", "hello"));
        assert!(has_text("\u{feff}hello\u{2028}", "hello"));
        assert!(!has_text("hello\u{85}", "hello"));
        assert!(has_text("hello\u{85}", "hello\u{85}"));
    }
}
