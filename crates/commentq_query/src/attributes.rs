use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

/// Pseudo-attributes of a comment: lower-cased name to value, in order of first occurrence
pub type AttributeMap = IndexMap<String, String>;

/// Whitespace the way loosely typed string handling sees it, see `is_js_whitespace`
const SPACE: &str = r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

lazy_static! {
    /// `name`, optionally followed by `="value"`, `='value'` or `=value`
    static ref PAIR_PATTERN: Option<Regex> = Regex::new(&format!(
        r#"([a-zA-Z][^={SPACE}]*)(?:[{SPACE}]*=[{SPACE}]*(?:"([^"]*)"|'([^']*)'|([^{SPACE}]+)))?"#
    ))
    .ok();
}

/// Parses the pseudo-attributes in the text of a comment.
///
/// Names are case-insensitive and stored lower-cased, values keep their case. Quoted values run
/// to the next matching quote without escape processing. Names without a value get an empty
/// value. When a name occurs more than once the last value wins, but the name keeps the position
/// of its first occurrence. Fragments that do not look like an attribute are skipped.
#[must_use]
pub fn parse_attributes(text: &str) -> AttributeMap {
    let mut attributes = AttributeMap::new();
    let Some(pattern) = PAIR_PATTERN.as_ref() else {
        return attributes;
    };

    for captures in pattern.captures_iter(text) {
        let Some(name) = captures.get(1) else {
            continue;
        };

        let value = (2..=4)
            .filter_map(|group| captures.get(group))
            .map(|m| m.as_str())
            .find(|value| !value.is_empty())
            .unwrap_or_default();

        attributes.insert(name.as_str().to_lowercase(), value.to_string());
    }

    attributes
}
