use commentq_shared::errors::Error;
use commentq_shared::types::Result;
use log::trace;
use std::fmt::{Display, Formatter};

/// Maximum number of positional arguments a comment query accepts
pub const MAX_ARGUMENTS: usize = 3;

/// A loosely typed positional argument of a comment query
#[derive(Clone, Debug, PartialEq)]
pub enum Argument {
    String(String),
    Bool(bool),
    Number(f64),
}

impl Default for Argument {
    fn default() -> Self {
        Self::String(String::new())
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Argument {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl Argument {
    /// Truthiness: empty strings, `false`, zero and NaN are falsy, everything else is truthy
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::String(value) => !value.is_empty(),
            Self::Bool(value) => *value,
            Self::Number(value) => *value != 0.0 && !value.is_nan(),
        }
    }

    /// The string value, None for booleans and numbers
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Numeric value of the argument. Strings are converted with `string_to_number`.
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Self::String(value) => string_to_number(value),
            Self::Bool(value) => f64::from(u8::from(*value)),
            Self::Number(value) => *value,
        }
    }

    /// Loose equality between an attribute value and this argument. Strings compare verbatim,
    /// numbers and booleans compare numerically against the attribute converted to a number. A
    /// missing attribute never matches.
    #[must_use]
    pub fn loose_equals(&self, attribute: Option<&str>) -> bool {
        let Some(attribute) = attribute else {
            return false;
        };

        match self {
            Self::String(value) => value == attribute,
            Self::Bool(_) | Self::Number(_) => string_to_number(attribute) == self.to_number(),
        }
    }
}

impl Display for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{}", number_to_string(*value)),
        }
    }
}

/// Whitespace and line terminators as loosely typed string handling sees them. Unlike
/// `char::is_whitespace` this excludes U+0085 and includes the byte order mark.
#[must_use]
pub fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{b}'
            | '\u{c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Converts a string to a number the way loosely typed comparisons do: surrounding whitespace
/// is ignored, an empty string is zero, `0x`/`0o`/`0b` prefixes select the radix and `Infinity`
/// is accepted. Anything else that is not a decimal literal is NaN.
#[must_use]
pub fn string_to_number(value: &str) -> f64 {
    let value = value.trim_matches(is_js_whitespace);
    if value.is_empty() {
        return 0.0;
    }

    match value {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = value.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }

    let is_decimal_literal = value.chars().any(|c| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !is_decimal_literal {
        return f64::NAN;
    }

    value.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }

    let mut result = 0.0;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            return f64::NAN;
        };
        result = result * f64::from(radix) + f64::from(digit);
    }

    result
}

fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
            _ => formatted,
        };
    }

    value.to_string()
}

/// The canonical form of a loosely typed argument list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedArguments {
    /// Search into element subtrees
    pub deep: bool,
    /// Pseudo-attribute name, empty when not searching by attribute
    pub name: String,
    /// Attribute value or comment text
    pub value: Argument,
}

/// Falsy names mean "no attribute", other names are used by their string form
fn name_from(argument: &Argument) -> String {
    if argument.is_truthy() {
        argument.to_string()
    } else {
        String::new()
    }
}

/// Resolves a list of up to three positional arguments into the canonical form.
///
/// A trailing boolean (exactly `true` or `false`) is the deep flag when there are fewer than
/// three arguments. What remains is read as `(value)` or `(name, value)`. With three arguments
/// the list is always `(name, value, deep)` and the third argument is converted by truthiness.
pub fn normalize_arguments(arguments: &[Argument]) -> Result<NormalizedArguments> {
    if arguments.len() > MAX_ARGUMENTS {
        return Err(Error::ArgumentCount(arguments.len()).into());
    }

    let normalized = match arguments {
        [] => NormalizedArguments::default(),
        [name, value, deep] => NormalizedArguments {
            deep: deep.is_truthy(),
            name: name_from(name),
            value: value.clone(),
        },
        [rest @ .., Argument::Bool(deep)] => match rest {
            [value] => NormalizedArguments {
                deep: *deep,
                name: String::new(),
                value: value.clone(),
            },
            _ => NormalizedArguments {
                deep: *deep,
                ..NormalizedArguments::default()
            },
        },
        [value] => NormalizedArguments {
            value: value.clone(),
            ..NormalizedArguments::default()
        },
        [name, value] => NormalizedArguments {
            deep: false,
            name: name_from(name),
            value: value.clone(),
        },
        // more than three arguments is rejected above
        _ => return Err(Error::ArgumentCount(arguments.len()).into()),
    };

    trace!("normalized {} argument(s) into {normalized:?}", arguments.len());

    Ok(normalized)
}
