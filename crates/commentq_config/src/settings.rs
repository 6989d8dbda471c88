use crate::errors::Error;
use core::fmt::Display;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A setting value. Settings are encoded as `<type>:<value>` strings, so they can be stored in
/// any storage that can hold strings:
///
///   b:true
///   s:hello world
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Setting {
    String(String),
    Bool(bool),
}

impl Setting {
    #[must_use]
    pub fn to_bool(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::String(value) => {
                warn!("setting is not a boolean");
                is_bool_value(value)
            }
        }
    }

    /// Returns the bare value without the type prefix
    #[must_use]
    pub fn value_string(&self) -> String {
        match self {
            Self::String(value) => value.clone(),
            Self::Bool(value) => value.to_string(),
        }
    }

    /// Single character type prefix used in the string encoding
    #[must_use]
    pub fn type_prefix(&self) -> &'static str {
        match self {
            Self::String(_) => "s",
            Self::Bool(_) => "b",
        }
    }
}

fn is_bool_value(s: &str) -> bool {
    ["yes", "on", "true", "1"]
        .iter()
        .any(|candidate| s.trim().eq_ignore_ascii_case(candidate))
}

impl Serialize for Setting {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Setting {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value)
            .map_err(|err| serde::de::Error::custom(format!("cannot deserialize: {err}")))
    }
}

impl Display for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.type_prefix(), self.value_string())
    }
}

impl FromStr for Setting {
    type Err = Error;

    fn from_str(encoded: &str) -> Result<Self, Error> {
        let Some((key_type, key_value)) = encoded.split_once(':') else {
            return Err(Error::Config(format!("missing type prefix: {encoded}")));
        };

        let setting = match key_type {
            "b" => Self::Bool(key_value.parse::<bool>().map_err(|err| parse_error(key_value, err))?),
            "s" => Self::String(key_value.to_string()),
            _ => return Err(Error::Config(format!("unknown setting type: {key_type}"))),
        };

        Ok(setting)
    }
}

fn parse_error(value: &str, err: impl Display) -> Error {
    Error::Config(format!("error parsing {value}: {err}"))
}

/// `SettingInfo` returns information about a given setting
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SettingInfo {
    /// Name of the key in dot notation (ie: query.coerce_types)
    pub key: String,
    /// Description of the setting
    pub description: String,
    /// Default setting if none has been specified
    pub default: Setting,
}
