//! Record data model
//!
//! A [`Record`] is the two-level `section -> key -> value` mapping stored for
//! one entity. Values are scalars only; a key is either present with a
//! [`Value`] or absent. There is no stored null.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Keys of one section mapped to their values
pub type Section = BTreeMap<String, Value>;

/// Sections of one entity. Ordered maps keep the files stable for diffs.
pub type Record = BTreeMap<String, Section>;

/// A scalar setting value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats and integers both read as `f64`
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, used in log lines
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// Look up `record[section][key]`
pub(crate) fn lookup<'a>(record: &'a Record, section: &str, key: &str) -> Option<&'a Value> {
    record.get(section).and_then(|s| s.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_variant() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(7).as_integer(), Some(7));
        assert_eq!(Value::from("Blurple").as_str(), Some("Blurple"));
        assert_eq!(Value::from("true").as_bool(), None);
        assert_eq!(Value::from(3).as_float(), Some(3.0));
        assert_eq!(Value::from(2.5).type_name(), "float");
        assert_eq!(Value::from("x").type_name(), "string");
    }

    #[test]
    fn test_display_strings_are_unquoted() {
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(Value::from(-12).to_string(), "-12");
    }

    #[test]
    fn test_record_toml_layout() {
        let mut record = Record::new();
        record
            .entry("Security".into())
            .or_default()
            .insert("anti-invite".into(), Value::from(true));
        record
            .entry("Appearance".into())
            .or_default()
            .insert("color".into(), Value::from("Red"));

        let text = toml::to_string(&record).unwrap();
        assert!(text.contains("[Security]"));
        assert!(text.contains("anti-invite = true"));
        assert!(text.contains("color = \"Red\""));

        let parsed: Record = toml::from_str(&text).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(lookup(&parsed, "Security", "anti-invite"), Some(&Value::Boolean(true)));
        assert_eq!(lookup(&parsed, "Security", "anti-links"), None);
    }

    #[test]
    fn test_untagged_prefers_integer_over_float() {
        let parsed: Record = toml::from_str("[Limits]\nmax = 5\nratio = 0.5\n").unwrap();
        assert_eq!(lookup(&parsed, "Limits", "max"), Some(&Value::Integer(5)));
        assert_eq!(lookup(&parsed, "Limits", "ratio"), Some(&Value::Float(0.5)));
    }
}
