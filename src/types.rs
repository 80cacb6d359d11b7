//! Core data types shared by the parser, emitter and runtime

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::utils::contains_placeholder;

/// Typed declaration value
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    pub fn text(value: impl Into<String>) -> Self {
        StyleValue::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Text(text) => Some(text),
            StyleValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            StyleValue::Text(_) => None,
        }
    }

    /// Numbers never carry a placeholder; only text can.
    pub fn has_placeholder(&self) -> bool {
        self.as_str().map_or(false, contains_placeholder)
    }

    pub fn to_json(&self) -> Value {
        match self {
            StyleValue::Number(n) => number_value(*n),
            StyleValue::Text(text) => Value::String(text.clone()),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => write!(f, "{}", format_number(*n)),
            StyleValue::Text(text) => write!(f, "{}", text),
        }
    }
}

impl Serialize for StyleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            StyleValue::Number(n) if is_integral(*n) => serializer.serialize_i64(*n as i64),
            StyleValue::Number(n) => serializer.serialize_f64(*n),
            StyleValue::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<&str> for StyleValue {
    fn from(text: &str) -> Self {
        StyleValue::Text(text.to_string())
    }
}

/// Property map in insertion order. Overwriting a key keeps its first position.
pub type StyleMap = IndexMap<String, StyleValue>;

/// One raw `property: value` pair from a declaration block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    /// Split on the first `:`. `None` when either side is empty after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let (property, value) = raw.split_once(':')?;
        let property = property.trim();
        let value = value.trim();

        if property.is_empty() || value.is_empty() {
            return None;
        }

        Some(Self {
            property: property.to_string(),
            value: value.to_string(),
        })
    }
}

/// Properties that must be computed per render
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DynamicStyle {
    pub properties: StyleMap,
}

/// Result of parsing one declaration block
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleRule {
    #[serde(rename = "static")]
    pub static_styles: StyleMap,
    pub dynamic: Vec<DynamicStyle>,
}

impl StyleRule {
    pub fn is_empty(&self) -> bool {
        self.static_styles.is_empty() && self.dynamic.is_empty()
    }

    /// Every dynamic property in declaration order
    pub fn dynamic_properties(&self) -> impl Iterator<Item = (&String, &StyleValue)> {
        self.dynamic.iter().flat_map(|entry| entry.properties.iter())
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0
}

/// JSON number for a style value; integral values become JSON integers.
pub fn number_value(n: f64) -> Value {
    if is_integral(n) {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Number text the way a JS engine prints it (`16`, `1.5`, `-0.25`)
pub fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
