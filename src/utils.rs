//! Utility functions for the KStyled compiler
//!
//! Value normalization and placeholder handling shared by the build-time
//! parser, the fallback parser and the runtime merger.

use crate::core::constants::{
    NUMERIC_UNITS, PLACEHOLDER_PREFIX, PLACEHOLDER_SUFFIX, PLACEHOLDER_UNITS,
};
use crate::types::StyleValue;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"__EXPR_(\d+)__").unwrap());

static PLACEHOLDER_WITH_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(__EXPR_\d+__)(?i:{})$", PLACEHOLDER_UNITS.join("|"))).unwrap()
});

static NUMERIC_WITH_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(-?\d+(?:\.\d+)?)(?:{})?$", NUMERIC_UNITS.join("|"))).unwrap()
});

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());

/// Convert a raw declaration value into a typed value.
///
/// First match wins:
/// 1. placeholder present: drop a unit written right after the marker, keep text
/// 2. trailing `%`: stays text
/// 3. `-?digits(.digits)?(px|em|rem)?`: number, unit discarded
/// 4. matching quotes: stripped
/// 5. anything else: trimmed text
pub fn normalize_value(raw: &str) -> StyleValue {
    let trimmed = raw.trim();

    if contains_placeholder(trimmed) {
        let stripped = PLACEHOLDER_WITH_UNIT.replace(trimmed, |caps: &Captures| caps[1].to_string());
        return StyleValue::Text(stripped.into_owned());
    }

    if trimmed.ends_with('%') {
        return StyleValue::text(trimmed);
    }

    if let Some(caps) = NUMERIC_WITH_UNIT.captures(trimmed) {
        if let Ok(number) = caps[1].parse::<f64>() {
            return StyleValue::Number(number);
        }
    }

    if let Some(inner) = strip_matching_quotes(trimmed) {
        return StyleValue::text(inner);
    }

    StyleValue::text(trimmed)
}

fn strip_matching_quotes(value: &str) -> Option<&str> {
    let bytes = value.as_bytes();
    if bytes.len() < 2 {
        return None;
    }

    let first = bytes[0];
    let last = bytes[bytes.len() - 1];
    if (first == b'"' || first == b'\'') && first == last {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}

/// Marker for the expression at `index`
pub fn placeholder(index: usize) -> String {
    format!("{}{}{}", PLACEHOLDER_PREFIX, index, PLACEHOLDER_SUFFIX)
}

pub fn contains_placeholder(value: &str) -> bool {
    PLACEHOLDER.is_match(value)
}

/// Index of the first placeholder in `value`
pub fn placeholder_index(value: &str) -> Option<usize> {
    PLACEHOLDER
        .captures(value)
        .and_then(|caps| caps[1].parse::<usize>().ok())
}

/// Join template string parts with a placeholder between each pair.
///
/// `quasis` has one more element than there are expressions; extra
/// expressions beyond `quasis.len() - 1` get no marker.
pub fn build_css_string<S: AsRef<str>>(quasis: &[S], expression_count: usize) -> String {
    let mut css = String::new();
    for (i, part) in quasis.iter().enumerate() {
        css.push_str(part.as_ref());
        if i < expression_count && i + 1 < quasis.len() {
            css.push_str(&placeholder(i));
        }
    }
    css
}

/// `paddingHorizontal` -> `padding-horizontal`
pub fn camel_to_kebab(name: &str) -> String {
    UPPERCASE
        .replace_all(name, |caps: &Captures| format!("-{}", caps[0].to_lowercase()))
        .into_owned()
}

/// Whether `name` can be written as a bare JS object key
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
