//! Style list assembly
//!
//! Priority, lowest first: compiled static entries in key order, the
//! dynamic patch, then the caller's `style` prop. Fragments added after the
//! static entries have their box shorthands expanded to longhand; the
//! platform ranks longhand above shorthand regardless of position, so an
//! unexpanded `paddingHorizontal` would lose to a static `paddingLeft`.

use super::registry::{entry_from_value, CompiledStyles, StyleEntry};
use super::StyleObject;
use crate::shorthand::{expand_box_model, split_box_property, BoxAxis, MERGE_TIME_SHORTHANDS};
use crate::utils::normalize_value;

use serde_json::Value;
use std::collections::HashMap;

/// How specific a key is about which box side it sets
fn specificity(property: &str) -> u8 {
    match split_box_property(property) {
        Some((_, BoxAxis::All)) => 0,
        Some(_) => 1,
        None => 2,
    }
}

pub fn build_style_list(
    compiled_styles: Option<&CompiledStyles>,
    style_keys: &[String],
    dynamic_patch: Option<StyleObject>,
    external_style: Option<&Value>,
) -> Vec<StyleEntry> {
    let mut styles = Vec::new();

    if let Some(compiled) = compiled_styles {
        styles.extend(
            style_keys
                .iter()
                .filter_map(|key| compiled.get(key).copied())
                .map(StyleEntry::Registered),
        );
    }

    if let Some(patch) = dynamic_patch.filter(|patch| !patch.is_empty()) {
        let patch = expand_shorthand_properties(normalize_dynamic_patch(patch));
        styles.push(StyleEntry::Inline(patch));
    }

    if let Some(external) = external_style {
        push_external(&mut styles, external);
    }

    styles
}

/// Nested lists are flattened in order; `null`/`false` holes are skipped.
fn push_external(styles: &mut Vec<StyleEntry>, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                push_external(styles, item);
            }
        }
        Value::Object(object) => {
            styles.push(StyleEntry::Inline(expand_shorthand_properties(object.clone())));
        }
        other => {
            if let Some(entry) = entry_from_value(other) {
                styles.push(entry);
            }
        }
    }
}

/// Shallow merge; the child's properties win.
pub fn merge_dynamic_patches(
    base: Option<StyleObject>,
    child: Option<StyleObject>,
) -> Option<StyleObject> {
    match (base, child) {
        (None, None) => None,
        (Some(patch), None) | (None, Some(patch)) => Some(patch),
        (Some(mut base), Some(child)) => {
            base.extend(child);
            Some(base)
        }
    }
}

/// Rewrite box shorthands in one fragment as `Top`/`Right`/`Bottom`/`Left`.
///
/// Within the fragment a more specific key keeps its value whatever the
/// declaration order: `paddingLeft` > `paddingHorizontal` > `padding`.
pub fn expand_shorthand_properties(style: StyleObject) -> StyleObject {
    let needs_expansion = style
        .keys()
        .any(|key| MERGE_TIME_SHORTHANDS.contains(&key.as_str()));
    if !needs_expansion {
        return style;
    }

    let mut expanded = StyleObject::new();
    let mut ranks: HashMap<String, u8> = HashMap::new();

    for (property, value) in style {
        let rank = specificity(&property);
        let sides = expand_box_model(&property, std::slice::from_ref(&value), MERGE_TIME_SHORTHANDS)
            .unwrap_or_else(|| vec![(property, value)]);

        for (key, value) in sides {
            if ranks.get(&key).map_or(true, |existing| *existing <= rank) {
                ranks.insert(key.clone(), rank);
                expanded.insert(key, value);
            }
        }
    }

    expanded
}

/// Run every patch value back through the value normalizer.
///
/// Expressions may return unit-suffixed text (`"12px"`); arrays and nested
/// objects (`transform: [{ translateX: "4px" }]`) are normalized entry by entry.
pub fn normalize_dynamic_patch(patch: StyleObject) -> StyleObject {
    patch
        .into_iter()
        .map(|(property, value)| (property, normalize_json(value)))
        .collect()
}

fn normalize_json(value: Value) -> Value {
    match value {
        Value::String(text) => normalize_value(&text).to_json(),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_json).collect()),
        Value::Object(object) => Value::Object(normalize_dynamic_patch(object)),
        other => other,
    }
}
