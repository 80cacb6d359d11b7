//! Instruction emitter
//!
//! Converts a parsed [`StyleRule`] into the declarative instructions a code
//! rewriter materializes: one stylesheet registration for the static map and
//! one dynamic-patch builder mapping properties to expression indices.

use crate::core::constants::{PATCH_PARAM_NAME, STYLE_ID_PREFIX, STYLE_KEY_BASE};
use crate::types::{StyleMap, StyleRule, StyleValue};
use crate::utils::placeholder_index;

use serde::Serialize;

/// Per-file emission state. Style ids only need to be unique within one unit.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    file_name: String,
    style_counter: usize,
}

impl CompilationUnit {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            style_counter: 0,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn next_style_id(&mut self) -> String {
        let id = format!("{}{}", STYLE_ID_PREFIX, self.style_counter);
        self.style_counter += 1;
        id
    }

    pub fn styles_registered(&self) -> usize {
        self.style_counter
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleSheetRegistration {
    pub id: String,
    pub key: String,
    pub properties: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicEntry {
    pub property: String,
    pub expression_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicPatchBuilder {
    pub param_name: String,
    pub entries: Vec<DynamicEntry>,
}

/// Instructions for one style block. Both parts absent means "leave the
/// original construct alone".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_sheet_registration: Option<StyleSheetRegistration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_patch_builder: Option<DynamicPatchBuilder>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction<'a> {
    RegisterStyleSheet(&'a StyleSheetRegistration),
    BuildDynamicPatch(&'a DynamicPatchBuilder),
}

impl InstructionSet {
    pub fn is_empty(&self) -> bool {
        self.style_sheet_registration.is_none() && self.dynamic_patch_builder.is_none()
    }

    pub fn is_static_only(&self) -> bool {
        self.style_sheet_registration.is_some() && self.dynamic_patch_builder.is_none()
    }

    /// Instructions in output order; a registration always precedes its uses.
    pub fn instructions(&self) -> Vec<Instruction<'_>> {
        let mut instructions = Vec::with_capacity(2);
        if let Some(registration) = &self.style_sheet_registration {
            instructions.push(Instruction::RegisterStyleSheet(registration));
        }
        if let Some(builder) = &self.dynamic_patch_builder {
            instructions.push(Instruction::BuildDynamicPatch(builder));
        }
        instructions
    }

    pub fn style_keys(&self) -> Vec<String> {
        self.style_sheet_registration
            .iter()
            .map(|registration| registration.key.clone())
            .collect()
    }
}

/// Emit the instruction set for `rule`.
///
/// `expression_count` is the length of the template's expression list; a
/// placeholder pointing past it is dropped.
pub fn emit(rule: &StyleRule, expression_count: usize, unit: &mut CompilationUnit) -> InstructionSet {
    let mut static_styles = StyleMap::with_capacity(rule.static_styles.len());
    let mut dynamic: Vec<(&String, &StyleValue)> = Vec::new();

    // Anything still carrying a marker in the static map is treated as dynamic
    for (property, value) in &rule.static_styles {
        if value.has_placeholder() {
            dynamic.push((property, value));
        } else {
            static_styles.insert(property.clone(), value.clone());
        }
    }
    dynamic.extend(rule.dynamic_properties());

    let mut entries = Vec::with_capacity(dynamic.len());
    for (property, value) in dynamic {
        match value.as_str().and_then(placeholder_index) {
            Some(index) if index < expression_count => entries.push(DynamicEntry {
                property: property.clone(),
                expression_index: index,
            }),
            _ => log::warn!(
                "{}: dropping dynamic '{}' ({}) with no matching expression",
                unit.file_name(),
                property,
                value
            ),
        }
    }

    let style_sheet_registration = if static_styles.is_empty() {
        None
    } else {
        Some(StyleSheetRegistration {
            id: unit.next_style_id(),
            key: STYLE_KEY_BASE.to_string(),
            properties: static_styles,
        })
    };

    let dynamic_patch_builder = if entries.is_empty() {
        None
    } else {
        Some(DynamicPatchBuilder {
            param_name: PATCH_PARAM_NAME.to_string(),
            entries,
        })
    };

    InstructionSet {
        style_sheet_registration,
        dynamic_patch_builder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_css;
    use serde_json::json;

    #[test]
    fn test_static_only_block() {
        let mut unit = CompilationUnit::new("Button.tsx");
        let set = emit(&parse_css("padding: 4px 8px;"), 0, &mut unit);

        let registration = set.style_sheet_registration.as_ref().unwrap();
        assert_eq!(registration.id, "__ks0");
        assert_eq!(registration.key, "base");
        assert_eq!(registration.properties.len(), 2);
        assert!(set.dynamic_patch_builder.is_none());
        assert!(set.is_static_only());
        assert_eq!(set.style_keys(), vec!["base"]);
    }

    #[test]
    fn test_dynamic_only_block() {
        let mut unit = CompilationUnit::new("Card.tsx");
        let set = emit(&parse_css("background-color: __EXPR_0__;"), 1, &mut unit);

        assert!(set.style_sheet_registration.is_none());
        let builder = set.dynamic_patch_builder.as_ref().unwrap();
        assert_eq!(builder.param_name, "p");
        assert_eq!(
            builder.entries,
            vec![DynamicEntry {
                property: "backgroundColor".into(),
                expression_index: 0
            }]
        );
        // No registration, no id consumed
        assert_eq!(unit.styles_registered(), 0);
    }

    #[test]
    fn test_empty_block_emits_nothing() {
        let mut unit = CompilationUnit::new("Empty.tsx");
        let set = emit(&parse_css(""), 0, &mut unit);
        assert!(set.is_empty());
        assert!(set.instructions().is_empty());
        assert_eq!(serde_json::to_value(&set).unwrap(), json!({}));
    }

    #[test]
    fn test_registration_comes_first() {
        let mut unit = CompilationUnit::new("Mixed.tsx");
        let set = emit(&parse_css("color: __EXPR_0__; width: 10px"), 1, &mut unit);
        let instructions = set.instructions();
        assert_eq!(instructions.len(), 2);
        assert!(matches!(instructions[0], Instruction::RegisterStyleSheet(_)));
        assert!(matches!(instructions[1], Instruction::BuildDynamicPatch(_)));
    }

    #[test]
    fn test_ids_are_unique_per_unit() {
        let mut unit = CompilationUnit::new("Many.tsx");
        let first = emit(&parse_css("width: 1"), 0, &mut unit);
        let second = emit(&parse_css("width: 2"), 0, &mut unit);
        assert_eq!(first.style_sheet_registration.unwrap().id, "__ks0");
        assert_eq!(second.style_sheet_registration.unwrap().id, "__ks1");

        let mut other = CompilationUnit::new("Other.tsx");
        let third = emit(&parse_css("width: 3"), 0, &mut other);
        assert_eq!(third.style_sheet_registration.unwrap().id, "__ks0");
    }

    #[test]
    fn test_leaked_static_placeholder_and_missing_expression() {
        let mut rule = StyleRule::default();
        rule.static_styles.insert("color".into(), StyleValue::text("__EXPR_1__"));
        rule.static_styles.insert("width".into(), StyleValue::Number(4.0));

        let mut unit = CompilationUnit::new("Leak.tsx");
        let set = emit(&rule, 2, &mut unit);
        let registration = set.style_sheet_registration.unwrap();
        assert!(!registration.properties.contains_key("color"));
        assert_eq!(set.dynamic_patch_builder.unwrap().entries[0].expression_index, 1);

        let set = emit(&parse_css("color: __EXPR_5__"), 2, &mut unit);
        assert!(set.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut unit = CompilationUnit::new("Shape.tsx");
        let set = emit(&parse_css("opacity: 0.5; color: __EXPR_0__"), 1, &mut unit);
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!({
                "styleSheetRegistration": { "id": "__ks0", "key": "base", "properties": { "opacity": 0.5 } },
                "dynamicPatchBuilder": { "paramName": "p", "entries": [{ "property": "color", "expressionIndex": 0 }] }
            })
        );
    }
}
