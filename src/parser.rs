//! Declaration block parser
//!
//! Turns `property: value;` text into a [`StyleRule`]: a static map that can be
//! registered at build time and a list of placeholder-bearing entries that
//! must be evaluated per render. A declaration that cannot be parsed is
//! skipped; the rest of the block is still processed.

use crate::core::properties::{is_valid_property, normalize_property};
use crate::shorthand::{expand_shorthand, PARSE_TIME_SHORTHANDS};
use crate::types::{Declaration, DynamicStyle, StyleMap, StyleRule, StyleValue};
use crate::types::format_number;
use crate::utils::{camel_to_kebab, contains_placeholder, normalize_value};

use serde::Serialize;

/// What the parser noticed but did not reject
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseDiagnostics {
    /// Declarations dropped for a missing colon or an empty side
    pub skipped: Vec<String>,
    /// Properties outside the target allow-list (kept anyway)
    pub unknown_properties: Vec<String>,
    /// `padding`/`margin` with a value count that has no positional meaning
    pub ambiguous_shorthands: Vec<String>,
    /// Static entries moved to the dynamic list by the post-pass
    pub relocated: Vec<String>,
}

impl ParseDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
            && self.unknown_properties.is_empty()
            && self.ambiguous_shorthands.is_empty()
            && self.relocated.is_empty()
    }
}

pub struct Parser {
    diagnostics: ParseDiagnostics,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            diagnostics: ParseDiagnostics::default(),
        }
    }

    pub fn diagnostics(&self) -> &ParseDiagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> ParseDiagnostics {
        self.diagnostics
    }

    pub fn parse(&mut self, css: &str) -> StyleRule {
        let mut rule = StyleRule::default();

        for raw in css.split(';').map(str::trim).filter(|d| !d.is_empty()) {
            let Some(declaration) = Declaration::parse(raw) else {
                log::debug!("Skipping malformed declaration '{}'", raw);
                self.diagnostics.skipped.push(raw.to_string());
                continue;
            };

            self.apply_declaration(&declaration, &mut rule);
        }

        self.relocate_leftover_placeholders(&mut rule);

        log::trace!(
            "Parsed block: {} static, {} dynamic",
            rule.static_styles.len(),
            rule.dynamic.len()
        );

        rule
    }

    fn apply_declaration(&mut self, declaration: &Declaration, rule: &mut StyleRule) {
        let property = normalize_property(&declaration.property);

        if !is_valid_property(&property) {
            self.diagnostics.unknown_properties.push(property.clone());
        }

        if contains_placeholder(&declaration.value) {
            rule.static_styles.shift_remove(&property);
            push_dynamic(rule, property, normalize_value(&declaration.value));
            return;
        }

        if let Some(expanded) = expand_shorthand(&declaration.property, &declaration.value) {
            // An earlier dynamic value for the shorthand itself is overridden too
            remove_dynamic(rule, &property);
            for (key, value) in expanded {
                insert_static(rule, key, value);
            }
            return;
        }

        if PARSE_TIME_SHORTHANDS.contains(&declaration.property.as_str())
            && declaration.value.contains(char::is_whitespace)
        {
            log::warn!(
                "'{}: {}' has no positional shorthand meaning; keeping it as a single value",
                declaration.property,
                declaration.value
            );
            self.diagnostics
                .ambiguous_shorthands
                .push(format!("{}: {}", declaration.property, declaration.value));
        }

        insert_static(rule, property, normalize_value(&declaration.value));
    }

    /// Nothing carrying a placeholder may be registered as a static style.
    fn relocate_leftover_placeholders(&mut self, rule: &mut StyleRule) {
        let leaked: Vec<String> = rule
            .static_styles
            .iter()
            .filter(|(_, value)| value.has_placeholder())
            .map(|(key, _)| key.clone())
            .collect();

        for key in leaked {
            if let Some(value) = rule.static_styles.shift_remove(&key) {
                log::debug!("Moving '{}' from static to dynamic styles", key);
                self.diagnostics.relocated.push(key.clone());
                push_dynamic(rule, key, value);
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// A later declaration of the same property replaces an earlier one, whichever
// side it landed on, so a property is never both static and dynamic.
fn insert_static(rule: &mut StyleRule, key: String, value: StyleValue) {
    remove_dynamic(rule, &key);
    rule.static_styles.insert(key, value);
}

fn push_dynamic(rule: &mut StyleRule, key: String, value: StyleValue) {
    remove_dynamic(rule, &key);
    let mut properties = StyleMap::new();
    properties.insert(key, value);
    rule.dynamic.push(DynamicStyle { properties });
}

fn remove_dynamic(rule: &mut StyleRule, key: &str) {
    for entry in &mut rule.dynamic {
        entry.properties.shift_remove(key);
    }
    rule.dynamic.retain(|entry| !entry.properties.is_empty());
}

/// Parse one declaration block
pub fn parse_css(css: &str) -> StyleRule {
    Parser::new().parse(css)
}

/// Text form of a style map, one `kebab-name: value;` per line.
///
/// Text values that would normalize to something else are quoted, so parsing
/// the output yields the same map again.
pub fn style_map_to_css(styles: &StyleMap) -> String {
    styles
        .iter()
        .map(|(key, value)| format!("{}: {};", camel_to_kebab(key), value_to_css(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn value_to_css(value: &StyleValue) -> String {
    match value {
        StyleValue::Number(n) => format_number(*n),
        StyleValue::Text(text) => {
            if normalize_value(text) == *value {
                text.clone()
            } else if text.contains('"') {
                format!("'{}'", text)
            } else {
                format!("\"{}\"", text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn num(n: f64) -> StyleValue {
        StyleValue::Number(n)
    }

    #[test]
    fn test_two_value_padding_block() {
        let rule = parse_css("padding: 4px 8px;");
        assert_eq!(rule.static_styles.len(), 2);
        assert_eq!(rule.static_styles["paddingVertical"], num(4.0));
        assert_eq!(rule.static_styles["paddingHorizontal"], num(8.0));
        assert!(rule.dynamic.is_empty());
    }

    #[test]
    fn test_single_value_padding_is_not_expanded() {
        let rule = parse_css("padding: 16px;");
        assert_eq!(rule.static_styles.len(), 1);
        assert_eq!(rule.static_styles["padding"], num(16.0));
    }

    #[test]
    fn test_dynamic_declaration() {
        let rule = parse_css("background-color: __EXPR_0__;");
        assert!(rule.static_styles.is_empty());
        assert_eq!(rule.dynamic.len(), 1);
        assert_eq!(
            rule.dynamic[0].properties["backgroundColor"],
            StyleValue::text("__EXPR_0__")
        );
    }

    #[test]
    fn test_dynamic_unit_is_stripped() {
        let rule = parse_css("width: __EXPR_1__px; height: 20px");
        assert_eq!(rule.dynamic[0].properties["width"], StyleValue::text("__EXPR_1__"));
        assert_eq!(rule.static_styles["height"], num(20.0));
    }

    #[test]
    fn test_empty_block() {
        let rule = parse_css("");
        assert!(rule.is_empty());
        let rule = parse_css("  ;  ; \n ");
        assert!(rule.is_empty());
    }

    #[test]
    fn test_malformed_declarations_are_isolated() {
        let mut parser = Parser::new();
        let rule = parser.parse("color red; : 4px; opacity: 0.5; width:; flex: 1");
        assert_eq!(rule.static_styles.len(), 2);
        assert_eq!(rule.static_styles["opacity"], num(0.5));
        assert_eq!(rule.static_styles["flex"], num(1.0));
        assert_eq!(parser.diagnostics().skipped, vec!["color red", ": 4px", "width:"]);
    }

    #[test]
    fn test_mixed_forms_and_unknown_properties() {
        let mut parser = Parser::new();
        let rule = parser.parse("fontSize: 14px; font-weight: 'bold'; grid-area: main;");
        assert_eq!(rule.static_styles["fontSize"], num(14.0));
        assert_eq!(rule.static_styles["fontWeight"], StyleValue::text("bold"));
        assert_eq!(rule.static_styles["gridArea"], StyleValue::text("main"));
        assert_eq!(parser.diagnostics().unknown_properties, vec!["gridArea"]);
    }

    #[test]
    fn test_ambiguous_shorthand_passes_through() {
        let mut parser = Parser::new();
        let rule = parser.parse("margin: 1px 2px 3px;");
        assert_eq!(rule.static_styles["margin"], StyleValue::text("1px 2px 3px"));
        assert_eq!(parser.diagnostics().ambiguous_shorthands, vec!["margin: 1px 2px 3px"]);
    }

    #[test]
    fn test_non_box_multi_values_stay_literal() {
        let rule = parse_css("shadow-offset: 1 1; border: 1px solid red");
        assert_eq!(rule.static_styles["shadowOffset"], StyleValue::text("1 1"));
        assert_eq!(rule.static_styles["border"], StyleValue::text("1px solid red"));
    }

    #[test]
    fn test_shorthand_with_placeholder_is_dynamic() {
        let rule = parse_css("padding: __EXPR_0__ 8px; margin: 2px 4px");
        assert_eq!(rule.dynamic.len(), 1);
        assert_eq!(rule.dynamic[0].properties["padding"], StyleValue::text("__EXPR_0__ 8px"));
        assert_eq!(rule.static_styles["marginVertical"], num(2.0));
        assert!(rule.static_styles.values().all(|v| !v.has_placeholder()));
    }

    #[test]
    fn test_later_declaration_wins_across_partitions() {
        let rule = parse_css("color: red; color: __EXPR_0__;");
        assert!(!rule.static_styles.contains_key("color"));
        assert_eq!(rule.dynamic.len(), 1);

        let rule = parse_css("color: __EXPR_0__; color: blue;");
        assert_eq!(rule.static_styles["color"], StyleValue::text("blue"));
        assert!(rule.dynamic.is_empty());
    }

    #[test]
    fn test_later_expanded_shorthand_replaces_dynamic_shorthand() {
        let rule = parse_css("padding: __EXPR_0__; padding: 4px 8px;");
        assert!(rule.dynamic.is_empty());
        assert_eq!(rule.static_styles["paddingVertical"], StyleValue::Number(4.0));
        assert_eq!(rule.static_styles["paddingHorizontal"], StyleValue::Number(8.0));

        let rule = parse_css("margin: __EXPR_0__; margin-top: __EXPR_1__; margin: 1px 2px 3px 4px;");
        assert!(rule.dynamic.is_empty());
        assert_eq!(rule.static_styles.len(), 4);
    }

    #[test]
    fn test_duplicate_static_keeps_first_position() {
        let rule = parse_css("width: 1; height: 2; width: 3");
        let keys: Vec<_> = rule.static_styles.keys().cloned().collect();
        assert_eq!(keys, vec!["width", "height"]);
        assert_eq!(rule.static_styles["width"], num(3.0));
    }

    #[test]
    fn test_relocation_guard() {
        let mut parser = Parser::new();
        let mut rule = StyleRule::default();
        rule.static_styles.insert("color".into(), StyleValue::text("__EXPR_2__"));
        rule.static_styles.insert("width".into(), num(1.0));
        parser.relocate_leftover_placeholders(&mut rule);

        assert_eq!(rule.static_styles.len(), 1);
        assert_eq!(rule.dynamic[0].properties["color"], StyleValue::text("__EXPR_2__"));
        assert_eq!(parser.diagnostics().relocated, vec!["color"]);
    }

    #[test]
    fn test_style_map_to_css() {
        let rule = parse_css("padding: 4px 8px; color: \"10\"; opacity: 0.5");
        let css = style_map_to_css(&rule.static_styles);
        assert_eq!(
            css,
            "padding-vertical: 4;\npadding-horizontal: 8;\ncolor: \"10\";\nopacity: 0.5;"
        );
    }

    fn static_declaration() -> impl Strategy<Value = String> {
        let property = prop::sample::select(vec![
            "width",
            "min-height",
            "background-color",
            "opacity",
            "font-weight",
            "shadowOffset",
            "padding",
            "margin",
            "border-top-left-radius",
            "some-custom-prop",
        ]);
        let value = prop_oneof![
            (-500i32..500).prop_map(|n| format!("{}px", n)),
            (0u32..100, 0u32..100).prop_map(|(a, b)| format!("{}.{}em", a, b)),
            (0u32..100).prop_map(|n| format!("{}%", n)),
            prop::sample::select(vec!["red", "auto", "#fff", "'bold'", "\"12\"", "row"])
                .prop_map(str::to_string),
            (0u32..50, 0u32..50).prop_map(|(a, b)| format!("{}px {}px", a, b)),
            (0u32..9, 0u32..9, 0u32..9).prop_map(|(a, b, c)| format!("{} {} {}", a, b, c)),
            (0u32..9, 0u32..9, 0u32..9, 0u32..9)
                .prop_map(|(a, b, c, d)| format!("{}px {}px {}px {}px", a, b, c, d)),
        ];
        (property, value).prop_map(|(p, v)| format!("{}: {}", p, v))
    }

    fn any_declaration() -> impl Strategy<Value = String> {
        prop_oneof![
            3 => static_declaration(),
            1 => (
                prop::sample::select(vec!["padding", "margin", "color", "width", "paddingTop"]),
                0usize..4,
                prop::sample::select(vec!["", "px", "%", " 8px", " solid", "px 4px"]),
            )
                .prop_map(|(p, i, rest)| format!("{}: __EXPR_{}__{}", p, i, rest)),
            1 => (0u32..9).prop_map(|n| format!("padding: {}px __EXPR_{}__", n, n % 3)),
        ]
    }

    proptest! {
        #[test]
        fn prop_static_parse_is_idempotent(decls in prop::collection::vec(static_declaration(), 0..12)) {
            let rule = parse_css(&decls.join(";\n"));
            prop_assert!(rule.dynamic.is_empty());

            let reparsed = parse_css(&style_map_to_css(&rule.static_styles));
            prop_assert_eq!(reparsed, rule);
        }

        #[test]
        fn prop_no_leaked_placeholders(decls in prop::collection::vec(any_declaration(), 0..12)) {
            let rule = parse_css(&decls.join("; "));

            prop_assert!(rule.static_styles.values().all(|value| !value.has_placeholder()));
            for (key, _) in rule.dynamic_properties() {
                prop_assert!(!rule.static_styles.contains_key(key));
            }
        }
    }
}
