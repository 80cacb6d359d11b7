//! Inline `css` helper
//!
//! Compiled `css` blocks are not components: their static part is
//! registered once and their dynamic part is evaluated immediately with
//! empty props. The last patch is kept in a single cache slot so repeated
//! evaluations with unchanged values reuse it.

use super::merger::{expand_shorthand_properties, normalize_dynamic_patch};
use super::metadata::StyleMetadata;
use super::registry::{style_map_to_object, StyleEntry};
use super::{Props, StyleObject};
use crate::parser::Parser;
use crate::types::format_number;

use serde_json::Value;
use std::cell::{Cell, RefCell};

/// One entry is returned as is, anything else as a list.
#[derive(Debug, Clone, PartialEq)]
pub enum CssResult {
    Single(StyleEntry),
    List(Vec<StyleEntry>),
}

impl CssResult {
    pub fn entries(&self) -> Vec<StyleEntry> {
        match self {
            CssResult::Single(entry) => vec![entry.clone()],
            CssResult::List(entries) => entries.clone(),
        }
    }
}

#[derive(Debug)]
struct CachedPatch {
    hash: String,
    patch: StyleObject,
}

#[derive(Debug)]
pub struct CssStyle {
    metadata: StyleMetadata,
    cache: RefCell<Option<CachedPatch>>,
    cache_hits: Cell<usize>,
}

impl CssStyle {
    pub fn new(metadata: StyleMetadata) -> Self {
        Self {
            metadata,
            cache: RefCell::new(None),
            cache_hits: Cell::new(0),
        }
    }

    pub fn with_styles(&self) -> CssResult {
        let mut styles = self.metadata.static_styles().unwrap_or_default();

        if let Some(patch) = self.metadata.dynamic_patch(&Props::new()) {
            if !patch.is_empty() {
                styles.push(StyleEntry::Inline(self.memoized(patch)));
            }
        }

        if styles.len() == 1 {
            CssResult::Single(styles.remove(0))
        } else {
            CssResult::List(styles)
        }
    }

    /// Evaluations that reused the cached patch
    pub fn cache_hits(&self) -> usize {
        self.cache_hits.get()
    }

    fn memoized(&self, patch: StyleObject) -> StyleObject {
        let hash = Value::Object(patch.clone()).to_string();
        let mut cache = self.cache.borrow_mut();

        if let Some(cached) = cache.as_ref().filter(|cached| cached.hash == hash) {
            self.cache_hits.set(self.cache_hits.get() + 1);
            return cached.patch.clone();
        }

        let patch = expand_shorthand_properties(normalize_dynamic_patch(patch));
        *cache = Some(CachedPatch {
            hash,
            patch: patch.clone(),
        });
        patch
    }
}

/// One uncompiled `css` call site.
///
/// Interpolated values are substituted as text and the block is parsed on
/// every call; only the static result is kept.
#[derive(Debug, Default)]
pub struct CssCallSite {
    warned: Cell<bool>,
}

impl CssCallSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&self, strings: &[&str], values: &[Value]) -> StyleObject {
        if !self.warned.replace(true) {
            log::warn!("css block is being parsed at runtime; enable the build-time transform");
        }

        let mut text = String::new();
        for (i, part) in strings.iter().enumerate() {
            text.push_str(part);
            if let Some(value) = values.get(i).filter(|_| i + 1 < strings.len()) {
                text.push_str(&interpolated_text(value));
            }
        }

        let mut parser = Parser::new();
        let rule = parser.parse(&text);
        for (property, _) in rule.dynamic_properties() {
            log::warn!("css: '{}' still holds a placeholder after interpolation, dropped", property);
        }
        style_map_to_object(&rule.static_styles)
    }
}

fn interpolated_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::Null | Value::Bool(false) => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::registry::StyleSheetRegistry;
    use serde_json::json;
    use std::rc::Rc;

    fn object(value: Value) -> StyleObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_static_only_returns_single_entry() {
        let mut registry = StyleSheetRegistry::new();
        let compiled = registry.create([("base".to_string(), object(json!({ "fontSize": 16 })))]);
        let style = CssStyle::new(StyleMetadata {
            compiled_styles: Some(compiled),
            style_keys: Some(vec!["base".into()]),
            ..StyleMetadata::default()
        });
        assert_eq!(style.with_styles(), CssResult::Single(StyleEntry::Registered(1)));
        assert!(CssStyle::new(StyleMetadata::default()).with_styles() == CssResult::List(vec![]));
    }

    #[test]
    fn test_dynamic_patch_is_memoized() {
        let width = Rc::new(Cell::new(10));
        let source = Rc::clone(&width);

        let mut registry = StyleSheetRegistry::new();
        let compiled = registry.create([("base".to_string(), object(json!({ "flex": 1 })))]);
        let style = CssStyle::new(StyleMetadata {
            compiled_styles: Some(compiled),
            style_keys: Some(vec!["base".into()]),
            get_dynamic_patch: Some(Rc::new(move |props: &Props| {
                assert!(props.is_empty());
                Some(object(json!({ "width": format!("{}px", source.get()) })))
            })),
            ..StyleMetadata::default()
        });

        let first = style.with_styles();
        assert_eq!(
            first,
            CssResult::List(vec![
                StyleEntry::Registered(1),
                StyleEntry::Inline(object(json!({ "width": 10 }))),
            ])
        );
        assert_eq!(style.with_styles(), first);
        assert_eq!(style.cache_hits(), 1);

        width.set(20);
        let entries = style.with_styles().entries();
        assert_eq!(entries[1], StyleEntry::Inline(object(json!({ "width": 20 }))));
        assert_eq!(style.cache_hits(), 1);
    }

    #[test]
    fn test_runtime_call_site() {
        let site = CssCallSite::new();
        let style = site.evaluate(
            &["font-size: ", "px; color: ", "; padding: 4px 8px;"],
            &[json!(16), json!("#007AFF")],
        );
        assert_eq!(
            Value::Object(style),
            json!({ "fontSize": 16, "color": "#007AFF", "paddingVertical": 4, "paddingHorizontal": 8 })
        );
        assert!(site.warned.get());

        let style = site.evaluate(&["opacity: ", ";"], &[json!(0.5)]);
        assert_eq!(Value::Object(style), json!({ "opacity": 0.5 }));
    }
}
