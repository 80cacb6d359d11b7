//! Stylesheet registry
//!
//! Models the host platform's `StyleSheet`: `create` hands out numeric ids
//! for named style objects and `resolve` flattens a style list the way the
//! platform does when it finally applies it.

use super::StyleObject;
use crate::types::StyleMap;

use indexmap::IndexMap;
use serde_json::Value;

pub type StyleId = u32;

/// Style key -> registered id, in registration order
pub type CompiledStyles = IndexMap<String, StyleId>;

/// One element of a style list
#[derive(Debug, Clone, PartialEq)]
pub enum StyleEntry {
    Registered(StyleId),
    Inline(StyleObject),
}

const BOX_FAMILIES: &[&str] = &["padding", "margin"];

#[derive(Debug, Default)]
pub struct StyleSheetRegistry {
    sheets: Vec<StyleObject>,
}

impl StyleSheetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register each named style object. Ids start at 1.
    pub fn create<I>(&mut self, styles: I) -> CompiledStyles
    where
        I: IntoIterator<Item = (String, StyleObject)>,
    {
        styles
            .into_iter()
            .map(|(key, style)| {
                self.sheets.push(style);
                (key, self.sheets.len() as StyleId)
            })
            .collect()
    }

    pub fn create_from_map(&mut self, key: &str, styles: &StyleMap) -> CompiledStyles {
        self.create([(key.to_string(), style_map_to_object(styles))])
    }

    pub fn get(&self, id: StyleId) -> Option<&StyleObject> {
        let index = (id as usize).checked_sub(1)?;
        self.sheets.get(index)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Last write wins by list position; `null` values leave a property unset.
    pub fn flatten(&self, styles: &[StyleEntry]) -> StyleObject {
        let mut flat = StyleObject::new();
        for entry in styles {
            let object = match entry {
                StyleEntry::Registered(id) => match self.get(*id) {
                    Some(object) => object,
                    None => {
                        log::warn!("style id {} is not registered", id);
                        continue;
                    }
                },
                StyleEntry::Inline(object) => object,
            };

            for (property, value) in object {
                if !value.is_null() {
                    flat.insert(property.clone(), value.clone());
                }
            }
        }
        flat
    }

    /// Final per-property values as the platform applies them.
    ///
    /// For each box side the longhand (`paddingLeft`) beats the axis
    /// shorthand (`paddingHorizontal`), which beats the all-sides shorthand
    /// (`padding`), wherever they sit in the list.
    pub fn resolve(&self, styles: &[StyleEntry]) -> StyleObject {
        let mut flat = self.flatten(styles);

        for family in BOX_FAMILIES {
            let all = flat.remove(*family);
            let vertical = flat.remove(&format!("{}Vertical", family));
            let horizontal = flat.remove(&format!("{}Horizontal", family));

            let sides = [
                ("Top", &vertical),
                ("Right", &horizontal),
                ("Bottom", &vertical),
                ("Left", &horizontal),
            ];
            for (side, axis) in sides {
                let key = format!("{}{}", family, side);
                if flat.contains_key(&key) {
                    continue;
                }
                if let Some(value) = axis.as_ref().or(all.as_ref()) {
                    flat.insert(key, value.clone());
                }
            }
        }

        flat
    }
}

pub fn style_map_to_object(styles: &StyleMap) -> StyleObject {
    styles
        .iter()
        .map(|(property, value)| (property.clone(), value.to_json()))
        .collect()
}

/// Style list element from a `style` prop value. Numbers are registered ids.
pub(crate) fn entry_from_value(value: &Value) -> Option<StyleEntry> {
    match value {
        Value::Object(object) => Some(StyleEntry::Inline(object.clone())),
        Value::Number(n) => n
            .as_u64()
            .and_then(|id| StyleId::try_from(id).ok())
            .map(StyleEntry::Registered),
        _ => None,
    }
}
