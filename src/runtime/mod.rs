//! Render-time style runtime
//!
//! The compiled output hands each styled component a [`StyleMetadata`]
//! bundle. At render time the pieces here turn that bundle, the component's
//! props and the caller's `style` prop into the ordered style list passed to
//! the host component.
//!
//! Values are modelled with `serde_json::Value`; functions written in the
//! template are modelled as Rust closures over [`Props`].

pub mod component;
pub mod css;
pub mod fallback;
pub mod merger;
pub mod metadata;
pub mod props;
pub mod registry;
pub mod styled;
pub mod theme;

use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

/// Component props (including `theme` once resolved)
pub type Props = Map<String, Value>;

/// One inline style object
pub type StyleObject = Map<String, Value>;

pub use component::{resolve_metadata, Animated, ComponentHandle, ForwardRef, HostComponent, Memo};
pub use css::{CssCallSite, CssResult, CssStyle};
pub use fallback::parse_template;
pub use merger::{
    build_style_list, expand_shorthand_properties, merge_dynamic_patches, normalize_dynamic_patch,
};
pub use metadata::{merge_metadata, Attrs, DynamicPatchFn, StyleMetadata};
pub use props::{combine_attrs, filter_props, has_transient_props, merge_attrs_with_props};
pub use registry::{CompiledStyles, StyleEntry, StyleId, StyleSheetRegistry};
pub use styled::{RenderedElement, StyledComponent, StyledFactory};
pub use theme::{use_theme, RenderContext, Theme, ThemeProvider};

/// A value interpolated into a style template
#[derive(Clone)]
pub enum Interpolation {
    Value(Value),
    /// Evaluated against the component's merged props
    Function(Rc<dyn Fn(&Props) -> Value>),
}

impl Interpolation {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Props) -> Value + 'static,
    {
        Interpolation::Function(Rc::new(f))
    }

    pub fn evaluate(&self, props: &Props) -> Value {
        match self {
            Interpolation::Value(value) => value.clone(),
            Interpolation::Function(f) => f(props),
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Interpolation::Function(_))
    }
}

impl fmt::Debug for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Interpolation::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<Value> for Interpolation {
    fn from(value: Value) -> Self {
        Interpolation::Value(value)
    }
}

impl From<&str> for Interpolation {
    fn from(value: &str) -> Self {
        Interpolation::Value(Value::String(value.to_string()))
    }
}

impl From<f64> for Interpolation {
    fn from(value: f64) -> Self {
        Interpolation::Value(crate::types::number_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interpolation_evaluation() {
        let mut props = Props::new();
        props.insert("$size".into(), json!(12));

        let size = Interpolation::function(|p: &Props| p.get("$size").cloned().unwrap_or(Value::Null));
        assert!(size.is_function());
        assert_eq!(size.evaluate(&props), json!(12));

        let fixed = Interpolation::from("red");
        assert!(!fixed.is_function());
        assert_eq!(fixed.evaluate(&props), json!("red"));
        assert_eq!(Interpolation::from(4.0).evaluate(&props), json!(4));
        assert_eq!(format!("{:?}", size), "Function(..)");
    }
}
