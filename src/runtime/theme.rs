//! Theme context
//!
//! A [`ThemeProvider`] makes a theme visible to every component rendered
//! through the [`RenderContext`] it hands out. Rendering a component with
//! dynamic styles outside any provider is an error.

use super::Props;
use crate::core::constants::PROP_THEME;
use crate::error::{CompilerError, Result};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::rc::Rc;

/// Design tokens. Unknown top-level sections are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default)]
    pub colors: Map<String, Value>,
    #[serde(default)]
    pub space: Map<String, Value>,
    #[serde(default)]
    pub radii: Map<String, Value>,
    #[serde(default)]
    pub font_sizes: Map<String, Value>,
    #[serde(default)]
    pub fonts: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Theme {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CompilerError::theme(format!("invalid theme: {}", e)))
    }

    /// The theme as it appears under `props.theme`
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone)]
pub struct ThemeProvider {
    theme: Rc<Theme>,
}

impl ThemeProvider {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme: Rc::new(theme),
        }
    }

    pub fn context(&self) -> RenderContext {
        RenderContext {
            theme: Some(Rc::clone(&self.theme)),
        }
    }

    /// Render `children` inside this provider
    pub fn render<R>(&self, children: impl FnOnce(&RenderContext) -> R) -> R {
        children(&self.context())
    }
}

/// What a component can see from its ancestors while rendering
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    theme: Option<Rc<Theme>>,
}

impl RenderContext {
    /// Context with no provider above it
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn use_theme(ctx: &RenderContext) -> Result<Rc<Theme>> {
    ctx.theme
        .clone()
        .ok_or_else(|| CompilerError::theme("use_theme must be used within a ThemeProvider"))
}

/// `theme.colors.primary` style lookup into the theme carried by `props`
pub fn theme_token<'a>(props: &'a Props, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(props.get(PROP_THEME)?, |value, segment| value.get(segment))
}
