//! Styled components
//!
//! `styled(Component)` produces a [`StyledFactory`]. The compiled output
//! calls [`StyledFactory::with_styles`]; uncompiled templates go through
//! [`StyledFactory::from_template`].

use super::component::{resolve_metadata, ComponentHandle, HostComponent};
use super::fallback::parse_template;
use super::merger::build_style_list;
use super::metadata::{merge_metadata, Attrs, StyleMetadata};
use super::props::{combine_attrs, filter_props, has_transient_props, merge_attrs_with_props};
use super::registry::{StyleEntry, StyleSheetRegistry};
use super::theme::{use_theme, RenderContext};
use super::{Interpolation, Props};
use crate::core::constants::{PROP_AS, PROP_STYLE, PROP_THEME};
use crate::error::Result;

use serde_json::Value;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// What a styled component renders: the target component, the props it
/// receives and its style list.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedElement {
    pub component: String,
    pub props: Props,
    pub style: Option<Vec<StyleEntry>>,
}

/// One `styled(Component)` call site
pub struct StyledFactory {
    base: Rc<dyn ComponentHandle>,
    attrs: Option<Attrs>,
    fallback_warned: Cell<bool>,
}

impl StyledFactory {
    pub fn new(base: Rc<dyn ComponentHandle>) -> Self {
        Self {
            base,
            attrs: None,
            fallback_warned: Cell::new(false),
        }
    }

    /// `styled.View` and friends
    pub fn host(name: &str) -> Self {
        Self::new(HostComponent::new(name))
    }

    /// Entry point for compiled output
    pub fn with_styles(&self, metadata: StyleMetadata) -> StyledComponent {
        let attrs = combine_attrs(self.attrs.clone(), metadata.attrs.clone());
        StyledComponent::create(Rc::clone(&self.base), metadata.with_attrs(attrs))
    }

    /// Parse an uncompiled template on first use
    pub fn from_template(
        &self,
        strings: &[&str],
        interpolations: &[Interpolation],
        registry: &mut StyleSheetRegistry,
    ) -> StyledComponent {
        if !self.fallback_warned.replace(true) {
            log::warn!(
                "styled({}) template is being parsed at runtime; enable the build-time transform for better performance",
                self.base.display_name()
            );
        }

        let metadata = parse_template(strings, interpolations, registry).with_attrs(self.attrs.clone());
        StyledComponent::create(Rc::clone(&self.base), metadata)
    }

    /// A factory for the same component with extra default props
    pub fn attrs(&self, attrs: Attrs) -> StyledFactory {
        Self {
            base: Rc::clone(&self.base),
            attrs: combine_attrs(self.attrs.clone(), Some(attrs)),
            fallback_warned: Cell::new(false),
        }
    }
}

#[derive(Clone)]
pub struct StyledComponent {
    inner: Rc<StyledInner>,
}

struct StyledInner {
    base: Rc<dyn ComponentHandle>,
    display_name: String,
    /// As passed in, before inheritance
    own: StyleMetadata,
    /// Inherited from the base component, then this component's own
    merged: StyleMetadata,
    /// Static entries, computed once
    static_styles: Option<Vec<StyleEntry>>,
}

impl StyledComponent {
    fn create(base: Rc<dyn ComponentHandle>, metadata: StyleMetadata) -> Self {
        let merged = match resolve_metadata(base.as_ref()) {
            Some(inherited) => merge_metadata(&inherited, &metadata),
            None => metadata.clone(),
        };
        let static_styles = merged.static_styles();
        let display_name = format!("Styled({})", base.display_name());

        if merged.debug {
            log::debug!("{} created with {:?}", display_name, merged);
        }

        Self {
            inner: Rc::new(StyledInner {
                base,
                display_name,
                own: metadata,
                merged,
                static_styles,
            }),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.inner.display_name
    }

    /// The metadata other components inherit. Absent when the base is
    /// frozen.
    pub fn metadata(&self) -> Option<&StyleMetadata> {
        if self.inner.base.is_frozen() {
            None
        } else {
            Some(&self.inner.merged)
        }
    }

    /// Same styles, attrs replaced
    pub fn attrs(&self, attrs: Attrs) -> StyledComponent {
        let metadata = self.inner.own.clone().with_attrs(Some(attrs));
        StyledComponent::create(Rc::clone(&self.inner.base), metadata)
    }

    pub fn render(&self, props: Props, ctx: &RenderContext) -> Result<RenderedElement> {
        let inner = &self.inner;
        let merged = &inner.merged;

        let has_external_style = props.get(PROP_STYLE).map_or(false, is_truthy);

        // Nothing per-render: forward the precomputed list
        if !merged.has_dynamic_patch() && merged.attrs.is_none() && !has_external_style {
            let component = self.target_component(&props, None);
            let mut forwarded = if !has_transient_props(&props)
                && !props.contains_key(PROP_AS)
                && !props.contains_key(PROP_THEME)
            {
                props
            } else {
                filter_props(&props)
            };
            forwarded.remove(PROP_STYLE);

            return Ok(RenderedElement {
                component,
                props: forwarded,
                style: inner.static_styles.clone(),
            });
        }

        let mut rest = props;
        let explicit_as = rest.remove(PROP_AS);
        let external_style = rest.remove(PROP_STYLE);

        let theme = use_theme(ctx)?;
        rest.insert(PROP_THEME.to_string(), theme.to_value());

        let mut merged_props = merge_attrs_with_props(merged.attrs.as_ref(), rest);
        let attrs_as = merged_props.remove(PROP_AS);
        let dynamic_patch = merged.dynamic_patch(&merged_props);

        let style = build_style_list(
            merged.compiled_styles.as_ref(),
            merged.style_keys(),
            dynamic_patch,
            external_style.as_ref(),
        );

        let component = match explicit_as.as_ref().and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => self.target_component(&Props::new(), attrs_as.as_ref()),
        };

        let mut forwarded = filter_props(&merged_props);
        forwarded.remove(PROP_STYLE);

        Ok(RenderedElement {
            component,
            props: forwarded,
            style: Some(style),
        })
    }

    /// `as` prop, then an `as` from attrs, then the wrapped component
    fn target_component(&self, props: &Props, fallback: Option<&Value>) -> String {
        props
            .get(PROP_AS)
            .or(fallback)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.inner.base.display_name())
    }
}

fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

impl fmt::Debug for StyledComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyledComponent")
            .field("display_name", &self.inner.display_name)
            .field("metadata", &self.inner.merged)
            .finish()
    }
}

impl ComponentHandle for StyledComponent {
    fn display_name(&self) -> String {
        self.inner.display_name.clone()
    }

    fn try_get_metadata(&self) -> Option<StyleMetadata> {
        self.metadata().cloned()
    }

    fn inner(&self) -> Option<&dyn ComponentHandle> {
        Some(self.inner.base.as_ref())
    }
}
