//! Style metadata attached to styled components

use super::props::combine_attrs;
use super::registry::{style_map_to_object, CompiledStyles, StyleEntry, StyleSheetRegistry};
use super::{Interpolation, Props, StyleObject};
use crate::emitter::{DynamicPatchBuilder, InstructionSet};

use std::fmt;
use std::rc::Rc;

pub type DynamicPatchFn = Rc<dyn Fn(&Props) -> Option<StyleObject>>;
pub type AttrsFn = Rc<dyn Fn(&Props) -> Option<Props>>;

/// Default props: a fixed object or computed from the incoming props
#[derive(Clone)]
pub enum Attrs {
    Static(Props),
    Computed(AttrsFn),
}

impl Attrs {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Props) -> Option<Props> + 'static,
    {
        Attrs::Computed(Rc::new(f))
    }

    pub fn resolve(&self, props: &Props) -> Option<Props> {
        match self {
            Attrs::Static(attrs) => Some(attrs.clone()),
            Attrs::Computed(f) => f(props),
        }
    }
}

impl fmt::Debug for Attrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attrs::Static(attrs) => f.debug_tuple("Static").field(attrs).finish(),
            Attrs::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

#[derive(Clone, Default)]
pub struct StyleMetadata {
    pub compiled_styles: Option<CompiledStyles>,
    pub style_keys: Option<Vec<String>>,
    pub get_dynamic_patch: Option<DynamicPatchFn>,
    pub attrs: Option<Attrs>,
    pub debug: bool,
}

impl fmt::Debug for StyleMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleMetadata")
            .field("compiled_styles", &self.compiled_styles)
            .field("style_keys", &self.style_keys)
            .field("get_dynamic_patch", &self.get_dynamic_patch.is_some())
            .field("attrs", &self.attrs)
            .field("debug", &self.debug)
            .finish()
    }
}

impl StyleMetadata {
    /// Materialize an instruction set against a registry.
    ///
    /// `expressions` are the template's interpolations, indexed by the
    /// builder entries.
    pub fn from_instructions(
        instructions: &InstructionSet,
        expressions: &[Interpolation],
        registry: &mut StyleSheetRegistry,
    ) -> Self {
        let mut metadata = StyleMetadata::default();

        if let Some(registration) = &instructions.style_sheet_registration {
            let compiled = registry.create([(
                registration.key.clone(),
                style_map_to_object(&registration.properties),
            )]);
            metadata.compiled_styles = Some(compiled);
            metadata.style_keys = Some(vec![registration.key.clone()]);
        }

        if let Some(builder) = &instructions.dynamic_patch_builder {
            metadata.get_dynamic_patch = Some(build_dynamic_patch(builder, expressions));
        }

        metadata
    }

    pub fn with_attrs(mut self, attrs: Option<Attrs>) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn style_keys(&self) -> &[String] {
        self.style_keys.as_deref().unwrap_or(&[])
    }

    pub fn has_dynamic_patch(&self) -> bool {
        self.get_dynamic_patch.is_some()
    }

    pub fn dynamic_patch(&self, props: &Props) -> Option<StyleObject> {
        self.get_dynamic_patch.as_ref().and_then(|patch| patch(props))
    }

    /// Registered entries in `style_keys` order; `None` when there are none.
    pub fn static_styles(&self) -> Option<Vec<StyleEntry>> {
        let compiled = self.compiled_styles.as_ref()?;
        let keys = self.style_keys();
        if keys.is_empty() {
            return None;
        }

        Some(
            keys.iter()
                .filter_map(|key| compiled.get(key).copied())
                .map(StyleEntry::Registered)
                .collect(),
        )
    }
}

/// Patch function for a builder: each entry evaluates its expression
/// against the props it is called with.
pub fn build_dynamic_patch(builder: &DynamicPatchBuilder, expressions: &[Interpolation]) -> DynamicPatchFn {
    let entries: Vec<(String, Interpolation)> = builder
        .entries
        .iter()
        .filter_map(|entry| {
            expressions
                .get(entry.expression_index)
                .map(|expr| (entry.property.clone(), expr.clone()))
        })
        .collect();

    Rc::new(move |props: &Props| {
        let patch: StyleObject = entries
            .iter()
            .map(|(property, expr)| (property.clone(), expr.evaluate(props)))
            .collect();
        Some(patch)
    })
}

/// Inherit from `base`: parent entries first, child wins on collisions.
pub fn merge_metadata(base: &StyleMetadata, child: &StyleMetadata) -> StyleMetadata {
    let compiled_styles = match (&base.compiled_styles, &child.compiled_styles) {
        (None, None) => None,
        (parent, own) => {
            let mut merged = parent.clone().unwrap_or_default();
            if let Some(own) = own {
                for (key, id) in own {
                    merged.insert(key.clone(), *id);
                }
            }
            Some(merged)
        }
    };

    let style_keys = match (&base.style_keys, &child.style_keys) {
        (None, None) => None,
        _ => Some(
            base.style_keys()
                .iter()
                .chain(child.style_keys())
                .cloned()
                .collect(),
        ),
    };

    StyleMetadata {
        compiled_styles,
        style_keys,
        get_dynamic_patch: create_combined_dynamic_patch(
            base.get_dynamic_patch.as_ref(),
            child.get_dynamic_patch.as_ref(),
        ),
        attrs: combine_attrs(base.attrs.clone(), child.attrs.clone()),
        debug: base.debug || child.debug,
    }
}

/// Both patches see the same props; the child's properties override.
pub fn create_combined_dynamic_patch(
    base: Option<&DynamicPatchFn>,
    child: Option<&DynamicPatchFn>,
) -> Option<DynamicPatchFn> {
    match (base, child) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(base), Some(child)) => {
            let base = base.clone();
            let child = child.clone();
            Some(Rc::new(move |props: &Props| {
                super::merger::merge_dynamic_patches(base(props), child(props))
            }))
        }
    }
}
