//! Prop filtering and attrs resolution

use super::metadata::Attrs;
use super::Props;
use crate::core::constants::{PROP_AS, PROP_THEME, TRANSIENT_PROP_PREFIX};

use std::rc::Rc;

/// Transient (`$`-prefixed) props, `as` and `theme` stay with the styled layer.
pub fn should_filter_prop(key: &str) -> bool {
    key.starts_with(TRANSIENT_PROP_PREFIX) || key == PROP_AS || key == PROP_THEME
}

pub fn has_transient_props(props: &Props) -> bool {
    props.keys().any(|key| key.starts_with(TRANSIENT_PROP_PREFIX))
}

/// Props to forward to the wrapped component
pub fn filter_props(props: &Props) -> Props {
    props
        .iter()
        .filter(|(key, _)| !should_filter_prop(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Attrs are defaults: explicitly passed props win.
pub fn merge_attrs_with_props(attrs: Option<&Attrs>, props: Props) -> Props {
    let resolved = match attrs.and_then(|attrs| attrs.resolve(&props)) {
        Some(resolved) => resolved,
        None => return props,
    };

    let mut merged = resolved;
    merged.extend(props);
    merged
}

/// Chain two attrs layers; the child's values win.
///
/// Two static objects are merged once. Otherwise both are evaluated per
/// render, the child seeing the props with the base results applied.
pub fn combine_attrs(base: Option<Attrs>, child: Option<Attrs>) -> Option<Attrs> {
    match (base, child) {
        (None, child) => child,
        (base, None) => base,
        (Some(Attrs::Static(mut base)), Some(Attrs::Static(child))) => {
            base.extend(child);
            Some(Attrs::Static(base))
        }
        (Some(base), Some(child)) => Some(Attrs::Computed(Rc::new(move |props: &Props| {
            let base_result = base.resolve(props);
            let child_result = match &base_result {
                Some(base_result) => {
                    let mut with_base = props.clone();
                    with_base.extend(base_result.clone());
                    child.resolve(&with_base)
                }
                None => child.resolve(props),
            };

            let mut combined = base_result.unwrap_or_default();
            combined.extend(child_result.unwrap_or_default());
            Some(combined)
        }))),
    }
}
