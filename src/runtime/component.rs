//! Component handles and wrapper resolution
//!
//! A styled component may wrap another styled component directly or through
//! `forwardRef`/`memo` style wrappers. Looking up the base metadata walks
//! that chain, at most [`MAX_UNWRAP_DEPTH`] levels deep.

use super::metadata::StyleMetadata;
use crate::core::constants::MAX_UNWRAP_DEPTH;

use std::fmt;
use std::rc::Rc;

pub trait ComponentHandle: fmt::Debug {
    fn display_name(&self) -> String;

    /// Metadata carried by this component itself
    fn try_get_metadata(&self) -> Option<StyleMetadata> {
        None
    }

    /// The component this one wraps, if it is a wrapper
    fn inner(&self) -> Option<&dyn ComponentHandle> {
        None
    }

    /// Frozen components can neither carry nor expose metadata
    fn is_frozen(&self) -> bool {
        false
    }
}

/// Metadata of `component`, looking through wrappers.
pub fn resolve_metadata(component: &dyn ComponentHandle) -> Option<StyleMetadata> {
    let mut current = component;
    for _ in 0..MAX_UNWRAP_DEPTH {
        if current.is_frozen() {
            return None;
        }
        if let Some(metadata) = current.try_get_metadata() {
            return Some(metadata);
        }
        current = current.inner()?;
    }

    log::debug!(
        "stopped looking for style metadata below {} after {} levels",
        component.display_name(),
        MAX_UNWRAP_DEPTH
    );
    None
}

/// A platform component such as `View` or `Text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostComponent {
    name: String,
}

impl HostComponent {
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self { name: name.into() })
    }
}

impl ComponentHandle for HostComponent {
    fn display_name(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug)]
pub struct ForwardRef {
    render: Rc<dyn ComponentHandle>,
}

impl ForwardRef {
    pub fn new(render: Rc<dyn ComponentHandle>) -> Rc<Self> {
        Rc::new(Self { render })
    }
}

impl ComponentHandle for ForwardRef {
    fn display_name(&self) -> String {
        format!("ForwardRef({})", self.render.display_name())
    }

    fn inner(&self) -> Option<&dyn ComponentHandle> {
        Some(self.render.as_ref())
    }
}

#[derive(Debug)]
pub struct Memo {
    wrapped: Rc<dyn ComponentHandle>,
}

impl Memo {
    pub fn new(wrapped: Rc<dyn ComponentHandle>) -> Rc<Self> {
        Rc::new(Self { wrapped })
    }
}

impl ComponentHandle for Memo {
    fn display_name(&self) -> String {
        format!("Memo({})", self.wrapped.display_name())
    }

    fn inner(&self) -> Option<&dyn ComponentHandle> {
        Some(self.wrapped.as_ref())
    }
}

/// Animation wrapper; its component object is frozen
#[derive(Debug)]
pub struct Animated {
    wrapped: Rc<dyn ComponentHandle>,
}

impl Animated {
    pub fn new(wrapped: Rc<dyn ComponentHandle>) -> Rc<Self> {
        Rc::new(Self { wrapped })
    }
}

impl ComponentHandle for Animated {
    fn display_name(&self) -> String {
        format!("Animated.{}", self.wrapped.display_name())
    }

    fn is_frozen(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Tagged;

    impl ComponentHandle for Tagged {
        fn display_name(&self) -> String {
            "Tagged".into()
        }

        fn try_get_metadata(&self) -> Option<StyleMetadata> {
            Some(StyleMetadata {
                debug: true,
                ..StyleMetadata::default()
            })
        }
    }

    fn wrap(levels: usize) -> Rc<dyn ComponentHandle> {
        let mut component: Rc<dyn ComponentHandle> = Rc::new(Tagged);
        for level in 0..levels {
            component = if level % 2 == 0 {
                ForwardRef::new(component) as Rc<dyn ComponentHandle>
            } else {
                Memo::new(component) as Rc<dyn ComponentHandle>
            };
        }
        component
    }

    #[test]
    fn test_resolution_through_wrappers() {
        assert!(resolve_metadata(wrap(0).as_ref()).unwrap().debug);
        // memo(forwardRef(styled))
        assert!(resolve_metadata(wrap(2).as_ref()).is_some());
        assert!(resolve_metadata(wrap(4).as_ref()).is_some());
    }

    #[test]
    fn test_resolution_depth_is_bounded() {
        assert!(resolve_metadata(wrap(5).as_ref()).is_none());
        assert!(resolve_metadata(wrap(12).as_ref()).is_none());
    }

    #[test]
    fn test_frozen_and_host_components() {
        let animated = Animated::new(wrap(0));
        assert!(resolve_metadata(animated.as_ref()).is_none());
        assert_eq!(animated.display_name(), "Animated.Tagged");

        let view = HostComponent::new("View");
        assert!(resolve_metadata(view.as_ref()).is_none());
        assert_eq!(Memo::new(view).display_name(), "Memo(View)");
    }
}
