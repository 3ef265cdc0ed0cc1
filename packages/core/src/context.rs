//! NavigationContext - the collaborators one navigation call needs.

use std::fmt;

use metaprop_reflect::{ObjectFactory, TypeRegistry};

/// Ties wrappers to the object factory and type registry for the duration
/// of one top-level call.
///
/// The context is `Copy`: every wrapper created while walking a path gets
/// its own copy, so children never hold a reference back into their parent.
#[derive(Clone, Copy)]
pub struct NavigationContext<'c> {
    object_factory: &'c dyn ObjectFactory,
    registry: &'c TypeRegistry,
}

impl<'c> NavigationContext<'c> {
    pub fn new(object_factory: &'c dyn ObjectFactory, registry: &'c TypeRegistry) -> Self {
        Self {
            object_factory,
            registry,
        }
    }

    pub fn object_factory(&self) -> &'c dyn ObjectFactory {
        self.object_factory
    }

    pub fn registry(&self) -> &'c TypeRegistry {
        self.registry
    }
}

impl fmt::Debug for NavigationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationContext")
            .field("registry", self.registry)
            .finish_non_exhaustive()
    }
}
