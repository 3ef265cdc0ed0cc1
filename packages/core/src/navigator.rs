//! Navigator - the entry point owning the navigation collaborators.

use std::fmt;
use std::sync::Arc;

use metaprop_reflect::{DefaultObjectFactory, ObjectFactory, TypeRegistry, Value};

use crate::{MetaClass, MetaObject, NavigationContext, Result};

/// Owns the type registry and object factory, and hands out a fresh
/// [`NavigationContext`] for every call.
///
/// A `Navigator` holds no per-call state, so one instance can be shared
/// (it is cheap to clone) and used from several threads, each navigating its
/// own roots.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use metaprop_core::Navigator;
/// use metaprop_reflect::{Record, RecordType, TypeDescriptor, TypeRegistry, Value};
///
/// let registry = Arc::new(TypeRegistry::new());
/// registry
///     .register(
///         RecordType::builder("User")
///             .field("name", TypeDescriptor::String)
///             .build(),
///     )
///     .unwrap();
///
/// let navigator = Navigator::new(registry.clone());
/// let mut user = Value::Record(Record::new(registry.require("User").unwrap()));
///
/// navigator.set_value(&mut user, "name", "Grace").unwrap();
/// assert_eq!(
///     navigator.get_value(&mut user, "name").unwrap(),
///     Some(Value::from("Grace"))
/// );
/// assert!(navigator.get_value(&mut user, "age").is_err());
/// ```
#[derive(Clone)]
pub struct Navigator {
    registry: Arc<TypeRegistry>,
    object_factory: Arc<dyn ObjectFactory>,
}

impl Navigator {
    /// A navigator using [`DefaultObjectFactory`] over the same registry.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        let object_factory = Arc::new(DefaultObjectFactory::new(registry.clone()));
        Self {
            registry,
            object_factory,
        }
    }

    /// Replace the object factory used to materialize intermediates.
    pub fn with_object_factory(mut self, object_factory: Arc<dyn ObjectFactory>) -> Self {
        self.object_factory = object_factory;
        self
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn object_factory(&self) -> &Arc<dyn ObjectFactory> {
        &self.object_factory
    }

    pub fn context(&self) -> NavigationContext<'_> {
        NavigationContext::new(self.object_factory.as_ref(), &self.registry)
    }

    pub fn meta_object<'v>(&self, root: &'v mut Value) -> MetaObject<'v, '_> {
        MetaObject::new(root, self.context())
    }

    pub fn meta_class(&self, type_name: &str) -> Result<MetaClass<'_>> {
        MetaClass::for_type(type_name, &self.registry)
    }

    pub fn get_value(&self, root: &mut Value, path: &str) -> Result<Option<Value>> {
        self.meta_object(root).get_value(path)
    }

    pub fn set_value(&self, root: &mut Value, path: &str, value: impl Into<Value>) -> Result<()> {
        self.meta_object(root).set_value(path, value)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Arc::new(TypeRegistry::new()))
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaprop_reflect::{ReflectError, TypeDescriptor};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts constructions so tests can check what was materialized.
    struct CountingFactory {
        inner: DefaultObjectFactory,
        created: AtomicUsize,
    }

    impl ObjectFactory for CountingFactory {
        fn create(&self, ty: &TypeDescriptor) -> std::result::Result<Value, ReflectError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            self.inner.create(ty)
        }
    }

    #[test]
    fn navigators_share_collaborators() {
        let navigator = Navigator::default();
        let clone = navigator.clone();
        assert!(Arc::ptr_eq(navigator.registry(), clone.registry()));
    }

    #[test]
    fn custom_factory_is_used_for_records() {
        let registry = Arc::new(TypeRegistry::new());
        registry
            .register(
                metaprop_reflect::RecordType::builder("Box")
                    .field("inner", TypeDescriptor::record("Box"))
                    .field("label", TypeDescriptor::String)
                    .build(),
            )
            .unwrap();
        let factory = Arc::new(CountingFactory {
            inner: DefaultObjectFactory::new(registry.clone()),
            created: AtomicUsize::new(0),
        });
        let navigator = Navigator::new(registry.clone()).with_object_factory(factory.clone());

        let mut root = factory
            .create(&TypeDescriptor::record("Box"))
            .unwrap();
        navigator
            .set_value(&mut root, "inner.inner.label", "deep")
            .unwrap();
        // the root plus two intermediates
        assert_eq!(factory.created.load(Ordering::SeqCst), 3);

        navigator
            .set_value(&mut root, "inner.label", "shallow")
            .unwrap();
        assert_eq!(factory.created.load(Ordering::SeqCst), 3);
        assert_eq!(
            navigator.get_value(&mut root, "inner.inner.label").unwrap(),
            Some(Value::from("deep"))
        );
    }

    #[test]
    fn meta_class_lookup() {
        let navigator = Navigator::default();
        assert!(navigator.meta_class("Nothing").is_err());
    }
}
