//! Object construction for declared types.

use std::sync::Arc;

use crate::{Record, ReflectError, TypeDescriptor, TypeRegistry, Value};

/// Builds fresh values of a declared type.
///
/// Used by the navigator to materialize absent intermediates during deep
/// writes.
pub trait ObjectFactory: Send + Sync {
    fn create(&self, ty: &TypeDescriptor) -> Result<Value, ReflectError>;
}

/// The stock factory.
///
/// - `Unknown` and `Map` types become empty mappings
/// - `List` types become empty sequences
/// - record types become records of the registered type with default fields
/// - scalars become their zero value
pub struct DefaultObjectFactory {
    registry: Arc<TypeRegistry>,
}

impl DefaultObjectFactory {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }
}

impl ObjectFactory for DefaultObjectFactory {
    fn create(&self, ty: &TypeDescriptor) -> Result<Value, ReflectError> {
        match ty {
            TypeDescriptor::Unknown | TypeDescriptor::Map(_) => Ok(Value::map()),
            TypeDescriptor::List(_) => Ok(Value::array()),
            TypeDescriptor::Record(name) => {
                let metadata = self.registry.require(name)?;
                Ok(Value::Record(Record::new(metadata)))
            }
            scalar => Ok(scalar.default_value()),
        }
    }
}

// Blanket implementations for shared and boxed factories

impl<T: ObjectFactory + ?Sized> ObjectFactory for Arc<T> {
    fn create(&self, ty: &TypeDescriptor) -> Result<Value, ReflectError> {
        self.as_ref().create(ty)
    }
}

impl<T: ObjectFactory + ?Sized> ObjectFactory for Box<T> {
    fn create(&self, ty: &TypeDescriptor) -> Result<Value, ReflectError> {
        self.as_ref().create(ty)
    }
}
