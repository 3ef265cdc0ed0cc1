//! Type metadata: the per-type property table consumed by record wrappers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{InvokeError, Record, ReflectError, TypeDescriptor, Value};

/// Method-backed getter.
pub type GetterFn = Arc<dyn Fn(&Record) -> Result<Value, InvokeError> + Send + Sync>;

/// Method-backed setter.
pub type SetterFn = Arc<dyn Fn(&mut Record, Value) -> Result<(), InvokeError> + Send + Sync>;

/// How a property is read.
#[derive(Clone)]
pub enum GetInvoker {
    /// Read straight from the record's field storage.
    Field(String),
    /// Computed by a function of the record.
    Method(GetterFn),
}

impl GetInvoker {
    pub fn invoke(&self, target: &Record) -> Result<Value, InvokeError> {
        match self {
            GetInvoker::Field(field) => Ok(target.field(field).cloned().unwrap_or_default()),
            GetInvoker::Method(getter) => getter(target),
        }
    }

    /// Borrow the backing field without cloning it.
    ///
    /// Returns `None` for method getters, which have no storage of their own.
    pub fn field_ref<'r>(&self, target: &'r Record) -> Option<&'r Value> {
        match self {
            GetInvoker::Field(field) => target.field(field),
            GetInvoker::Method(_) => None,
        }
    }

    /// Mutably borrow the backing field so nested writes can happen in place.
    ///
    /// Returns `None` for method getters.
    pub fn field_mut<'r>(&self, target: &'r mut Record) -> Option<&'r mut Value> {
        match self {
            GetInvoker::Field(field) => Some(target.slot_mut(field)),
            GetInvoker::Method(_) => None,
        }
    }
}

impl fmt::Debug for GetInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GetInvoker::Field(field) => f.debug_tuple("Field").field(field).finish(),
            GetInvoker::Method(_) => f.write_str("Method(..)"),
        }
    }
}

/// How a property is written.
#[derive(Clone)]
pub enum SetInvoker {
    /// Store into the record's field storage as-is.
    Field(String),
    /// Handed to a function that decides what to store.
    Method(SetterFn),
}

impl SetInvoker {
    pub fn invoke(&self, target: &mut Record, value: Value) -> Result<(), InvokeError> {
        match self {
            SetInvoker::Field(field) => {
                target.set_field(field.clone(), value);
                Ok(())
            }
            SetInvoker::Method(setter) => setter(target, value),
        }
    }
}

impl fmt::Debug for SetInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetInvoker::Field(field) => f.debug_tuple("Field").field(field).finish(),
            SetInvoker::Method(_) => f.write_str("Method(..)"),
        }
    }
}

/// Reflective metadata for one record type.
///
/// Names passed to these methods are single property names (`items`, not
/// `items[0]` or `order.items`). Path-aware queries are layered on top by the
/// navigation core.
///
/// # Object Safety
///
/// This trait is object-safe: records hold their metadata as
/// `Arc<dyn TypeMetadata>`.
pub trait TypeMetadata: fmt::Debug + Send + Sync {
    /// The registered name of the type.
    fn type_name(&self) -> &str;

    fn has_getter(&self, name: &str) -> bool;

    fn has_setter(&self, name: &str) -> bool;

    /// Declared type returned by the property's getter.
    fn getter_type(&self, name: &str) -> Result<TypeDescriptor, ReflectError>;

    /// Declared type accepted by the property's setter.
    fn setter_type(&self, name: &str) -> Result<TypeDescriptor, ReflectError>;

    fn get_invoker(&self, name: &str) -> Result<GetInvoker, ReflectError>;

    fn set_invoker(&self, name: &str) -> Result<SetInvoker, ReflectError>;

    /// Canonical name of a property.
    ///
    /// With `relaxed`, underscores are ignored and letters compare
    /// case-insensitively, so `first_name` finds `firstName`.
    fn find_property(&self, name: &str, relaxed: bool) -> Option<String>;

    fn getter_names(&self) -> Vec<String>;

    fn setter_names(&self) -> Vec<String>;

    /// Initial field storage for a freshly constructed record.
    fn field_defaults(&self) -> BTreeMap<String, Value>;
}
