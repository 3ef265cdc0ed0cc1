//! Object wrappers: single-segment property access per representation kind.
//!
//! A wrapper resolves one path segment against the value it borrows. Deeper
//! segments are handled by the caller, which asks the wrapper for the child
//! value, wraps that in turn and recurses. See [`MetaObject`](crate::MetaObject).

mod bean;
mod collection;
mod indexed;
mod map;

pub use bean::BeanWrapper;
pub use collection::CollectionWrapper;
pub use map::MapWrapper;

use metaprop_reflect::{PathSegment, TypeDescriptor, Value};

use crate::{Error, NavigationContext, Result};

/// Why a child value is being looked up.
///
/// Writes tolerate a few things reads do not: a missing collection, or the
/// slot one past the end of a sequence, are absent (to be materialized)
/// instead of out of range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    Read,
    Write,
}

/// A child value resolved by a wrapper.
#[derive(Debug)]
pub enum Child<'w> {
    /// The child's storage inside the parent, mutated in place.
    Borrowed(&'w mut Value),
    /// A copy produced by a method getter. Changes to it only reach the
    /// parent when it is written back through the property's setter.
    Detached(Value),
}

impl Child<'_> {
    pub fn value(&self) -> &Value {
        match self {
            Child::Borrowed(value) => value,
            Child::Detached(value) => value,
        }
    }

    pub fn value_mut(&mut self) -> &mut Value {
        match self {
            Child::Borrowed(value) => value,
            Child::Detached(value) => value,
        }
    }

    /// The value to write back into the parent, if the child is a copy.
    pub fn into_detached(self) -> Option<Value> {
        match self {
            Child::Borrowed(_) => None,
            Child::Detached(value) => Some(value),
        }
    }
}

/// Wrapper over one navigable value, chosen by its representation kind.
///
/// The variant set is closed: records, mappings and sequences. Anything else
/// cannot be navigated into.
#[derive(Debug)]
pub enum ObjectWrapper<'v, 'c> {
    Bean(BeanWrapper<'v, 'c>),
    Map(MapWrapper<'v, 'c>),
    Collection(CollectionWrapper<'v, 'c>),
}

impl<'v, 'c> ObjectWrapper<'v, 'c> {
    /// Select the wrapper for a value's representation kind.
    pub fn for_value(value: &'v mut Value, ctx: NavigationContext<'c>) -> Result<Self> {
        let wrapper = match value {
            Value::Record(record) => ObjectWrapper::Bean(BeanWrapper::new(record, ctx)),
            Value::Map(map) => ObjectWrapper::Map(MapWrapper::new(map, ctx)),
            Value::Array(items) => ObjectWrapper::Collection(CollectionWrapper::new(items, ctx)),
            other => {
                return Err(Error::UnsupportedRepresentation {
                    found: other.kind(),
                })
            }
        };
        log::trace!("selected {} wrapper", wrapper.representation());
        Ok(wrapper)
    }

    /// Short name of the wrapped representation, for diagnostics.
    pub fn representation(&self) -> &'static str {
        match self {
            ObjectWrapper::Bean(_) => bean::REPRESENTATION,
            ObjectWrapper::Map(_) => map::REPRESENTATION,
            ObjectWrapper::Collection(_) => collection::REPRESENTATION,
        }
    }

    pub fn context(&self) -> NavigationContext<'c> {
        match self {
            ObjectWrapper::Bean(w) => w.context(),
            ObjectWrapper::Map(w) => w.context(),
            ObjectWrapper::Collection(w) => w.context(),
        }
    }

    /// Resolve one segment. `None` means the mapping has no such key.
    pub fn get(&self, segment: &PathSegment) -> Result<Option<Value>> {
        match self {
            ObjectWrapper::Bean(w) => w.get(segment),
            ObjectWrapper::Map(w) => w.get(segment),
            ObjectWrapper::Collection(w) => w.get(segment),
        }
    }

    pub fn set(&mut self, segment: &PathSegment, value: Value) -> Result<()> {
        match self {
            ObjectWrapper::Bean(w) => w.set(segment, value),
            ObjectWrapper::Map(w) => w.set(segment, value),
            ObjectWrapper::Collection(w) => w.set(segment, value),
        }
    }

    /// Resolve one segment to a child value that can be navigated into.
    ///
    /// Absent and `Null` children are `None`.
    pub fn child(&mut self, segment: &PathSegment, lookup: Lookup) -> Result<Option<Child<'_>>> {
        match self {
            ObjectWrapper::Bean(w) => w.child(segment, lookup),
            ObjectWrapper::Map(w) => w.child(segment, lookup),
            ObjectWrapper::Collection(w) => w.child(segment, lookup),
        }
    }

    /// Construct an absent child, store it under `segment` and return it.
    pub fn instantiate_child(&mut self, segment: &PathSegment) -> Result<Child<'_>> {
        match self {
            ObjectWrapper::Bean(w) => w.instantiate_child(segment),
            ObjectWrapper::Map(w) => w.instantiate_child(segment),
            ObjectWrapper::Collection(w) => w.instantiate_child(segment),
        }
    }

    pub fn find_property(&self, name: &str, relaxed: bool) -> Result<Option<String>> {
        match self {
            ObjectWrapper::Bean(w) => Ok(w.find_property(name, relaxed)),
            ObjectWrapper::Map(w) => Ok(w.find_property(name, relaxed)),
            ObjectWrapper::Collection(w) => w.find_property(name, relaxed),
        }
    }

    pub fn getter_names(&self) -> Result<Vec<String>> {
        match self {
            ObjectWrapper::Bean(w) => Ok(w.getter_names()),
            ObjectWrapper::Map(w) => Ok(w.getter_names()),
            ObjectWrapper::Collection(w) => w.getter_names(),
        }
    }

    pub fn setter_names(&self) -> Result<Vec<String>> {
        match self {
            ObjectWrapper::Bean(w) => Ok(w.setter_names()),
            ObjectWrapper::Map(w) => Ok(w.setter_names()),
            ObjectWrapper::Collection(w) => w.setter_names(),
        }
    }

    pub fn getter_type(&mut self, name: &str) -> Result<TypeDescriptor> {
        match self {
            ObjectWrapper::Bean(w) => w.getter_type(name),
            ObjectWrapper::Map(w) => w.getter_type(name),
            ObjectWrapper::Collection(w) => w.getter_type(name),
        }
    }

    pub fn setter_type(&mut self, name: &str) -> Result<TypeDescriptor> {
        match self {
            ObjectWrapper::Bean(w) => w.setter_type(name),
            ObjectWrapper::Map(w) => w.setter_type(name),
            ObjectWrapper::Collection(w) => w.setter_type(name),
        }
    }

    pub fn has_getter(&mut self, name: &str) -> Result<bool> {
        match self {
            ObjectWrapper::Bean(w) => w.has_getter(name),
            ObjectWrapper::Map(w) => w.has_getter(name),
            ObjectWrapper::Collection(w) => w.has_getter(name),
        }
    }

    pub fn has_setter(&self, name: &str) -> Result<bool> {
        match self {
            ObjectWrapper::Bean(w) => Ok(w.has_setter(name)),
            ObjectWrapper::Map(w) => Ok(w.has_setter(name)),
            ObjectWrapper::Collection(w) => w.has_setter(name),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, ObjectWrapper::Collection(_))
    }

    pub fn add(&mut self, element: Value) -> Result<()> {
        match self {
            ObjectWrapper::Bean(_) | ObjectWrapper::Map(_) => {
                Err(Error::unsupported("add", self.representation()))
            }
            ObjectWrapper::Collection(w) => {
                w.add(element);
                Ok(())
            }
        }
    }

    pub fn add_all(&mut self, elements: Vec<Value>) -> Result<()> {
        match self {
            ObjectWrapper::Bean(_) | ObjectWrapper::Map(_) => {
                Err(Error::unsupported("add_all", self.representation()))
            }
            ObjectWrapper::Collection(w) => {
                w.add_all(elements);
                Ok(())
            }
        }
    }
}
