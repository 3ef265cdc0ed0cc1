//! Error types for the reflection layer.
//!
//! These cover metadata lookups and object construction. Navigation errors
//! (index out of range, unsupported representations) belong to the core layer.

use std::fmt;

use crate::TypeDescriptor;

/// Which half of a property's accessor pair an operation needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Getter,
    Setter,
}

impl fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorKind::Getter => f.write_str("getter"),
            AccessorKind::Setter => f.write_str("setter"),
        }
    }
}

/// Failure reported by a method-backed getter or setter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct InvokeError {
    message: String,
}

impl InvokeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors at the reflection layer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// The type declares no accessor of the requested kind for the property.
    #[error("there is no {accessor} for property named '{property}' in '{type_name}'")]
    NoSuchProperty {
        type_name: String,
        property: String,
        accessor: AccessorKind,
    },

    /// A record type was referenced by name but never registered.
    #[error("no type metadata registered for '{type_name}'")]
    UnknownType { type_name: String },

    /// A record type name was registered twice.
    #[error("type metadata for '{type_name}' is already registered")]
    DuplicateType { type_name: String },

    /// An object factory could not produce a value of the requested type.
    #[error("cannot create an instance of {target}: {message}")]
    Instantiation {
        target: TypeDescriptor,
        message: String,
    },
}

impl ReflectError {
    pub(crate) fn no_getter(type_name: &str, property: &str) -> Self {
        ReflectError::NoSuchProperty {
            type_name: type_name.to_string(),
            property: property.to_string(),
            accessor: AccessorKind::Getter,
        }
    }

    pub(crate) fn no_setter(type_name: &str, property: &str) -> Self {
        ReflectError::NoSuchProperty {
            type_name: type_name.to_string(),
            property: property.to_string(),
            accessor: AccessorKind::Setter,
        }
    }
}
