//! Error types for the navigation layer.

use std::error::Error as StdError;
use std::fmt;

use metaprop_reflect::{
    AccessorKind, InvokeError, PathError, ReflectError, TypeDescriptor, ValueKind,
};

/// Boxed cause carried by [`Error::PropertyInstantiation`].
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors at the navigation layer.
///
/// Every variant carries enough context (property name, declared type,
/// cause) to diagnose a failure without re-walking the path. A key missing
/// from a mapping is not an error: readers report it as `Ok(None)`.
#[derive(Debug)]
pub enum Error {
    /// A record path segment names a property its type does not declare.
    NoSuchProperty {
        type_name: String,
        property: String,
        accessor: AccessorKind,
    },

    /// Indexed access past the end of a sequence, or into an absent one.
    IndexOutOfRange {
        property: String,
        index: usize,
        len: usize,
    },

    /// Indexed access into a value that is not a sequence.
    NotASequence { property: String, found: ValueKind },

    /// An absent intermediate could not be constructed or stored.
    PropertyInstantiation {
        property: String,
        target: TypeDescriptor,
        source: BoxError,
    },

    /// A sequence-only operation on a record or mapping, or a property
    /// operation on a sequence.
    UnsupportedOperation {
        operation: &'static str,
        representation: &'static str,
    },

    /// The value is not a record, mapping or sequence.
    UnsupportedRepresentation { found: ValueKind },

    /// The property path failed to parse.
    Path(PathError),

    /// A method-backed getter or setter failed.
    Invoke {
        type_name: String,
        property: String,
        accessor: AccessorKind,
        source: InvokeError,
    },

    /// Error from the reflection layer.
    Reflect(ReflectError),
}

impl Error {
    pub(crate) fn instantiation(
        property: &str,
        target: &TypeDescriptor,
        source: impl Into<BoxError>,
    ) -> Self {
        Error::PropertyInstantiation {
            property: property.to_string(),
            target: target.clone(),
            source: source.into(),
        }
    }

    pub(crate) fn unsupported(operation: &'static str, representation: &'static str) -> Self {
        Error::UnsupportedOperation {
            operation,
            representation,
        }
    }

    pub(crate) fn invoke(
        type_name: &str,
        property: &str,
        accessor: AccessorKind,
        source: InvokeError,
    ) -> Self {
        Error::Invoke {
            type_name: type_name.to_string(),
            property: property.to_string(),
            accessor,
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoSuchProperty {
                type_name,
                property,
                accessor,
            } => write!(
                f,
                "there is no {} for property named '{}' in '{}'",
                accessor, property, type_name
            ),
            Error::IndexOutOfRange {
                property,
                index,
                len,
            } => write!(
                f,
                "index {} out of range for '{}' (length {})",
                index, property, len
            ),
            Error::NotASequence { property, found } => {
                write!(f, "'{}' is not a sequence (found {})", property, found)
            }
            Error::PropertyInstantiation {
                property,
                target,
                source,
            } => write!(
                f,
                "cannot set value of property '{}' because it is absent and cannot be instantiated as {}: {}",
                property, target, source
            ),
            Error::UnsupportedOperation {
                operation,
                representation,
            } => write!(f, "{} is not supported on a {}", operation, representation),
            Error::UnsupportedRepresentation { found } => {
                write!(f, "cannot navigate into a value of kind {}", found)
            }
            Error::Path(e) => write!(f, "path error: {}", e),
            Error::Invoke {
                type_name,
                property,
                accessor,
                source,
            } => write!(
                f,
                "{} of '{}' in '{}' failed: {}",
                accessor, property, type_name, source
            ),
            Error::Reflect(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::PropertyInstantiation { source, .. } => Some(source.as_ref()),
            Error::Path(e) => Some(e),
            Error::Invoke { source, .. } => Some(source),
            Error::Reflect(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PathError> for Error {
    fn from(e: PathError) -> Self {
        Error::Path(e)
    }
}

impl From<ReflectError> for Error {
    fn from(e: ReflectError) -> Self {
        match e {
            ReflectError::NoSuchProperty {
                type_name,
                property,
                accessor,
            } => Error::NoSuchProperty {
                type_name,
                property,
                accessor,
            },
            other => Error::Reflect(other),
        }
    }
}

/// Result type for navigation operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
