//! Declared and runtime type descriptors.

use std::fmt;

use crate::Value;

/// The type of a property, either as declared by type metadata or as
/// observed on a stored value.
///
/// `Unknown` is the generic "any value" type. Mappings report it for keys
/// they do not currently hold, since they have no schema to consult.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    #[default]
    Unknown,
    Bool,
    Integer,
    Float,
    String,
    Bytes,
    /// Sequence whose elements have the given type.
    List(Box<TypeDescriptor>),
    /// Mapping whose values have the given type.
    Map(Box<TypeDescriptor>),
    /// Record type, referenced by its registered name.
    Record(String),
}

impl TypeDescriptor {
    pub fn list(element: TypeDescriptor) -> Self {
        TypeDescriptor::List(Box::new(element))
    }

    pub fn map(value: TypeDescriptor) -> Self {
        TypeDescriptor::Map(Box::new(value))
    }

    pub fn record(name: impl Into<String>) -> Self {
        TypeDescriptor::Record(name.into())
    }

    /// The type of the values held inside a container type.
    ///
    /// Non-container types have no element type and report `Unknown`.
    pub fn element_type(&self) -> TypeDescriptor {
        match self {
            TypeDescriptor::List(element) | TypeDescriptor::Map(element) => (**element).clone(),
            _ => TypeDescriptor::Unknown,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TypeDescriptor::List(_))
    }

    /// Name of the record type, if this describes one.
    pub fn record_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Record(name) => Some(name),
            _ => None,
        }
    }

    /// The value a freshly constructed record holds for a field of this type.
    ///
    /// Scalars start at their zero value. Containers and records start absent
    /// (`Null`) and are materialized on first deep write.
    pub fn default_value(&self) -> Value {
        match self {
            TypeDescriptor::Bool => Value::Bool(false),
            TypeDescriptor::Integer => Value::Integer(0),
            TypeDescriptor::Float => Value::Float(0.0),
            TypeDescriptor::String => Value::String(String::new()),
            TypeDescriptor::Bytes => Value::Bytes(Vec::new()),
            TypeDescriptor::Unknown
            | TypeDescriptor::List(_)
            | TypeDescriptor::Map(_)
            | TypeDescriptor::Record(_) => Value::Null,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Unknown => f.write_str("unknown"),
            TypeDescriptor::Bool => f.write_str("bool"),
            TypeDescriptor::Integer => f.write_str("integer"),
            TypeDescriptor::Float => f.write_str("float"),
            TypeDescriptor::String => f.write_str("string"),
            TypeDescriptor::Bytes => f.write_str("bytes"),
            TypeDescriptor::List(element) => write!(f, "list<{}>", element),
            TypeDescriptor::Map(value) => write!(f, "map<{}>", value),
            TypeDescriptor::Record(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_type_of_containers() {
        let items = TypeDescriptor::list(TypeDescriptor::record("Item"));
        assert_eq!(items.element_type(), TypeDescriptor::record("Item"));

        let scores = TypeDescriptor::map(TypeDescriptor::Integer);
        assert_eq!(scores.element_type(), TypeDescriptor::Integer);

        assert_eq!(TypeDescriptor::String.element_type(), TypeDescriptor::Unknown);
    }

    #[test]
    fn defaults_leave_composites_absent() {
        assert_eq!(TypeDescriptor::String.default_value(), Value::from(""));
        assert_eq!(TypeDescriptor::Integer.default_value(), Value::Integer(0));
        assert_eq!(TypeDescriptor::Bool.default_value(), Value::Bool(false));
        assert!(TypeDescriptor::record("Address").default_value().is_null());
        assert!(TypeDescriptor::list(TypeDescriptor::Unknown)
            .default_value()
            .is_null());
    }

    #[test]
    fn display_nests() {
        let ty = TypeDescriptor::map(TypeDescriptor::list(TypeDescriptor::record("Order")));
        assert_eq!(ty.to_string(), "map<list<Order>>");
        assert_eq!(TypeDescriptor::Unknown.to_string(), "unknown");
    }

    #[test]
    fn record_name() {
        assert_eq!(TypeDescriptor::record("User").record_name(), Some("User"));
        assert_eq!(TypeDescriptor::String.record_name(), None);
    }
}
