//! The Record type - an instance of a registered record type.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{TypeMetadata, Value};

/// A structured record: a value with a fixed, known set of named properties.
///
/// A record pairs a shared handle to its type's metadata with the storage
/// for its field-backed properties. Property access should go through the
/// metadata's invokers; the raw field accessors here bypass them and exist
/// for invoker implementations and tests.
///
/// Two records are equal when their type names and field storage are equal.
#[derive(Clone)]
pub struct Record {
    metadata: Arc<dyn TypeMetadata>,
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create a record with every field at its declared default.
    pub fn new(metadata: Arc<dyn TypeMetadata>) -> Self {
        let fields = metadata.field_defaults();
        Self { metadata, fields }
    }

    pub fn type_name(&self) -> &str {
        self.metadata.type_name()
    }

    pub fn metadata(&self) -> &Arc<dyn TypeMetadata> {
        &self.metadata
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Storage slot for a field, created as `Null` if it was never written.
    pub fn slot_mut(&mut self, name: &str) -> &mut Value {
        self.fields.entry(name.to_string()).or_default()
    }

    /// Write a field directly, returning the previous value.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Set a field and return the record, for building fixtures.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(name, value.into());
        self
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("type", &self.type_name())
            .field("fields", &self.fields)
            .finish()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name() && self.fields == other.fields
    }
}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name().hash(state);
        self.fields.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordType, TypeDescriptor};

    fn person() -> Arc<dyn TypeMetadata> {
        RecordType::builder("Person")
            .field("name", TypeDescriptor::String)
            .field("age", TypeDescriptor::Integer)
            .field("address", TypeDescriptor::record("Address"))
            .build()
    }

    #[test]
    fn new_record_uses_declared_defaults() {
        let record = Record::new(person());
        assert_eq!(record.type_name(), "Person");
        assert_eq!(record.field("name"), Some(&Value::from("")));
        assert_eq!(record.field("age"), Some(&Value::Integer(0)));
        assert_eq!(record.field("address"), Some(&Value::Null));
        assert_eq!(record.field("missing"), None);
    }

    #[test]
    fn equality_ignores_metadata_identity() {
        let a = Record::new(person()).with_field("name", "Ada");
        let b = Record::new(person()).with_field("name", "Ada");
        assert_eq!(a, b);

        let c = b.clone().with_field("age", 36);
        assert_ne!(a, c);
    }

    #[test]
    fn slot_mut_creates_missing_field() {
        let mut record = Record::new(person());
        *record.slot_mut("nickname") = Value::from("ada");
        assert_eq!(record.field("nickname"), Some(&Value::from("ada")));
    }

    #[test]
    fn debug_shows_type_name() {
        let record = Record::new(person());
        let debug = format!("{:?}", record);
        assert!(debug.contains("Person"));
        assert!(debug.contains("name"));
    }
}
