//! RecordType - the stock `TypeMetadata` implementation, built declaratively.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::{
    GetInvoker, InvokeError, Record, ReflectError, SetInvoker, TypeDescriptor, TypeMetadata, Value,
};

/// Metadata for a record type assembled with [`RecordType::builder`].
///
/// Properties come in a few shapes:
/// - fields: stored in the record, readable and writable
/// - read-only fields: stored, but no setter
/// - computed properties: a getter function, no storage
/// - accessors: a getter and setter function pair
/// - write-only properties: a setter function only
///
/// # Example
///
/// ```rust
/// use metaprop_reflect::{RecordType, TypeDescriptor, TypeMetadata, Value};
///
/// let order = RecordType::builder("Order")
///     .field("id", TypeDescriptor::Integer)
///     .field("items", TypeDescriptor::list(TypeDescriptor::record("Item")))
///     .computed("label", TypeDescriptor::String, |order| {
///         Ok(Value::from(format!("order-{:?}", order.field("id"))))
///     })
///     .build();
///
/// assert!(order.has_getter("label"));
/// assert!(!order.has_setter("label"));
/// ```
#[derive(Debug)]
pub struct RecordType {
    name: String,
    getters: BTreeMap<String, (TypeDescriptor, GetInvoker)>,
    setters: BTreeMap<String, (TypeDescriptor, SetInvoker)>,
    fields: BTreeMap<String, TypeDescriptor>,
    // normalized name -> canonical name
    relaxed_names: HashMap<String, String>,
}

impl RecordType {
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            inner: RecordType {
                name: name.into(),
                getters: BTreeMap::new(),
                setters: BTreeMap::new(),
                fields: BTreeMap::new(),
                relaxed_names: HashMap::new(),
            },
        }
    }

    fn normalize(name: &str) -> String {
        name.chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl TypeMetadata for RecordType {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn has_getter(&self, name: &str) -> bool {
        self.getters.contains_key(name)
    }

    fn has_setter(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    fn getter_type(&self, name: &str) -> Result<TypeDescriptor, ReflectError> {
        self.getters
            .get(name)
            .map(|(ty, _)| ty.clone())
            .ok_or_else(|| ReflectError::no_getter(&self.name, name))
    }

    fn setter_type(&self, name: &str) -> Result<TypeDescriptor, ReflectError> {
        self.setters
            .get(name)
            .map(|(ty, _)| ty.clone())
            .ok_or_else(|| ReflectError::no_setter(&self.name, name))
    }

    fn get_invoker(&self, name: &str) -> Result<GetInvoker, ReflectError> {
        self.getters
            .get(name)
            .map(|(_, invoker)| invoker.clone())
            .ok_or_else(|| ReflectError::no_getter(&self.name, name))
    }

    fn set_invoker(&self, name: &str) -> Result<SetInvoker, ReflectError> {
        self.setters
            .get(name)
            .map(|(_, invoker)| invoker.clone())
            .ok_or_else(|| ReflectError::no_setter(&self.name, name))
    }

    fn find_property(&self, name: &str, relaxed: bool) -> Option<String> {
        if relaxed {
            return self.relaxed_names.get(&Self::normalize(name)).cloned();
        }
        (self.getters.contains_key(name) || self.setters.contains_key(name))
            .then(|| name.to_string())
    }

    fn getter_names(&self) -> Vec<String> {
        self.getters.keys().cloned().collect()
    }

    fn setter_names(&self) -> Vec<String> {
        self.setters.keys().cloned().collect()
    }

    fn field_defaults(&self) -> BTreeMap<String, Value> {
        self.fields
            .iter()
            .map(|(name, ty)| (name.clone(), ty.default_value()))
            .collect()
    }
}

/// Builder for [`RecordType`].
///
/// Declaring the same property name twice replaces the earlier declaration.
pub struct RecordTypeBuilder {
    inner: RecordType,
}

impl RecordTypeBuilder {
    /// A stored property with a getter and a setter.
    pub fn field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        let name = name.into();
        self.inner.setters.insert(
            name.clone(),
            (ty.clone(), SetInvoker::Field(name.clone())),
        );
        self.read_only(name, ty)
    }

    /// A stored property with a getter only.
    pub fn read_only(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        let name = name.into();
        self.inner.fields.insert(name.clone(), ty.clone());
        self.inner
            .getters
            .insert(name.clone(), (ty, GetInvoker::Field(name)));
        self
    }

    /// A getter computed from the rest of the record.
    pub fn computed<G>(mut self, name: impl Into<String>, ty: TypeDescriptor, getter: G) -> Self
    where
        G: Fn(&Record) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        self.inner
            .getters
            .insert(name.into(), (ty, GetInvoker::Method(Arc::new(getter))));
        self
    }

    /// A property backed by a getter and setter function pair.
    pub fn accessor<G, S>(
        mut self,
        name: impl Into<String>,
        ty: TypeDescriptor,
        getter: G,
        setter: S,
    ) -> Self
    where
        G: Fn(&Record) -> Result<Value, InvokeError> + Send + Sync + 'static,
        S: Fn(&mut Record, Value) -> Result<(), InvokeError> + Send + Sync + 'static,
    {
        let name = name.into();
        self.inner.setters.insert(
            name.clone(),
            (ty.clone(), SetInvoker::Method(Arc::new(setter))),
        );
        self.computed(name, ty, getter)
    }

    /// A setter function with no matching getter.
    pub fn write_only<S>(mut self, name: impl Into<String>, ty: TypeDescriptor, setter: S) -> Self
    where
        S: Fn(&mut Record, Value) -> Result<(), InvokeError> + Send + Sync + 'static,
    {
        self.inner
            .setters
            .insert(name.into(), (ty, SetInvoker::Method(Arc::new(setter))));
        self
    }

    pub fn build(mut self) -> Arc<RecordType> {
        let names: Vec<String> = self
            .inner
            .getters
            .keys()
            .chain(self.inner.setters.keys())
            .cloned()
            .collect();
        for name in names {
            self.inner
                .relaxed_names
                .insert(RecordType::normalize(&name), name);
        }
        Arc::new(self.inner)
    }
}
