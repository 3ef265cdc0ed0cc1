//! MetaObject - path navigation over one root value.

use metaprop_reflect::{PathSegment, TypeDescriptor, Value};

use crate::wrapper::{Lookup, ObjectWrapper};
use crate::{NavigationContext, Result};

/// Reads and writes values inside a root by property path.
///
/// A `MetaObject` exclusively borrows its root for as long as it lives. Each
/// call parses the head segment of the path, wraps the current value
/// according to its representation and either resolves the segment directly
/// or moves one level down and recurses on the rest of the path.
///
/// Reads never create anything: an absent intermediate makes the whole read
/// absent. Writes create absent intermediates on the way down.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use metaprop_core::{MetaObject, NavigationContext};
/// use metaprop_reflect::{DefaultObjectFactory, TypeRegistry, Value};
///
/// let registry = Arc::new(TypeRegistry::new());
/// let factory = DefaultObjectFactory::new(registry.clone());
/// let ctx = NavigationContext::new(&factory, &registry);
///
/// let mut root = Value::map();
/// let mut meta = MetaObject::new(&mut root, ctx);
/// meta.set_value("a.b[0].c", 5).unwrap();
/// assert_eq!(meta.get_value("a.b[0].c").unwrap(), Some(Value::from(5)));
/// ```
#[derive(Debug)]
pub struct MetaObject<'v, 'c> {
    value: &'v mut Value,
    ctx: NavigationContext<'c>,
}

impl<'v, 'c> MetaObject<'v, 'c> {
    pub fn new(value: &'v mut Value, ctx: NavigationContext<'c>) -> Self {
        Self { value, ctx }
    }

    pub fn value(&self) -> &Value {
        self.value
    }

    pub fn context(&self) -> NavigationContext<'c> {
        self.ctx
    }

    /// Wrapper over the root value.
    pub fn wrapper(&mut self) -> Result<ObjectWrapper<'_, 'c>> {
        ObjectWrapper::for_value(self.value, self.ctx)
    }

    /// Read the value at `path`, or `None` if it or an intermediate is
    /// absent.
    pub fn get_value(&mut self, path: &str) -> Result<Option<Value>> {
        let segment = PathSegment::parse(path)?;
        resolve(&mut self.wrapper()?, &segment)
    }

    /// Write `value` at `path`, creating absent intermediates.
    ///
    /// Writing `Null` where an intermediate is absent does nothing: there is
    /// no point building structure to hold nothing.
    pub fn set_value(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let segment = PathSegment::parse(path)?;
        assign(&mut self.wrapper()?, &segment, value.into())
    }

    pub fn find_property(&mut self, path: &str, relaxed: bool) -> Result<Option<String>> {
        self.wrapper()?.find_property(path, relaxed)
    }

    pub fn getter_names(&mut self) -> Result<Vec<String>> {
        self.wrapper()?.getter_names()
    }

    pub fn setter_names(&mut self) -> Result<Vec<String>> {
        self.wrapper()?.setter_names()
    }

    pub fn getter_type(&mut self, path: &str) -> Result<TypeDescriptor> {
        self.wrapper()?.getter_type(path)
    }

    pub fn setter_type(&mut self, path: &str) -> Result<TypeDescriptor> {
        self.wrapper()?.setter_type(path)
    }

    pub fn has_getter(&mut self, path: &str) -> Result<bool> {
        self.wrapper()?.has_getter(path)
    }

    pub fn has_setter(&mut self, path: &str) -> Result<bool> {
        self.wrapper()?.has_setter(path)
    }

    pub fn is_collection(&mut self) -> Result<bool> {
        Ok(self.wrapper()?.is_collection())
    }

    pub fn add(&mut self, element: impl Into<Value>) -> Result<()> {
        self.wrapper()?.add(element.into())
    }

    pub fn add_all(&mut self, elements: Vec<Value>) -> Result<()> {
        self.wrapper()?.add_all(elements)
    }

    /// Run `f` against a `MetaObject` over the existing value at `path`.
    ///
    /// Returns `None` without calling `f` if the value is absent. Values
    /// produced by method getters are copies; they are written back through
    /// the property's setter after `f` returns.
    pub fn meta_object_for_property<R, F>(&mut self, path: &str, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut MetaObject<'_, 'c>) -> Result<R>,
    {
        let segment = PathSegment::parse(path)?;
        visit(&mut self.wrapper()?, &segment, f)
    }
}

fn resolve(
    wrapper: &mut ObjectWrapper<'_, '_>,
    segment: &PathSegment,
) -> Result<Option<Value>> {
    let Some(children) = segment.children() else {
        return wrapper.get(segment);
    };
    let next = PathSegment::parse(children)?;
    let ctx = wrapper.context();
    let Some(mut child) = wrapper.child(segment, Lookup::Read)? else {
        return Ok(None);
    };
    let mut nested = ObjectWrapper::for_value(child.value_mut(), ctx)?;
    resolve(&mut nested, &next)
}

fn assign(
    wrapper: &mut ObjectWrapper<'_, '_>,
    segment: &PathSegment,
    value: Value,
) -> Result<()> {
    let Some(children) = segment.children() else {
        return wrapper.set(segment, value);
    };
    let next = PathSegment::parse(children)?;
    let ctx = wrapper.context();

    let mut child = match wrapper.child(segment, Lookup::Write)? {
        Some(child) => child,
        None if value.is_null() => return Ok(()),
        None => wrapper.instantiate_child(segment)?,
    };

    {
        let mut nested = ObjectWrapper::for_value(child.value_mut(), ctx)?;
        assign(&mut nested, &next, value)?;
    }
    if let Some(detached) = child.into_detached() {
        wrapper.set(segment, detached)?;
    }
    Ok(())
}

fn visit<'c, R, F>(
    wrapper: &mut ObjectWrapper<'_, 'c>,
    segment: &PathSegment,
    f: F,
) -> Result<Option<R>>
where
    F: FnOnce(&mut MetaObject<'_, 'c>) -> Result<R>,
{
    let ctx = wrapper.context();
    let Some(mut child) = wrapper.child(segment, Lookup::Read)? else {
        return Ok(None);
    };
    let result = match segment.children() {
        None => f(&mut MetaObject::new(child.value_mut(), ctx))?,
        Some(children) => {
            let next = PathSegment::parse(children)?;
            let mut nested = ObjectWrapper::for_value(child.value_mut(), ctx)?;
            match visit(&mut nested, &next, f)? {
                Some(result) => result,
                None => return Ok(None),
            }
        }
    };
    if let Some(detached) = child.into_detached() {
        wrapper.set(segment, detached)?;
    }
    Ok(Some(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use metaprop_reflect::{
        DefaultObjectFactory, InvokeError, Record, RecordType, TypeRegistry,
    };
    use std::collections::BTreeMap;
    use std::sync::Arc;

    struct Fixture {
        registry: Arc<TypeRegistry>,
        factory: DefaultObjectFactory,
    }

    impl Fixture {
        fn new() -> Self {
            let registry = Arc::new(TypeRegistry::new());
            registry
                .register(
                    RecordType::builder("Person")
                        .field("name", TypeDescriptor::String)
                        .field("address", TypeDescriptor::record("Address"))
                        .field("pets", TypeDescriptor::list(TypeDescriptor::record("Pet")))
                        .field("attributes", TypeDescriptor::map(TypeDescriptor::Unknown))
                        // stored under a different key, so only reachable through invokers
                        .accessor(
                            "office",
                            TypeDescriptor::record("Address"),
                            |person| Ok(person.field("officeStore").cloned().unwrap_or_default()),
                            |person, value| {
                                person.set_field("officeStore", value);
                                Ok(())
                            },
                        )
                        .accessor(
                            "locked",
                            TypeDescriptor::map(TypeDescriptor::Unknown),
                            |_| Ok(Value::map()),
                            |_, _| Err(InvokeError::new("locked")),
                        )
                        .build(),
                )
                .unwrap();
            registry
                .register(
                    RecordType::builder("Address")
                        .field("city", TypeDescriptor::String)
                        .field("zip", TypeDescriptor::String)
                        .build(),
                )
                .unwrap();
            registry
                .register(
                    RecordType::builder("Pet")
                        .field("name", TypeDescriptor::String)
                        .build(),
                )
                .unwrap();
            let factory = DefaultObjectFactory::new(registry.clone());
            Self { registry, factory }
        }

        fn ctx(&self) -> NavigationContext<'_> {
            NavigationContext::new(&self.factory, &self.registry)
        }

        fn person(&self) -> Value {
            Value::Record(Record::new(self.registry.require("Person").unwrap()))
        }
    }

    #[test]
    fn record_unknown_property_fails_but_mapping_is_absent() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut map = Value::map();

        assert!(matches!(
            MetaObject::new(&mut person, fixture.ctx()).get_value("age"),
            Err(Error::NoSuchProperty { .. })
        ));
        assert_eq!(
            MetaObject::new(&mut map, fixture.ctx())
                .get_value("age")
                .unwrap(),
            None
        );
    }

    #[test]
    fn deep_write_reads_each_level_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let reads = Arc::new(AtomicUsize::new(0));
        let registry = Arc::new(TypeRegistry::new());
        let counter = reads.clone();
        registry
            .register(
                RecordType::builder("Desk")
                    .accessor(
                        "drawer",
                        TypeDescriptor::map(TypeDescriptor::Unknown),
                        move |desk| {
                            counter.fetch_add(1, Ordering::SeqCst);
                            Ok(desk.field("drawerStore").cloned().unwrap_or_default())
                        },
                        |desk, value| {
                            desk.set_field("drawerStore", value);
                            Ok(())
                        },
                    )
                    .build(),
            )
            .unwrap();
        let factory = DefaultObjectFactory::new(registry.clone());
        let ctx = NavigationContext::new(&factory, &registry);
        let mut desk = Value::Record(Record::new(registry.require("Desk").unwrap()));
        let mut meta = MetaObject::new(&mut desk, ctx);

        meta.set_value("drawer.pens", 3).unwrap();
        let before = reads.load(Ordering::SeqCst);
        meta.set_value("drawer.pens", 4).unwrap();
        assert_eq!(reads.load(Ordering::SeqCst) - before, 1);
        assert_eq!(meta.get_value("drawer.pens").unwrap(), Some(Value::from(4)));
    }

    #[test]
    fn record_default_is_returned() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        assert_eq!(meta.get_value("name").unwrap(), Some(Value::from("")));
    }

    #[test]
    fn set_then_get_round_trips() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        meta.set_value("name", "Ada").unwrap();
        meta.set_value("address.city", "London").unwrap();
        meta.set_value("pets[0].name", "Rex").unwrap();
        meta.set_value("attributes.eyes.left", "blue").unwrap();
        assert_eq!(meta.get_value("name").unwrap(), Some(Value::from("Ada")));
        assert_eq!(
            meta.get_value("address.city").unwrap(),
            Some(Value::from("London"))
        );
        assert_eq!(meta.get_value("pets[0].name").unwrap(), Some(Value::from("Rex")));
        assert_eq!(
            meta.get_value("attributes.eyes.left").unwrap(),
            Some(Value::from("blue"))
        );

        let mut map = Value::map();
        let mut meta = MetaObject::new(&mut map, fixture.ctx());
        meta.set_value("x.y", 1).unwrap();
        assert_eq!(meta.get_value("x.y").unwrap(), Some(Value::from(1)));
    }

    #[test]
    fn mapping_scenario() {
        let fixture = Fixture::new();
        let mut root = Value::map();
        let mut meta = MetaObject::new(&mut root, fixture.ctx());
        meta.set_value("a.b[0].c", 5).unwrap();
        assert_eq!(meta.get_value("a.b[0].c").unwrap(), Some(Value::from(5)));

        let a = root.as_map().and_then(|m| m.get("a")).unwrap();
        assert!(a.is_map());
        let b = a.as_map().and_then(|m| m.get("b")).unwrap();
        assert_eq!(b.as_array().map(Vec::len), Some(1));
        let mut expected = BTreeMap::new();
        expected.insert("c".to_string(), Value::from(5));
        assert_eq!(b.as_array().unwrap()[0], Value::Map(expected));
    }

    #[test]
    fn existing_intermediates_are_left_alone() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        meta.set_value("address.city", "Paris").unwrap();
        meta.set_value("address.zip", "75001").unwrap();
        assert_eq!(
            meta.get_value("address.city").unwrap(),
            Some(Value::from("Paris"))
        );
    }

    #[test]
    fn reads_never_materialize() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let before = person.clone();
        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        assert_eq!(meta.get_value("address.city").unwrap(), None);
        assert_eq!(meta.get_value("attributes.a.b").unwrap(), None);
        assert_eq!(person, before);
    }

    #[test]
    fn null_write_along_absent_path_is_a_no_op() {
        let fixture = Fixture::new();
        let mut root = Value::map();
        let mut meta = MetaObject::new(&mut root, fixture.ctx());
        meta.set_value("a.b.c", Value::Null).unwrap();
        assert_eq!(root, Value::map());
    }

    #[test]
    fn writes_through_method_getters_are_written_back() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        meta.set_value("office.city", "Berlin").unwrap();
        meta.set_value("office.zip", "10115").unwrap();
        assert_eq!(
            meta.get_value("office.city").unwrap(),
            Some(Value::from("Berlin"))
        );

        let office = person
            .as_record()
            .and_then(|p| p.field("officeStore"))
            .and_then(Value::as_record)
            .unwrap();
        assert_eq!(office.field("zip"), Some(&Value::from("10115")));
    }

    #[test]
    fn write_back_failure_is_reported() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        assert!(matches!(
            meta.set_value("locked.key", 1),
            Err(Error::Invoke { .. })
        ));
    }

    #[test]
    fn unknown_intermediate_on_record_fails() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        assert!(matches!(
            meta.set_value("employer.name", "Acme"),
            Err(Error::NoSuchProperty { .. })
        ));
    }

    #[test]
    fn scalar_intermediate_is_unsupported() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        assert!(matches!(
            meta.set_value("name.first", "Ada"),
            Err(Error::UnsupportedRepresentation { .. })
        ));
    }

    #[test]
    fn has_setter_is_always_true_for_records() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        assert!(meta.has_setter("name").unwrap());
        assert!(meta.has_setter("nonexistent").unwrap());
        assert!(meta.has_getter("name").unwrap());
        assert!(!meta.has_getter("nonexistent").unwrap());
        assert!(meta.has_getter("address.city").unwrap());
    }

    #[test]
    fn sequence_operations_on_records_and_mappings_fail() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut map = Value::map();
        let person_before = person.clone();

        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        assert!(!meta.is_collection().unwrap());
        assert!(matches!(
            meta.add(1),
            Err(Error::UnsupportedOperation { .. })
        ));
        assert!(matches!(
            meta.add_all(vec![Value::from(1)]),
            Err(Error::UnsupportedOperation { .. })
        ));
        assert_eq!(person, person_before);

        let mut meta = MetaObject::new(&mut map, fixture.ctx());
        assert!(matches!(
            meta.add(1),
            Err(Error::UnsupportedOperation { .. })
        ));
        assert_eq!(map, Value::map());
    }

    #[test]
    fn sequences_accept_appends() {
        let fixture = Fixture::new();
        let mut items = Value::array();
        let mut meta = MetaObject::new(&mut items, fixture.ctx());
        assert!(meta.is_collection().unwrap());
        meta.add("a").unwrap();
        meta.add_all(vec![Value::from("b")]).unwrap();
        assert_eq!(items, Value::from(vec!["a", "b"]));
    }

    #[test]
    fn scalar_root_is_unsupported() {
        let fixture = Fixture::new();
        let mut root = Value::from(3);
        let mut meta = MetaObject::new(&mut root, fixture.ctx());
        assert!(matches!(
            meta.get_value("x"),
            Err(Error::UnsupportedRepresentation { .. })
        ));
    }

    #[test]
    fn malformed_path_is_reported() {
        let fixture = Fixture::new();
        let mut root = Value::map();
        let mut meta = MetaObject::new(&mut root, fixture.ctx());
        assert!(matches!(meta.get_value("a[x]"), Err(Error::Path(_))));
        assert!(matches!(meta.set_value("", 1), Err(Error::Path(_))));
    }

    #[test]
    fn types_and_names() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        assert_eq!(
            meta.getter_type("pets[0].name").unwrap(),
            TypeDescriptor::String
        );
        assert_eq!(
            meta.setter_type("address").unwrap(),
            TypeDescriptor::record("Address")
        );
        assert_eq!(
            meta.find_property("ADDRESS.CITY", true).unwrap().as_deref(),
            Some("address.city")
        );
        assert!(meta.getter_names().unwrap().contains(&"pets".to_string()));
        assert!(meta.setter_names().unwrap().contains(&"office".to_string()));
    }

    #[test]
    fn nested_meta_object() {
        let fixture = Fixture::new();
        let mut person = fixture.person();
        let mut meta = MetaObject::new(&mut person, fixture.ctx());
        assert_eq!(
            meta.meta_object_for_property("address", |address| address.get_value("city"))
                .unwrap(),
            None
        );

        meta.set_value("address.city", "Rome").unwrap();
        let city = meta
            .meta_object_for_property("address", |address| address.get_value("city"))
            .unwrap();
        assert_eq!(city, Some(Some(Value::from("Rome"))));

        meta.set_value("office.city", "Turin").unwrap();
        meta.meta_object_for_property("office", |office| office.set_value("zip", "10121"))
            .unwrap();
        assert_eq!(
            meta.get_value("office.zip").unwrap(),
            Some(Value::from("10121"))
        );
    }
}
