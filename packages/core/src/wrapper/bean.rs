//! Wrapper over a structured record.

use std::borrow::Cow;
use std::sync::Arc;

use metaprop_reflect::{
    AccessorKind, GetInvoker, PathSegment, Record, TypeDescriptor, TypeMetadata, Value,
};

use super::{indexed, Child, Lookup, ObjectWrapper};
use crate::{Error, MetaClass, NavigationContext, Result};

pub(super) const REPRESENTATION: &str = "bean";

/// Property access on a [`Record`] through its type metadata.
///
/// Records have a fixed shape: naming a property the type does not declare
/// is an error (`NoSuchProperty`), unlike mappings where a missing key is
/// simply absent.
#[derive(Debug)]
pub struct BeanWrapper<'v, 'c> {
    record: &'v mut Record,
    metadata: Arc<dyn TypeMetadata>,
    ctx: NavigationContext<'c>,
}

impl<'v, 'c> BeanWrapper<'v, 'c> {
    pub fn new(record: &'v mut Record, ctx: NavigationContext<'c>) -> Self {
        let metadata = record.metadata().clone();
        Self {
            record,
            metadata,
            ctx,
        }
    }

    pub fn context(&self) -> NavigationContext<'c> {
        self.ctx
    }

    /// Declared-type view of the wrapped record's type.
    pub fn meta_class(&self) -> MetaClass<'c> {
        MetaClass::new(self.metadata.clone(), self.ctx.registry())
    }

    pub fn get(&self, segment: &PathSegment) -> Result<Option<Value>> {
        let value = self.read_property(segment.name())?;
        match segment.index() {
            Some(index) => indexed::element(segment, &value, index)
                .cloned()
                .map(Some),
            None => Ok(Some(value.into_owned())),
        }
    }

    pub fn set(&mut self, segment: &PathSegment, value: Value) -> Result<()> {
        let name = segment.name();
        let Some(index) = segment.index() else {
            return self.write_property(name, value);
        };

        match self.metadata.get_invoker(name)? {
            GetInvoker::Field(field) => {
                let slot = self.record.slot_mut(&field);
                if slot.is_null() {
                    *slot = new_collection(self.metadata.as_ref(), self.ctx, name)?;
                }
                indexed::set_element(segment, slot, index, value)
            }
            invoker @ GetInvoker::Method(_) => {
                let mut collection = invoker
                    .invoke(self.record)
                    .map_err(|e| self.invoke_error(name, AccessorKind::Getter, e))?;
                if collection.is_null() {
                    collection = new_collection(self.metadata.as_ref(), self.ctx, name)?;
                }
                indexed::set_element(segment, &mut collection, index, value)?;
                self.write_property(name, collection)
            }
        }
    }

    pub fn child(&mut self, segment: &PathSegment, lookup: Lookup) -> Result<Option<Child<'_>>> {
        match self.metadata.get_invoker(segment.name())? {
            GetInvoker::Field(field) => match self.record.field_mut(&field) {
                Some(slot) => borrowed_child(segment, slot, lookup),
                None => absent_child(segment, lookup),
            },
            invoker @ GetInvoker::Method(_) => {
                let value = invoker
                    .invoke(self.record)
                    .map_err(|e| self.invoke_error(segment.name(), AccessorKind::Getter, e))?;
                detached_child(segment, value, lookup)
            }
        }
    }

    /// Build the absent child through the object factory, using the
    /// property's declared setter type (its element type when indexed).
    pub fn instantiate_child(&mut self, segment: &PathSegment) -> Result<Child<'_>> {
        let name = segment.name();
        let declared = self.metadata.setter_type(name)?;
        let target = if segment.is_indexed() {
            declared.element_type()
        } else {
            declared
        };

        let created = self
            .ctx
            .object_factory()
            .create(&target)
            .map_err(|e| Error::instantiation(name, &target, e))?;
        log::debug!(
            "instantiated '{}' of {} as {}",
            segment.indexed_name(),
            self.metadata.type_name(),
            target
        );
        self.set(segment, created)
            .map_err(|e| Error::instantiation(name, &target, e))?;

        match self.child(segment, Lookup::Write) {
            Ok(Some(child)) => Ok(child),
            Ok(None) => Err(Error::instantiation(
                name,
                &target,
                "the instantiated value reads back as absent",
            )),
            Err(e) => Err(Error::instantiation(name, &target, e)),
        }
    }

    pub fn find_property(&self, name: &str, relaxed: bool) -> Option<String> {
        self.meta_class().find_property(name, relaxed)
    }

    pub fn getter_names(&self) -> Vec<String> {
        self.metadata.getter_names()
    }

    pub fn setter_names(&self) -> Vec<String> {
        self.metadata.setter_names()
    }

    pub fn getter_type(&mut self, name: &str) -> Result<TypeDescriptor> {
        let segment = PathSegment::parse(name)?;
        let Some(children) = segment.children() else {
            return self.meta_class().getter_type(name);
        };
        let ctx = self.ctx;
        match self.child(&segment, Lookup::Read) {
            Ok(Some(mut child)) => {
                return ObjectWrapper::for_value(child.value_mut(), ctx)?.getter_type(children);
            }
            Ok(None) | Err(Error::IndexOutOfRange { .. }) => {}
            Err(e) => return Err(e),
        }
        self.meta_class().getter_type(name)
    }

    pub fn setter_type(&mut self, name: &str) -> Result<TypeDescriptor> {
        let segment = PathSegment::parse(name)?;
        let Some(children) = segment.children() else {
            return self.meta_class().setter_type(name);
        };
        let ctx = self.ctx;
        match self.child(&segment, Lookup::Read) {
            Ok(Some(mut child)) => {
                return ObjectWrapper::for_value(child.value_mut(), ctx)?.setter_type(children);
            }
            Ok(None) | Err(Error::IndexOutOfRange { .. }) => {}
            Err(e) => return Err(e),
        }
        self.meta_class().setter_type(name)
    }

    /// Whether the path is readable, consulting the live value where one
    /// exists and declared types where it does not.
    pub fn has_getter(&mut self, name: &str) -> Result<bool> {
        let segment = PathSegment::parse(name)?;
        let Some(children) = segment.children() else {
            return Ok(self.metadata.has_getter(segment.name()));
        };
        if !self.metadata.has_getter(segment.name()) {
            return Ok(false);
        }

        let ctx = self.ctx;
        match self.child(&segment, Lookup::Read) {
            Ok(Some(mut child)) => {
                return match ObjectWrapper::for_value(child.value_mut(), ctx) {
                    Ok(mut nested) => nested.has_getter(children),
                    Err(Error::UnsupportedRepresentation { .. }) => Ok(false),
                    Err(e) => Err(e),
                };
            }
            // absent intermediate: fall back to declared types
            Ok(None) | Err(Error::IndexOutOfRange { .. }) => {}
            Err(e) => return Err(e),
        }
        self.meta_class().has_getter(name)
    }

    /// Always `true`: records accept the attempt and fail at write time if
    /// the property turns out not to be writable.
    pub fn has_setter(&self, _name: &str) -> bool {
        true
    }

    fn read_property(&self, name: &str) -> Result<Cow<'_, Value>> {
        let invoker = self.metadata.get_invoker(name)?;
        if let Some(value) = invoker.field_ref(self.record) {
            return Ok(Cow::Borrowed(value));
        }
        invoker
            .invoke(self.record)
            .map(Cow::Owned)
            .map_err(|e| self.invoke_error(name, AccessorKind::Getter, e))
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        let invoker = self.metadata.set_invoker(name)?;
        invoker
            .invoke(self.record, value)
            .map_err(|e| self.invoke_error(name, AccessorKind::Setter, e))
    }

    fn invoke_error(
        &self,
        property: &str,
        accessor: AccessorKind,
        source: metaprop_reflect::InvokeError,
    ) -> Error {
        Error::invoke(self.metadata.type_name(), property, accessor, source)
    }
}

/// Create the collection behind an indexed write to an absent property.
fn new_collection(
    metadata: &dyn TypeMetadata,
    ctx: NavigationContext<'_>,
    name: &str,
) -> Result<Value> {
    let declared = metadata.getter_type(name)?;
    let created = ctx
        .object_factory()
        .create(&declared)
        .map_err(|e| Error::instantiation(name, &declared, e))?;
    log::debug!(
        "instantiated collection '{}' of {} as {}",
        name,
        metadata.type_name(),
        declared
    );
    Ok(created)
}

fn borrowed_child<'w>(
    segment: &PathSegment,
    slot: &'w mut Value,
    lookup: Lookup,
) -> Result<Option<Child<'w>>> {
    let value = match segment.index() {
        Some(index) => indexed::element_mut(segment, slot, index, lookup)?,
        None if slot.is_null() => None,
        None => Some(slot),
    };
    Ok(value.map(Child::Borrowed))
}

fn detached_child(
    segment: &PathSegment,
    mut value: Value,
    lookup: Lookup,
) -> Result<Option<Child<'static>>> {
    let element = match segment.index() {
        Some(index) => {
            indexed::element_mut(segment, &mut value, index, lookup)?.map(std::mem::take)
        }
        None if value.is_null() => None,
        None => Some(value),
    };
    Ok(element.map(Child::Detached))
}

fn absent_child(segment: &PathSegment, lookup: Lookup) -> Result<Option<Child<'static>>> {
    match segment.index() {
        Some(index) => indexed::element_mut(segment, &mut Value::Null, index, lookup)
            .map(|_| None),
        None => Ok(None),
    }
}
