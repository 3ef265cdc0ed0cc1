//! Wrapper over a schemaless mapping.

use std::collections::BTreeMap;

use metaprop_reflect::{PathSegment, TypeDescriptor, Value};

use super::{indexed, Child, Lookup, ObjectWrapper};
use crate::{Error, NavigationContext, Result};

pub(super) const REPRESENTATION: &str = "map";

/// Property access on a `Value::Map`.
///
/// Mappings have no schema: a missing key reads as absent instead of
/// failing, any key can be written, and type queries report the runtime type
/// of whatever is currently stored.
#[derive(Debug)]
pub struct MapWrapper<'v, 'c> {
    map: &'v mut BTreeMap<String, Value>,
    ctx: NavigationContext<'c>,
}

impl<'v, 'c> MapWrapper<'v, 'c> {
    pub fn new(map: &'v mut BTreeMap<String, Value>, ctx: NavigationContext<'c>) -> Self {
        Self { map, ctx }
    }

    pub fn context(&self) -> NavigationContext<'c> {
        self.ctx
    }

    /// Read a key. A missing key is absent, but indexing into a missing or
    /// `Null` key is out of range.
    pub fn get(&self, segment: &PathSegment) -> Result<Option<Value>> {
        let value = self.map.get(segment.name());
        let Some(index) = segment.index() else {
            return Ok(value.cloned());
        };
        let collection = value.unwrap_or(&Value::Null);
        indexed::element(segment, collection, index).cloned().map(Some)
    }

    /// Write a key, creating it if needed. An indexed write to a missing
    /// key creates an empty sequence first.
    pub fn set(&mut self, segment: &PathSegment, value: Value) -> Result<()> {
        let name = segment.name();
        let Some(index) = segment.index() else {
            self.map.insert(name.to_string(), value);
            return Ok(());
        };

        let slot = self.map.entry(name.to_string()).or_default();
        if slot.is_null() {
            *slot = Value::array();
        }
        indexed::set_element(segment, slot, index, value)
    }

    pub fn child(&mut self, segment: &PathSegment, lookup: Lookup) -> Result<Option<Child<'_>>> {
        let Some(slot) = self.map.get_mut(segment.name()) else {
            return Ok(None);
        };
        if slot.is_null() {
            return Ok(None);
        }
        let child = match segment.index() {
            Some(index) => indexed::element_mut(segment, slot, index, lookup)?,
            None => Some(slot),
        };
        Ok(child.map(Child::Borrowed))
    }

    /// Store an empty mapping under the segment, whatever type the caller
    /// might have wanted: mappings carry no declared types.
    pub fn instantiate_child(&mut self, segment: &PathSegment) -> Result<Child<'_>> {
        log::debug!("instantiated '{}' as an empty map", segment.indexed_name());
        self.set(segment, Value::map())?;
        match self.child(segment, Lookup::Write)? {
            Some(child) => Ok(child),
            None => Err(Error::instantiation(
                segment.name(),
                &TypeDescriptor::map(TypeDescriptor::Unknown),
                "the instantiated value reads back as absent",
            )),
        }
    }

    /// Keys are their own canonical form.
    pub fn find_property(&self, name: &str, _relaxed: bool) -> Option<String> {
        Some(name.to_string())
    }

    /// Snapshot of the current keys.
    pub fn getter_names(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    pub fn setter_names(&self) -> Vec<String> {
        self.getter_names()
    }

    /// Runtime type of the stored value; `Unknown` when nothing is stored.
    pub fn getter_type(&mut self, name: &str) -> Result<TypeDescriptor> {
        let segment = PathSegment::parse(name)?;
        let Some(children) = segment.children() else {
            return Ok(self.stored_type(&segment));
        };
        let ctx = self.ctx;
        match self.child(&segment, Lookup::Read) {
            Ok(Some(mut child)) => {
                ObjectWrapper::for_value(child.value_mut(), ctx)?.getter_type(children)
            }
            Ok(None) | Err(Error::IndexOutOfRange { .. }) => Ok(TypeDescriptor::Unknown),
            Err(e) => Err(e),
        }
    }

    /// Same as [`getter_type`](Self::getter_type): a mapping accepts any
    /// value, so the best answer is what is there now.
    pub fn setter_type(&mut self, name: &str) -> Result<TypeDescriptor> {
        self.getter_type(name)
    }

    pub fn has_getter(&mut self, name: &str) -> Result<bool> {
        let segment = PathSegment::parse(name)?;
        let Some(children) = segment.children() else {
            return Ok(self.contains(&segment));
        };
        if !self.map.contains_key(segment.name()) {
            return Ok(false);
        }
        let ctx = self.ctx;
        match self.child(&segment, Lookup::Read) {
            Ok(Some(mut child)) => match ObjectWrapper::for_value(child.value_mut(), ctx) {
                Ok(mut nested) => nested.has_getter(children),
                Err(Error::UnsupportedRepresentation { .. }) => Ok(false),
                Err(e) => Err(e),
            },
            // the key is there but holds nothing to look into
            Ok(None) => Ok(true),
            Err(Error::IndexOutOfRange { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Always `true`: any key can be written.
    pub fn has_setter(&self, _name: &str) -> bool {
        true
    }

    fn contains(&self, segment: &PathSegment) -> bool {
        match (self.map.get(segment.name()), segment.index()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(value), Some(index)) => value.as_array().is_some_and(|items| index < items.len()),
        }
    }

    fn stored_type(&self, segment: &PathSegment) -> TypeDescriptor {
        let stored = self.map.get(segment.name());
        let value = match segment.index() {
            Some(index) => stored
                .and_then(Value::as_array)
                .and_then(|items| items.get(index)),
            None => stored,
        };
        value.map(Value::type_descriptor).unwrap_or_default()
    }
}
