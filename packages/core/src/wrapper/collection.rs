//! Wrapper over a sequence.

use metaprop_reflect::{PathSegment, TypeDescriptor, Value};

use super::{Child, Lookup};
use crate::{Error, NavigationContext, Result};

pub(super) const REPRESENTATION: &str = "collection";

/// A sequence reached as a navigation target.
///
/// Sequences are indexed through their parent (`items[2]`), never by
/// property name, so the only things a collection wrapper does itself are
/// appending elements. Every property operation is `UnsupportedOperation`.
#[derive(Debug)]
pub struct CollectionWrapper<'v, 'c> {
    items: &'v mut Vec<Value>,
    ctx: NavigationContext<'c>,
}

impl<'v, 'c> CollectionWrapper<'v, 'c> {
    pub fn new(items: &'v mut Vec<Value>, ctx: NavigationContext<'c>) -> Self {
        Self { items, ctx }
    }

    pub fn context(&self) -> NavigationContext<'c> {
        self.ctx
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, element: Value) {
        self.items.push(element);
    }

    pub fn add_all(&mut self, elements: Vec<Value>) {
        self.items.extend(elements);
    }

    pub fn get(&self, _segment: &PathSegment) -> Result<Option<Value>> {
        Err(unsupported("get"))
    }

    pub fn set(&mut self, _segment: &PathSegment, _value: Value) -> Result<()> {
        Err(unsupported("set"))
    }

    pub fn child(&mut self, _segment: &PathSegment, _lookup: Lookup) -> Result<Option<Child<'_>>> {
        Err(unsupported("get"))
    }

    pub fn instantiate_child(&mut self, _segment: &PathSegment) -> Result<Child<'_>> {
        Err(unsupported("instantiate_child"))
    }

    pub fn find_property(&self, _name: &str, _relaxed: bool) -> Result<Option<String>> {
        Err(unsupported("find_property"))
    }

    pub fn getter_names(&self) -> Result<Vec<String>> {
        Err(unsupported("getter_names"))
    }

    pub fn setter_names(&self) -> Result<Vec<String>> {
        Err(unsupported("setter_names"))
    }

    pub fn getter_type(&mut self, _name: &str) -> Result<TypeDescriptor> {
        Err(unsupported("getter_type"))
    }

    pub fn setter_type(&mut self, _name: &str) -> Result<TypeDescriptor> {
        Err(unsupported("setter_type"))
    }

    pub fn has_getter(&mut self, _name: &str) -> Result<bool> {
        Err(unsupported("has_getter"))
    }

    pub fn has_setter(&self, _name: &str) -> Result<bool> {
        Err(unsupported("has_setter"))
    }
}

fn unsupported(operation: &'static str) -> Error {
    Error::unsupported(operation, REPRESENTATION)
}
