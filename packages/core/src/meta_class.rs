//! MetaClass - path-aware queries over declared record types.

use std::fmt;
use std::sync::Arc;

use metaprop_reflect::{AccessorKind, PathSegment, TypeDescriptor, TypeMetadata, TypeRegistry};

use crate::{Error, Result};

/// Declared-type view of a record type, navigable by property path.
///
/// Where [`TypeMetadata`] answers for single property names, a `MetaClass`
/// answers for paths like `customer.address.city` by following declared
/// getter types through the registry. It never looks at values, so it works
/// when the intermediates of a path do not exist yet.
///
/// Indexed segments (`items[0]`) resolve to the element type of the
/// declared collection. Intermediate segments must be record types; a path
/// through a declared mapping or `Unknown` type cannot be followed.
#[derive(Clone)]
pub struct MetaClass<'r> {
    metadata: Arc<dyn TypeMetadata>,
    registry: &'r TypeRegistry,
}

impl<'r> MetaClass<'r> {
    pub fn new(metadata: Arc<dyn TypeMetadata>, registry: &'r TypeRegistry) -> Self {
        Self { metadata, registry }
    }

    /// The meta class of a registered type.
    pub fn for_type(type_name: &str, registry: &'r TypeRegistry) -> Result<Self> {
        Ok(Self::new(registry.require(type_name)?, registry))
    }

    pub fn type_name(&self) -> &str {
        self.metadata.type_name()
    }

    pub fn metadata(&self) -> &Arc<dyn TypeMetadata> {
        &self.metadata
    }

    pub fn getter_names(&self) -> Vec<String> {
        self.metadata.getter_names()
    }

    pub fn setter_names(&self) -> Vec<String> {
        self.metadata.setter_names()
    }

    pub fn has_getter(&self, path: &str) -> Result<bool> {
        let segment = PathSegment::parse(path)?;
        if !self.metadata.has_getter(segment.name()) {
            return Ok(false);
        }
        match segment.children() {
            None => Ok(true),
            Some(children) => match self.property_class(&segment)? {
                Some(child) => child.has_getter(children),
                None => Ok(false),
            },
        }
    }

    pub fn has_setter(&self, path: &str) -> Result<bool> {
        let segment = PathSegment::parse(path)?;
        let Some(children) = segment.children() else {
            return Ok(self.metadata.has_setter(segment.name()));
        };
        if !self.metadata.has_getter(segment.name()) {
            return Ok(false);
        }
        match self.property_class(&segment)? {
            Some(child) => child.has_setter(children),
            None => Ok(false),
        }
    }

    /// Declared type read at the end of the path.
    pub fn getter_type(&self, path: &str) -> Result<TypeDescriptor> {
        let segment = PathSegment::parse(path)?;
        match segment.children() {
            None => self.segment_type(&segment),
            Some(children) => self.descend(&segment, children, |child, rest| {
                child.getter_type(rest)
            }),
        }
    }

    /// Declared type written at the end of the path.
    pub fn setter_type(&self, path: &str) -> Result<TypeDescriptor> {
        let segment = PathSegment::parse(path)?;
        match segment.children() {
            None => {
                let declared = self.metadata.setter_type(segment.name())?;
                Ok(element_if_indexed(&segment, declared))
            }
            Some(children) => self.descend(&segment, children, |child, rest| {
                child.setter_type(rest)
            }),
        }
    }

    /// Canonical spelling of a path, or `None` if any segment is unknown.
    ///
    /// Indexes are kept: with `relaxed`, `ORDER_ITEMS[1].sku_code` can
    /// become `orderItems[1].skuCode`.
    pub fn find_property(&self, path: &str, relaxed: bool) -> Option<String> {
        let segment = PathSegment::parse(path).ok()?;
        let canonical = self.metadata.find_property(segment.name(), relaxed)?;
        let mut found = match segment.index() {
            Some(index) => format!("{}[{}]", canonical, index),
            None => canonical.clone(),
        };

        if let Some(children) = segment.children() {
            let declared = self.metadata.getter_type(&canonical).ok()?;
            let child = self.record_class(&element_if_indexed(&segment, declared))?;
            let rest = child.find_property(children, relaxed)?;
            found.push('.');
            found.push_str(&rest);
        }
        Some(found)
    }

    /// The meta class of the declared type a segment leads to, when that
    /// type is a registered record.
    pub fn property_class(&self, segment: &PathSegment) -> Result<Option<MetaClass<'r>>> {
        let declared = self.segment_type(segment)?;
        Ok(self.record_class(&declared))
    }

    fn segment_type(&self, segment: &PathSegment) -> Result<TypeDescriptor> {
        let declared = self.metadata.getter_type(segment.name())?;
        Ok(element_if_indexed(segment, declared))
    }

    fn record_class(&self, declared: &TypeDescriptor) -> Option<MetaClass<'r>> {
        let metadata = self.registry.get(declared.record_name()?)?;
        Some(MetaClass::new(metadata, self.registry))
    }

    fn descend<F>(&self, segment: &PathSegment, children: &str, query: F) -> Result<TypeDescriptor>
    where
        F: FnOnce(&MetaClass<'r>, &str) -> Result<TypeDescriptor>,
    {
        let declared = self.segment_type(segment)?;
        match declared {
            // nothing declared below a mapping or an unknown type
            TypeDescriptor::Unknown | TypeDescriptor::Map(_) => Ok(TypeDescriptor::Unknown),
            _ => match self.record_class(&declared) {
                Some(child) => query(&child, children),
                None => {
                    let next = PathSegment::parse(children)?;
                    Err(Error::NoSuchProperty {
                        type_name: declared.to_string(),
                        property: next.name().to_string(),
                        accessor: AccessorKind::Getter,
                    })
                }
            },
        }
    }
}

fn element_if_indexed(segment: &PathSegment, declared: TypeDescriptor) -> TypeDescriptor {
    if segment.is_indexed() {
        declared.element_type()
    } else {
        declared
    }
}

impl fmt::Debug for MetaClass<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaClass")
            .field("type", &self.type_name())
            .finish()
    }
}
