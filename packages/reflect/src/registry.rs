//! TypeRegistry - type metadata registered once per type and shared.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{ReflectError, TypeMetadata};

/// Thread-safe registry of record type metadata, keyed by type name.
///
/// Record types refer to each other by name (`TypeDescriptor::Record`), which
/// lets self-referential and mutually recursive types be described. The
/// registry resolves those names when a value of the type must be built or
/// its declared properties inspected.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, Arc<dyn TypeMetadata>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata under its type name.
    ///
    /// Returns the shared handle now owned by the registry. Registering a
    /// second type under an existing name fails with `DuplicateType`.
    pub fn register(
        &self,
        metadata: Arc<dyn TypeMetadata>,
    ) -> Result<Arc<dyn TypeMetadata>, ReflectError> {
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        let name = metadata.type_name().to_string();
        if types.contains_key(&name) {
            return Err(ReflectError::DuplicateType { type_name: name });
        }
        log::debug!("registered type metadata for '{}'", name);
        types.insert(name, metadata.clone());
        Ok(metadata)
    }

    pub fn get(&self, type_name: &str) -> Option<Arc<dyn TypeMetadata>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
    }

    /// Like [`get`](Self::get), but a missing type is an `UnknownType` error.
    pub fn require(&self, type_name: &str) -> Result<Arc<dyn TypeMetadata>, ReflectError> {
        self.get(type_name).ok_or_else(|| ReflectError::UnknownType {
            type_name: type_name.to_string(),
        })
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
