//! metaprop: read and write nested values by property path.
//!
//! A path like `order.items[2].price` walks through records (typed, described
//! by registered metadata), mappings and sequences alike. Reads report
//! absence as `None`; writes create the missing intermediates they need.
//!
//! The layers, each usable on its own:
//! - [`reflect`]: values, records, path segments, type metadata, object factories
//! - [`navigation`]: wrappers, `MetaObject`, `MetaClass` and the `Navigator` entry point
//! - [`convert`]: conversion between serde data and values, record hydration
//! - [`cache`]: the cache SPI and its decorators
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use metaprop::{Navigator, Record, RecordType, TypeDescriptor, TypeRegistry, Value};
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry
//!     .register(
//!         RecordType::builder("Order")
//!             .field("items", TypeDescriptor::list(TypeDescriptor::record("Item")))
//!             .build(),
//!     )
//!     .unwrap();
//! registry
//!     .register(
//!         RecordType::builder("Item")
//!             .field("price", TypeDescriptor::Float)
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let navigator = Navigator::new(registry.clone());
//! let mut order = Value::Record(Record::new(registry.require("Order").unwrap()));
//!
//! navigator.set_value(&mut order, "items[0].price", 4.25).unwrap();
//! assert_eq!(
//!     navigator.get_value(&mut order, "items[0].price").unwrap(),
//!     Some(Value::from(4.25))
//! );
//! ```

pub use metaprop_cache as cache;
pub use metaprop_core as navigation;
pub use metaprop_reflect as reflect;
pub use metaprop_serde as convert;

pub use metaprop_core::{Error, MetaClass, MetaObject, Navigator, Result};
pub use metaprop_reflect::{
    DefaultObjectFactory, ObjectFactory, PathSegment, Record, RecordType, TypeDescriptor,
    TypeMetadata, TypeRegistry, Value,
};
