//! Reflection layer for metaprop
//!
//! Everything the navigation core consumes but does not decide on lives here:
//! - `Value`: the dynamic tree that property paths walk
//! - `Record`: an instance of a registered record type (the "bean" representation)
//! - `PathSegment`: the head of a property path like `order.items[2].price`
//! - `TypeMetadata`: per-type property tables with getter/setter invokers
//! - `TypeRegistry`: metadata registered once per type and shared
//! - `ObjectFactory`: construction of fresh values for a declared type
//!
//! # Example
//!
//! ```rust
//! use metaprop_reflect::{Record, RecordType, TypeDescriptor, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::new();
//! let user = RecordType::builder("User")
//!     .field("name", TypeDescriptor::String)
//!     .build();
//! let user = registry.register(user).unwrap();
//!
//! let record = Record::new(user);
//! assert_eq!(record.field("name"), Some(&Value::from("")));
//! ```

mod descriptor;
mod error;
mod factory;
mod metadata;
mod path;
mod record;
mod record_type;
mod registry;
mod value;

pub use descriptor::TypeDescriptor;
pub use error::{AccessorKind, InvokeError, ReflectError};
pub use factory::{DefaultObjectFactory, ObjectFactory};
pub use metadata::{GetInvoker, GetterFn, SetInvoker, SetterFn, TypeMetadata};
pub use path::{PathError, PathSegment, Segments};
pub use record::Record;
pub use record_type::{RecordType, RecordTypeBuilder};
pub use registry::TypeRegistry;
pub use value::{Value, ValueKind};
