//! Core metaprop: property-path navigation
//!
//! This layer walks property paths like `order.items[2].price` through any
//! mix of the navigable representations:
//! - records (typed, described by `TypeMetadata`): unknown properties fail
//! - mappings (schemaless): missing keys read as absent
//! - sequences: reached through indexed segments
//!
//! The pieces:
//! - `ObjectWrapper`: single-segment access, one variant per representation
//! - `MetaObject`: recursive navigation over a borrowed root; writes create
//!   absent intermediates through the `ObjectFactory`, reads never do
//! - `MetaClass`: the same path queries answered from declared types only
//! - `Navigator`: owns the registry and factory, hands out contexts per call
//!
//! # Example
//!
//! ```rust
//! use metaprop_core::Navigator;
//! use metaprop_reflect::Value;
//!
//! let navigator = Navigator::default();
//! let mut root = Value::map();
//!
//! navigator.set_value(&mut root, "order.items[0].price", 9.5).unwrap();
//! assert_eq!(
//!     navigator.get_value(&mut root, "order.items[0].price").unwrap(),
//!     Some(Value::from(9.5))
//! );
//! assert_eq!(navigator.get_value(&mut root, "order.customer").unwrap(), None);
//! ```

mod context;
mod error;
mod meta_class;
mod meta_object;
mod navigator;
pub mod wrapper;

pub use context::NavigationContext;
pub use error::{BoxError, Error, Result};
pub use meta_class::MetaClass;
pub use meta_object::MetaObject;
pub use navigator::Navigator;
pub use wrapper::{BeanWrapper, Child, CollectionWrapper, Lookup, MapWrapper, ObjectWrapper};
