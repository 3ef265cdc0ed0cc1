//! Serde integration for metaprop values
//!
//! Two directions of travel:
//! - `to_value` / `from_value`: any serde type to and from the schemaless
//!   value tree (objects become mappings)
//! - `to_record` / `hydrate`: serde data into typed records, following the
//!   declared types in a `TypeRegistry`
//!
//! Bytes travel through JSON as standard base64 text.
//!
//! # Example
//!
//! ```rust
//! use metaprop_serde::{from_value, to_value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! let user = User { name: "Alice".into(), age: 30 };
//! let value = to_value(&user).unwrap();
//! let back: User = from_value(value).unwrap();
//! assert_eq!(back, user);
//! ```

mod convert;
mod error;
mod hydrate;

pub use convert::{from_value, json_to_value, to_value, value_to_json};
pub use error::Error;
pub use hydrate::{hydrate, to_record, to_typed_value};
