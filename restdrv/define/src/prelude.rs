//! Convenient re-exports for working with driver schemas.
//!
//! ```
//! use restdrv_define::prelude::*;
//!
//! let schema = Schema::parse("x", "[ROOT]\n").unwrap();
//! assert!(schema.data().is_empty());
//! ```

pub use crate::error::SchemaError;
pub use crate::node::SchemaNode;
pub use crate::reader::{IniFile, ReadValues};
pub use crate::schema::Schema;
pub use crate::types::{ClassKind, MethodKind, NodeKind, TypeTag, UrlCategory};
