//! restdrv schema model.
//!
//! This crate provides the in-memory representation of a driver schema: a set
//! of named nodes, each carrying a `type` tag and string attributes. Schemas
//! are consumed by the `restdrv-gen` binary to generate C++ marshalling code
//! and CRUD wrappers for a REST resource.
//!
//! ## Core Types
//!
//! - [`Schema`] - All nodes of one schema file, with `ROOT` accessors
//! - [`SchemaNode`] - A named node with ordered attributes
//! - [`TypeTag`] - Field types (`object`, `struct`, `array`, `list`, `string`, `int`, `bool`)
//! - [`MethodKind`] - Method descriptors (`POST`, `GET`, `PUT`, `DELETE`, `READ`, `VALIDATE`)
//! - [`ClassKind`] - Generated class kinds (`parse_class`, `url_class`)
//! - [`ReadValues`] / [`IniFile`] - Section/key lookup over the schema file
//!
//! ## Examples
//!
//! ```
//! use restdrv_define::{NodeKind, Schema, TypeTag};
//!
//! let schema = Schema::parse(
//!     "foo",
//!     "[ROOT]\ndata = foo\n\n[foo]\ntype = object\nmembers = bar, baz\n\n\
//!      [bar]\ntype = string\n\n[baz]\ntype = int\n",
//! )
//! .unwrap();
//!
//! let foo = schema.node("foo").unwrap();
//! assert_eq!(foo.kind().unwrap(), NodeKind::Field(TypeTag::Object));
//! assert_eq!(foo.list("members"), vec!["bar", "baz"]);
//! ```

pub mod error;
pub mod node;
pub mod prelude;
pub mod reader;
pub mod schema;
pub mod types;

// Re-export main types at crate root
pub use error::SchemaError;
pub use node::SchemaNode;
pub use reader::{IniFile, ReadValues};
pub use schema::{ROOT, Schema};
pub use types::{ClassKind, MethodKind, NodeKind, TypeTag, UrlCategory};
