//! restdrv code generator library.
//!
//! This crate turns a REST driver schema loaded with `restdrv-define` into a
//! single self-contained C++ header. The generated header includes:
//!
//! - A plain data struct for every object, struct and sequence element
//! - A codec class per `parse_class` with JSON `Parse` and `Build` overloads
//! - A CRUD client class per `url_class`, talking to a pluggable transport
//!
//! ## Modules
//!
//! - [`walker`] - Resolves schema nodes into typed field trees and walks them
//! - [`classes`] - Resolves `ROOT.methods` into codec and client classes
//! - [`validation`] - Whole-driver checks run before anything is emitted
//! - [`codegen`] - Emitters for each part of the header
//! - [`output`] - Final assembly and file writing
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```
//! use restdrv_define::Schema;
//! use restdrv_gen::config::GeneratorConfig;
//! use restdrv_gen::output::generate;
//!
//! let schema = Schema::parse(
//!     "foo",
//!     "[ROOT]\ndata = foo\nmethods = foo_codec\n\n\
//!      [foo]\ntype = object\nmembers = bar\n\n\
//!      [bar]\ntype = string\n\n\
//!      [foo_codec]\ntype = parse_class\ndata = foo\n",
//! )
//! .unwrap();
//!
//! let header = generate(&schema, &GeneratorConfig::default()).unwrap();
//! assert!(header.contains("struct Foo {"));
//! assert!(header.contains("class FooCodec {"));
//! ```
//!
//! ## Generated Code Structure
//!
//! For a schema `foo.rest` declaring record `Foo` and classes `FooCodec`,
//! `FooClient`:
//!
//! ```text
//! #ifndef FOO_FOO_HH_
//! namespace foo {
//!
//! struct Foo { ... };
//!
//! class FooCodec {
//! public:
//!     static rest::Status Parse(const std::string& body, Foo* dst);
//!     static rest::Status Build(const Foo& src, std::string* payload);
//! };
//!
//! class FooClient {
//! public:
//!     rest::Status Get(Foo* data);
//! };
//!
//! }  // namespace foo
//! #endif  // FOO_FOO_HH_
//! ```

pub mod buffer;
pub mod classes;
pub mod codegen;
pub mod config;
pub mod context;
pub mod errors;
pub mod model;
pub mod naming;
pub mod output;
pub mod parser;
pub mod validation;
pub mod walker;

#[cfg(test)]
mod test_utils;
