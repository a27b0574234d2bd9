//! Code generation modules for restdrv.
//!
//! Each submodule emits one part of the generated C++ header into an
//! [`EmissionBuffer`]. Nothing here fails: the driver model handed in has
//! already been resolved and validated.
//!
//! ## Submodules
//!
//! - [`header`] - Generated-file notice, include guard, includes, namespaces
//! - [`structs`] - Plain data structs with accessors
//! - [`parse`] - `Parse` overloads and sequence parse helpers
//! - [`build`] - `Build` overloads and sequence build helpers
//! - [`codec`] - Codec classes assembling the parse and build halves
//! - [`url`] - `get_url` / `get_cud_url` functions
//! - [`crud`] - CRUD client classes
//! - [`runtime`] - Names of the runtime library's types and status factories
//!
//! ## Header Layout
//!
//! 1. Preamble via [`generate_preamble`]
//! 2. Every struct reachable from `ROOT.data`, dependencies first, via
//!    [`generate_structs`]
//! 3. One class per `ROOT.methods` entry, in that order, via
//!    [`generate_codec`] or [`generate_client`]
//! 4. Namespace and guard closers via [`generate_epilogue`]

pub mod build;
pub mod codec;
pub mod crud;
pub mod header;
pub mod parse;
pub mod runtime;
pub mod structs;
pub mod url;

pub use build::generate_build;
pub use codec::generate_codec;
pub use crud::generate_client;
pub use header::{generate_epilogue, generate_preamble};
pub use parse::generate_parse;
pub use structs::generate_structs;
pub use url::generate_url_functions;

use crate::buffer::EmissionBuffer;
use crate::config::GeneratorConfig;
use crate::model::{Class, Driver};
use runtime::Runtime;

/// Emits the complete header of a driver.
pub fn generate_header(driver: &Driver, config: &GeneratorConfig) -> EmissionBuffer {
    let rt = Runtime::new(config);
    let mut out = generate_preamble(driver, config);

    out.append(generate_structs(&driver.records));
    out.blank();

    for class in &driver.classes {
        match class {
            Class::Parse(codec) => out.append(generate_codec(codec, rt)),
            Class::Url(client) => out.append(generate_client(client, rt)),
        }
        out.blank();
    }

    out.append(generate_epilogue(driver));
    out
}
