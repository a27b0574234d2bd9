//! Error types for loading and querying driver schemas.

use thiserror::Error;

/// Errors raised while reading a schema file or looking up its nodes.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema file could not be read.
    #[error("Failed to read schema file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A line of the schema file is not a section header, a `key = value`
    /// pair, a comment or blank.
    #[error("Syntax error at line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// The same section appears twice.
    #[error("Duplicate node '{name}' at line {line} (first defined at line {first_line})")]
    DuplicateNode {
        name: String,
        line: usize,
        first_line: usize,
    },

    /// A referenced node has no section in the schema.
    #[error("Unknown schema node '{0}'")]
    MissingNode(String),

    /// A node lacks an attribute it is required to carry.
    #[error("Node '{node}' is missing required attribute '{attribute}'")]
    MissingAttribute { node: String, attribute: String },

    /// A boolean attribute holds something other than a recognised flag value.
    #[error("Node '{node}' has invalid value '{value}' for flag '{attribute}' (expected yes or no)")]
    InvalidFlag {
        node: String,
        attribute: String,
        value: String,
    },

    /// The `type` attribute of a node is not a known tag.
    #[error("Node '{node}' has unknown type '{tag}'")]
    UnknownTag { node: String, tag: String },
}
