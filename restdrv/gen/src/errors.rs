//! Error types for the restdrv generator.

use restdrv_define::SchemaError;
use thiserror::Error;

/// Errors that can occur during code generation.
///
/// Every variant names the schema node (or file) it originates from. Any of
/// them aborts the whole run; nothing is written on failure.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The schema could not be loaded, or a node lookup failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A field node carries a tag that is not a field type.
    #[error("Node '{node}' has type '{tag}', which is not a field type")]
    UnknownType { node: String, tag: String },

    /// A node is referenced where a different kind of node is required.
    #[error("Node '{node}' must be {expected}, found '{found}'")]
    UnexpectedKind {
        node: String,
        expected: String,
        found: String,
    },

    /// A composite node has no members.
    #[error("Composite node '{node}' has no members")]
    EmptyMembers { node: String },

    /// A composite lists the same member twice.
    #[error("Node '{parent}' lists member '{member}' more than once")]
    DuplicateMember { parent: String, member: String },

    /// The schema references itself.
    #[error("Cyclic reference: {chain}")]
    CyclicReference {
        /// The offending chain, e.g. `a -> b -> a`.
        chain: String,
    },

    /// A member of a composite failed to resolve.
    #[error("Invalid member '{member}' of '{parent}'")]
    InvalidMember {
        parent: String,
        member: String,
        #[source]
        source: Box<GeneratorError>,
    },

    /// An attribute is present where it has no meaning, or holds a bad value.
    #[error("Node '{node}' has invalid attribute '{attribute}': {reason}")]
    InvalidAttribute {
        node: String,
        attribute: String,
        reason: String,
    },

    /// A URL template token is neither `value:` nor `get_abstract:`.
    #[error("URL node '{node}' has unsupported token '{token}'")]
    UnsupportedUrlToken { node: String, token: String },

    /// A `get_abstract` token cannot be turned into an accessor call.
    #[error("URL node '{node}' cannot use accessor for '{member}': {reason}")]
    UnknownAccessor {
        node: String,
        member: String,
        reason: String,
    },

    /// Two methods of one category reference different URL nodes.
    #[error("Class '{class}' uses both '{first}' and '{second}' for {function}")]
    UrlConflict {
        class: String,
        function: String,
        first: String,
        second: String,
    },

    /// A class declares the same method kind twice.
    #[error("Class '{class}' declares {method} more than once")]
    DuplicateMethod { class: String, method: String },

    /// A codec class lacks the parse/build support a method needs.
    #[error("Class '{class}' needs {capability} support from '{codec}'")]
    CodecCapability {
        class: String,
        codec: String,
        capability: String,
    },

    /// A request codec marshals a different record than its class.
    #[error("Class '{class}' works on '{expected}' but codec '{codec}' marshals '{found}'")]
    RecordMismatch {
        class: String,
        codec: String,
        expected: String,
        found: String,
    },

    /// A class works on a record that `ROOT.data` does not declare.
    #[error("Class '{class}' uses record '{record}', which is not listed in ROOT.data")]
    UndeclaredRecord { class: String, record: String },

    /// A name that becomes a C++ identifier is not a valid one.
    #[error("Node '{node}' yields invalid identifier '{value}'")]
    InvalidIdentifier { node: String, value: String },

    /// Two different nodes produce the same C++ type name.
    #[error("Type name '{name}' is produced by both '{first}' and '{second}'")]
    StructNameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The resolved tree could not be serialized for `inspect`.
    #[error("Failed to serialize resolved fields: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Wraps an error raised while resolving `member` of `parent`.
    pub fn in_member(self, parent: &str, member: &str) -> Self {
        Self::InvalidMember {
            parent: parent.to_string(),
            member: member.to_string(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_json_error_converts_to_serialize() {
        fn fails() -> Result<serde_json::Value, GeneratorError> {
            Ok(serde_json::from_str("{")?)
        }

        let err = fails().unwrap_err();
        assert!(matches!(err, GeneratorError::Serialize(_)));
        assert!(err.to_string().starts_with("Failed to serialize resolved fields: "));
    }

    #[test]
    fn in_member_keeps_source() {
        let err = GeneratorError::EmptyMembers {
            node: "ipam".to_string(),
        }
        .in_member("virtual_network", "ipam");

        assert_eq!(err.to_string(), "Invalid member 'ipam' of 'virtual_network'");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "Composite node 'ipam' has no members");
    }
}
