//! Schema nodes and their attribute accessors.

use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::SchemaError;
use crate::types::NodeKind;

/// Values accepted as "yes" for flag attributes.
const TRUE_FLAGS: &[&str] = &["yes", "true", "1", "on"];

/// Values accepted as "no" for flag attributes.
const FALSE_FLAGS: &[&str] = &["no", "false", "0", "off"];

/// A named node of a driver schema.
///
/// A node is one section of the schema file. Its attributes keep the order
/// they were written in; list-valued attributes are comma-separated.
///
/// ## Examples
///
/// ```
/// use restdrv_define::SchemaNode;
///
/// let mut node = SchemaNode::new("prefix", 3);
/// node.insert("type", "struct");
/// node.insert("members", "ip, len ,");
/// node.insert("mandatory", "yes");
///
/// assert_eq!(node.attr("type"), Some("struct"));
/// assert_eq!(node.list("members"), vec!["ip", "len"]);
/// assert!(node.flag("mandatory", false).unwrap());
/// assert!(!node.flag("get_support", false).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    name: String,
    line: usize,
    attributes: IndexMap<String, String>,
}

impl SchemaNode {
    /// Creates an empty node defined at the given line.
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
            attributes: IndexMap::new(),
        }
    }

    /// Sets an attribute, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.attributes.insert(key.into(), value.into())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Line of the section header, for diagnostics.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Iterates attributes in file order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the raw value of an attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Returns the value of an attribute the node must carry.
    ///
    /// ## Errors
    ///
    /// Returns `SchemaError::MissingAttribute` if the attribute is absent or empty.
    pub fn require(&self, key: &str) -> Result<&str, SchemaError> {
        match self.attr(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(SchemaError::MissingAttribute {
                node: self.name.clone(),
                attribute: key.to_string(),
            }),
        }
    }

    /// Splits a comma-separated attribute into its entries.
    ///
    /// Entries are trimmed and empty entries are dropped. A missing attribute
    /// yields an empty list.
    pub fn list(&self, key: &str) -> Vec<&str> {
        self.attr(key)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Reads a yes/no attribute, falling back to `default` when absent.
    ///
    /// ## Errors
    ///
    /// Returns `SchemaError::InvalidFlag` for values outside
    /// `yes|no|true|false|1|0|on|off`.
    pub fn flag(&self, key: &str, default: bool) -> Result<bool, SchemaError> {
        let Some(value) = self.attr(key) else {
            return Ok(default);
        };
        let lowered = value.to_ascii_lowercase();
        if TRUE_FLAGS.contains(&lowered.as_str()) {
            Ok(true)
        } else if FALSE_FLAGS.contains(&lowered.as_str()) {
            Ok(false)
        } else {
            Err(SchemaError::InvalidFlag {
                node: self.name.clone(),
                attribute: key.to_string(),
                value: value.to_string(),
            })
        }
    }

    /// Parses the `type` attribute.
    ///
    /// ## Errors
    ///
    /// Returns `SchemaError::MissingAttribute` when the node has no type and
    /// `SchemaError::UnknownTag` when the type is not recognised.
    pub fn kind(&self) -> Result<NodeKind, SchemaError> {
        let tag = self.require("type")?;
        NodeKind::from_str(tag).map_err(|()| SchemaError::UnknownTag {
            node: self.name.clone(),
            tag: tag.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassKind, TypeTag};

    fn node_with(pairs: &[(&str, &str)]) -> SchemaNode {
        let mut node = SchemaNode::new("sample", 1);
        for (key, value) in pairs {
            node.insert(*key, *value);
        }
        node
    }

    #[test]
    fn list_preserves_order_and_trims() {
        let node = node_with(&[("members", " zeta, alpha ,, mid ")]);
        assert_eq!(node.list("members"), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn list_of_missing_attribute_is_empty() {
        let node = node_with(&[]);
        assert!(node.list("members").is_empty());
    }

    #[test]
    fn flag_accepts_common_spellings() {
        let node = node_with(&[("a", "YES"), ("b", "off"), ("c", "1"), ("d", "False")]);
        assert!(node.flag("a", false).unwrap());
        assert!(!node.flag("b", true).unwrap());
        assert!(node.flag("c", false).unwrap());
        assert!(!node.flag("d", true).unwrap());
        assert!(node.flag("missing", true).unwrap());
    }

    #[test]
    fn flag_rejects_unknown_values() {
        let node = node_with(&[("mandatory", "maybe")]);
        match node.flag("mandatory", false) {
            Err(SchemaError::InvalidFlag {
                node,
                attribute,
                value,
            }) => {
                assert_eq!(node, "sample");
                assert_eq!(attribute, "mandatory");
                assert_eq!(value, "maybe");
            }
            other => panic!("Expected InvalidFlag, got: {:?}", other),
        }
    }

    #[test]
    fn require_treats_empty_as_missing() {
        let node = node_with(&[("url", "")]);
        assert!(matches!(
            node.require("url"),
            Err(SchemaError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn kind_parses_type_attribute() {
        assert_eq!(
            node_with(&[("type", "int")]).kind().unwrap(),
            NodeKind::Field(TypeTag::Int)
        );
        assert_eq!(
            node_with(&[("type", "parse_class")]).kind().unwrap(),
            NodeKind::Class(ClassKind::ParseClass)
        );
    }

    #[test]
    fn kind_reports_unknown_tag_with_node_name() {
        let err = node_with(&[("type", "float")]).kind().unwrap_err();
        assert_eq!(err.to_string(), "Node 'sample' has unknown type 'float'");
    }

    #[test]
    fn attributes_iterate_in_insertion_order() {
        let node = node_with(&[("type", "struct"), ("members", "a"), ("key", "k")]);
        let keys: Vec<_> = node.attributes().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["type", "members", "key"]);
    }
}
