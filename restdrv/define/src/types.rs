//! Tags carried by the `type` attribute of schema nodes.
//!
//! This module provides the closed vocabularies a schema may use:
//!
//! - [`TypeTag`] - Field types (`object`, `struct`, `array`, `list`, `string`, `int`, `bool`)
//! - [`MethodKind`] - Method descriptors (`POST`, `GET`, `PUT`, `DELETE`, `READ`, `VALIDATE`)
//! - [`ClassKind`] - Entries of `ROOT.methods` (`parse_class`, `url_class`)
//! - [`NodeKind`] - Any of the above, plus `url` template nodes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Field type of a schema node.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use restdrv_define::TypeTag;
///
/// let tag = TypeTag::from_str("list").unwrap();
/// assert_eq!(tag, TypeTag::List);
/// assert!(tag.is_sequence());
/// assert_eq!(TypeTag::Int.to_string(), "int");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TypeTag {
    /// Top-level JSON object, emitted as a record.
    Object,
    /// Nested JSON object, emitted as a record.
    Struct,
    /// JSON array, emitted as `std::vector`.
    Array,
    /// JSON array, emitted as `std::list`.
    List,
    String,
    Int,
    Bool,
}

impl TypeTag {
    /// Returns true for leaf types that never recurse.
    pub fn is_scalar(self) -> bool {
        matches!(self, Self::String | Self::Int | Self::Bool)
    }

    /// Returns true for `object` and `struct`.
    pub fn is_record(self) -> bool {
        matches!(self, Self::Object | Self::Struct)
    }

    /// Returns true for `array` and `list`.
    pub fn is_sequence(self) -> bool {
        matches!(self, Self::Array | Self::List)
    }
}

/// Which URL-construction function a method uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum UrlCategory {
    /// Reads (`GET`, `READ`).
    Read,
    /// Create, update and delete (`POST`, `PUT`, `DELETE`).
    Cud,
}

/// Kind of a method descriptor node.
///
/// Each kind has a fixed HTTP verb and a fixed set of response codes that
/// count as success.
///
/// ## Examples
///
/// ```
/// use restdrv_define::MethodKind;
///
/// assert_eq!(MethodKind::Post.http_verb(), Some("POST"));
/// assert_eq!(MethodKind::Put.expected_codes(), &[204, 200]);
/// assert_eq!(MethodKind::Validate.http_verb(), None);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum MethodKind {
    /// Create a resource.
    Post,
    /// Fetch a resource and parse it.
    Get,
    /// Update a resource.
    Put,
    /// Delete a resource.
    Delete,
    /// Fetch a resource and return the raw body.
    Read,
    /// Check mandatory and validated fields locally.
    Validate,
}

impl MethodKind {
    /// HTTP verb sent on the wire, or `None` for local-only methods.
    pub fn http_verb(self) -> Option<&'static str> {
        match self {
            Self::Post => Some("POST"),
            Self::Put => Some("PUT"),
            Self::Delete => Some("DELETE"),
            Self::Get | Self::Read => Some("GET"),
            Self::Validate => None,
        }
    }

    /// Response codes accepted as success.
    ///
    /// `PUT` accepts both 204 and 200.
    pub fn expected_codes(self) -> &'static [u16] {
        match self {
            Self::Post => &[201],
            Self::Put => &[204, 200],
            Self::Delete | Self::Get | Self::Read => &[200],
            Self::Validate => &[],
        }
    }

    /// URL function used by this method.
    pub fn url_category(self) -> Option<UrlCategory> {
        match self {
            Self::Get | Self::Read => Some(UrlCategory::Read),
            Self::Post | Self::Put | Self::Delete => Some(UrlCategory::Cud),
            Self::Validate => None,
        }
    }

    /// Returns true when the request carries a serialized payload.
    pub fn carries_payload(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

/// Kind of an entry in `ROOT.methods`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClassKind {
    /// Parser/builder class for one record.
    ParseClass,
    /// CRUD client class.
    UrlClass,
}

/// Any value the `type` attribute may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Field(TypeTag),
    Method(MethodKind),
    Class(ClassKind),
    /// URL template node.
    Url,
}

impl FromStr for NodeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "url" {
            return Ok(Self::Url);
        }
        if let Ok(tag) = TypeTag::from_str(s) {
            return Ok(Self::Field(tag));
        }
        if let Ok(kind) = MethodKind::from_str(s) {
            return Ok(Self::Method(kind));
        }
        ClassKind::from_str(s).map(Self::Class).map_err(|_| ())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(tag) => write!(f, "{}", tag),
            Self::Method(kind) => write!(f, "{}", kind),
            Self::Class(kind) => write!(f, "{}", kind),
            Self::Url => f.write_str("url"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn type_tag_parses_lowercase() {
        assert_eq!(TypeTag::from_str("object").unwrap(), TypeTag::Object);
        assert_eq!(TypeTag::from_str("bool").unwrap(), TypeTag::Bool);
        assert!(TypeTag::from_str("OBJECT").is_err());
        assert!(TypeTag::from_str("float").is_err());
    }

    #[test]
    fn type_tag_categories_are_disjoint() {
        for tag in TypeTag::iter() {
            let hits = [tag.is_scalar(), tag.is_record(), tag.is_sequence()]
                .iter()
                .filter(|hit| **hit)
                .count();
            assert_eq!(hits, 1, "{} should be in exactly one category", tag);
        }
    }

    #[test]
    fn method_kind_verb_mapping() {
        assert_eq!(MethodKind::Post.expected_codes(), &[201]);
        assert_eq!(MethodKind::Delete.expected_codes(), &[200]);
        assert_eq!(MethodKind::Read.http_verb(), Some("GET"));
        assert!(MethodKind::Validate.expected_codes().is_empty());
    }

    #[test]
    fn method_kind_url_category() {
        assert_eq!(MethodKind::Get.url_category(), Some(UrlCategory::Read));
        assert_eq!(MethodKind::Put.url_category(), Some(UrlCategory::Cud));
        assert_eq!(MethodKind::Validate.url_category(), None);
    }

    #[test]
    fn only_post_and_put_carry_payload() {
        let carrying: Vec<_> = MethodKind::iter().filter(|k| k.carries_payload()).collect();
        assert_eq!(carrying, vec![MethodKind::Post, MethodKind::Put]);
    }

    #[test]
    fn node_kind_parses_every_vocabulary() {
        assert_eq!(NodeKind::from_str("url"), Ok(NodeKind::Url));
        assert_eq!(
            NodeKind::from_str("array"),
            Ok(NodeKind::Field(TypeTag::Array))
        );
        assert_eq!(
            NodeKind::from_str("DELETE"),
            Ok(NodeKind::Method(MethodKind::Delete))
        );
        assert_eq!(
            NodeKind::from_str("url_class"),
            Ok(NodeKind::Class(ClassKind::UrlClass))
        );
        assert!(NodeKind::from_str("delete").is_err());
    }

    #[test]
    fn node_kind_display_matches_schema_spelling() {
        assert_eq!(NodeKind::Class(ClassKind::ParseClass).to_string(), "parse_class");
        assert_eq!(NodeKind::Method(MethodKind::Validate).to_string(), "VALIDATE");
        assert_eq!(NodeKind::Field(TypeTag::String).to_string(), "string");
    }

    #[test]
    fn method_kind_serde_roundtrip() {
        let serialized = serde_json::to_string(&MethodKind::Put).unwrap();
        assert_eq!(serialized, "\"PUT\"");
        let deserialized: MethodKind = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, MethodKind::Put);
    }
}
