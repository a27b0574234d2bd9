//! Section/key lookup over INI-like schema files.
//!
//! The schema model only needs a narrow read interface, [`ReadValues`]: the
//! list of sections and the `key = value` pairs inside each. [`IniFile`] is
//! the implementation used by the CLI.
//!
//! ## Format
//!
//! ```text
//! # comment
//! ; comment
//! [ROOT]
//! namespace = vnc
//! data = virtual_network
//!
//! [virtual_network]
//! type = object
//! members = name, uuid,
//!     prefixes
//! ```
//!
//! - `[name]` opens a section; names must be unique.
//! - `key = value` (or `key: value`) sets an attribute of the open section.
//! - An indented line continues the previous value, joined with a space.
//! - A key may appear once per section.

use indexmap::IndexMap;

use crate::error::SchemaError;
use crate::node::SchemaNode;

/// Narrow read interface over a sectioned key/value source.
pub trait ReadValues {
    /// Section names with the line they were declared on, in source order.
    fn sections(&self) -> Vec<(&str, usize)>;

    /// Keys of a section in source order; empty for unknown sections.
    fn keys(&self, section: &str) -> Vec<&str>;

    /// Looks up a single value.
    fn read_value(&self, section: &str, key: &str) -> Option<&str>;
}

/// A parsed INI-like schema file.
///
/// ## Examples
///
/// ```
/// use restdrv_define::{IniFile, ReadValues};
///
/// let ini = IniFile::parse("[ROOT]\ndata = foo\n\n[foo]\ntype = object\n").unwrap();
/// assert_eq!(ini.read_value("ROOT", "data"), Some("foo"));
/// assert_eq!(ini.sections(), vec![("ROOT", 1), ("foo", 4)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IniFile {
    sections: IndexMap<String, SchemaNode>,
}

impl IniFile {
    /// Parses schema text.
    ///
    /// ## Errors
    ///
    /// Returns `SchemaError::Syntax` for malformed lines and
    /// `SchemaError::DuplicateNode` for repeated sections.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let mut sections: IndexMap<String, SchemaNode> = IndexMap::new();
        let mut current: Option<String> = None;
        let mut last_key: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            // Indented continuation of the previous value
            if raw.starts_with([' ', '\t'])
                && let (Some(section), Some(key)) = (&current, &last_key)
                && let Some(node) = sections.get_mut(section)
            {
                let joined = match node.attr(key) {
                    Some(prev) if !prev.is_empty() => format!("{} {}", prev, trimmed),
                    _ => trimmed.to_string(),
                };
                node.insert(key.clone(), joined);
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .ok_or_else(|| SchemaError::Syntax {
                        line,
                        message: "section header is missing ']'".to_string(),
                    })?
                    .trim();
                if name.is_empty() {
                    return Err(SchemaError::Syntax {
                        line,
                        message: "section name is empty".to_string(),
                    });
                }
                if let Some(existing) = sections.get(name) {
                    return Err(SchemaError::DuplicateNode {
                        name: name.to_string(),
                        line,
                        first_line: existing.line(),
                    });
                }
                sections.insert(name.to_string(), SchemaNode::new(name, line));
                current = Some(name.to_string());
                last_key = None;
                continue;
            }

            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(SchemaError::Syntax {
                    line,
                    message: format!("expected '[section]' or 'key = value', found '{}'", trimmed),
                });
            };
            let key = trimmed[..split].trim();
            let value = trimmed[split + 1..].trim();
            if key.is_empty() {
                return Err(SchemaError::Syntax {
                    line,
                    message: "attribute name is empty".to_string(),
                });
            }

            let Some(section) = &current else {
                return Err(SchemaError::Syntax {
                    line,
                    message: format!("attribute '{}' appears before any section", key),
                });
            };
            let Some(node) = sections.get_mut(section) else {
                continue;
            };
            if node.insert(key, value).is_some() {
                return Err(SchemaError::Syntax {
                    line,
                    message: format!("attribute '{}' is repeated in section '{}'", key, section),
                });
            }
            last_key = Some(key.to_string());
        }

        Ok(Self { sections })
    }
}

impl ReadValues for IniFile {
    fn sections(&self) -> Vec<(&str, usize)> {
        self.sections
            .values()
            .map(|node| (node.name(), node.line()))
            .collect()
    }

    fn keys(&self, section: &str) -> Vec<&str> {
        self.sections
            .get(section)
            .map(|node| node.attributes().map(|(k, _)| k).collect())
            .unwrap_or_default()
    }

    fn read_value(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section).and_then(|node| node.attr(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_pairs() {
        let ini = IniFile::parse(
            "# leading comment\n[ROOT]\nnamespace = vnc\n\n[name]\ntype: string\nkey = display-name\n",
        )
        .unwrap();

        assert_eq!(ini.sections(), vec![("ROOT", 2), ("name", 5)]);
        assert_eq!(ini.read_value("ROOT", "namespace"), Some("vnc"));
        assert_eq!(ini.read_value("name", "type"), Some("string"));
        assert_eq!(ini.read_value("name", "key"), Some("display-name"));
        assert_eq!(ini.keys("name"), vec!["type", "key"]);
    }

    #[test]
    fn value_may_contain_separator_characters() {
        let ini = IniFile::parse("[u]\ntemplate = value:/a/b, get_abstract:uuid\n").unwrap();
        assert_eq!(
            ini.read_value("u", "template"),
            Some("value:/a/b, get_abstract:uuid")
        );
    }

    #[test]
    fn indented_lines_continue_previous_value() {
        let ini = IniFile::parse("[rec]\nmembers = a, b,\n    c, d\n\tz\n").unwrap();
        assert_eq!(ini.read_value("rec", "members"), Some("a, b, c, d z"));
    }

    #[test]
    fn duplicate_section_is_rejected() {
        let err = IniFile::parse("[a]\ntype = int\n[a]\ntype = bool\n").unwrap_err();
        match err {
            SchemaError::DuplicateNode {
                name,
                line,
                first_line,
            } => {
                assert_eq!(name, "a");
                assert_eq!(line, 3);
                assert_eq!(first_line, 1);
            }
            other => panic!("Expected DuplicateNode, got: {:?}", other),
        }
    }

    #[test]
    fn repeated_key_is_rejected() {
        let err = IniFile::parse("[a]\ntype = int\ntype = bool\n").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { line: 3, .. }));
    }

    #[test]
    fn pair_before_section_is_rejected() {
        let err = IniFile::parse("type = int\n").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { line: 1, .. }));
    }

    #[test]
    fn unterminated_header_is_rejected() {
        let err = IniFile::parse("[ROOT\n").unwrap_err();
        assert!(err.to_string().contains("missing ']'"));
    }

    #[test]
    fn bare_word_is_rejected() {
        let err = IniFile::parse("[ROOT]\nnonsense\n").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { line: 2, .. }));
    }

    #[test]
    fn unknown_section_reads_nothing() {
        let ini = IniFile::parse("[a]\ntype = int\n").unwrap();
        assert!(ini.keys("b").is_empty());
        assert_eq!(ini.read_value("b", "type"), None);
    }
}
