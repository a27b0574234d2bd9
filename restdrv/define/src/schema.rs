//! The loaded schema: every node of one schema file, looked up by name.
//!
//! A schema always has a `ROOT` section naming the records to declare
//! (`data`) and the classes to generate (`methods`). All other sections are
//! nodes referenced, directly or transitively, from `ROOT`.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::SchemaError;
use crate::node::SchemaNode;
use crate::reader::{IniFile, ReadValues};

/// Name of the mandatory root section.
pub const ROOT: &str = "ROOT";

/// File extension stripped from schema file names.
pub const SCHEMA_EXTENSION: &str = "rest";

/// All nodes of one schema, immutable once loaded.
///
/// ## Examples
///
/// ```
/// use restdrv_define::Schema;
///
/// let schema = Schema::parse(
///     "virtual_network",
///     "[ROOT]\ndata = vn\n\n[vn]\ntype = object\nmembers = name\n\n[name]\ntype = string\n",
/// )
/// .unwrap();
///
/// assert_eq!(schema.data(), vec!["vn"]);
/// assert_eq!(schema.namespace(), "virtual_network");
/// assert_eq!(schema.node("name").unwrap().attr("type"), Some("string"));
/// assert!(schema.node("missing").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    source_name: String,
    nodes: IndexMap<String, SchemaNode>,
}

impl Schema {
    /// Reads and parses a schema file.
    ///
    /// The source name is the file name without its `.rest` extension.
    ///
    /// ## Errors
    ///
    /// Returns `SchemaError::Io` if the file cannot be read, or any error of
    /// [`Schema::parse`].
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let text = fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&source_name_for(path), &text)
    }

    /// Parses schema text in the INI-like format.
    ///
    /// ## Errors
    ///
    /// Returns syntax errors from [`IniFile::parse`], or
    /// `SchemaError::MissingNode` when there is no `ROOT` section.
    pub fn parse(source_name: &str, text: &str) -> Result<Self, SchemaError> {
        let ini = IniFile::parse(text)?;
        Self::from_values(source_name, &ini)
    }

    /// Builds a schema from any section/key source.
    ///
    /// ## Errors
    ///
    /// Returns `SchemaError::MissingNode` when there is no `ROOT` section.
    pub fn from_values(source_name: &str, values: &impl ReadValues) -> Result<Self, SchemaError> {
        let mut nodes = IndexMap::new();
        for (section, line) in values.sections() {
            let mut node = SchemaNode::new(section, line);
            for key in values.keys(section) {
                if let Some(value) = values.read_value(section, key) {
                    node.insert(key, value);
                }
            }
            nodes.insert(section.to_string(), node);
        }

        if !nodes.contains_key(ROOT) {
            return Err(SchemaError::MissingNode(ROOT.to_string()));
        }

        Ok(Self {
            source_name: source_name.to_string(),
            nodes,
        })
    }

    /// Schema file name without directory or extension.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Looks up a node by name.
    ///
    /// ## Errors
    ///
    /// Returns `SchemaError::MissingNode` if no section has that name.
    pub fn node(&self, name: &str) -> Result<&SchemaNode, SchemaError> {
        self.nodes
            .get(name)
            .ok_or_else(|| SchemaError::MissingNode(name.to_string()))
    }

    /// The `ROOT` section.
    pub fn root(&self) -> &SchemaNode {
        // Presence is checked in `from_values`
        &self.nodes[ROOT]
    }

    /// Record nodes listed in `ROOT.data`.
    pub fn data(&self) -> Vec<&str> {
        self.root().list("data")
    }

    /// Class nodes listed in `ROOT.methods`.
    pub fn methods(&self) -> Vec<&str> {
        self.root().list("methods")
    }

    /// Target namespace: `ROOT.namespace`, or the source name.
    pub fn namespace(&self) -> &str {
        self.root()
            .attr("namespace")
            .filter(|ns| !ns.is_empty())
            .unwrap_or(self.source_name.as_str())
    }

    /// Extra include paths from `ROOT.includes`.
    pub fn includes(&self) -> Vec<&str> {
        self.root().list("includes")
    }

    /// Iterates every node in file order.
    pub fn nodes(&self) -> impl Iterator<Item = &SchemaNode> {
        self.nodes.values()
    }
}

/// Derives the source name from a schema path.
///
/// ## Examples
///
/// ```
/// use std::path::Path;
/// use restdrv_define::schema::source_name_for;
///
/// assert_eq!(source_name_for(Path::new("schemas/virtual_network.rest")), "virtual_network");
/// assert_eq!(source_name_for(Path::new("bgp.router.rest")), "bgp.router");
/// assert_eq!(source_name_for(Path::new("plain")), "plain");
/// ```
pub fn source_name_for(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.strip_suffix(&format!(".{}", SCHEMA_EXTENSION)) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or(file_name),
    }
}
