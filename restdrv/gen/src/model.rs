//! Resolved, typed view of a schema.
//!
//! The schema model only knows strings. Everything downstream of resolution
//! works on these types instead: a [`Field`] tree per record and one
//! [`Class`] per entry of `ROOT.methods`, bundled into a [`Driver`].
//!
//! Field trees are serializable so `restdrv-gen inspect` can print them.

use restdrv_define::{MethodKind, UrlCategory};
use serde::Serialize;

/// A resolved field node and everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Schema node name; also the C++ member name without its `_` suffix.
    pub name: String,
    /// JSON key.
    pub key: String,
    pub flags: FieldFlags,
    pub kind: FieldKind,
}

/// Per-field generation switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldFlags {
    pub mandatory: bool,
    pub parse: bool,
    pub build: bool,
    pub get: bool,
    pub set: bool,
    pub check_bool_set: bool,
    pub validation: bool,
}

impl Default for FieldFlags {
    fn default() -> Self {
        Self {
            mandatory: false,
            parse: true,
            build: true,
            get: false,
            set: false,
            check_bool_set: false,
            validation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Scalar(ScalarKind),
    Record(Record),
    Sequence(Sequence),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,
    Int,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Object,
    Struct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceKind {
    /// `std::vector`
    Array,
    /// `std::list`
    List,
}

/// A C++ struct: an `object`/`struct` node, or the element of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub struct_name: String,
    pub tag: RecordKind,
    pub members: Vec<Field>,
}

/// An `array`/`list` node and its element type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sequence {
    pub tag: SequenceKind,
    pub element: Record,
}

impl Field {
    /// Member name in the generated struct, e.g. `uuid_`.
    pub fn cpp_member(&self) -> String {
        format!("{}_", self.name)
    }

    /// Companion flag of a `check_bool_set` bool, e.g. `enabled_set_`.
    pub fn cpp_set_flag(&self) -> String {
        format!("{}_set_", self.name)
    }

    /// The C++ type of the member.
    pub fn cpp_type(&self) -> String {
        match &self.kind {
            FieldKind::Scalar(ScalarKind::String) => "std::string".to_string(),
            FieldKind::Scalar(ScalarKind::Int) => "int64_t".to_string(),
            FieldKind::Scalar(ScalarKind::Bool) => "bool".to_string(),
            FieldKind::Record(record) => record.struct_name.clone(),
            FieldKind::Sequence(sequence) => sequence.cpp_type(),
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match &self.kind {
            FieldKind::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<ScalarKind> {
        match self.kind {
            FieldKind::Scalar(kind) => Some(kind),
            _ => None,
        }
    }

    /// Name of the private helper that parses this sequence.
    pub fn parse_helper(&self) -> String {
        format!("parse_{}", self.name)
    }

    /// Name of the private helper that builds this sequence.
    pub fn build_helper(&self) -> String {
        format!("build_{}", self.name)
    }
}

impl Record {
    /// Finds a direct member by node name.
    pub fn member(&self, name: &str) -> Option<&Field> {
        self.members.iter().find(|field| field.name == name)
    }
}

impl Sequence {
    /// Container type, e.g. `std::vector<PrefixItem>`.
    pub fn cpp_type(&self) -> String {
        let container = match self.tag {
            SequenceKind::Array => "std::vector",
            SequenceKind::List => "std::list",
        };
        format!("{}<{}>", container, self.element.struct_name)
    }
}

/// Everything one header is generated from.
#[derive(Debug, Clone)]
pub struct Driver {
    pub source_name: String,
    pub namespace: String,
    pub includes: Vec<String>,
    /// Resolved `ROOT.data` entries, in order.
    pub records: Vec<Field>,
    /// Resolved `ROOT.methods` entries, in order.
    pub classes: Vec<Class>,
}

impl Driver {
    /// Looks up a resolved `ROOT.data` record by node name.
    pub fn record(&self, name: &str) -> Option<&Field> {
        self.records.iter().find(|field| field.name == name)
    }
}

/// An entry of `ROOT.methods`.
#[derive(Debug, Clone)]
pub enum Class {
    Parse(ParseClass),
    Url(UrlClass),
}

impl Class {
    pub fn node(&self) -> &str {
        match self {
            Self::Parse(class) => &class.node,
            Self::Url(class) => &class.node,
        }
    }

    pub fn class_name(&self) -> &str {
        match self {
            Self::Parse(class) => &class.class_name,
            Self::Url(class) => &class.class_name,
        }
    }
}

/// A `parse_class`: a codec for one record.
#[derive(Debug, Clone)]
pub struct ParseClass {
    pub node: String,
    pub class_name: String,
    /// Node name of the record marshalled.
    pub data: String,
    /// JSON key the record lives under in a document.
    pub key: String,
    pub record: Record,
    pub parse: bool,
    pub build: bool,
}

/// A `url_class`: a CRUD client for one record.
#[derive(Debug, Clone)]
pub struct UrlClass {
    pub node: String,
    pub class_name: String,
    /// Base class, if the schema names one.
    pub interface: Option<String>,
    /// Class name of the codec used for responses and default payloads.
    pub codec: String,
    /// Node name of the record the client works on.
    pub data: String,
    pub record: Record,
    /// Method descriptors in `members` order.
    pub methods: Vec<Method>,
    /// Template shared by `GET`/`READ`.
    pub read_url: Option<UrlTemplate>,
    /// Template shared by `POST`/`PUT`/`DELETE`.
    pub cud_url: Option<UrlTemplate>,
}

impl UrlClass {
    pub fn method(&self, kind: MethodKind) -> Option<&Method> {
        self.methods.iter().find(|method| method.kind == kind)
    }

    pub fn has(&self, kind: MethodKind) -> bool {
        self.method(kind).is_some()
    }

    pub fn url(&self, category: UrlCategory) -> Option<&UrlTemplate> {
        match category {
            UrlCategory::Read => self.read_url.as_ref(),
            UrlCategory::Cud => self.cud_url.as_ref(),
        }
    }
}

/// Name of the generated function building URLs of `category`.
pub fn url_function(category: UrlCategory) -> &'static str {
    match category {
        UrlCategory::Read => "get_url",
        UrlCategory::Cud => "get_cud_url",
    }
}

/// A method descriptor of a `url_class`.
#[derive(Debug, Clone)]
pub struct Method {
    pub node: String,
    pub kind: MethodKind,
    /// Codec building the payload, when `request_members` overrides the class codec.
    pub request_codec: Option<String>,
    /// Protected hook invoked after success.
    pub call_back: Option<String>,
}

/// A parsed `url` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    pub node: String,
    pub parts: Vec<UrlPart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPart {
    Literal(String),
    /// Accessor of a scalar member of the class record.
    Accessor { member: String, scalar: ScalarKind },
}
