//! Per-level emission contexts.
//!
//! Emitters never keep "current variable" state of their own. Each level of
//! the field tree gets a fresh context value describing where its data comes
//! from and goes to, created when descending and dropped on return.

use crate::model::{Field, FieldKind, Record, ScalarKind};

/// Where a parse emitter reads from and writes to.
///
/// ## Examples
///
/// ```
/// use restdrv_gen::context::ParseContext;
///
/// let root = ParseContext::root("doc_obj");
/// assert_eq!(root.target_of("uuid_"), "&dst->uuid_");
///
/// let child = root.child("ipam_");
/// assert_eq!(child.source, "obj_1");
/// assert_eq!(child.target_of("name_"), "&dst->ipam_.name_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseContext {
    /// JSON object variable holding this level's keys.
    pub source: String,
    /// Struct path prefix the members are written to, e.g. `dst->ipam_.`.
    pub target: String,
    /// Loop index variable when inside a sequence element.
    pub index: Option<String>,
    /// Nesting depth, used to name JSON variables.
    pub depth: usize,
}

impl ParseContext {
    /// Context of the top-level record of `Parse`.
    pub fn root(source: &str) -> Self {
        Self {
            source: source.to_string(),
            target: "dst->".to_string(),
            index: None,
            depth: 0,
        }
    }

    /// Context of one element inside a `parse_<node>` helper.
    pub fn element(source: &str, element: &str, index: &str) -> Self {
        Self {
            source: source.to_string(),
            target: format!("{}.", element),
            index: Some(index.to_string()),
            depth: 0,
        }
    }

    /// Context of a nested record stored in `member`.
    pub fn child(&self, member: &str) -> Self {
        Self {
            source: object_var(self.depth + 1),
            target: format!("{}{}.", self.target, member),
            index: self.index.clone(),
            depth: self.depth + 1,
        }
    }

    /// Address of a member, for out-parameters.
    pub fn target_of(&self, member: &str) -> String {
        format!("&{}{}", self.target, member)
    }
}

/// Where a build emitter reads from and writes to.
///
/// ## Examples
///
/// ```
/// use restdrv_gen::context::BuildContext;
///
/// let root = BuildContext::root("obj_0");
/// assert_eq!(root.source_of("uuid_"), "src.uuid_");
///
/// let child = root.child("ipam_");
/// assert_eq!(child.target, "obj_1");
/// assert_eq!(child.source_of("name_"), "src.ipam_.name_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Struct path prefix the members are read from, e.g. `src.ipam_.`.
    pub source: String,
    /// JSON object variable the members are attached to.
    pub target: String,
    pub index: Option<String>,
    pub depth: usize,
}

impl BuildContext {
    pub fn root(target: &str) -> Self {
        Self {
            source: "src.".to_string(),
            target: target.to_string(),
            index: None,
            depth: 0,
        }
    }

    pub fn element(element: &str, target: &str, index: &str) -> Self {
        Self {
            source: format!("{}.", element),
            target: target.to_string(),
            index: Some(index.to_string()),
            depth: 0,
        }
    }

    pub fn child(&self, member: &str) -> Self {
        Self {
            source: format!("{}{}.", self.source, member),
            target: object_var(self.depth + 1),
            index: self.index.clone(),
            depth: self.depth + 1,
        }
    }

    pub fn source_of(&self, member: &str) -> String {
        format!("{}{}", self.source, member)
    }
}

/// Name of the JSON object variable at `depth`.
pub fn object_var(depth: usize) -> String {
    format!("obj_{}", depth)
}

/// Name of the JSON array variable at `depth`.
pub fn array_var(depth: usize) -> String {
    format!("array_{}", depth)
}

/// A C++ condition telling whether a field holds a value.
///
/// Plain bools always hold one and have no presence check. Records are
/// present when all of their mandatory members are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// `std::string` or sequence: `!x.empty()`.
    NonEmpty(String),
    /// `int64_t`: `x != 0`.
    NonZero(String),
    /// `check_bool_set` bool: `x_set_`.
    Flag(String),
    /// Every part must hold.
    All(Vec<Presence>),
}

impl Presence {
    /// Presence check of `field` read through `prefix` (e.g. `src.`).
    ///
    /// `eligible` filters which mandatory members of a record count.
    pub fn of(field: &Field, prefix: &str, eligible: &dyn Fn(&Field) -> bool) -> Option<Self> {
        let path = format!("{}{}", prefix, field.cpp_member());
        match &field.kind {
            FieldKind::Scalar(ScalarKind::String) => Some(Self::NonEmpty(path)),
            FieldKind::Scalar(ScalarKind::Int) => Some(Self::NonZero(path)),
            FieldKind::Scalar(ScalarKind::Bool) if field.flags.check_bool_set => Some(Self::Flag(
                format!("{}{}", prefix, field.cpp_set_flag()),
            )),
            FieldKind::Scalar(ScalarKind::Bool) => None,
            FieldKind::Sequence(_) => Some(Self::NonEmpty(path)),
            FieldKind::Record(record) => Self::mandatory_of(record, &format!("{}.", path), eligible),
        }
    }

    /// Conjunction of the mandatory members of `record`, or `None` when no
    /// mandatory member has a check.
    pub fn mandatory_of(
        record: &Record,
        prefix: &str,
        eligible: &dyn Fn(&Field) -> bool,
    ) -> Option<Self> {
        let parts: Vec<Self> = record
            .members
            .iter()
            .filter(|member| member.flags.mandatory && eligible(member))
            .filter_map(|member| Self::of(member, prefix, eligible))
            .collect();
        Self::all(parts)
    }

    /// Combines checks, flattening nested conjunctions.
    pub fn all(parts: Vec<Self>) -> Option<Self> {
        let mut flat = Vec::new();
        for part in parts {
            match part {
                Self::All(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Self::All(flat)),
        }
    }

    /// Condition that holds when the value is present.
    pub fn is_set(&self) -> String {
        match self {
            Self::NonEmpty(path) => format!("!{}.empty()", path),
            Self::NonZero(path) => format!("{} != 0", path),
            Self::Flag(path) => path.clone(),
            Self::All(parts) => parts
                .iter()
                .map(Self::is_set)
                .collect::<Vec<_>>()
                .join(" && "),
        }
    }

    /// Condition that holds when the value is missing.
    pub fn is_unset(&self) -> String {
        match self {
            Self::NonEmpty(path) => format!("{}.empty()", path),
            Self::NonZero(path) => format!("{} == 0", path),
            Self::Flag(path) => format!("!{}", path),
            Self::All(parts) => parts
                .iter()
                .map(Self::is_unset)
                .collect::<Vec<_>>()
                .join(" || "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldFlags, RecordKind};

    fn field(name: &str, kind: ScalarKind, mandatory: bool) -> Field {
        Field {
            name: name.to_string(),
            key: name.to_string(),
            flags: FieldFlags {
                mandatory,
                ..FieldFlags::default()
            },
            kind: FieldKind::Scalar(kind),
        }
    }

    fn any(_: &Field) -> bool {
        true
    }

    #[test]
    fn element_contexts_carry_index() {
        let ctx = ParseContext::element("item", "elem", "i");
        assert_eq!(ctx.target_of("ip_"), "&elem.ip_");
        assert_eq!(ctx.child("inner_").index.as_deref(), Some("i"));

        let ctx = BuildContext::element("elem", "item", "i");
        assert_eq!(ctx.source_of("ip_"), "elem.ip_");
        assert_eq!(ctx.child("inner_").source_of("x_"), "elem.inner_.x_");
    }

    #[test]
    fn scalar_presence_by_type() {
        let s = Presence::of(&field("name", ScalarKind::String, false), "src.", &any).unwrap();
        assert_eq!(s.is_set(), "!src.name_.empty()");
        assert_eq!(s.is_unset(), "src.name_.empty()");

        let i = Presence::of(&field("vlan", ScalarKind::Int, false), "src.", &any).unwrap();
        assert_eq!(i.is_set(), "src.vlan_ != 0");

        assert!(Presence::of(&field("on", ScalarKind::Bool, true), "src.", &any).is_none());

        let mut flagged = field("on", ScalarKind::Bool, true);
        flagged.flags.check_bool_set = true;
        let f = Presence::of(&flagged, "data.", &any).unwrap();
        assert_eq!(f.is_set(), "data.on_set_");
        assert_eq!(f.is_unset(), "!data.on_set_");
    }

    #[test]
    fn record_presence_is_conjunction_of_mandatory_members() {
        let record = Record {
            struct_name: "Ipam".to_string(),
            tag: RecordKind::Struct,
            members: vec![
                field("a", ScalarKind::String, true),
                field("b", ScalarKind::Int, false),
                field("c", ScalarKind::Int, true),
            ],
        };
        let presence = Presence::mandatory_of(&record, "src.ipam_.", &any).unwrap();
        assert_eq!(presence.is_set(), "!src.ipam_.a_.empty() && src.ipam_.c_ != 0");
        assert_eq!(presence.is_unset(), "src.ipam_.a_.empty() || src.ipam_.c_ == 0");
    }

    #[test]
    fn eligibility_filters_members() {
        let mut hidden = field("a", ScalarKind::String, true);
        hidden.flags.build = false;
        let record = Record {
            struct_name: "R".to_string(),
            tag: RecordKind::Struct,
            members: vec![hidden],
        };
        assert!(Presence::mandatory_of(&record, "src.", &|f: &Field| f.flags.build).is_none());
    }

    #[test]
    fn all_flattens_and_collapses() {
        assert_eq!(Presence::all(vec![]), None);
        let single = Presence::all(vec![Presence::NonZero("x".to_string())]).unwrap();
        assert_eq!(single, Presence::NonZero("x".to_string()));

        let nested = Presence::all(vec![
            Presence::All(vec![Presence::Flag("a".to_string()), Presence::Flag("b".to_string())]),
            Presence::Flag("c".to_string()),
        ])
        .unwrap();
        assert_eq!(nested.is_set(), "a && b && c");
    }
}
