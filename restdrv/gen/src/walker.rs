//! Field resolution and the shared depth-first traversal.
//!
//! [`resolve`] turns a schema node name into a typed [`Field`] tree, checking
//! tags, members and cycles on the way. Every emitter then traverses that
//! tree through [`walk`], implementing [`FieldVisitor`] for its own output.
//!
//! ## Examples
//!
//! ```
//! use restdrv_define::Schema;
//! use restdrv_gen::walker::resolve;
//!
//! let schema = Schema::parse(
//!     "demo",
//!     "[ROOT]\ndata = foo\n\n[foo]\ntype = object\nmembers = bar, baz\n\n\
//!      [bar]\ntype = string\n\n[baz]\ntype = int\n",
//! )
//! .unwrap();
//!
//! let foo = resolve(&schema, "foo").unwrap();
//! let record = foo.as_record().unwrap();
//! assert_eq!(record.struct_name, "Foo");
//! assert_eq!(record.members.len(), 2);
//! ```

use std::collections::HashSet;

use restdrv_define::{NodeKind, Schema, SchemaNode, TypeTag};
use tracing::trace;

use crate::errors::GeneratorError;
use crate::model::{
    Field, FieldFlags, FieldKind, Record, RecordKind, ScalarKind, Sequence, SequenceKind,
};
use crate::naming::camel_case;

/// Suffix appended to a sequence node's CamelCase name to name its element.
pub const ELEMENT_SUFFIX: &str = "Item";

/// Resolves a field node and all of its descendants.
///
/// ## Errors
///
/// - `SchemaError::MissingNode` if a name has no section;
/// - `GeneratorError::UnknownType` if a node is not a field;
/// - `GeneratorError::EmptyMembers` for a composite without members;
/// - `GeneratorError::DuplicateMember` for a member listed twice;
/// - `GeneratorError::CyclicReference` if a node contains itself;
/// - `GeneratorError::InvalidAttribute` for `check_bool_set` on a non-bool,
///   or for a `mandatory` or `validation` bool without it.
///
/// Errors below a composite are wrapped in `GeneratorError::InvalidMember`.
pub fn resolve(schema: &Schema, name: &str) -> Result<Field, GeneratorError> {
    Resolver {
        schema,
        stack: Vec::new(),
    }
    .field(name)
}

struct Resolver<'s> {
    schema: &'s Schema,
    /// Composite nodes currently being resolved, outermost first.
    stack: Vec<String>,
}

impl Resolver<'_> {
    fn field(&mut self, name: &str) -> Result<Field, GeneratorError> {
        if let Some(pos) = self.stack.iter().position(|open| open == name) {
            let mut chain: Vec<&str> = self.stack[pos..].iter().map(String::as_str).collect();
            chain.push(name);
            return Err(GeneratorError::CyclicReference {
                chain: chain.join(" -> "),
            });
        }

        let node = self.schema.node(name)?;
        let tag = match node.kind()? {
            NodeKind::Field(tag) => tag,
            other => {
                return Err(GeneratorError::UnknownType {
                    node: name.to_string(),
                    tag: other.to_string(),
                });
            }
        };
        trace!("Resolving {} '{}'", tag, name);

        let flags = flags_of(node)?;
        if flags.check_bool_set && tag != TypeTag::Bool {
            return Err(GeneratorError::InvalidAttribute {
                node: name.to_string(),
                attribute: "check_bool_set".to_string(),
                reason: format!("only bool fields can track presence, this one is '{}'", tag),
            });
        }
        if tag == TypeTag::Bool && !flags.check_bool_set {
            let required = [("mandatory", flags.mandatory), ("validation", flags.validation)];
            if let Some((attribute, _)) = required.into_iter().find(|(_, set)| *set) {
                return Err(GeneratorError::InvalidAttribute {
                    node: name.to_string(),
                    attribute: attribute.to_string(),
                    reason: "a bool can only be required when it has check_bool_set".to_string(),
                });
            }
        }

        let key = node
            .attr("key")
            .filter(|key| !key.is_empty())
            .unwrap_or(name)
            .to_string();

        let kind = match tag {
            TypeTag::String => FieldKind::Scalar(ScalarKind::String),
            TypeTag::Int => FieldKind::Scalar(ScalarKind::Int),
            TypeTag::Bool => FieldKind::Scalar(ScalarKind::Bool),
            TypeTag::Object | TypeTag::Struct => {
                let members = self.composite(node)?;
                FieldKind::Record(Record {
                    struct_name: struct_name_of(node, ""),
                    tag: if tag == TypeTag::Object {
                        RecordKind::Object
                    } else {
                        RecordKind::Struct
                    },
                    members,
                })
            }
            TypeTag::Array | TypeTag::List => {
                let members = self.composite(node)?;
                FieldKind::Sequence(Sequence {
                    tag: if tag == TypeTag::Array {
                        SequenceKind::Array
                    } else {
                        SequenceKind::List
                    },
                    element: Record {
                        struct_name: struct_name_of(node, ELEMENT_SUFFIX),
                        tag: RecordKind::Struct,
                        members,
                    },
                })
            }
        };

        Ok(Field {
            name: name.to_string(),
            key,
            flags,
            kind,
        })
    }

    fn composite(&mut self, node: &SchemaNode) -> Result<Vec<Field>, GeneratorError> {
        self.stack.push(node.name().to_string());
        let members = self.members(node);
        self.stack.pop();
        members
    }

    fn members(&mut self, node: &SchemaNode) -> Result<Vec<Field>, GeneratorError> {
        let names = node.list("members");
        if names.is_empty() {
            return Err(GeneratorError::EmptyMembers {
                node: node.name().to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut members = Vec::with_capacity(names.len());
        for member in names {
            if !seen.insert(member) {
                return Err(GeneratorError::DuplicateMember {
                    parent: node.name().to_string(),
                    member: member.to_string(),
                });
            }
            let field = self
                .field(member)
                .map_err(|e| e.in_member(node.name(), member))?;
            members.push(field);
        }
        Ok(members)
    }
}

fn flags_of(node: &SchemaNode) -> Result<FieldFlags, GeneratorError> {
    let defaults = FieldFlags::default();
    Ok(FieldFlags {
        mandatory: node.flag("mandatory", defaults.mandatory)?,
        parse: node.flag("parse_support", defaults.parse)?,
        build: node.flag("build_support", defaults.build)?,
        get: node.flag("get_support", defaults.get)?,
        set: node.flag("set_support", defaults.set)?,
        check_bool_set: node.flag("check_bool_set", defaults.check_bool_set)?,
        validation: node.flag("validation", defaults.validation)?,
    })
}

/// C++ type name of a node: `struct_name`, or CamelCase of the node name
/// followed by `suffix`.
pub fn struct_name_of(node: &SchemaNode, suffix: &str) -> String {
    match node.attr("struct_name").filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("{}{}", camel_case(node.name()), suffix),
    }
}

/// Hooks invoked by [`walk`] for each field of a tree.
///
/// `Scope` is the emitter's per-level context (the JSON variable and struct
/// path in use, for instance). `enter_*` hooks return the scope for the
/// children, or `None` to skip them; the matching `leave_*` hook only runs
/// when children were visited and receives their scope back.
pub trait FieldVisitor<'t> {
    type Scope;

    fn scalar(&mut self, field: &'t Field, kind: ScalarKind, scope: &mut Self::Scope);

    fn enter_record(
        &mut self,
        field: &'t Field,
        record: &'t Record,
        scope: &mut Self::Scope,
    ) -> Option<Self::Scope>;

    fn leave_record(
        &mut self,
        _field: &'t Field,
        _record: &'t Record,
        _scope: &mut Self::Scope,
        _child: Self::Scope,
    ) {
    }

    fn enter_sequence(
        &mut self,
        field: &'t Field,
        sequence: &'t Sequence,
        scope: &mut Self::Scope,
    ) -> Option<Self::Scope>;

    fn leave_sequence(
        &mut self,
        _field: &'t Field,
        _sequence: &'t Sequence,
        _scope: &mut Self::Scope,
        _child: Self::Scope,
    ) {
    }
}

/// Visits `field` and, where the visitor allows, its descendants.
///
/// Traversal is depth-first, members left to right.
pub fn walk<'t, V: FieldVisitor<'t>>(field: &'t Field, visitor: &mut V, scope: &mut V::Scope) {
    match &field.kind {
        FieldKind::Scalar(kind) => visitor.scalar(field, *kind, scope),
        FieldKind::Record(record) => {
            if let Some(mut child) = visitor.enter_record(field, record, scope) {
                walk_members(&record.members, visitor, &mut child);
                visitor.leave_record(field, record, scope, child);
            }
        }
        FieldKind::Sequence(sequence) => {
            if let Some(mut child) = visitor.enter_sequence(field, sequence, scope) {
                walk_members(&sequence.element.members, visitor, &mut child);
                visitor.leave_sequence(field, sequence, scope, child);
            }
        }
    }
}

/// Visits each member in order.
pub fn walk_members<'t, V: FieldVisitor<'t>>(
    members: &'t [Field],
    visitor: &mut V,
    scope: &mut V::Scope,
) {
    for member in members {
        walk(member, visitor, scope);
    }
}
