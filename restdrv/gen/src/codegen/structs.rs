//! Struct declarations for the records of `ROOT.data`.
//!
//! Records are declared in post-order: a nested record or sequence element
//! comes before the record that holds it, and each type name is declared
//! once per file even when several records share it.

use std::collections::HashSet;

use crate::buffer::EmissionBuffer;
use crate::model::{Field, FieldKind, Record, ScalarKind, Sequence};
use crate::walker::{FieldVisitor, walk};

/// Generates every struct reachable from `records`.
///
/// ## Examples
///
/// ```text
/// struct PrefixesItem {
///     std::string ip_;
///     int64_t len_ = 0;
/// };
///
/// struct VirtualNetwork {
///     ...
///     std::vector<PrefixesItem> prefixes_;
///
///     const std::string& get_uuid() const { return uuid_; }
///     void set_uuid(const std::string& value) { uuid_ = value; }
/// };
/// ```
pub fn generate_structs(records: &[Field]) -> EmissionBuffer {
    let mut order = DeclarationOrder::default();
    for field in records {
        walk(field, &mut order, &mut ());
    }

    let mut out = EmissionBuffer::new();
    for record in order.records {
        generate_struct(record, &mut out);
        out.blank();
    }
    out
}

/// Collects records on the way out of the walk.
#[derive(Default)]
struct DeclarationOrder<'t> {
    seen: HashSet<&'t str>,
    records: Vec<&'t Record>,
}

impl<'t> DeclarationOrder<'t> {
    fn declare(&mut self, record: &'t Record) {
        if self.seen.insert(&record.struct_name) {
            self.records.push(record);
        }
    }
}

impl<'t> FieldVisitor<'t> for DeclarationOrder<'t> {
    type Scope = ();

    fn scalar(&mut self, _field: &'t Field, _kind: ScalarKind, _scope: &mut ()) {}

    fn enter_record(&mut self, _field: &'t Field, _record: &'t Record, _scope: &mut ()) -> Option<()> {
        Some(())
    }

    fn leave_record(&mut self, _field: &'t Field, record: &'t Record, _scope: &mut (), _child: ()) {
        self.declare(record);
    }

    fn enter_sequence(
        &mut self,
        _field: &'t Field,
        _sequence: &'t Sequence,
        _scope: &mut (),
    ) -> Option<()> {
        Some(())
    }

    fn leave_sequence(
        &mut self,
        _field: &'t Field,
        sequence: &'t Sequence,
        _scope: &mut (),
        _child: (),
    ) {
        self.declare(&sequence.element);
    }
}

fn generate_struct(record: &Record, out: &mut EmissionBuffer) {
    out.open(format!("struct {} {{", record.struct_name));

    for member in &record.members {
        let name = member.cpp_member();
        match member.kind {
            FieldKind::Scalar(ScalarKind::Int) => out.line(format!("int64_t {} = 0;", name)),
            FieldKind::Scalar(ScalarKind::Bool) => {
                out.line(format!("bool {} = false;", name));
                if member.flags.check_bool_set {
                    out.line(format!("bool {} = false;", member.cpp_set_flag()));
                }
            }
            _ => out.line(format!("{} {};", member.cpp_type(), name)),
        }
    }

    let accessors: Vec<&Field> = record
        .members
        .iter()
        .filter(|member| member.flags.get || member.flags.set)
        .collect();
    if !accessors.is_empty() {
        out.blank();
    }
    for member in accessors {
        generate_accessors(member, out);
    }

    out.close("};");
}

fn generate_accessors(field: &Field, out: &mut EmissionBuffer) {
    let name = field.cpp_member();
    // Scalars other than strings travel by value
    let (returned, param) = match field.kind {
        FieldKind::Scalar(ScalarKind::Int) | FieldKind::Scalar(ScalarKind::Bool) => {
            (field.cpp_type(), field.cpp_type())
        }
        _ => (
            format!("const {}&", field.cpp_type()),
            format!("const {}&", field.cpp_type()),
        ),
    };

    if field.flags.get {
        out.line(format!(
            "{} get_{}() const {{ return {}; }}",
            returned, field.name, name
        ));
    }
    if field.flags.set {
        if field.flags.check_bool_set {
            out.open(format!("void set_{}({} value) {{", field.name, param));
            out.line(format!("{} = value;", name));
            out.line(format!("{} = true;", field.cpp_set_flag()));
            out.close("}");
        } else {
            out.line(format!(
                "void set_{}({} value) {{ {} = value; }}",
                field.name, param, name
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::resolve_driver;
    use crate::test_utils::{SIMPLE_SCHEMA, schema_from};

    fn generated(text: &str) -> String {
        let driver = resolve_driver(&schema_from(text)).unwrap();
        generate_structs(&driver.records).render()
    }

    /// Field declaration lines of one struct, in order.
    fn fields_of<'a>(text: &'a str, struct_name: &str) -> Vec<&'a str> {
        let start = text.find(&format!("struct {} {{", struct_name)).unwrap();
        text[start..]
            .lines()
            .skip(1)
            .take_while(|line| !line.is_empty() && *line != "};")
            .map(str::trim)
            .collect()
    }

    #[test]
    fn nested_records_are_declared_first() {
        let text = generated(SIMPLE_SCHEMA);
        let ipam = text.find("struct Ipam {").unwrap();
        let item = text.find("struct PrefixesItem {").unwrap();
        let vn = text.find("struct VirtualNetwork {").unwrap();
        assert!(ipam < vn && item < vn);
        assert!(ipam < item);
    }

    #[test]
    fn one_declaration_per_member_in_order() {
        let text = generated(SIMPLE_SCHEMA);
        assert_eq!(
            fields_of(&text, "VirtualNetwork"),
            vec![
                "std::string uuid_;",
                "std::string display_name_;",
                "int64_t vlan_ = 0;",
                "bool enabled_ = false;",
                "bool enabled_set_ = false;",
                "Ipam ipam_;",
                "std::vector<PrefixesItem> prefixes_;",
            ]
        );
        assert_eq!(
            fields_of(&text, "PrefixesItem"),
            vec!["std::string ip_;", "int64_t len_ = 0;"]
        );
    }

    #[test]
    fn accessors_follow_support_flags() {
        let text = generated(SIMPLE_SCHEMA);
        assert!(text.contains("const std::string& get_uuid() const { return uuid_; }"));
        assert!(text.contains("void set_uuid(const std::string& value) { uuid_ = value; }"));
        assert!(text.contains("int64_t get_vlan() const { return vlan_; }"));
        assert!(!text.contains("set_vlan"));
        assert!(!text.contains("get_display_name"));
    }

    #[test]
    fn check_bool_set_setter_marks_flag() {
        let text = generated(SIMPLE_SCHEMA);
        assert!(text.contains(
            "    void set_enabled(bool value) {\n        enabled_ = value;\n        enabled_set_ = true;\n    }\n"
        ));
    }

    #[test]
    fn shared_record_declared_once() {
        let text = generated(
            "[ROOT]\ndata = a, b\n[a]\ntype = object\nmembers = shared\n\
             [b]\ntype = object\nmembers = shared\n\
             [shared]\ntype = struct\nmembers = x\n[x]\ntype = list\nmembers = y\n[y]\ntype = bool\n",
        );
        assert_eq!(text.matches("struct Shared {").count(), 1);
        assert!(text.contains("std::list<XItem> x_;"));
        let shared = text.find("struct Shared {").unwrap();
        assert!(text.find("struct XItem {").unwrap() < shared);
        assert!(shared < text.find("struct A {").unwrap());
    }
}
