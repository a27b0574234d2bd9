//! Struct to JSON: the `Build` functions of a codec class.
//!
//! Only fields holding a value are attached. A nested record is attached
//! when all of its mandatory members are set, or when it has no mandatory
//! members and ended up non-empty. Mandatory members of the top-level record
//! are checked before anything is built.

use crate::buffer::EmissionBuffer;
use crate::codegen::runtime::Runtime;
use crate::context::{BuildContext, Presence, array_var};
use crate::model::{Field, FieldKind, ParseClass, Record, ScalarKind, Sequence};
use crate::naming::string_literal;
use crate::walker::{FieldVisitor, walk_members};

/// Variable holding the root record object in `Build`.
const ROOT_OBJECT: &str = "obj_0";

/// Output of the build emitter for one codec class.
pub struct BuildOutput {
    /// Public `Build` overloads.
    pub public: EmissionBuffer,
    /// Private `build_<node>` helpers.
    pub helpers: EmissionBuffer,
}

fn buildable(field: &Field) -> bool {
    field.flags.build
}

/// Generates `Build(src, payload)`, `Build(src, doc)` and the sequence
/// helpers.
pub fn generate_build(class: &ParseClass, rt: Runtime<'_>) -> BuildOutput {
    let ty = &class.record.struct_name;
    let object = rt.ty("JsonObject");
    let status = rt.status();
    let mut public = EmissionBuffer::new();

    public.open(format!(
        "static {} Build(const {}& src, std::string* payload) {{",
        status, ty
    ));
    public.line(format!("{} doc;", object));
    public.open(format!(
        "if ({} status = Build(src, &doc); !status.ok()) {{",
        status
    ));
    public.line("return status;");
    public.close("}");
    public.line("*payload = doc.Serialize();");
    public.line(format!("return {};", rt.ok()));
    public.close("}");
    public.blank();

    public.open(format!(
        "static {} Build(const {}& src, {}* doc) {{",
        status, ty, object
    ));
    mandatory_checks(&mut public, rt, &class.record, "src.", None);
    public.line(format!("{} {};", object, ROOT_OBJECT));

    let mut emitter = BuildEmitter {
        rt,
        out: EmissionBuffer::new(),
        pending: Vec::new(),
    };
    walk_members(
        &class.record.members,
        &mut emitter,
        &mut BuildContext::root(ROOT_OBJECT),
    );
    public.append(std::mem::take(&mut emitter.out));

    public.open(format!(
        "if (!doc->SetObject({}, {})) {{",
        string_literal(&class.key),
        ROOT_OBJECT
    ));
    public.line(format!("return {};", rt.build_error(&class.key, None)));
    public.close("}");
    public.line(format!("return {};", rt.ok()));
    public.close("}");

    let mut helpers = EmissionBuffer::new();
    let mut done: Vec<&str> = Vec::new();
    let mut next = 0;
    while let Some(&field) = emitter.pending.get(next) {
        next += 1;
        if done.contains(&field.name.as_str()) {
            continue;
        }
        done.push(&field.name);
        if let FieldKind::Sequence(sequence) = &field.kind {
            emitter.helper(field, sequence, &mut helpers);
            helpers.blank();
        }
    }

    BuildOutput { public, helpers }
}

/// Fails the build for the first mandatory member of `record` that is not set.
fn mandatory_checks(
    out: &mut EmissionBuffer,
    rt: Runtime<'_>,
    record: &Record,
    prefix: &str,
    index: Option<&str>,
) {
    for member in record.members.iter().filter(|m| m.flags.mandatory && buildable(m)) {
        if let Some(presence) = Presence::of(member, prefix, &buildable) {
            out.open(format!("if ({}) {{", presence.is_unset()));
            out.line(format!("return {};", rt.build_error(&member.key, index)));
            out.close("}");
        }
    }
}

struct BuildEmitter<'t, 'c> {
    rt: Runtime<'c>,
    out: EmissionBuffer,
    pending: Vec<&'t Field>,
}

impl<'t> BuildEmitter<'t, '_> {
    fn helper(&mut self, field: &'t Field, sequence: &'t Sequence, out: &mut EmissionBuffer) {
        let rt = self.rt;
        let element = &sequence.element;

        out.open(format!(
            "static {} {}(const {}& src, {}* dst) {{",
            rt.status(),
            field.build_helper(),
            sequence.cpp_type(),
            rt.ty("JsonArray")
        ));
        out.line("size_t i = 0;");
        out.open(format!("for (const {}& elem : src) {{", element.struct_name));
        mandatory_checks(out, rt, element, "elem.", Some("i"));
        out.line(format!("{} item;", rt.ty("JsonObject")));

        let body = std::mem::take(&mut self.out);
        walk_members(
            &element.members,
            self,
            &mut BuildContext::element("elem", "item", "i"),
        );
        out.append(std::mem::replace(&mut self.out, body));

        out.open("if (!dst->Append(item)) {");
        out.line(format!("return {};", rt.build_error(&field.key, Some("i"))));
        out.close("}");
        out.line("++i;");
        out.close("}");
        out.line(format!("return {};", rt.ok()));
        out.close("}");
    }

    /// Emits `target.Set...(key, value)` with its failure return.
    fn attach(&mut self, ctx: &BuildContext, setter: &str, field: &Field, value: &str) {
        self.out.open(format!(
            "if (!{}.{}({}, {})) {{",
            ctx.target,
            setter,
            string_literal(&field.key),
            value
        ));
        self.out.line(format!(
            "return {};",
            self.rt.build_error(&field.key, ctx.index.as_deref())
        ));
        self.out.close("}");
    }
}

impl<'t> FieldVisitor<'t> for BuildEmitter<'t, '_> {
    type Scope = BuildContext;

    fn scalar(&mut self, field: &'t Field, kind: ScalarKind, ctx: &mut BuildContext) {
        if !field.flags.build {
            return;
        }
        let setter = match kind {
            ScalarKind::String => "SetString",
            ScalarKind::Int => "SetInt",
            ScalarKind::Bool => "SetBool",
        };
        let value = ctx.source_of(&field.cpp_member());
        match Presence::of(field, &ctx.source, &buildable) {
            Some(presence) => {
                self.out.open(format!("if ({}) {{", presence.is_set()));
                self.attach(ctx, setter, field, &value);
                self.out.close("}");
            }
            None => self.attach(ctx, setter, field, &value),
        }
    }

    fn enter_record(
        &mut self,
        field: &'t Field,
        _record: &'t Record,
        ctx: &mut BuildContext,
    ) -> Option<BuildContext> {
        if !field.flags.build {
            return None;
        }
        let child = ctx.child(&field.cpp_member());
        self.out.open("{");
        self.out
            .line(format!("{} {};", self.rt.ty("JsonObject"), child.target));
        Some(child)
    }

    fn leave_record(
        &mut self,
        field: &'t Field,
        record: &'t Record,
        ctx: &mut BuildContext,
        child: BuildContext,
    ) {
        let guard = match Presence::mandatory_of(record, &child.source, &buildable) {
            Some(presence) => presence.is_set(),
            None => format!("!{}.Empty()", child.target),
        };
        self.out.open(format!("if ({}) {{", guard));
        self.attach(ctx, "SetObject", field, &child.target);
        self.out.close("}");
        self.out.close("}");
    }

    fn enter_sequence(
        &mut self,
        field: &'t Field,
        _sequence: &'t Sequence,
        ctx: &mut BuildContext,
    ) -> Option<BuildContext> {
        if !field.flags.build {
            return None;
        }
        let array = array_var(ctx.depth + 1);
        self.out.open("{");
        self.out.line(format!("{} {};", self.rt.ty("JsonArray"), array));
        self.out.open(format!(
            "if ({} status = {}({}, &{}); !status.ok()) {{",
            self.rt.status(),
            field.build_helper(),
            ctx.source_of(&field.cpp_member()),
            array
        ));
        self.out.line("return status;");
        self.out.close("}");
        self.out.open(format!("if ({}.Size() != 0) {{", array));
        self.attach(ctx, "SetArray", field, &array);
        self.out.close("}");
        self.out.close("}");
        self.pending.push(field);
        // Elements are built inside the helper
        None
    }
}
