//! JSON to struct: the `Parse` functions of a codec class.
//!
//! Parsing is strict. A scalar that cannot be extracted fails the whole parse
//! with `ParseError(key)`, a missing nested object with `NodeMissing(key)`.
//! Sequences are parsed by private `parse_<node>` helpers so that their
//! zero-length early return stays local to the sequence.

use crate::buffer::EmissionBuffer;
use crate::codegen::runtime::Runtime;
use crate::context::ParseContext;
use crate::model::{Field, FieldKind, ParseClass, Record, ScalarKind, Sequence};
use crate::naming::string_literal;
use crate::walker::{FieldVisitor, walk_members};

/// Variable holding the root record object in `Parse`.
const ROOT_OBJECT: &str = "obj_0";

/// Output of the parse emitter for one codec class.
pub struct ParseOutput {
    /// Public `Parse` overloads.
    pub public: EmissionBuffer,
    /// Private `parse_<node>` helpers.
    pub helpers: EmissionBuffer,
}

/// Generates `Parse(body, dst)`, `Parse(doc, dst)` and the sequence helpers.
pub fn generate_parse(class: &ParseClass, rt: Runtime<'_>) -> ParseOutput {
    let ty = &class.record.struct_name;
    let object = rt.ty("JsonObject");
    let status = rt.status();
    let mut public = EmissionBuffer::new();

    public.open(format!(
        "static {} Parse(const std::string& body, {}* dst) {{",
        status, ty
    ));
    public.line(format!("{} doc;", object));
    public.open(format!("if (!{}::Parse(body, &doc)) {{", object));
    public.line(format!("return {};", rt.parse_error(&class.key, None)));
    public.close("}");
    public.line("return Parse(doc, dst);");
    public.close("}");
    public.blank();

    public.open(format!(
        "static {} Parse(const {}& doc, {}* dst) {{",
        status, object, ty
    ));
    public.line(format!("{} {};", object, ROOT_OBJECT));
    public.open(format!(
        "if (!doc.GetObject({}, &{})) {{",
        string_literal(&class.key),
        ROOT_OBJECT
    ));
    public.line(format!("return {};", rt.node_missing(&class.key)));
    public.close("}");

    let mut emitter = ParseEmitter {
        rt,
        out: EmissionBuffer::new(),
        pending: Vec::new(),
    };
    walk_members(
        &class.record.members,
        &mut emitter,
        &mut ParseContext::root(ROOT_OBJECT),
    );
    public.append(std::mem::take(&mut emitter.out));
    public.line(format!("return {};", rt.ok()));
    public.close("}");

    // Helpers may queue helpers of their own nested sequences
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

    ParseOutput { public, helpers }
}

struct ParseEmitter<'t, 'c> {
    rt: Runtime<'c>,
    out: EmissionBuffer,
    /// Sequences whose helpers still need emitting.
    pending: Vec<&'t Field>,
}

impl<'t> ParseEmitter<'t, '_> {
    fn helper(&mut self, field: &'t Field, sequence: &'t Sequence, out: &mut EmissionBuffer) {
        let rt = self.rt;
        let key = string_literal(&field.key);
        let element = &sequence.element.struct_name;

        out.open(format!(
            "static {} {}(const {}& src, {}* dst) {{",
            rt.status(),
            field.parse_helper(),
            rt.ty("JsonObject"),
            sequence.cpp_type()
        ));
        out.line("dst->clear();");
        out.line(format!("const size_t length = src.ArrayLength({});", key));
        out.open("if (length == 0) {");
        out.line(format!("return {};", rt.ok()));
        out.close("}");
        out.line(format!("{} array;", rt.ty("JsonArray")));
        out.open(format!("if (!src.GetArray({}, &array)) {{", key));
        out.line(format!("return {};", rt.parse_error(&field.key, None)));
        out.close("}");
        out.open("for (size_t i = 0; i < length; ++i) {");
        out.line(format!("{} item;", rt.ty("JsonObject")));
        out.open("if (!array.GetObject(i, &item)) {");
        out.line(format!("return {};", rt.parse_error(&field.key, Some("i"))));
        out.close("}");
        out.line(format!("{} elem;", element));

        let body = std::mem::take(&mut self.out);
        walk_members(
            &sequence.element.members,
            self,
            &mut ParseContext::element("item", "elem", "i"),
        );
        out.append(std::mem::replace(&mut self.out, body));

        out.line("dst->push_back(elem);");
        out.close("}");
        out.line(format!("return {};", rt.ok()));
        out.close("}");
    }
}

impl<'t> FieldVisitor<'t> for ParseEmitter<'t, '_> {
    type Scope = ParseContext;

    fn scalar(&mut self, field: &'t Field, kind: ScalarKind, ctx: &mut ParseContext) {
        if !field.flags.parse {
            return;
        }
        let getter = match kind {
            ScalarKind::String => "GetString",
            ScalarKind::Int => "GetInt",
            ScalarKind::Bool => "GetBool",
        };
        self.out.open(format!(
            "if (!{}.{}({}, {})) {{",
            ctx.source,
            getter,
            string_literal(&field.key),
            ctx.target_of(&field.cpp_member())
        ));
        self.out.line(format!(
            "return {};",
            self.rt.parse_error(&field.key, ctx.index.as_deref())
        ));
        self.out.close("}");
        if field.flags.check_bool_set {
            self.out
                .line(format!("{}{} = true;", ctx.target, field.cpp_set_flag()));
        }
    }

    fn enter_record(
        &mut self,
        field: &'t Field,
        _record: &'t Record,
        ctx: &mut ParseContext,
    ) -> Option<ParseContext> {
        if !field.flags.parse {
            return None;
        }
        let child = ctx.child(&field.cpp_member());
        self.out.open("{");
        self.out
            .line(format!("{} {};", self.rt.ty("JsonObject"), child.source));
        self.out.open(format!(
            "if (!{}.GetObject({}, &{})) {{",
            ctx.source,
            string_literal(&field.key),
            child.source
        ));
        self.out
            .line(format!("return {};", self.rt.node_missing(&field.key)));
        self.out.close("}");
        Some(child)
    }

    fn leave_record(
        &mut self,
        _field: &'t Field,
        _record: &'t Record,
        _ctx: &mut ParseContext,
        _child: ParseContext,
    ) {
        self.out.close("}");
    }

    fn enter_sequence(
        &mut self,
        field: &'t Field,
        _sequence: &'t Sequence,
        ctx: &mut ParseContext,
    ) -> Option<ParseContext> {
        if field.flags.parse {
            self.out.open(format!(
                "if ({} status = {}({}, {}); !status.ok()) {{",
                self.rt.status(),
                field.parse_helper(),
                ctx.source,
                ctx.target_of(&field.cpp_member())
            ));
            self.out.line("return status;");
            self.out.close("}");
            self.pending.push(field);
        }
        // Elements are parsed inside the helper
        None
    }
}
