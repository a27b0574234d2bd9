//! CRUD client classes generated for `url_class` nodes.
//!
//! Every HTTP method runs the same sequence of [`CrudStep`]s, with only the
//! payload and response handling differing per kind:
//!
//! 1. build the request payload (`POST`/`PUT`, after `Validate` when the
//!    class has one);
//! 2. send it through the transport;
//! 3. no response is a `TransportError`;
//! 4. an unexpected code is an `HttpError`;
//! 5. success runs the `call_back` hook and returns `Ok`.

use std::collections::HashSet;

use restdrv_define::{MethodKind, UrlCategory};

use crate::buffer::EmissionBuffer;
use crate::codegen::runtime::Runtime;
use crate::codegen::url::generate_url_functions;
use crate::context::Presence;
use crate::model::{Field, Method, Record, ScalarKind, Sequence, UrlClass, url_function};
use crate::walker::{FieldVisitor, walk_members};

/// Generated member function name of a method kind.
pub fn method_name(kind: MethodKind) -> &'static str {
    match kind {
        MethodKind::Post => "Create",
        MethodKind::Put => "Update",
        MethodKind::Delete => "Delete",
        MethodKind::Get => "Get",
        MethodKind::Read => "Read",
        MethodKind::Validate => "Validate",
    }
}

/// One stage of a generated CRUD method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudStep {
    /// Run the class's `Validate` first.
    Validate,
    BuildPayload,
    Send,
    CheckTransport,
    CheckStatus,
    /// `GET`: parse the body into the caller's struct.
    ParseResponse,
    /// `READ`: hand the raw body to the caller.
    ReturnBody,
    /// Run the hook and return `Ok`.
    Succeed,
}

/// Steps of a method, in order. Empty for `VALIDATE`, which is local.
pub fn steps(kind: MethodKind, validates: bool) -> Vec<CrudStep> {
    let mut steps = Vec::new();
    if kind.http_verb().is_none() {
        return steps;
    }
    if kind.carries_payload() {
        if validates {
            steps.push(CrudStep::Validate);
        }
        steps.push(CrudStep::BuildPayload);
    }
    steps.extend([CrudStep::Send, CrudStep::CheckTransport, CrudStep::CheckStatus]);
    match kind {
        MethodKind::Get => steps.push(CrudStep::ParseResponse),
        MethodKind::Read => steps.push(CrudStep::ReturnBody),
        _ => {}
    }
    steps.push(CrudStep::Succeed);
    steps
}

/// Generates the CRUD class of a `url_class`.
pub fn generate_client(class: &UrlClass, rt: Runtime<'_>) -> EmissionBuffer {
    let name = &class.class_name;
    let mut out = EmissionBuffer::new();

    match &class.interface {
        Some(base) => out.open(format!("class {} : public {} {{", name, base)),
        None => out.open(format!("class {} {{", name)),
    }
    out.label("public:");
    out.line(format!(
        "explicit {}({}* transport) : transport_(transport) {{}}",
        name,
        rt.ty("Transport")
    ));
    out.line(format!("virtual ~{}() = default;", name));
    out.blank();

    let validates = class.has(MethodKind::Validate);
    for method in &class.methods {
        if method.kind == MethodKind::Validate {
            generate_validate(class, rt, &mut out);
        } else {
            generate_method(class, method, validates, rt, &mut out);
        }
        out.blank();
    }

    let mut seen = HashSet::new();
    let hooks: Vec<&str> = class
        .methods
        .iter()
        .filter_map(|method| method.call_back.as_deref())
        .filter(|hook| seen.insert(*hook))
        .collect();
    if !hooks.is_empty() {
        out.label("protected:");
        for hook in hooks {
            out.line(format!(
                "virtual void {}(const {}& /*data*/) {{}}",
                hook, class.record.struct_name
            ));
        }
        out.blank();
    }

    out.label("private:");
    out.append(generate_url_functions(class));
    out.blank();
    out.line(format!("{}* transport_;", rt.ty("Transport")));
    out.close("};");
    out
}

fn generate_method(
    class: &UrlClass,
    method: &Method,
    validates: bool,
    rt: Runtime<'_>,
    out: &mut EmissionBuffer,
) {
    let ty = &class.record.struct_name;
    let status = rt.status();
    // Get writes into the caller's struct, everything else reads from it
    let data = if method.kind == MethodKind::Get { "*data" } else { "data" };

    match method.kind {
        MethodKind::Get => out.open(format!("{} Get({}* data) {{", status, ty)),
        MethodKind::Read => out.open(format!(
            "{} Read(const {}& data, std::string* body) {{",
            status, ty
        )),
        kind => out.open(format!(
            "{} {}(const {}& data) {{",
            status,
            method_name(kind),
            ty
        )),
    }

    let payload = if method.kind.carries_payload() {
        "payload"
    } else {
        "std::string()"
    };

    for step in steps(method.kind, validates) {
        match step {
            CrudStep::Validate => {
                out.open(format!(
                    "if ({} status = Validate(data); !status.ok()) {{",
                    status
                ));
                out.line("return status;");
                out.close("}");
            }
            CrudStep::BuildPayload => {
                let codec = method.request_codec.as_deref().unwrap_or(&class.codec);
                out.line("std::string payload;");
                out.open(format!(
                    "if ({} status = {}::Build(data, &payload); !status.ok()) {{",
                    status, codec
                ));
                out.line("return status;");
                out.close("}");
            }
            CrudStep::Send => {
                let category = method.kind.url_category().unwrap_or(UrlCategory::Cud);
                out.line(format!(
                    "const std::string url = {}({});",
                    url_function(category),
                    data
                ));
                out.line(format!(
                    "std::unique_ptr<{}> response = transport_->Send({}, url, {});",
                    rt.ty("Response"),
                    rt.verb(method.kind).unwrap_or_default(),
                    payload
                ));
            }
            CrudStep::CheckTransport => {
                out.open("if (response == nullptr) {");
                out.line(format!("return {};", rt.transport_error("url")));
                out.close("}");
            }
            CrudStep::CheckStatus => {
                let unexpected: Vec<String> = method
                    .kind
                    .expected_codes()
                    .iter()
                    .map(|code| format!("response->code() != {}", code))
                    .collect();
                out.open(format!("if ({}) {{", unexpected.join(" && ")));
                out.line(format!("return {};", rt.http_error("response->code()")));
                out.close("}");
            }
            CrudStep::ParseResponse => {
                out.open(format!(
                    "if ({} status = {}::Parse(response->body(), data); !status.ok()) {{",
                    status, class.codec
                ));
                out.line("return status;");
                out.close("}");
            }
            CrudStep::ReturnBody => out.line("*body = response->body();"),
            CrudStep::Succeed => {
                if let Some(hook) = &method.call_back {
                    out.line(format!("{}({});", hook, data));
                }
                out.line(format!("return {};", rt.ok()));
            }
        }
    }
    out.close("}");
}

/// Generates `Validate`: the first mandatory or `validation = yes` field
/// that is not set fails with `ValidationError(key)`. Optional nested
/// records are not entered.
fn generate_validate(class: &UrlClass, rt: Runtime<'_>, out: &mut EmissionBuffer) {
    out.open(format!(
        "{} Validate(const {}& data) const {{",
        rt.status(),
        class.record.struct_name
    ));
    let mut emitter = ValidateEmitter {
        rt,
        out: EmissionBuffer::new(),
    };
    walk_members(&class.record.members, &mut emitter, &mut "data.".to_string());
    out.append(emitter.out);
    out.line(format!("return {};", rt.ok()));
    out.close("}");
}

struct ValidateEmitter<'c> {
    rt: Runtime<'c>,
    out: EmissionBuffer,
}

impl ValidateEmitter<'_> {
    fn check(&mut self, field: &Field, prefix: &str) {
        if !(field.flags.mandatory || field.flags.validation) {
            return;
        }
        if let Some(presence) = Presence::of(field, prefix, &|_: &Field| true) {
            self.out.open(format!("if ({}) {{", presence.is_unset()));
            self.out
                .line(format!("return {};", self.rt.validation_error(&field.key)));
            self.out.close("}");
        }
    }
}

impl<'t> FieldVisitor<'t> for ValidateEmitter<'_> {
    /// Struct path prefix, e.g. `data.ipam_.`.
    type Scope = String;

    fn scalar(&mut self, field: &'t Field, _kind: ScalarKind, prefix: &mut String) {
        self.check(field, prefix);
    }

    fn enter_record(&mut self, field: &'t Field, _record: &'t Record, prefix: &mut String) -> Option<String> {
        if !(field.flags.mandatory || field.flags.validation) {
            return None;
        }
        Some(format!("{}{}.", prefix, field.cpp_member()))
    }

    fn enter_sequence(
        &mut self,
        field: &'t Field,
        _sequence: &'t Sequence,
        prefix: &mut String,
    ) -> Option<String> {
        self.check(field, prefix);
        None
    }
}
