//! Codec classes generated for `parse_class` nodes.

use crate::buffer::EmissionBuffer;
use crate::codegen::build::generate_build;
use crate::codegen::parse::generate_parse;
use crate::codegen::runtime::Runtime;
use crate::model::ParseClass;

/// Generates the codec class of a `parse_class`.
///
/// `Parse` overloads are emitted unless `parse_support = no`, `Build`
/// overloads unless `build_support = no`. Sequence helpers are private.
///
/// ## Examples
///
/// ```text
/// class VnCodec {
/// public:
///     static rest::Status Parse(const std::string& body, VirtualNetwork* dst) { ... }
///     static rest::Status Parse(const rest::JsonObject& doc, VirtualNetwork* dst) { ... }
///     static rest::Status Build(const VirtualNetwork& src, std::string* payload) { ... }
///     static rest::Status Build(const VirtualNetwork& src, rest::JsonObject* doc) { ... }
///
/// private:
///     static rest::Status parse_prefixes(...) { ... }
///     static rest::Status build_prefixes(...) { ... }
/// };
/// ```
pub fn generate_codec(class: &ParseClass, rt: Runtime<'_>) -> EmissionBuffer {
    let mut public = EmissionBuffer::new();
    let mut private = EmissionBuffer::new();

    if class.parse {
        let parse = generate_parse(class, rt);
        public.append(parse.public);
        public.blank();
        private.append(parse.helpers);
        private.blank();
    }
    if class.build {
        let build = generate_build(class, rt);
        public.append(build.public);
        private.append(build.helpers);
    }

    let mut out = EmissionBuffer::new();
    out.open(format!("class {} {{", class.class_name));
    out.label("public:");
    out.append(public);
    if !private.is_empty() {
        out.blank();
        out.label("private:");
        out.append(private);
    }
    out.close("};");
    out
}
