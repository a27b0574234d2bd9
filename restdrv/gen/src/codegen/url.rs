//! URL builder functions of a CRUD class.
//!
//! One private function per method category in use: `get_url` for
//! `GET`/`READ` and `get_cud_url` for `POST`/`PUT`/`DELETE`. Literal tokens
//! are appended verbatim, accessor tokens call the record's getter.

use restdrv_define::UrlCategory;

use crate::buffer::EmissionBuffer;
use crate::model::{ScalarKind, UrlClass, UrlPart, UrlTemplate, url_function};
use crate::naming::string_literal;

/// Generates the URL functions the class needs.
///
/// ## Examples
///
/// ```text
/// std::string get_cud_url(const VirtualNetwork& data) const {
///     std::string url;
///     url += "/virtual-networks/";
///     url += data.get_uuid();
///     url += "/vlan/";
///     url += std::to_string(data.get_vlan());
///     return url;
/// }
/// ```
pub fn generate_url_functions(class: &UrlClass) -> EmissionBuffer {
    let mut out = EmissionBuffer::new();
    for category in [UrlCategory::Read, UrlCategory::Cud] {
        if let Some(template) = class.url(category) {
            generate_url_function(url_function(category), template, &class.record.struct_name, &mut out);
            out.blank();
        }
    }
    out
}

fn generate_url_function(name: &str, template: &UrlTemplate, record: &str, out: &mut EmissionBuffer) {
    let uses_data = template
        .parts
        .iter()
        .any(|part| matches!(part, UrlPart::Accessor { .. }));
    let param = if uses_data { "data" } else { "/*data*/" };

    out.open(format!(
        "std::string {}(const {}& {}) const {{",
        name, record, param
    ));
    out.line("std::string url;");
    for part in &template.parts {
        let value = match part {
            UrlPart::Literal(text) => string_literal(text),
            UrlPart::Accessor {
                member,
                scalar: ScalarKind::String,
            } => format!("data.get_{}()", member),
            UrlPart::Accessor {
                member,
                scalar: ScalarKind::Int,
            } => format!("std::to_string(data.get_{}())", member),
            UrlPart::Accessor {
                member,
                scalar: ScalarKind::Bool,
            } => format!("(data.get_{}() ? \"true\" : \"false\")", member),
        };
        out.line(format!("url += {};", value));
    }
    out.line("return url;");
    out.close("}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::resolve_driver;
    use crate::model::Class;
    use crate::test_utils::{FOO_SCHEMA, SIMPLE_SCHEMA, schema_from};

    fn url_text(text: &str) -> String {
        let driver = resolve_driver(&schema_from(text)).unwrap();
        let client = driver
            .classes
            .iter()
            .find_map(|class| match class {
                Class::Url(url) => Some(url),
                Class::Parse(_) => None,
            })
            .unwrap();
        generate_url_functions(client).render()
    }

    #[test]
    fn both_categories_in_fixed_order() {
        let text = url_text(SIMPLE_SCHEMA);
        assert_eq!(
            text,
            "\
std::string get_url(const VirtualNetwork& data) const {
    std::string url;
    url += \"/virtual-network/\";
    url += data.get_uuid();
    return url;
}

std::string get_cud_url(const VirtualNetwork& data) const {
    std::string url;
    url += \"/virtual-networks/\";
    url += data.get_uuid();
    url += \"/vlan/\";
    url += std::to_string(data.get_vlan());
    return url;
}
"
        );
    }

    #[test]
    fn literal_only_template_leaves_parameter_unnamed() {
        let text = url_text(FOO_SCHEMA);
        assert!(text.starts_with("std::string get_url(const Foo& /*data*/) const {\n"));
        assert!(text.contains("url += \"/foo\";"));
        assert!(!text.contains("get_cud_url"));
    }

    #[test]
    fn bool_accessor_is_spelled_out() {
        let text = url_text(&SIMPLE_SCHEMA.replace(
            "template = value:/virtual-network/, get_abstract:uuid",
            "template = value:/vn?enabled=, get_abstract:enabled",
        ));
        assert!(text.contains("url += (data.get_enabled() ? \"true\" : \"false\");"));
    }
}
