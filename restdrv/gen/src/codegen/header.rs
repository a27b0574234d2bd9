//! File preamble and epilogue: notice, include guard, includes, namespaces.

use crate::buffer::EmissionBuffer;
use crate::config::GeneratorConfig;
use crate::model::Driver;
use crate::naming::include_guard;

/// Standard headers every generated file includes.
pub const STD_HEADERS: &[&str] = &["cstddef", "cstdint", "list", "memory", "string", "vector"];

/// Runtime headers every generated file includes, relative to the runtime
/// include directory.
pub const RUNTIME_HEADERS: &[&str] = &["json.hh", "status.hh", "transport.hh"];

/// Generates everything before the first declaration.
///
/// The notice carries no timestamp so regenerating an unchanged schema yields
/// an identical file.
///
/// ## Examples
///
/// ```text
/// // This file is automatically generated by restdrv-gen from vn.rest.
/// // Do not edit manually.
///
/// #ifndef VNC_VN_HH_
/// #define VNC_VN_HH_
///
/// #include <cstddef>
/// ...
/// #include "rest/json.hh"
/// ...
///
/// namespace vnc {
/// ```
pub fn generate_preamble(driver: &Driver, config: &GeneratorConfig) -> EmissionBuffer {
    let guard = include_guard(&driver.namespace, &driver.source_name);
    let mut out = EmissionBuffer::new();

    out.line(format!(
        "// This file is automatically generated by {} from {}.rest.",
        config.generator_name, driver.source_name
    ));
    out.line("// Do not edit manually.");
    out.blank();
    out.line(format!("#ifndef {}", guard));
    out.line(format!("#define {}", guard));
    out.blank();

    for header in STD_HEADERS {
        out.line(format!("#include <{}>", header));
    }
    out.blank();
    for header in RUNTIME_HEADERS {
        out.line(format!("#include \"{}\"", config.runtime_header(header)));
    }
    if !driver.includes.is_empty() {
        out.blank();
        for include in &driver.includes {
            out.line(format!("#include \"{}\"", include));
        }
    }
    out.blank();

    for segment in driver.namespace.split("::") {
        out.line(format!("namespace {} {{", segment));
    }
    out.blank();
    out
}

/// Generates the namespace closers and the guard footer.
pub fn generate_epilogue(driver: &Driver) -> EmissionBuffer {
    let guard = include_guard(&driver.namespace, &driver.source_name);
    let mut out = EmissionBuffer::new();

    for segment in driver.namespace.split("::").collect::<Vec<_>>().into_iter().rev() {
        out.line(format!("}}  // namespace {}", segment));
    }
    out.blank();
    out.line(format!("#endif  // {}", guard));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(namespace: &str, includes: &[&str]) -> Driver {
        Driver {
            source_name: "virtual_network".to_string(),
            namespace: namespace.to_string(),
            includes: includes.iter().map(|s| s.to_string()).collect(),
            records: vec![],
            classes: vec![],
        }
    }

    #[test]
    fn preamble_orders_includes() {
        let text = generate_preamble(&driver("vnc", &["base/logging.hh"]), &GeneratorConfig::default())
            .render();

        let std_pos = text.find("#include <vector>").unwrap();
        let rt_pos = text.find("#include \"rest/transport.hh\"").unwrap();
        let extra_pos = text.find("#include \"base/logging.hh\"").unwrap();
        assert!(std_pos < rt_pos && rt_pos < extra_pos);

        assert!(text.starts_with(
            "// This file is automatically generated by restdrv-gen from virtual_network.rest.\n"
        ));
        assert!(text.contains("#ifndef VNC_VIRTUAL_NETWORK_HH_\n#define VNC_VIRTUAL_NETWORK_HH_\n"));
        assert!(text.ends_with("namespace vnc {\n"));
    }

    #[test]
    fn nested_namespaces_open_and_close_in_order() {
        let d = driver("vnc::config", &[]);
        let open = generate_preamble(&d, &GeneratorConfig::default()).render();
        assert!(open.contains("namespace vnc {\nnamespace config {\n"));

        let close = generate_epilogue(&d).render();
        assert_eq!(
            close,
            "}  // namespace config\n}  // namespace vnc\n\n#endif  // VNC_CONFIG_VIRTUAL_NETWORK_HH_\n"
        );
    }

    #[test]
    fn runtime_include_dir_is_configurable() {
        let config = GeneratorConfig {
            runtime_include_dir: "third_party/rest".to_string(),
            ..GeneratorConfig::default()
        };
        let text = generate_preamble(&driver("vnc", &[]), &config).render();
        assert!(text.contains("#include \"third_party/rest/json.hh\"\n"));
        assert!(!text.contains("#include \"rest/json.hh\""));
    }
}
