//! C++ expressions referring to the runtime library.
//!
//! Generated code only talks to the runtime through `JsonObject`,
//! `JsonArray`, `Status`, `Transport`, `Response` and `Verb`, qualified with
//! the configured runtime namespace.

use restdrv_define::MethodKind;

use crate::config::GeneratorConfig;
use crate::naming::string_literal;

/// Spells runtime types and `Status` factories.
///
/// ## Examples
///
/// ```
/// use restdrv_gen::codegen::runtime::Runtime;
/// use restdrv_gen::config::GeneratorConfig;
///
/// let config = GeneratorConfig::default();
/// let rt = Runtime::new(&config);
/// assert_eq!(rt.ty("JsonObject"), "rest::JsonObject");
/// assert_eq!(rt.parse_error("bar", None), "rest::Status::ParseError(\"bar\")");
/// assert_eq!(rt.parse_error("ip", Some("i")), "rest::Status::ParseError(\"ip\", i)");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Runtime<'c> {
    namespace: &'c str,
}

impl<'c> Runtime<'c> {
    pub fn new(config: &'c GeneratorConfig) -> Self {
        Self {
            namespace: &config.runtime_namespace,
        }
    }

    /// A runtime type, e.g. `rest::JsonObject`.
    pub fn ty(&self, name: &str) -> String {
        format!("{}::{}", self.namespace, name)
    }

    /// The status type.
    pub fn status(&self) -> String {
        self.ty("Status")
    }

    fn factory(&self, name: &str, args: &[String]) -> String {
        format!("{}::{}({})", self.status(), name, args.join(", "))
    }

    fn keyed(&self, name: &str, key: &str, index: Option<&str>) -> String {
        let mut args = vec![string_literal(key)];
        args.extend(index.map(str::to_string));
        self.factory(name, &args)
    }

    pub fn ok(&self) -> String {
        self.factory("Ok", &[])
    }

    pub fn parse_error(&self, key: &str, index: Option<&str>) -> String {
        self.keyed("ParseError", key, index)
    }

    pub fn node_missing(&self, key: &str) -> String {
        self.keyed("NodeMissing", key, None)
    }

    pub fn build_error(&self, key: &str, index: Option<&str>) -> String {
        self.keyed("BuildError", key, index)
    }

    pub fn validation_error(&self, key: &str) -> String {
        self.keyed("ValidationError", key, None)
    }

    /// `TransportError` for the URL held in variable `url`.
    pub fn transport_error(&self, url: &str) -> String {
        self.factory("TransportError", &[url.to_string()])
    }

    /// `HttpError` for the code produced by expression `code`.
    pub fn http_error(&self, code: &str) -> String {
        self.factory("HttpError", &[code.to_string()])
    }

    /// The `Verb` enumerator of a method, `None` for local-only methods.
    pub fn verb(&self, kind: MethodKind) -> Option<String> {
        let verb = kind.http_verb()?;
        let mut chars = verb.chars();
        let name: String = chars
            .next()
            .into_iter()
            .chain(chars.flat_map(char::to_lowercase))
            .collect();
        Some(format!("{}::Verb::k{}", self.namespace, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factories_quote_keys() {
        let config = GeneratorConfig::default();
        let rt = Runtime::new(&config);
        assert_eq!(rt.ok(), "rest::Status::Ok()");
        assert_eq!(rt.node_missing("ipam"), "rest::Status::NodeMissing(\"ipam\")");
        assert_eq!(rt.build_error("a\"b", None), "rest::Status::BuildError(\"a\\\"b\")");
        assert_eq!(rt.build_error("ip", Some("i")), "rest::Status::BuildError(\"ip\", i)");
        assert_eq!(rt.validation_error("vlan"), "rest::Status::ValidationError(\"vlan\")");
        assert_eq!(rt.transport_error("url"), "rest::Status::TransportError(url)");
        assert_eq!(
            rt.http_error("response->code()"),
            "rest::Status::HttpError(response->code())"
        );
    }

    #[test]
    fn verbs_follow_method_kind() {
        let config = GeneratorConfig::default();
        let rt = Runtime::new(&config);
        assert_eq!(rt.verb(MethodKind::Post).as_deref(), Some("rest::Verb::kPost"));
        assert_eq!(rt.verb(MethodKind::Read).as_deref(), Some("rest::Verb::kGet"));
        assert_eq!(rt.verb(MethodKind::Delete).as_deref(), Some("rest::Verb::kDelete"));
        assert_eq!(rt.verb(MethodKind::Validate), None);
    }

    #[test]
    fn custom_namespace_is_used() {
        let config = GeneratorConfig {
            runtime_namespace: "vendor::http".to_string(),
            ..GeneratorConfig::default()
        };
        let rt = Runtime::new(&config);
        assert_eq!(rt.ty("Transport"), "vendor::http::Transport");
        assert_eq!(rt.verb(MethodKind::Put).as_deref(), Some("vendor::http::Verb::kPut"));
    }
}
