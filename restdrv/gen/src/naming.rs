//! Naming helpers for generated C++ identifiers and literals.
//!
//! Schema node names are snake_case (`virtual_network`); generated types are
//! CamelCase (`VirtualNetwork`) unless the schema sets `struct_name`.
//!
//! ## Examples
//!
//! ```
//! use restdrv_gen::naming::{camel_case, is_identifier, string_literal};
//!
//! assert_eq!(camel_case("virtual_network"), "VirtualNetwork");
//! assert_eq!(camel_case("bgp-peer"), "BgpPeer");
//! assert!(is_identifier("uuid_"));
//! assert!(!is_identifier("class"));
//! assert_eq!(string_literal("a\"b"), r#""a\"b""#);
//! ```

/// C++ keywords that cannot be used as identifiers.
const RESERVED: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case", "catch", "char", "class",
    "const", "constexpr", "continue", "default", "delete", "do", "double", "else", "enum",
    "explicit", "export", "extern", "false", "float", "for", "friend", "goto", "if", "inline",
    "int", "long", "mutable", "namespace", "new", "noexcept", "not", "nullptr", "operator", "or",
    "private", "protected", "public", "register", "return", "short", "signed", "sizeof", "static",
    "struct", "switch", "template", "this", "throw", "true", "try", "typedef", "typename", "union",
    "unsigned", "using", "virtual", "void", "volatile", "while",
];

/// Converts a snake_case or kebab-case name into CamelCase.
///
/// Segments are split on `_` and `-`; the first character of each segment is
/// upper-cased and the rest is kept as written, so already-CamelCase input
/// passes through unchanged.
pub fn camel_case(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Returns true if `name` is a valid, non-reserved C++ identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED.contains(&name)
}

/// Returns true if every `::`-separated segment of `path` is an identifier.
pub fn is_qualified_identifier(path: &str) -> bool {
    path.split("::").all(is_identifier)
}

/// Renders `value` as a quoted C++ string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Builds the include-guard macro for a generated header.
///
/// ## Examples
///
/// ```
/// use restdrv_gen::naming::include_guard;
///
/// assert_eq!(include_guard("vnc::config", "virtual-network"), "VNC_CONFIG_VIRTUAL_NETWORK_HH_");
/// ```
pub fn include_guard(namespace: &str, source_name: &str) -> String {
    let raw = format!("{}_{}_HH_", namespace.replace("::", "_"), source_name);
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
