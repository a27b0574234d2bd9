//! Generator configuration.
//!
//! Per-file settings (namespace, extra includes) come from the schema's
//! `ROOT` section. Settings that are the same for every generated file, such
//! as where the runtime library lives, are carried by [`GeneratorConfig`].

use crate::errors::GeneratorError;
use crate::naming::is_qualified_identifier;

/// Default C++ namespace of the runtime library.
pub const DEFAULT_RUNTIME_NAMESPACE: &str = "rest";

/// Default include directory of the runtime headers.
pub const DEFAULT_RUNTIME_INCLUDE_DIR: &str = "rest";

/// Settings shared by every generated header.
///
/// ## Examples
///
/// ```
/// use restdrv_gen::config::GeneratorConfig;
///
/// let config = GeneratorConfig::default();
/// assert_eq!(config.runtime_namespace, "rest");
/// assert!(config.validate().is_ok());
///
/// let bad = GeneratorConfig {
///     runtime_namespace: "not valid".to_string(),
///     ..GeneratorConfig::default()
/// };
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Namespace of `JsonObject`, `Status`, `Transport` and friends.
    pub runtime_namespace: String,
    /// Directory prefix of `json.hh`, `status.hh` and `transport.hh`.
    pub runtime_include_dir: String,
    /// Name written into the "automatically generated" notice.
    pub generator_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_namespace: DEFAULT_RUNTIME_NAMESPACE.to_string(),
            runtime_include_dir: DEFAULT_RUNTIME_INCLUDE_DIR.to_string(),
            generator_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Checks that every value can be spliced into C++ source.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::ConfigError` naming the first bad value.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !is_qualified_identifier(&self.runtime_namespace) {
            return Err(GeneratorError::ConfigError(format!(
                "runtime namespace '{}' is not a valid C++ namespace",
                self.runtime_namespace
            )));
        }
        if self.runtime_include_dir.contains(['"', '\n', '\\']) {
            return Err(GeneratorError::ConfigError(format!(
                "runtime include directory '{}' cannot appear in an #include line",
                self.runtime_include_dir
            )));
        }
        if self.generator_name.trim().is_empty() || self.generator_name.contains('\n') {
            return Err(GeneratorError::ConfigError(
                "generator name must be a single non-empty line".to_string(),
            ));
        }
        Ok(())
    }

    /// Include path of a runtime header, e.g. `rest/json.hh`.
    pub fn runtime_header(&self, file: &str) -> String {
        let dir = self.runtime_include_dir.trim_end_matches('/');
        if dir.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", dir, file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generator_name, "restdrv-gen");
    }

    #[test]
    fn nested_runtime_namespace_is_accepted() {
        let config = GeneratorConfig {
            runtime_namespace: "vendor::rest".to_string(),
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn quote_in_include_dir_is_rejected() {
        let config = GeneratorConfig {
            runtime_include_dir: "rest\"".to_string(),
            ..GeneratorConfig::default()
        };
        match config.validate() {
            Err(GeneratorError::ConfigError(msg)) => assert!(msg.contains("include directory")),
            other => panic!("Expected ConfigError, got: {:?}", other),
        }
    }

    #[test]
    fn runtime_header_joins_paths() {
        let mut config = GeneratorConfig::default();
        assert_eq!(config.runtime_header("json.hh"), "rest/json.hh");

        config.runtime_include_dir = "third_party/rest/".to_string();
        assert_eq!(config.runtime_header("status.hh"), "third_party/rest/status.hh");

        config.runtime_include_dir = String::new();
        assert_eq!(config.runtime_header("transport.hh"), "transport.hh");
    }
}
