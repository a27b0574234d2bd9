//! Final assembly and file writing.
//!
//! Generation is all-or-nothing: the driver is resolved and validated before
//! anything is emitted, the header is rendered in memory, and only then
//! written in one atomic step.

use std::fs;
use std::path::{Path, PathBuf};

use restdrv_define::Schema;
use tracing::{debug, info};

use crate::classes::resolve_driver;
use crate::codegen::generate_header;
use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::validation::validate_driver;

/// Extension of the generated header.
pub const HEADER_EXTENSION: &str = "hh";

/// Generates the header text of a schema.
///
/// ## Errors
///
/// Returns the first configuration, resolution or validation error. See
/// [`GeneratorError`] for the full list.
pub fn generate(schema: &Schema, config: &GeneratorConfig) -> Result<String, GeneratorError> {
    config.validate()?;

    let driver = resolve_driver(schema)?;
    debug!(
        records = driver.records.len(),
        classes = driver.classes.len(),
        "resolved driver"
    );
    validate_driver(&driver)?;

    let header = generate_header(&driver, config).render();
    info!(
        source = %driver.source_name,
        bytes = header.len(),
        "generated header"
    );
    Ok(header)
}

/// Path of the header generated for `source_name` under `output_dir`.
pub fn output_path(output_dir: &Path, source_name: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", source_name, HEADER_EXTENSION))
}

/// Writes `content` to `path` through a temporary file and a rename, so a
/// reader never sees a partial header.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` naming the path that failed.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension(format!("{}.tmp", HEADER_EXTENSION));
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        GeneratorError::WriteError {
            path: path.display().to_string(),
            source: e,
        }
    })
}

/// Loads a schema file, generates its header and writes it to
/// `<output_dir>/<source>.hh`.
///
/// ## Arguments
///
/// * `schema_path` - The `.rest` file to read
/// * `output_dir` - Directory the header is written to
/// * `config` - Runtime library names and generator identity
/// * `dry_run` - If true, print the header instead of writing it
///
/// ## Returns
///
/// The generated header text.
///
/// ## Errors
///
/// Returns an error if the schema cannot be read, fails validation, or the
/// header cannot be written. On error no file is created or changed.
pub fn generate_and_write(
    schema_path: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
    dry_run: bool,
) -> Result<String, GeneratorError> {
    let schema = Schema::load(schema_path)?;
    debug!(path = %schema_path.display(), nodes = schema.nodes().count(), "loaded schema");

    let header = generate(&schema, config)?;

    if dry_run {
        print!("{}", header);
    } else {
        let path = output_path(output_dir, schema.source_name());
        write_atomic(&path, &header)?;
        info!(path = %path.display(), "wrote header");
    }

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FOO_SCHEMA, SIMPLE_SCHEMA, schema_from};
    use tempfile::TempDir;

    // === generate tests ===

    #[test]
    fn generate_produces_complete_header() {
        let header = generate(&schema_from(SIMPLE_SCHEMA), &GeneratorConfig::default()).unwrap();
        assert!(header.starts_with("// This file is automatically generated by restdrv-gen"));
        assert!(header.contains("class VirtualNetworkClient : public driver::ResourceClient {"));
        assert!(header.ends_with("#endif  // VNC_CONFIG_TEST_SCHEMA_HH_\n"));
    }

    #[test]
    fn generate_rejects_invalid_config_first() {
        let config = GeneratorConfig {
            runtime_namespace: "not a namespace".to_string(),
            ..GeneratorConfig::default()
        };
        let err = generate(&schema_from(FOO_SCHEMA), &config).unwrap_err();
        assert!(matches!(err, GeneratorError::ConfigError(_)));
    }

    #[test]
    fn generate_runs_validation() {
        let schema = schema_from(&FOO_SCHEMA.replace("[ROOT]\n", "[ROOT]\nnamespace = vnc::1st\n"));
        let err = generate(&schema, &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidIdentifier { .. }), "{err:?}");
    }

    // === write_atomic tests ===

    #[test]
    fn write_atomic_creates_file_and_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/deep/foo.hh");

        write_atomic(&path, "// header\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "// header\n");
        assert!(!path.with_extension("hh.tmp").exists());
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("foo.hh");
        fs::write(&path, "// old\n").unwrap();

        write_atomic(&path, "// new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "// new\n");
    }

    #[test]
    fn write_atomic_reports_failing_path() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = write_atomic(&blocker.join("foo.hh"), "x").unwrap_err();
        match err {
            GeneratorError::WriteError { path, .. } => assert!(path.contains("blocker")),
            other => panic!("expected WriteError, got {other:?}"),
        }
    }

    // === generate_and_write tests ===

    #[test]
    fn writes_header_named_after_schema() {
        let temp_dir = TempDir::new().unwrap();
        let schema_path = temp_dir.path().join("foo.rest");
        fs::write(&schema_path, FOO_SCHEMA).unwrap();
        let out_dir = temp_dir.path().join("out");

        let header =
            generate_and_write(&schema_path, &out_dir, &GeneratorConfig::default(), false).unwrap();

        let written = fs::read_to_string(out_dir.join("foo.hh")).unwrap();
        assert_eq!(written, header);
        assert!(written.contains("#ifndef FOO_FOO_HH_"));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let schema_path = temp_dir.path().join("foo.rest");
        fs::write(&schema_path, FOO_SCHEMA).unwrap();
        let out_dir = temp_dir.path().join("out");

        generate_and_write(&schema_path, &out_dir, &GeneratorConfig::default(), true).unwrap();

        assert!(!out_dir.exists());
    }

    #[test]
    fn failed_generation_leaves_existing_header_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let schema_path = temp_dir.path().join("foo.rest");
        fs::write(&schema_path, FOO_SCHEMA.replace("url = foo_url", "url = nowhere")).unwrap();
        let existing = output_path(temp_dir.path(), "foo");
        fs::write(&existing, "// previous\n").unwrap();

        let result =
            generate_and_write(&schema_path, temp_dir.path(), &GeneratorConfig::default(), false);

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&existing).unwrap(), "// previous\n");
    }

    #[test]
    fn missing_schema_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = generate_and_write(
            &temp_dir.path().join("absent.rest"),
            temp_dir.path(),
            &GeneratorConfig::default(),
            true,
        );
        assert!(matches!(result, Err(GeneratorError::Schema(_))));
    }
}
