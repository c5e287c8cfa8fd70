//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX so they do
//! not interfere with each other.

use designvault::config::{load_config, LogFormat};
use designvault::core::export::ExportOptions;
use designvault::domain::{ExportFormat, VaultError};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for var in [
        "DESIGNVAULT_APPLICATION_LOG_LEVEL",
        "DESIGNVAULT_APPLICATION_DRY_RUN",
        "DESIGNVAULT_EXPORT_OUTPUT_ROOT",
        "DESIGNVAULT_EXPORT_FORMATS",
        "DESIGNVAULT_EXPORT_ARCHIVE_EXTENSIONS",
        "DESIGNVAULT_EXPORT_MAX_COMPONENT_DEPTH",
        "DESIGNVAULT_EXPORT_EXPORT_BODIES",
        "DESIGNVAULT_SOURCE_MANIFEST",
        "DESIGNVAULT_LOGGING_LOCAL_ENABLED",
        "DESIGNVAULT_LOGGING_LOCAL_PATH",
        "DESIGNVAULT_LOGGING_LOCAL_FORMAT",
        "TEST_VAULT_ROOT",
    ] {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

const COMPLETE_CONFIG: &str = r#"
[application]
log_level = "debug"
dry_run = true

[export]
output_root = "/srv/vault"
formats = ["step", "dxf"]
archive_extensions = ["f3d"]
max_component_depth = 16
export_bodies = false

[source]
manifest = "vault.json"

[logging]
local_enabled = true
local_path = "/var/log/designvault/output.log"
local_format = "json"
"#;

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(COMPLETE_CONFIG);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.export.output_root, Path::new("/srv/vault"));
    assert_eq!(config.export.formats, vec!["step", "dxf"]);
    assert_eq!(config.export.max_component_depth, 16);
    assert!(!config.export.export_bodies);
    assert_eq!(config.source.manifest.as_deref(), Some(Path::new("vault.json")));
    assert_eq!(config.logging.local_format, LogFormat::Json);
    assert_eq!(
        config.log_file_path(),
        Path::new("/var/log/designvault/output.log")
    );

    let options = ExportOptions::from_config(&config.export, config.application.dry_run).unwrap();
    assert!(options.wants(ExportFormat::Step));
    assert!(options.wants(ExportFormat::Dxf));
    assert!(!options.wants(ExportFormat::Stl));
    assert!(options.is_exportable_extension("f3d"));
    assert!(!options.is_exportable_extension("f3z"));
    assert!(options.dry_run);
}

#[test]
fn test_minimal_config_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[application]\nlog_level = \"info\"\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.export.output_root, Path::new("./export"));
    assert_eq!(config.export.formats.len(), 4);
    assert_eq!(config.export.archive_extensions, vec!["f3d", "f3z"]);
    assert_eq!(config.export.max_component_depth, 64);
    assert!(config.export.export_bodies);
    assert!(config.logging.local_enabled);
    assert_eq!(config.log_file_path(), Path::new("./export/output.log"));
}

#[test]
fn test_env_overrides() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("DESIGNVAULT_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("DESIGNVAULT_EXPORT_OUTPUT_ROOT", "/mnt/backup");
    std::env::set_var("DESIGNVAULT_EXPORT_FORMATS", "stl, iges");
    std::env::set_var("DESIGNVAULT_EXPORT_MAX_COMPONENT_DEPTH", "8");
    std::env::set_var("DESIGNVAULT_SOURCE_MANIFEST", "/etc/designvault/vault.json");
    std::env::set_var("DESIGNVAULT_LOGGING_LOCAL_FORMAT", "text");

    let file = write_config(COMPLETE_CONFIG);
    let result = load_config(file.path());
    cleanup_env_vars();
    let config = result.unwrap();

    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.export.output_root, Path::new("/mnt/backup"));
    assert_eq!(config.export.formats, vec!["stl", "iges"]);
    assert_eq!(config.export.max_component_depth, 8);
    assert_eq!(
        config.source.manifest.as_deref(),
        Some(Path::new("/etc/designvault/vault.json"))
    );
    assert_eq!(config.logging.local_format, LogFormat::Text);
}

#[test]
fn test_invalid_env_override_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("DESIGNVAULT_EXPORT_MAX_COMPONENT_DEPTH", "deep");
    let file = write_config(COMPLETE_CONFIG);
    let result = load_config(file.path());
    cleanup_env_vars();

    assert!(matches!(result, Err(VaultError::Configuration(_))));
}

#[test]
fn test_env_override_is_validated() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("DESIGNVAULT_EXPORT_FORMATS", "step,obj");
    let file = write_config(COMPLETE_CONFIG);
    let result = load_config(file.path());
    cleanup_env_vars();

    match result {
        Err(VaultError::Configuration(message)) => assert!(message.contains("obj")),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_env_var_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("TEST_VAULT_ROOT", "/data/designs");
    let file = write_config(
        r#"
# Root comes from ${TEST_VAULT_ROOT}
[export]
output_root = "${TEST_VAULT_ROOT}/mirror"
"#,
    );
    let result = load_config(file.path());
    cleanup_env_vars();

    assert_eq!(
        result.unwrap().export.output_root,
        Path::new("/data/designs/mirror")
    );
}

#[test]
fn test_missing_substitution_variable() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[export]\noutput_root = \"${TEST_VAULT_ROOT}\"\n");
    let result = load_config(file.path());

    match result {
        Err(VaultError::Configuration(message)) => {
            assert!(message.contains("TEST_VAULT_ROOT"));
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_invalid_values_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    for content in [
        "[application]\nlog_level = \"loud\"\n",
        "[export]\nformats = [\"archive\"]\n",
        "[export]\nmax_component_depth = 0\n",
        "[export]\narchive_extensions = []\n",
        "[logging]\nlocal_format = \"xml\"\n",
    ] {
        let file = write_config(content);
        assert!(
            matches!(load_config(file.path()), Err(VaultError::Configuration(_))),
            "accepted: {content}"
        );
    }
}
