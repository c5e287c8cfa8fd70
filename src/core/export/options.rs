//! Export options derived from configuration

use crate::config::schema::ExportConfig;
use crate::domain::{ExportFormat, Result, VaultError};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Default limit on component nesting
pub const DEFAULT_MAX_COMPONENT_DEPTH: usize = 64;

/// Options steering a single run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Per-component formats to write; the archive is always written
    pub formats: BTreeSet<ExportFormat>,
    /// File extensions treated as exportable documents
    pub archive_extensions: Vec<String>,
    /// Component nesting beyond this depth is treated like a cycle
    pub max_component_depth: usize,
    /// Write one STL per body in addition to the component STL
    pub export_bodies: bool,
    /// Evaluate staleness only; write nothing
    pub dry_run: bool,
}

impl ExportOptions {
    /// Create from the export config section
    pub fn from_config(config: &ExportConfig, dry_run: bool) -> Result<Self> {
        let formats = config
            .formats
            .iter()
            .map(|name| ExportFormat::from_str(name).map_err(VaultError::Configuration))
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(Self {
            formats,
            archive_extensions: config
                .archive_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            max_component_depth: config.max_component_depth,
            export_bodies: config.export_bodies,
            dry_run,
        })
    }

    /// Whether `format` should be written
    pub fn wants(&self, format: ExportFormat) -> bool {
        format == ExportFormat::Archive || self.formats.contains(&format)
    }

    /// Whether a file with this extension is an exportable document
    pub fn is_exportable_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.archive_extensions.iter().any(|ext| *ext == extension)
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            formats: ExportFormat::SELECTABLE.into_iter().collect(),
            archive_extensions: vec!["f3d".to_string(), "f3z".to_string()],
            max_component_depth: DEFAULT_MAX_COMPONENT_DEPTH,
            export_bodies: true,
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wants_every_format() {
        let options = ExportOptions::default();
        for format in ExportFormat::SELECTABLE {
            assert!(options.wants(format));
        }
        assert!(options.wants(ExportFormat::Archive));
    }

    #[test]
    fn test_from_config_parses_formats() {
        let config = ExportConfig {
            formats: vec!["step".to_string(), "DXF".to_string()],
            archive_extensions: vec![".F3D".to_string()],
            ..ExportConfig::default()
        };
        let options = ExportOptions::from_config(&config, true).unwrap();

        assert!(options.wants(ExportFormat::Step));
        assert!(options.wants(ExportFormat::Dxf));
        assert!(!options.wants(ExportFormat::Stl));
        assert!(options.wants(ExportFormat::Archive));
        assert!(options.is_exportable_extension("f3d"));
        assert!(!options.is_exportable_extension("f3z"));
        assert!(options.dry_run);
    }

    #[test]
    fn test_from_config_rejects_unknown_format() {
        let config = ExportConfig {
            formats: vec!["obj".to_string()],
            ..ExportConfig::default()
        };
        assert!(matches!(
            ExportOptions::from_config(&config, false),
            Err(VaultError::Configuration(_))
        ));
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let options = ExportOptions::default();
        assert!(options.is_exportable_extension("F3Z"));
        assert!(!options.is_exportable_extension("pdf"));
    }
}
