//! Output formats produced by an export run

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the artifact formats written per document, component, body or sketch
///
/// The full-document archive keeps whatever extension the host reports for the
/// latest version (`f3d`, `f3z`), so it carries no fixed extension here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Full-document archive
    Archive,
    /// STEP, per component
    Step,
    /// STL mesh, per component and per body
    Stl,
    /// IGES, per component
    Iges,
    /// DXF, per sketch
    Dxf,
}

impl ExportFormat {
    /// Formats that can be toggled in configuration, in write order
    pub const SELECTABLE: [ExportFormat; 4] = [
        ExportFormat::Step,
        ExportFormat::Stl,
        ExportFormat::Iges,
        ExportFormat::Dxf,
    ];

    /// Fixed file extension, if the format has one
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Archive => None,
            ExportFormat::Step => Some("stp"),
            ExportFormat::Stl => Some("stl"),
            ExportFormat::Iges => Some("igs"),
            ExportFormat::Dxf => Some("dxf"),
        }
    }

    /// Lowercase name used in configuration and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Archive => "archive",
            ExportFormat::Step => "step",
            ExportFormat::Stl => "stl",
            ExportFormat::Iges => "iges",
            ExportFormat::Dxf => "dxf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExportFormat::Archive => "Archive",
            ExportFormat::Step => "STEP",
            ExportFormat::Stl => "STL",
            ExportFormat::Iges => "IGES",
            ExportFormat::Dxf => "DXF",
        };
        f.write_str(label)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "archive" => Ok(ExportFormat::Archive),
            "step" | "stp" => Ok(ExportFormat::Step),
            "stl" => Ok(ExportFormat::Stl),
            "iges" | "igs" => Ok(ExportFormat::Iges),
            "dxf" => Ok(ExportFormat::Dxf),
            other => Err(format!(
                "Unknown export format '{other}'. Must be one of: step, stl, iges, dxf"
            )),
        }
    }
}
