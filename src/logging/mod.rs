//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output at a configurable level
//! - A run log file (`output.log` in the output root by default)
//! - Text or JSON formatted file logs
//!
//! # Example
//!
//! ```no_run
//! use designvault::logging::init_logging;
//! use designvault::config::LoggingConfig;
//! use std::path::Path;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config, Some(Path::new("export/output.log")))
//!     .expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};
