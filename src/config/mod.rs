// src/config/mod.rs
use crate::level::{self, ExecutionMode, Severity};
use crate::sinks::SinkSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Overrides the default log directory.
pub const LOG_DIR_ENV_VAR: &str = "APP_LOG_DIR";
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// The four logger roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Default,
    Route,
    Controller,
    Model,
}

impl VariantKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariantKind::Default => "default",
            VariantKind::Route => "route",
            VariantKind::Controller => "controller",
            VariantKind::Model => "model",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied options for a single logger.
///
/// Every field is optional: a missing name becomes `"unknown"` and a missing
/// level becomes `trace` for the file sink. `streams` are kept ahead of the
/// sinks the facade adds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerOptions {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<Severity>,
    #[serde(default)]
    pub streams: Vec<SinkSpec>,
}

impl LoggerOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_stream(mut self, sink: SinkSpec) -> Self {
        self.streams.push(sink);
        self
    }
}

/// Settings shared by every logger a factory creates.
#[derive(Debug, Clone)]
pub struct FacadeSettings {
    pub log_dir: PathBuf,
    pub console_threshold: Severity,
}

impl FacadeSettings {
    /// Resolves the console threshold immediately from the given inputs.
    pub fn new<P: AsRef<Path>>(log_dir: P, mode: ExecutionMode, requested_level: Option<&str>) -> Self {
        Self {
            log_dir: log_dir.as_ref().to_path_buf(),
            console_threshold: level::resolve_console_threshold(mode, requested_level),
        }
    }

    /// Reads `APP_LOG_DIR` and uses the process-wide console threshold.
    pub fn from_env() -> Self {
        let log_dir = std::env::var(LOG_DIR_ENV_VAR).unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
        Self {
            log_dir: PathBuf::from(log_dir),
            console_threshold: level::process_console_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_deserialize_partial() {
        let options: LoggerOptions = serde_json::from_str(r#"{"name": "orders", "level": "warn"}"#).unwrap();
        assert_eq!(options.name.as_deref(), Some("orders"));
        assert_eq!(options.level, Some(Severity::Warn));
        assert!(options.streams.is_empty());

        let empty: LoggerOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, LoggerOptions::default());
    }

    #[test]
    fn test_settings_resolve_threshold() {
        let settings = FacadeSettings::new("/tmp/logs", ExecutionMode::Production, Some("nope"));
        assert_eq!(settings.console_threshold, Severity::Info);
        assert_eq!(settings.log_dir, PathBuf::from("/tmp/logs"));
    }

    #[test]
    fn test_variant_kind_names() {
        assert_eq!(VariantKind::Controller.to_string(), "controller");
        assert_eq!(serde_json::to_string(&VariantKind::Model).unwrap(), "\"model\"");
    }
}
