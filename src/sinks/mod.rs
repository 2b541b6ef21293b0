// src/sinks/mod.rs
use crate::config::{LoggerOptions, VariantKind};
use crate::level::Severity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// --- Constants ---
pub const UNKNOWN_NAME: &str = "unknown";
pub const RETAINED_FILES: usize = 3;
const LOG_FILE_EXTENSION: &str = "log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationPeriod {
    #[serde(rename = "1d")]
    Daily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    Stdout,
}

/// A destination for records, with its own minimum severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SinkSpec {
    RotatingFile {
        path: PathBuf,
        level: Severity,
        period: RotationPeriod,
        count: usize,
    },
    Console {
        level: Severity,
        destination: ConsoleTarget,
    },
}

impl SinkSpec {
    pub fn rotating_file(path: PathBuf, level: Severity) -> Self {
        SinkSpec::RotatingFile {
            path,
            level,
            period: RotationPeriod::Daily,
            count: RETAINED_FILES,
        }
    }

    pub fn console(level: Severity) -> Self {
        SinkSpec::Console {
            level,
            destination: ConsoleTarget::Stdout,
        }
    }

    pub fn level(&self) -> Severity {
        match self {
            SinkSpec::RotatingFile { level, .. } | SinkSpec::Console { level, .. } => *level,
        }
    }

    /// Whether a record at `severity` should be written to this sink.
    pub fn accepts(&self, severity: Severity) -> bool {
        severity >= self.level()
    }
}

/// Fully resolved configuration for one logger. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggerConfig {
    name: String,
    full_name: String,
    level: Severity,
    kind: VariantKind,
    sinks: Vec<SinkSpec>,
}

impl LoggerConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `name + "." + kind`; also the stem of the log file.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Minimum severity of the facade's file sink.
    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn kind(&self) -> VariantKind {
        self.kind
    }

    pub fn sinks(&self) -> &[SinkSpec] {
        &self.sinks
    }
}

/// Turns logger options into a [`LoggerConfig`] with the standard file and
/// console sinks attached.
#[derive(Debug, Clone)]
pub struct SinkConfigBuilder {
    log_dir: PathBuf,
    console_threshold: Severity,
}

impl SinkConfigBuilder {
    pub fn new<P: AsRef<Path>>(log_dir: P, console_threshold: Severity) -> Self {
        Self {
            log_dir: log_dir.as_ref().to_path_buf(),
            console_threshold,
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn console_threshold(&self) -> Severity {
        self.console_threshold
    }

    pub fn log_path(&self, full_name: &str) -> PathBuf {
        self.log_dir.join(format!("{}.{}", full_name, LOG_FILE_EXTENSION))
    }

    /// Builds a fresh config. The options are only read, so building twice
    /// from the same options yields the same sink list.
    pub fn build(&self, kind: VariantKind, options: Option<&LoggerOptions>) -> LoggerConfig {
        let base = options.cloned().unwrap_or_default();

        let name = base.name.unwrap_or_else(|| UNKNOWN_NAME.to_string());
        // File sinks capture everything unless told otherwise
        let level = base.level.unwrap_or(Severity::Trace);
        let full_name = format!("{}.{}", name, kind);

        let mut sinks = base.streams;
        sinks.push(SinkSpec::rotating_file(self.log_path(&full_name), level));
        // Console verbosity is never taken from per-logger options
        sinks.push(SinkSpec::console(self.console_threshold));

        LoggerConfig {
            name,
            full_name,
            level,
            kind,
            sinks,
        }
    }
}
