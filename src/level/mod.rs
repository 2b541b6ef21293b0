// src/level/mod.rs
use crate::utils::error::LogError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Environment Variables ---
/// Selects production mode when equal to [`PRODUCTION`].
pub const MODE_ENV_VAR: &str = "APP_ENV";
/// Requested console level, one of the six severity tokens.
pub const LEVEL_ENV_VAR: &str = "APP_LOG_LEVEL";
pub const PRODUCTION: &str = "production";

/// Ordered log severity. Comparison follows `trace < debug < ... < fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    /// Numeric code written into records (10 for trace up to 60 for fatal).
    pub fn code(self) -> u8 {
        match self {
            Severity::Trace => 10,
            Severity::Debug => 20,
            Severity::Info => 30,
            Severity::Warn => 40,
            Severity::Error => 50,
            Severity::Fatal => 60,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    /// Case-sensitive: only the exact lowercase tokens are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| LogError::UnknownSeverity(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Production,
    Development,
}

impl ExecutionMode {
    /// Anything other than the exact `production` marker is development.
    pub fn from_marker(value: Option<&str>) -> Self {
        match value {
            Some(PRODUCTION) => ExecutionMode::Production,
            _ => ExecutionMode::Development,
        }
    }

    pub fn from_env() -> Self {
        Self::from_marker(std::env::var(MODE_ENV_VAR).ok().as_deref())
    }
}

/// Resolves the console threshold from the execution mode and the requested
/// level string. Invalid or absent levels fall back silently: `info` in
/// production, `trace` everywhere else.
pub fn resolve_console_threshold(mode: ExecutionMode, requested: Option<&str>) -> Severity {
    let valid = requested.and_then(|token| token.parse::<Severity>().ok());

    match (mode, valid) {
        (_, Some(level)) => level,
        (ExecutionMode::Production, None) => Severity::Info,
        (ExecutionMode::Development, None) => Severity::Trace,
    }
}

// Read once from the environment, on first use.
static PROCESS_CONSOLE_THRESHOLD: Lazy<Severity> = Lazy::new(|| {
    let requested = std::env::var(LEVEL_ENV_VAR).ok();
    let threshold = resolve_console_threshold(ExecutionMode::from_env(), requested.as_deref());
    tracing::debug!("Resolved process console threshold: {}", threshold);
    threshold
});

/// The environment-derived console threshold. Computed once per process;
/// later changes to the environment are not observed.
pub fn process_console_threshold() -> Severity {
    *PROCESS_CONSOLE_THRESHOLD
}
