// src/engine/mod.rs
//! The leveled-logging engine the facade delegates to.
//!
//! The facade never formats or writes records itself: it hands a
//! [`LoggerConfig`] to a [`LogEngine`] and talks to the returned
//! [`EngineHandle`] from then on.

pub mod memory;
pub mod stream;

use crate::level::Severity;
use crate::sinks::LoggerConfig;
use crate::utils::error::LogError;
use serde_json::{Map, Value};
use std::sync::Arc;

pub use memory::{CapturedRecord, MemoryEngine};
pub use stream::StreamEngine;

/// Structured fields attached to a record.
pub type Context = Map<String, Value>;

/// Key that carries the variant kind on every record.
pub const VARIANT_TAG: &str = "variant";
/// Key used for non-object context values.
pub const CONTEXT_KEY: &str = "context";

pub trait LogEngine: Send + Sync {
    /// Creates a logger writing to the sinks in `config`.
    fn create_logger(&self, config: &LoggerConfig) -> Result<Arc<dyn EngineHandle>, LogError>;
}

pub trait EngineHandle: Send + Sync {
    fn name(&self) -> &str;

    fn emit(&self, severity: Severity, fields: Context, message: &str);

    /// A handle sharing this one's sinks with `tags` added to every record.
    fn child(&self, tags: Context) -> Arc<dyn EngineHandle>;

    fn flush(&self) -> Result<(), LogError> {
        Ok(())
    }
}

/// Normalizes a caller-supplied context value into record fields.
pub fn into_fields(context: Value) -> Context {
    match context {
        Value::Object(map) => map,
        Value::Null => Context::new(),
        other => {
            let mut fields = Context::new();
            fields.insert(CONTEXT_KEY.to_string(), other);
            fields
        }
    }
}

/// Merges `tags` under `fields`; caller-supplied fields win on collision.
pub(crate) fn merge_tags(tags: &Context, mut fields: Context) -> Context {
    for (key, value) in tags {
        fields.entry(key.clone()).or_insert_with(|| value.clone());
    }
    fields
}

/// One serialized log line.
///
/// Caller fields are written first and the record's own keys (`name`, `pid`,
/// `level`, `severity`, `msg`, `time`) overwrite them, so each key appears once.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub name: &'a str,
    pub pid: u32,
    pub severity: Severity,
    pub fields: &'a Context,
    pub msg: &'a str,
    pub time: String,
}

impl<'a> LogRecord<'a> {
    pub fn new(name: &'a str, severity: Severity, fields: &'a Context, msg: &'a str) -> Self {
        Self {
            name,
            pid: std::process::id(),
            severity,
            fields,
            msg,
            time: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn to_map(&self) -> Context {
        let mut map = self.fields.clone();
        map.insert("name".to_string(), Value::from(self.name));
        map.insert("pid".to_string(), Value::from(self.pid));
        map.insert("level".to_string(), Value::from(self.severity.code()));
        map.insert("severity".to_string(), Value::from(self.severity.as_str()));
        map.insert("msg".to_string(), Value::from(self.msg));
        map.insert("time".to_string(), Value::from(self.time.as_str()));
        map
    }

    pub fn to_json_line(&self) -> Result<String, LogError> {
        let mut line = serde_json::to_string(&Value::Object(self.to_map()))?;
        line.push('\n');
        Ok(line)
    }
}
