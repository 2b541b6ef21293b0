// src/engine/memory.rs
use crate::engine::{merge_tags, Context, EngineHandle, LogEngine};
use crate::level::Severity;
use crate::sinks::LoggerConfig;
use crate::utils::error::LogError;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A record as the engine received it.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRecord {
    pub logger: String,
    pub severity: Severity,
    pub fields: Context,
    pub message: String,
}

impl CapturedRecord {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

#[derive(Default)]
struct Captured {
    configs: Vec<LoggerConfig>,
    records: Vec<CapturedRecord>,
}

/// Engine that keeps every record in memory instead of writing it anywhere.
/// Sink levels are not applied: everything emitted is captured.
///
/// Clones share the same capture buffer.
#[derive(Clone, Default)]
pub struct MemoryEngine {
    captured: Arc<Mutex<Captured>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Captured> {
        self.captured.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn records(&self) -> Vec<CapturedRecord> {
        self.lock().records.clone()
    }

    pub fn records_for(&self, logger: &str) -> Vec<CapturedRecord> {
        self.lock()
            .records
            .iter()
            .filter(|r| r.logger == logger)
            .cloned()
            .collect()
    }

    /// Every config passed to `create_logger`, in call order.
    pub fn configs(&self) -> Vec<LoggerConfig> {
        self.lock().configs.clone()
    }

    pub fn clear(&self) {
        self.lock().records.clear();
    }
}

struct MemoryHandle {
    name: String,
    tags: Context,
    captured: Arc<Mutex<Captured>>,
}

impl LogEngine for MemoryEngine {
    fn create_logger(&self, config: &LoggerConfig) -> Result<Arc<dyn EngineHandle>, LogError> {
        self.lock().configs.push(config.clone());
        Ok(Arc::new(MemoryHandle {
            name: config.full_name().to_string(),
            tags: Context::new(),
            captured: Arc::clone(&self.captured),
        }))
    }
}

impl EngineHandle for MemoryHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn emit(&self, severity: Severity, fields: Context, message: &str) {
        let record = CapturedRecord {
            logger: self.name.clone(),
            severity,
            fields: merge_tags(&self.tags, fields),
            message: message.to_string(),
        };
        self.captured
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .push(record);
    }

    fn child(&self, tags: Context) -> Arc<dyn EngineHandle> {
        Arc::new(MemoryHandle {
            name: self.name.clone(),
            tags: merge_tags(&self.tags, tags),
            captured: Arc::clone(&self.captured),
        })
    }
}
