// src/loggers/mod.rs
pub mod completion;
pub mod controller;
pub mod default;
pub mod factory;
pub mod model;
pub mod route;

use crate::config::VariantKind;
use crate::engine::{into_fields, EngineHandle};
use crate::level::Severity;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

// Re-export the logger types for convenience
pub use completion::{Completion, NotAttached, Pending, Unawaited};
pub use controller::ControllerLogger;
pub use default::DefaultLogger;
pub use factory::LoggerFactory;
pub use model::ModelLogger;
pub use route::RouteLogger;

/// The six-severity logging capability every logger exposes.
///
/// `context` is merged into the record when it is a JSON object; `null` adds
/// nothing and any other value is stored under the `context` key.
pub trait LeveledLog {
    fn log(&self, severity: Severity, context: Value, message: &str);

    fn trace(&self, context: Value, message: &str) {
        self.log(Severity::Trace, context, message)
    }

    fn debug(&self, context: Value, message: &str) {
        self.log(Severity::Debug, context, message)
    }

    fn info(&self, context: Value, message: &str) {
        self.log(Severity::Info, context, message)
    }

    fn warn(&self, context: Value, message: &str) {
        self.log(Severity::Warn, context, message)
    }

    fn error(&self, context: Value, message: &str) {
        self.log(Severity::Error, context, message)
    }

    fn fatal(&self, context: Value, message: &str) {
        self.log(Severity::Fatal, context, message)
    }
}

/// Engine handle already tagged with its variant kind.
#[derive(Clone)]
pub struct BaseLogger {
    full_name: Arc<str>,
    kind: VariantKind,
    handle: Arc<dyn EngineHandle>,
}

impl BaseLogger {
    pub(crate) fn new(full_name: &str, kind: VariantKind, handle: Arc<dyn EngineHandle>) -> Self {
        Self {
            full_name: Arc::from(full_name),
            kind,
            handle,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn kind(&self) -> VariantKind {
        self.kind
    }

    pub fn handle(&self) -> &Arc<dyn EngineHandle> {
        &self.handle
    }
}

impl LeveledLog for BaseLogger {
    fn log(&self, severity: Severity, context: Value, message: &str) {
        self.handle.emit(severity, into_fields(context), message);
    }
}

/// A role-specific logger built on top of a [`BaseLogger`].
pub trait LoggerVariant: Sized {
    const KIND: VariantKind;

    fn from_base(base: BaseLogger) -> Self;

    fn base(&self) -> &BaseLogger;

    fn full_name(&self) -> &str {
        self.base().full_name()
    }
}

impl<V: LoggerVariant> LeveledLog for V {
    fn log(&self, severity: Severity, context: Value, message: &str) {
        self.base().log(severity, context, message)
    }
}

/// Converts a caller value into a context field. Never fails: values that
/// cannot be serialized are replaced by a description of the error.
pub(crate) fn to_field<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| Value::String(format!("<unserializable: {}>", e)))
}
