// src/loggers/controller.rs
use crate::config::VariantKind;
use crate::loggers::{BaseLogger, LeveledLog, LoggerVariant};
use serde_json::json;

/// Logger for request handlers.
///
/// The failed-request helper is `failed_request` rather than `error`, so the
/// generic `error(context, message)` stays usable on this logger.
#[derive(Clone)]
pub struct ControllerLogger {
    base: BaseLogger,
}

impl ControllerLogger {
    pub fn success(&self, url: &str) {
        self.base.debug(json!({ "url": url }), "Processed a successful request");
    }

    pub fn failed_request(&self, url: &str) {
        self.base.error(json!({ "url": url }), "Processed a failed request");
    }

    pub fn conflict(&self, url: &str) {
        self.base.error(json!({ "url": url }), "Processed a conflict request");
    }
}

impl LoggerVariant for ControllerLogger {
    const KIND: VariantKind = VariantKind::Controller;

    fn from_base(base: BaseLogger) -> Self {
        Self { base }
    }

    fn base(&self) -> &BaseLogger {
        &self.base
    }
}
