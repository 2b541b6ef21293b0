// src/loggers/route.rs
use crate::config::VariantKind;
use crate::loggers::{BaseLogger, LeveledLog, LoggerVariant};
use serde_json::json;

/// Logger for route-table setup.
#[derive(Clone)]
pub struct RouteLogger {
    base: BaseLogger,
}

impl RouteLogger {
    /// Records a route registration, usually during startup.
    pub fn configured(&self, methods: &[&str], url: &str) {
        self.base
            .trace(json!({ "methods": methods, "url": url }), "Configured new Route");
    }
}

impl LoggerVariant for RouteLogger {
    const KIND: VariantKind = VariantKind::Route;

    fn from_base(base: BaseLogger) -> Self {
        Self { base }
    }

    fn base(&self) -> &BaseLogger {
        &self.base
    }
}
