// src/loggers/default.rs
use crate::config::VariantKind;
use crate::loggers::{BaseLogger, LoggerVariant};

/// General purpose logger: only the six generic severities.
#[derive(Clone)]
pub struct DefaultLogger {
    base: BaseLogger,
}

impl LoggerVariant for DefaultLogger {
    const KIND: VariantKind = VariantKind::Default;

    fn from_base(base: BaseLogger) -> Self {
        Self { base }
    }

    fn base(&self) -> &BaseLogger {
        &self.base
    }
}
