// src/lib.rs
//! Role-specific loggers over a pluggable leveled-logging engine.
//!
//! A [`LoggerFactory`] resolves the console threshold once, builds each
//! logger's sinks (a daily rotating file plus stdout), asks the engine for a
//! handle tagged with the logger's variant, and records it in a
//! [`LoggerRegistry`].
//!
//! ```no_run
//! use role_logger::{LeveledLog, LoggerFactory, LoggerOptions};
//! use serde_json::json;
//!
//! let factory = LoggerFactory::from_env()?;
//! let controller = factory.controller_logger(Some(&LoggerOptions::named("orders")))?;
//! controller.success("/orders/42");
//! controller.warn(json!({"retry": 2}), "Slow upstream");
//! # Ok::<(), role_logger::LogError>(())
//! ```

pub mod config;
pub mod engine;
pub mod level;
pub mod loggers;
pub mod registry;
pub mod sinks;
pub mod utils;

pub use config::{FacadeSettings, LoggerOptions, VariantKind};
pub use engine::{EngineHandle, LogEngine, MemoryEngine, StreamEngine};
pub use level::{ExecutionMode, Severity};
pub use loggers::{
    Completion, ControllerLogger, DefaultLogger, LeveledLog, LoggerFactory, LoggerVariant, ModelLogger, Pending,
    RouteLogger, Unawaited,
};
pub use registry::LoggerRegistry;
pub use sinks::{LoggerConfig, SinkConfigBuilder, SinkSpec};
pub use utils::LogError;
