// src/loggers/factory.rs
use crate::config::{FacadeSettings, LoggerOptions, VariantKind};
use crate::engine::{Context, LogEngine, StreamEngine, VARIANT_TAG};
use crate::level::Severity;
use crate::loggers::{BaseLogger, ControllerLogger, DefaultLogger, LoggerVariant, ModelLogger, RouteLogger};
use crate::registry::LoggerRegistry;
use crate::sinks::{LoggerConfig, SinkConfigBuilder};
use crate::utils::error::LogError;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Composition root: owns the sink builder, the engine and the registry.
///
/// The console threshold is fixed when the factory is created and shared by
/// every logger it produces.
pub struct LoggerFactory {
    builder: SinkConfigBuilder,
    engine: Arc<dyn LogEngine>,
    registry: Arc<LoggerRegistry>,
}

impl LoggerFactory {
    /// Creates the log directory if it doesn't exist. Failure here is meant
    /// to stop the caller's startup.
    pub fn new(settings: &FacadeSettings, engine: Arc<dyn LogEngine>) -> Result<Self, LogError> {
        prepare_log_dir(&settings.log_dir)?;

        tracing::debug!(
            "Logger factory ready (dir: {}, console threshold: {})",
            settings.log_dir.display(),
            settings.console_threshold
        );

        Ok(Self {
            builder: SinkConfigBuilder::new(&settings.log_dir, settings.console_threshold),
            engine,
            registry: Arc::new(LoggerRegistry::new()),
        })
    }

    /// Environment settings, the process-wide console threshold and the
    /// file/stdout engine.
    pub fn from_env() -> Result<Self, LogError> {
        Self::new(&FacadeSettings::from_env(), Arc::new(StreamEngine::new()))
    }

    pub fn registry(&self) -> Arc<LoggerRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn console_threshold(&self) -> Severity {
        self.builder.console_threshold()
    }

    pub fn log_dir(&self) -> &Path {
        self.builder.log_dir()
    }

    /// The config a logger of `kind` would be created with.
    pub fn config_for(&self, kind: VariantKind, options: Option<&LoggerOptions>) -> LoggerConfig {
        self.builder.build(kind, options)
    }

    /// Creates, tags and registers a logger of variant `V`.
    pub fn create<V: LoggerVariant>(&self, options: Option<&LoggerOptions>) -> Result<V, LogError> {
        let config = self.builder.build(V::KIND, options);
        let root = self.engine.create_logger(&config)?;

        let mut tags = Context::new();
        tags.insert(VARIANT_TAG.to_string(), Value::String(V::KIND.as_str().to_string()));
        let handle = root.child(tags);

        self.registry.register(config.full_name(), V::KIND, Arc::clone(&handle));

        Ok(V::from_base(BaseLogger::new(config.full_name(), V::KIND, handle)))
    }

    pub fn default_logger(&self, options: Option<&LoggerOptions>) -> Result<DefaultLogger, LogError> {
        self.create(options)
    }

    pub fn route_logger(&self, options: Option<&LoggerOptions>) -> Result<RouteLogger, LogError> {
        self.create(options)
    }

    pub fn controller_logger(&self, options: Option<&LoggerOptions>) -> Result<ControllerLogger, LogError> {
        self.create(options)
    }

    pub fn model_logger(&self, options: Option<&LoggerOptions>) -> Result<ModelLogger, LogError> {
        self.create(options)
    }
}

fn prepare_log_dir(path: &Path) -> Result<(), LogError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|source| LogError::LogDirectory {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Created log directory {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use crate::level::ExecutionMode;
    use crate::loggers::test_support::memory_factory;
    use crate::loggers::{LeveledLog, LoggerVariant};
    use crate::sinks::SinkSpec;
    use serde_json::json;

    #[test]
    fn test_creates_missing_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");
        let settings = FacadeSettings::new(&log_dir, ExecutionMode::Production, Some("warn"));

        let factory = LoggerFactory::new(&settings, Arc::new(MemoryEngine::new())).unwrap();
        assert!(log_dir.is_dir());
        assert_eq!(factory.console_threshold(), Severity::Warn);
    }

    #[test]
    fn test_uncreatable_log_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let settings = FacadeSettings::new(blocker.join("logs"), ExecutionMode::Development, None);

        let result = LoggerFactory::new(&settings, Arc::new(MemoryEngine::new()));
        assert!(matches!(result, Err(LogError::LogDirectory { .. })));
    }

    #[test]
    fn test_each_construction_registers_once() {
        let (factory, _engine, _dir) = memory_factory();
        let options = LoggerOptions::named("orders");

        factory.default_logger(Some(&options)).unwrap();
        factory.route_logger(Some(&options)).unwrap();
        factory.controller_logger(Some(&options)).unwrap();
        factory.model_logger(Some(&options)).unwrap();
        factory.model_logger(Some(&options)).unwrap();

        let registry = factory.registry();
        assert_eq!(registry.len(), 5);
        assert_eq!(
            registry.names(),
            vec!["orders.default", "orders.route", "orders.controller", "orders.model", "orders.model"]
        );
    }

    #[test]
    fn test_engine_receives_standard_sinks() {
        let (factory, engine, dir) = memory_factory();
        let logger = factory.controller_logger(Some(&LoggerOptions::named("orders"))).unwrap();
        assert_eq!(logger.full_name(), "orders.controller");

        let configs = engine.configs();
        assert_eq!(configs.len(), 1);
        assert_eq!(
            configs[0].sinks(),
            &[
                SinkSpec::rotating_file(dir.path().join("orders.controller.log"), Severity::Trace),
                SinkSpec::console(factory.console_threshold()),
            ]
        );
    }

    #[test]
    fn test_console_threshold_shared_by_all_loggers() {
        let (factory, engine, _dir) = memory_factory();
        factory.route_logger(Some(&LoggerOptions::named("a").with_level(Severity::Fatal))).unwrap();
        factory.model_logger(None).unwrap();

        for config in engine.configs() {
            assert_eq!(config.sinks().last(), Some(&SinkSpec::console(Severity::Trace)));
        }
    }

    #[test]
    fn test_records_carry_variant_tag() {
        let (factory, engine, _dir) = memory_factory();
        let route = factory.route_logger(Some(&LoggerOptions::named("api"))).unwrap();
        let model = factory.model_logger(Some(&LoggerOptions::named("api"))).unwrap();

        route.info(json!({}), "from route");
        model.info(json!({}), "from model");

        assert_eq!(engine.records_for("api.route")[0].field("variant"), Some(&json!("route")));
        assert_eq!(engine.records_for("api.model")[0].field("variant"), Some(&json!("model")));
    }

    #[test]
    fn test_stream_engine_writes_distinct_files_per_variant() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FacadeSettings::new(dir.path(), ExecutionMode::Production, Some("fatal"));
        let factory = LoggerFactory::new(&settings, Arc::new(StreamEngine::new())).unwrap();
        let options = LoggerOptions::named("orders");

        let route = factory.route_logger(Some(&options)).unwrap();
        let controller = factory.controller_logger(Some(&options)).unwrap();
        route.configured(&["GET"], "/orders");
        controller.success("/orders");
        tokio_test::assert_ok!(factory.registry().flush_all());

        let mut stems: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(".log"))
            .map(|name| name.split('.').take(2).collect::<Vec<_>>().join("."))
            .collect();
        stems.sort();
        assert_eq!(stems, vec!["orders.controller", "orders.route"]);
    }
}
