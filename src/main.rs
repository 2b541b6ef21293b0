// src/main.rs
use clap::Parser;
use role_logger::config::FacadeSettings;
use role_logger::utils::logging::setup_logging;
use role_logger::{LeveledLog, LogError, LoggerFactory, LoggerOptions, LoggerVariant, Pending, Severity, StreamEngine, Unawaited};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Creates one logger of each role and exercises it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base name shared by the four loggers
    #[arg(short, long, default_value = "demo")]
    name: String,

    /// Minimum severity written to the log files (trace, debug, info, warn, error, fatal)
    #[arg(short, long)]
    file_level: Option<Severity>,

    /// Log directory (overrides APP_LOG_DIR)
    #[arg(short, long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), LogError> {
    // 1. Setup diagnostics (reads RUST_LOG env var)
    setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting demo for args: {:?}", args);

    // 3. Build the factory; an unusable log directory stops us here
    let mut settings = FacadeSettings::from_env();
    if let Some(dir) = &args.log_dir {
        settings.log_dir = dir.into();
    }
    let factory = LoggerFactory::new(&settings, Arc::new(StreamEngine::new()))?;
    tracing::info!(
        "Console threshold: {}, log directory: {}",
        factory.console_threshold(),
        factory.log_dir().display()
    );

    let mut options = LoggerOptions::named(&args.name);
    options.level = args.file_level;

    // 4. One logger per role
    let app = factory.default_logger(Some(&options))?;
    let routes = factory.route_logger(Some(&options))?;
    let controller = factory.controller_logger(Some(&options))?;
    let model = factory.model_logger(Some(&options))?;

    app.info(json!({"pid": std::process::id()}), "Demo started");

    routes.configured(&["GET"], "/users/:id");
    routes.configured(&["POST", "PUT"], "/users");

    controller.success("/users/1");
    controller.conflict("/users");
    controller.failed_request("/users/2");

    let user = json!({"id": 1, "name": "ada"});
    model.validating(&user);
    model.valid(&user);
    model.saving(&user);
    model.saved(&user);
    model.deleted(&1);

    model.query("findUser", &json!({"id": 1}), Pending::new(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok::<_, String>(())
    }));
    model.query("findUser", &json!({"id": 2}), Pending::new(async { Err::<(), _>("row not found") }));
    model.query("countUsers", &json!({}), Unawaited);

    // 5. Give the query continuations a chance to fire
    tokio::time::sleep(Duration::from_millis(100)).await;

    // 6. Summarize and flush
    let registry = factory.registry();
    for entry in registry.entries() {
        tracing::info!("Registered {} ({})", entry.full_name, entry.kind);
    }
    registry.flush_all()?;

    tracing::info!("Demo finished. Loggers created: {} ({})", registry.len(), model.full_name());

    Ok(())
}
