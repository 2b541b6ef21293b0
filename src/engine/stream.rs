// src/engine/stream.rs
use crate::engine::{merge_tags, Context, EngineHandle, LogEngine, LogRecord};
use crate::level::Severity;
use crate::sinks::{ConsoleTarget, LoggerConfig, RotationPeriod, SinkSpec};
use crate::utils::error::LogError;
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Writes JSON-lines records to rotating files and stdout.
///
/// Each rotating-file sink gets its own appender. The active file is named
/// `<stem>.<date>.log` inside the sink's directory. Besides the active file,
/// the newest `count` rotated files of exactly that stem are retained.
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamEngine;

impl StreamEngine {
    pub fn new() -> Self {
        Self
    }
}

enum Sink {
    File {
        level: Severity,
        file: Mutex<RotatingFile>,
    },
    Console {
        level: Severity,
        target: ConsoleTarget,
    },
}

impl Sink {
    fn open(spec: &SinkSpec) -> Result<Self, LogError> {
        match spec {
            SinkSpec::RotatingFile { path, level, period, count } => Ok(Sink::File {
                level: *level,
                file: Mutex::new(RotatingFile::open(path, *period, *count)?),
            }),
            SinkSpec::Console { level, destination } => Ok(Sink::Console {
                level: *level,
                target: *destination,
            }),
        }
    }

    fn write_line(&self, severity: Severity, line: &str) -> std::io::Result<()> {
        match self {
            Sink::File { level, file } if severity >= *level => {
                file.lock().unwrap_or_else(PoisonError::into_inner).write_line(line)
            }
            Sink::Console { level, target: ConsoleTarget::Stdout } if severity >= *level => {
                let mut out = std::io::stdout().lock();
                out.write_all(line.as_bytes())
            }
            _ => Ok(()),
        }
    }

    fn flush(&self) -> std::io::Result<()> {
        match self {
            Sink::File { file, .. } => file.lock().unwrap_or_else(PoisonError::into_inner).appender.flush(),
            Sink::Console { .. } => std::io::stdout().flush(),
        }
    }
}

/// Which rotated files belong to one sink: `<stem>.<YYYY-MM-DD>[.<extension>]`.
struct Retention {
    directory: PathBuf,
    stem: String,
    extension: Option<String>,
    count: usize,
}

impl Retention {
    fn rotated_date(&self, file_name: &str) -> Option<NaiveDate> {
        let rest = file_name.strip_prefix(self.stem.as_str())?.strip_prefix('.')?;
        let date = match &self.extension {
            Some(extension) => rest.strip_suffix(extension.as_str())?.strip_suffix('.')?,
            None => rest,
        };
        NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
    }

    /// Deletes rotated files older than `today` beyond the newest `count`.
    /// Files of other loggers sharing the directory are never matched.
    fn prune(&self, today: NaiveDate) -> std::io::Result<usize> {
        let mut rotated = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            let date = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| self.rotated_date(name));
            if let Some(date) = date.filter(|date| *date < today) {
                rotated.push((date, path));
            }
        }

        // Newest first
        rotated.sort_by(|a, b| b.0.cmp(&a.0));
        let mut removed = 0;
        for (_, path) in rotated.into_iter().skip(self.count) {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Failed to remove old log file {}: {}", path.display(), e),
            }
        }
        Ok(removed)
    }
}

struct RotatingFile {
    appender: RollingFileAppender,
    retention: Retention,
    pruned_on: NaiveDate,
}

impl RotatingFile {
    fn open(path: &Path, period: RotationPeriod, count: usize) -> Result<Self, LogError> {
        let sink_error = |reason: String| LogError::FileSink {
            path: path.to_path_buf(),
            reason,
        };

        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| sink_error("file name is not valid UTF-8".to_string()))?;
        let extension = path.extension().and_then(|e| e.to_str());

        let rotation = match period {
            RotationPeriod::Daily => Rotation::DAILY,
        };

        // Retention is handled by `Retention`: the appender's own pruning
        // matches on prefix only and would reach into sibling loggers' files.
        let mut builder = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(stem);
        if let Some(extension) = extension {
            builder = builder.filename_suffix(extension);
        }
        let appender = builder.build(directory).map_err(|e| sink_error(e.to_string()))?;

        let retention = Retention {
            directory: directory.to_path_buf(),
            stem: stem.to_string(),
            extension: extension.map(str::to_string),
            count,
        };
        let today = chrono::Utc::now().date_naive();
        retention.prune(today)?;

        Ok(Self {
            appender,
            retention,
            pruned_on: today,
        })
    }

    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        // The appender rolls over on UTC day boundaries
        let today = chrono::Utc::now().date_naive();
        if today != self.pruned_on {
            self.pruned_on = today;
            if let Err(e) = self.retention.prune(today) {
                tracing::warn!("Failed to prune old logs for {}: {}", self.retention.stem, e);
            }
        }

        self.appender.write_all(line.as_bytes())?;
        self.appender.flush()
    }
}

struct StreamLogger {
    name: String,
    sinks: Vec<Sink>,
}

/// Handle returned by [`StreamEngine`]; children share the parent's sinks.
pub struct StreamHandle {
    inner: Arc<StreamLogger>,
    tags: Context,
}

impl LogEngine for StreamEngine {
    fn create_logger(&self, config: &LoggerConfig) -> Result<Arc<dyn EngineHandle>, LogError> {
        let sinks = config
            .sinks()
            .iter()
            .map(Sink::open)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Opened {} sinks for logger {}", sinks.len(), config.full_name());

        Ok(Arc::new(StreamHandle {
            inner: Arc::new(StreamLogger {
                name: config.full_name().to_string(),
                sinks,
            }),
            tags: Context::new(),
        }))
    }
}

impl EngineHandle for StreamHandle {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn emit(&self, severity: Severity, fields: Context, message: &str) {
        let fields = merge_tags(&self.tags, fields);
        let line = match LogRecord::new(&self.inner.name, severity, &fields, message).to_json_line() {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Dropping record for {}: {}", self.inner.name, e);
                return;
            }
        };

        for sink in &self.inner.sinks {
            if let Err(e) = sink.write_line(severity, &line) {
                tracing::warn!("Failed to write record for {}: {}", self.inner.name, e);
            }
        }
    }

    fn child(&self, tags: Context) -> Arc<dyn EngineHandle> {
        Arc::new(StreamHandle {
            inner: Arc::clone(&self.inner),
            tags: merge_tags(&self.tags, tags),
        })
    }

    fn flush(&self) -> Result<(), LogError> {
        for sink in &self.inner.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggerOptions, VariantKind};
    use crate::engine::into_fields;
    use crate::sinks::SinkConfigBuilder;
    use serde_json::{json, Value};
    use std::fs;

    // Collects every record written under `dir` for loggers starting with `stem`.
    fn read_records(dir: &Path, stem: &str) -> Vec<Value> {
        let mut records = Vec::new();
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let file_name = path.file_name().unwrap().to_string_lossy().to_string();
            if file_name.starts_with(stem) && file_name.ends_with(".log") {
                for line in fs::read_to_string(&path).unwrap().lines() {
                    records.push(serde_json::from_str(line).unwrap());
                }
            }
        }
        records
    }

    #[test]
    fn test_writes_tagged_json_lines_to_file() {
        let dir = tempfile::tempdir().unwrap();
        // Fatal console threshold keeps test output quiet
        let builder = SinkConfigBuilder::new(dir.path(), Severity::Fatal);
        let config = builder.build(VariantKind::Controller, Some(&LoggerOptions::named("orders")));

        let handle = StreamEngine::new().create_logger(&config).unwrap();
        let tagged = handle.child(into_fields(json!({"variant": "controller"})));
        tagged.emit(Severity::Debug, into_fields(json!({"url": "/x"})), "Processed a successful request");
        tokio_test::assert_ok!(tagged.flush());

        let records = read_records(dir.path(), "orders.controller");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["variant"], "controller");
        assert_eq!(records[0]["url"], "/x");
        assert_eq!(records[0]["name"], "orders.controller");
        assert_eq!(records[0]["level"], 20);
    }

    #[test]
    fn test_file_sink_filters_below_level() {
        let dir = tempfile::tempdir().unwrap();
        let builder = SinkConfigBuilder::new(dir.path(), Severity::Fatal);
        let options = LoggerOptions::named("billing").with_level(Severity::Warn);
        let config = builder.build(VariantKind::Model, Some(&options));

        let handle = StreamEngine::new().create_logger(&config).unwrap();
        handle.emit(Severity::Info, Context::new(), "dropped");
        handle.emit(Severity::Error, Context::new(), "kept");

        let records = read_records(dir.path(), "billing.model");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["msg"], "kept");
    }

    #[test]
    fn test_colliding_names_share_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let builder = SinkConfigBuilder::new(dir.path(), Severity::Fatal);
        let config = builder.build(VariantKind::Route, Some(&LoggerOptions::named("shared")));

        let first = StreamEngine::new().create_logger(&config).unwrap();
        let second = StreamEngine::new().create_logger(&config).unwrap();
        first.emit(Severity::Info, Context::new(), "one");
        second.emit(Severity::Info, Context::new(), "two");

        let records = read_records(dir.path(), "shared.route");
        assert_eq!(records.len(), 2);
    }

    fn dated_files(dir: &Path, stem: &str) -> Vec<String> {
        let retention = Retention {
            directory: dir.to_path_buf(),
            stem: stem.to_string(),
            extension: Some("log".to_string()),
            count: 0,
        };
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| retention.rotated_date(name).is_some())
            .collect();
        names.sort();
        names
    }

    fn seed(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), "{}\n").unwrap();
        }
    }

    #[test]
    fn test_prune_keeps_newest_rotated_files() {
        let dir = tempfile::tempdir().unwrap();
        seed(
            dir.path(),
            &[
                "users.model.2026-01-01.log",
                "users.model.2026-01-02.log",
                "users.model.2026-01-03.log",
                "users.model.2026-01-04.log",
                "users.model.2026-01-05.log",
                "users.model.2026-02-01.log",
            ],
        );
        let retention = Retention {
            directory: dir.path().to_path_buf(),
            stem: "users.model".to_string(),
            extension: Some("log".to_string()),
            count: 3,
        };

        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert_eq!(retention.prune(today).unwrap(), 2);
        assert_eq!(
            dated_files(dir.path(), "users.model"),
            vec![
                "users.model.2026-01-03.log",
                "users.model.2026-01-04.log",
                "users.model.2026-01-05.log",
                "users.model.2026-02-01.log",
            ]
        );
    }

    #[test]
    fn test_opening_sink_retains_three_rotated_files() {
        let dir = tempfile::tempdir().unwrap();
        seed(
            dir.path(),
            &[
                "orders.route.2020-01-01.log",
                "orders.route.2020-01-02.log",
                "orders.route.2020-01-03.log",
                "orders.route.2020-01-04.log",
            ],
        );
        let builder = SinkConfigBuilder::new(dir.path(), Severity::Fatal);
        let config = builder.build(VariantKind::Route, Some(&LoggerOptions::named("orders")));

        let _handle = StreamEngine::new().create_logger(&config).unwrap();

        let files = dated_files(dir.path(), "orders.route");
        // Three rotated files plus today's active one
        assert_eq!(files.len(), 4, "{:?}", files);
        assert!(!files.contains(&"orders.route.2020-01-01.log".to_string()));
        assert!(files.contains(&"orders.route.2020-01-02.log".to_string()));
    }

    #[test]
    fn test_pruning_leaves_sibling_loggers_alone() {
        let dir = tempfile::tempdir().unwrap();
        let siblings = [
            "users.model.default.2020-01-01.log",
            "users.model.default.2020-01-02.log",
            "users.model.default.2020-01-03.log",
            "users.model.default.2020-01-04.log",
        ];
        seed(dir.path(), &siblings);
        let builder = SinkConfigBuilder::new(dir.path(), Severity::Fatal);
        let config = builder.build(VariantKind::Model, Some(&LoggerOptions::named("users")));

        let _handle = StreamEngine::new().create_logger(&config).unwrap();

        for sibling in siblings {
            assert!(dir.path().join(sibling).exists(), "{} was deleted", sibling);
        }
        assert_eq!(dated_files(dir.path(), "users.model").len(), 1);
    }
}
