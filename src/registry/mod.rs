// src/registry/mod.rs
use crate::config::VariantKind;
use crate::engine::EngineHandle;
use crate::utils::error::LogError;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One entry per logger ever constructed.
#[derive(Clone)]
pub struct RegisteredLogger {
    pub full_name: String,
    pub kind: VariantKind,
    pub handle: Arc<dyn EngineHandle>,
}

impl fmt::Debug for RegisteredLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredLogger")
            .field("full_name", &self.full_name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Append-only record of every logger a factory has handed out.
///
/// Entries are never removed, and duplicate names are allowed.
#[derive(Default)]
pub struct LoggerRegistry {
    entries: Mutex<Vec<RegisteredLogger>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RegisteredLogger>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, full_name: &str, kind: VariantKind, handle: Arc<dyn EngineHandle>) {
        self.lock().push(RegisteredLogger {
            full_name: full_name.to_string(),
            kind,
            handle,
        });
        tracing::debug!("Registered logger {}", full_name);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Full names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.full_name.clone()).collect()
    }

    pub fn entries(&self) -> Vec<RegisteredLogger> {
        self.lock().clone()
    }

    /// Flushes every registered handle. All handles are attempted; the first
    /// failure is returned.
    pub fn flush_all(&self) -> Result<(), LogError> {
        // Snapshot first so a slow flush doesn't block registration
        let entries = self.entries();
        let mut first_error = None;

        for entry in &entries {
            if let Err(e) = entry.handle.flush() {
                tracing::warn!("Failed to flush logger {}: {}", entry.full_name, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.lock().iter()).finish()
    }
}
