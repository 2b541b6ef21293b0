// src/loggers/completion.rs
use std::convert::Infallible;
use std::fmt;
use std::future::Future;

pub type OnSuccess = Box<dyn FnOnce() + Send + 'static>;
pub type OnFailure<E> = Box<dyn FnOnce(E) + Send + 'static>;

/// Returned by [`Completion::attach`] when no continuation could be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotAttached {
    /// The value was never awaitable.
    NotAwaitable,
    /// The value is awaitable but no tokio runtime is running to drive it.
    NoRuntime,
}

/// Something that settles later, either successfully or with an error.
///
/// Callers of [`ModelLogger::query`](crate::loggers::ModelLogger::query) pass
/// one of these; the logger only ever attaches handlers and never waits.
pub trait Completion: Send + 'static {
    type Error: fmt::Display + Send + 'static;

    /// Arranges for exactly one of the handlers to run once the value
    /// settles. Returns `Err(NotAttached)` when that isn't possible.
    fn attach(self, on_success: OnSuccess, on_failure: OnFailure<Self::Error>) -> Result<(), NotAttached>;
}

/// A future driven on the current tokio runtime.
///
/// If the future never resolves, neither handler ever runs.
pub struct Pending<F> {
    future: F,
}

impl<F> Pending<F> {
    pub fn new(future: F) -> Self {
        Self { future }
    }
}

impl<F, T, E> Completion for Pending<F>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    type Error = E;

    fn attach(self, on_success: OnSuccess, on_failure: OnFailure<E>) -> Result<(), NotAttached> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            tracing::warn!("No tokio runtime to drive the completion: {}", e);
            NotAttached::NoRuntime
        })?;

        let future = self.future;
        runtime.spawn(async move {
            match future.await {
                Ok(_) => on_success(),
                Err(e) => on_failure(e),
            }
        });
        Ok(())
    }
}

/// A query result that was never made awaitable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unawaited;

impl Completion for Unawaited {
    type Error = Infallible;

    fn attach(self, _on_success: OnSuccess, _on_failure: OnFailure<Infallible>) -> Result<(), NotAttached> {
        Err(NotAttached::NotAwaitable)
    }
}
