//! Error reporting capability handed to [`ImageProcessor`](crate::processor::ImageProcessor).
//!
//! Failures of public operations are reported to a sink once, right before
//! the error is returned to the caller. Where the report ends up (nowhere,
//! the `log` facade, the browser console) is up to the host.

use std::sync::Arc;

use log::error;

/// Receives a context message plus the underlying cause of a failed operation.
pub trait LogSink: Send + Sync {
    fn error(&self, message: &str, cause: &dyn std::error::Error);
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn error(&self, _message: &str, _cause: &dyn std::error::Error) {}
}

/// Forwards reports to `log::error!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn error(&self, message: &str, cause: &dyn std::error::Error) {
        error!("{}: {}", message, cause);
    }
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn error(&self, message: &str, cause: &dyn std::error::Error) {
        (**self).error(message, cause);
    }
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn error(&self, message: &str, cause: &dyn std::error::Error) {
        (**self).error(message, cause);
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn error(&self, message: &str, cause: &dyn std::error::Error) {
        (**self).error(message, cause);
    }
}
