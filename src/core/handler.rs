//! Handler trait for log record destinations

use super::{error::Result, log_level::LogLevel, record::Record, value::Attr};
use async_trait::async_trait;
use std::sync::Arc;

/// Destination for log records.
///
/// Deriving a handler with [`with_attrs`](Handler::with_attrs) or
/// [`with_group`](Handler::with_group) never mutates the receiver; the
/// parent stays usable, concurrently, with its original attributes.
///
/// # Example
///
/// ```no_run
/// use slack_log_sink::core::{Attr, Handler, LogLevel, Record, Result};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// struct StderrHandler;
///
/// #[async_trait]
/// impl Handler for StderrHandler {
///     fn enabled(&self, level: LogLevel) -> bool {
///         level >= LogLevel::WARN
///     }
///
///     async fn handle(&self, record: Record) -> Result<()> {
///         eprintln!("[{}] {}", record.level, record.message);
///         Ok(())
///     }
///
///     fn with_attrs(&self, _attrs: Vec<Attr>) -> Arc<dyn Handler> {
///         Arc::new(StderrHandler)
///     }
///
///     fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
///         Arc::new(StderrHandler)
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync {
    /// Whether records at `level` should be handed to [`handle`](Handler::handle)
    fn enabled(&self, level: LogLevel) -> bool;

    /// Process one record
    async fn handle(&self, record: Record) -> Result<()>;

    /// A new handler carrying `attrs` in addition to this one's
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;

    /// A new handler with `name` opened as a group
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;

    /// Wait for outstanding work to finish
    async fn shutdown(&self, _continue_on_error: bool) -> Result<()> {
        Ok(())
    }
}
