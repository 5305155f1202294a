//! Logger front end over a [`Handler`]

use super::{
    error::Result,
    handler::Handler,
    log_level::LogLevel,
    record::{CallSite, Record},
    value::Attr,
};
use std::future::Future;
use std::panic::Location;
use std::sync::Arc;

/// Cheap-to-clone logger that builds records and hands them to a handler.
///
/// Every logging method captures the caller's source location. The returned
/// future must be awaited for the record to be handled.
///
/// # Example
///
/// ```no_run
/// use slack_log_sink::prelude::*;
///
/// # async fn run() -> slack_log_sink::Result<()> {
/// let handler = SlackHandler::builder()
///     .webhook_url("https://hooks.slack.com/services/T000/B000/XXXX")
///     .build()?;
/// let logger = Logger::new(handler).with(vec![Attr::string("service", "billing")]);
///
/// logger.info("invoice sent", vec![Attr::uint("invoice_id", 1042)]).await?;
/// logger.shutdown(true).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    #[must_use]
    pub fn new<H: Handler + 'static>(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    #[must_use]
    pub fn from_handler(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.handler.enabled(level)
    }

    /// A logger whose records carry `attrs`
    #[must_use]
    pub fn with(&self, attrs: Vec<Attr>) -> Self {
        if attrs.is_empty() {
            return self.clone();
        }
        Self::from_handler(self.handler.with_attrs(attrs))
    }

    /// A logger whose subsequent attributes are nested under `name`
    #[must_use]
    pub fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        Self::from_handler(self.handler.with_group(name))
    }

    /// Log a message at `level` with per-call attributes
    ///
    /// Records below the handler's minimum level are discarded without
    /// being built.
    #[track_caller]
    pub fn log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> impl Future<Output = Result<()>> + Send + '_ {
        let location = Location::caller();
        let record = self.enabled(level).then(|| {
            Record::new(level, message)
                .with_call_site(CallSite::from(location))
                .with_attrs(attrs)
        });

        async move {
            match record {
                Some(record) => self.handler.handle(record).await,
                None => Ok(()),
            }
        }
    }

    /// Hand a fully built record to the handler, honoring the level check
    pub async fn log_record(&self, record: Record) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }
        self.handler.handle(record).await
    }

    #[inline]
    #[track_caller]
    pub fn trace(
        &self,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> impl Future<Output = Result<()>> + Send + '_ {
        self.log(LogLevel::TRACE, message, attrs)
    }

    #[inline]
    #[track_caller]
    pub fn debug(
        &self,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> impl Future<Output = Result<()>> + Send + '_ {
        self.log(LogLevel::DEBUG, message, attrs)
    }

    #[inline]
    #[track_caller]
    pub fn info(
        &self,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> impl Future<Output = Result<()>> + Send + '_ {
        self.log(LogLevel::INFO, message, attrs)
    }

    #[inline]
    #[track_caller]
    pub fn notice(
        &self,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> impl Future<Output = Result<()>> + Send + '_ {
        self.log(LogLevel::NOTICE, message, attrs)
    }

    #[inline]
    #[track_caller]
    pub fn warn(
        &self,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> impl Future<Output = Result<()>> + Send + '_ {
        self.log(LogLevel::WARN, message, attrs)
    }

    #[inline]
    #[track_caller]
    pub fn error(
        &self,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> impl Future<Output = Result<()>> + Send + '_ {
        self.log(LogLevel::ERROR, message, attrs)
    }

    #[inline]
    #[track_caller]
    pub fn fatal(
        &self,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> impl Future<Output = Result<()>> + Send + '_ {
        self.log(LogLevel::FATAL, message, attrs)
    }

    #[inline]
    #[track_caller]
    pub fn panic(
        &self,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> impl Future<Output = Result<()>> + Send + '_ {
        self.log(LogLevel::PANIC, message, attrs)
    }

    /// Wait for the handler's outstanding work to finish
    pub async fn shutdown(&self, continue_on_error: bool) -> Result<()> {
        self.handler.shutdown(continue_on_error).await
    }
}
