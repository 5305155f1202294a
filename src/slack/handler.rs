//! Slack webhook handler
//!
//! A [`SlackHandler`] is a cheap, immutable view over shared delivery state.
//! Deriving with [`with_attrs`](SlackHandler::with_attrs) or
//! [`with_group`](SlackHandler::with_group) copies the attribute/group state
//! and shares everything else, including the set of outstanding background
//! dispatches, so a shutdown through any derived handler drains all of them.

use super::formatter::{RecordFormatter, SlackMessageFormatter};
#[cfg(feature = "http")]
use super::transport::HttpTransport;
use super::transport::Transport;
use crate::core::attrs::consolidate;
use crate::core::{Attr, DeliveryMetrics, Handler, LogLevel, Record, Result, SinkError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Receives failures that cannot be returned to the caller
pub type ErrorCallback = Arc<dyn Fn(&SinkError) + Send + Sync>;

fn default_error_callback() -> ErrorCallback {
    Arc::new(|err: &SinkError| {
        eprintln!("[SLACK SINK ERROR] Failed to deliver log record: {}", err);
    })
}

/// State shared by a root handler and everything derived from it
struct HandlerShared {
    webhook_url: String,
    level: LogLevel,
    async_dispatch: bool,
    transport: Arc<dyn Transport>,
    formatter: Arc<dyn RecordFormatter>,
    runtime: Option<Handle>,
    on_error: ErrorCallback,
    pending: Mutex<Vec<JoinHandle<Result<()>>>>,
    metrics: DeliveryMetrics,
}

impl HandlerShared {
    /// Format and post one record, updating the counters
    async fn deliver(&self, inherited: &[Attr], record: Record) -> Result<()> {
        let result = self.format_and_post(inherited, &record).await;
        match &result {
            Ok(()) => self.metrics.record_delivered(),
            Err(_) => self.metrics.record_failed(),
        };
        result
    }

    async fn format_and_post(&self, inherited: &[Attr], record: &Record) -> Result<()> {
        let attrs = consolidate(inherited, record);
        let message = self.formatter.format_record(
            record.time,
            record.level,
            record.call_site.as_ref(),
            &record.message,
            &attrs,
        )?;
        self.transport.post(&self.webhook_url, &message).await
    }
}

/// Handler that renders records as Slack messages and posts them to an
/// incoming webhook
///
/// # Example
///
/// ```no_run
/// use slack_log_sink::prelude::*;
///
/// # async fn run() -> slack_log_sink::Result<()> {
/// let handler = SlackHandler::builder()
///     .webhook_url("https://hooks.slack.com/services/T000/B000/XXXX")
///     .level(LogLevel::WARN)
///     .async_dispatch(true)
///     .build()?;
///
/// let logger = Logger::new(handler).with_group("job");
/// logger.error("import failed", vec![Attr::uint("rows", 0)]).await?;
///
/// // wait for background deliveries
/// logger.shutdown(false).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SlackHandler {
    shared: Arc<HandlerShared>,
    attrs: Vec<Attr>,
    groups: Vec<String>,
    active_group: Option<String>,
}

impl SlackHandler {
    pub fn builder() -> SlackHandlerBuilder {
        SlackHandlerBuilder::new()
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.shared.level
    }

    /// Minimum level this handler accepts
    pub fn level(&self) -> LogLevel {
        self.shared.level
    }

    pub fn is_async(&self) -> bool {
        self.shared.async_dispatch
    }

    /// Inherited attributes, already nested under their groups
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Open groups, outermost first
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn active_group(&self) -> Option<&str> {
        self.active_group.as_deref()
    }

    pub fn metrics(&self) -> &DeliveryMetrics {
        &self.shared.metrics
    }

    /// Derive a handler carrying `attrs`.
    ///
    /// With a group open the attributes are wrapped in one group named after
    /// the active group.
    #[must_use]
    pub fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        let mut derived = self.clone();
        if attrs.is_empty() {
            return derived;
        }
        match &self.active_group {
            Some(group) => derived.attrs.push(Attr::group(group.clone(), attrs)),
            None => derived.attrs.extend(attrs),
        }
        derived
    }

    /// Derive a handler with `name` opened as the active group.
    ///
    /// An empty name yields an equivalent handler.
    #[must_use]
    pub fn with_group(&self, name: &str) -> Self {
        let mut derived = self.clone();
        if !name.is_empty() {
            derived.groups.push(name.to_string());
            derived.active_group = Some(name.to_string());
        }
        derived
    }

    /// Render and deliver `record`.
    ///
    /// In asynchronous mode this only schedules the delivery and returns
    /// `Ok(())`; failures go to the error callback.
    pub async fn handle(&self, record: Record) -> Result<()> {
        self.shared.metrics.record_dispatched();

        if !self.shared.async_dispatch {
            return self.shared.deliver(&self.attrs, record).await;
        }

        let runtime = self
            .shared
            .runtime
            .clone()
            .ok_or_else(|| SinkError::config("SlackHandler", "no runtime for async dispatch"))?;
        let shared = Arc::clone(&self.shared);
        let inherited = self.attrs.clone();

        let task = runtime.spawn(async move {
            let result = shared.deliver(&inherited, record).await;
            if let Err(err) = &result {
                (shared.on_error)(err);
            }
            result
        });
        self.shared.pending.lock().push(task);
        Ok(())
    }

    /// Wait for every outstanding background dispatch.
    ///
    /// All dispatches are awaited regardless of `continue_on_error`. When it
    /// is `false` the first failure is returned once the drain is complete;
    /// when `true` failures are only reported through the error callback.
    /// Dispatches scheduled while draining are awaited as well.
    pub async fn shutdown(&self, continue_on_error: bool) -> Result<()> {
        let mut first_error = None;

        loop {
            let tasks = std::mem::take(&mut *self.shared.pending.lock());
            if tasks.is_empty() {
                break;
            }

            for task in tasks {
                let outcome = match task.await {
                    Ok(result) => result,
                    Err(join_err) => {
                        let err = if join_err.is_panic() {
                            SinkError::DispatchPanicked(panic_message(join_err.into_panic()))
                        } else {
                            SinkError::DispatchCancelled
                        };
                        self.shared.metrics.record_failed();
                        (self.shared.on_error)(&err);
                        Err(err)
                    }
                };

                if let Err(err) = outcome {
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) if !continue_on_error => Err(err),
            _ => Ok(()),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_string(),
            Err(_) => "unknown panic payload".to_string(),
        },
    }
}

impl fmt::Debug for SlackHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackHandler")
            .field("level", &self.shared.level)
            .field("async_dispatch", &self.shared.async_dispatch)
            .field("attrs", &self.attrs)
            .field("groups", &self.groups)
            .field("active_group", &self.active_group)
            .finish()
    }
}

#[async_trait]
impl Handler for SlackHandler {
    fn enabled(&self, level: LogLevel) -> bool {
        SlackHandler::enabled(self, level)
    }

    async fn handle(&self, record: Record) -> Result<()> {
        SlackHandler::handle(self, record).await
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(SlackHandler::with_attrs(self, attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(SlackHandler::with_group(self, name))
    }

    async fn shutdown(&self, continue_on_error: bool) -> Result<()> {
        SlackHandler::shutdown(self, continue_on_error).await
    }
}

/// Builder for [`SlackHandler`]
pub struct SlackHandlerBuilder {
    webhook_url: Option<String>,
    level: LogLevel,
    async_dispatch: bool,
    transport: Option<Arc<dyn Transport>>,
    formatter: Option<Arc<dyn RecordFormatter>>,
    runtime: Option<Handle>,
    on_error: Option<ErrorCallback>,
}

impl SlackHandlerBuilder {
    pub fn new() -> Self {
        Self {
            webhook_url: None,
            level: LogLevel::INFO,
            async_dispatch: false,
            transport: None,
            formatter: None,
            runtime: None,
            on_error: None,
        }
    }

    /// Set the incoming webhook URL (required)
    #[must_use]
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    /// Set the minimum level (default: INFO)
    #[must_use]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Deliver on background tasks instead of inside `handle`
    #[must_use]
    pub fn async_dispatch(mut self, enabled: bool) -> Self {
        self.async_dispatch = enabled;
        self
    }

    #[must_use]
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    #[must_use]
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn formatter<F: RecordFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    #[must_use]
    pub fn shared_formatter(mut self, formatter: Arc<dyn RecordFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Runtime for background dispatches.
    ///
    /// Defaults to the runtime `build` is called from.
    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Callback for background delivery failures (default: report to stderr)
    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SinkError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub fn build(self) -> Result<SlackHandler> {
        let webhook_url = self
            .webhook_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                SinkError::config("SlackHandler", "webhook URL is required and cannot be empty")
            })?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport()?,
        };

        let runtime = self.runtime.or_else(|| Handle::try_current().ok());
        if self.async_dispatch && runtime.is_none() {
            return Err(SinkError::config(
                "SlackHandler",
                "async dispatch requires a tokio runtime",
            ));
        }

        let formatter = self
            .formatter
            .unwrap_or_else(|| Arc::new(SlackMessageFormatter::default()));

        let shared = HandlerShared {
            webhook_url,
            level: self.level,
            async_dispatch: self.async_dispatch,
            transport,
            formatter,
            runtime,
            on_error: self.on_error.unwrap_or_else(default_error_callback),
            pending: Mutex::new(Vec::new()),
            metrics: DeliveryMetrics::new(),
        };

        Ok(SlackHandler {
            shared: Arc::new(shared),
            attrs: Vec::new(),
            groups: Vec::new(),
            active_group: None,
        })
    }
}

impl Default for SlackHandlerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
fn default_transport() -> Result<Arc<dyn Transport>> {
    Ok(Arc::new(HttpTransport::new()))
}

#[cfg(not(feature = "http"))]
fn default_transport() -> Result<Arc<dyn Transport>> {
    Err(SinkError::config(
        "SlackHandler",
        "no transport configured and the `http` feature is disabled",
    ))
}
