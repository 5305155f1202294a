//! # Slack Log Sink
//!
//! A structured log handler that renders records as Slack Block Kit
//! messages and posts them to an incoming webhook.
//!
//! ## Features
//!
//! - **Structured attributes**: nested groups flattened to dotted keys,
//!   last value wins on duplicates
//! - **Configurable rendering**: hooks for the level, time, call site and
//!   every attribute, plus regex-based filtering
//! - **Derived handlers**: attributes and groups accumulate across derived
//!   handlers without touching the parent
//! - **Async delivery**: optional background dispatch with a draining
//!   shutdown
//!
//! ## Example
//!
//! ```no_run
//! use slack_log_sink::prelude::*;
//!
//! # async fn run() -> slack_log_sink::Result<()> {
//! let formatter = SlackMessageFormatter::new(
//!     FormatterOptions::default()
//!         .with_application_name("billing")
//!         .with_include_source(true),
//! );
//! let handler = SlackHandler::builder()
//!     .webhook_url("https://hooks.slack.com/services/T000/B000/XXXX")
//!     .formatter(formatter)
//!     .async_dispatch(true)
//!     .build()?;
//!
//! let logger = Logger::new(handler);
//! logger.warn("payment retried", attrs!["attempt" => 2]).await?;
//! logger.shutdown(false).await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod macros;
pub mod slack;

pub mod prelude {
    pub use crate::attrs;
    pub use crate::core::{
        Attr, CallSite, DeliveryMetrics, Handler, LogLevel, LogValuer, Logger, OpaqueValue,
        Record, Result, SinkError, TextMarshaler, TimestampFormat, Value,
    };
    pub use crate::slack::{
        FormatterOptions, RecordFormatter, SlackHandler, SlackHandlerBuilder,
        SlackMessageFormatter, Transport, WebhookMessage,
    };
}

pub use crate::core::{
    Attr, CallSite, DeliveryMetrics, Handler, LogLevel, Logger, Record, Result, SinkError, Value,
};
pub use crate::slack::{
    FormatterOptions, RecordFormatter, SlackHandler, SlackHandlerBuilder, SlackMessageFormatter,
    Transport, WebhookMessage,
};
