//! Logging macros for ergonomic message formatting and attribute lists.
//!
//! The level macros expand to a call on a [`Logger`](crate::Logger) and
//! yield the future returned by it, so they are awaited like the methods.
//!
//! # Examples
//!
//! ```no_run
//! use slack_log_sink::prelude::*;
//! use slack_log_sink::{attrs, info};
//!
//! # async fn run(logger: Logger) -> slack_log_sink::Result<()> {
//! // Basic logging
//! info!(logger, "Server started").await?;
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).await?;
//!
//! // With attributes
//! logger.info("request served", attrs!["status" => 200, "path" => "/health"]).await?;
//! # Ok(())
//! # }
//! ```

/// Build a `Vec<Attr>` from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use slack_log_sink::attrs;
/// use slack_log_sink::core::Value;
///
/// let attrs = attrs!["user" => "frodo", "retries" => 3, "ok" => true];
/// assert_eq!(attrs.len(), 3);
/// assert_eq!(attrs[1].value, Value::Int(3));
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        ::std::vec::Vec::<$crate::core::Attr>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$($crate::core::Attr::new($key, $value)),+]
    };
}

/// Log a formatted message at the given level, without attributes.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), ::std::vec::Vec::new())
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::TRACE, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::INFO, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::NOTICE, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::WARN, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::ERROR, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::FATAL, $($arg)+)
    };
}
