//! Serializable configuration
//!
//! Hooks and transports are code, so only the declarative part of the
//! configuration is covered here. Load a [`HandlerConfig`] from the host's
//! configuration source and finish the builder in code.
//!
//! ```
//! use slack_log_sink::slack::HandlerConfig;
//! use slack_log_sink::LogLevel;
//!
//! let config = HandlerConfig::from_json(r#"{
//!     "webhook_url": "https://hooks.slack.com/services/T000/B000/XXXX",
//!     "level": "warn",
//!     "async": true,
//!     "formatter": { "application_name": "billing", "ignore_attrs": ["^secret"] }
//! }"#).unwrap();
//!
//! assert_eq!(config.level, LogLevel::WARN);
//! assert!(config.async_dispatch);
//! ```

use super::formatter::{FormatterOptions, SlackMessageFormatter};
use super::handler::SlackHandlerBuilder;
use crate::core::{LogLevel, Result, TimestampFormat};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Declarative subset of [`FormatterOptions`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub application_name: String,
    pub application_icon_url: String,
    #[serde(default = "default_true")]
    pub include_attrs: bool,
    #[serde(default = "default_true")]
    pub sort_attrs: bool,
    pub include_source: bool,
    pub ignore_attrs: Vec<String>,
    /// Empty means the default prefix
    pub time_prefix: String,
    /// Empty means the default prefix
    pub source_prefix: String,
    pub timestamp_format: TimestampFormat,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            application_name: String::new(),
            application_icon_url: String::new(),
            include_attrs: true,
            sort_attrs: true,
            include_source: false,
            ignore_attrs: Vec::new(),
            time_prefix: String::new(),
            source_prefix: String::new(),
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl FormatterConfig {
    pub fn into_options(self) -> FormatterOptions {
        let mut options = FormatterOptions::default()
            .with_application_name(self.application_name)
            .with_application_icon_url(self.application_icon_url)
            .with_include_attrs(self.include_attrs)
            .with_sort_attrs(self.sort_attrs)
            .with_include_source(self.include_source)
            .with_ignore_attrs(self.ignore_attrs)
            .with_timestamp_format(self.timestamp_format);
        if !self.time_prefix.is_empty() {
            options.time_prefix = self.time_prefix;
        }
        if !self.source_prefix.is_empty() {
            options.source_prefix = self.source_prefix;
        }
        options
    }

    pub fn build(self) -> SlackMessageFormatter {
        SlackMessageFormatter::new(self.into_options())
    }
}

/// Declarative handler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub webhook_url: String,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default, rename = "async")]
    pub async_dispatch: bool,
    #[serde(default)]
    pub formatter: Option<FormatterConfig>,
}

impl HandlerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder preloaded with this configuration.
    ///
    /// Without a `formatter` section the handler uses the default formatter.
    pub fn into_builder(self) -> SlackHandlerBuilder {
        let builder = SlackHandlerBuilder::new()
            .webhook_url(self.webhook_url)
            .level(self.level)
            .async_dispatch(self.async_dispatch);
        match self.formatter {
            Some(formatter) => builder.formatter(formatter.build()),
            None => builder,
        }
    }
}
