//! Record to Slack message formatting
//!
//! [`SlackMessageFormatter`] turns a record into a block sequence:
//!
//! 1. a divider
//! 2. a context block with the application icon/name and the level
//! 3. a context block with the time and, optionally, the call site
//! 4. a divider and a section block with the message text
//! 5. one context block per attribute, after flattening, sorting and
//!    filtering, when attributes are included
//!
//! Every rendering step can be overridden with a hook. Hooks receive a
//! [`RenderContext`] instead of reading any ambient state, so a formatter
//! is deterministic and safe to share between concurrent dispatches.

use super::message::{Block, ContextElement, WebhookMessage};
use crate::core::attrs::{flatten, sort_by_key, split_key};
use crate::core::timestamp::{format_duration, format_rfc3339, TimestampFormat};
use crate::core::{Attr, CallSite, LogLevel, Result, SinkError, Value};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Default text in front of the call site
pub const DEFAULT_SOURCE_PREFIX: &str = "Source:\t\t\t";

/// Default text in front of the record time
pub const DEFAULT_TIME_PREFIX: &str = "Occurred at:\t";

pub type LevelRenderer = Arc<dyn Fn(&RenderContext<'_>, LogLevel) -> Result<String> + Send + Sync>;

pub type TimeRenderer =
    Arc<dyn Fn(&RenderContext<'_>, DateTime<Utc>) -> Result<String> + Send + Sync>;

pub type SourceRenderer =
    Arc<dyn Fn(&RenderContext<'_>, Option<&CallSite>) -> Result<String> + Send + Sync>;

/// Attribute hook: `(context, group path, leaf key, value) -> (key, value)`.
///
/// The returned key replaces the full flattened key in the output.
pub type AttrRenderer =
    Arc<dyn Fn(&RenderContext<'_>, &str, &str, Value) -> Result<(String, Value)> + Send + Sync>;

/// Per-record parameters handed to every rendering hook
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub options: &'a FormatterOptions,
    pub level: LogLevel,
}

/// Formats records into webhook messages
pub trait RecordFormatter: Send + Sync {
    fn format_record(
        &self,
        time: DateTime<Utc>,
        level: LogLevel,
        call_site: Option<&CallSite>,
        message: &str,
        attrs: &[Attr],
    ) -> Result<WebhookMessage>;
}

/// Options for [`SlackMessageFormatter`]
///
/// # Examples
///
/// ```
/// use slack_log_sink::slack::{FormatterOptions, SlackMessageFormatter};
/// use slack_log_sink::core::Value;
///
/// let options = FormatterOptions::default()
///     .with_application_name("billing")
///     .with_include_source(true)
///     .with_ignore_attrs(["^secret\\."])
///     .with_specific_attr_renderer("user.password", |_ctx, _group, key, _value| {
///         Ok((key.to_string(), Value::from("********")))
///     });
/// let formatter = SlackMessageFormatter::new(options);
/// ```
#[derive(Clone)]
pub struct FormatterOptions {
    /// Name shown above the message; omitted when empty
    pub application_name: String,
    /// Icon shown next to the application name; omitted when empty
    pub application_icon_url: String,
    pub include_attrs: bool,
    pub sort_attrs: bool,
    pub include_source: bool,
    /// Regular expressions matched against flattened attribute keys.
    /// Patterns that do not compile are skipped.
    pub ignore_attrs: Vec<String>,
    pub time_prefix: String,
    pub source_prefix: String,
    /// Used when no `time_renderer` is set
    pub timestamp_format: TimestampFormat,
    pub level_renderer: Option<LevelRenderer>,
    pub time_renderer: Option<TimeRenderer>,
    pub source_renderer: Option<SourceRenderer>,
    pub attr_renderer: Option<AttrRenderer>,
    /// Hooks keyed by exact flattened key; these win over `attr_renderer`
    pub specific_attr_renderers: HashMap<String, AttrRenderer>,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            application_name: String::new(),
            application_icon_url: String::new(),
            include_attrs: true,
            sort_attrs: true,
            include_source: false,
            ignore_attrs: Vec::new(),
            time_prefix: DEFAULT_TIME_PREFIX.to_string(),
            source_prefix: DEFAULT_SOURCE_PREFIX.to_string(),
            timestamp_format: TimestampFormat::default(),
            level_renderer: None,
            time_renderer: None,
            source_renderer: None,
            attr_renderer: None,
            specific_attr_renderers: HashMap::new(),
        }
    }
}

impl fmt::Debug for FormatterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut specific: Vec<&String> = self.specific_attr_renderers.keys().collect();
        specific.sort();

        f.debug_struct("FormatterOptions")
            .field("application_name", &self.application_name)
            .field("application_icon_url", &self.application_icon_url)
            .field("include_attrs", &self.include_attrs)
            .field("sort_attrs", &self.sort_attrs)
            .field("include_source", &self.include_source)
            .field("ignore_attrs", &self.ignore_attrs)
            .field("time_prefix", &self.time_prefix)
            .field("source_prefix", &self.source_prefix)
            .field("timestamp_format", &self.timestamp_format)
            .field("level_renderer", &self.level_renderer.is_some())
            .field("time_renderer", &self.time_renderer.is_some())
            .field("source_renderer", &self.source_renderer.is_some())
            .field("attr_renderer", &self.attr_renderer.is_some())
            .field("specific_attr_renderers", &specific)
            .finish()
    }
}

impl FormatterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    #[must_use]
    pub fn with_application_icon_url(mut self, url: impl Into<String>) -> Self {
        self.application_icon_url = url.into();
        self
    }

    #[must_use]
    pub fn with_include_attrs(mut self, include: bool) -> Self {
        self.include_attrs = include;
        self
    }

    #[must_use]
    pub fn with_sort_attrs(mut self, sort: bool) -> Self {
        self.sort_attrs = sort;
        self
    }

    #[must_use]
    pub fn with_include_source(mut self, include: bool) -> Self {
        self.include_source = include;
        self
    }

    #[must_use]
    pub fn with_ignore_attrs<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_attrs.extend(patterns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_time_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.time_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_source_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.source_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_level_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&RenderContext<'_>, LogLevel) -> Result<String> + Send + Sync + 'static,
    {
        self.level_renderer = Some(Arc::new(renderer));
        self
    }

    #[must_use]
    pub fn with_time_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&RenderContext<'_>, DateTime<Utc>) -> Result<String> + Send + Sync + 'static,
    {
        self.time_renderer = Some(Arc::new(renderer));
        self
    }

    #[must_use]
    pub fn with_source_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&RenderContext<'_>, Option<&CallSite>) -> Result<String> + Send + Sync + 'static,
    {
        self.source_renderer = Some(Arc::new(renderer));
        self
    }

    #[must_use]
    pub fn with_attr_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&RenderContext<'_>, &str, &str, Value) -> Result<(String, Value)>
            + Send
            + Sync
            + 'static,
    {
        self.attr_renderer = Some(Arc::new(renderer));
        self
    }

    #[must_use]
    pub fn with_specific_attr_renderer<F>(mut self, key: impl Into<String>, renderer: F) -> Self
    where
        F: Fn(&RenderContext<'_>, &str, &str, Value) -> Result<(String, Value)>
            + Send
            + Sync
            + 'static,
    {
        self.specific_attr_renderers
            .insert(key.into(), Arc::new(renderer));
        self
    }
}

/// Formats records as Slack Block Kit messages
#[derive(Debug, Clone)]
pub struct SlackMessageFormatter {
    options: FormatterOptions,
    ignore_patterns: Vec<Regex>,
}

impl SlackMessageFormatter {
    pub fn new(mut options: FormatterOptions) -> Self {
        if options.time_prefix.is_empty() {
            options.time_prefix = DEFAULT_TIME_PREFIX.to_string();
        }
        if options.include_source && options.source_prefix.is_empty() {
            options.source_prefix = DEFAULT_SOURCE_PREFIX.to_string();
        }

        let ignore_patterns = options
            .ignore_attrs
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    eprintln!(
                        "[SLACK SINK WARNING] Ignoring invalid attribute pattern '{}': {}",
                        pattern, e
                    );
                    None
                }
            })
            .collect();

        Self {
            options,
            ignore_patterns,
        }
    }

    pub fn options(&self) -> &FormatterOptions {
        &self.options
    }

    /// Number of ignore patterns that compiled
    pub fn ignore_pattern_count(&self) -> usize {
        self.ignore_patterns.len()
    }

    fn is_ignored(&self, key: &str) -> bool {
        self.ignore_patterns.iter().any(|p| p.is_match(key))
    }

    fn render_level(&self, ctx: &RenderContext<'_>, level: LogLevel) -> Result<String> {
        match &self.options.level_renderer {
            Some(renderer) => renderer(ctx, level),
            None => Ok(render_level_default(level)),
        }
    }

    fn render_time(&self, ctx: &RenderContext<'_>, time: DateTime<Utc>) -> Result<String> {
        match &self.options.time_renderer {
            Some(renderer) => renderer(ctx, time),
            None => Ok(self.options.timestamp_format.format(&time)),
        }
    }

    fn render_source(&self, ctx: &RenderContext<'_>, call_site: Option<&CallSite>) -> Result<String> {
        match &self.options.source_renderer {
            Some(renderer) => renderer(ctx, call_site),
            None => Ok(render_source_default(call_site)),
        }
    }

    /// Render one flattened attribute, or `None` if it is filtered out
    fn attr_to_element(
        &self,
        ctx: &RenderContext<'_>,
        key: &str,
        value: &Value,
    ) -> Result<Option<ContextElement>> {
        if self.is_ignored(key) {
            return Ok(None);
        }

        let (group, leaf) = split_key(key);
        let renderer = self
            .options
            .specific_attr_renderers
            .get(key)
            .or(self.options.attr_renderer.as_ref());

        let (key, value) = match renderer {
            Some(renderer) => renderer(ctx, group, leaf, value.clone())?,
            None => (key.to_string(), value.clone()),
        };
        let value = value.resolve();

        let text = render_value(&key, &value)?;
        Ok(Some(ContextElement::markdown(format!("*{}*: `{}`", key, text))))
    }
}

impl Default for SlackMessageFormatter {
    fn default() -> Self {
        Self::new(FormatterOptions::default())
    }
}

impl RecordFormatter for SlackMessageFormatter {
    fn format_record(
        &self,
        time: DateTime<Utc>,
        level: LogLevel,
        call_site: Option<&CallSite>,
        message: &str,
        attrs: &[Attr],
    ) -> Result<WebhookMessage> {
        let ctx = RenderContext {
            options: &self.options,
            level,
        };
        let mut out = WebhookMessage::new();
        out.push(Block::Divider);

        // application and level
        let mut header = Vec::with_capacity(3);
        if !self.options.application_icon_url.is_empty() {
            header.push(ContextElement::image(
                &self.options.application_icon_url,
                &self.options.application_name,
            ));
        }
        if !self.options.application_name.is_empty() {
            header.push(ContextElement::markdown(&self.options.application_name));
        }
        header.push(ContextElement::markdown(self.render_level(&ctx, level)?));
        out.push(Block::context(header));

        // time and source
        let mut when = format!("{}{}", self.options.time_prefix, self.render_time(&ctx, time)?);
        if self.options.include_source {
            when.push('\n');
            when.push_str(&self.options.source_prefix);
            when.push_str(&self.render_source(&ctx, call_site)?);
        }
        out.push(Block::context_text(when));

        out.push(Block::Divider);
        out.push(Block::section(message));

        if self.options.include_attrs {
            let flat = flatten(attrs);
            let flat = if self.options.sort_attrs {
                sort_by_key(&flat)
            } else {
                flat
            };
            for attr in &flat {
                if let Some(element) = self.attr_to_element(&ctx, &attr.key, &attr.value)? {
                    out.push(Block::context(vec![element]));
                }
            }
        }

        Ok(out)
    }
}

/// Level label with an emoji prefix; unnamed levels render as their text form
pub fn render_level_default(level: LogLevel) -> String {
    match level {
        LogLevel::TRACE => ":eyes: trace".to_string(),
        LogLevel::DEBUG => ":ladybug: debug".to_string(),
        LogLevel::INFO => ":information_source: info".to_string(),
        LogLevel::NOTICE => ":grey_exclamation: notice".to_string(),
        LogLevel::WARN => ":warning: warn".to_string(),
        LogLevel::ERROR => ":no_entry: error".to_string(),
        LogLevel::FATAL => ":rotating_light: fatal".to_string(),
        LogLevel::PANIC => ":sos: panic".to_string(),
        other => other.to_string(),
    }
}

/// `file:line`, or `unknown` when the record carries no call site
pub fn render_source_default(call_site: Option<&CallSite>) -> String {
    call_site.map_or_else(|| "unknown".to_string(), CallSite::to_string)
}

/// Default textual form of a resolved attribute value
pub fn render_value(key: &str, value: &Value) -> Result<String> {
    let text = match value {
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Duration(d) => format_duration(*d),
        Value::Time(t) => format_rfc3339(t),
        Value::Float(f) => format!("{:.6}", f),
        Value::Int(i) => i.to_string(),
        Value::Uint(u) => u.to_string(),
        // flattened input never carries groups
        Value::Group(attrs) => format!("{:?}", attrs),
        Value::Any(any) => match any.as_text_marshaler() {
            Some(marshaler) => marshaler
                .marshal_text()
                .map_err(|e| SinkError::text_marshal(key, e.to_string()))?,
            None => format!("{:?}", any),
        },
    };
    Ok(text)
}
