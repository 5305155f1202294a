//! Slack rendering and delivery

pub mod config;
pub mod formatter;
pub mod handler;
pub mod message;
pub mod transport;

pub use config::{FormatterConfig, HandlerConfig};
pub use formatter::{
    render_level_default, render_source_default, render_value, AttrRenderer, FormatterOptions,
    LevelRenderer, RecordFormatter, RenderContext, SlackMessageFormatter, SourceRenderer,
    TimeRenderer, DEFAULT_SOURCE_PREFIX, DEFAULT_TIME_PREFIX,
};
pub use handler::{ErrorCallback, SlackHandler, SlackHandlerBuilder};
pub use message::{Block, ContextElement, TextObject, TextType, WebhookMessage};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::Transport;
