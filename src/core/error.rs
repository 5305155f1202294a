//! Error types for the Slack log sink

pub type Result<T> = std::result::Result<T, SinkError>;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A rendering hook refused to render its input
    #[error("Render error ({hook}): {message}")]
    RenderError { hook: String, message: String },

    /// An opaque attribute value failed to marshal itself to text
    #[error("Failed to marshal attribute '{key}' to text: {message}")]
    TextMarshal { key: String, message: String },

    /// Transport-level failure while posting the message
    #[cfg(feature = "http")]
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The webhook endpoint answered with a non-success status
    #[error("Webhook rejected message with status {status}: {body}")]
    WebhookRejected { status: u16, body: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A background dispatch panicked before completing
    #[error("Background dispatch panicked: {0}")]
    DispatchPanicked(String),

    /// A background dispatch was cancelled by the runtime
    #[error("Background dispatch was cancelled before completing")]
    DispatchCancelled,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl SinkError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a render error for the named hook
    pub fn render(hook: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::RenderError {
            hook: hook.into(),
            message: message.into(),
        }
    }

    /// Create a text marshaling error
    pub fn text_marshal(key: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::TextMarshal {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a rejected-webhook error
    pub fn webhook_rejected(status: u16, body: impl Into<String>) -> Self {
        SinkError::WebhookRejected {
            status,
            body: body.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SinkError::Other(msg.into())
    }

    /// Whether this error was raised while validating configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, SinkError::InvalidConfiguration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SinkError::config("SlackHandler", "webhook URL is required");
        assert!(matches!(err, SinkError::InvalidConfiguration { .. }));
        assert!(err.is_configuration());

        let err = SinkError::render("level", "unsupported level");
        assert!(matches!(err, SinkError::RenderError { .. }));
        assert!(!err.is_configuration());

        let err = SinkError::webhook_rejected(404, "no_service");
        assert!(matches!(err, SinkError::WebhookRejected { status: 404, .. }));
    }

    #[test]
    fn test_error_display() {
        let err = SinkError::config("SlackHandler", "webhook URL is required");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for SlackHandler: webhook URL is required"
        );

        let err = SinkError::render("attr", "bad value");
        assert_eq!(err.to_string(), "Render error (attr): bad value");

        let err = SinkError::webhook_rejected(400, "invalid_blocks");
        assert_eq!(
            err.to_string(),
            "Webhook rejected message with status 400: invalid_blocks"
        );

        let err = SinkError::text_marshal("user.id", "not printable");
        assert_eq!(
            err.to_string(),
            "Failed to marshal attribute 'user.id' to text: not printable"
        );
    }
}
