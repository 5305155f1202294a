//! Slack Block Kit message model
//!
//! Only the block and element types the formatter emits are modeled.
//! Serializes to the JSON body an incoming webhook expects:
//!
//! ```json
//! {"blocks":[{"type":"divider"},
//!            {"type":"context","elements":[{"type":"mrkdwn","text":"..."}]},
//!            {"type":"section","text":{"type":"mrkdwn","text":"..."}}]}
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextType {
    #[serde(rename = "mrkdwn")]
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: TextType,
    pub text: String,
}

impl TextObject {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            kind: TextType::Markdown,
            text: text.into(),
        }
    }
}

/// Element of a context block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContextElement {
    #[serde(rename = "image")]
    Image { image_url: String, alt_text: String },
    #[serde(rename = "mrkdwn")]
    Markdown { text: String },
}

impl ContextElement {
    pub fn markdown(text: impl Into<String>) -> Self {
        ContextElement::Markdown { text: text.into() }
    }

    pub fn image(image_url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        ContextElement::Image {
            image_url: image_url.into(),
            alt_text: alt_text.into(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ContextElement::Markdown { text } => Some(text),
            ContextElement::Image { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Divider,
    Context { elements: Vec<ContextElement> },
    Section { text: TextObject },
}

impl Block {
    pub fn context(elements: Vec<ContextElement>) -> Self {
        Block::Context { elements }
    }

    /// Context block holding a single markdown element
    pub fn context_text(text: impl Into<String>) -> Self {
        Block::Context {
            elements: vec![ContextElement::markdown(text)],
        }
    }

    pub fn section(text: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::markdown(text),
        }
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, Block::Divider)
    }

    /// Markdown text of the block, joined with newlines for multi-element contexts
    pub fn text(&self) -> Option<String> {
        match self {
            Block::Divider => None,
            Block::Section { text } => Some(text.text.clone()),
            Block::Context { elements } => {
                let texts: Vec<&str> = elements.iter().filter_map(ContextElement::text).collect();
                if texts.is_empty() {
                    None
                } else {
                    Some(texts.join("\n"))
                }
            }
        }
    }
}

/// Rendered message posted to the webhook
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub blocks: Vec<Block>,
}

impl WebhookMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
