//! Test transports shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use slack_log_sink::core::{Result, SinkError};
use slack_log_sink::slack::{Block, Transport, WebhookMessage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Records every posted message, optionally after a delay
#[derive(Default)]
pub struct RecordingTransport {
    messages: Mutex<Vec<(String, WebhookMessage)>>,
    completed: AtomicUsize,
    delay: Option<Duration>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<WebhookMessage> {
        self.messages.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn urls(&self) -> Vec<String> {
        self.messages.lock().iter().map(|(u, _)| u.clone()).collect()
    }

    /// Text of every attribute block of the `index`-th message
    pub fn attr_texts(&self, index: usize) -> Vec<String> {
        self.messages()[index].blocks[5..]
            .iter()
            .filter_map(Block::text)
            .collect()
    }

    /// Body text of every posted message, in completion order
    pub fn bodies(&self) -> Vec<String> {
        self.messages()
            .iter()
            .filter_map(|m| m.blocks.get(4).and_then(Block::text))
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post(&self, url: &str, message: &WebhookMessage) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.messages
            .lock()
            .push((url.to_string(), message.clone()));
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Rejects every message the way a revoked webhook does
#[derive(Default)]
pub struct FailingTransport {
    attempts: AtomicUsize,
}

impl FailingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FailingTransport {
    async fn post(&self, _url: &str, _message: &WebhookMessage) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::webhook_rejected(404, "no_service"))
    }
}

/// Panics on every post
pub struct PanickingTransport;

#[async_trait]
impl Transport for PanickingTransport {
    async fn post(&self, _url: &str, _message: &WebhookMessage) -> Result<()> {
        panic!("transport exploded");
    }
}
