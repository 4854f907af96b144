use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::model::{Model, StoreError};

/// The record whose communication log receives a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageTarget {
    /// Collection of the target record.
    pub model: String,
    pub res_id: String,
}

impl MessageTarget {
    pub fn new(model: impl Into<String>, res_id: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            res_id: res_id.into(),
        }
    }

    pub fn of<M: Model>(id: &str) -> Self {
        Self::new(M::COLLECTION, id)
    }
}

/// A message as handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedMessage {
    pub target: MessageTarget,
    pub subject: Option<String>,
    pub body: String,
    pub channel: String,
}

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("message buffer poisoned")]
    BufferPoisoned,
    #[error("message encoding failed: {0}")]
    Encode(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Trait for delivering messages to a record's communication log.
pub trait MessagingSink {
    /// Post one message. `channel` tags the kind of message (e.g. "comment").
    fn post(
        &self,
        target: &MessageTarget,
        subject: Option<&str>,
        body: &str,
        channel: &str,
    ) -> Result<(), MessagingError>;
}

/// Collects posted messages in a shared buffer.
#[derive(Clone, Default)]
pub struct BufferSink {
    buffer: Arc<Mutex<Vec<PostedMessage>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<PostedMessage>>>) -> Self {
        Self { buffer }
    }

    /// Snapshot of everything posted so far.
    pub fn messages(&self) -> Vec<PostedMessage> {
        match self.buffer.lock() {
            Ok(buffer) => buffer.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl MessagingSink for BufferSink {
    fn post(
        &self,
        target: &MessageTarget,
        subject: Option<&str>,
        body: &str,
        channel: &str,
    ) -> Result<(), MessagingError> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| MessagingError::BufferPoisoned)?;
        buffer.push(PostedMessage {
            target: target.clone(),
            subject: subject.map(str::to_string),
            body: body.to_string(),
            channel: channel.to_string(),
        });
        Ok(())
    }
}

/// Writes each message to the `tracing` log and nowhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl MessagingSink for LogSink {
    fn post(
        &self,
        target: &MessageTarget,
        subject: Option<&str>,
        body: &str,
        channel: &str,
    ) -> Result<(), MessagingError> {
        info!(
            model = %target.model,
            res_id = %target.res_id,
            subject = subject.unwrap_or_default(),
            channel,
            body,
            "message posted"
        );
        Ok(())
    }
}

/// Emits each message as a JSON `message.posted` event for in-process subscribers.
#[cfg(feature = "emitter")]
pub struct EmitterSink {
    emitter: Mutex<crate::EventEmitter>,
}

#[cfg(feature = "emitter")]
impl EmitterSink {
    pub const EVENT: &'static str = "message.posted";

    pub fn new(emitter: crate::EventEmitter) -> Self {
        Self {
            emitter: Mutex::new(emitter),
        }
    }
}

#[cfg(feature = "emitter")]
impl MessagingSink for EmitterSink {
    fn post(
        &self,
        target: &MessageTarget,
        subject: Option<&str>,
        body: &str,
        channel: &str,
    ) -> Result<(), MessagingError> {
        let message = PostedMessage {
            target: target.clone(),
            subject: subject.map(str::to_string),
            body: body.to_string(),
            channel: channel.to_string(),
        };
        let payload =
            serde_json::to_string(&message).map_err(|e| MessagingError::Encode(e.to_string()))?;
        self.emitter
            .lock()
            .map_err(|_| MessagingError::BufferPoisoned)?
            .emit(Self::EVENT, payload);
        Ok(())
    }
}
