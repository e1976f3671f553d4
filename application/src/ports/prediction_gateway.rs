//! Prediction Gateway port
//!
//! Defines how the application creates predictions on the model backend and
//! subscribes to their output streams.

use async_trait::async_trait;
use basilisk_domain::{Settings, StreamEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend answered the creation request with something other than 201.
    /// `detail` is the backend's own message and is shown verbatim.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Stream error: {0}")]
    StreamError(String),
}

/// Body of the prediction-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub version: String,
    pub prompt: String,
    pub system_prompt: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

impl PredictionRequest {
    /// Build a request from the current settings and a composed prompt.
    pub fn new(settings: &Settings, prompt: impl Into<String>) -> Self {
        Self {
            version: settings.version.version_id().to_string(),
            prompt: prompt.into(),
            system_prompt: settings.system_prompt.clone(),
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_tokens: settings.max_tokens,
        }
    }
}

/// Backend reference to a created prediction, used to open its stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionHandle {
    pub id: Option<String>,
    pub stream_url: String,
}

impl PredictionHandle {
    pub fn new(id: Option<String>, stream_url: impl Into<String>) -> Self {
        Self {
            id,
            stream_url: stream_url.into(),
        }
    }
}

/// Producer side of a [`StreamSubscription`].
///
/// Held by whatever task owns the underlying connection. Once the
/// subscription is closed or dropped, `send` returns `false` and
/// [`cancelled`](Self::cancelled) resolves, so the producer can shut its
/// connection down.
#[derive(Debug, Clone)]
pub struct StreamSink {
    sender: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
}

impl StreamSink {
    /// Deliver an event. Returns `false` if the subscriber is gone.
    pub async fn send(&self, event: StreamEvent) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.sender.send(event).await.is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves when the subscriber closes or drops the subscription.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

/// Consumer side of a prediction stream.
///
/// Closing (explicitly or by dropping) cancels the producer and closes the
/// channel together, so no event sent afterwards is ever received.
#[derive(Debug)]
pub struct StreamSubscription {
    receiver: mpsc::Receiver<StreamEvent>,
    cancel: CancellationToken,
}

impl StreamSubscription {
    /// Create a connected sink/subscription pair.
    pub fn channel(capacity: usize) -> (StreamSink, StreamSubscription) {
        let (sender, receiver) = mpsc::channel(capacity);
        let cancel = CancellationToken::new();
        (
            StreamSink {
                sender,
                cancel: cancel.clone(),
            },
            StreamSubscription { receiver, cancel },
        )
    }

    /// Wait for the next event. `None` once the stream is closed and drained.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.receiver.recv().await
    }

    pub fn close(&mut self) {
        self.cancel.cancel();
        self.receiver.close();
    }
}

impl Drop for StreamSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Gateway to the prediction backend
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait PredictionGateway: Send + Sync {
    /// Create a prediction and return the handle of its output stream.
    async fn create_prediction(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionHandle, GatewayError>;

    /// Open the output stream of a prediction.
    async fn subscribe(&self, handle: &PredictionHandle)
    -> Result<StreamSubscription, GatewayError>;
}
