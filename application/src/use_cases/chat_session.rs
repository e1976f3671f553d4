//! Chat session use case.
//!
//! [`ChatSession`] owns everything a single conversation needs: the
//! transcript, the live answer buffer, the settings and at most one open
//! prediction stream. It is driven from one task:
//!
//! ```text
//! submit(text) ──► compose prompt ──► create prediction ──► subscribe
//!                                                             │
//! next_update() ◄── output / done / error ◄───────────────────┘
//! ```
//!
//! A new submission always closes the open stream before doing anything
//! else, so fragments of an abandoned answer can never reach the new buffer.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::prediction_gateway::{
    GatewayError, PredictionGateway, PredictionHandle, PredictionRequest, StreamSubscription,
};
use basilisk_domain::util::preview;
use basilisk_domain::{
    CommitPolicy, ComposeError, ComposedPrompt, ConversationHistory, PromptComposer, Settings,
    StreamEvent, StreamingBuffer,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const STREAM_CLOSED_MESSAGE: &str = "Prediction stream closed before completion";

/// Errors returned by [`ChatSession::submit`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Detected locally; no request was sent.
    #[error(transparent)]
    MessageTooLong(#[from] ComposeError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// A successfully started prediction.
#[derive(Debug, Clone)]
pub struct Submission {
    pub handle: PredictionHandle,
    pub prompt: ComposedPrompt,
}

/// What changed after a stream event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatUpdate {
    /// A fragment was appended. `first` is set for the first fragment of an
    /// answer, which is when the loading indicator goes away.
    Fragment { text: String, first: bool },
    /// The answer finished. `committed` tells whether it is already in the
    /// history (eager policy) or waits for the next submission (lazy).
    Completed { answer: String, committed: bool },
    /// The stream failed. Already displayed text is kept but not committed.
    Failed { message: String },
}

impl ChatUpdate {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChatUpdate::Fragment { .. })
    }
}

/// One conversation with the prediction backend.
pub struct ChatSession {
    gateway: Arc<dyn PredictionGateway>,
    composer: PromptComposer,
    commit_policy: CommitPolicy,
    settings: Settings,
    history: ConversationHistory,
    buffer: StreamingBuffer,
    subscription: Option<StreamSubscription>,
    handle: Option<PredictionHandle>,
    loading: bool,
    last_error: Option<String>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ChatSession {
    pub fn new(gateway: Arc<dyn PredictionGateway>, settings: Settings) -> Self {
        Self {
            gateway,
            composer: PromptComposer::default(),
            commit_policy: CommitPolicy::default(),
            settings,
            history: ConversationHistory::new(),
            buffer: StreamingBuffer::new(),
            subscription: None,
            handle: None,
            loading: false,
            last_error: None,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_commit_policy(mut self, policy: CommitPolicy) -> Self {
        self.commit_policy = policy;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// The answer currently shown below the history.
    pub fn buffer(&self) -> &StreamingBuffer {
        &self.buffer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    pub fn commit_policy(&self) -> CommitPolicy {
        self.commit_policy
    }

    /// True between a successful submission and the first fragment.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True while a prediction stream is open.
    pub fn is_streaming(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn active_handle(&self) -> Option<&PredictionHandle> {
        self.handle.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Submit a user message and start streaming the answer.
    ///
    /// Any open stream is closed first. If the prompt cannot be brought
    /// under budget, nothing is sent and the history is left as it was.
    pub async fn submit(&mut self, message: &str) -> Result<Submission, ChatError> {
        self.close_stream();
        self.last_error = None;

        // Work on a copy so a rejected message leaves the pending answer alone
        let mut staged = self.buffer.clone();
        let pending = staged.take_turn();

        let composition = match self.composer.compose_submission(&self.history, pending, message)
        {
            Ok(composition) => composition,
            Err(e) => {
                warn!(
                    "Prompt over budget ({} turns, max {} tokens)",
                    self.history.len() + 1,
                    self.composer.max_tokens()
                );
                self.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        let added = composition.history.len() - self.history.len();
        for turn in &composition.history.turns()[self.history.len()..] {
            self.conversation_logger.log(ConversationEvent::turn(turn));
        }
        debug!("Appended {} turn(s) to history", added);

        self.history = composition.history;
        self.buffer = staged;
        let prompt = composition.prompt;

        if prompt.truncated() {
            info!(
                "Prompt truncated: {} pass(es), {} of {} turns kept",
                prompt.passes,
                prompt.turns.len(),
                self.history.len()
            );
            self.conversation_logger.log(ConversationEvent::PromptTruncated {
                passes: prompt.passes,
                kept_turns: prompt.turns.len(),
                total_turns: self.history.len(),
            });
        }

        let request = PredictionRequest::new(&self.settings, prompt.text.clone());
        info!(
            "Creating prediction: version={} tokens~{} message='{}'",
            self.settings.version.short_name(),
            prompt.estimated_tokens,
            preview(message, 60)
        );

        let handle = match self.gateway.create_prediction(&request).await {
            Ok(handle) => handle,
            Err(e) => {
                self.record_gateway_error(&e);
                return Err(e.into());
            }
        };

        let subscription = match self.gateway.subscribe(&handle).await {
            Ok(subscription) => subscription,
            Err(e) => {
                self.record_gateway_error(&e);
                return Err(e.into());
            }
        };

        self.conversation_logger.log(ConversationEvent::PredictionCreated {
            id: handle.id.clone(),
            stream_url: handle.stream_url.clone(),
            version: request.version.clone(),
            prompt_tokens: prompt.estimated_tokens,
        });

        self.buffer.begin();
        self.loading = true;
        self.subscription = Some(subscription);
        self.handle = Some(handle.clone());

        Ok(Submission { handle, prompt })
    }

    /// Wait for the next stream event and apply it.
    ///
    /// Returns `None` when no stream is open. A stream that ends without a
    /// terminal event is reported as a failure.
    pub async fn next_update(&mut self) -> Option<ChatUpdate> {
        loop {
            let subscription = self.subscription.as_mut()?;
            let event = subscription
                .recv()
                .await
                .unwrap_or_else(|| StreamEvent::Error(STREAM_CLOSED_MESSAGE.to_string()));
            if let Some(update) = self.apply(event) {
                return Some(update);
            }
        }
    }

    /// Drive the open stream to its end, calling `on_update` for every
    /// update. Returns the terminal update, if a stream was open.
    pub async fn stream_to_end<F>(&mut self, mut on_update: F) -> Option<ChatUpdate>
    where
        F: FnMut(&ChatUpdate),
    {
        while let Some(update) = self.next_update().await {
            on_update(&update);
            if update.is_terminal() {
                return Some(update);
            }
        }
        None
    }

    /// Close the open stream, if any. A partially received answer is kept
    /// and will be committed with the next submission.
    pub fn close(&mut self) {
        self.close_stream();
    }

    fn apply(&mut self, event: StreamEvent) -> Option<ChatUpdate> {
        match event {
            StreamEvent::Output(fragment) => {
                if !self.buffer.append(&fragment) {
                    debug!("Dropping fragment for an inactive buffer");
                    return None;
                }
                let first = self.buffer.fragment_count() == 1;
                if first {
                    self.loading = false;
                }
                Some(ChatUpdate::Fragment {
                    text: fragment,
                    first,
                })
            }
            StreamEvent::Done => {
                self.release_subscription();
                self.buffer.complete();

                let committed = match self.commit_policy {
                    CommitPolicy::Eager => match self.buffer.take_turn() {
                        Some(turn) => {
                            self.conversation_logger.log(ConversationEvent::turn(&turn));
                            self.history.push(turn);
                            true
                        }
                        None => false,
                    },
                    CommitPolicy::Lazy => false,
                };

                info!(
                    "Prediction completed: {} fragment(s), {} chars",
                    self.buffer.fragment_count(),
                    self.buffer.text().chars().count()
                );
                Some(ChatUpdate::Completed {
                    answer: self.buffer.text().to_string(),
                    committed,
                })
            }
            StreamEvent::Error(message) => {
                self.release_subscription();
                self.buffer.fail();

                warn!("Prediction stream failed: {}", message);
                self.conversation_logger.log(ConversationEvent::StreamError {
                    message: message.clone(),
                    partial_chars: self.buffer.text().chars().count(),
                });
                self.last_error = Some(message.clone());
                Some(ChatUpdate::Failed { message })
            }
        }
    }

    fn close_stream(&mut self) {
        if self.subscription.is_some() {
            debug!("Closing open prediction stream");
            self.release_subscription();
            self.buffer.interrupt();
        }
    }

    fn release_subscription(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.close();
        }
        self.handle = None;
        self.loading = false;
    }

    fn record_gateway_error(&mut self, error: &GatewayError) {
        warn!("Prediction request failed: {}", error);
        self.last_error = Some(error.to_string());
    }
}
