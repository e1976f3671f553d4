//! Token-budgeted prompt composition.
//!
//! Renders the conversation into a single instruction-style prompt and drops
//! older turns until the estimate fits the budget. The first turn is always
//! kept as an anchor for the conversation's context.
//!
//! # Format
//!
//! ```text
//! <!-- snip -->            (only when turns were dropped)
//! [INST] question [/INST]
//! answer
//! [INST] follow-up [/INST]
//! Assistant:
//! ```

use crate::conversation::entities::{ConversationHistory, Turn};
use crate::core::error::ComposeError;

/// Default budget for the composed prompt, in estimated tokens.
pub const MAX_TOKENS: usize = 4096;

/// Inserted at the top of the prompt once history has been dropped.
pub const SNIP_MARKER: &str = "<!-- snip -->";

/// Trailing cue that hands the turn to the model.
pub const ASSISTANT_CUE: &str = "Assistant:";

/// Smallest transcript that can still be truncated: the anchor turn plus the
/// two turns removed in one pass.
const MIN_TRUNCATABLE_TURNS: usize = 3;

/// Estimate the token count of `text` as `ceil(chars * 0.4)`.
///
/// This is a heuristic, not a tokenizer. Computed in integer arithmetic so
/// the result is the exact ceiling of `2 * chars / 5`.
pub fn approximate_token_count(text: &str) -> usize {
    let chars = text.chars().count();
    (chars * 2).div_ceil(5)
}

/// Render turns into the instruction format, one per line.
pub fn render_turns(turns: &[Turn]) -> String {
    turns.iter().map(Turn::render).collect::<Vec<_>>().join("\n")
}

/// A prompt that fits the budget, plus what was kept to build it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    /// Full text to send, ending with [`ASSISTANT_CUE`].
    pub text: String,
    /// Turns that made it into the prompt, in order.
    pub turns: Vec<Turn>,
    /// Number of truncation passes (each drops two turns).
    pub passes: usize,
    /// Estimated token count of `text`.
    pub estimated_tokens: usize,
}

impl ComposedPrompt {
    pub fn truncated(&self) -> bool {
        self.passes > 0
    }
}

/// Result of preparing a submission: the canonical history with the new
/// turns appended, and the bounded prompt built from a copy of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub history: ConversationHistory,
    pub prompt: ComposedPrompt,
}

/// Builds prompts under a fixed token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptComposer {
    max_tokens: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(MAX_TOKENS)
    }
}

impl PromptComposer {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Append the pending assistant turn (if any) and the new user message
    /// to a copy of `history`, then compose a prompt from it.
    ///
    /// `history` itself is never modified; on error nothing is lost.
    pub fn compose_submission(
        &self,
        history: &ConversationHistory,
        pending_answer: Option<Turn>,
        message: &str,
    ) -> Result<Composition, ComposeError> {
        let mut updated = history.clone();
        if let Some(answer) = pending_answer {
            updated.push(answer);
        }
        updated.push(Turn::user(message));

        let prompt = self.compose(updated.turns())?;
        Ok(Composition {
            history: updated,
            prompt,
        })
    }

    /// Compose a prompt from `turns`, dropping the second and third turn
    /// until the estimate fits.
    pub fn compose(&self, turns: &[Turn]) -> Result<ComposedPrompt, ComposeError> {
        let mut kept = turns.to_vec();
        let mut passes = 0;
        let mut text = Self::candidate(&kept, false);
        let mut estimated = approximate_token_count(&text);

        while estimated > self.max_tokens {
            if kept.len() < MIN_TRUNCATABLE_TURNS {
                let message = turns
                    .last()
                    .filter(|t| t.is_user())
                    .map(|t| t.text().to_string())
                    .unwrap_or_default();
                return Err(ComposeError::MessageTooLong {
                    message,
                    estimated_tokens: estimated,
                    max_tokens: self.max_tokens,
                });
            }

            kept.drain(1..3);
            passes += 1;
            text = Self::candidate(&kept, true);
            estimated = approximate_token_count(&text);
        }

        Ok(ComposedPrompt {
            text,
            turns: kept,
            passes,
            estimated_tokens: estimated,
        })
    }

    fn candidate(turns: &[Turn], snipped: bool) -> String {
        let body = render_turns(turns);
        if snipped {
            format!("{SNIP_MARKER}\n{body}\n{ASSISTANT_CUE}")
        } else {
            format!("{body}\n{ASSISTANT_CUE}")
        }
    }
}
