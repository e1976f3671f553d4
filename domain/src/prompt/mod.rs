//! Prompt composition under a token budget.

pub mod composer;

pub use composer::{
    ASSISTANT_CUE, ComposedPrompt, Composition, MAX_TOKENS, PromptComposer, SNIP_MARKER,
    approximate_token_count, render_turns,
};
