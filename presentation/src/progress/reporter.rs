//! Waiting indicator shown between submitting a message and the first
//! answer fragment.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(80);

/// Spinner on stderr that disappears without a trace when cleared.
///
/// A disabled spinner is a no-op, so callers never branch on `--quiet`.
pub struct ResponseSpinner {
    bar: Option<ProgressBar>,
}

impl ResponseSpinner {
    pub fn start(message: impl Into<String>, enabled: bool) -> Self {
        if !enabled {
            return Self::hidden();
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.into());
        bar.enable_steady_tick(TICK);
        Self { bar: Some(bar) }
    }

    pub fn hidden() -> Self {
        Self { bar: None }
    }

    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    /// Remove the spinner line. Safe to call more than once.
    pub fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for ResponseSpinner {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner_is_inert() {
        let mut spinner = ResponseSpinner::start("Thinking...", false);
        assert!(!spinner.is_active());
        spinner.clear();
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut spinner = ResponseSpinner::start("Thinking...", true);
        assert!(spinner.is_active());
        spinner.clear();
        spinner.clear();
        assert!(!spinner.is_active());
    }
}
