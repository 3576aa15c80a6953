//! "Assistant is typing" spinner

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

/// Spinner shown between sending a turn and its first text.
///
/// Draws on stderr, so it never mixes into the transcript on stdout and
/// disappears entirely when stderr is not a terminal.
pub struct TypingIndicator {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl TypingIndicator {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Start spinning. A running spinner is left alone.
    pub fn start(&mut self, message: &str) {
        if !self.enabled || self.bar.is_some() {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(TICK);
        self.bar = Some(bar);
    }

    /// Stop and erase the spinner.
    pub fn stop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.bar.is_some()
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        self.stop();
    }
}
