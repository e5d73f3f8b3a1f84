use std::time::Duration;

use crate::effect::{Effect, TimerId};
use crate::msg::{Key, Msg};

pub const INFO_TIMEOUT: Duration = Duration::from_secs(4);
pub const PROGRESS_TIMEOUT: Duration = Duration::from_secs(2);
pub const ERROR_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

/// Single-slot status area. A new message replaces the current one and
/// restarts expiry; timers armed for older messages are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBar {
    message: Option<StatusMessage>,
    generation: u64,
    show_help: bool,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `text` and returns the timer effect that will expire it.
    pub fn set(&mut self, text: impl Into<String>, severity: Severity, after: Duration) -> Effect {
        self.generation += 1;
        self.message = Some(StatusMessage {
            text: text.into(),
            severity,
        });
        Effect::StartTimer {
            timer: TimerId::StatusExpiry(self.generation),
            after,
        }
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Offers an event to the status area. Returns `true` if it was consumed.
    ///
    /// `?` toggles the help line unless the active screen is taking text.
    pub fn offer(&mut self, msg: &Msg, text_input: bool) -> bool {
        match msg {
            Msg::TimerFired(TimerId::StatusExpiry(generation)) => {
                if *generation == self.generation {
                    self.message = None;
                }
                true
            }
            Msg::Key(Key::Char('?')) if !text_input => {
                self.show_help = !self.show_help;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_message_preempts_and_outlives_old_timer() {
        let mut bar = StatusBar::new();
        let first = bar.set("one", Severity::Info, INFO_TIMEOUT);
        let second = bar.set("two", Severity::Error, ERROR_TIMEOUT);
        assert_ne!(first, second);
        assert_eq!(bar.message().map(|m| m.text.as_str()), Some("two"));

        assert!(bar.offer(&Msg::TimerFired(TimerId::StatusExpiry(1)), false));
        assert_eq!(bar.message().map(|m| m.text.as_str()), Some("two"));

        assert!(bar.offer(&Msg::TimerFired(TimerId::StatusExpiry(2)), false));
        assert!(bar.message().is_none());
    }

    #[test]
    fn question_mark_toggles_help_outside_text_input() {
        let mut bar = StatusBar::new();
        assert!(bar.offer(&Msg::Key(Key::Char('?')), false));
        assert!(bar.show_help());
        assert!(!bar.offer(&Msg::Key(Key::Char('?')), true));
        assert!(bar.show_help());
        assert!(!bar.offer(&Msg::Key(Key::Char('x')), false));
    }
}
