use std::time::{Duration, Instant};

pub const DEFAULT_SENT_CONFIRM: Duration = Duration::from_secs(1);

/// Reply composition state.
///
/// `Sending` is the visible "sent" confirmation; the mailbox is only changed
/// once it elapses and nothing can cancel it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReplyState {
    #[default]
    Idle,
    Composing { draft: String },
    Confirming { draft: String },
    Sending { draft: String, until: Instant },
}

impl ReplyState {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Composing { draft }
            | Self::Confirming { draft }
            | Self::Sending { draft, .. } => Some(draft),
        }
    }

    /// Starts a fresh draft, dropping any previous one.
    pub fn begin(&mut self) {
        *self = Self::Composing {
            draft: String::new(),
        };
    }

    pub fn push_char(&mut self, c: char) {
        if let Self::Composing { draft } = self {
            draft.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Self::Composing { draft } = self {
            draft.pop();
        }
    }

    /// First cancel asks for confirmation, second one discards.
    pub fn cancel(&mut self) {
        *self = match std::mem::take(self) {
            Self::Composing { draft } => Self::Confirming { draft },
            Self::Confirming { .. } => Self::Idle,
            other => other,
        };
    }

    pub fn keep_editing(&mut self) {
        *self = match std::mem::take(self) {
            Self::Confirming { draft } => Self::Composing { draft },
            other => other,
        };
    }

    /// Returns false unless the reply was waiting for confirmation.
    pub fn send(&mut self, now: Instant, confirm_for: Duration) -> bool {
        match std::mem::take(self) {
            Self::Confirming { draft } => {
                *self = Self::Sending {
                    draft,
                    until: now + confirm_for,
                };
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Completes a send whose confirmation has elapsed, returning the text.
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        if !matches!(self, Self::Sending { until, .. } if now >= *until) {
            return None;
        }
        match std::mem::take(self) {
            Self::Sending { draft, .. } => Some(draft),
            _ => None,
        }
    }
}
