use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::domain::email::Email;
use crate::error::QueueItemError;

pub const DEFAULT_DRAIN_DELAY: Duration = Duration::from_millis(100);

/// Receives drained emails, one at a time.
pub trait InboxSink {
    fn deliver(&mut self, email: Email) -> Result<(), QueueItemError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrainState {
    #[default]
    Idle,
    /// A drain loop owns the queue; its next step runs at `next_due`.
    Draining { next_due: Instant },
}

/// FIFO buffer between incoming webhook events and the mailbox.
///
/// Draining is throttled: one item is delivered per `delay`, so a burst of
/// arrivals trickles into the list instead of replacing it at once. Only one
/// drain loop can be active; the loop keeps picking up items enqueued while it
/// runs and releases itself once it finds the queue empty.
#[derive(Debug)]
pub struct IngestionQueue {
    pending: VecDeque<Email>,
    state: DrainState,
    delay: Duration,
}

impl IngestionQueue {
    pub fn new(delay: Duration) -> Self {
        Self {
            pending: VecDeque::new(),
            state: DrainState::Idle,
            delay,
        }
    }

    pub fn enqueue(&mut self, email: Email) {
        self.pending.push_back(email);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_draining(&self) -> bool {
        matches!(self.state, DrainState::Draining { .. })
    }

    pub fn state(&self) -> DrainState {
        self.state
    }

    /// Starts a drain loop. Returns false without doing anything when a loop
    /// is already active or there is nothing to drain.
    pub fn drain(&mut self, now: Instant, sink: &mut dyn InboxSink) -> bool {
        if !self.try_begin(now) {
            return false;
        }
        self.step(now, sink);
        true
    }

    /// Advances an active drain loop. Returns the number of items delivered.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn InboxSink) -> usize {
        let mut delivered = 0;
        while let DrainState::Draining { next_due } = self.state {
            if now < next_due {
                break;
            }
            if !self.step(next_due, sink) {
                break;
            }
            delivered += 1;
        }
        delivered
    }

    /// Check-and-set on the drain state.
    fn try_begin(&mut self, now: Instant) -> bool {
        match self.state {
            DrainState::Draining { .. } => false,
            DrainState::Idle if self.pending.is_empty() => false,
            DrainState::Idle => {
                self.state = DrainState::Draining { next_due: now };
                true
            }
        }
    }

    /// Delivers the head item and schedules the next step, or releases the
    /// loop when the queue is empty. Returns whether an item was taken.
    fn step(&mut self, at: Instant, sink: &mut dyn InboxSink) -> bool {
        let Some(email) = self.pending.pop_front() else {
            self.state = DrainState::Idle;
            debug!("drain finished");
            return false;
        };

        if let Err(e) = sink.deliver(email) {
            warn!("error processing email queue: {e}");
        }
        self.state = DrainState::Draining {
            next_due: at + self.delay,
        };
        true
    }
}

impl Default for IngestionQueue {
    fn default() -> Self {
        Self::new(DEFAULT_DRAIN_DELAY)
    }
}
