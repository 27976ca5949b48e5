use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::Config;
use crate::domain::email::{Email, WebhookEvent};
use crate::ingest::queue::IngestionQueue;
use crate::review::mailbox::{Anchor, Mailbox};
use crate::review::reply::ReplyState;
use crate::review::training::TrainingSession;
use crate::session::Session;

/// Tunables the state machine needs from the config.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub drain_delay: Duration,
    pub sent_confirm: Duration,
    pub window_size: usize,
    pub window_lead: usize,
    pub score_step: i32,
}

impl From<&Config> for Settings {
    fn from(cfg: &Config) -> Self {
        Self {
            drain_delay: cfg.drain_delay(),
            sent_confirm: cfg.sent_confirm(),
            window_size: cfg.window_size,
            window_lead: cfg.window_lead,
            score_step: cfg.score_step,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

pub struct AppState {
    pub settings: Settings,
    pub session: Session,
    pub mailbox: Mailbox,
    pub queue: IngestionQueue,
    pub reply: ReplyState,
    pub training: Option<TrainingSession>,
    /// Email the reply being sent answers.
    reply_target: Option<Anchor>,
}

impl AppState {
    pub fn new(emails: Vec<Email>, settings: Settings) -> Self {
        Self {
            settings,
            session: Session::new(),
            mailbox: Mailbox::new(emails),
            queue: IngestionQueue::new(settings.drain_delay),
            reply: ReplyState::Idle,
            training: None,
            reply_target: None,
        }
    }

    /// An email arrived out of band: queue it and kick the drain loop.
    pub fn on_webhook(&mut self, ev: WebhookEvent, now: Instant) {
        let email = Email::from(ev);
        debug!("queueing email from {}", email.sender_email);
        self.queue.enqueue(email);
        self.queue.drain(now, &mut self.mailbox);
    }

    /// Advances timers: the drain loop and a pending "sent" confirmation.
    pub fn tick(&mut self, now: Instant) {
        self.queue.tick(now, &mut self.mailbox);

        if let Some(text) = self.reply.tick(now) {
            let removed = match self.reply_target.take() {
                Some(anchor) => self.mailbox.remove_anchored(anchor),
                None => self.mailbox.delete_current(),
            };
            if let Some(email) = removed {
                info!(
                    "reply sent to {} ({} chars)",
                    email.sender_email,
                    text.chars().count()
                );
            }
        }
    }

    /// Confirms the reply and pins the email it answers, so mail arriving
    /// during the confirmation doesn't change what gets removed.
    pub fn send_reply(&mut self, now: Instant) -> bool {
        if !self.reply.send(now, self.settings.sent_confirm) {
            return false;
        }
        self.reply_target = self.mailbox.anchor_current();
        true
    }

    pub fn start_training(&mut self) {
        self.training = TrainingSession::start(self.mailbox.emails());
        if let Some(t) = &self.training {
            info!("training started over {} emails", t.emails().len());
        }
    }

    pub fn is_loading(&self) -> bool {
        self.queue.is_draining()
    }

    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    /// Back to the login gate. Mailbox contents survive a logout.
    pub fn logout(&mut self) {
        self.reply = ReplyState::Idle;
        self.reply_target = None;
        self.training = None;
        self.session.logout();
    }
}
