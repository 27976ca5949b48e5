use std::ops::RangeInclusive;

use crate::domain::email::{DEFAULT_TRAINING_SCORE, Email};

pub const SCORE_RANGE: RangeInclusive<i32> = 490..=510;
pub const DEFAULT_SCORE_STEP: i32 = 2;

/// A scoring pass over a detached copy of the mailbox.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    emails: Vec<Email>,
    index: usize,
    complete: bool,
}

impl TrainingSession {
    /// Snapshots `emails`; unscored ones start at the neutral score.
    /// Returns `None` when there is nothing to score.
    pub fn start(emails: &[Email]) -> Option<Self> {
        if emails.is_empty() {
            return None;
        }
        let emails = emails
            .iter()
            .cloned()
            .map(|mut e| {
                if e.user_score == 0 {
                    e.user_score = DEFAULT_TRAINING_SCORE;
                }
                e
            })
            .collect();
        Some(Self {
            emails,
            index: 0,
            complete: false,
        })
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn current(&self) -> &Email {
        &self.emails[self.index]
    }

    pub fn adjust_score(&mut self, delta: i32) {
        let email = &mut self.emails[self.index];
        email.user_score = email
            .user_score
            .saturating_add(delta)
            .clamp(*SCORE_RANGE.start(), *SCORE_RANGE.end());
    }

    /// Moves to the next email, or flags completion on the last one.
    pub fn advance(&mut self) {
        if self.index + 1 < self.emails.len() {
            self.index += 1;
        } else {
            self.complete = true;
        }
    }

    /// Ends the session. Only allowed once every email has been seen;
    /// returns whether the session ended.
    pub fn finish(&mut self) -> bool {
        if !self.complete {
            return false;
        }
        self.complete = false;
        true
    }

    /// Position of the current score inside the range, 0.0 ..= 1.0.
    pub fn score_fraction(&self) -> f64 {
        let (lo, hi) = (*SCORE_RANGE.start(), *SCORE_RANGE.end());
        let score = self.current().user_score.clamp(lo, hi);
        f64::from(score - lo) / f64::from(hi - lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(subject: &str, score: i32) -> Email {
        let mut e = Email::new("S", "s@example.com", subject, "", "", "");
        e.user_score = score;
        e
    }

    #[test]
    fn start_refuses_empty_mailbox() {
        assert!(TrainingSession::start(&[]).is_none());
    }

    #[test]
    fn start_defaults_unscored_emails() {
        let t = TrainingSession::start(&[mail("a", 0), mail("b", 504)]).unwrap();
        assert_eq!(t.emails()[0].user_score, 500);
        assert_eq!(t.emails()[1].user_score, 504);
        assert_eq!(t.index(), 0);
        assert!(!t.is_complete());
    }

    #[test]
    fn five_ups_then_walk_to_completion() {
        let mut t = TrainingSession::start(&[mail("a", 0), mail("b", 0)]).unwrap();
        for _ in 0..5 {
            t.adjust_score(DEFAULT_SCORE_STEP);
        }
        assert_eq!(t.current().user_score, 510);

        t.advance();
        assert_eq!(t.index(), 1);
        assert_eq!(t.current().user_score, 500);

        assert!(!t.finish());
        t.advance();
        assert!(t.is_complete());
        assert_eq!(t.index(), 1);
        assert!(t.finish());
        assert!(!t.is_complete());
    }

    #[test]
    fn score_never_leaves_range() {
        let mut t = TrainingSession::start(&[mail("a", 0)]).unwrap();
        for _ in 0..50 {
            t.adjust_score(-DEFAULT_SCORE_STEP);
            assert!(SCORE_RANGE.contains(&t.current().user_score));
        }
        assert_eq!(t.current().user_score, 490);
        assert_eq!(t.score_fraction(), 0.0);
        for _ in 0..50 {
            t.adjust_score(DEFAULT_SCORE_STEP);
            assert!(SCORE_RANGE.contains(&t.current().user_score));
        }
        assert_eq!(t.score_fraction(), 1.0);
    }

    #[test]
    fn snapshot_is_detached() {
        let source = vec![mail("a", 0)];
        let mut t = TrainingSession::start(&source).unwrap();
        t.adjust_score(2);
        assert_eq!(source[0].user_score, 0);
        assert_eq!(t.current().user_score, 502);
    }
}
