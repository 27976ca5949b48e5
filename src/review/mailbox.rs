use std::ops::Range;

use crate::domain::email::Email;
use crate::error::QueueItemError;
use crate::ingest::queue::InboxSink;
use crate::review::window::visible_window;

/// Position of an email that stays valid while new mail is prepended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    index: usize,
    inserted: u64,
}

/// The navigable list of emails with its cursor and expanded-view flag.
///
/// The cursor is kept within `0..len` whenever the list is non-empty.
#[derive(Debug, Default)]
pub struct Mailbox {
    emails: Vec<Email>,
    current: usize,
    expanded: bool,
    /// Emails prepended so far.
    inserted: u64,
}

impl Mailbox {
    pub fn new(emails: Vec<Email>) -> Self {
        Self {
            emails,
            current: 0,
            expanded: false,
            inserted: 0,
        }
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    /// Cursor position, `None` when the mailbox is empty.
    pub fn current_index(&self) -> Option<usize> {
        (!self.emails.is_empty()).then_some(self.current)
    }

    pub fn current(&self) -> Option<&Email> {
        self.emails.get(self.current)
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn move_cursor(&mut self, delta: i32) {
        if self.emails.is_empty() {
            return;
        }
        let len = self.emails.len() as i64;
        let next = (self.current as i64 + delta as i64).clamp(0, len - 1);
        self.current = next as usize;
        self.expanded = false;
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
        self.mark_current_read_if_expanded();
    }

    pub fn delete_current(&mut self) -> Option<Email> {
        self.remove_at(self.current)
    }

    /// Remembers the email under the cursor.
    pub fn anchor_current(&self) -> Option<Anchor> {
        self.current_index().map(|index| Anchor {
            index,
            inserted: self.inserted,
        })
    }

    /// Removes the anchored email, following it past any mail prepended since
    /// the anchor was taken.
    pub fn remove_anchored(&mut self, anchor: Anchor) -> Option<Email> {
        let shift = usize::try_from(self.inserted.saturating_sub(anchor.inserted)).ok()?;
        self.remove_at(anchor.index.checked_add(shift)?)
    }

    fn remove_at(&mut self, index: usize) -> Option<Email> {
        if index >= self.emails.len() {
            return None;
        }
        let removed = self.emails.remove(index);
        self.clamp_cursor();
        self.mark_current_read_if_expanded();
        Some(removed)
    }

    /// Prepends an email. The cursor keeps its numeric position.
    pub fn insert_front(&mut self, email: Email) {
        self.emails.insert(0, email);
        self.inserted += 1;
        self.clamp_cursor();
        self.mark_current_read_if_expanded();
    }

    pub fn window(&self, size: usize, lead: usize) -> Range<usize> {
        visible_window(self.emails.len(), self.current, size, lead)
    }

    fn clamp_cursor(&mut self) {
        self.current = self.current.min(self.emails.len().saturating_sub(1));
    }

    fn mark_current_read_if_expanded(&mut self) {
        if !self.expanded {
            return;
        }
        if let Some(email) = self.emails.get_mut(self.current) {
            email.read_status = true;
        }
    }
}

impl InboxSink for Mailbox {
    fn deliver(&mut self, email: Email) -> Result<(), QueueItemError> {
        self.insert_front(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(subject: &str) -> Email {
        Email::new("S", "s@example.com", subject, "body", "summary", "")
    }

    fn abc() -> Mailbox {
        Mailbox::new(vec![mail("A"), mail("B"), mail("C")])
    }

    fn subjects(m: &Mailbox) -> Vec<&str> {
        m.emails().iter().map(|e| e.subject.as_str()).collect()
    }

    #[test]
    fn move_clamps_and_collapses() {
        let mut m = abc();
        m.move_cursor(-1);
        assert_eq!(m.current_index(), Some(0));

        m.toggle_expanded();
        assert!(m.is_expanded());
        m.move_cursor(5);
        assert_eq!(m.current_index(), Some(2));
        assert!(!m.is_expanded());
    }

    #[test]
    fn navigation_on_empty_mailbox_is_noop() {
        let mut m = Mailbox::default();
        m.move_cursor(1);
        m.move_cursor(-1);
        assert_eq!(m.current_index(), None);
        assert!(m.delete_current().is_none());
    }

    #[test]
    fn expanding_marks_read_once() {
        let mut m = abc();
        assert!(!m.current().unwrap().read_status);
        m.toggle_expanded();
        assert!(m.current().unwrap().read_status);
        m.toggle_expanded();
        assert!(!m.is_expanded());
        assert!(m.current().unwrap().read_status);
        assert!(m.emails().iter().skip(1).all(|e| !e.read_status));
    }

    #[test]
    fn delete_under_expanded_view_marks_next_mail_read() {
        let mut m = Mailbox::new(vec![mail("A"), mail("B")]);
        m.toggle_expanded();
        m.delete_current();
        assert!(m.is_expanded());
        assert_eq!(m.current().unwrap().subject, "B");
        assert!(m.current().unwrap().read_status);
    }

    #[test]
    fn anchored_mail_is_followed_across_inserts() {
        let mut m = abc();
        m.move_cursor(1);
        let anchor = m.anchor_current().unwrap();
        m.insert_front(mail("N1"));
        m.insert_front(mail("N2"));
        assert_eq!(m.current().unwrap().subject, "N1");

        let removed = m.remove_anchored(anchor).unwrap();
        assert_eq!(removed.subject, "B");
        assert_eq!(subjects(&m), vec!["N2", "N1", "A", "C"]);
        assert_eq!(m.current_index(), Some(1));
    }

    #[test]
    fn anchor_on_empty_mailbox() {
        let m = Mailbox::default();
        assert!(m.anchor_current().is_none());
    }

    #[test]
    fn down_then_delete_keeps_cursor_on_previous() {
        let mut m = abc();
        m.move_cursor(1);
        m.move_cursor(1);
        assert_eq!(m.current_index(), Some(2));
        assert!(!m.is_expanded());

        let removed = m.delete_current().unwrap();
        assert_eq!(removed.subject, "C");
        assert_eq!(subjects(&m), vec!["A", "B"]);
        assert_eq!(m.current_index(), Some(1));
        assert_eq!(m.current().unwrap().subject, "B");
    }

    #[test]
    fn delete_in_middle_keeps_index() {
        let mut m = abc();
        m.move_cursor(1);
        m.delete_current();
        assert_eq!(subjects(&m), vec!["A", "C"]);
        assert_eq!(m.current().unwrap().subject, "C");
    }

    #[test]
    fn delete_last_remaining() {
        let mut m = Mailbox::new(vec![mail("only")]);
        m.delete_current();
        assert!(m.is_empty());
        assert_eq!(m.current_index(), None);
    }

    #[test]
    fn insert_front_on_empty_selects_new_mail() {
        let mut m = Mailbox::default();
        m.insert_front(mail("new"));
        assert_eq!(m.current_index(), Some(0));
        assert_eq!(m.current().unwrap().subject, "new");
    }

    #[test]
    fn insert_front_keeps_numeric_cursor() {
        let mut m = abc();
        m.move_cursor(2);
        m.insert_front(mail("N"));
        assert_eq!(subjects(&m), vec!["N", "A", "B", "C"]);
        assert_eq!(m.current_index(), Some(2));
    }

    #[test]
    fn insert_under_expanded_view_marks_shown_mail_read() {
        let mut m = abc();
        m.toggle_expanded();
        m.insert_front(mail("N"));
        assert!(m.current().unwrap().read_status);
        assert_eq!(m.current().unwrap().subject, "N");
    }

    #[test]
    fn cursor_stays_in_range_through_mixed_operations() {
        let mut m = abc();
        let ops: [fn(&mut Mailbox); 5] = [
            |m| m.move_cursor(3),
            |m| {
                m.delete_current();
            },
            |m| m.insert_front(mail("X")),
            |m| m.move_cursor(-7),
            |m| {
                m.delete_current();
            },
        ];
        for round in 0..20 {
            ops[round % ops.len()](&mut m);
            if let Some(i) = m.current_index() {
                assert!(i < m.len());
            }
        }
    }
}
