use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;

use crate::review::reply::ReplyState;
use crate::terminal::state::AppState;

/// Applies one key press. Returns true when the program should exit.
pub fn handle_key(key: KeyEvent, state: &mut AppState, now: Instant) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if !state.session.is_authenticated() {
        handle_login_keys(key, state);
    } else if state.training.is_some() {
        handle_training_keys(key, state);
    } else if state.reply.is_active() {
        handle_reply_keys(key, state, now);
    } else {
        handle_mail_keys(key, state);
    }
    false
}

fn handle_login_keys(key: KeyEvent, state: &mut AppState) {
    let session = &mut state.session;
    match key.code {
        KeyCode::Enter => {
            if let Err(e) = session.submit() {
                debug!("login rejected: {e}");
            }
        }
        KeyCode::Esc => session.back(),
        KeyCode::Backspace => session.backspace(),
        KeyCode::Char(c) => session.type_char(c),
        _ => {}
    }
}

fn handle_mail_keys(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Enter => state.mailbox.toggle_expanded(),
        KeyCode::Up => state.mailbox.move_cursor(-1),
        KeyCode::Down => state.mailbox.move_cursor(1),
        KeyCode::Char('r' | 'R') => {
            if state.mailbox.current().is_some() {
                state.reply.begin();
            }
        }
        KeyCode::Char('d' | 'D') => {
            state.mailbox.delete_current();
        }
        KeyCode::Char('t' | 'T') => state.start_training(),
        KeyCode::Char('q' | 'Q') => state.logout(),
        _ => {}
    }
}

fn handle_reply_keys(key: KeyEvent, state: &mut AppState, now: Instant) {
    // the "sent" confirmation can't be interrupted
    if matches!(state.reply, ReplyState::Sending { .. }) {
        return;
    }
    let confirming = matches!(state.reply, ReplyState::Confirming { .. });

    match key.code {
        KeyCode::Esc => state.reply.cancel(),
        KeyCode::Enter if confirming => {
            state.send_reply(now);
        }
        KeyCode::Char(' ') if confirming => state.reply.keep_editing(),
        _ if confirming => {}
        KeyCode::Backspace => state.reply.backspace(),
        KeyCode::Char(c) => state.reply.push_char(c),
        _ => {}
    }
}

fn handle_training_keys(key: KeyEvent, state: &mut AppState) {
    let step = state.settings.score_step;
    let Some(training) = state.training.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char('+') => training.adjust_score(step),
        KeyCode::Char('-') => training.adjust_score(-step),
        KeyCode::Enter => {
            if training.is_complete() {
                training.finish();
                state.training = None;
            } else {
                training.advance();
            }
        }
        KeyCode::Esc => state.training = None,
        _ => {}
    }
}
