pub mod events;
pub mod state;
pub mod ui;

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event};
use log::{info, warn};
use ratatui::DefaultTerminal;

use crate::config::Config;
use crate::domain::email::{Email, WebhookEvent};
use crate::ingest::spool::SpoolWatcher;
use crate::terminal::state::{AppState, Settings};

/// Runs the client until the user quits. Webhook files dropped into
/// `spool_dir` are fed into the ingestion queue while it runs.
pub fn run_tui(cfg: &Config, emails: Vec<Email>, spool_dir: std::path::PathBuf) -> Result<()> {
    color_eyre::install().map_err(|e| anyhow!("installing error hooks: {e}"))?;

    let (tx, rx) = mpsc::channel();
    let mut watcher = SpoolWatcher::spawn(spool_dir, cfg.poll_interval(), tx)?;

    let mut state = AppState::new(emails, Settings::from(cfg));

    let terminal = ratatui::init();
    let result = run(terminal, &mut state, &rx, cfg);
    ratatui::restore();

    watcher.stop();
    info!("terminal closed");
    result
}

fn run(
    mut terminal: DefaultTerminal,
    state: &mut AppState,
    rx: &Receiver<WebhookEvent>,
    cfg: &Config,
) -> Result<()> {
    let tick = cfg.tick();
    let mut feed_open = true;
    loop {
        terminal.draw(|f| ui::render(f, state))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if events::handle_key(key, state, Instant::now()) {
                    return Ok(());
                }
            }
        }

        while feed_open {
            match rx.try_recv() {
                Ok(ev) => state.on_webhook(ev, Instant::now()),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("spool watcher stopped delivering events");
                    feed_open = false;
                }
            }
        }

        state.tick(Instant::now());
    }
}
