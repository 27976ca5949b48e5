use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use log::{debug, info, warn};

use crate::domain::email::WebhookEvent;
use crate::error::SpoolError;

const EXT: &str = "json";
const REJECTED_EXT: &str = "rejected";

/// Handle to the background thread that watches the spool directory.
pub struct SpoolWatcher {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SpoolWatcher {
    /// Polls `dir` every `interval`, forwarding each webhook file as an event.
    pub fn spawn(dir: PathBuf, interval: Duration, tx: Sender<WebhookEvent>) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        let running = Arc::new(AtomicBool::new(true));
        let r2 = running.clone();

        info!("watching spool dir {}", dir.display());
        let handle = thread::Builder::new()
            .name("spool-watcher".into())
            .spawn(move || {
                while r2.load(Ordering::SeqCst) {
                    match poll_once(&dir) {
                        Ok(events) => {
                            for ev in events {
                                if tx.send(ev).is_err() {
                                    debug!("event receiver gone, stopping spool watcher");
                                    return;
                                }
                            }
                        }
                        Err(e) => warn!("spool scan error: {e}"),
                    }
                    thread::sleep(interval);
                }
            })?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

impl Drop for SpoolWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Reads every pending webhook file in name order and removes it.
/// Files that fail to parse are renamed to `*.rejected` and skipped.
pub fn poll_once(dir: &Path) -> std::io::Result<Vec<WebhookEvent>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|x| x == EXT))
        .collect();
    paths.sort();

    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        match read_event(&path) {
            Ok(ev) => {
                if let Err(e) = fs::remove_file(&path) {
                    warn!("could not remove {}: {e}", path.display());
                    continue;
                }
                debug!("picked up webhook {}", path.display());
                out.push(ev);
            }
            Err(e) => {
                warn!("rejecting {}: {e}", path.display());
                if let Err(e) = fs::rename(&path, path.with_extension(REJECTED_EXT)) {
                    warn!("could not quarantine {}: {e}", path.display());
                }
            }
        }
    }
    Ok(out)
}

fn read_event(path: &Path) -> Result<WebhookEvent, SpoolError> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Drops one event into the spool directory. The file is written under a
/// temporary name first so the watcher never reads a partial payload.
pub fn write_event(dir: &Path, ev: &WebhookEvent) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let stem = format!("{nanos:024}-{}", std::process::id());

    let tmp = dir.join(format!("{stem}.tmp"));
    let dest = dir.join(format!("{stem}.{EXT}"));
    fs::write(&tmp, serde_json::to_vec_pretty(ev)?)?;
    fs::rename(&tmp, &dest)?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn event(subject: &str) -> WebhookEvent {
        WebhookEvent {
            sender_name: "Dana".into(),
            sender_email: "dana@example.com".into(),
            subject: subject.into(),
            ..Default::default()
        }
    }

    #[test]
    fn written_events_are_read_back_in_order_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        write_event(dir.path(), &event("first")).unwrap();
        write_event(dir.path(), &event("second")).unwrap();

        let got = poll_once(dir.path()).unwrap();
        let subjects: Vec<_> = got.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(subjects, vec!["first", "second"]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn malformed_file_is_quarantined() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0-bad.json"), b"{not json").unwrap();
        write_event(dir.path(), &event("good")).unwrap();

        let got = poll_once(dir.path()).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].subject, "good");
        assert!(dir.path().join("0-bad.rejected").exists());
        assert!(poll_once(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn failed_quarantine_does_not_stop_the_poll() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0-bad.json"), b"{not json").unwrap();
        // a non-empty directory in the way makes the rename fail
        fs::create_dir_all(dir.path().join("0-bad.rejected").join("x")).unwrap();
        write_event(dir.path(), &event("good")).unwrap();

        let got = poll_once(dir.path()).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].subject, "good");
        assert!(dir.path().join("0-bad.json").exists());
    }

    #[test]
    fn other_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        assert!(poll_once(dir.path()).unwrap().is_empty());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn watcher_forwards_events() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let mut watcher =
            SpoolWatcher::spawn(dir.path().to_path_buf(), Duration::from_millis(10), tx).unwrap();

        write_event(dir.path(), &event("ping")).unwrap();
        let ev = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(ev.subject, "ping");
        watcher.stop();
    }
}
