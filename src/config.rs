use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::queue::DEFAULT_DRAIN_DELAY;
use crate::review::reply::DEFAULT_SENT_CONFIRM;
use crate::review::training::DEFAULT_SCORE_STEP;
use crate::review::window::{DEFAULT_WINDOW_LEAD, DEFAULT_WINDOW_SIZE};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// CSV export used to populate the mailbox at startup.
    pub seed_csv: Option<String>,
    /// Directory watched for webhook JSON files.
    pub spool_dir: Option<String>,
    pub log_file: Option<String>,

    pub drain_delay_ms: u64,
    pub sent_confirm_ms: u64,
    pub poll_interval_ms: u64,
    pub tick_ms: u64,

    pub window_size: usize,
    pub window_lead: usize,
    pub score_step: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_csv: None,
            spool_dir: None,
            log_file: None,
            drain_delay_ms: DEFAULT_DRAIN_DELAY.as_millis() as u64,
            sent_confirm_ms: DEFAULT_SENT_CONFIRM.as_millis() as u64,
            poll_interval_ms: 500,
            tick_ms: 50,
            window_size: DEFAULT_WINDOW_SIZE,
            window_lead: DEFAULT_WINDOW_LEAD,
            score_step: DEFAULT_SCORE_STEP,
        }
    }
}

impl Config {
    pub fn drain_delay(&self) -> Duration {
        Duration::from_millis(self.drain_delay_ms)
    }

    pub fn sent_confirm(&self) -> Duration {
        Duration::from_millis(self.sent_confirm_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("plain"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn default_spool_dir() -> Result<PathBuf> {
    let mut p = config_dir()?;
    p.push("spool");
    fs::create_dir_all(&p)?;
    Ok(p)
}

pub fn default_log_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("plain.log");
    Ok(p)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Reads the config at `path`; writes a template with the defaults first if
/// there is none.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        let sample = Config::default();
        let tom = toml::to_string_pretty(&sample)?;
        fs::write(path, tom)?;
        info!("created template config at {}", path.display());
        return Ok(sample);
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    Ok(cfg)
}

pub fn resolve_spool_dir(cfg: &Config) -> Result<PathBuf> {
    if let Some(p) = &cfg.spool_dir {
        Ok(PathBuf::from(p))
    } else {
        default_spool_dir()
    }
}

pub fn resolve_log_path(cfg: &Config) -> Result<PathBuf> {
    if let Some(p) = &cfg.log_file {
        Ok(PathBuf::from(p))
    } else {
        default_log_path()
    }
}
