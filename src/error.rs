//! Error types shared by the mail core.

use thiserror::Error;

/// Seed data could not be loaded. Always recovered by the default dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("seed I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("seed CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unrecognised timestamp {0:?}")]
    Timestamp(String),
}

/// A single drained item could not be delivered to the inbox.
#[derive(Debug, Error)]
#[error("could not deliver email {subject:?}: {reason}")]
pub struct QueueItemError {
    pub subject: String,
    pub reason: String,
}

/// A spool file could not be turned into a webhook event.
#[derive(Debug, Error)]
pub enum SpoolError {
    #[error("spool I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed webhook payload: {0}")]
    Json(#[from] serde_json::Error),
}
