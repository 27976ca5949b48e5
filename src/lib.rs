pub mod config;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod review;
pub mod session;
pub mod store;
pub mod terminal;
