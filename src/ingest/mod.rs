pub mod queue;
pub mod spool;
