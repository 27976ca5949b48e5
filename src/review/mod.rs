pub mod mailbox;
pub mod reply;
pub mod training;
pub mod window;
