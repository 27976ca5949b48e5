use log::{info, warn};

use crate::domain::email::{Email, welcome_email};
use crate::error::LoadError;

/// Supplies the initial mailbox contents.
pub trait SeedSource {
    fn load(&self) -> Result<Vec<Email>, LoadError>;
}

/// Loads the seed, falling back to the built-in welcome email when the source
/// fails or turns out to be empty.
pub fn load_or_welcome(source: &dyn SeedSource) -> Vec<Email> {
    match source.load() {
        Ok(emails) if !emails.is_empty() => {
            info!("loaded {} seed emails", emails.len());
            emails
        }
        Ok(_) => {
            info!("seed source is empty, using welcome email");
            vec![welcome_email()]
        }
        Err(e) => {
            warn!("error loading seed emails: {e}");
            vec![welcome_email()]
        }
    }
}
