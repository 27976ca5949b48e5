use serde::{Deserialize, Serialize};

/// Score given to an email entering a training snapshot without one.
pub const DEFAULT_TRAINING_SCORE: i32 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    /// Full text, markdown.
    pub body: String,
    /// Short text, markdown.
    pub summary: String,
    /// Display timestamp, free-form.
    pub received: String,
    pub read_status: bool,
    pub user_score: i32,
}

impl Email {
    pub fn new(
        sender_name: impl Into<String>,
        sender_email: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        summary: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self {
            sender_name: sender_name.into(),
            sender_email: sender_email.into(),
            subject: subject.into(),
            body: body.into(),
            summary: summary.into(),
            received: received.into(),
            read_status: false,
            user_score: 0,
        }
    }

    /// "Name <address>" as shown in the From line.
    pub fn from_line(&self) -> String {
        format!("{} <{}>", self.sender_name, self.sender_email)
    }
}

/// Mailbox contents used when the seed source can't be read.
pub fn welcome_email() -> Email {
    Email::new(
        "Alice Smith",
        "alice@example.com",
        "Welcome to PLAIN",
        "Hey there!\n\nWelcome to PLAIN, your new minimal email client.\n\nBest,\nAlice",
        "Welcome message for new PLAIN users",
        "",
    )
}

/// One row of the seed CSV. Column names follow the export format.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEmailRecord {
    #[serde(rename = "senderName")]
    pub sender_name: String,
    #[serde(rename = "senderEmail")]
    pub sender_email: String,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "summary")]
    pub summary: String,
    #[serde(rename = "Received")]
    pub received: String,
}

/// Out-of-band delivery notification, as dropped into the spool directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookEvent {
    pub sender_name: String,
    pub sender_email: String,
    pub received: String,
    pub subject: String,
    pub body: String,
    pub summary: String,
}

impl From<WebhookEvent> for Email {
    fn from(ev: WebhookEvent) -> Self {
        Email::new(
            ev.sender_name,
            ev.sender_email,
            ev.subject,
            ev.body,
            ev.summary,
            ev.received,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_event_becomes_unread_unscored_email() {
        let ev: WebhookEvent = serde_json::from_str(
            r#"{"senderName":"Bob","senderEmail":"bob@example.com","subject":"Hi",
                "body":"Long","summary":"Short","received":"2024-01-02 03:04"}"#,
        )
        .unwrap();
        let email = Email::from(ev);
        assert_eq!(email.sender_name, "Bob");
        assert_eq!(email.received, "2024-01-02 03:04");
        assert!(!email.read_status);
        assert_eq!(email.user_score, 0);
    }

    #[test]
    fn webhook_event_missing_fields_default_to_empty() {
        let ev: WebhookEvent = serde_json::from_str(r#"{"subject":"only"}"#).unwrap();
        assert_eq!(ev.subject, "only");
        assert!(ev.sender_name.is_empty());
        assert!(ev.body.is_empty());
    }

    #[test]
    fn from_line_formats_name_and_address() {
        assert_eq!(welcome_email().from_line(), "Alice Smith <alice@example.com>");
    }
}
