use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::email::{Email, RawEmailRecord};
use crate::error::LoadError;
use crate::store::repo::SeedSource;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Seed emails read from a CSV export.
pub struct CsvSeed {
    path: PathBuf,
}

impl CsvSeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeedSource for CsvSeed {
    fn load(&self) -> Result<Vec<Email>, LoadError> {
        let file = std::fs::File::open(&self.path)?;
        read_records(file)
    }
}

/// Parses CSV rows into emails. Any bad row fails the whole load.
pub fn read_records<R: std::io::Read>(reader: R) -> Result<Vec<Email>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut out = Vec::new();
    for row in rdr.deserialize::<RawEmailRecord>() {
        let rec = row?;
        if is_blank(&rec) {
            continue;
        }
        let received = format_received(&rec.received)?;
        out.push(Email::new(
            rec.sender_name,
            rec.sender_email,
            rec.subject,
            rec.body,
            rec.summary,
            received,
        ));
    }
    Ok(out)
}

fn is_blank(rec: &RawEmailRecord) -> bool {
    [
        &rec.sender_name,
        &rec.sender_email,
        &rec.subject,
        &rec.body,
        &rec.summary,
        &rec.received,
    ]
    .iter()
    .all(|f| f.trim().is_empty())
}

/// Normalizes a timestamp to UTC `YYYY-MM-DD HH:MM`.
pub fn format_received(raw: &str) -> Result<String, LoadError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).format(DISPLAY_FORMAT).to_string());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&Utc).format(DISPLAY_FORMAT).to_string());
    }
    // Zone-less timestamps are taken as UTC.
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc().format(DISPLAY_FORMAT).to_string());
        }
    }

    Err(LoadError::Timestamp(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "senderName,senderEmail,Subject,Body,summary,Received\n";

    #[test]
    fn formats_common_timestamps() {
        assert_eq!(
            format_received("2024-03-05T14:07:59Z").unwrap(),
            "2024-03-05 14:07"
        );
        assert_eq!(
            format_received("2024-03-05T16:07:00+02:00").unwrap(),
            "2024-03-05 14:07"
        );
        assert_eq!(
            format_received("Tue, 5 Mar 2024 14:07:00 +0000").unwrap(),
            "2024-03-05 14:07"
        );
        assert_eq!(format_received("2024-03-05 14:07:12").unwrap(), "2024-03-05 14:07");
        assert_eq!(format_received("03/05/2024 14:07").unwrap(), "2024-03-05 14:07");
    }

    #[test]
    fn rejects_garbage_timestamp() {
        let err = format_received("last tuesday").unwrap_err();
        assert!(matches!(err, LoadError::Timestamp(ref s) if s == "last tuesday"));
    }

    #[test]
    fn reads_rows_with_defaults() {
        let data = format!(
            "{HEADER}Ann,ann@example.com,Lunch?,\"Are you free\nat noon?\",Lunch invite,2024-01-01T12:30:00Z\n"
        );
        let emails = read_records(data.as_bytes()).unwrap();
        assert_eq!(emails.len(), 1);
        let e = &emails[0];
        assert_eq!(e.sender_name, "Ann");
        assert_eq!(e.subject, "Lunch?");
        assert_eq!(e.body, "Are you free\nat noon?");
        assert_eq!(e.received, "2024-01-01 12:30");
        assert!(!e.read_status);
        assert_eq!(e.user_score, 0);
    }

    #[test]
    fn skips_empty_lines() {
        let data = format!("{HEADER}\nAnn,ann@example.com,S,B,s,2024-01-01 10:00\n\n");
        let emails = read_records(data.as_bytes()).unwrap();
        assert_eq!(emails.len(), 1);
    }

    #[test]
    fn bad_timestamp_fails_whole_load() {
        let data = format!(
            "{HEADER}Ann,ann@example.com,S,B,s,2024-01-01 10:00\nBob,bob@example.com,S,B,s,soon\n"
        );
        assert!(matches!(
            read_records(data.as_bytes()),
            Err(LoadError::Timestamp(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let seed = CsvSeed::new("/definitely/not/here.csv");
        assert!(matches!(seed.load(), Err(LoadError::Io(_))));
    }
}
