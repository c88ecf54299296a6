use crate::error::PersistError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// One completed question/answer exchange. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub timestamp: String,
    pub question: String,
    pub answer: String,
}

impl QueryRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Append-only audit trail persisted as a pretty-printed JSON array. Each
/// append reads the whole store and rewrites it in full; the internal lock
/// serializes writers sharing this handle.
pub struct QueryLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl QueryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one timestamped record. A missing or malformed store starts
    /// over as an empty sequence.
    pub async fn append(&self, question: &str, answer: &str) -> Result<QueryRecord, PersistError> {
        let record = QueryRecord::new(question, answer);

        let _guard = self.write_lock.lock().await;

        let mut records = self.load_or_empty();
        records.push(record.clone());

        let content =
            serde_json::to_string_pretty(&records).map_err(|source| PersistError::Format {
                path: self.path.clone(),
                source,
            })?;
        std::fs::write(&self.path, content).map_err(|source| PersistError::Write {
            path: self.path.clone(),
            source,
        })?;

        Ok(record)
    }

    fn load_or_empty(&self) -> Vec<QueryRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(
                "Query log {} is malformed, starting a fresh store: {}",
                self.path.display(),
                e
            );
            Vec::new()
        })
    }

    /// All records in insertion order. A missing store is an empty sequence,
    /// and a malformed one degrades to empty with a warning, matching the
    /// append policy.
    pub fn records(&self) -> Result<Vec<QueryRecord>, PersistError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| PersistError::Read {
            path: self.path.clone(),
            source,
        })?;

        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(
                "Query log {} is malformed, showing an empty trail: {}",
                self.path.display(),
                e
            );
            Vec::new()
        }))
    }

    /// Three-column CSV of the store, newest first. The sort is display-only;
    /// the store on disk keeps insertion order.
    pub fn export_csv(&self) -> Result<String, PersistError> {
        let mut records = self.records()?;
        sort_newest_first(&mut records);

        let mut out = String::from("timestamp,question,answer\n");
        for record in &records {
            let _ = writeln!(
                out,
                "{},{},{}",
                csv_field(&record.timestamp),
                csv_field(&record.question),
                csv_field(&record.answer)
            );
        }

        Ok(out)
    }
}

/// Newest first by actual instant, not string order, so records written
/// under different UTC offsets still sort correctly. Unparseable timestamps
/// fall back to lexical comparison.
pub fn sort_newest_first(records: &mut [QueryRecord]) {
    records.sort_by(|a, b| {
        match (
            DateTime::parse_from_rfc3339(&a.timestamp),
            DateTime::parse_from_rfc3339(&b.timestamp),
        ) {
            (Ok(ts_a), Ok(ts_b)) => ts_b.cmp(&ts_a),
            _ => b.timestamp.cmp(&a.timestamp),
        }
    });
}

fn csv_field(value: &str) -> String {
    let needs_quoting = value
        .chars()
        .any(|c| matches!(c, ',' | '"' | '\n' | '\r'));

    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
