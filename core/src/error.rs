use std::path::PathBuf;
use thiserror::Error;

/// Directory enumeration failure. Aborts the query before any completion
/// cost is incurred; per-file extraction problems are not represented here.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot enumerate document directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Network or parse failure while scraping a URL. Recovered by the agent
/// into a textual placeholder; never aborts a query.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Record store read/write failure. Append failures are reported as a
/// warning by the agent and never block returning the answer.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot read query log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write query log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("query log {path} is not a valid record store: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure that prevented producing an answer.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("completion request failed: {0}")]
    Completion(anyhow::Error),
}
