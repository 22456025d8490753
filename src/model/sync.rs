use std::{fmt, io, path::PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::model::{key::KeyError, object::ObjectError};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to list objects under `{prefix}`: {source}")]
    Listing {
        prefix: String,
        #[source]
        source: ObjectError,
    },
    #[error("failed to transfer `{item}`: {message}")]
    Transfer {
        item: String,
        message: String,
        status: Option<u16>,
    },
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),
}

impl SyncError {
    pub fn io(item: impl Into<String>, err: &io::Error) -> Self {
        SyncError::Transfer {
            item: item.into(),
            message: err.to_string(),
            status: None,
        }
    }

    pub fn store(item: impl Into<String>, err: ObjectError) -> Self {
        SyncError::Transfer {
            item: item.into(),
            message: err.message,
            status: err.status,
        }
    }

    pub fn key(item: impl Into<String>, err: &KeyError) -> Self {
        SyncError::Transfer {
            item: item.into(),
            message: err.to_string(),
            status: None,
        }
    }

    /// Fatal errors end the operation; transfer errors only end one item.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SyncError::Transfer { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Pull,
    Push,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Pull => f.write_str("pull"),
            Direction::Push => f.write_str("push"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transferred {
    pub key: String,
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Debug)]
pub struct Failure {
    pub item: String,
    pub error: SyncError,
}

#[derive(Debug)]
pub struct SyncReport {
    pub direction: Direction,
    pub transferred: Vec<Transferred>,
    pub failures: Vec<Failure>,
}

impl SyncReport {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            transferred: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn record_failure(&mut self, item: impl Into<String>, error: SyncError) {
        self.failures.push(Failure {
            item: item.into(),
            error,
        });
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.transferred.iter().map(|t| t.bytes).sum()
    }

    pub fn log_summary(&self) {
        if self.is_success() {
            info!(
                direction = %self.direction,
                transferred = self.transferred.len(),
                bytes = self.bytes_transferred(),
                "completed"
            );
            return;
        }

        let failed: Vec<String> = self
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.item, f.error))
            .collect();
        warn!(
            direction = %self.direction,
            transferred = self.transferred.len(),
            bytes = self.bytes_transferred(),
            failed = failed.len(),
            failed_items = ?failed,
            "completed with failures"
        );
    }
}
