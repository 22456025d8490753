use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteObject {
    pub key: String,
    pub size: Option<u64>,
}

/// One page of a listing. `next_continuation_token` is `None` on the last page.
#[derive(Clone, Debug, Default)]
pub struct ObjectPage {
    pub objects: Vec<RemoteObject>,
    pub next_continuation_token: Option<String>,
}

/// Failure reported by the store boundary. `status` carries the HTTP status
/// when the store answered at all.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ObjectError {
    pub message: String,
    pub status: Option<u16>,
}

impl ObjectError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }
}
