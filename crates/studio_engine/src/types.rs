use std::fmt;
use std::path::PathBuf;

use crate::clipboard::ClipboardError;
use crate::persist::PersistError;

pub type RequestId = u64;

/// Results reported by the engine thread, in completion order.
#[derive(Debug)]
pub enum EngineEvent {
    GenerationCompleted {
        request_id: RequestId,
        result: Result<String, ClientError>,
    },
    /// `html` has already been through the configured sanitizer.
    RenderCompleted {
        request_id: RequestId,
        result: Result<String, ClientError>,
    },
    CopyCompleted(Result<(), ClipboardError>),
    SaveCompleted {
        path: PathBuf,
        result: Result<PathBuf, PersistError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// DNS, connect, TLS or timeout failure before a status was received.
    Transport,
    /// The service answered with a non-success status.
    ServiceStatus(u16),
    /// Success status, but the body is not what the contract promises.
    ContractViolation,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport failure"),
            FailureKind::ServiceStatus(code) => write!(f, "http status {code}"),
            FailureKind::ContractViolation => write!(f, "contract violation"),
        }
    }
}

/// Setup failures; these stop the engine from starting at all.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid {service} endpoint {url:?}: {message}")]
    InvalidEndpoint {
        service: &'static str,
        url: String,
        message: String,
    },
    #[error("failed to build http client: {0}")]
    HttpClient(String),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
