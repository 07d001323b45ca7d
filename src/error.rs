use thiserror::Error;
use crate::models::chat::ConversationId;

/// Coarse classification used by the front end to decide how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    NotFound,
    Conflict,
    Config,
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: u16,
    },

    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Raised by non-HTTP `ConversationApi` implementations.
    #[error("API unavailable: {0}")]
    Unavailable(String),

    #[error("conversation {0} not found")]
    NotFound(ConversationId),

    #[error("another deletion is already awaiting confirmation")]
    DeletionInProgress,

    #[error("invalid API base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::Network { .. }
            | DashboardError::Status { .. }
            | DashboardError::Decode { .. }
            | DashboardError::Unavailable(_) => ErrorKind::NetworkFailure,
            DashboardError::NotFound(_) => ErrorKind::NotFound,
            DashboardError::DeletionInProgress => ErrorKind::Conflict,
            DashboardError::InvalidBaseUrl { .. } | DashboardError::Client(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
