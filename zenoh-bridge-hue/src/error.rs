//! Error types for the Hue bridge.

use huesight_common::{ErrorReport, ErrorType};
use reqwest::StatusCode;
use thiserror::Error;

use crate::resource::ResourceType;

/// Failure of a single resource fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid bridge URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Classify this failure for error reports.
    pub fn error_type(&self) -> ErrorType {
        match self {
            FetchError::InvalidUrl { .. } | FetchError::Client(_) => ErrorType::ConfigError,
            FetchError::Transport { source, .. } => {
                if source.is_timeout() {
                    ErrorType::Timeout
                } else if source.is_connect() {
                    ErrorType::ConnectionRefused
                } else if source.is_decode() || source.is_body() {
                    ErrorType::ParseError
                } else {
                    ErrorType::Other
                }
            }
            FetchError::Status { status, .. } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorType::AuthFailed,
                _ => ErrorType::ProtocolError,
            },
            FetchError::Decode { .. } => ErrorType::ParseError,
        }
    }
}

/// Non-fatal error collected during a poll cycle.
///
/// The cycle keeps going after any of these; they end up in the sink next to
/// the records that could still be produced.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Devices or rooms could not be fetched, so the whole bridge was skipped.
    #[error("failed to process bridge {url}: {source}")]
    Bridge {
        url: String,
        #[source]
        source: FetchError,
    },

    /// One reading kind could not be fetched.
    #[error("failed to fetch {kind} from bridge {url}: {source}")]
    Resource {
        url: String,
        kind: ResourceType,
        #[source]
        source: FetchError,
    },
}

impl CycleError {
    pub fn bridge_url(&self) -> &str {
        match self {
            CycleError::Bridge { url, .. } | CycleError::Resource { url, .. } => url,
        }
    }

    pub fn fetch_error(&self) -> &FetchError {
        match self {
            CycleError::Bridge { source, .. } | CycleError::Resource { source, .. } => source,
        }
    }

    /// Convert into the report published on the errors key.
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport::new(self.fetch_error().error_type(), self.to_string())
            .with_device(self.bridge_url())
    }
}

/// Bridge list rejected before any bridge is contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("no bridges configured")]
    EmptyBridgeList,

    #[error("invalid bridge entry {entry:?}: expected [url, application key]")]
    InvalidBridgeEntry { entry: Vec<String> },
}
