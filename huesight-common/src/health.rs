//! Error reports published alongside the metric stream.

use serde::{Deserialize, Serialize};

use crate::telemetry::current_timestamp_millis;

/// Error type classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Request timed out.
    Timeout,
    /// Authentication rejected (bad application key).
    AuthFailed,
    /// Connection could not be established.
    ConnectionRefused,
    /// Response body could not be decoded.
    ParseError,
    /// Unexpected response status.
    ProtocolError,
    /// Invalid configuration (e.g. unparsable URL).
    ConfigError,
    #[default]
    Other,
}

impl ErrorType {
    /// Whether the next poll has a chance of succeeding without user action.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorType::Timeout | ErrorType::ConnectionRefused | ErrorType::Other
        )
    }
}

/// Error report from a bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Timestamp (millis since epoch).
    pub timestamp: i64,
    /// Device or remote endpoint the error relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    pub error_type: ErrorType,
    pub message: String,
    pub retryable: bool,
}

impl ErrorReport {
    /// Create a report stamped with the current time.
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            timestamp: current_timestamp_millis(),
            device: None,
            error_type,
            message: message.into(),
            retryable: error_type.is_retryable(),
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}
