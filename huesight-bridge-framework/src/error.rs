//! Framework error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Invalid configuration: {0}")]
    ConfigValidation(String),

    #[error("Cannot connect to Zenoh: {0}")]
    ZenohConnection(String),

    #[error("Cannot encode payload: {0}")]
    Serialization(String),

    #[error("Put on {key} failed: {message}")]
    Publish { key: String, message: String },
}

impl BridgeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ConfigValidation(msg.into())
    }
}

impl From<huesight_common::Error> for BridgeError {
    fn from(err: huesight_common::Error) -> Self {
        use huesight_common::Error as Common;

        match err {
            Common::Config(msg) => Self::Config(msg),
            Common::Zenoh(e) => Self::ZenohConnection(e.to_string()),
            other @ (Common::Json(_) | Common::Cbor(_)) => Self::Serialization(other.to_string()),
        }
    }
}
