//! Bridge configuration trait.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{BridgeError, Result};
use crate::{Format, LoggingConfig, ZenohConfig};

/// Settings every bridge needs, plus loading and validation.
///
/// A bridge's config struct exposes its `zenoh`, `logging` and key prefix
/// sections through this trait and overrides [`validate`](Self::validate)
/// for its own invariants. Both [`load`](Self::load) and
/// [`parse`](Self::parse) validate before returning.
pub trait BridgeConfig: Sized + DeserializeOwned {
    fn zenoh(&self) -> &ZenohConfig;

    fn logging(&self) -> &LoggingConfig;

    /// Root of every key the bridge publishes under.
    fn key_prefix(&self) -> &str;

    /// Encoding of published records.
    fn format(&self) -> Format {
        Format::Json
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Parse JSON5 text and validate it.
    fn parse(content: &str) -> Result<Self> {
        let config: Self = huesight_common::parse_config(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON5 file and validate it.
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BridgeError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let config: Self = huesight_common::load_config(path)?;
        config.validate()?;
        Ok(config)
    }
}
