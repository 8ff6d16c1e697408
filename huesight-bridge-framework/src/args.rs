//! CLI argument parsing for bridges.

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser};

/// Common CLI arguments for all bridges.
#[derive(Parser, Debug, Clone)]
#[command(about = "HueSight bridge", version)]
pub struct BridgeArgs {
    /// Path to configuration file (JSON5 format).
    #[arg(short, long)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl BridgeArgs {
    /// Parse CLI arguments, falling back to `default_config` when `--config`
    /// is not given. Exits with clap's usage message on invalid input.
    pub fn parse_with_default(default_config: &'static str) -> Self {
        Self::try_parse_from_with_default(std::env::args_os(), default_config)
            .unwrap_or_else(|e| e.exit())
    }

    /// Parse an explicit argument list with a default config path.
    pub fn try_parse_from_with_default<I, T>(
        args: I,
        default_config: &'static str,
    ) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Self::command()
            .mut_arg("config", |arg| arg.required(false).default_value(default_config))
            .try_get_matches_from(args)?;

        Self::from_arg_matches(&matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let args = BridgeArgs::try_parse_from_with_default(["bridge"], "hue.json5").unwrap();
        assert_eq!(args.config, PathBuf::from("hue.json5"));
        assert_eq!(args.log_level, None);
    }

    #[test]
    fn test_level_without_config() {
        let args =
            BridgeArgs::try_parse_from_with_default(["bridge", "--log-level", "trace"], "hue.json5")
                .unwrap();
        assert_eq!(args.config, PathBuf::from("hue.json5"));
        assert_eq!(args.log_level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_explicit_arguments() {
        let args = BridgeArgs::try_parse_from_with_default(
            ["bridge", "--config", "/etc/huesight/hue.json5", "--log-level", "debug"],
            "hue.json5",
        )
        .unwrap();
        assert_eq!(args.config, PathBuf::from("/etc/huesight/hue.json5"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
