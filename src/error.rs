/// Error types for the configuration layer.
///
/// Gameplay code has no error paths; only loading an explicit config file
/// can fail in a way the player is told about.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has a key of the wrong type.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed fine but a value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
