use std::io;

use thiserror::Error;

/// Error type for dataset configuration, rendering, and persistence failures.
#[derive(Debug, Error)]
pub enum DatagenError {
    /// Invalid or inconsistent settings.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Format name outside `json`, `xml`, `markdown`.
    #[error("unsupported chunk format '{0}'")]
    UnsupportedFormat(String),
    /// A generator produced nothing usable.
    #[error("generator returned no usable output: {0}")]
    EmptyResult(String),
    /// Filesystem failure while reading config or writing output.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// JSON encoding failure.
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Malformed YAML configuration.
    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}
