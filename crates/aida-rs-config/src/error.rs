use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin} is not valid JSON5: {source}")]
    Syntax {
        origin: String,
        #[source]
        source: json5::Error,
    },
    #[error("config does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
    /// Schema violation, `at` is `origin:dotted.key`.
    #[error("{at}: {reason}")]
    Field { at: String, reason: String },
    #[error("environment variable {var}: {reason}")]
    Env { var: &'static str, reason: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}
