use std::path::PathBuf;

use lather_content::ContentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiteError>;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {}", problems.join("; "))]
    ConfigInvalid { problems: Vec<String> },

    #[error("logging setup failed: {message}")]
    Logging { message: String },

    #[error("{count} content link problem(s) found")]
    BrokenLinks { count: usize },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl SiteError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BrokenLinks { .. } => 1,
            Self::InvalidArgument { .. } => 2,
            Self::ConfigParse { .. } | Self::ConfigInvalid { .. } => 78,
            Self::Content(_) | Self::Io(_) => 74,
            Self::Logging { .. } => 70,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
