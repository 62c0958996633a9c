use std::path::PathBuf;

use thiserror::Error;

use crate::files::ContentFile;

pub type Result<T> = std::result::Result<T, ContentError>;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file} is not valid content JSON: {source}")]
    Json {
        file: ContentFile,
        #[source]
        source: serde_json::Error,
    },

    #[error("{file} is not available")]
    Missing { file: ContentFile },

    #[error("unknown content file: {name}")]
    UnknownFile { name: String },
}

impl ContentError {
    /// The content file the error concerns, when known.
    #[must_use]
    pub fn file(&self) -> Option<ContentFile> {
        match self {
            Self::Json { file, .. } | Self::Missing { file } => Some(*file),
            Self::Io { path, .. } => path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(ContentFile::from_file_name),
            Self::UnknownFile { .. } => None,
        }
    }
}
