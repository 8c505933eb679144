//! Error types shared across the crate.

use std::path::PathBuf;

/// Top-level error type for batch, score-sheet, and export operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("score sheet has no usable key column (expected one of No/Index or FileName/File/Name/Image)")]
    MissingKeyColumn,

    #[error("image batch is empty")]
    EmptyBatch,

    #[error("not an image file: {}", .path.display())]
    NotAnImage { path: PathBuf },

    #[error("PDF backend error: {message}")]
    Pdf { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn pdf(msg: impl Into<String>) -> Self {
        Self::Pdf {
            message: msg.into(),
        }
    }
}
