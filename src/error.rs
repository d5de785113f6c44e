//! Error type for the export pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an export run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("failed to parse document: {0}")]
    Document(String),

    #[error("layer tree nested deeper than {0} levels")]
    DepthLimit(usize),

    #[error("image layer '{layer}' is not inside any slot folder")]
    NoActiveSlot { layer: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image write error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
