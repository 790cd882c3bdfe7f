//! Error types for the ingestion pipeline.
//!
//! A duplicate is not an error; see `pipeline::SubmitOutcome`.

use thiserror::Error;

/// Uploaded bytes could not be turned into a pixel buffer.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported image format (expected PNG or JPEG)")]
    UnsupportedFormat,
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// The text recognizer could not produce fragments for an image.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("OCR engine not available: {0}")]
    Unavailable(String),
    #[error("OCR engine failed: {0}")]
    Engine(String),
    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One or more judgment counts were rejected during correction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid judgment count in: {}", fields.join(", "))]
pub struct ValidationError {
    /// Names of the offending fields, in column order.
    pub fields: Vec<&'static str>,
}

/// The record store could not complete an operation.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure anywhere on the upload path before the user sees a draft.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}
