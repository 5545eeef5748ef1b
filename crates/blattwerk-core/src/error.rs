// SPDX-License-Identifier: MIT
//
// Unified error types for Blattwerk.

use thiserror::Error;

/// Top-level error type for all Blattwerk operations.
#[derive(Debug, Error)]
pub enum BlattwerkError {
    // -- Intake errors --
    #[error("{name} is not an image file")]
    InvalidType { name: String },

    #[error("{name} is {size} bytes, over the per-file limit")]
    FileTooLarge { name: String, size: u64 },

    #[error("batch would bring the total to {attempted} bytes, over the {limit} byte limit")]
    QuotaExceeded { attempted: u64, limit: u64 },

    #[error("could not read {name}: {detail}")]
    ReadFailure { name: String, detail: String },

    // -- Document errors --
    #[error("image decode failed: {0}")]
    ImageDecode(String),

    #[error("PDF rendering failed: {0}")]
    PdfRender(String),

    #[error("nothing to export — the collection is empty")]
    EmptyExport,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlattwerkError>;
