// SPDX-License-Identifier: MIT
//
// User-facing error messages.
//
// The UI shows a single error banner at a time; every error variant maps
// to a short plain-English message plus a suggestion. Normalization
// failures never reach this layer — they degrade silently inside export.

use crate::error::BlattwerkError;
use crate::types::{format_file_size, MAX_FILE_BYTES, MAX_TOTAL_BYTES};

/// A message pair for the error banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanMessage {
    /// Short summary shown in the banner.
    pub message: String,
    /// What the user can do about it.
    pub suggestion: String,
}

/// Map an error to the banner text shown to the user.
pub fn user_message(err: &BlattwerkError) -> HumanMessage {
    match err {
        BlattwerkError::InvalidType { name } => HumanMessage {
            message: "Only image files are allowed".into(),
            suggestion: format!("{name} was skipped. Add JPEG, PNG, GIF, BMP, TIFF, or WebP files."),
        },

        BlattwerkError::FileTooLarge { name, .. } => HumanMessage {
            message: format!(
                "Individual image size should be less than {}",
                format_file_size(MAX_FILE_BYTES)
            ),
            suggestion: format!("{name} was skipped. Try exporting a smaller copy first."),
        },

        BlattwerkError::QuotaExceeded { .. } => HumanMessage {
            message: format!(
                "Total file size exceeds the {} limit",
                format_file_size(MAX_TOTAL_BYTES)
            ),
            suggestion: "Remove some images or add fewer files at once.".into(),
        },

        BlattwerkError::ReadFailure { name, .. } => HumanMessage {
            message: "Error reading file".into(),
            suggestion: format!("{name} could not be read and was skipped. Try adding it again."),
        },

        BlattwerkError::EmptyExport => HumanMessage {
            message: "Add at least one image first".into(),
            suggestion: "Drop images into the form or use the picker, then export.".into(),
        },

        // Export failures are surfaced generically — no partial document
        // is ever exposed, so detail would not help the user.
        BlattwerkError::PdfRender(_)
        | BlattwerkError::ImageDecode(_)
        | BlattwerkError::Io(_)
        | BlattwerkError::Serialization(_) => HumanMessage {
            message: "There was an error generating the PDF".into(),
            suggestion: "Please try again.".into(),
        },
    }
}
