// SPDX-License-Identifier: MIT
//
// File intake — validates a batch of candidate files and produces the
// accepted images for the caller to append to its collection.
//
// Quota behaviour mirrors the shipped form exactly: the aggregate cap is
// checked once, up front, against the sum of every candidate in the batch
// (valid or not). A breach rejects the whole batch before any file is
// processed. Per-file rejections skip just that file and the batch
// continues, keeping the already-accepted prefix.
//
// Intake never touches the collection itself: it takes the total that was
// current when the batch started and hands back the accepted items. The
// caller appends them when the batch settles, so a removal made while a
// long batch is being read is preserved rather than overwritten.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::BlattwerkError;
use crate::types::{StagedImage, MAX_FILE_BYTES, MAX_TOTAL_BYTES};

/// Where a candidate's bytes come from.
///
/// This is the injected platform capability: the file dialog hands over
/// paths, drag-and-drop hands over bytes the UI layer already read, and
/// tests hand over in-memory payloads. Intake never touches a real
/// platform API beyond `std::fs` for the `Path` variant.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Vec<u8>),
    /// A handle whose platform read already failed. Carried into the
    /// batch so the failure is surfaced in order like any other.
    Failed(String),
}

impl FileSource {
    fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::Path(path) => std::fs::read(path),
            Self::Memory(bytes) => Ok(bytes.clone()),
            Self::Failed(detail) => Err(std::io::Error::other(detail.clone())),
        }
    }
}

/// A candidate file handed to intake, before any validation.
#[derive(Debug, Clone)]
pub struct PickedFile {
    /// Display name, used in error messages.
    pub name: String,
    /// Declared size in bytes.
    pub size: u64,
    /// Declared media type, if the platform supplied one.
    /// Falls back to extension sniffing when `None`.
    pub media_type: Option<String>,
    pub source: FileSource,
}

/// Outcome of one intake batch.
#[derive(Debug, Default)]
pub struct IntakeReport {
    /// Images accepted from this batch, in batch order. The caller
    /// appends these to its live collection.
    pub accepted: Vec<StagedImage>,
    /// The last rejection seen, if any — the single error slot the UI shows.
    pub last_error: Option<BlattwerkError>,
    /// True when the aggregate precheck rejected the batch outright.
    pub aborted: bool,
}

impl IntakeReport {
    /// Sum of declared sizes of the accepted images.
    pub fn accepted_size(&self) -> u64 {
        self.accepted.iter().map(|item| item.byte_size).sum()
    }
}

/// Batch validator enforcing the per-file and aggregate quotas.
#[derive(Debug, Clone, Copy)]
pub struct FileIntake {
    per_file_limit: u64,
    total_limit: u64,
}

impl Default for FileIntake {
    fn default() -> Self {
        Self {
            per_file_limit: MAX_FILE_BYTES,
            total_limit: MAX_TOTAL_BYTES,
        }
    }
}

impl FileIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the quotas. Test hook; production code uses the defaults.
    pub fn with_limits(per_file_limit: u64, total_limit: u64) -> Self {
        Self {
            per_file_limit,
            total_limit,
        }
    }

    /// Validate a batch of candidates against the collection total that
    /// was current when the batch started.
    ///
    /// An empty batch is a no-op. The accepted prefix of a mixed batch is
    /// never rolled back; only the aggregate precheck rejects wholesale.
    pub fn ingest(&self, current_total: u64, batch: Vec<PickedFile>) -> IntakeReport {
        let mut report = IntakeReport::default();
        if batch.is_empty() {
            return report;
        }

        // Aggregate precheck over the whole batch, before any per-file work.
        let batch_total: u64 = batch.iter().map(|file| file.size).sum();
        let attempted = current_total + batch_total;
        if attempted > self.total_limit {
            warn!(attempted, limit = self.total_limit, "batch rejected by aggregate quota");
            report.last_error = Some(BlattwerkError::QuotaExceeded {
                attempted,
                limit: self.total_limit,
            });
            report.aborted = true;
            return report;
        }

        for file in batch {
            let media_type = match resolve_media_type(&file) {
                Some(media_type) => media_type,
                None => {
                    debug!(name = %file.name, "rejected: not an image");
                    report.last_error = Some(BlattwerkError::InvalidType { name: file.name });
                    continue;
                }
            };
            if file.size > self.per_file_limit {
                debug!(name = %file.name, size = file.size, "rejected: over per-file limit");
                report.last_error = Some(BlattwerkError::FileTooLarge {
                    name: file.name,
                    size: file.size,
                });
                continue;
            }

            match file.source.read() {
                Ok(bytes) => {
                    report
                        .accepted
                        .push(StagedImage::new(bytes, file.size, media_type));
                }
                Err(err) => {
                    warn!(name = %file.name, error = %err, "rejected: read failure");
                    report.last_error = Some(BlattwerkError::ReadFailure {
                        name: file.name,
                        detail: err.to_string(),
                    });
                }
            }
        }

        info!(
            accepted = report.accepted.len(),
            accepted_bytes = report.accepted_size(),
            "intake batch complete"
        );
        report
    }
}

/// Resolve a candidate's image media type, or `None` if it is not one.
/// A declared type wins; otherwise the extension is sniffed.
fn resolve_media_type(file: &PickedFile) -> Option<String> {
    match &file.media_type {
        Some(media_type) if media_type.starts_with("image/") => Some(media_type.clone()),
        Some(_) => None,
        None => image_media_type_for(&file.name).map(str::to_owned),
    }
}

/// Infer an image media type from a file name's extension.
pub fn image_media_type_for(name: &str) -> Option<&'static str> {
    let extension = name.rsplit('.').next()?;
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
