// SPDX-License-Identifier: MIT
//
// Core domain types for the Blattwerk image-to-PDF binder.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-file size ceiling: 10 MiB.
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Aggregate size ceiling across the whole collection: 50 MiB.
pub const MAX_TOTAL_BYTES: u64 = 50 * 1024 * 1024;

/// Unique identifier for a staged image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user-supplied image staged for export.
///
/// Items are immutable once accepted: reordering replaces positions in the
/// collection, it never alters an item. The encoded bytes are shared via
/// `Arc` so that thumbnails and export snapshots are cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedImage {
    pub id: ImageId,
    /// Original encoded bytes, exactly as read at intake.
    pub bytes: Arc<Vec<u8>>,
    /// Size declared at intake, used for quota accounting.
    /// Always > 0 and <= `MAX_FILE_BYTES` at the moment of acceptance.
    pub byte_size: u64,
    /// Media type declared or inferred at intake, e.g. "image/png".
    pub media_type: String,
}

impl StagedImage {
    pub fn new(bytes: Vec<u8>, byte_size: u64, media_type: impl Into<String>) -> Self {
        Self {
            id: ImageId::new(),
            bytes: Arc::new(bytes),
            byte_size,
            media_type: media_type.into(),
        }
    }
}

/// Standard paper sizes for the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
        }
    }
}

impl Default for PaperSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Human-readable file size: "0 Bytes", "512 Bytes", "1.5 KB", "2.25 MB".
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".into();
    }
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    // Trim trailing zeroes the way the size badge expects: 1.50 -> 1.5, 2.00 -> 2.
    let rounded = (value * 100.0).round() / 100.0;
    let mut text = format!("{rounded:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    format!("{} {}", text, UNITS[exponent])
}
