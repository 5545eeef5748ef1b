// SPDX-License-Identifier: MIT
//
// Export pipeline — turns the staged collection into a finished PDF
// artifact, driving the Idle → Normalizing → Rendering → Ready | Failed
// state machine the UI reflects.

use std::sync::Arc;

use tracing::{info, instrument};

use blattwerk_core::config::DEFAULT_OUTPUT_NAME;
use blattwerk_core::error::BlattwerkError;
use blattwerk_core::types::PaperSize;

use crate::normalize;
use crate::pdf::writer::PdfWriter;

/// The transient output of a successful export.
///
/// The artifact owns the rendered bytes; holding it in a single slot and
/// replacing that slot on the next export gives the bytes one release
/// point instead of cleanup scattered across callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    /// Resolved output file name, including the `.pdf` extension.
    pub file_name: String,
    pub bytes: Arc<Vec<u8>>,
}

/// Explicit export state machine.
///
/// `Ready` carries the artifact so a "done but nothing produced" state is
/// unrepresentable; `Failed` carries the banner message.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportPhase {
    Idle,
    Normalizing,
    Rendering,
    Ready(ExportArtifact),
    Failed(String),
}

impl ExportPhase {
    /// Whether an export is currently in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Normalizing | Self::Rendering)
    }

    pub fn artifact(&self) -> Option<&ExportArtifact> {
        match self {
            Self::Ready(artifact) => Some(artifact),
            _ => None,
        }
    }
}

impl Default for ExportPhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Resolve the user-supplied output name: trimmed input or the default,
/// plus the fixed `.pdf` extension.
pub fn resolve_output_name(input: &str) -> String {
    let stem = input.trim();
    if stem.is_empty() {
        format!("{DEFAULT_OUTPUT_NAME}.pdf")
    } else {
        format!("{stem}.pdf")
    }
}

/// A snapshot of the collection at the moment export was triggered, plus
/// the requested output name. Ephemeral: consumed by [`ExportRequest::run`].
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Encoded page images in page order.
    pub pages: Vec<Arc<Vec<u8>>>,
    pub requested_name: String,
    pub paper_size: PaperSize,
}

impl ExportRequest {
    pub fn file_name(&self) -> String {
        resolve_output_name(&self.requested_name)
    }

    /// Run the export: normalize every page concurrently, join, render.
    ///
    /// `on_phase` observes the Normalizing and Rendering transitions; the
    /// caller settles the final phase to `Ready` or `Failed` from the
    /// returned result. Per-page normalization failures degrade to the
    /// original encoding and do not fail the export; render and
    /// serialization failures do.
    #[instrument(skip(self, on_phase), fields(pages = self.pages.len()))]
    pub async fn run<F>(self, mut on_phase: F) -> Result<ExportArtifact, BlattwerkError>
    where
        F: FnMut(ExportPhase),
    {
        if self.pages.is_empty() {
            return Err(BlattwerkError::EmptyExport);
        }

        let file_name = self.file_name();

        on_phase(ExportPhase::Normalizing);
        let normalized = normalize::normalize_all(self.pages).await;
        let fallbacks = normalized.iter().filter(|p| !p.flattened).count();
        if fallbacks > 0 {
            info!(fallbacks, "some pages kept their original encoding");
        }

        on_phase(ExportPhase::Rendering);
        let mut writer = PdfWriter::new(self.paper_size);
        if let Some(stem) = file_name.strip_suffix(".pdf") {
            writer.set_title(stem);
        }
        let page_bytes: Vec<&[u8]> = normalized.iter().map(|p| p.bytes.as_slice()).collect();
        let bytes = writer.create_from_images(&page_bytes)?;

        info!(file_name = %file_name, bytes = bytes.len(), "export complete");
        Ok(ExportArtifact {
            file_name,
            bytes: Arc::new(bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn encoded_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(5, 5, Rgba([9, 9, 9, 255]));
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn page_count(pdf_bytes: &[u8]) -> usize {
        lopdf::Document::load_mem(pdf_bytes).unwrap().get_pages().len()
    }

    #[test]
    fn output_name_resolution() {
        assert_eq!(resolve_output_name("report"), "report.pdf");
        assert_eq!(resolve_output_name("  report  "), "report.pdf");
        assert_eq!(resolve_output_name(""), "converted-images.pdf");
        assert_eq!(resolve_output_name("   "), "converted-images.pdf");
    }

    #[test]
    fn phase_busy_flags() {
        assert!(!ExportPhase::Idle.is_busy());
        assert!(ExportPhase::Normalizing.is_busy());
        assert!(ExportPhase::Rendering.is_busy());
        assert!(!ExportPhase::Failed("x".into()).is_busy());
        let ready = ExportPhase::Ready(ExportArtifact {
            file_name: "a.pdf".into(),
            bytes: Arc::new(Vec::new()),
        });
        assert!(!ready.is_busy());
        assert!(ready.artifact().is_some());
        assert!(ExportPhase::Idle.artifact().is_none());
    }

    #[tokio::test]
    async fn empty_request_is_rejected() {
        let request = ExportRequest {
            pages: Vec::new(),
            requested_name: "report".into(),
            paper_size: PaperSize::A4,
        };
        let err = request.run(|_| {}).await.unwrap_err();
        assert!(matches!(err, BlattwerkError::EmptyExport));
    }

    #[tokio::test]
    async fn export_yields_one_page_per_image_in_order() {
        let request = ExportRequest {
            pages: vec![
                Arc::new(encoded_png()),
                Arc::new(encoded_png()),
                Arc::new(encoded_png()),
                Arc::new(encoded_png()),
            ],
            requested_name: "holiday".into(),
            paper_size: PaperSize::A4,
        };

        let mut phases = Vec::new();
        let artifact = request.run(|phase| phases.push(phase)).await.unwrap();

        assert_eq!(artifact.file_name, "holiday.pdf");
        assert_eq!(page_count(&artifact.bytes), 4);
        assert_eq!(phases, vec![ExportPhase::Normalizing, ExportPhase::Rendering]);
    }

    #[tokio::test]
    async fn normalization_fallback_still_yields_all_pages() {
        // A JPEG page: flattening it to PNG and keeping the original are
        // both decodable, so either way the render sees a usable page.
        let img = image::RgbImage::from_pixel(6, 6, image::Rgb([1, 2, 3]));
        let mut jpeg = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 80);
        img.write_with_encoder(encoder).unwrap();

        let request = ExportRequest {
            pages: vec![Arc::new(encoded_png()), Arc::new(jpeg), Arc::new(encoded_png())],
            requested_name: String::new(),
            paper_size: PaperSize::A4,
        };
        let artifact = request.run(|_| {}).await.unwrap();
        assert_eq!(artifact.file_name, "converted-images.pdf");
        assert_eq!(page_count(&artifact.bytes), 3);
    }

    #[tokio::test]
    async fn undecodable_page_fails_the_export() {
        // Garbage survives normalization via fallback but cannot be placed
        // on a page; the export fails with no partial artifact.
        let request = ExportRequest {
            pages: vec![Arc::new(encoded_png()), Arc::new(vec![0u8; 64])],
            requested_name: "broken".into(),
            paper_size: PaperSize::A4,
        };
        let err = request.run(|_| {}).await.unwrap_err();
        assert!(matches!(err, BlattwerkError::PdfRender(_)));
    }
}
