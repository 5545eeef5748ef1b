// SPDX-License-Identifier: MIT
//
// blattwerk-document — Document processing for the Blattwerk binder.
//
// Provides raster normalization (flattening arbitrary image encodings onto
// a white background as PNG) and PDF export (one page per image via
// printpdf, scale-to-fit, centered).

pub mod export;
pub mod normalize;
pub mod pdf;

pub use export::{ExportArtifact, ExportPhase, ExportRequest};
pub use normalize::NormalizedPage;
pub use pdf::writer::PdfWriter;
