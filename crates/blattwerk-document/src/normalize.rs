// SPDX-License-Identifier: MIT
//
// Raster normalizer — converts an arbitrary input encoding into a
// canonical PNG, flattened onto a white background, immediately before
// export. PDF embedding renders transparent regions unpredictably, so
// every page goes through this step; a page whose conversion fails falls
// back to its original encoding rather than failing the export.

use std::sync::Arc;

use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbaImage};
use tracing::{debug, instrument, warn};

use blattwerk_core::error::BlattwerkError;

/// One page's bytes after normalization.
#[derive(Debug, Clone)]
pub struct NormalizedPage {
    pub bytes: Arc<Vec<u8>>,
    /// False when normalization failed and `bytes` is the original encoding.
    pub flattened: bool,
}

/// Decode `bytes`, composite onto an opaque white canvas of the same
/// dimensions, and re-encode as PNG.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn flatten_to_png(bytes: &[u8]) -> Result<Vec<u8>, BlattwerkError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|err| BlattwerkError::ImageDecode(err.to_string()))?;

    let (width, height) = (decoded.width(), decoded.height());
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &decoded.to_rgba8(), 0, 0);

    // RGB8 output: the alpha channel is spent after compositing.
    let flattened = DynamicImage::ImageRgba8(canvas).to_rgb8();
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    DynamicImage::ImageRgb8(flattened)
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| BlattwerkError::ImageDecode(format!("PNG encoding failed: {err}")))?;

    debug!(width, height, out_len = buffer.len(), "page flattened");
    Ok(buffer)
}

/// Infallible wrapper around [`flatten_to_png`].
///
/// Failures are logged and the original encoding is kept — export degrades
/// per page, it never aborts on one bad image.
pub fn normalize_page(bytes: Arc<Vec<u8>>) -> NormalizedPage {
    match flatten_to_png(&bytes) {
        Ok(png) => NormalizedPage {
            bytes: Arc::new(png),
            flattened: true,
        },
        Err(err) => {
            warn!(error = %err, "normalization failed — keeping original encoding");
            NormalizedPage {
                bytes,
                flattened: false,
            }
        }
    }
}

/// Normalize every page concurrently and join in order.
///
/// One blocking task per page; a panicked task degrades to the original
/// bytes the same way a decode failure does.
pub async fn normalize_all(pages: Vec<Arc<Vec<u8>>>) -> Vec<NormalizedPage> {
    let handles: Vec<_> = pages
        .iter()
        .map(|bytes| {
            let bytes = Arc::clone(bytes);
            tokio::task::spawn_blocking(move || normalize_page(bytes))
        })
        .collect();

    let mut normalized = Vec::with_capacity(handles.len());
    for (handle, original) in handles.into_iter().zip(pages) {
        match handle.await {
            Ok(page) => normalized.push(page),
            Err(err) => {
                warn!(error = %err, "normalization task panicked — keeping original encoding");
                normalized.push(NormalizedPage {
                    bytes: original,
                    flattened: false,
                });
            }
        }
    }
    normalized
}
