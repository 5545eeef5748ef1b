// SPDX-License-Identifier: MIT
//
// PDF writer — one page per image using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by
// constructing `PdfPage` structs containing `Vec<Op>` operation lists,
// then serialised via `PdfDocument::save()`.

use blattwerk_core::error::BlattwerkError;
use blattwerk_core::types::PaperSize;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

/// Assembles a multi-page PDF with one raster image per page.
///
/// Pages share a fixed geometry; each image is scaled to fit inside the
/// page margins while preserving its aspect ratio, and centered. Images
/// are never upscaled past their natural print size.
pub struct PdfWriter {
    /// Paper size for every page.
    paper_size: PaperSize,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

/// Print density used to derive an image's natural page size.
const DPI: f32 = 150.0;
/// Page margin on all four sides.
const MARGIN_MM: f32 = 15.0;

impl PdfWriter {
    /// Create a new writer targeting the given paper size.
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            title: None,
        }
    }

    /// Create a new writer defaulting to A4.
    pub fn a4() -> Self {
        Self::new(PaperSize::A4)
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    /// Build a document with one page per encoded image, in input order.
    ///
    /// Any image that fails to decode fails the whole render: pages handed
    /// here have already been through normalization, so a decode failure
    /// at this point means the source file itself is unusable.
    #[instrument(skip(self, images), fields(count = images.len()))]
    pub fn create_from_images<B: AsRef<[u8]>>(
        &self,
        images: &[B],
    ) -> Result<Vec<u8>, BlattwerkError> {
        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Blattwerk Document");

        info!(paper = ?self.paper_size, title, "rendering document");

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(images.len());

        for (index, encoded) in images.iter().enumerate() {
            let encoded = encoded.as_ref();
            let decoded = ::image::load_from_memory(encoded).map_err(|err| {
                BlattwerkError::PdfRender(format!("page {}: image decode failed: {err}", index + 1))
            })?;

            let img_width = decoded.width() as usize;
            let img_height = decoded.height() as usize;

            // printpdf wants raw RGB8 pixel data.
            let rgb_image = decoded.to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb_image.into_raw()),
                width: img_width,
                height: img_height,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let usable_w_pt = Mm(page_w.0 - 2.0 * MARGIN_MM).into_pt().0;
            let usable_h_pt = Mm(page_h.0 - 2.0 * MARGIN_MM).into_pt().0;

            // Natural size of the image at the chosen print density.
            let img_w_pt = img_width as f32 / DPI * 72.0;
            let img_h_pt = img_height as f32 / DPI * 72.0;

            // Scale to fit while preserving aspect ratio; do not upscale.
            let scale_x = usable_w_pt / img_w_pt;
            let scale_y = usable_h_pt / img_h_pt;
            let scale = scale_x.min(scale_y).min(1.0);

            let rendered_w_pt = img_w_pt * scale;
            let rendered_h_pt = img_h_pt * scale;

            // Centre the image on the page.
            let margin_pt = Mm(MARGIN_MM).into_pt().0;
            let x_offset = margin_pt + (usable_w_pt - rendered_w_pt) / 2.0;
            let y_offset = margin_pt + (usable_h_pt - rendered_h_pt) / 2.0;

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(x_offset)),
                    translate_y: Some(Pt(y_offset)),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    dpi: Some(DPI),
                    rotate: None,
                },
            }];

            debug!(page = index + 1, rendered_w_pt, rendered_h_pt, scale, "image placed on page");
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        debug!(bytes = output.len(), "document serialised");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([40, 80, 120]));
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        DynamicImage::ImageRgb8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn page_count(pdf_bytes: &[u8]) -> usize {
        lopdf::Document::load_mem(pdf_bytes).unwrap().get_pages().len()
    }

    #[test]
    fn one_page_per_image() {
        let images = vec![encoded_png(8, 8), encoded_png(16, 4), encoded_png(3, 9)];
        let bytes = PdfWriter::a4().create_from_images(&images).unwrap();
        assert_eq!(page_count(&bytes), 3);
    }

    #[test]
    fn empty_input_yields_empty_document() {
        let bytes = PdfWriter::a4()
            .create_from_images(&Vec::<Vec<u8>>::new())
            .unwrap();
        assert_eq!(page_count(&bytes), 0);
    }

    #[test]
    fn mixed_encodings_render() {
        // A JPEG page alongside PNGs, the shape of a normalization fallback.
        let img = RgbImage::from_pixel(6, 6, Rgb([200, 10, 10]));
        let mut jpeg = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 90);
        img.write_with_encoder(encoder).unwrap();

        let images = vec![encoded_png(8, 8), jpeg, encoded_png(8, 8)];
        let bytes = PdfWriter::a4().create_from_images(&images).unwrap();
        assert_eq!(page_count(&bytes), 3);
    }

    #[test]
    fn undecodable_image_fails_the_render() {
        let images = vec![encoded_png(4, 4), vec![0u8; 32]];
        let err = PdfWriter::a4().create_from_images(&images).unwrap_err();
        assert!(matches!(err, BlattwerkError::PdfRender(_)));
    }
}
