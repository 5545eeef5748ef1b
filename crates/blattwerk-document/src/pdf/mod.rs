// SPDX-License-Identifier: MIT
//
// PDF module — assembling the exported document.

pub mod writer;

pub use writer::PdfWriter;
