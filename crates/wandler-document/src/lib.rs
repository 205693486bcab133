// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// wandler-document — Document conversion for the Wandler desktop utility.
//
// Provides the conversion façade (one method per format pair), the batch
// wrapper, file inspection, a stateful PDF page editor, and the format
// plumbing underneath: PDF via lopdf/printpdf, images via `image`, and
// .docx/.pptx packages via zip + quick-xml.

pub mod batch;
pub mod convert;
pub mod image;
pub mod inspect;
pub mod office;
pub mod ooxml;
pub mod pdf;
pub mod slides;
pub mod text;

// Re-export the primary structs so callers can use `wandler_document::PdfEditor` etc.
pub use batch::batch_convert;
pub use convert::DocumentConverter;
pub use crate::image::processor::ImageProcessor;
pub use inspect::inspect;
pub use ooxml::docx::{DocxBuilder, WordDocument};
pub use ooxml::pptx::{PptxBuilder, Presentation};
pub use pdf::editor::PdfEditor;
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
