// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — create new PDF documents from styled text blocks or images
// using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use ::image::DynamicImage;
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};
use wandler_core::PaperSize;
use wandler_core::error::WandlerError;

/// Page margin for text layout.
const MARGIN_MM: f32 = 20.0;
/// Vertical gap after every block.
const BLOCK_SPACING_PT: f32 = 12.0;
/// Line height as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.3;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;
/// Resolution at which image pixels map one-to-one onto points.
const POINTS_DPI: f32 = 72.0;
/// Stand-in for characters the built-in fonts cannot show.
const MISSING_GLYPH: char = '?';

/// How a block of text is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// Document title, 18 pt bold.
    Title,
    /// Heading of the given level (1 is the largest), bold.
    Heading(u8),
    /// Body text, 11 pt.
    Body,
}

impl BlockStyle {
    fn font(&self) -> BuiltinFont {
        match self {
            BlockStyle::Body => BuiltinFont::Helvetica,
            _ => BuiltinFont::HelveticaBold,
        }
    }

    fn size_pt(&self) -> f32 {
        match self {
            BlockStyle::Title => 18.0,
            BlockStyle::Heading(1) => 16.0,
            BlockStyle::Heading(2) => 14.0,
            BlockStyle::Heading(_) => 12.0,
            BlockStyle::Body => 11.0,
        }
    }
}

/// One paragraph of text to lay out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub text: String,
    pub style: BlockStyle,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, style: BlockStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Creates new PDF documents from text content or raster images.
pub struct PdfWriter {
    /// Paper size for page creation.
    paper_size: PaperSize,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a new writer targeting the given paper size.
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            title: None,
        }
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

    // -- Text to PDF ----------------------------------------------------------

    /// Lay out styled blocks top to bottom with the built-in Helvetica fonts.
    ///
    /// Lines wrap at an estimated glyph width and pages break automatically.
    /// The built-in fonts only cover WinAnsi (Latin-1 plus the Windows-1252
    /// punctuation); any other character is written as `?`.
    #[instrument(skip(self, blocks), fields(blocks = blocks.len()))]
    pub fn create_from_blocks(&self, blocks: &[TextBlock]) -> Result<Vec<u8>, WandlerError> {
        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Wandler Document");
        info!(paper = ?self.paper_size, title, "Creating text PDF");

        let margin_pt = Mm(MARGIN_MM).into_pt().0;
        let page_h_pt = page_h.into_pt().0;
        let usable_width_pt = page_w.into_pt().0 - 2.0 * margin_pt;

        let mut pages: Vec<PdfPage> = Vec::new();
        let mut ops: Vec<Op> = Vec::new();
        let mut cursor_pt = page_h_pt - margin_pt;
        let mut line_count = 0usize;
        let mut replaced = 0usize;

        for block in blocks {
            let size_pt = block.style.size_pt();
            let line_height_pt = size_pt * LINE_HEIGHT_FACTOR;
            let max_chars = (usable_width_pt / (AVG_GLYPH_WIDTH * size_pt)).max(1.0) as usize;

            for line in wrap_text(&block.text, max_chars) {
                if cursor_pt - line_height_pt < margin_pt {
                    pages.push(PdfPage::new(page_w, page_h, std::mem::take(&mut ops)));
                    cursor_pt = page_h_pt - margin_pt;
                }
                cursor_pt -= line_height_pt;
                line_count += 1;

                if line.is_empty() {
                    continue;
                }
                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(margin_pt),
                        y: Pt(cursor_pt),
                    },
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(size_pt),
                    font: block.style.font(),
                });
                let (line, missing) = winansi_text(&line);
                replaced += missing;
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(line)],
                    font: block.style.font(),
                });
                ops.push(Op::EndTextSection);
            }

            cursor_pt -= BLOCK_SPACING_PT;
        }

        if !ops.is_empty() || pages.is_empty() {
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        let mut doc = PdfDocument::new(title);
        doc.with_pages(pages);
        debug!(lines = line_count, pages = doc.pages.len(), "Text layout complete");
        if replaced > 0 {
            warn!(replaced, "Characters outside WinAnsi replaced in text PDF");
        }

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
    }

    // -- Images to PDF --------------------------------------------------------

    /// One page per image, each scaled to fill the page while keeping its
    /// aspect ratio, and centered.
    #[instrument(skip_all, fields(images = images.len()))]
    pub fn create_from_images(&self, images: &[DynamicImage]) -> Result<Vec<u8>, WandlerError> {
        if images.is_empty() {
            return Err(WandlerError::NoInput);
        }

        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Wandler Images");
        info!(paper = ?self.paper_size, title, "Creating image PDF");

        let page_w_pt = page_w.into_pt().0;
        let page_h_pt = page_h.into_pt().0;

        let mut doc = PdfDocument::new(title);
        let mut pages = Vec::with_capacity(images.len());

        for image in images {
            let (width, height) = (image.width(), image.height());
            if width == 0 || height == 0 {
                return Err(WandlerError::ImageError("image has no pixels".into()));
            }

            let raw = RawImage {
                pixels: RawImageData::U8(image.to_rgb8().into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let scale = (page_w_pt / width as f32).min(page_h_pt / height as f32);
            let rendered_w_pt = width as f32 * scale;
            let rendered_h_pt = height as f32 * scale;

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt((page_w_pt - rendered_w_pt) / 2.0)),
                    translate_y: Some(Pt((page_h_pt - rendered_h_pt) / 2.0)),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    dpi: Some(POINTS_DPI),
                    rotate: None,
                },
            }];
            debug!(width, height, scale, "Image placed on page");
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
    }

    // -- File output convenience ----------------------------------------------

    /// Lay out blocks and write the PDF directly to a file.
    pub fn write_blocks_to_file(
        &self,
        blocks: &[TextBlock],
        path: impl AsRef<Path>,
    ) -> Result<(), WandlerError> {
        let bytes = self.create_from_blocks(blocks)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote text PDF to {}", path.as_ref().display());
        Ok(())
    }

    /// Place images and write the PDF directly to a file.
    pub fn write_images_to_file(
        &self,
        images: &[DynamicImage],
        path: impl AsRef<Path>,
    ) -> Result<(), WandlerError> {
        let bytes = self.create_from_images(images)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote image PDF to {}", path.as_ref().display());
        Ok(())
    }
}

// -- Text helpers -------------------------------------------------------------

/// Whether a built-in (WinAnsiEncoding) font has a glyph for `c`.
fn has_winansi_glyph(c: char) -> bool {
    matches!(
        c,
        ' '..='~'
            | '\u{A0}'..='\u{FF}'
            | '€' | '‚' | 'ƒ' | '„' | '…' | '†' | '‡' | 'ˆ' | '‰' | 'Š' | '‹' | 'Œ' | 'Ž'
            | '‘' | '’' | '“' | '”' | '•' | '–' | '—' | '˜' | '™' | 'š' | '›' | 'œ' | 'ž'
            | 'Ÿ'
    )
}

/// Replace every character without a WinAnsi glyph by [`MISSING_GLYPH`],
/// returning the new text and how many characters were replaced.
fn winansi_text(text: &str) -> (String, usize) {
    let mut replaced = 0;
    let out = text
        .chars()
        .map(|c| {
            if has_winansi_glyph(c) {
                c
            } else {
                replaced += 1;
                MISSING_GLYPH
            }
        })
        .collect();
    (out, replaced)
}

/// Wrap text so that no line exceeds `max_width` characters.
///
/// Splits on existing newlines first, then word-wraps each line. Words
/// longer than `max_width` are broken on character boundaries.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(max_width).peekable();
                while let Some(chunk) = chunks.next() {
                    if chunks.peek().is_some() {
                        result.push(chunk.iter().collect());
                    } else {
                        current = chunk.iter().collect();
                        current_len = chunk.len();
                    }
                }
            } else if current.is_empty() {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
                current_len = word_len;
            }
        }

        result.push(current);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{Rgb, RgbImage};

    #[test]
    fn wrapping_respects_width_and_unicode() {
        let lines = wrap_text("aaa bbb ccc", 7);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);

        let lines = wrap_text("ééééé", 2);
        assert_eq!(lines, vec!["éé", "éé", "é"]);

        assert_eq!(wrap_text("one\n\ntwo", 10), vec!["one", "", "two"]);
    }

    #[test]
    fn text_outside_winansi_is_replaced() {
        assert_eq!(winansi_text("Grüße – “quoted” €5"), ("Grüße – “quoted” €5".to_string(), 0));
        assert_eq!(winansi_text("Привет, 世界"), ("??????, ??".to_string(), 8));
    }

    #[test]
    fn non_latin_text_still_yields_a_pdf() {
        let blocks = [TextBlock::new("Привет мир", BlockStyle::Body)];
        let bytes = PdfWriter::new(PaperSize::A4).create_from_blocks(&blocks).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn text_blocks_produce_loadable_pdf() {
        let mut writer = PdfWriter::new(PaperSize::A4);
        writer.set_title("Report");
        let mut blocks = vec![
            TextBlock::new("Report", BlockStyle::Title),
            TextBlock::new("Introduction", BlockStyle::Heading(1)),
        ];
        for i in 0..120 {
            blocks.push(TextBlock::new(
                format!("Paragraph {i} with enough words to need wrapping on a narrow line."),
                BlockStyle::Body,
            ));
        }

        let bytes = writer.create_from_blocks(&blocks).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn empty_block_list_still_yields_one_page() {
        let bytes = PdfWriter::new(PaperSize::A4).create_from_blocks(&[]).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn one_page_per_image() {
        let images: Vec<DynamicImage> = (0..3)
            .map(|i| DynamicImage::ImageRgb8(RgbImage::from_pixel(40 + i, 30, Rgb([200, 10, 10]))))
            .collect();
        let bytes = PdfWriter::new(PaperSize::A4).create_from_images(&images).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);

        assert!(matches!(
            PdfWriter::new(PaperSize::A4).create_from_images(&[]),
            Err(WandlerError::NoInput)
        ));
    }
}
