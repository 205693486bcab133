// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion façade — one pipeline per format pair.
//
// Every pipeline is a short sequence: parse the input with a document
// library, map its structure onto the target format, write the output and
// verify it. Progress is reported through a caller-supplied callback with
// monotonically increasing percentages that end at 100 on success. Failures
// inside a pipeline come back as `ConversionFailed` naming the conversion.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, error, info, instrument, warn};
use wandler_core::error::{Result, WandlerError};
use wandler_core::{AppConfig, ConversionKind, ConversionOutcome, Progress, dotted_extension};

use crate::image::processor::ImageProcessor;
use crate::office::OfficeSuite;
use crate::ooxml::docx::{DocxBuilder, WordDocument};
use crate::ooxml::pptx::{PptxBuilder, Presentation};
use crate::pdf::reader::PdfReader;
use crate::pdf::writer::{BlockStyle, PdfWriter, TextBlock};
use crate::slides;
use crate::text::sanitize;

/// Smallest plausible .docx package: anything shorter is treated as a
/// failed write.
const MIN_DOCX_BYTES: u64 = 512;

/// Separator paragraph written between slides in PowerPoint → Word output.
const SLIDE_SEPARATOR_WIDTH: usize = 50;

/// Callback receiving progress reports.
pub type ProgressFn<'a> = &'a mut dyn FnMut(Progress);

/// Check that `inputs` are acceptable for `kind`.
pub fn validate(kind: ConversionKind, inputs: &[PathBuf]) -> Result<()> {
    if inputs.is_empty() {
        return Err(WandlerError::NoInput);
    }
    if kind == ConversionKind::EditPdf {
        return Err(WandlerError::UnsupportedConversion(
            kind.display_name().to_string(),
        ));
    }
    if inputs.len() > 1 && !kind.allows_multiple_inputs() {
        return Err(WandlerError::UnsupportedConversion(format!(
            "{} with {} files",
            kind.display_name(),
            inputs.len()
        )));
    }

    for input in inputs {
        if !kind.accepts(input) {
            return Err(WandlerError::IncompatibleFile {
                extension: dotted_extension(input),
                conversion: kind.display_name().to_string(),
            });
        }
        if !input.is_file() {
            return Err(WandlerError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", input.display()),
            )));
        }
    }

    Ok(())
}

/// File name of the output for `inputs`: `<stem>_converted<ext>`, or a
/// timestamped name for a multi-image PDF.
pub fn output_file_name(kind: ConversionKind, inputs: &[PathBuf], now: DateTime<Local>) -> String {
    if kind == ConversionKind::ImageToPdf && inputs.len() > 1 {
        return format!("multi_image_converted_{}.pdf", now.format("%Y%m%d_%H%M%S"));
    }

    let stem = inputs
        .first()
        .and_then(|input| input.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    format!("{stem}_converted{}", kind.output_extension())
}

/// Full output path. `output_dir` defaults to the first input's directory.
pub fn output_path(
    kind: ConversionKind,
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    now: DateTime<Local>,
) -> PathBuf {
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| {
            inputs
                .first()
                .and_then(|input| input.parent())
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(output_file_name(kind, inputs, now))
}

/// Runs conversions with the settings it was built from.
#[derive(Debug, Clone, Default)]
pub struct DocumentConverter {
    config: AppConfig,
}

impl DocumentConverter {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Validate, name the output, and run the pipeline for `kind`.
    ///
    /// Validation errors are returned as they are; anything that goes wrong
    /// inside the pipeline is wrapped as `ConversionFailed`.
    #[instrument(skip(self, inputs, progress), fields(kind = %kind, inputs = inputs.len()))]
    pub fn convert(
        &self,
        kind: ConversionKind,
        inputs: &[PathBuf],
        output_dir: Option<&Path>,
        progress: ProgressFn<'_>,
    ) -> Result<ConversionOutcome> {
        validate(kind, inputs)?;

        let output_dir = output_dir.or(self.config.default_output_dir.as_deref());
        let output = output_path(kind, inputs, output_dir, Local::now());
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!(output = %output.display(), "Conversion started");
        let result = match kind {
            ConversionKind::PdfToWord => self.run_pdf_to_word(&inputs[0], &output, progress),
            ConversionKind::WordToPdf => self.run_word_to_pdf(&inputs[0], &output, progress),
            ConversionKind::WordToPpt => self.run_word_to_ppt(&inputs[0], &output, progress),
            ConversionKind::PptToWord => self.run_ppt_to_word(&inputs[0], &output, progress),
            ConversionKind::ImageToPdf if inputs.len() > 1 => {
                self.run_images_to_pdf(inputs, &output, progress)
            }
            ConversionKind::ImageToPdf => self.run_image_to_pdf(&inputs[0], &output, progress),
            ConversionKind::EditPdf => Err(WandlerError::UnsupportedConversion(
                kind.display_name().to_string(),
            )),
        };

        let detail = match result.and_then(|detail| verify_output(&output).map(|()| detail)) {
            Ok(detail) => detail,
            Err(err) => {
                error!(%err, "Conversion failed");
                return Err(match err {
                    failed @ WandlerError::ConversionFailed { .. } => failed,
                    other => WandlerError::ConversionFailed {
                        conversion: kind.failure_label(inputs.len()).to_string(),
                        reason: other.to_string(),
                    },
                });
            }
        };

        let output_size = std::fs::metadata(&output)?.len();
        info!(output = %output.display(), output_size, "Conversion finished");
        Ok(ConversionOutcome {
            kind,
            inputs: inputs.to_vec(),
            output,
            output_size,
            detail,
        })
    }

    // -- Per-pair entry points --------------------------------------------------

    pub fn pdf_to_word(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
        progress: ProgressFn<'_>,
    ) -> Result<ConversionOutcome> {
        self.convert(ConversionKind::PdfToWord, &[input.to_path_buf()], output_dir, progress)
    }

    pub fn word_to_pdf(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
        progress: ProgressFn<'_>,
    ) -> Result<ConversionOutcome> {
        self.convert(ConversionKind::WordToPdf, &[input.to_path_buf()], output_dir, progress)
    }

    pub fn word_to_ppt(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
        progress: ProgressFn<'_>,
    ) -> Result<ConversionOutcome> {
        self.convert(ConversionKind::WordToPpt, &[input.to_path_buf()], output_dir, progress)
    }

    pub fn ppt_to_word(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
        progress: ProgressFn<'_>,
    ) -> Result<ConversionOutcome> {
        self.convert(ConversionKind::PptToWord, &[input.to_path_buf()], output_dir, progress)
    }

    pub fn image_to_pdf(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
        progress: ProgressFn<'_>,
    ) -> Result<ConversionOutcome> {
        self.convert(ConversionKind::ImageToPdf, &[input.to_path_buf()], output_dir, progress)
    }

    /// Several images into one PDF, one page each, in the given order.
    pub fn multi_image_to_pdf(
        &self,
        inputs: &[PathBuf],
        output_dir: Option<&Path>,
        progress: ProgressFn<'_>,
    ) -> Result<ConversionOutcome> {
        self.convert(ConversionKind::ImageToPdf, inputs, output_dir, progress)
    }

    // -- Pipelines --------------------------------------------------------------

    fn run_pdf_to_word(
        &self,
        input: &Path,
        output: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<Option<String>> {
        progress(Progress::new(10, "Initializing PDF conversion..."));
        let reader = PdfReader::open(input)?;
        if reader.is_encrypted() {
            return Err(WandlerError::PasswordProtected);
        }

        progress(Progress::new(30, "Analyzing PDF structure..."));
        let total = reader.page_count();
        let metadata = reader.metadata();

        progress(Progress::new(50, "Converting pages..."));
        let mut builder = DocxBuilder::new();
        if let Some(title) = metadata.title {
            builder.set_title(title);
        }
        if let Some(author) = metadata.author {
            builder.set_author(author);
        }

        for page_number in 1..=total {
            if page_number > 1 {
                builder.add_page_break();
            }
            let text = reader.page_text(page_number).unwrap_or_else(|err| {
                warn!(page_number, %err, "Text extraction failed, page left empty");
                String::new()
            });
            for paragraph in text_paragraphs(&text) {
                builder.add_paragraph(paragraph);
            }
            progress(Progress::new(
                50.0 + 35.0 * page_number as f64 / total as f64,
                format!("Converting page {page_number} of {total}..."),
            ));
        }

        progress(Progress::new(90, "Finalizing document..."));
        builder.save(output)?;
        let size = std::fs::metadata(output)?.len();
        if size < MIN_DOCX_BYTES {
            return Err(WandlerError::OoxmlError(
                "output file is empty or corrupted".into(),
            ));
        }

        progress(Progress::new(100, "PDF to Word conversion completed!"));
        Ok(Some(format!("Converted {total} pages")))
    }

    fn run_word_to_pdf(
        &self,
        input: &Path,
        output: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<Option<String>> {
        progress(Progress::new(10, "Loading Word document..."));

        if let Some(suite) = OfficeSuite::locate(&self.config) {
            progress(Progress::new(30, "Converting with office suite..."));
            match suite.convert_to_pdf(input, output) {
                Ok(()) => {
                    progress(Progress::new(100, "Word to PDF conversion completed!"));
                    return Ok(Some(format!(
                        "Converted with {}",
                        suite.command().display()
                    )));
                }
                Err(err) => warn!(%err, "Office suite conversion failed, using built-in renderer"),
            }
        }

        progress(Progress::new(50, "Rendering document..."));
        match self.render_word_document(input, output) {
            Ok(paragraphs) => {
                progress(Progress::new(100, "Word to PDF conversion completed!"));
                Ok(Some(format!("Rendered {paragraphs} paragraphs")))
            }
            Err(err) => {
                warn!(%err, "Built-in renderer failed");
                Err(WandlerError::ConversionFailed {
                    conversion: ConversionKind::WordToPdf.failure_label(1).to_string(),
                    reason: "All conversion methods failed".to_string(),
                })
            }
        }
    }

    /// Lay the document out with the built-in renderer. Returns the number
    /// of paragraphs written.
    fn render_word_document(&self, input: &Path, output: &Path) -> Result<usize> {
        let document = WordDocument::open(input)?;

        let mut blocks = Vec::new();
        if let Some(title) = &document.properties.title {
            blocks.push(TextBlock::new(title.clone(), BlockStyle::Title));
        }
        for paragraph in document.non_empty_paragraphs() {
            blocks.push(TextBlock::new(
                paragraph.text.clone(),
                block_style(paragraph.style.as_deref()),
            ));
        }

        let mut writer = PdfWriter::new(self.config.paper_size);
        if let Some(title) = &document.properties.title {
            writer.set_title(title.clone());
        }
        writer.write_blocks_to_file(&blocks, output)?;
        Ok(blocks.len())
    }

    fn run_word_to_ppt(
        &self,
        input: &Path,
        output: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<Option<String>> {
        progress(Progress::new(10, "Loading Word document..."));
        let document = WordDocument::open(input)?;

        progress(Progress::new(30, "Analyzing document structure..."));
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let slides = slides::segment(
            document
                .paragraphs
                .iter()
                .map(|paragraph| (paragraph.text.as_str(), paragraph.style.as_deref())),
            &stem,
        );

        let total = slides.len();
        let mut builder = PptxBuilder::new();
        builder.set_title(document.properties.title.clone().unwrap_or(stem));
        for (index, slide) in slides.iter().enumerate() {
            builder.add_slide(slide);
            progress(Progress::new(
                30.0 + 60.0 * (index + 1) as f64 / total as f64,
                format!("Creating slide {} of {total}...", index + 1),
            ));
        }

        progress(Progress::new(90, "Saving presentation..."));
        builder.save(output)?;

        progress(Progress::new(100, format!("Created {total} slides successfully!")));
        Ok(Some(format!("Created {total} slides")))
    }

    fn run_ppt_to_word(
        &self,
        input: &Path,
        output: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<Option<String>> {
        progress(Progress::new(10, "Loading PowerPoint presentation..."));
        let presentation = Presentation::open(input)?;
        let total = presentation.slide_count();

        progress(Progress::new(30, "Creating Word document..."));
        let name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut builder = DocxBuilder::new();
        builder
            .set_title(format!("Converted from {name}"))
            .add_heading(format!("Converted from {name}"), 0)
            .add_paragraph(format!(
                "Conversion date: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            ))
            .add_paragraph(format!("Total slides: {total}"))
            .add_page_break();

        progress(Progress::new(50, "Processing slides..."));
        let separator = "\u{2500}".repeat(SLIDE_SEPARATOR_WIDTH);
        for (index, slide) in presentation.slides.iter().enumerate() {
            let number = index + 1;
            progress(Progress::new(
                50.0 + 30.0 * index as f64 / total as f64,
                format!("Processing slide {number}..."),
            ));

            builder.add_heading(format!("Slide {number}"), 1);
            let texts: Vec<String> = slide
                .shapes
                .iter()
                .flat_map(|shape| shape.paragraphs.iter())
                .map(|paragraph| sanitize(paragraph))
                .filter(|text| !text.is_empty())
                .collect();
            if texts.is_empty() {
                builder.add_paragraph("[No text content found in this slide]");
            }
            for text in texts {
                builder.add_paragraph(text);
            }

            if number < total {
                builder.add_paragraph(separator.as_str());
            }
        }

        progress(Progress::new(90, "Saving Word document..."));
        builder.save(output)?;

        progress(Progress::new(100, "PowerPoint to Word conversion completed!"));
        Ok(Some(format!("Extracted {total} slides")))
    }

    fn run_image_to_pdf(
        &self,
        input: &Path,
        output: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<Option<String>> {
        progress(Progress::new(10, "Loading image..."));
        let processor = ImageProcessor::open(input)?;

        progress(Progress::new(30, "Processing image..."));
        let processor = processor.flatten_to_rgb();

        progress(Progress::new(50, "Enhancing image quality..."));
        let image = processor
            .prepare_for_pdf(self.config.enhance_images, self.config.max_image_dimension)
            .into_dynamic();

        progress(Progress::new(70, "Creating PDF..."));
        let writer = PdfWriter::new(self.config.paper_size);
        let bytes = writer.create_from_images(std::slice::from_ref(&image))?;

        progress(Progress::new(90, "Saving PDF..."));
        std::fs::write(output, &bytes)?;

        progress(Progress::new(100, "Image to PDF conversion completed!"));
        Ok(Some(format!("{} x {} pixels", image.width(), image.height())))
    }

    fn run_images_to_pdf(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<Option<String>> {
        let total = inputs.len();
        progress(Progress::new(5, "Starting multi-image conversion..."));

        let mut images = Vec::with_capacity(total);
        for (index, input) in inputs.iter().enumerate() {
            progress(Progress::new(
                10.0 + 70.0 * index as f64 / total as f64,
                format!("Processing image {} of {total}...", index + 1),
            ));
            let image = ImageProcessor::open(input)?
                .prepare_for_pdf(self.config.enhance_images, self.config.max_image_dimension)
                .into_dynamic();
            debug!(index, width = image.width(), height = image.height(), "Image prepared");
            images.push(image);
        }

        progress(Progress::new(85, "Creating PDF from processed images..."));
        let writer = PdfWriter::new(self.config.paper_size);
        writer.write_images_to_file(&images, output)?;

        progress(Progress::new(
            100,
            format!("Multi-image PDF created with {total} images!"),
        ));
        Ok(Some(format!("Combined {total} images")))
    }
}

/// Map a Word style name onto the PDF renderer's block styles.
fn block_style(style: Option<&str>) -> BlockStyle {
    match style {
        Some("Title") => BlockStyle::Title,
        Some(name) if name.starts_with("Heading") => {
            let level = name
                .trim_start_matches("Heading")
                .trim()
                .parse::<u8>()
                .unwrap_or(1);
            BlockStyle::Heading(level.max(1))
        }
        _ => BlockStyle::Body,
    }
}

/// Group extracted page lines into paragraphs: consecutive non-blank lines
/// join with a space, blank lines end a paragraph.
fn text_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.lines() {
        let line = sanitize(line);
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

/// The output must exist and hold at least one byte.
fn verify_output(output: &Path) -> Result<()> {
    match std::fs::metadata(output) {
        Ok(metadata) if metadata.len() > 0 => Ok(()),
        Ok(_) => Err(WandlerError::PdfError(format!(
            "{} is empty",
            output.display()
        ))),
        Err(err) => Err(WandlerError::Io(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
    use chrono::TimeZone;

    use crate::pdf::test_support::{encrypted_pdf_bytes, pdf_bytes};
    use crate::slides::SlideContent;

    fn no_office() -> DocumentConverter {
        DocumentConverter::new(AppConfig {
            use_office_suite: false,
            ..AppConfig::default()
        })
    }

    #[test]
    fn validation_reports_each_problem() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("a.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();

        assert!(matches!(
            validate(ConversionKind::PdfToWord, &[]),
            Err(WandlerError::NoInput)
        ));

        let err = validate(ConversionKind::WordToPdf, &[pdf.clone()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Selected file type (.pdf) is not compatible with Word Document to PDF"
        );

        assert!(matches!(
            validate(ConversionKind::EditPdf, &[pdf.clone()]),
            Err(WandlerError::UnsupportedConversion(_))
        ));
        assert!(matches!(
            validate(ConversionKind::PdfToWord, &[pdf.clone(), pdf.clone()]),
            Err(WandlerError::UnsupportedConversion(_))
        ));
        assert!(matches!(
            validate(ConversionKind::PdfToWord, &[dir.path().join("missing.pdf")]),
            Err(WandlerError::Io(_))
        ));
        assert!(validate(ConversionKind::PdfToWord, &[pdf]).is_ok());
    }

    #[test]
    fn output_names_follow_conventions() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let single = vec![PathBuf::from("/docs/Quarterly Report.docx")];
        assert_eq!(
            output_path(ConversionKind::WordToPdf, &single, None, now),
            PathBuf::from("/docs/Quarterly Report_converted.pdf")
        );
        assert_eq!(
            output_file_name(ConversionKind::WordToPpt, &single, now),
            "Quarterly Report_converted.pptx"
        );

        let many = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        assert_eq!(
            output_path(ConversionKind::ImageToPdf, &many, Some(Path::new("/out")), now),
            PathBuf::from("/out/multi_image_converted_20240305_140709.pdf")
        );
        assert_eq!(
            output_path(ConversionKind::ImageToPdf, &many[..1], None, now),
            PathBuf::from("./a_converted.pdf")
        );
    }

    #[test]
    fn text_lines_group_into_paragraphs() {
        let text = "First line\ncontinues here\n\n\nSecond\tpara\n";
        assert_eq!(
            text_paragraphs(text),
            vec!["First line continues here", "Second para"]
        );
    }

    #[test]
    fn style_names_map_to_block_styles() {
        assert_eq!(block_style(Some("Title")), BlockStyle::Title);
        assert_eq!(block_style(Some("Heading 2")), BlockStyle::Heading(2));
        assert_eq!(block_style(Some("Heading")), BlockStyle::Heading(1));
        assert_eq!(block_style(Some("Normal")), BlockStyle::Body);
        assert_eq!(block_style(None), BlockStyle::Body);
    }

    #[test]
    fn pdf_to_word_writes_page_text() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("report.pdf");
        std::fs::write(&input, pdf_bytes(&["Hello from page one", "And page two"])).unwrap();

        let mut seen = Vec::new();
        let outcome = no_office()
            .pdf_to_word(&input, None, &mut |p| seen.push(p))
            .unwrap();
        assert_eq!(outcome.output, dir.path().join("report_converted.docx"));
        assert!(outcome.output_size > 0);

        let percents: Vec<u8> = seen.iter().map(|p| p.percent).collect();
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(percents.last(), Some(&100));

        let document = WordDocument::open(&outcome.output).unwrap();
        let texts: Vec<&str> = document
            .non_empty_paragraphs()
            .map(|p| p.text.as_str())
            .collect();
        assert!(texts.iter().any(|t| t.contains("Hello from page one")));
        assert!(texts.iter().any(|t| t.contains("And page two")));
    }

    #[test]
    fn broken_pdf_fails_with_conversion_label() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.pdf");
        std::fs::write(&input, b"not a pdf at all").unwrap();

        let err = no_office()
            .pdf_to_word(&input, None, &mut |_| {})
            .unwrap_err();
        assert!(err.to_string().starts_with("PDF to Word conversion failed: "));
    }

    #[test]
    fn locked_pdf_asks_to_be_unlocked() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("locked.pdf");
        std::fs::write(&input, encrypted_pdf_bytes(&["secret"], "hunter2")).unwrap();

        let err = no_office()
            .pdf_to_word(&input, None, &mut |_| {})
            .unwrap_err();
        match err {
            WandlerError::ConversionFailed { conversion, reason } => {
                assert_eq!(conversion, "PDF to Word");
                assert_eq!(reason, "PDF is password protected. Please unlock it first.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!dir.path().join("locked_converted.docx").exists());
    }

    #[test]
    fn unreadable_images_fail_as_multi_image() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.png");
        let second = dir.path().join("b.png");
        std::fs::write(&first, b"not a png").unwrap();
        std::fs::write(&second, b"nor this").unwrap();

        let err = no_office()
            .multi_image_to_pdf(&[first, second], None, &mut |_| {})
            .unwrap_err();
        assert!(err.to_string().starts_with("Multi-image to PDF conversion failed: "));
    }

    #[test]
    fn word_to_pdf_falls_back_to_builtin_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("memo.docx");
        let mut builder = DocxBuilder::new();
        builder
            .set_title("Memo")
            .add_heading("Summary", 1)
            .add_paragraph("Everything is on track.");
        builder.save(&input).unwrap();

        let outcome = no_office()
            .word_to_pdf(&input, None, &mut |_| {})
            .unwrap();
        assert_eq!(outcome.output, dir.path().join("memo_converted.pdf"));
        assert!(PdfReader::open(&outcome.output).unwrap().page_count() >= 1);
    }

    #[test]
    fn legacy_word_file_fails_every_method() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("old.doc");
        std::fs::write(&input, b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1 legacy").unwrap();

        let err = no_office()
            .word_to_pdf(&input, None, &mut |_| {})
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Word to PDF conversion failed: All conversion methods failed"
        );
    }

    #[test]
    fn word_to_ppt_and_back_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plan.docx");
        let mut builder = DocxBuilder::new();
        builder
            .add_heading("Goals", 1)
            .add_paragraph("grow revenue by ten percent.")
            .add_heading("Risks", 1)
            .add_paragraph("supply chain delays.");
        builder.save(&input).unwrap();

        let converter = no_office();
        let mut last = None;
        let outcome = converter
            .word_to_ppt(&input, None, &mut |p| last = Some(p))
            .unwrap();
        assert_eq!(last.unwrap().message, "Created 2 slides successfully!");
        assert_eq!(outcome.detail.as_deref(), Some("Created 2 slides"));

        let deck = Presentation::open(&outcome.output).unwrap();
        assert_eq!(deck.slide_count(), 2);
        assert_eq!(deck.slides[1].shapes[0].text(), "Risks");

        let back = converter
            .ppt_to_word(&outcome.output, None, &mut |_| {})
            .unwrap();
        let document = WordDocument::open(&back.output).unwrap();
        let texts: Vec<&str> = document
            .non_empty_paragraphs()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(texts[0], "Converted from plan_converted.pptx");
        assert!(texts[1].starts_with("Conversion date: "));
        assert_eq!(texts[2], "Total slides: 2");
        assert!(texts.contains(&"Slide 1"));
        assert!(texts.contains(&"supply chain delays."));
        let separators = texts.iter().filter(|t| t.starts_with('\u{2500}')).count();
        assert_eq!(separators, 1);
    }

    #[test]
    fn empty_slides_get_placeholder_text() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("deck.pptx");
        let mut builder = PptxBuilder::new();
        builder.add_slide(&SlideContent {
            title: String::new(),
            bullets: Vec::new(),
        });
        builder.save(&input).unwrap();

        let outcome = no_office().ppt_to_word(&input, None, &mut |_| {}).unwrap();
        let document = WordDocument::open(&outcome.output).unwrap();
        assert!(document
            .paragraphs
            .iter()
            .any(|p| p.text == "[No text content found in this slide]"));
    }

    #[test]
    fn images_become_one_page_each() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.png");
        let second = dir.path().join("b.png");
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 20, Rgba([0, 128, 255, 100])))
            .save(&first)
            .unwrap();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 30, Rgb([10, 10, 10])))
            .save(&second)
            .unwrap();

        let converter = no_office();
        let single = converter.image_to_pdf(&first, None, &mut |_| {}).unwrap();
        assert_eq!(single.output, dir.path().join("a_converted.pdf"));
        assert_eq!(PdfReader::open(&single.output).unwrap().page_count(), 1);

        let mut seen = Vec::new();
        let multi = converter
            .multi_image_to_pdf(&[first, second], None, &mut |p| seen.push(p))
            .unwrap();
        let name = multi.output.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("multi_image_converted_"));
        assert_eq!(PdfReader::open(&multi.output).unwrap().page_count(), 2);
        assert_eq!(seen.first().unwrap().percent, 5);
        assert_eq!(
            seen.last().unwrap().message,
            "Multi-image PDF created with 2 images!"
        );
    }
}
