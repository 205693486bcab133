// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Wandler document converter.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// The operations selectable in the converter window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    PdfToWord,
    WordToPdf,
    WordToPpt,
    PptToWord,
    ImageToPdf,
    /// Not a conversion: opens the PDF editor on the selected file.
    EditPdf,
}

const PDF_EXTENSIONS: &[&str] = &[".pdf"];
const WORD_EXTENSIONS: &[&str] = &[".docx", ".doc"];
const POWERPOINT_EXTENSIONS: &[&str] = &[".pptx", ".ppt"];
const IMAGE_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".tiff", ".webp",
];

impl ConversionKind {
    /// Every kind, in the order the UI lists them.
    pub const ALL: [ConversionKind; 6] = [
        Self::PdfToWord,
        Self::WordToPdf,
        Self::WordToPpt,
        Self::PptToWord,
        Self::ImageToPdf,
        Self::EditPdf,
    ];

    /// Stable identifier (also the serde representation).
    pub fn id(&self) -> &'static str {
        match self {
            Self::PdfToWord => "pdf_to_word",
            Self::WordToPdf => "word_to_pdf",
            Self::WordToPpt => "word_to_ppt",
            Self::PptToWord => "ppt_to_word",
            Self::ImageToPdf => "image_to_pdf",
            Self::EditPdf => "edit_pdf",
        }
    }

    /// Long name used in dialogs and validation messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PdfToWord => "PDF to Word Document",
            Self::WordToPdf => "Word Document to PDF",
            Self::WordToPpt => "Word to PowerPoint Presentation",
            Self::PptToWord => "PowerPoint to Word Document",
            Self::ImageToPdf => "Image to PDF Document",
            Self::EditPdf => "Advanced PDF Editor",
        }
    }

    /// Short label for the option list, e.g. "PDF → Word".
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::PdfToWord => "PDF \u{2192} Word",
            Self::WordToPdf => "Word \u{2192} PDF",
            Self::WordToPpt => "Word \u{2192} PowerPoint",
            Self::PptToWord => "PowerPoint \u{2192} Word",
            Self::ImageToPdf => "Image \u{2192} PDF",
            Self::EditPdf => "PDF Editor",
        }
    }

    /// One-line description shown next to the option.
    pub fn description(&self) -> &'static str {
        match self {
            Self::PdfToWord => "Convert PDF to editable Word document",
            Self::WordToPdf => "Convert Word document to PDF",
            Self::WordToPpt => "Transform Word content to slides",
            Self::PptToWord => "Extract presentation text",
            Self::ImageToPdf => "Convert images to PDF",
            Self::EditPdf => "Open advanced PDF editor",
        }
    }

    /// Name used in "<name> conversion failed: ..." messages for a run over
    /// `inputs` files.
    pub fn failure_label(&self, inputs: usize) -> &'static str {
        match self {
            Self::ImageToPdf if inputs > 1 => "Multi-image to PDF",
            Self::PdfToWord => "PDF to Word",
            Self::WordToPdf => "Word to PDF",
            Self::WordToPpt => "Word to PowerPoint",
            Self::PptToWord => "PowerPoint to Word",
            Self::ImageToPdf => "Image to PDF",
            Self::EditPdf => "PDF edit",
        }
    }

    /// Extension (with leading dot) of the file this kind produces.
    pub fn output_extension(&self) -> &'static str {
        match self {
            Self::PdfToWord | Self::PptToWord => ".docx",
            Self::WordToPpt => ".pptx",
            Self::WordToPdf | Self::ImageToPdf | Self::EditPdf => ".pdf",
        }
    }

    /// Lower-case input extensions (with leading dot) this kind accepts.
    pub fn accepted_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::PdfToWord | Self::EditPdf => PDF_EXTENSIONS,
            Self::WordToPdf | Self::WordToPpt => WORD_EXTENSIONS,
            Self::PptToWord => POWERPOINT_EXTENSIONS,
            Self::ImageToPdf => IMAGE_EXTENSIONS,
        }
    }

    /// Whether the file's extension is valid input for this kind.
    pub fn accepts(&self, path: &Path) -> bool {
        let ext = dotted_extension(path);
        self.accepted_extensions().contains(&ext.as_str())
    }

    /// Whether more than one input file may be selected at once.
    pub fn allows_multiple_inputs(&self) -> bool {
        matches!(self, Self::ImageToPdf)
    }
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ConversionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| format!("Unsupported conversion type: {s}"))
    }
}

/// Lower-cased extension of `path` with a leading dot, or an empty string.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Broad family of a file, inferred from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    Pdf,
    Word,
    PowerPoint,
    Image,
    Unknown,
}

impl FileKind {
    /// Infer the family from a file path.
    pub fn from_path(path: &Path) -> Self {
        let ext = dotted_extension(path);
        let ext = ext.as_str();
        if PDF_EXTENSIONS.contains(&ext) {
            Self::Pdf
        } else if WORD_EXTENSIONS.contains(&ext) {
            Self::Word
        } else if POWERPOINT_EXTENSIONS.contains(&ext) {
            Self::PowerPoint
        } else if IMAGE_EXTENSIONS.contains(&ext) {
            Self::Image
        } else {
            Self::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF Document",
            Self::Word => "Word Document",
            Self::PowerPoint => "PowerPoint Presentation",
            Self::Image => "Image File",
            Self::Unknown => "Unknown",
        }
    }
}

/// Type-specific details gathered when inspecting a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileDetails {
    Pdf {
        pages: usize,
        encrypted: bool,
        title: Option<String>,
        author: Option<String>,
    },
    Word {
        /// Count of paragraphs with non-blank text.
        paragraphs: usize,
        title: Option<String>,
        author: Option<String>,
        subject: Option<String>,
    },
    PowerPoint {
        slides: usize,
    },
    Image {
        width: u32,
        height: u32,
        color_mode: String,
        format: String,
    },
    /// Unknown type, or the details could not be read.
    None,
}

/// Display record describing a selected file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Extension with leading dot, as written on disk.
    pub extension: String,
    pub modified: DateTime<Local>,
    pub kind: FileKind,
    pub details: FileDetails,
}

impl FileInfo {
    /// Multi-line text block for the file information panel.
    pub fn summary(&self) -> String {
        let mut text = format!(
            "File: {}\nSize: {}\nType: {}\nFormat: {}\nModified: {}\n\nAdditional Info:",
            self.name,
            format_file_size(self.size_bytes),
            self.kind.label(),
            self.extension.to_uppercase(),
            self.modified.format("%Y-%m-%d %H:%M:%S"),
        );

        match &self.details {
            FileDetails::Pdf {
                pages,
                encrypted,
                title,
                author,
            } => {
                text.push_str(&format!("\nPages: {pages}"));
                text.push_str(&format!(
                    "\nEncrypted: {}",
                    if *encrypted { "Yes" } else { "No" }
                ));
                if let Some(title) = title {
                    text.push_str(&format!("\nTitle: {title}"));
                }
                if let Some(author) = author {
                    text.push_str(&format!("\nAuthor: {author}"));
                }
            }
            FileDetails::Word {
                paragraphs,
                title,
                author,
                subject,
            } => {
                text.push_str(&format!("\nParagraphs: {paragraphs}"));
                for (label, value) in [("Title", title), ("Author", author), ("Subject", subject)] {
                    if let Some(value) = value {
                        text.push_str(&format!("\n{label}: {value}"));
                    }
                }
            }
            FileDetails::PowerPoint { slides } => {
                text.push_str(&format!("\nSlides: {slides}"));
            }
            FileDetails::Image {
                width,
                height,
                color_mode,
                format,
            } => {
                text.push_str(&format!("\nDimensions: {width} x {height}"));
                text.push_str(&format!("\nColor Mode: {color_mode}"));
                text.push_str(&format!("\nImage Format: {format}"));
            }
            FileDetails::None => text.push_str("\nUnknown"),
        }

        text
    }
}

/// Human-readable size: one decimal, 1024-based units.
pub fn format_file_size(size_bytes: u64) -> String {
    let mut size = size_bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} PB")
}

/// A progress report emitted while a conversion runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// 0..=100.
    pub percent: u8,
    pub message: String,
}

impl Progress {
    pub fn new(percent: impl Into<f64>, message: impl Into<String>) -> Self {
        let percent = percent.into().clamp(0.0, 100.0).round() as u8;
        Self {
            percent,
            message: message.into(),
        }
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub kind: ConversionKind,
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub output_size: u64,
    /// Extra detail for the completion dialog (e.g. "Created 5 slides").
    pub detail: Option<String>,
}

/// Aggregate result of a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        format!(
            "{} successful, {} failed",
            self.succeeded.len(),
            self.failed.len()
        )
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
}

impl PaperSize {
    pub const ALL: [PaperSize; 5] = [Self::A4, Self::A3, Self::A5, Self::Letter, Self::Legal];

    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::A5 => "A5",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_table_matches_kinds() {
        assert!(ConversionKind::PdfToWord.accepts(Path::new("a/report.PDF")));
        assert!(ConversionKind::WordToPdf.accepts(Path::new("notes.doc")));
        assert!(ConversionKind::WordToPpt.accepts(Path::new("notes.docx")));
        assert!(ConversionKind::PptToWord.accepts(Path::new("deck.ppt")));
        assert!(ConversionKind::ImageToPdf.accepts(Path::new("scan.WebP")));
        assert!(ConversionKind::EditPdf.accepts(Path::new("form.pdf")));

        assert!(!ConversionKind::PdfToWord.accepts(Path::new("notes.docx")));
        assert!(!ConversionKind::ImageToPdf.accepts(Path::new("scan.svg")));
        assert!(!ConversionKind::WordToPdf.accepts(Path::new("README")));
    }

    #[test]
    fn ids_round_trip_through_from_str() {
        for kind in ConversionKind::ALL {
            assert_eq!(kind.id().parse::<ConversionKind>().unwrap(), kind);
        }
        assert!("pdf_to_excel".parse::<ConversionKind>().is_err());
    }

    #[test]
    fn failure_label_names_multi_image_runs() {
        assert_eq!(ConversionKind::ImageToPdf.failure_label(1), "Image to PDF");
        assert_eq!(ConversionKind::ImageToPdf.failure_label(3), "Multi-image to PDF");
        assert_eq!(ConversionKind::PdfToWord.failure_label(2), "PDF to Word");
    }

    #[test]
    fn file_kind_from_extension() {
        assert_eq!(FileKind::from_path(Path::new("x.pptx")), FileKind::PowerPoint);
        assert_eq!(FileKind::from_path(Path::new("x.JPEG")), FileKind::Image);
        assert_eq!(FileKind::from_path(Path::new("x.txt")), FileKind::Unknown);
    }

    #[test]
    fn file_sizes_are_human_readable() {
        assert_eq!(format_file_size(0), "0.0 B");
        assert_eq!(format_file_size(1023), "1023.0 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(Progress::new(150.0, "").percent, 100);
        assert_eq!(Progress::new(-3.0, "").percent, 0);
        assert_eq!(Progress::new(57.6, "").percent, 58);
    }

    #[test]
    fn batch_summary_counts() {
        let report = BatchReport {
            succeeded: vec![PathBuf::from("a.pdf")],
            failed: vec![(PathBuf::from("b.pdf"), "boom".into())],
        };
        assert_eq!(report.summary(), "1 successful, 1 failed");
    }
}
