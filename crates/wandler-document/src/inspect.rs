// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File inspection for the information panel.

use std::path::Path;

use ::image::{ImageDecoder, ImageFormat, ImageReader};
use chrono::{DateTime, Local};
use tracing::{debug, instrument, warn};
use wandler_core::error::{Result, WandlerError};
use wandler_core::{FileDetails, FileInfo, FileKind};

use crate::image::processor::color_mode;
use crate::ooxml::docx::WordDocument;
use crate::ooxml::pptx::Presentation;
use crate::pdf::reader::PdfReader;

/// Describe the file at `path`.
///
/// A missing file is an error. Type-specific details that cannot be read
/// are logged and reported as `FileDetails::None`.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn inspect(path: impl AsRef<Path>) -> Result<FileInfo> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path)?;
    let kind = FileKind::from_path(path);

    let details = match read_details(path, kind) {
        Ok(details) => details,
        Err(err) => {
            warn!(%err, "Could not read file details");
            FileDetails::None
        }
    };
    debug!(?kind, "File inspected");

    Ok(FileInfo {
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
        size_bytes: metadata.len(),
        extension: path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default(),
        modified: metadata
            .modified()
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| Local::now()),
        kind,
        details,
    })
}

fn read_details(path: &Path, kind: FileKind) -> Result<FileDetails> {
    match kind {
        FileKind::Pdf => {
            let reader = PdfReader::open(path)?;
            let metadata = reader.metadata();
            Ok(FileDetails::Pdf {
                pages: reader.page_count(),
                encrypted: reader.is_encrypted(),
                title: metadata.title,
                author: metadata.author,
            })
        }
        FileKind::Word => {
            let document = WordDocument::open(path)?;
            Ok(FileDetails::Word {
                paragraphs: document.non_empty_paragraphs().count(),
                title: document.properties.title,
                author: document.properties.author,
                subject: document.properties.subject,
            })
        }
        FileKind::PowerPoint => Ok(FileDetails::PowerPoint {
            slides: Presentation::open(path)?.slide_count(),
        }),
        FileKind::Image => image_details(path),
        FileKind::Unknown => Ok(FileDetails::None),
    }
}

/// Dimensions, color mode and format from the image header, without
/// decoding the pixels.
fn image_details(path: &Path) -> Result<FileDetails> {
    let image_error = |err: ::image::ImageError| WandlerError::ImageError(err.to_string());

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .map(format_label)
        .unwrap_or_else(|| "unknown".to_string());
    let decoder = reader.into_decoder().map_err(image_error)?;
    let (width, height) = decoder.dimensions();

    Ok(FileDetails::Image {
        width,
        height,
        color_mode: color_mode(decoder.color_type()).to_string(),
        format,
    })
}

fn format_label(format: ImageFormat) -> String {
    match format {
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        other => format!("{other:?}").to_uppercase(),
    }
}
