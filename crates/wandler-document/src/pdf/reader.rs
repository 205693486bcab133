// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open and inspect existing PDF documents and pull their text
// out page by page, using the `lopdf` crate.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, info, instrument};
use wandler_core::error::WandlerError;

use super::{info_string, load_document, load_document_mem};

/// Entries of the document information dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

/// Read-only access to an existing PDF.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WandlerError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = load_document(path_ref)?;
        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, WandlerError> {
        let document = load_document_mem(data)?;
        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Whether the file declares a security handler (`/Encrypt` in the trailer).
    pub fn is_encrypted(&self) -> bool {
        self.document.is_encrypted()
    }

    /// Title, author and friends from the information dictionary.
    pub fn metadata(&self) -> PdfMetadata {
        PdfMetadata {
            title: info_string(&self.document, b"Title"),
            author: info_string(&self.document, b"Author"),
            subject: info_string(&self.document, b"Subject"),
            creator: info_string(&self.document, b"Creator"),
            producer: info_string(&self.document, b"Producer"),
        }
    }

    // -- Text -----------------------------------------------------------------

    /// Text of one page (1-indexed).
    pub fn page_text(&self, page_number: usize) -> Result<String, WandlerError> {
        let total = self.page_count();
        if page_number == 0 || page_number > total {
            return Err(WandlerError::InvalidPage {
                page: page_number,
                total,
            });
        }

        self.document
            .extract_text(&[page_number as u32])
            .map_err(|err| {
                WandlerError::PdfError(format!(
                    "cannot extract text from page {page_number}: {err}"
                ))
            })
    }
}
