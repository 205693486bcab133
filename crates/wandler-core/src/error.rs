// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Wandler.

use thiserror::Error;

/// Top-level error type for all Wandler operations.
#[derive(Debug, Error)]
pub enum WandlerError {
    // -- Input validation --
    #[error("no file selected")]
    NoInput,

    #[error("Selected file type ({extension}) is not compatible with {conversion}")]
    IncompatibleFile {
        extension: String,
        conversion: String,
    },

    #[error("{0} is not a file conversion")]
    UnsupportedConversion(String),

    // -- Document errors --
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("PDF is password protected. Please unlock it first.")]
    PasswordProtected,

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OOXML package error: {0}")]
    OoxmlError(String),

    #[error("office suite conversion failed: {0}")]
    OfficeSuite(String),

    #[error("page {page} out of range (document has {total} pages)")]
    InvalidPage { page: usize, total: usize },

    /// Operation-boundary wrapper: "<conversion> conversion failed: <reason>".
    #[error("{conversion} conversion failed: {reason}")]
    ConversionFailed { conversion: String, reason: String },

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WandlerError>;
