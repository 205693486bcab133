// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where converted files go. `None` means "next to the source file".
    pub default_output_dir: Option<PathBuf>,
    /// Page size used when Wandler lays out PDF pages itself.
    pub paper_size: crate::PaperSize,
    /// Try an installed office suite (LibreOffice) before the built-in
    /// Word → PDF renderer.
    pub use_office_suite: bool,
    /// Explicit office suite executable. When unset, `soffice` and
    /// `libreoffice` are searched on `PATH`.
    pub office_command: Option<String>,
    /// Seconds to wait for the office suite before giving up on it.
    pub office_timeout_secs: u64,
    /// Apply the sharpness/contrast/brightness pass to images before
    /// embedding them in a PDF.
    pub enhance_images: bool,
    /// Longest edge (pixels) an embedded image is shrunk to.
    pub max_image_dimension: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_output_dir: None,
            paper_size: crate::PaperSize::A4,
            use_office_suite: true,
            office_command: None,
            office_timeout_secs: 60,
            enhance_images: true,
            max_image_dimension: 2000,
        }
    }
}
