// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop shell integration — show converted files in the system file
// manager.

use std::path::{Path, PathBuf};

use wandler_core::error::Result;

/// Folder that holds `output`. A bare file name resolves to the current
/// directory.
pub fn output_folder(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Open the folder containing `output` in the file manager.
pub fn open_output_folder(output: &Path) -> Result<()> {
    let folder = output_folder(output);
    tracing::info!(folder = %folder.display(), "opening output folder");
    open::that_detached(&folder)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_is_the_parent_of_the_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report_converted.docx");
        assert_eq!(output_folder(&output), dir.path());
        assert_eq!(output_folder(Path::new("report.pdf")), PathBuf::from("."));
    }
}
