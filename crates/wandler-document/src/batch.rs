// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch conversion — run one conversion kind over many files, skipping
// failures and carrying on.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};
use wandler_core::{BatchReport, ConversionKind, Progress};

use crate::convert::{DocumentConverter, ProgressFn};

/// Convert every file in `files` with `kind`, one at a time.
///
/// Each file is converted on its own (a multi-image batch yields one PDF
/// per image). A failure is recorded with its message and the batch moves
/// on to the next file.
#[instrument(skip(converter, files, progress), fields(kind = %kind, files = files.len()))]
pub fn batch_convert(
    converter: &DocumentConverter,
    files: &[PathBuf],
    kind: ConversionKind,
    output_dir: Option<&Path>,
    progress: ProgressFn<'_>,
) -> BatchReport {
    let total = files.len();
    let mut report = BatchReport::default();

    for (index, file) in files.iter().enumerate() {
        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        progress(Progress::new(
            100.0 * index as f64 / total as f64,
            format!("Converting {name}... ({}/{total})", index + 1),
        ));

        match converter.convert(kind, std::slice::from_ref(file), output_dir, &mut |_| {}) {
            Ok(outcome) => {
                info!(file = %file.display(), output = %outcome.output.display(), "Batch item converted");
                report.succeeded.push(file.clone());
            }
            Err(err) => {
                warn!(file = %file.display(), %err, "Batch item failed, continuing");
                report.failed.push((file.clone(), err.to_string()));
            }
        }
    }

    progress(Progress::new(
        100,
        format!("Batch conversion completed! {}", report.summary()),
    ));
    info!(summary = %report.summary(), "Batch finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::DocxBuilder;
    use wandler_core::AppConfig;

    #[test]
    fn failures_are_skipped_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.docx");
        let mut builder = DocxBuilder::new();
        builder.add_heading("Agenda", 1).add_paragraph("welcome everyone.");
        builder.save(&good).unwrap();

        let wrong_type = dir.path().join("photo.png");
        std::fs::write(&wrong_type, b"png").unwrap();
        let broken = dir.path().join("broken.docx");
        std::fs::write(&broken, b"garbage").unwrap();

        let converter = DocumentConverter::new(AppConfig {
            use_office_suite: false,
            ..AppConfig::default()
        });
        let files = vec![wrong_type.clone(), good.clone(), broken.clone()];
        let mut seen = Vec::new();
        let report = batch_convert(
            &converter,
            &files,
            ConversionKind::WordToPpt,
            None,
            &mut |p| seen.push(p),
        );

        assert_eq!(report.succeeded, vec![good]);
        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.failed[0].0, wrong_type);
        assert!(report.failed[0].1.contains("not compatible"));
        assert!(dir.path().join("good_converted.pptx").is_file());

        let percents: Vec<u8> = seen.iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![0, 33, 67, 100]);
        assert_eq!(seen[1].message, "Converting good.docx... (2/3)");
        assert_eq!(
            seen[3].message,
            "Batch conversion completed! 1 successful, 2 failed"
        );
    }

    #[test]
    fn empty_batch_completes_immediately() {
        let report = batch_convert(
            &DocumentConverter::default(),
            &[],
            ConversionKind::PdfToWord,
            None,
            &mut |_| {},
        );
        assert!(report.succeeded.is_empty());
        assert!(report.failed.is_empty());
    }
}
