// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background worker — runs one blocking operation on its own thread and
// streams progress back to the UI.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;

use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use wandler_core::error::Result;
use wandler_core::{BatchReport, ConversionKind, ConversionOutcome, Progress};
use wandler_document::DocumentConverter;
use wandler_document::batch_convert;
use wandler_document::convert::ProgressFn;

/// Messages from a worker thread. Exactly one of `Finished` or `Failed` is
/// the last event.
#[derive(Debug)]
pub enum WorkerEvent<T> {
    Progress(Progress),
    Finished(T),
    /// The job panicked or its thread could not be started.
    Failed(String),
}

/// Run `job` on a fresh thread, forwarding its progress reports.
///
/// A send fails only once the receiver is gone (the page was closed), in
/// which case the job still runs to completion and its events are dropped.
pub fn run_in_background<T, F>(name: &str, job: F) -> UnboundedReceiver<WorkerEvent<T>>
where
    T: Send + 'static,
    F: FnOnce(ProgressFn<'_>) -> T + Send + 'static,
{
    let (tx, rx) = unbounded_channel();
    let spawned = std::thread::Builder::new()
        .name(format!("wandler-{name}"))
        .spawn({
            let tx = tx.clone();
            move || {
                let progress_tx = tx.clone();
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    job(&mut |p| {
                        let _ = progress_tx.send(WorkerEvent::Progress(p));
                    })
                }));
                let event = match outcome {
                    Ok(result) => WorkerEvent::Finished(result),
                    Err(payload) => {
                        let reason = panic_message(payload.as_ref());
                        tracing::error!(%reason, "worker panicked");
                        WorkerEvent::Failed(reason)
                    }
                };
                let _ = tx.send(event);
            }
        });
    if let Err(e) = spawned {
        tracing::error!(error = %e, "failed to spawn worker thread");
        let _ = tx.send(WorkerEvent::Failed(format!("could not start worker: {e}")));
    }
    rx
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected internal error".to_string()
    }
}

/// Convert `inputs` with `kind` in the background.
pub fn spawn_conversion(
    converter: DocumentConverter,
    kind: ConversionKind,
    inputs: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
) -> UnboundedReceiver<WorkerEvent<Result<ConversionOutcome>>> {
    run_in_background("convert", move |progress| {
        converter.convert(kind, &inputs, output_dir.as_deref(), progress)
    })
}

/// Convert every file in `files` with `kind` in the background.
pub fn spawn_batch(
    converter: DocumentConverter,
    kind: ConversionKind,
    files: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
) -> UnboundedReceiver<WorkerEvent<BatchReport>> {
    run_in_background("batch", move |progress| {
        batch_convert(&converter, &files, kind, output_dir.as_deref(), progress)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wandler_core::{AppConfig, WandlerError};

    fn drain<T>(mut rx: UnboundedReceiver<WorkerEvent<T>>) -> (Vec<Progress>, Option<T>) {
        let mut progress = Vec::new();
        let mut finished = None;
        while let Some(event) = rx.blocking_recv() {
            match event {
                WorkerEvent::Progress(p) => progress.push(p),
                WorkerEvent::Finished(result) => finished = Some(result),
                WorkerEvent::Failed(reason) => panic!("worker failed: {reason}"),
            }
        }
        (progress, finished)
    }

    #[test]
    fn a_panicking_job_still_reports_an_ending() {
        let mut rx = run_in_background::<u32, _>("test", |progress| {
            progress(Progress::new(30, "working"));
            panic!("boom")
        });

        let mut events = Vec::new();
        while let Some(event) = rx.blocking_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], WorkerEvent::Progress(ref p) if p.percent == 30));
        assert!(matches!(events[1], WorkerEvent::Failed(ref reason) if reason == "boom"));
    }

    #[test]
    fn formatted_panics_keep_their_message() {
        let mut rx = run_in_background::<(), _>("test", |_| panic!("page {} missing", 3));
        let last = std::iter::from_fn(|| rx.blocking_recv()).last();
        assert!(matches!(last, Some(WorkerEvent::Failed(ref reason)) if reason == "page 3 missing"));
    }

    #[test]
    fn progress_arrives_before_the_result() {
        let rx = run_in_background("test", |progress| {
            progress(Progress::new(10, "starting"));
            progress(Progress::new(90, "almost"));
            42
        });
        let (progress, finished) = drain(rx);
        let percents: Vec<u8> = progress.iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![10, 90]);
        assert_eq!(finished, Some(42));
    }

    #[test]
    fn conversion_errors_come_back_as_results() {
        let converter = DocumentConverter::new(AppConfig {
            use_office_suite: false,
            ..AppConfig::default()
        });
        let rx = spawn_conversion(converter, ConversionKind::PdfToWord, Vec::new(), None);
        let (progress, finished) = drain(rx);
        assert!(progress.is_empty());
        assert!(matches!(finished, Some(Err(WandlerError::NoInput))));
    }

    #[test]
    fn batch_reports_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_pdf = dir.path().join("notes.txt");
        std::fs::write(&not_a_pdf, b"plain").unwrap();

        let rx = spawn_batch(
            DocumentConverter::default(),
            ConversionKind::PdfToWord,
            vec![not_a_pdf.clone()],
            None,
        );
        let (progress, finished) = drain(rx);
        let report = finished.unwrap();
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, not_a_pdf);
        assert_eq!(progress.last().map(|p| p.percent), Some(100));
    }
}
