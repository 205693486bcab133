// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch page — run one conversion over many files.

use std::path::PathBuf;

use dioxus::prelude::*;

use wandler_core::{BatchReport, ConversionKind, Progress};

use crate::pages::{ProgressBar, dialog_extensions};
use crate::services::app_services::AppServices;
use crate::services::worker::{WorkerEvent, spawn_batch};
use crate::state::AppState;

/// Kinds a batch can run; the editor is not a conversion.
fn batch_kinds() -> impl Iterator<Item = ConversionKind> {
    ConversionKind::ALL
        .into_iter()
        .filter(|kind| *kind != ConversionKind::EditPdf)
}

#[component]
pub fn Batch() -> Element {
    let state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut kind = use_signal(|| ConversionKind::PdfToWord);
    let mut files = use_signal(Vec::<PathBuf>::new);
    let mut progress = use_signal(|| Option::<Progress>::None);
    let mut report = use_signal(|| Option::<BatchReport>::None);
    let mut failure = use_signal(|| Option::<String>::None);

    let running = progress.read().is_some();
    let current = *kind.read();

    rsx! {
        div {
            h1 { "Batch Convert" }
            p { style: "color: #666;", "Convert many files the same way. Files that fail are skipped." }

            div { style: "display: flex; align-items: center; gap: 8px; margin: 16px 0;",
                span { "Conversion" }
                select {
                    style: "flex: 1; padding: 6px 8px; border: 1px solid #ccc; border-radius: 4px;",
                    disabled: running,
                    value: current.id(),
                    onchange: move |evt| {
                        if let Ok(selected) = evt.value().parse::<ConversionKind>()
                            && selected != ConversionKind::EditPdf
                        {
                            kind.set(selected);
                            files.write().clear();
                            report.set(None);
                        }
                    },
                    for choice in batch_kinds() {
                        option { key: "{choice.id()}", value: choice.id(), "{choice.short_label()}" }
                    }
                }
            }

            div { style: "display: flex; gap: 8px;",
                button {
                    style: "flex: 1; padding: 10px; border-radius: 8px; border: 2px dashed #3498db; color: #3498db; background: white;",
                    disabled: running,
                    onclick: move |_| {
                        let extensions = dialog_extensions(current);
                        if let Some(picked) = rfd::FileDialog::new()
                            .add_filter(current.short_label(), extensions.as_slice())
                            .pick_files()
                        {
                            let mut files = files.write();
                            for path in picked {
                                if !files.contains(&path) {
                                    files.push(path);
                                }
                            }
                        }
                    },
                    "Add Files"
                }
                button {
                    style: "padding: 10px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                    disabled: running || files.read().is_empty(),
                    onclick: move |_| {
                        files.write().clear();
                        report.set(None);
                    },
                    "Clear"
                }
            }

            ul { style: "font-size: 14px; color: #333;",
                for path in files.read().iter() {
                    li { key: "{path.display()}", "{path.display()}" }
                }
            }

            button {
                style: "width: 100%; padding: 14px; border-radius: 8px; border: none; background: #27ae60; color: white; font-size: 18px; font-weight: bold;",
                disabled: running || files.read().is_empty(),
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let batch = files.read().clone();
                        let output_dir = state.read().output_dir.clone();
                        tracing::info!(kind = %current, files = batch.len(), "batch started");
                        report.set(None);
                        failure.set(None);
                        progress.set(Some(Progress::new(0, "Starting batch...")));

                        let mut events = spawn_batch(svc.converter(), current, batch, output_dir);
                        spawn(async move {
                            while let Some(event) = events.recv().await {
                                match event {
                                    WorkerEvent::Progress(p) => progress.set(Some(p)),
                                    WorkerEvent::Finished(done) => {
                                        tracing::info!(summary = %done.summary(), "batch finished");
                                        report.set(Some(done));
                                    }
                                    WorkerEvent::Failed(reason) => failure.set(Some(reason)),
                                }
                            }
                            progress.set(None);
                            if report.read().is_none() {
                                let reason = failure
                                    .read()
                                    .clone()
                                    .unwrap_or_else(|| "The batch stopped unexpectedly".into());
                                failure.set(Some(batch_failure_message(current, &reason)));
                            }
                        });
                    }
                },
                if running { "Converting..." } else { "Convert All" }
            }

            if let Some(p) = progress.read().clone() {
                ProgressBar { percent: p.percent, message: p.message }
            }

            if let Some(ref msg) = *failure.read() {
                p { style: "margin-top: 16px; color: #c0392b; font-weight: bold;", "{msg}" }
            }

            if let Some(ref done) = *report.read() {
                div { style: "margin-top: 16px; padding: 16px; border-radius: 8px; background: white; border: 1px solid #eee;",
                    p { style: "font-weight: bold; margin-top: 0;", "Batch conversion completed! {done.summary()}" }
                    if !done.failed.is_empty() {
                        h4 { "Failed" }
                        ul { style: "font-size: 14px; color: #c0392b;",
                            for (path, reason) in done.failed.iter() {
                                li { key: "{path.display()}", "{path.display()}: {reason}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Message shown when a batch ends without a report.
fn batch_failure_message(kind: ConversionKind, reason: &str) -> String {
    format!(
        "Batch {} stopped: {reason}. Files already converted were kept.",
        kind.short_label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_is_not_offered_for_batches() {
        let kinds: Vec<ConversionKind> = batch_kinds().collect();
        assert_eq!(kinds.len(), 5);
        assert!(!kinds.contains(&ConversionKind::EditPdf));
    }

    #[test]
    fn interrupted_batches_say_what_stopped() {
        assert_eq!(
            batch_failure_message(ConversionKind::ImageToPdf, "boom"),
            "Batch Image \u{2192} PDF stopped: boom. Files already converted were kept."
        );
    }
}
