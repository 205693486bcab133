// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Convert page — pick an operation, pick files, watch progress, see the
// result.

use std::path::PathBuf;

use dioxus::prelude::*;

use wandler_core::error::WandlerError;
use wandler_core::human_errors::humanize_error;
use wandler_core::{ConversionKind, Progress, format_file_size};
use wandler_document::convert::validate;
use wandler_document::inspect;

use crate::pages::{ProgressBar, dialog_extensions};
use crate::services::app_services::AppServices;
use crate::services::shell::open_output_folder;
use crate::services::worker::{WorkerEvent, spawn_conversion};
use crate::state::{AppState, ConversionStage};

#[component]
pub fn Convert() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut file_info = use_signal(|| Option::<String>::None);
    let mut folder_error = use_signal(|| Option::<String>::None);

    let kind = state.read().selected_kind;
    let stage = state.read().stage.clone();
    let files = state.read().selected_files.clone();
    let output_dir = state.read().output_dir.clone();
    let busy = stage.is_busy();
    let output_label = match output_dir {
        Some(ref dir) => dir.display().to_string(),
        None => "Same folder as the source file".to_string(),
    };

    rsx! {
        div {
            h1 { "Convert" }
            p { style: "color: #666;", "Choose what you want to do, then select your file." }

            // Operation list
            div { style: "display: grid; grid-template-columns: repeat(2, 1fr); gap: 8px; margin: 16px 0;",
                for choice in ConversionKind::ALL {
                    {
                        let selected = choice == kind;
                        let border = if selected { "2px solid #3498db" } else { "1px solid #ddd" };
                        rsx! {
                            div {
                                key: "{choice.id()}",
                                style: "padding: 12px; border: {border}; border-radius: 8px; background: white; cursor: pointer;",
                                onclick: move |_| {
                                    if !state.read().stage.is_busy() {
                                        state.write().select_kind(choice);
                                        file_info.set(None);
                                    }
                                },
                                div { style: "font-weight: bold;", "{choice.short_label()}" }
                                div { style: "color: #666; font-size: 13px;", "{choice.description()}" }
                            }
                        }
                    }
                }
            }

            // File selection
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: 2px dashed #3498db; color: #3498db; background: white; font-size: 16px;",
                disabled: busy,
                onclick: move |_| {
                    let extensions = dialog_extensions(kind);
                    let dialog = rfd::FileDialog::new().add_filter(kind.short_label(), extensions.as_slice());
                    let picked: Vec<PathBuf> = if kind.allows_multiple_inputs() {
                        dialog.pick_files().unwrap_or_default()
                    } else {
                        dialog.pick_file().into_iter().collect()
                    };
                    if picked.is_empty() {
                        return;
                    }
                    tracing::info!(kind = %kind, files = picked.len(), "files selected");
                    file_info.set(Some(describe_selection(&picked)));
                    let mut state = state.write();
                    state.selected_files = picked;
                    state.stage = ConversionStage::Idle;
                },
                if kind.allows_multiple_inputs() { "Select Images" } else { "Select File" }
            }

            if !files.is_empty() {
                div { style: "margin: 12px 0; padding: 12px; border-radius: 8px; background: white; border: 1px solid #eee;",
                    h3 { style: "margin-top: 0;", "File Information" }
                    if let Some(ref info) = *file_info.read() {
                        pre { style: "white-space: pre-wrap; font-family: inherit; font-size: 14px; margin: 0;", "{info}" }
                    }
                }
            }

            // Output folder
            div { style: "display: flex; align-items: center; gap: 8px; margin: 12px 0; font-size: 14px;",
                span { style: "color: #666;", "Save to:" }
                span { style: "flex: 1;", "{output_label}" }
                button {
                    disabled: busy,
                    onclick: move |_| {
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            state.write().output_dir = Some(dir);
                        }
                    },
                    "Change..."
                }
                if output_dir.is_some() {
                    button {
                        disabled: busy,
                        onclick: move |_| state.write().output_dir = None,
                        "Reset"
                    }
                }
            }

            // Convert
            button {
                style: "width: 100%; padding: 14px; border-radius: 8px; border: none; background: #27ae60; color: white; font-size: 18px; font-weight: bold;",
                disabled: busy,
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let (kind, inputs, output_dir) = {
                            let state = state.read();
                            (state.selected_kind, state.selected_files.clone(), state.output_dir.clone())
                        };

                        if kind == ConversionKind::EditPdf {
                            open_in_editor(state, inputs);
                            return;
                        }

                        folder_error.set(None);
                        state.write().stage =
                            ConversionStage::Converting(Progress::new(0, "Starting conversion..."));
                        let input_count = inputs.len();
                        let mut events = spawn_conversion(svc.converter(), kind, inputs, output_dir);
                        spawn(async move {
                            while let Some(event) = events.recv().await {
                                match event {
                                    WorkerEvent::Progress(progress) => {
                                        state.write().stage = ConversionStage::Converting(progress);
                                    }
                                    WorkerEvent::Finished(Ok(outcome)) => {
                                        tracing::info!(output = %outcome.output.display(), "conversion complete");
                                        state.write().stage = ConversionStage::Done(outcome);
                                    }
                                    WorkerEvent::Finished(Err(e)) => {
                                        tracing::error!(error = %e, "conversion failed");
                                        state.write().stage = ConversionStage::failed(&e);
                                    }
                                    WorkerEvent::Failed(reason) => {
                                        state.write().conversion_interrupted(kind, input_count, reason);
                                    }
                                }
                            }
                            state.write().conversion_interrupted(
                                kind,
                                input_count,
                                "The conversion stopped unexpectedly".into(),
                            );
                        });
                    }
                },
                if busy { "Converting..." } else if kind == ConversionKind::EditPdf { "Open Editor" } else { "Convert" }
            }

            // Progress / result
            {match stage {
                ConversionStage::Idle => rsx! {},
                ConversionStage::Converting(progress) => rsx! {
                    ProgressBar { percent: progress.percent, message: progress.message }
                },
                ConversionStage::Done(outcome) => rsx! {
                    div { style: "margin-top: 16px; padding: 16px; border-radius: 8px; background: #e8f8ef;",
                        p { style: "color: #27ae60; font-weight: bold; margin: 0;", "Conversion completed successfully!" }
                        p { style: "font-size: 14px;", "Saved to: {outcome.output.display()}" }
                        p { style: "font-size: 14px; color: #666;", "Size: {format_file_size(outcome.output_size)}" }
                        if let Some(ref detail) = outcome.detail {
                            p { style: "font-size: 14px; color: #666;", "{detail}" }
                        }
                        div { style: "display: flex; gap: 8px;",
                            button {
                                onclick: {
                                    let output = outcome.output.clone();
                                    move |_| {
                                        if let Err(e) = open_output_folder(&output) {
                                            tracing::warn!(error = %e, "could not open output folder");
                                            let human = humanize_error(&e);
                                            folder_error.set(Some(format!("{} {}", human.message, human.suggestion)));
                                        }
                                    }
                                },
                                "Open Output Folder"
                            }
                            button {
                                onclick: move |_| {
                                    state.write().reset();
                                    file_info.set(None);
                                    folder_error.set(None);
                                },
                                "Convert Another File"
                            }
                        }
                        if let Some(ref msg) = *folder_error.read() {
                            p { style: "font-size: 14px; color: #c0392b;", "{msg}" }
                        }
                    }
                },
                ConversionStage::Error { message, suggestion, detail } => rsx! {
                    div { style: "margin-top: 16px; padding: 16px; border-radius: 8px; background: #fdecea;",
                        p { style: "color: #c0392b; font-weight: bold; margin: 0;", "{message}" }
                        p { style: "font-size: 14px; color: #666;", "{suggestion}" }
                        pre { style: "white-space: pre-wrap; font-family: inherit; font-size: 13px; color: #888;", "{detail}" }
                        button {
                            onclick: move |_| state.write().stage = ConversionStage::Idle,
                            "Try Again"
                        }
                    }
                },
            }}
        }
    }
}

/// Hand a single PDF over to the editor page.
fn open_in_editor(mut state: Signal<AppState>, inputs: Vec<PathBuf>) {
    if let Err(e) = validate_for_editor(&inputs) {
        tracing::warn!(error = %e, "cannot open editor");
        state.write().stage = ConversionStage::failed(&e);
        return;
    }
    state.write().editor_file = inputs.into_iter().next();
    navigator().push(crate::Route::Editor {});
}

/// The editor takes exactly one existing `.pdf`.
fn validate_for_editor(inputs: &[PathBuf]) -> Result<(), WandlerError> {
    match validate(ConversionKind::PdfToWord, inputs) {
        Err(WandlerError::IncompatibleFile { extension, .. }) => Err(WandlerError::IncompatibleFile {
            extension,
            conversion: ConversionKind::EditPdf.display_name().to_string(),
        }),
        other => other,
    }
}

/// Text for the information panel.
fn describe_selection(files: &[PathBuf]) -> String {
    match files {
        [single] => match inspect(single) {
            Ok(info) => info.summary(),
            Err(e) => {
                tracing::warn!(path = %single.display(), error = %e, "inspect failed");
                format!("{}\n(could not read file details)", single.display())
            }
        },
        many => {
            let total: u64 = many
                .iter()
                .filter_map(|path| std::fs::metadata(path).ok())
                .map(|meta| meta.len())
                .sum();
            let mut text = format!("{} files selected ({})", many.len(), format_file_size(total));
            for path in many {
                let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
                text.push_str(&format!("\n\u{2022} {name}"));
            }
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_rejects_non_pdf_with_editor_wording() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("letter.docx");
        std::fs::write(&doc, b"x").unwrap();

        match validate_for_editor(&[doc]) {
            Err(WandlerError::IncompatibleFile { extension, conversion }) => {
                assert_eq!(extension, ".docx");
                assert_eq!(conversion, "Advanced PDF Editor");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(validate_for_editor(&[]), Err(WandlerError::NoInput)));
    }

    #[test]
    fn multiple_files_are_listed_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        std::fs::write(&a, vec![0u8; 1024]).unwrap();
        std::fs::write(&b, vec![0u8; 1024]).unwrap();

        let text = describe_selection(&[a, b]);
        assert!(text.starts_with("2 files selected (2.0 KB)"));
        assert!(text.contains("\u{2022} b.png"));
    }
}
