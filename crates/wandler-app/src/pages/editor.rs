// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor page — page-level PDF editing with a toolbar and info panel.

use std::path::Path;

use dioxus::prelude::*;

use wandler_core::error::Result;
use wandler_core::format_file_size;
use wandler_core::human_errors::humanize_error;
use wandler_document::PdfEditor;

use crate::state::{AppState, EditorSession};

#[component]
pub fn Editor() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let mut session = use_context::<Signal<EditorSession>>();
    let mut search_term = use_signal(String::new);
    let mut password = use_signal(String::new);

    // A PDF handed over from the Convert page.
    use_effect(move || {
        let pending = state.write().editor_file.take();
        if let Some(path) = pending
            && confirm_discard(session)
        {
            open_pdf(&path, session);
        }
    });

    let summary = session.read().editor.as_ref().map(|doc| {
        let info = doc.document_info();
        let page = doc.current_page().and_then(|index| doc.page_info(index).ok());
        let name = doc
            .path()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled.pdf".into());
        (name, info, page)
    });

    rsx! {
        div {
            h1 { "PDF Editor" }

            button {
                style: "padding: 10px 16px; border-radius: 8px; border: 1px solid #3498db; color: #3498db; background: white; font-size: 15px;",
                onclick: move |_| {
                    if !confirm_discard(session) {
                        return;
                    }
                    if let Some(path) = rfd::FileDialog::new().add_filter("PDF", &["pdf"]).pick_file() {
                        open_pdf(&path, session);
                    }
                },
                "Open PDF"
            }

            if let Some((name, info, page)) = summary {
                // Navigation
                div { style: "display: flex; align-items: center; gap: 8px; margin: 12px 0;",
                    button {
                        onclick: move |_| {
                            if let Some(doc) = session.write().editor.as_mut() {
                                doc.prev_page();
                            }
                        },
                        "\u{25C0} Previous"
                    }
                    span {
                        {
                            match page {
                                Some(page) => format!("Page {} of {}", page.number, info.page_count),
                                None => "No pages".to_string(),
                            }
                        }
                    }
                    button {
                        onclick: move |_| {
                            if let Some(doc) = session.write().editor.as_mut() {
                                doc.next_page();
                            }
                        },
                        "Next \u{25B6}"
                    }
                }

                // Toolbar
                div { style: "display: flex; gap: 8px; flex-wrap: wrap; margin: 12px 0;",
                    ToolButton {
                        label: "Rotate Left",
                        onclick: move |_| rotate_current(session, -90),
                    }
                    ToolButton {
                        label: "Rotate Right",
                        onclick: move |_| rotate_current(session, 90),
                    }
                    ToolButton {
                        label: "Delete Page",
                        onclick: move |_| {
                            let Some(index) = current_page(session) else {
                                return;
                            };
                            let confirmed = rfd::MessageDialog::new()
                                .set_title("Delete page")
                                .set_description(format!("Delete page {}?", index + 1))
                                .set_buttons(rfd::MessageButtons::YesNo)
                                .show()
                                == rfd::MessageDialogResult::Yes;
                            if confirmed {
                                apply_edit(session, "delete", move |doc| {
                                    doc.delete_page(index)?;
                                    Ok(format!("Deleted page {}", index + 1))
                                });
                            }
                        },
                    }
                    ToolButton {
                        label: "Merge PDF",
                        onclick: move |_| {
                            if let Some(other) = rfd::FileDialog::new().add_filter("PDF", &["pdf"]).pick_file() {
                                apply_edit(session, "merge", move |doc| {
                                    let added = doc.merge(&other)?;
                                    Ok(format!("Merged {added} pages"))
                                });
                            }
                        },
                    }
                    ToolButton {
                        label: "Extract Page",
                        onclick: move |_| {
                            let Some(index) = current_page(session) else {
                                return;
                            };
                            if let Some(dest) = rfd::FileDialog::new()
                                .add_filter("PDF", &["pdf"])
                                .set_file_name(format!("page_{}.pdf", index + 1))
                                .save_file()
                            {
                                apply_edit(session, "extract_page", move |doc| {
                                    doc.extract_page(index, &dest)?;
                                    Ok(format!("Page {} saved to {}", index + 1, dest.display()))
                                });
                            }
                        },
                    }
                    ToolButton {
                        label: "Show Text",
                        onclick: move |_| {
                            let text = session.read().editor.as_ref().and_then(|doc| {
                                let index = doc.current_page()?;
                                Some(doc.page_text(index))
                            });
                            match text {
                                Some(Ok(text)) if text.trim().is_empty() => {
                                    session.write().text_view = Some("(no text on this page)".into());
                                }
                                Some(Ok(text)) => session.write().text_view = Some(text),
                                Some(Err(e)) => session.write().status = Some(error_message(&e)),
                                None => {}
                            }
                        },
                    }
                    ToolButton {
                        label: "Extract All Text",
                        onclick: move |_| {
                            if let Some(dest) = rfd::FileDialog::new()
                                .add_filter("Text", &["txt"])
                                .set_file_name("extracted_text.txt")
                                .save_file()
                            {
                                apply_edit(session, "extract_text", move |doc| {
                                    doc.extract_all_text(&dest)?;
                                    Ok(format!("Text saved to {}", dest.display()))
                                });
                            }
                        },
                    }
                    ToolButton {
                        label: "Compress",
                        onclick: move |_| {
                            apply_edit(session, "compress", |doc| {
                                doc.compress();
                                Ok("Content streams compressed. Save to keep the change.".into())
                            });
                        },
                    }
                }

                // Search
                div { style: "display: flex; gap: 8px; margin: 12px 0;",
                    input {
                        style: "flex: 1; padding: 6px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        placeholder: "Search text",
                        value: "{search_term}",
                        oninput: move |evt| search_term.set(evt.value()),
                    }
                    button {
                        disabled: search_term.read().trim().is_empty(),
                        onclick: move |_| {
                            let term = search_term.read().trim().to_string();
                            let mut session = session.write();
                            let hits = session.editor.as_mut().map(|doc| doc.search(&term)).unwrap_or_default();
                            session.status = Some(search_message(&term, &hits));
                        },
                        "Search"
                    }
                }

                // Encrypt
                div { style: "display: flex; gap: 8px; margin: 12px 0;",
                    input {
                        r#type: "password",
                        style: "flex: 1; padding: 6px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        placeholder: "Password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                    button {
                        onclick: move |_| {
                            let secret = password.read().clone();
                            apply_edit(session, "encrypt", move |doc| {
                                doc.encrypt(&secret)?;
                                Ok("Password set. It is applied when you save.".into())
                            });
                            password.set(String::new());
                        },
                        "Encrypt"
                    }
                }

                // Info panel
                div { style: "display: grid; grid-template-columns: 1fr 1fr; gap: 12px; margin: 12px 0;",
                    div { style: "padding: 12px; border-radius: 8px; background: white; border: 1px solid #eee; font-size: 14px;",
                        h3 { style: "margin-top: 0;", "Document" }
                        p { "File: {name}" }
                        p { "Pages: {info.page_count}" }
                        p { "Size: {format_file_size(info.file_size)}" }
                        p { "Encrypted: {yes_no(info.encrypted)}" }
                        p { "Unsaved changes: {yes_no(info.modified)}" }
                        for (label, value) in [
                            ("Title", info.metadata.title.clone()),
                            ("Author", info.metadata.author.clone()),
                            ("Subject", info.metadata.subject.clone()),
                            ("Creator", info.metadata.creator.clone()),
                            ("Producer", info.metadata.producer.clone()),
                        ] {
                            if let Some(value) = value {
                                p { "{label}: {value}" }
                            }
                        }
                    }
                    if let Some(page) = page {
                        {
                            let (width, height) = page.display_size();
                            rsx! {
                                div { style: "padding: 12px; border-radius: 8px; background: white; border: 1px solid #eee; font-size: 14px;",
                                    h3 { style: "margin-top: 0;", "Page {page.number}" }
                                    p { "Size: {width:.0} \u{00D7} {height:.0} pt" }
                                    p { "Rotation: {page.rotation}\u{00B0}" }
                                }
                            }
                        }
                    }
                }

                if let Some(ref text) = session.read().text_view {
                    pre { style: "white-space: pre-wrap; padding: 12px; background: white; border: 1px solid #eee; border-radius: 8px; max-height: 300px; overflow-y: auto;",
                        "{text}"
                    }
                }

                // Save
                div { style: "display: flex; gap: 8px; margin-top: 16px;",
                    button {
                        style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #27ae60; color: white; font-size: 16px;",
                        onclick: move |_| {
                            apply_edit(session, "save", |doc| {
                                doc.save()?;
                                Ok("PDF saved.".into())
                            });
                        },
                        "Save"
                    }
                    button {
                        style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #27ae60; color: #27ae60; background: white; font-size: 16px;",
                        onclick: move |_| {
                            if let Some(dest) = rfd::FileDialog::new()
                                .add_filter("PDF", &["pdf"])
                                .set_file_name("edited.pdf")
                                .save_file()
                            {
                                apply_edit(session, "save_as", move |doc| {
                                    doc.save_as(&dest)?;
                                    Ok(format!("PDF saved to {}", dest.display()))
                                });
                            }
                        },
                        "Save As..."
                    }
                }
            } else {
                p { style: "color: #666; margin-top: 16px;", "Open a PDF to rotate, delete, merge, or extract pages." }
            }

            if let Some(ref msg) = session.read().status {
                p { style: "margin-top: 8px; color: #666; font-size: 14px; text-align: center;",
                    "{msg}"
                }
            }
        }
    }
}

#[component]
fn ToolButton(label: &'static str, onclick: EventHandler<MouseEvent>) -> Element {
    rsx! {
        button {
            style: "padding: 8px 12px; border-radius: 8px; border: 1px solid #ccc; background: white; font-size: 14px;",
            onclick: move |evt| onclick.call(evt),
            "{label}"
        }
    }
}

fn open_pdf(path: &Path, mut session: Signal<EditorSession>) {
    match PdfEditor::open(path) {
        Ok(doc) => {
            let pages = doc.page_count();
            tracing::info!(path = %path.display(), pages, "PDF opened for editing");
            session
                .write()
                .load(doc, format!("Opened {} ({pages} pages)", path.display()));
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to open PDF");
            session.write().status = Some(error_message(&e));
        }
    }
}

fn current_page(session: Signal<EditorSession>) -> Option<usize> {
    session.read().editor.as_ref().and_then(PdfEditor::current_page)
}

/// Run one edit on the open document and report the outcome.
fn apply_edit(
    mut session: Signal<EditorSession>,
    action: &'static str,
    edit: impl FnOnce(&mut PdfEditor) -> Result<String>,
) {
    let mut session = session.write();
    let Some(doc) = session.editor.as_mut() else {
        return;
    };
    let status = match edit(doc) {
        Ok(msg) => {
            tracing::info!(action, "PDF edit applied");
            msg
        }
        Err(e) => {
            tracing::error!(action, error = %e, "PDF edit failed");
            error_message(&e)
        }
    };
    session.status = Some(status);
}

fn rotate_current(session: Signal<EditorSession>, degrees: i64) {
    let Some(index) = current_page(session) else {
        return;
    };
    apply_edit(session, "rotate", move |doc| {
        let rotation = doc.rotate_page(index, degrees)?;
        Ok(format!("Page {} rotated to {rotation}\u{00B0}", index + 1))
    });
}

/// Whether it is fine to replace the open document.
fn confirm_discard(session: Signal<EditorSession>) -> bool {
    !session.peek().has_unsaved_changes()
        || rfd::MessageDialog::new()
            .set_title("Unsaved changes")
            .set_description("Discard the changes to the open PDF?")
            .set_buttons(rfd::MessageButtons::YesNo)
            .show()
            == rfd::MessageDialogResult::Yes
}

fn error_message(err: &wandler_core::WandlerError) -> String {
    let human = humanize_error(err);
    format!("{} {}", human.message, human.suggestion)
}

fn search_message(term: &str, hits: &[usize]) -> String {
    match hits {
        [] => format!("\"{term}\" not found"),
        [page] => format!("\"{term}\" found on page {page}"),
        pages => {
            let list: Vec<String> = pages.iter().map(ToString::to_string).collect();
            format!("\"{term}\" found on pages {}", list.join(", "))
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_message_lists_pages() {
        assert_eq!(search_message("tax", &[]), "\"tax\" not found");
        assert_eq!(search_message("tax", &[3]), "\"tax\" found on page 3");
        assert_eq!(search_message("tax", &[1, 4, 9]), "\"tax\" found on pages 1, 4, 9");
    }
}
