// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — persistent app configuration.

use dioxus::prelude::*;

use wandler_core::PaperSize;

use crate::services::app_services::AppServices;
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut save_msg = use_signal(|| Option::<String>::None);

    let output_label = match state.read().config.default_output_dir {
        Some(ref dir) => dir.display().to_string(),
        None => "Next to the source file".to_string(),
    };

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Output" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Default output folder" }
                    div { style: "display: flex; gap: 8px; align-items: center;",
                        span { style: "color: #666; font-size: 14px;", "{output_label}" }
                        button {
                            onclick: move |_| {
                                if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                                    state.write().config.default_output_dir = Some(dir);
                                }
                            },
                            "Choose..."
                        }
                        button {
                            onclick: move |_| state.write().config.default_output_dir = None,
                            "Clear"
                        }
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Paper size for generated PDFs" }
                    select {
                        style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: state.read().config.paper_size.label(),
                        onchange: move |evt| {
                            if let Some(ps) = paper_size_from_label(&evt.value()) {
                                state.write().config.paper_size = ps;
                            }
                        },
                        for size in PaperSize::ALL {
                            option { key: "{size.label()}", value: size.label(), "{size.label()}" }
                        }
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Word \u{2192} PDF" }
                SettingRow {
                    label: "Use LibreOffice when installed",
                    checked: state.read().config.use_office_suite,
                    on_toggle: move |v: bool| { state.write().config.use_office_suite = v; },
                }
                p { style: "color: #666; font-size: 13px; margin: 8px 0;",
                    "Without LibreOffice, the built-in renderer only covers Western European text; other characters appear as \"?\"."
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Office command" }
                    input {
                        style: "width: 220px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        placeholder: "soffice (searched on PATH)",
                        value: state.read().config.office_command.clone().unwrap_or_default(),
                        onchange: move |evt| {
                            let command = evt.value().trim().to_string();
                            state.write().config.office_command = (!command.is_empty()).then_some(command);
                        },
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Office timeout (seconds)" }
                    input {
                        r#type: "number",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{state.read().config.office_timeout_secs}",
                        onchange: move |evt| {
                            if let Ok(secs) = evt.value().parse::<u64>()
                                && secs > 0
                            {
                                state.write().config.office_timeout_secs = secs;
                            }
                        },
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Images" }
                SettingRow {
                    label: "Enhance images before adding to PDF",
                    checked: state.read().config.enhance_images,
                    on_toggle: move |v: bool| { state.write().config.enhance_images = v; },
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Largest image edge (pixels)" }
                    input {
                        r#type: "number",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{state.read().config.max_image_dimension}",
                        onchange: move |evt| {
                            if let Ok(px) = evt.value().parse::<u32>()
                                && px > 0
                            {
                                state.write().config.max_image_dimension = px;
                            }
                        },
                    }
                }
            }

            // Save button
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #3498db; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = state.read().config.clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                tracing::info!("settings saved");
                                state.write().output_dir = config.default_output_dir.clone();
                                save_msg.set(Some("Settings saved.".into()));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                save_msg.set(Some(format!("Save failed: {e}")));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            if let Some(ref msg) = *save_msg.read() {
                p { style: "color: #27ae60; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Wandler v{VERSION}"
                    br {}
                    "Document converter for PDF, Word, PowerPoint, and images"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

#[component]
fn SettingRow(label: &'static str, checked: bool, on_toggle: EventHandler<bool>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "checkbox",
                checked: checked,
                onchange: move |evt| {
                    on_toggle.call(evt.checked());
                },
            }
        }
    }
}

fn paper_size_from_label(label: &str) -> Option<PaperSize> {
    PaperSize::ALL.into_iter().find(|ps| ps.label() == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_sizes_round_trip_through_labels() {
        for size in PaperSize::ALL {
            assert_eq!(paper_size_from_label(size.label()), Some(size));
        }
        assert_eq!(paper_size_from_label("Tabloid"), None);
    }
}
