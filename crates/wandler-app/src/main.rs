// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wandler — Desktop Document Converter
//
// Entry point. Initialises logging, loads the persisted settings, and
// launches the Dioxus UI.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use pages::batch::Batch;
use pages::convert::Convert;
use pages::editor::Editor;
use pages::settings::Settings;

use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Wandler starting");

    dioxus::launch(app);
}

/// Top-level route enum.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(TabLayout)]
    #[route("/")]
    Convert {},
    #[route("/editor")]
    Editor {},
    #[route("/batch")]
    Batch {},
    #[route("/settings")]
    Settings {},
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(|| {
        let svc = AppServices::init();
        tracing::info!(data_dir = %svc.data_dir().display(), "app services initialised");
        svc
    });

    use_context_provider(|| svc.clone());
    use_context_provider(|| Signal::new(state::AppState::new(&svc)));
    use_context_provider(|| Signal::new(state::EditorSession::default()));

    rsx! {
        Router::<Route> {}
    }
}

/// Persistent top tab layout wrapping all pages.
#[component]
fn TabLayout() -> Element {
    let session = use_context::<Signal<state::EditorSession>>();
    let editor_label = session.read().tab_label();

    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif; background: #f5f6fa;",

            header {
                style: "padding: 12px 16px; background: #2c3e50; color: white;",
                h2 { style: "margin: 0;", "Document Converter" }
                p { style: "margin: 4px 0 0; font-size: 13px; color: #bdc3c7;",
                    "Convert between PDF, Word, PowerPoint, and images"
                }
            }

            nav { class: "tab-bar",
                style: "display: flex; gap: 4px; padding: 8px 16px; border-bottom: 1px solid #e0e0e0; background: #fafafa;",
                TabButton { to: Route::Convert {}, label: "Convert" }
                TabButton { to: Route::Editor {}, label: editor_label }
                TabButton { to: Route::Batch {}, label: "Batch" }
                TabButton { to: Route::Settings {}, label: "Settings" }
            }

            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn TabButton(to: Route, label: &'static str) -> Element {
    rsx! {
        Link { to: to,
            style: "padding: 8px 14px; border-radius: 6px; text-decoration: none; color: #2c3e50; font-size: 14px;",
            "{label}"
        }
    }
}
