// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use dioxus::prelude::*;

use wandler_core::ConversionKind;

pub mod batch;
pub mod convert;
pub mod editor;
pub mod settings;

/// Extensions for a file dialog filter: the accepted ones, without dots.
pub fn dialog_extensions(kind: ConversionKind) -> Vec<&'static str> {
    kind.accepted_extensions()
        .iter()
        .map(|ext| ext.trim_start_matches('.'))
        .collect()
}

#[component]
pub fn ProgressBar(percent: u8, message: String) -> Element {
    rsx! {
        div { style: "margin: 16px 0;",
            div { style: "height: 10px; border-radius: 5px; background: #e0e0e0; overflow: hidden;",
                div { style: "height: 100%; width: {percent}%; background: #3498db; transition: width 0.2s;" }
            }
            p { style: "color: #666; font-size: 14px; margin-top: 6px;", "{percent}% \u{00B7} {message}" }
        }
    }
}
