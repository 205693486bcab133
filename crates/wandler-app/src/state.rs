// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.

use std::path::PathBuf;

use wandler_core::human_errors::humanize_error;
use wandler_core::{AppConfig, ConversionKind, ConversionOutcome, Progress, WandlerError};
use wandler_document::PdfEditor;

use crate::services::app_services::AppServices;

/// Where the converter window is in its lifecycle.
///
/// `Idle → Converting → Done | Error`; "Convert another" returns to `Idle`.
#[derive(Debug, Clone, Default)]
pub enum ConversionStage {
    #[default]
    Idle,
    Converting(Progress),
    Done(ConversionOutcome),
    /// Dialog heading, suggestion and the underlying error text.
    Error {
        message: String,
        suggestion: String,
        detail: String,
    },
}

impl ConversionStage {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Converting(_))
    }

    /// The error dialog for `err`.
    pub fn failed(err: &WandlerError) -> Self {
        let human = humanize_error(err);
        Self::Error {
            message: human.message,
            suggestion: human.suggestion,
            detail: human.detail,
        }
    }
}

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application settings.
    pub config: AppConfig,
    /// Operation chosen on the Convert page.
    pub selected_kind: ConversionKind,
    /// Files chosen for the selected operation.
    pub selected_files: Vec<PathBuf>,
    /// Output directory override for this session.
    pub output_dir: Option<PathBuf>,
    pub stage: ConversionStage,
    /// PDF handed from the Convert page to the editor.
    pub editor_file: Option<PathBuf>,
}

impl AppState {
    /// Create initial state from the backend services.
    pub fn new(svc: &AppServices) -> Self {
        let config = svc.config();
        Self {
            output_dir: config.default_output_dir.clone(),
            config,
            ..Self::default()
        }
    }

    /// Pick a new operation. The current selection is cleared because it
    /// was validated against the previous one.
    pub fn select_kind(&mut self, kind: ConversionKind) {
        if self.selected_kind != kind {
            self.selected_kind = kind;
            self.selected_files.clear();
        }
        self.stage = ConversionStage::Idle;
    }

    /// Back to the option list after a finished or failed conversion.
    pub fn reset(&mut self) {
        self.selected_files.clear();
        self.stage = ConversionStage::Idle;
    }

    /// Leave `Converting` when the worker for `kind` over `inputs` files
    /// stopped without a result. Any other stage is kept.
    pub fn conversion_interrupted(&mut self, kind: ConversionKind, inputs: usize, reason: String) {
        if self.stage.is_busy() {
            self.stage = ConversionStage::failed(&WandlerError::ConversionFailed {
                conversion: kind.failure_label(inputs).to_string(),
                reason,
            });
        }
    }
}

/// The editor's open document. Provided at app level so it outlives the
/// editor page when the user switches tabs.
#[derive(Default)]
pub struct EditorSession {
    pub editor: Option<PdfEditor>,
    /// Text of a page shown below the info panel.
    pub text_view: Option<String>,
    /// Outcome of the last action.
    pub status: Option<String>,
}

impl EditorSession {
    pub fn has_unsaved_changes(&self) -> bool {
        self.editor.as_ref().is_some_and(PdfEditor::is_modified)
    }

    /// Editor tab caption, marked while edits are unsaved.
    pub fn tab_label(&self) -> &'static str {
        if self.has_unsaved_changes() {
            "PDF Editor \u{2022}"
        } else {
            "PDF Editor"
        }
    }

    /// Replace the open document.
    pub fn load(&mut self, editor: PdfEditor, status: String) {
        self.editor = Some(editor);
        self.text_view = None;
        self.status = Some(status);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            selected_kind: ConversionKind::PdfToWord,
            selected_files: Vec::new(),
            output_dir: None,
            stage: ConversionStage::Idle,
            editor_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_kind_clears_selection() {
        let mut state = AppState::default();
        state.selected_files.push("a.pdf".into());
        state.select_kind(ConversionKind::PdfToWord);
        assert_eq!(state.selected_files.len(), 1);

        state.stage = ConversionStage::Converting(Progress::new(40, "Working"));
        assert!(state.stage.is_busy());
        state.select_kind(ConversionKind::ImageToPdf);
        assert!(state.selected_files.is_empty());
        assert!(matches!(state.stage, ConversionStage::Idle));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut state = AppState::default();
        state.selected_files.push("a.docx".into());
        state.stage = ConversionStage::Error {
            message: "No File Selected".into(),
            suggestion: "Pick one".into(),
            detail: "No input file selected".into(),
        };
        state.reset();
        assert!(state.selected_files.is_empty());
        assert!(!state.stage.is_busy());
        assert!(matches!(state.stage, ConversionStage::Idle));
    }

    #[test]
    fn failures_use_the_dialog_wording() {
        match ConversionStage::failed(&WandlerError::NoInput) {
            ConversionStage::Error { message, suggestion, .. } => {
                assert_eq!(message, "No File Selected");
                assert_eq!(suggestion, "Please select a file to convert first!");
            }
            other => panic!("unexpected stage {other:?}"),
        }
    }

    #[test]
    fn interrupted_conversion_leaves_converting() {
        let mut state = AppState::default();
        state.stage = ConversionStage::Converting(Progress::new(60, "Processing image 2 of 3..."));
        state.conversion_interrupted(ConversionKind::ImageToPdf, 3, "boom".into());
        match &state.stage {
            ConversionStage::Error { message, detail, .. } => {
                assert_eq!(message, "Conversion Error");
                assert_eq!(detail, "Multi-image to PDF conversion failed: boom");
            }
            other => panic!("unexpected stage {other:?}"),
        }

        state.stage = ConversionStage::Idle;
        state.conversion_interrupted(ConversionKind::PdfToWord, 1, "late".into());
        assert!(matches!(state.stage, ConversionStage::Idle));
    }

    #[test]
    fn editor_session_survives_and_flags_unsaved_edits() {
        use wandler_core::PaperSize;
        use wandler_document::PdfWriter;
        use wandler_document::pdf::writer::{BlockStyle, TextBlock};

        let bytes = PdfWriter::new(PaperSize::A4)
            .create_from_blocks(&[TextBlock::new("Quarterly report", BlockStyle::Body)])
            .unwrap();
        let mut session = EditorSession::default();
        assert_eq!(session.tab_label(), "PDF Editor");

        session.load(PdfEditor::from_bytes(&bytes).unwrap(), "Opened".into());
        assert!(!session.has_unsaved_changes());
        assert_eq!(session.status.as_deref(), Some("Opened"));

        session.editor.as_mut().unwrap().rotate_page(0, 90).unwrap();
        assert!(session.has_unsaved_changes());
        assert_eq!(session.tab_label(), "PDF Editor \u{2022}");
    }
}
