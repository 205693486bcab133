// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the converter dialogs.
//
// Every failure reaches the user as a short heading plus a suggestion. The
// full technical text is kept alongside so it can still be shown on demand.

use crate::error::WandlerError;

/// A user-facing error: plain heading, what to try, and the raw detail.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as the dialog heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// The underlying error text.
    pub detail: String,
}

/// Convert a `WandlerError` into the text shown in an error dialog.
pub fn humanize_error(err: &WandlerError) -> HumanError {
    let detail = err.to_string();
    let (message, suggestion): (&str, String) = match err {
        WandlerError::NoInput => (
            "No File Selected",
            "Please select a file to convert first!".into(),
        ),

        WandlerError::IncompatibleFile { .. } => (
            "Invalid File Type",
            format!("{detail}. Pick a different conversion or another file."),
        ),

        WandlerError::UnsupportedConversion(_) => (
            "Not a conversion",
            "Use the PDF editor for this operation.".into(),
        ),

        WandlerError::UnsupportedDocument(_) => (
            "This type of document isn't supported.",
            "Legacy .doc and .ppt files must be re-saved as .docx or .pptx first.".into(),
        ),

        WandlerError::PasswordProtected => (
            "This PDF is password protected.",
            "Remove the password in another program, then try again.".into(),
        ),

        WandlerError::PdfError(_) | WandlerError::InvalidPage { .. } => (
            "There's a problem with this PDF file.",
            "The file may be damaged. Try opening it in a PDF viewer first.".into(),
        ),

        WandlerError::ImageError(_) => (
            "There's a problem with this image.",
            "The image may be damaged or in an unusual format. Try saving it as PNG or JPEG.".into(),
        ),

        WandlerError::OoxmlError(_) => (
            "The Office document could not be read.",
            "The file may be damaged. Try opening and re-saving it in your office suite.".into(),
        ),

        WandlerError::OfficeSuite(_) => (
            "The office suite could not convert this file.",
            "Turn off \"Use office suite\" in Settings to use the built-in converter.".into(),
        ),

        WandlerError::ConversionFailed { .. } => (
            "Conversion Error",
            "An error occurred during conversion. Check the details below.".into(),
        ),

        WandlerError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => (
                "The file couldn't be found.",
                "It may have been moved or deleted. Try choosing the file again.".into(),
            ),
            std::io::ErrorKind::PermissionDenied => (
                "Permission denied.",
                "Choose a different save location, or check the file permissions.".into(),
            ),
            _ => (
                "There was a problem reading or writing a file.",
                "Try again. If this keeps happening, your disk may be full.".into(),
            ),
        },

        WandlerError::Serialization(_) => (
            "The settings file could not be read.",
            "Default settings will be used.".into(),
        ),
    };

    HumanError {
        message: message.into(),
        suggestion,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incompatible_file_mentions_extension() {
        let err = WandlerError::IncompatibleFile {
            extension: ".png".into(),
            conversion: "PDF to Word Document".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.message, "Invalid File Type");
        assert!(human.suggestion.contains("(.png)"));
        assert!(human.detail.contains("PDF to Word Document"));
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let err = WandlerError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(humanize_error(&err).message, "The file couldn't be found.");
    }

    #[test]
    fn wrapped_failure_keeps_reason() {
        let err = WandlerError::ConversionFailed {
            conversion: "PDF to Word".into(),
            reason: "PDF is password protected. Please unlock it first.".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(
            human.detail,
            "PDF to Word conversion failed: PDF is password protected. Please unlock it first."
        );
    }
}
