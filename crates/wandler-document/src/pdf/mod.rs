// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading, page editing, and creating PDFs.
//
// `reader` and `editor` sit on lopdf; `writer` generates new documents with
// printpdf. The helpers below deal with the loosely typed corners of the PDF
// object model that both lopdf-based modules touch.

pub mod editor;
pub mod reader;
pub mod writer;

pub use editor::PdfEditor;
pub use reader::PdfReader;
pub use writer::PdfWriter;

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use wandler_core::error::WandlerError;

/// Page size used when a page tree carries no MediaBox at all (US Letter).
const FALLBACK_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Load a document from disk, distinguishing password protection from other
/// failures.
pub(crate) fn load_document(path: &Path) -> Result<Document, WandlerError> {
    Document::load(path).map_err(|err| load_error(&path.display().to_string(), err))
}

/// Load a document from memory.
pub(crate) fn load_document_mem(data: &[u8]) -> Result<Document, WandlerError> {
    Document::load_mem(data).map_err(|err| load_error("memory", err))
}

fn load_error(source: &str, err: lopdf::Error) -> WandlerError {
    let message = err.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("password") || lowered.contains("decrypt") {
        WandlerError::PasswordProtected
    } else {
        WandlerError::PdfError(format!("failed to open {source}: {message}"))
    }
}

/// Whether the document is encrypted and lopdf could not open it with the
/// empty user password. Such a document loads without its pages.
pub(crate) fn is_locked(document: &Document) -> bool {
    document.is_encrypted() && document.encryption_state.is_none()
}

/// Numeric value of an Integer or Real object.
pub(crate) fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value),
        _ => None,
    }
}

/// Follow a reference one level; direct objects are returned as-is.
pub(crate) fn resolve<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up `key` on the page, walking up `/Parent` for inheritable
/// attributes (MediaBox, CropBox, Rotate, Resources).
pub(crate) fn inherited<'a>(
    document: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = document.get_dictionary(page_id).ok()?;
    // Bounded walk guards against malformed trees whose /Parent loops.
    for _ in 0..64 {
        if let Ok(value) = node.get(key) {
            return resolve(document, value);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = document.get_dictionary(parent).ok()?;
    }
    None
}

/// `[llx lly urx ury]` of the page, inherited through the page tree.
pub(crate) fn media_box(document: &Document, page_id: ObjectId) -> [f32; 4] {
    inherited(document, page_id, b"MediaBox")
        .and_then(|object| object.as_array().ok())
        .and_then(|values| {
            let numbers: Vec<f32> = values
                .iter()
                .filter_map(|value| resolve(document, value).and_then(number))
                .collect();
            <[f32; 4]>::try_from(numbers).ok()
        })
        .unwrap_or(FALLBACK_MEDIA_BOX)
}

/// Effective /Rotate of the page in degrees, normalised to 0..360.
pub(crate) fn rotation(document: &Document, page_id: ObjectId) -> i64 {
    inherited(document, page_id, b"Rotate")
        .and_then(|object| object.as_i64().ok())
        .unwrap_or(0)
        .rem_euclid(360)
}

/// The document information dictionary, direct or referenced.
pub(crate) fn info_dictionary(document: &Document) -> Option<&Dictionary> {
    let info = document.trailer.get(b"Info").ok()?;
    resolve(document, info)?.as_dict().ok()
}

/// A text entry of the information dictionary (Title, Author, ...).
pub(crate) fn info_string(document: &Document, key: &[u8]) -> Option<String> {
    let value = info_dictionary(document)?.get(key).ok()?;
    match resolve(document, value)? {
        Object::String(bytes, _) => {
            let text = decode_text_string(bytes);
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a byte order mark,
/// otherwise treated as single-byte text.
pub(crate) fn decode_text_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => bytes.iter().map(|&byte| char::from(byte)).collect(),
        },
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Small hand-built PDFs for the lopdf-based tests.

    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// A document with one Helvetica text line per page. The MediaBox sits on
    /// the page tree root so pages inherit it.
    pub fn pdf_with_pages(texts: &[&str]) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap_or_default(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    /// Serialised form of [`pdf_with_pages`].
    pub fn pdf_bytes(texts: &[&str]) -> Vec<u8> {
        let mut doc = pdf_with_pages(texts);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    /// [`pdf_bytes`] locked with `password` as both user and owner password.
    pub fn encrypted_pdf_bytes(texts: &[&str], password: &str) -> Vec<u8> {
        let mut doc = pdf_with_pages(texts);
        super::editor::encrypt_document(&mut doc, password).unwrap();
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{encrypted_pdf_bytes, pdf_bytes, pdf_with_pages};
    use super::*;

    #[test]
    fn password_protected_documents_are_locked() {
        let locked = load_document_mem(&encrypted_pdf_bytes(&["x"], "hunter2")).unwrap();
        assert!(is_locked(&locked));
        assert!(locked.get_pages().is_empty());

        let plain = load_document_mem(&pdf_bytes(&["x"])).unwrap();
        assert!(!is_locked(&plain));
    }

    #[test]
    fn media_box_is_inherited_from_the_page_tree() {
        let doc = pdf_with_pages(&["one"]);
        let page_id = doc.get_pages()[&1];
        assert_eq!(media_box(&doc, page_id), [0.0, 0.0, 595.0, 842.0]);
        assert_eq!(rotation(&doc, page_id), 0);
    }

    #[test]
    fn text_strings_decode_utf16_and_latin1() {
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
        assert_eq!(decode_text_string(b"plain"), "plain");
        assert_eq!(decode_text_string(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }

    #[test]
    fn numbers_accept_integer_and_real() {
        assert_eq!(number(&Object::Integer(3)), Some(3.0));
        assert_eq!(number(&Object::Real(1.5)), Some(1.5));
        assert_eq!(number(&Object::Null), None);
    }
}
