// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF editor — a stateful page-editing session over one lopdf document.
//
// The session tracks a current page for navigation and a modified flag.
// Page edits (rotate, delete, merge) act on the in-memory page tree; nothing
// touches the disk until `save` / `save_as`. Encryption is recorded on the
// session and applied to a copy of the document at save time.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use lopdf::encryption::{EncryptionState, EncryptionVersion, Permissions};
use lopdf::{Document, Object, ObjectId, StringFormat};
use tracing::{debug, info, instrument, warn};
use wandler_core::error::WandlerError;

use super::reader::PdfMetadata;
use super::{
    inherited, info_string, is_locked, load_document, load_document_mem, media_box, rotation,
};

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// RC4 key length, in bits, for the standard security handler.
const ENCRYPTION_KEY_BITS: usize = 128;

/// Geometry of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    /// 1-based page number.
    pub number: usize,
    /// MediaBox width in points, before rotation.
    pub width: f32,
    /// MediaBox height in points, before rotation.
    pub height: f32,
    /// Effective rotation in degrees (0, 90, 180 or 270).
    pub rotation: i64,
}

impl PageInfo {
    /// Size as displayed, with width and height swapped for quarter turns.
    pub fn display_size(&self) -> (f32, f32) {
        if self.rotation % 180 == 90 {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// Document-level facts shown in the editor's side panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub metadata: PdfMetadata,
    pub page_count: usize,
    pub encrypted: bool,
    /// Size of the file on disk at the source path (0 when unsaved).
    pub file_size: u64,
    pub modified: bool,
}

/// An open PDF with a current page and pending edits.
pub struct PdfEditor {
    document: Document,
    path: Option<PathBuf>,
    current_page: Option<usize>,
    modified: bool,
    /// Password to apply when saving.
    password: Option<String>,
}

impl PdfEditor {
    // -- Session --------------------------------------------------------------

    /// Open a PDF for editing.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WandlerError> {
        let path = path.as_ref();
        let document = load_document(path)?;
        let editor = Self::from_document(document, Some(path.to_path_buf()))?;
        info!(pages = editor.page_count(), "PDF opened for editing");
        Ok(editor)
    }

    /// Start a session on a PDF held in memory. `save` needs a path, so such
    /// sessions are saved with `save_as`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, WandlerError> {
        Self::from_document(load_document_mem(data)?, None)
    }

    fn from_document(document: Document, path: Option<PathBuf>) -> Result<Self, WandlerError> {
        if is_locked(&document) {
            return Err(WandlerError::PasswordProtected);
        }
        let has_pages = !document.get_pages().is_empty();
        Ok(Self {
            document,
            path,
            current_page: has_pages.then_some(0),
            modified: false,
            password: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    // -- Navigation -----------------------------------------------------------

    /// 0-based index of the current page; `None` for an empty document.
    pub fn current_page(&self) -> Option<usize> {
        self.current_page
    }

    /// Move to page `index` (0-based). Out-of-range indexes are ignored.
    pub fn goto_page(&mut self, index: usize) -> bool {
        if index < self.page_count() {
            self.current_page = Some(index);
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        match self.current_page {
            Some(current) => self.goto_page(current + 1),
            None => false,
        }
    }

    pub fn prev_page(&mut self) -> bool {
        match self.current_page {
            Some(current) if current > 0 => self.goto_page(current - 1),
            _ => false,
        }
    }

    // -- Inspection -----------------------------------------------------------

    /// Size and rotation of page `index`.
    pub fn page_info(&self, index: usize) -> Result<PageInfo, WandlerError> {
        let page_id = self.page_id(index)?;
        let [llx, lly, urx, ury] = media_box(&self.document, page_id);
        Ok(PageInfo {
            number: index + 1,
            width: (urx - llx).abs(),
            height: (ury - lly).abs(),
            rotation: rotation(&self.document, page_id),
        })
    }

    pub fn document_info(&self) -> DocumentInfo {
        let file_size = self
            .path
            .as_deref()
            .and_then(|path| std::fs::metadata(path).ok())
            .map(|metadata| metadata.len())
            .unwrap_or(0);

        DocumentInfo {
            metadata: PdfMetadata {
                title: info_string(&self.document, b"Title"),
                author: info_string(&self.document, b"Author"),
                subject: info_string(&self.document, b"Subject"),
                creator: info_string(&self.document, b"Creator"),
                producer: info_string(&self.document, b"Producer"),
            },
            page_count: self.page_count(),
            encrypted: self.document.is_encrypted() || self.password.is_some(),
            file_size,
            modified: self.modified,
        }
    }

    // -- Page edits -----------------------------------------------------------

    /// Rotate page `index` by `degrees` (a multiple of 90, negative turns
    /// counter-clockwise). Returns the new rotation.
    #[instrument(skip(self))]
    pub fn rotate_page(&mut self, index: usize, degrees: i64) -> Result<i64, WandlerError> {
        if degrees % 90 != 0 {
            return Err(WandlerError::PdfError(format!(
                "rotation must be a multiple of 90, got {degrees}"
            )));
        }

        let page_id = self.page_id(index)?;
        let existing = rotation(&self.document, page_id);
        let new_rotation = (existing + degrees).rem_euclid(360);

        self.document
            .get_dictionary_mut(page_id)
            .map_err(tree_error)?
            .set("Rotate", Object::Integer(new_rotation));
        self.modified = true;

        info!(page = index + 1, existing, new_rotation, "Page rotated");
        Ok(new_rotation)
    }

    /// Delete page `index`. The last remaining page cannot be deleted.
    #[instrument(skip(self))]
    pub fn delete_page(&mut self, index: usize) -> Result<(), WandlerError> {
        let total = self.page_count();
        if total <= 1 {
            return Err(WandlerError::PdfError(
                "cannot delete the only page of a document".into(),
            ));
        }

        let page_id = self.page_id(index)?;
        remove_page(&mut self.document, page_id)?;
        self.modified = true;

        let remaining = total - 1;
        self.current_page = self.current_page.map(|current| current.min(remaining - 1));
        info!(page = index + 1, remaining, "Page deleted");
        Ok(())
    }

    /// Append every page of the PDF at `path`. Returns the number of pages
    /// added.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn merge(&mut self, path: impl AsRef<Path>) -> Result<usize, WandlerError> {
        let other = load_document(path.as_ref())?;
        if is_locked(&other) {
            return Err(WandlerError::PasswordProtected);
        }
        self.append_document(other)
    }

    fn append_document(&mut self, mut other: Document) -> Result<usize, WandlerError> {
        other.renumber_objects_with(self.document.max_id + 1);

        let other_pages: Vec<ObjectId> = other.get_pages().into_values().collect();

        // Pages leave their own tree behind, so inherited attributes move
        // onto the page itself first.
        for &page_id in &other_pages {
            let mut copied = Vec::new();
            for key in INHERITABLE_KEYS {
                let own = other.get_dictionary(page_id).map_err(tree_error)?.has(key);
                if !own && let Some(value) = inherited(&other, page_id, key) {
                    copied.push((key.to_vec(), value.clone()));
                }
            }
            let page = other.get_dictionary_mut(page_id).map_err(tree_error)?;
            for (key, value) in copied {
                page.set(key, value);
            }
        }

        let tree_nodes: HashSet<ObjectId> = other
            .objects
            .iter()
            .filter(|(_, object)| {
                matches!(
                    object
                        .as_dict()
                        .ok()
                        .and_then(|dict| dict.get(b"Type").ok())
                        .and_then(|kind| kind.as_name().ok()),
                    Some(b"Catalog" | b"Pages")
                )
            })
            .map(|(id, _)| *id)
            .collect();

        let root_pages = self.root_pages_id()?;
        let other_max_id = other.max_id;
        for (id, object) in other.objects {
            if !tree_nodes.contains(&id) {
                self.document.objects.insert(id, object);
            }
        }

        for &page_id in &other_pages {
            self.document
                .get_dictionary_mut(page_id)
                .map_err(tree_error)?
                .set("Parent", root_pages);
        }

        let root = self
            .document
            .get_dictionary_mut(root_pages)
            .map_err(tree_error)?;
        if let Ok(Object::Array(kids)) = root.get_mut(b"Kids") {
            kids.extend(other_pages.iter().map(|&id| Object::Reference(id)));
        }
        if let Ok(Object::Integer(count)) = root.get_mut(b"Count") {
            *count += other_pages.len() as i64;
        }
        self.document.max_id = self.document.max_id.max(other_max_id);

        if self.current_page.is_none() && !other_pages.is_empty() {
            self.current_page = Some(0);
        }
        self.modified = true;
        info!(added = other_pages.len(), total = self.page_count(), "PDF merged");
        Ok(other_pages.len())
    }

    /// Write page `index` on its own as a new PDF at `dest`.
    #[instrument(skip(self, dest), fields(dest = %dest.as_ref().display()))]
    pub fn extract_page(&self, index: usize, dest: impl AsRef<Path>) -> Result<(), WandlerError> {
        let keep = self.page_id(index)?;
        let mut single = self.document.clone();

        let others: Vec<ObjectId> = single
            .get_pages()
            .into_values()
            .filter(|&id| id != keep)
            .collect();
        for page_id in others {
            remove_page(&mut single, page_id)?;
        }

        let bytes = serialise(single, None)?;
        std::fs::write(dest.as_ref(), &bytes)?;
        info!(page = index + 1, bytes = bytes.len(), "Page extracted");
        Ok(())
    }

    // -- Text -----------------------------------------------------------------

    /// Text of page `index`.
    pub fn page_text(&self, index: usize) -> Result<String, WandlerError> {
        let total = self.page_count();
        if index >= total {
            return Err(WandlerError::InvalidPage {
                page: index + 1,
                total,
            });
        }

        self.document
            .extract_text(&[index as u32 + 1])
            .map_err(|err| {
                WandlerError::PdfError(format!("cannot extract text from page {}: {err}", index + 1))
            })
    }

    /// Text of every page, each under a `--- Page N ---` header.
    pub fn all_text(&self) -> String {
        let mut text = String::new();
        for index in 0..self.page_count() {
            let page = self.page_text(index).unwrap_or_else(|err| {
                warn!(page = index + 1, %err, "Text extraction failed");
                String::new()
            });
            text.push_str(&format!("--- Page {} ---\n{}\n\n", index + 1, page.trim_end()));
        }
        text
    }

    /// Write [`PdfEditor::all_text`] to `dest`.
    pub fn extract_all_text(&self, dest: impl AsRef<Path>) -> Result<(), WandlerError> {
        let text = self.all_text();
        std::fs::write(dest.as_ref(), &text)?;
        info!(bytes = text.len(), "Text written to {}", dest.as_ref().display());
        Ok(())
    }

    /// 1-based numbers of the pages containing `term`, ignoring case. The
    /// current page moves to the first hit.
    #[instrument(skip(self))]
    pub fn search(&mut self, term: &str) -> Vec<usize> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let hits: Vec<usize> = (0..self.page_count())
            .filter(|&index| {
                self.page_text(index)
                    .map(|text| text.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .map(|index| index + 1)
            .collect();

        if let Some(&first) = hits.first() {
            self.current_page = Some(first - 1);
        }
        debug!(hits = hits.len(), "Search complete");
        hits
    }

    // -- Whole-document operations --------------------------------------------

    /// Compress every content stream.
    pub fn compress(&mut self) {
        self.document.compress();
        self.modified = true;
        info!("Content streams compressed");
    }

    /// Protect the document with `password` (used for both the user and the
    /// owner password) when it is next saved.
    pub fn encrypt(&mut self, password: &str) -> Result<(), WandlerError> {
        if password.is_empty() {
            return Err(WandlerError::PdfError("password must not be empty".into()));
        }
        self.password = Some(password.to_string());
        self.modified = true;
        info!("Encryption scheduled for next save");
        Ok(())
    }

    /// Save back to the path the session was opened from.
    pub fn save(&mut self) -> Result<(), WandlerError> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| WandlerError::PdfError("document has no file path; use save as".into()))?;
        self.save_as(path)
    }

    /// Save to `path`, which becomes the session's path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), WandlerError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        self.path = Some(path.as_ref().to_path_buf());
        self.modified = false;
        info!(bytes = bytes.len(), "PDF saved");
        Ok(())
    }

    /// Serialise the document with all pending edits applied.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WandlerError> {
        serialise(self.document.clone(), self.password.as_deref())
    }

    // -- Helpers --------------------------------------------------------------

    fn page_id(&self, index: usize) -> Result<ObjectId, WandlerError> {
        let pages = self.document.get_pages();
        pages
            .get(&(index as u32 + 1))
            .copied()
            .ok_or(WandlerError::InvalidPage {
                page: index + 1,
                total: pages.len(),
            })
    }

    fn root_pages_id(&self) -> Result<ObjectId, WandlerError> {
        self.document
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(tree_error)
    }
}

/// Unlink a page from its parent and fix up `/Count` on every ancestor.
fn remove_page(document: &mut Document, page_id: ObjectId) -> Result<(), WandlerError> {
    let parent_id = document
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"Parent"))
        .and_then(Object::as_reference)
        .map_err(tree_error)?;

    if let Ok(Object::Array(kids)) = document
        .get_dictionary_mut(parent_id)
        .map_err(tree_error)?
        .get_mut(b"Kids")
    {
        kids.retain(|kid| kid.as_reference().ok() != Some(page_id));
    }

    let mut node = Some(parent_id);
    for _ in 0..64 {
        let Some(id) = node else { break };
        let dict = document.get_dictionary_mut(id).map_err(tree_error)?;
        if let Ok(Object::Integer(count)) = dict.get_mut(b"Count") {
            *count -= 1;
        }
        node = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }

    document.objects.remove(&page_id);
    Ok(())
}

/// Drop unreachable objects, optionally encrypt, and write out.
fn serialise(mut document: Document, password: Option<&str>) -> Result<Vec<u8>, WandlerError> {
    document.prune_objects();
    if let Some(password) = password {
        encrypt_document(&mut document, password)?;
    }

    let mut output = Vec::new();
    document
        .save_to(&mut output)
        .map_err(|err| WandlerError::PdfError(format!("failed to serialise PDF: {err}")))?;
    Ok(output)
}

/// Apply the standard security handler (RC4, 128-bit).
pub(crate) fn encrypt_document(document: &mut Document, password: &str) -> Result<(), WandlerError> {
    // The key derivation hashes the first file identifier.
    if document.trailer.get(b"ID").is_err() {
        let id = uuid::Uuid::new_v4().as_bytes().to_vec();
        document.trailer.set(
            "ID",
            Object::Array(vec![
                Object::String(id.clone(), StringFormat::Hexadecimal),
                Object::String(id, StringFormat::Hexadecimal),
            ]),
        );
    }

    let version = EncryptionVersion::V2 {
        document: &*document,
        owner_password: password,
        user_password: password,
        key_length: ENCRYPTION_KEY_BITS,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version)
        .map_err(|err| WandlerError::PdfError(format!("cannot set up encryption: {err}")))?;
    document
        .encrypt(&state)
        .map_err(|err| WandlerError::PdfError(format!("encryption failed: {err}")))?;
    debug!("Document encrypted");
    Ok(())
}

fn tree_error(err: lopdf::Error) -> WandlerError {
    WandlerError::PdfError(format!("malformed page tree: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::{encrypted_pdf_bytes, pdf_bytes};

    fn editor(texts: &[&str]) -> PdfEditor {
        PdfEditor::from_bytes(&pdf_bytes(texts)).unwrap()
    }

    #[test]
    fn navigation_stays_in_range() {
        let mut editor = editor(&["a", "b", "c"]);
        assert_eq!(editor.current_page(), Some(0));
        assert!(!editor.prev_page());
        assert!(editor.next_page());
        assert!(editor.next_page());
        assert!(!editor.next_page());
        assert_eq!(editor.current_page(), Some(2));
        assert!(!editor.goto_page(3));
        assert!(editor.goto_page(1));
        assert_eq!(editor.current_page(), Some(1));
    }

    #[test]
    fn rotation_accumulates_and_wraps() {
        let mut editor = editor(&["a"]);
        assert_eq!(editor.rotate_page(0, 90).unwrap(), 90);
        assert_eq!(editor.rotate_page(0, -180).unwrap(), 270);
        assert_eq!(editor.rotate_page(0, 90).unwrap(), 0);
        assert!(editor.rotate_page(0, 45).is_err());
        assert!(editor.is_modified());

        editor.rotate_page(0, 90).unwrap();
        let info = editor.page_info(0).unwrap();
        assert_eq!(info.rotation, 90);
        assert_eq!((info.width, info.height), (595.0, 842.0));
        assert_eq!(info.display_size(), (842.0, 595.0));
    }

    #[test]
    fn delete_keeps_tree_consistent_and_refuses_last_page() {
        let mut editor = editor(&["first", "second", "third"]);
        editor.goto_page(2);
        editor.delete_page(2).unwrap();
        assert_eq!(editor.page_count(), 2);
        assert_eq!(editor.current_page(), Some(1));

        let reloaded = PdfEditor::from_bytes(&editor.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.page_count(), 2);
        assert!(reloaded.page_text(1).unwrap().contains("second"));

        editor.delete_page(0).unwrap();
        assert!(editor.delete_page(0).is_err());
        assert_eq!(editor.page_count(), 1);
    }

    #[test]
    fn merge_appends_pages_after_existing_ones() {
        let dir = tempfile::tempdir().unwrap();
        let other = dir.path().join("appendix.pdf");
        std::fs::write(&other, pdf_bytes(&["extra one", "extra two"])).unwrap();

        let mut editor = editor(&["base"]);
        let added = editor.merge(&other).unwrap();
        assert_eq!(added, 2);
        assert_eq!(editor.page_count(), 3);

        let reloaded = PdfEditor::from_bytes(&editor.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.page_count(), 3);
        assert!(reloaded.page_text(2).unwrap().contains("extra two"));
        // MediaBox was inherited in the source tree and must survive the move.
        assert_eq!(reloaded.page_info(2).unwrap().width, 595.0);
    }

    #[test]
    fn search_is_case_insensitive_and_moves_to_first_hit() {
        let mut editor = editor(&["Nothing here", "The Budget", "budget again"]);
        assert_eq!(editor.search("BUDGET"), vec![2, 3]);
        assert_eq!(editor.current_page(), Some(1));
        assert!(editor.search("missing").is_empty());
        assert!(editor.search("  ").is_empty());
    }

    #[test]
    fn all_text_has_page_headers() {
        let editor = editor(&["alpha", "beta"]);
        let text = editor.all_text();
        assert!(text.starts_with("--- Page 1 ---\n"));
        assert!(text.contains("--- Page 2 ---\n"));
        assert!(text.contains("beta"));
    }

    #[test]
    fn extract_page_and_save_as_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&["one", "two", "three"]);

        let single = dir.path().join("page2.pdf");
        editor.extract_page(1, &single).unwrap();
        let extracted = PdfEditor::open(&single).unwrap();
        assert_eq!(extracted.page_count(), 1);
        assert!(extracted.page_text(0).unwrap().contains("two"));

        editor.rotate_page(0, 90).unwrap();
        let saved = dir.path().join("saved.pdf");
        editor.save_as(&saved).unwrap();
        assert!(!editor.is_modified());
        assert_eq!(editor.path(), Some(saved.as_path()));
        assert!(editor.document_info().file_size > 0);
    }

    #[test]
    fn encryption_is_applied_on_save() {
        let mut editor = editor(&["secret"]);
        assert!(editor.encrypt("").is_err());
        editor.encrypt("hunter2").unwrap();
        assert!(editor.document_info().encrypted);

        let bytes = editor.to_bytes().unwrap();
        let raw = String::from_utf8_lossy(&bytes);
        assert!(raw.contains("/Encrypt"));
    }

    #[test]
    fn encrypted_save_needs_the_password_to_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked.pdf");

        let mut editor = editor(&["payroll"]);
        editor.encrypt("hunter2").unwrap();
        editor.save_as(&locked).unwrap();

        assert!(matches!(
            PdfEditor::open(&locked),
            Err(WandlerError::PasswordProtected)
        ));
    }

    #[test]
    fn locked_documents_are_refused() {
        let bytes = encrypted_pdf_bytes(&["a", "b"], "hunter2");
        assert!(matches!(
            PdfEditor::from_bytes(&bytes),
            Err(WandlerError::PasswordProtected)
        ));

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked.pdf");
        std::fs::write(&locked, &bytes).unwrap();
        let mut editor = editor(&["base"]);
        assert!(matches!(editor.merge(&locked), Err(WandlerError::PasswordProtected)));
        assert_eq!(editor.page_count(), 1);
        assert!(!editor.is_modified());
    }

    #[test]
    fn save_without_path_is_an_error() {
        let mut editor = editor(&["x"]);
        assert!(editor.save().is_err());
    }
}
