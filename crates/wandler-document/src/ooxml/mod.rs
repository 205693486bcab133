// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OOXML module — reading and writing .docx and .pptx packages.
//
// An OOXML file is a ZIP archive of XML parts. This module owns the archive
// handling (zip) and the attribute/escaping helpers (quick-xml) shared by the
// Word and PowerPoint submodules.

pub mod docx;
pub mod pptx;

use std::io::{Cursor, Read, Write};
use std::path::Path;

use quick_xml::events::BytesStart;
use tracing::debug;
use wandler_core::error::{Result, WandlerError};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Local file header signature every ZIP (and so every OOXML file) starts with.
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

/// Signature of OLE2 compound files (legacy .doc / .ppt).
const OLE2_MAGIC: &[u8; 8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

/// Read-only view over the parts of an OOXML package.
pub struct Package {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl Package {
    /// Open a package from the filesystem.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Open a package already held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.starts_with(OLE2_MAGIC) {
            return Err(WandlerError::UnsupportedDocument(
                "legacy binary Office format (.doc/.ppt); re-save it as .docx/.pptx".into(),
            ));
        }
        if !data.starts_with(ZIP_MAGIC) {
            return Err(WandlerError::OoxmlError(
                "not an Office Open XML package".into(),
            ));
        }

        let archive = ZipArchive::new(Cursor::new(data))
            .map_err(|err| WandlerError::OoxmlError(format!("invalid package: {err}")))?;
        debug!(parts = archive.len(), "OOXML package opened");
        Ok(Self { archive })
    }

    /// Read a part as UTF-8 text. `Ok(None)` when the part does not exist.
    pub fn read_part(&mut self, name: &str) -> Result<Option<String>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(err) => {
                return Err(WandlerError::OoxmlError(format!(
                    "cannot read part {name}: {err}"
                )));
            }
        };

        let mut xml = String::new();
        file.read_to_string(&mut xml)
            .map_err(|err| WandlerError::OoxmlError(format!("part {name} is not UTF-8: {err}")))?;
        Ok(Some(xml))
    }

    /// Read a part that must exist.
    pub fn require_part(&mut self, name: &str) -> Result<String> {
        self.read_part(name)?
            .ok_or_else(|| WandlerError::OoxmlError(format!("missing part {name}")))
    }

    /// Names of every part in the package.
    pub fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }
}

/// Accumulates parts and serialises them as a deflated ZIP package.
pub struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl PackageWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Add one part.
    pub fn add_part(&mut self, name: &str, contents: &str) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip
            .start_file(name, options)
            .map_err(|err| WandlerError::OoxmlError(format!("cannot add part {name}: {err}")))?;
        self.zip.write_all(contents.as_bytes())?;
        Ok(())
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self
            .zip
            .finish()
            .map_err(|err| WandlerError::OoxmlError(format!("cannot finish package: {err}")))?;
        Ok(cursor.into_inner())
    }
}

impl Default for PackageWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of the attribute whose local name is `local_name`, ignoring the
/// namespace prefix (`w:val` and `val` both match `val`).
pub(crate) fn attribute(element: &BytesStart<'_>, local_name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|err| WandlerError::OoxmlError(format!("bad attribute: {err}")))?;
        if attr.key.local_name().as_ref() == local_name {
            let value = attr
                .unescape_value()
                .map_err(|err| WandlerError::OoxmlError(format!("bad attribute value: {err}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Escape text for inclusion in element content or attribute values.
pub(crate) fn escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

/// Map a quick-xml failure into the crate error.
pub(crate) fn xml_error(part: &str, err: quick_xml::Error) -> WandlerError {
    WandlerError::OoxmlError(format!("malformed XML in {part}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_parts_can_be_read_back() {
        let mut writer = PackageWriter::new();
        writer.add_part("a/one.xml", "<x>1</x>").unwrap();
        writer.add_part("two.xml", "<y/>").unwrap();
        let bytes = writer.finish().unwrap();

        let mut package = Package::from_bytes(bytes).unwrap();
        assert_eq!(package.read_part("a/one.xml").unwrap().as_deref(), Some("<x>1</x>"));
        assert_eq!(package.read_part("missing.xml").unwrap(), None);
        assert!(package.require_part("missing.xml").is_err());
        assert_eq!(package.part_names().len(), 2);
    }

    #[test]
    fn legacy_binary_files_are_rejected_as_unsupported() {
        let mut data = OLE2_MAGIC.to_vec();
        data.extend_from_slice(&[0u8; 64]);
        assert!(matches!(
            Package::from_bytes(data),
            Err(WandlerError::UnsupportedDocument(_))
        ));
    }

    #[test]
    fn random_bytes_are_not_a_package() {
        assert!(matches!(
            Package::from_bytes(b"hello world".to_vec()),
            Err(WandlerError::OoxmlError(_))
        ));
    }

    #[test]
    fn escaping_covers_markup_characters() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
