// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word (.docx) reading and writing.
//
// Reading walks `word/document.xml` for paragraphs and their style, resolves
// style ids to names through `word/styles.xml`, and picks the title, author
// and subject out of `docProps/core.xml`. Writing produces a small package
// with a fixed style sheet (Normal, Title, Heading 1-3).

use std::collections::HashMap;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, info, instrument};
use wandler_core::error::Result;

use super::{Package, PackageWriter, attribute, escape, xml_error};

/// A paragraph of a Word document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordParagraph {
    pub text: String,
    /// Style name as Word displays it ("Heading 1", "Title", "Normal").
    pub style: Option<String>,
}

/// The document-level metadata Wandler reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// Paragraph content and metadata of a .docx file.
#[derive(Debug, Clone)]
pub struct WordDocument {
    pub paragraphs: Vec<WordParagraph>,
    pub properties: CoreProperties,
}

impl WordDocument {
    /// Open a .docx from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut package = Package::open(path.as_ref())?;
        let document = Self::from_package(&mut package)?;
        info!(
            paragraphs = document.paragraphs.len(),
            "Word document loaded"
        );
        Ok(document)
    }

    /// Parse a .docx already held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut package = Package::from_bytes(data)?;
        Self::from_package(&mut package)
    }

    fn from_package(package: &mut Package) -> Result<Self> {
        let style_names = match package.read_part("word/styles.xml")? {
            Some(xml) => parse_style_names(&xml)?,
            None => HashMap::new(),
        };
        let body = package.require_part("word/document.xml")?;
        let paragraphs = parse_paragraphs(&body, &style_names)?;
        let properties = match package.read_part("docProps/core.xml")? {
            Some(xml) => parse_core_properties(&xml)?,
            None => CoreProperties::default(),
        };

        Ok(Self {
            paragraphs,
            properties,
        })
    }

    /// Paragraphs whose text is not blank.
    pub fn non_empty_paragraphs(&self) -> impl Iterator<Item = &WordParagraph> {
        self.paragraphs
            .iter()
            .filter(|paragraph| !paragraph.text.trim().is_empty())
    }
}

/// Build `styleId → display name` from `word/styles.xml`.
fn parse_style_names(xml: &str) -> Result<HashMap<String, String>> {
    let part = "word/styles.xml";
    let mut reader = Reader::from_str(xml);
    let mut names = HashMap::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event().map_err(|err| xml_error(part, err))? {
            Event::Start(e) if e.local_name().as_ref() == b"style" => {
                current_id = attribute(&e, b"styleId")?;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"name" => {
                if let (Some(id), Some(name)) = (current_id.as_ref(), attribute(&e, b"val")?) {
                    names.insert(id.clone(), display_style_name(&name));
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"style" => current_id = None,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(names)
}

/// Word stores built-in style names in lower case ("heading 1") but shows
/// them capitalised.
fn display_style_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_paragraphs(xml: &str, style_names: &HashMap<String, String>) -> Result<Vec<WordParagraph>> {
    let part = "word/document.xml";
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    // Text boxes nest paragraphs inside paragraphs.
    let mut open: Vec<WordParagraph> = Vec::new();
    let mut in_text = false;

    let resolve = |style_id: String| -> String {
        style_names
            .get(&style_id)
            .cloned()
            .unwrap_or(style_id)
    };

    loop {
        match reader.read_event().map_err(|err| xml_error(part, err))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => open.push(WordParagraph {
                    text: String::new(),
                    style: None,
                }),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(WordParagraph {
                    text: String::new(),
                    style: None,
                }),
                b"pStyle" => {
                    if let (Some(paragraph), Some(id)) = (open.last_mut(), attribute(&e, b"val")?) {
                        paragraph.style = Some(resolve(id));
                    }
                }
                b"tab" => {
                    if let Some(paragraph) = open.last_mut() {
                        paragraph.text.push('\t');
                    }
                }
                b"br" | b"cr" => {
                    if let Some(paragraph) = open.last_mut() {
                        paragraph.text.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|err| xml_error(part, err))?;
                if let Some(paragraph) = open.last_mut() {
                    paragraph.text.push_str(&text);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(paragraphs = paragraphs.len(), "document.xml parsed");
    Ok(paragraphs)
}

fn parse_core_properties(xml: &str) -> Result<CoreProperties> {
    let part = "docProps/core.xml";
    let mut reader = Reader::from_str(xml);
    let mut properties = CoreProperties::default();
    let mut current: Option<Vec<u8>> = None;

    loop {
        match reader.read_event().map_err(|err| xml_error(part, err))? {
            Event::Start(e) => current = Some(e.local_name().as_ref().to_vec()),
            Event::Text(t) => {
                let text = t.unescape().map_err(|err| xml_error(part, err))?;
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                let slot = match current.as_deref() {
                    Some(b"title") => &mut properties.title,
                    Some(b"creator") => &mut properties.author,
                    Some(b"subject") => &mut properties.subject,
                    _ => continue,
                };
                *slot = Some(text.to_string());
            }
            Event::End(_) => current = None,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(properties)
}

// -- Writing -------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Block {
    /// Level 0 is the Title style, 1-3 the Heading styles.
    Heading { text: String, level: u8 },
    Paragraph(String),
    PageBreak,
}

/// Builds a new .docx document block by block.
#[derive(Debug, Clone, Default)]
pub struct DocxBuilder {
    blocks: Vec<Block>,
    properties: CoreProperties,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.properties.title = Some(title.into());
        self
    }

    pub fn set_author(&mut self, author: impl Into<String>) -> &mut Self {
        self.properties.author = Some(author.into());
        self
    }

    /// Add a heading. Level 0 uses the Title style; deeper levels are
    /// capped at Heading 3.
    pub fn add_heading(&mut self, text: impl Into<String>, level: u8) -> &mut Self {
        self.blocks.push(Block::Heading {
            text: text.into(),
            level: level.min(3),
        });
        self
    }

    /// Add a body paragraph. Embedded newlines become line breaks.
    pub fn add_paragraph(&mut self, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Paragraph(text.into()));
        self
    }

    pub fn add_page_break(&mut self) -> &mut Self {
        self.blocks.push(Block::PageBreak);
        self
    }

    /// Serialise the package.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = PackageWriter::new();
        writer.add_part("[Content_Types].xml", CONTENT_TYPES_XML)?;
        writer.add_part("_rels/.rels", ROOT_RELS_XML)?;
        writer.add_part("word/_rels/document.xml.rels", DOCUMENT_RELS_XML)?;
        writer.add_part("word/styles.xml", STYLES_XML)?;
        writer.add_part("word/document.xml", &self.document_xml())?;
        writer.add_part("docProps/core.xml", &core_properties_xml(&self.properties))?;
        writer.finish()
    }

    /// Serialise and write to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(
            blocks = self.blocks.len(),
            bytes = bytes.len(),
            "Wrote Word document to {}",
            path.as_ref().display()
        );
        Ok(())
    }

    fn document_xml(&self) -> String {
        let mut body = String::new();
        for block in &self.blocks {
            match block {
                Block::Heading { text, level } => {
                    let style = match level {
                        0 => "Title".to_string(),
                        n => format!("Heading{n}"),
                    };
                    body.push_str(&format!(
                        "<w:p><w:pPr><w:pStyle w:val=\"{style}\"/></w:pPr>{}</w:p>",
                        runs_xml(text)
                    ));
                }
                Block::Paragraph(text) => {
                    body.push_str(&format!("<w:p>{}</w:p>", runs_xml(text)));
                }
                Block::PageBreak => {
                    body.push_str("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>");
                }
            }
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
             <w:body>{body}<w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/>\
             <w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
             w:header=\"708\" w:footer=\"708\" w:gutter=\"0\"/></w:sectPr></w:body></w:document>"
        )
    }
}

/// One run per line, separated by `<w:br/>`.
fn runs_xml(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>", escape(line)))
        .collect::<Vec<_>>()
        .join("<w:r><w:br/></w:r>")
}

fn core_properties_xml(properties: &CoreProperties) -> String {
    let mut fields = String::new();
    if let Some(title) = &properties.title {
        fields.push_str(&format!("<dc:title>{}</dc:title>", escape(title)));
    }
    if let Some(subject) = &properties.subject {
        fields.push_str(&format!("<dc:subject>{}</dc:subject>", escape(subject)));
    }
    if let Some(author) = &properties.author {
        fields.push_str(&format!("<dc:creator>{}</dc:creator>", escape(author)));
    }
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">{fields}\
         <dcterms:created xsi:type=\"dcterms:W3CDTF\">{now}</dcterms:created>\
         <dcterms:modified xsi:type=\"dcterms:W3CDTF\">{now}</dcterms:modified>\
         </cp:coreProperties>"
    )
}

const CONTENT_TYPES_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
<Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
<Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\
</Types>";

const ROOT_RELS_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>\
</Relationships>";

const DOCUMENT_RELS_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\
</Relationships>";

const STYLES_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:styles xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii=\"Calibri\" w:hAnsi=\"Calibri\" w:cs=\"Calibri\"/>\
<w:sz w:val=\"22\"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after=\"160\" w:line=\"259\" w:lineRule=\"auto\"/>\
</w:pPr></w:pPrDefault></w:docDefaults>\
<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/><w:qFormat/></w:style>\
<w:style w:type=\"paragraph\" w:styleId=\"Title\"><w:name w:val=\"Title\"/><w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/>\
<w:qFormat/><w:pPr><w:spacing w:after=\"240\"/></w:pPr><w:rPr><w:b/><w:sz w:val=\"56\"/></w:rPr></w:style>\
<w:style w:type=\"paragraph\" w:styleId=\"Heading1\"><w:name w:val=\"heading 1\"/><w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/>\
<w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before=\"240\" w:after=\"120\"/><w:outlineLvl w:val=\"0\"/></w:pPr>\
<w:rPr><w:b/><w:sz w:val=\"32\"/></w:rPr></w:style>\
<w:style w:type=\"paragraph\" w:styleId=\"Heading2\"><w:name w:val=\"heading 2\"/><w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/>\
<w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before=\"200\" w:after=\"80\"/><w:outlineLvl w:val=\"1\"/></w:pPr>\
<w:rPr><w:b/><w:sz w:val=\"28\"/></w:rPr></w:style>\
<w:style w:type=\"paragraph\" w:styleId=\"Heading3\"><w:name w:val=\"heading 3\"/><w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/>\
<w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before=\"160\" w:after=\"80\"/><w:outlineLvl w:val=\"2\"/></w:pPr>\
<w:rPr><w:b/><w:sz w:val=\"24\"/></w:rPr></w:style>\
</w:styles>";
