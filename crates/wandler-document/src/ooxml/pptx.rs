// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PowerPoint (.pptx) reading and writing.
//
// Reading follows the slide order declared in `ppt/presentation.xml` and
// collects the text paragraphs of every shape. Writing emits one "Title and
// Content" slide per entry on top of a fixed master, layout and theme.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info, instrument, warn};
use wandler_core::error::{Result, WandlerError};

use super::{Package, PackageWriter, attribute, escape, xml_error};
use crate::slides::SlideContent;

/// Text of one shape on a slide, paragraph by paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeText {
    pub paragraphs: Vec<String>,
}

impl ShapeText {
    /// Whole shape text, paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

/// The text content of one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    pub shapes: Vec<ShapeText>,
}

/// Slides of a .pptx file, in presentation order.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Open a .pptx from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut package = Package::open(path.as_ref())?;
        let presentation = Self::from_package(&mut package)?;
        info!(slides = presentation.slides.len(), "Presentation loaded");
        Ok(presentation)
    }

    /// Parse a .pptx already held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut package = Package::from_bytes(data)?;
        Self::from_package(&mut package)
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn from_package(package: &mut Package) -> Result<Self> {
        let mut slide_parts = declared_slide_parts(package)?;
        if slide_parts.is_empty() {
            slide_parts = numbered_slide_parts(&package.part_names());
        }

        let mut slides = Vec::with_capacity(slide_parts.len());
        for part in slide_parts {
            match package.read_part(&part)? {
                Some(xml) => slides.push(parse_slide(&part, &xml)?),
                None => warn!(part, "slide listed in presentation.xml is missing"),
            }
        }

        Ok(Self { slides })
    }
}

/// Slide part names in `sldIdLst` order, resolved through the presentation
/// relationships.
fn declared_slide_parts(package: &mut Package) -> Result<Vec<String>> {
    let (Some(presentation), Some(rels)) = (
        package.read_part("ppt/presentation.xml")?,
        package.read_part("ppt/_rels/presentation.xml.rels")?,
    ) else {
        return Ok(Vec::new());
    };

    let mut targets: HashMap<String, String> = HashMap::new();
    let mut reader = Reader::from_str(&rels);
    loop {
        match reader
            .read_event()
            .map_err(|err| xml_error("ppt/_rels/presentation.xml.rels", err))?
        {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attribute(&e, b"Id")?, attribute(&e, b"Target")?) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut parts = Vec::new();
    let mut reader = Reader::from_str(&presentation);
    loop {
        match reader
            .read_event()
            .map_err(|err| xml_error("ppt/presentation.xml", err))?
        {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"sldId" => {
                if let Some(target) = relationship_id(&e)?.and_then(|rel_id| targets.get(&rel_id)) {
                    parts.push(resolve_target(target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(slides = parts.len(), "Slide order resolved");
    Ok(parts)
}

/// The prefixed `r:id` of a `sldId`. Its unprefixed `id` is the slide id and
/// shares the same local name.
fn relationship_id(element: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|err| WandlerError::OoxmlError(format!("bad attribute: {err}")))?;
        if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id" {
            let value = attr
                .unescape_value()
                .map_err(|err| WandlerError::OoxmlError(format!("bad attribute value: {err}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// `slides/slide1.xml` → `ppt/slides/slide1.xml`; absolute targets keep
/// their path minus the leading slash.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{target}"),
    }
}

/// Fallback ordering: `ppt/slides/slideN.xml` sorted by N.
fn numbered_slide_parts(names: &[String]) -> Vec<String> {
    let mut numbered: Vec<(u32, String)> = names
        .iter()
        .filter_map(|name| {
            let number = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((number, name.clone()))
        })
        .collect();
    numbered.sort();
    numbered.into_iter().map(|(_, name)| name).collect()
}

fn parse_slide(part: &str, xml: &str) -> Result<Slide> {
    let mut reader = Reader::from_str(xml);
    let mut slide = Slide::default();
    let mut shape: Option<ShapeText> = None;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(|err| xml_error(part, err))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sp" => shape = Some(ShapeText::default()),
                b"p" if shape.is_some() => paragraph = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(shape) = shape.as_mut() {
                        shape.paragraphs.push(String::new());
                    }
                }
                b"br" => {
                    if let Some(paragraph) = paragraph.as_mut() {
                        paragraph.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|err| xml_error(part, err))?;
                if let Some(paragraph) = paragraph.as_mut() {
                    paragraph.push_str(&text);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let (Some(shape), Some(text)) = (shape.as_mut(), paragraph.take()) {
                        shape.paragraphs.push(text);
                    }
                }
                b"sp" => {
                    if let Some(done) = shape.take()
                        && !done.paragraphs.is_empty()
                    {
                        slide.shapes.push(done);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(slide)
}

// -- Writing -------------------------------------------------------------------

/// Builds a new .pptx presentation, one title-and-bullets slide at a time.
#[derive(Debug, Clone, Default)]
pub struct PptxBuilder {
    slides: Vec<SlideContent>,
    title: Option<String>,
}

impl PptxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Title recorded in the package metadata.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    /// Append a slide. Rendering limits (title length, bullet count and
    /// length) are applied here.
    pub fn add_slide(&mut self, slide: &SlideContent) -> &mut Self {
        self.slides.push(slide.clamped());
        self
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Serialise the package.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = PackageWriter::new();
        writer.add_part("[Content_Types].xml", &self.content_types_xml())?;
        writer.add_part("_rels/.rels", include_str!("../../assets/pptx/rels.xml"))?;
        writer.add_part("docProps/core.xml", &self.core_xml())?;
        writer.add_part("ppt/presentation.xml", &self.presentation_xml())?;
        writer.add_part("ppt/_rels/presentation.xml.rels", &self.presentation_rels_xml())?;
        writer.add_part("ppt/presProps.xml", include_str!("../../assets/pptx/presProps.xml"))?;
        writer.add_part("ppt/viewProps.xml", include_str!("../../assets/pptx/viewProps.xml"))?;
        writer.add_part(
            "ppt/tableStyles.xml",
            include_str!("../../assets/pptx/tableStyles.xml"),
        )?;
        writer.add_part("ppt/theme/theme1.xml", include_str!("../../assets/pptx/theme1.xml"))?;
        writer.add_part(
            "ppt/slideMasters/slideMaster1.xml",
            include_str!("../../assets/pptx/slideMaster1.xml"),
        )?;
        writer.add_part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            include_str!("../../assets/pptx/slideMaster1.xml.rels"),
        )?;
        writer.add_part(
            "ppt/slideLayouts/slideLayout1.xml",
            include_str!("../../assets/pptx/slideLayout1.xml"),
        )?;
        writer.add_part(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            include_str!("../../assets/pptx/slideLayout1.xml.rels"),
        )?;

        for (index, slide) in self.slides.iter().enumerate() {
            let number = index + 1;
            writer.add_part(&format!("ppt/slides/slide{number}.xml"), &slide_xml(slide))?;
            writer.add_part(
                &format!("ppt/slides/_rels/slide{number}.xml.rels"),
                include_str!("../../assets/pptx/slide.xml.rels"),
            )?;
        }

        writer.finish()
    }

    /// Serialise and write to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(
            slides = self.slides.len(),
            bytes = bytes.len(),
            "Wrote presentation to {}",
            path.as_ref().display()
        );
        Ok(())
    }

    fn content_types_xml(&self) -> String {
        let mut overrides = String::new();
        for number in 1..=self.slides.len() {
            overrides.push_str(&format!(
                "<Override PartName=\"/ppt/slides/slide{number}.xml\" \
                 ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>"
            ));
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
             <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
             <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
             <Override PartName=\"/ppt/presentation.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>\
             <Override PartName=\"/ppt/presProps.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presProps+xml\"/>\
             <Override PartName=\"/ppt/viewProps.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml\"/>\
             <Override PartName=\"/ppt/tableStyles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml\"/>\
             <Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>\
             <Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>\
             <Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>\
             <Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\
             {overrides}</Types>"
        )
    }

    fn core_xml(&self) -> String {
        let title = self
            .title
            .as_deref()
            .map(|title| format!("<dc:title>{}</dc:title>", escape(title)))
            .unwrap_or_default();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
             xmlns:dc=\"http://purl.org/dc/elements/1.1/\">{title}</cp:coreProperties>"
        )
    }

    fn presentation_xml(&self) -> String {
        // Slide relationship ids follow the fixed rId1..rId5 entries.
        let slide_ids: String = (0..self.slides.len())
            .map(|index| format!("<p:sldId id=\"{}\" r:id=\"rId{}\"/>", 256 + index, 6 + index))
            .collect();
        let slide_list = if slide_ids.is_empty() {
            String::new()
        } else {
            format!("<p:sldIdLst>{slide_ids}</p:sldIdLst>")
        };

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <p:presentation xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
             xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" saveSubsetFonts=\"1\">\
             <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
             {slide_list}<p:sldSz cx=\"9144000\" cy=\"6858000\" type=\"screen4x3\"/>\
             <p:notesSz cx=\"6858000\" cy=\"9144000\"/></p:presentation>"
        )
    }

    fn presentation_rels_xml(&self) -> String {
        const REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
        let mut rels = format!(
            "<Relationship Id=\"rId1\" Type=\"{REL}/slideMaster\" Target=\"slideMasters/slideMaster1.xml\"/>\
             <Relationship Id=\"rId2\" Type=\"{REL}/presProps\" Target=\"presProps.xml\"/>\
             <Relationship Id=\"rId3\" Type=\"{REL}/viewProps\" Target=\"viewProps.xml\"/>\
             <Relationship Id=\"rId4\" Type=\"{REL}/theme\" Target=\"theme/theme1.xml\"/>\
             <Relationship Id=\"rId5\" Type=\"{REL}/tableStyles\" Target=\"tableStyles.xml\"/>"
        );
        for index in 0..self.slides.len() {
            rels.push_str(&format!(
                "<Relationship Id=\"rId{}\" Type=\"{REL}/slide\" Target=\"slides/slide{}.xml\"/>",
                6 + index,
                index + 1
            ));
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">{rels}</Relationships>"
        )
    }
}

fn slide_xml(slide: &SlideContent) -> String {
    let bullets: String = if slide.bullets.is_empty() {
        "<a:p><a:endParaRPr lang=\"en-US\"/></a:p>".to_string()
    } else {
        slide
            .bullets
            .iter()
            .map(|bullet| {
                format!(
                    "<a:p><a:r><a:rPr lang=\"en-US\" dirty=\"0\"/><a:t>{}</a:t></a:r></a:p>",
                    escape(bullet)
                )
            })
            .collect()
    };

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <p:sld xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
         <p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
         <p:sp><p:nvSpPr><p:cNvPr id=\"2\" name=\"Title 1\"/><p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr>\
         <p:nvPr><p:ph type=\"title\"/></p:nvPr></p:nvSpPr><p:spPr/>\
         <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang=\"en-US\" dirty=\"0\"/><a:t>{title}</a:t></a:r></a:p></p:txBody></p:sp>\
         <p:sp><p:nvSpPr><p:cNvPr id=\"3\" name=\"Content Placeholder 2\"/><p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr>\
         <p:nvPr><p:ph idx=\"1\"/></p:nvPr></p:nvSpPr><p:spPr/>\
         <p:txBody><a:bodyPr><a:normAutofit/></a:bodyPr><a:lstStyle/>{bullets}</p:txBody></p:sp>\
         </p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
        title = escape(&slide.title),
    )
}
