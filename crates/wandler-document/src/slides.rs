// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word → slide segmentation.
//
// Paragraphs are walked in order; every heading starts a new slide and the
// body paragraphs that follow become its bullet points. The heading test is
// a linear heuristic over the paragraph style and the shape of its text.

use tracing::debug;

use crate::text::{is_title, is_upper, truncate_chars};

/// Longest title written to a slide.
pub const MAX_TITLE_CHARS: usize = 100;
/// Most bullet points written to a slide.
pub const MAX_BULLETS: usize = 10;
/// Longest bullet point written to a slide.
pub const MAX_BULLET_CHARS: usize = 200;

/// Paragraphs shorter than this (in chars) may be headings by case alone.
const SHORT_PARAGRAPH_CHARS: usize = 100;

/// One slide produced by segmentation, before rendering limits are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideContent {
    pub title: String,
    pub bullets: Vec<String>,
}

impl SlideContent {
    /// Apply the rendering limits: title length, bullet count and bullet
    /// length. Blank bullets are dropped.
    pub fn clamped(&self) -> SlideContent {
        SlideContent {
            title: truncate_chars(&self.title, MAX_TITLE_CHARS).to_string(),
            bullets: self
                .bullets
                .iter()
                .take(MAX_BULLETS)
                .filter(|bullet| !bullet.trim().is_empty())
                .map(|bullet| truncate_chars(bullet, MAX_BULLET_CHARS).to_string())
                .collect(),
        }
    }
}

/// Whether a paragraph should open a new slide.
pub fn is_heading(text: &str, style_name: Option<&str>) -> bool {
    if let Some(style) = style_name
        && (style.starts_with("Heading") || style == "Title")
    {
        return true;
    }
    text.chars().count() < SHORT_PARAGRAPH_CHARS && (is_upper(text) || is_title(text))
}

/// Group `(text, style name)` paragraphs into slides.
///
/// `document_stem` titles the summary slide produced when no slide could
/// be formed otherwise.
pub fn segment<'a, I>(paragraphs: I, document_stem: &str) -> Vec<SlideContent>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut slides = Vec::new();
    let mut current_title: Option<String> = None;
    let mut content: Vec<String> = Vec::new();
    let mut all_text: Vec<String> = Vec::new();

    for (raw_text, style) in paragraphs {
        let text = raw_text.trim();
        if text.is_empty() {
            continue;
        }
        all_text.push(raw_text.to_string());

        if is_heading(text, style) {
            if !content.is_empty()
                && let Some(title) = current_title.take()
            {
                slides.push(SlideContent {
                    title,
                    bullets: std::mem::take(&mut content),
                });
            }
            current_title = Some(text.to_string());
        } else {
            content.push(text.to_string());
        }
    }

    if current_title.is_some() || !content.is_empty() {
        let bullets = if content.is_empty() {
            vec!["Document content".to_string()]
        } else {
            content
        };
        slides.push(SlideContent {
            title: current_title.unwrap_or_else(|| "Content".to_string()),
            bullets,
        });
    }

    if slides.is_empty() {
        slides.push(SlideContent {
            title: document_stem.to_string(),
            bullets: all_text.into_iter().take(MAX_BULLETS).collect(),
        });
    }

    debug!(slides = slides.len(), "Segmentation complete");
    slides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(text: &str) -> (&str, Option<&str>) {
        (text, Some("Normal"))
    }

    #[test]
    fn headings_split_slides() {
        let paragraphs = vec![
            ("Overview", Some("Heading 1")),
            body("the project started in march."),
            body("it is going well."),
            ("Next steps", Some("Heading 2")),
            body("ship the beta."),
        ];
        let slides = segment(paragraphs, "plan");
        assert_eq!(
            slides,
            vec![
                SlideContent {
                    title: "Overview".into(),
                    bullets: vec![
                        "the project started in march.".into(),
                        "it is going well.".into()
                    ],
                },
                SlideContent {
                    title: "Next steps".into(),
                    bullets: vec!["ship the beta.".into()],
                },
            ]
        );
    }

    #[test]
    fn short_title_case_and_upper_case_text_count_as_headings() {
        assert!(is_heading("Budget Review", Some("Normal")));
        assert!(is_heading("AGENDA", None));
        assert!(!is_heading("we reviewed the budget", Some("Normal")));

        let long_title_case = "Word ".repeat(25);
        assert!(!is_heading(long_title_case.trim(), Some("Normal")));
    }

    #[test]
    fn consecutive_headings_keep_the_last_title() {
        let paragraphs = vec![
            ("First", Some("Title")),
            ("Second", Some("Heading 1")),
            body("only body line."),
        ];
        let slides = segment(paragraphs, "doc");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Second");
    }

    #[test]
    fn content_before_any_heading_is_held_for_the_first_title() {
        let paragraphs = vec![
            body("preamble text."),
            ("Intro", Some("Heading 1")),
            body("intro text."),
        ];
        let slides = segment(paragraphs, "doc");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Intro");
        assert_eq!(slides[0].bullets, vec!["preamble text.", "intro text."]);
    }

    #[test]
    fn body_only_document_gets_default_title() {
        let slides = segment(vec![body("just some text."), body("more of it.")], "notes");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Content");
        assert_eq!(slides[0].bullets.len(), 2);
    }

    #[test]
    fn heading_only_document_gets_default_content() {
        let slides = segment(vec![("Lonely", Some("Heading 1"))], "notes");
        assert_eq!(slides[0].bullets, vec!["Document content"]);
    }

    #[test]
    fn empty_document_gets_summary_slide() {
        let slides = segment(vec![body("   "), body("")], "minutes");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "minutes");
        assert!(slides[0].bullets.is_empty());
    }

    #[test]
    fn clamping_applies_rendering_limits() {
        let slide = SlideContent {
            title: "T".repeat(150),
            bullets: (0..15).map(|i| format!("{i}{}", "x".repeat(300))).collect(),
        };
        let clamped = slide.clamped();
        assert_eq!(clamped.title.chars().count(), MAX_TITLE_CHARS);
        assert_eq!(clamped.bullets.len(), MAX_BULLETS);
        assert!(clamped.bullets.iter().all(|b| b.chars().count() == MAX_BULLET_CHARS));
    }
}
