//! Rendering boundary.
//!
//! Pipeline results become immutable [`Rendered`] blocks. The TUI, the plain
//! text printer, and the HTML/JSON outputs all read from the same value.

use askama::Html as HtmlEscaper;
use askama::MarkupDisplay;
use serde::Serialize;

use crate::quran::{ChapterResult, MatchResult};

pub const SEARCH_HEADER: &str = "Search Results:";
pub const NO_MATCHES: &str = "No matches found.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedLine {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub header: Option<String>,
    pub lines: Vec<RenderedLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

pub fn render_chapter(chapter: &ChapterResult) -> Rendered {
    Rendered {
        header: Some(chapter.name.clone()),
        lines: chapter
            .verses
            .iter()
            .map(|v| RenderedLine {
                label: v.index.to_string(),
                text: v.text.clone(),
            })
            .collect(),
        notice: None,
    }
}

pub fn render_matches(result: &MatchResult) -> Rendered {
    if result.is_empty() {
        return Rendered {
            header: None,
            lines: Vec::new(),
            notice: Some(NO_MATCHES.to_string()),
        };
    }

    Rendered {
        header: Some(SEARCH_HEADER.to_string()),
        lines: result
            .matches
            .iter()
            .map(|m| RenderedLine {
                label: format!("Surah {}, Ayah {}", m.chapter_number, m.verse_index),
                text: m.text.clone(),
            })
            .collect(),
        notice: None,
    }
}

impl Rendered {
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        if let Some(header) = &self.header {
            out.push_str(header);
            out.push('\n');
        }
        for line in &self.lines {
            out.push_str(&format!("{}: {}\n", line.label, line.text));
        }
        if let Some(notice) = &self.notice {
            out.push_str(notice);
            out.push('\n');
        }
        out
    }

    /// Heading/paragraph markup. API text is escaped, so it cannot inject tags.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        if let Some(header) = &self.header {
            html.push_str(&format!("<h2>{}</h2>", escape_html(header)));
        }
        for line in &self.lines {
            html.push_str(&format!(
                "<p><strong>{}:</strong> {}</p>",
                escape_html(&line.label),
                escape_html(&line.text)
            ));
        }
        if let Some(notice) = &self.notice {
            html.push_str(&format!("<p>{}</p>", escape_html(notice)));
        }
        html
    }
}

/// API text is untrusted, so everything goes through askama's HTML escaper.
fn escape_html(text: &str) -> MarkupDisplay<HtmlEscaper, &str> {
    MarkupDisplay::new_unsafe(text, HtmlEscaper)
}
