//! Slide segmentation.
//!
//! A document is cut into slides on lines that consist of `---` alone
//! (surrounding whitespace ignored). Delimiter lines belong to no slide, and
//! every run between delimiters is trimmed. Segmenting always happens on raw
//! markdown before rendering; [`split_rendered`] exists only for callers that
//! hold nothing but rendered HTML.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::render::render;

/// The raw-markdown slide delimiter
pub const SLIDE_DELIMITER: &str = "---";

static RENDERED_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<hr\s*/?>").expect("horizontal rule pattern is valid")
});

/// One slide's raw markdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    /// 0-based position in document order
    pub index: usize,
    /// Trimmed markdown text of the slide
    pub text: String,
    /// Byte range of `text` within the source document
    pub range: Range<usize>,
}

impl Slide {
    /// Text of the first ATX heading in the slide, if any
    pub fn title(&self) -> Option<&str> {
        self.text.lines().find_map(|line| {
            let line = line.trim_start();
            let hashes = line.chars().take_while(|&c| c == '#').count();
            if !(1..=6).contains(&hashes) {
                return None;
            }
            let rest = &line[hashes..];
            if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
                return None;
            }
            let title = strip_closing_hashes(rest.trim());
            (!title.is_empty()).then_some(title)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Drop an ATX closing sequence: a `#` run that is the whole content or
/// follows a space or tab. `C#` keeps its hash.
fn strip_closing_hashes(content: &str) -> &str {
    let without = content.trim_end_matches('#');
    if without.is_empty() {
        ""
    } else if without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        content
    }
}

/// Sanitized HTML for exactly one [`Slide`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSlide {
    pub index: usize,
    /// First heading of the source slide
    pub title: Option<String>,
    pub html: String,
}

/// Is this line a slide boundary?
fn is_delimiter(line: &str) -> bool {
    line.trim() == SLIDE_DELIMITER
}

/// Trim `range` of `document` down to its non-whitespace core
fn trimmed(document: &str, range: Range<usize>) -> Range<usize> {
    let run = &document[range.clone()];
    let leading = run.len() - run.trim_start().len();
    let core = run.trim();
    let start = range.start + leading;
    start..start + core.len()
}

/// Byte ranges of the raw runs between delimiter lines (untrimmed)
fn runs(document: &str) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut run_start = 0;
    let mut line_start = 0;

    for line in document.split_inclusive('\n') {
        let line_end = line_start + line.len();
        if is_delimiter(line) {
            runs.push(run_start..line_start);
            run_start = line_end;
        }
        line_start = line_end;
    }
    runs.push(run_start..document.len());

    runs
}

/// Split a raw markdown document into slides.
///
/// Never returns an empty list: a blank document yields one empty slide, and
/// two adjacent delimiters yield an empty slide between them.
pub fn segment(document: &str) -> Vec<Slide> {
    runs(document)
        .into_iter()
        .enumerate()
        .map(|(index, run)| {
            let range = trimmed(document, run);
            Slide {
                index,
                text: document[range.clone()].to_string(),
                range,
            }
        })
        .collect()
}

/// The whole document as one slide, for when splitting is switched off
pub fn single_slide(document: &str) -> Vec<Slide> {
    let range = trimmed(document, 0..document.len());
    vec![Slide {
        index: 0,
        text: document[range.clone()].to_string(),
        range,
    }]
}

/// Render already segmented slides, preserving order
pub fn render_each(slides: &[Slide]) -> Vec<RenderedSlide> {
    slides
        .iter()
        .map(|slide| RenderedSlide {
            index: slide.index,
            title: slide.title().map(str::to_string),
            html: render(&slide.text),
        })
        .collect()
}

/// Segment raw markdown, then render every segment
pub fn render_slides(document: &str) -> Vec<RenderedSlide> {
    render_each(&segment(document))
}

/// Split already rendered HTML on its `<hr>` markers.
///
/// Fragile against sanitizer output changes; prefer [`render_slides`].
pub fn split_rendered(html: &str) -> Vec<String> {
    RENDERED_RULE
        .split(html)
        .map(|part| part.trim().to_string())
        .collect()
}

/// Index of the slide containing byte `offset` of `document`.
///
/// A caret sitting on a delimiter line counts towards the following slide.
pub fn slide_at(document: &str, offset: usize) -> usize {
    let offset = offset.min(document.len());
    let mut index = 0;
    let mut line_start = 0;

    for line in document.split_inclusive('\n') {
        if line_start > offset {
            break;
        }
        if is_delimiter(line) {
            index += 1;
        }
        line_start += line.len();
    }

    index
}
