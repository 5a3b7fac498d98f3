//! Sanitized slide HTML as styled terminal lines.
//!
//! Only handles the tag set the renderer can emit after sanitizing: blocks
//! become lines, inline tags become span modifiers, everything else is
//! dropped and its text kept.

use std::sync::LazyLock;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)([^>]*)>").expect("tag pattern is valid")
});

static ALT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"alt="([^"]*)""#).expect("alt pattern is valid"));

const RULE: &str = "────────────";

#[derive(Default)]
struct Writer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    has_text: bool,
    bold: usize,
    italic: usize,
    code: usize,
    strike: usize,
    underline: usize,
    heading: bool,
    pre: bool,
    quote: usize,
    /// `None` for bullets, `Some(next number)` for ordered lists
    lists: Vec<Option<u64>>,
}

impl Writer {
    fn style(&self) -> Style {
        let mut modifier = Modifier::empty();
        if self.bold > 0 || self.heading {
            modifier |= Modifier::BOLD;
        }
        if self.italic > 0 {
            modifier |= Modifier::ITALIC;
        }
        if self.strike > 0 {
            modifier |= Modifier::CROSSED_OUT;
        }
        if self.underline > 0 || self.heading {
            modifier |= Modifier::UNDERLINED;
        }
        if self.code > 0 && !self.pre {
            modifier |= Modifier::REVERSED;
        }
        Style::default().add_modifier(modifier)
    }

    fn start_line(&mut self) {
        if self.current.is_empty() && self.quote > 0 {
            self.current.push(Span::styled(
                "│ ".repeat(self.quote),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
        self.has_text = false;
    }

    /// End the block and leave one blank line after it
    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|line| line.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn text(&mut self, raw: &str) {
        let decoded = html_escape::decode_html_entities(raw);
        if self.pre {
            let mut parts = decoded.split('\n').peekable();
            while let Some(part) = parts.next() {
                if !part.is_empty() {
                    self.push(part.to_string());
                }
                if parts.peek().is_some() {
                    self.start_line();
                    self.flush();
                }
            }
            return;
        }

        let collapsed = collapse_whitespace(&decoded);
        let text = if self.has_text {
            collapsed.as_str()
        } else {
            collapsed.trim_start()
        };
        if !text.is_empty() {
            self.push(text.to_string());
        }
    }

    fn push(&mut self, text: String) {
        self.start_line();
        let style = self.style();
        self.current.push(Span::styled(text, style));
        self.has_text = true;
    }

    fn list_item(&mut self) {
        self.flush();
        let depth = self.lists.len().max(1);
        let marker = match self.lists.last_mut() {
            Some(Some(n)) => {
                let marker = format!("{n}. ");
                *n += 1;
                marker
            }
            _ => "• ".to_string(),
        };
        self.start_line();
        self.current
            .push(Span::raw(format!("{}{marker}", "  ".repeat(depth - 1))));
    }

    fn tag(&mut self, closing: bool, name: &str, attrs: &str) {
        match (closing, name) {
            (false, "p" | "div") => {
                if self.has_text {
                    self.flush();
                }
            }
            (true, "p" | "div") => {
                if self.lists.is_empty() {
                    self.blank();
                } else {
                    self.flush();
                }
            }
            (false, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                self.flush();
                self.heading = true;
            }
            (true, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                self.heading = false;
                self.blank();
            }
            (false, "ul") => {
                self.flush();
                self.lists.push(None);
            }
            (false, "ol") => {
                self.flush();
                self.lists.push(Some(1));
            }
            (true, "ul" | "ol") => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                } else {
                    self.flush();
                }
            }
            (false, "li") => self.list_item(),
            (true, "li") => self.flush(),
            (false, "blockquote") => {
                self.flush();
                self.quote += 1;
            }
            (true, "blockquote") => {
                self.flush();
                self.quote = self.quote.saturating_sub(1);
                if self.quote == 0 {
                    self.blank();
                }
            }
            (false, "pre") => {
                self.flush();
                self.pre = true;
            }
            (true, "pre") => {
                self.pre = false;
                self.blank();
            }
            (false, "br") => {
                self.start_line();
                self.flush();
            }
            (false, "hr") => {
                self.flush();
                self.lines.push(Line::from(RULE));
            }
            (false, "td" | "th") if self.has_text => self.push(" | ".to_string()),
            (true, "tr") => self.flush(),
            (false, "img") => {
                let alt = ALT
                    .captures(attrs)
                    .and_then(|c| c.get(1))
                    .map_or("", |m| m.as_str());
                let alt = html_escape::decode_html_entities(alt).into_owned();
                self.push(format!("[{alt}]"));
            }
            (false, "strong" | "b") => self.bold += 1,
            (true, "strong" | "b") => self.bold = self.bold.saturating_sub(1),
            (false, "em" | "i") => self.italic += 1,
            (true, "em" | "i") => self.italic = self.italic.saturating_sub(1),
            (false, "code") => self.code += 1,
            (true, "code") => self.code = self.code.saturating_sub(1),
            (false, "del" | "s") => self.strike += 1,
            (true, "del" | "s") => self.strike = self.strike.saturating_sub(1),
            (false, "u" | "a") => self.underline += 1,
            (true, "u" | "a") => self.underline = self.underline.saturating_sub(1),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            space = true;
        } else {
            if space {
                out.push(' ');
            }
            space = false;
            out.push(c);
        }
    }
    if space {
        out.push(' ');
    }
    out
}

/// Lay out one slide's sanitized HTML for a terminal card
pub fn html_to_lines(html: &str) -> Vec<Line<'static>> {
    let mut writer = Writer::default();
    let mut last = 0;

    for caps in TAG.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        writer.text(&html[last..whole.start()]);
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps
            .get(2)
            .map_or(String::new(), |m| m.as_str().to_ascii_lowercase());
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        writer.tag(closing, &name, attrs);
        last = whole.end();
    }
    writer.text(&html[last..]);

    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_cards_engine::render;
    use pretty_assertions::assert_eq;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_heading_and_paragraph() {
        let lines = html_to_lines(&render("# Title\n\nHello **bold** &amp; more"));

        assert_eq!(plain(&lines), vec!["Title", "", "Hello bold & more"]);
        let bold = &lines[2].spans[1];
        assert_eq!(bold.content, "bold");
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_lists() {
        let lines = html_to_lines(&render("- one\n- two\n\n1. first\n2. second"));

        assert_eq!(
            plain(&lines),
            vec!["• one", "• two", "", "1. first", "2. second"]
        );
    }

    #[test]
    fn test_code_block_keeps_line_breaks() {
        let lines = html_to_lines(&render("```\nfn x() {\n  y\n}\n```"));

        assert_eq!(plain(&lines), vec!["fn x() {", "  y", "}"]);
    }

    #[test]
    fn test_blockquote_prefix() {
        let lines = html_to_lines(&render("> quoted"));

        assert_eq!(plain(&lines), vec!["│ quoted"]);
    }

    #[test]
    fn test_image_shows_alt_text() {
        let lines = html_to_lines(&render("![a &amp; b](pic.png)"));

        assert_eq!(plain(&lines), vec!["[a & b]"]);
    }

    #[test]
    fn test_empty_slide_has_no_lines() {
        assert!(html_to_lines("").is_empty());
    }
}
