use std::ops::Range;

use xi_rope::{Delta, Rope, RopeInfo, delta::Builder};

use crate::editing::{Document, MarkupKind};

/// What the Tab key inserts
pub const TAB: &str = "  ";

/// Edit commands. Every text mutation of a [`Document`] is one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Insert `text` at byte offset `at`, caret after it
    InsertText { at: usize, text: String },
    /// Delete a byte range, caret at its start
    DeleteRange { range: Range<usize> },
    /// Replace the current selection with typed text
    ReplaceSelection { text: String },
    /// Replace the whole document, caret at the end
    ReplaceAll { text: String },
    /// Replace the selection with two spaces
    InsertTab,
    /// Toolbar insertion; `placeholder` overrides the kind's default
    InsertMarkup {
        kind: MarkupKind,
        placeholder: Option<String>,
    },
    /// Delete the selection, or the character before the caret
    Backspace,
    /// Delete the selection, or the character after the caret
    DeleteForward,
}

/// Result of a pure text edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub caret: usize,
}

/// A single splice plus the selection that follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Replacement {
    pub range: Range<usize>,
    pub insert: String,
    pub selection: Range<usize>,
}

impl Replacement {
    fn caret_after(range: Range<usize>, insert: String, caret: usize) -> Self {
        Self {
            range,
            insert,
            selection: caret..caret,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.range.is_empty() && self.insert.is_empty()
    }

    fn apply_to(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + self.insert.len());
        out.push_str(&text[..self.range.start]);
        out.push_str(&self.insert);
        out.push_str(&text[self.range.end..]);
        out
    }
}

/// Largest char boundary of `text` at or before `offset`
pub(crate) fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Boundary of the character before `offset`
pub(crate) fn prev_boundary(text: &str, offset: usize) -> usize {
    let offset = floor_boundary(text, offset);
    text[..offset]
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i)
}

/// Boundary of the character after `offset`
pub(crate) fn next_boundary(text: &str, offset: usize) -> usize {
    let offset = floor_boundary(text, offset);
    text[offset..]
        .chars()
        .next()
        .map_or(offset, |c| offset + c.len_utf8())
}

/// Clamp a caller-supplied selection into bounds, in order, on char boundaries
pub(crate) fn clamp_selection(text: &str, selection: Range<usize>) -> Range<usize> {
    let a = floor_boundary(text, selection.start);
    let b = floor_boundary(text, selection.end);
    a.min(b)..a.max(b)
}

/// Plan the splice for `cmd` against `text` with the current `selection`
pub(crate) fn plan(text: &str, selection: Range<usize>, cmd: &Cmd) -> Replacement {
    let selection = clamp_selection(text, selection);

    match cmd {
        Cmd::InsertText { at, text: inserted } => {
            let at = floor_boundary(text, *at);
            Replacement::caret_after(at..at, inserted.clone(), at + inserted.len())
        }
        Cmd::DeleteRange { range } => {
            let range = clamp_selection(text, range.clone());
            let start = range.start;
            Replacement::caret_after(range, String::new(), start)
        }
        Cmd::ReplaceSelection { text: inserted } => {
            let caret = selection.start + inserted.len();
            Replacement::caret_after(selection, inserted.clone(), caret)
        }
        Cmd::ReplaceAll { text: inserted } => {
            Replacement::caret_after(0..text.len(), inserted.clone(), inserted.len())
        }
        Cmd::InsertTab => {
            let caret = selection.start + TAB.len();
            Replacement::caret_after(selection, TAB.to_string(), caret)
        }
        Cmd::InsertMarkup { kind, placeholder } => {
            let selected = &text[selection.clone()];
            let placeholder = placeholder
                .as_deref()
                .unwrap_or_else(|| kind.default_placeholder());
            markup_replacement(*kind, selection, selected, placeholder)
        }
        Cmd::Backspace => {
            if !selection.is_empty() {
                let start = selection.start;
                Replacement::caret_after(selection, String::new(), start)
            } else {
                let start = prev_boundary(text, selection.start);
                Replacement::caret_after(start..selection.start, String::new(), start)
            }
        }
        Cmd::DeleteForward => {
            let start = selection.start;
            let end = if selection.is_empty() {
                next_boundary(text, start)
            } else {
                selection.end
            };
            Replacement::caret_after(start..end, String::new(), start)
        }
    }
}

fn markup_replacement(
    kind: MarkupKind,
    selection: Range<usize>,
    selected_text: &str,
    placeholder: &str,
) -> Replacement {
    let had_selection = !selected_text.is_empty();
    let content = if had_selection {
        selected_text
    } else {
        placeholder
    };
    let inserted = kind.wrap(content);
    let caret = selection.start + kind.caret_offset(inserted.len(), had_selection);
    Replacement::caret_after(selection, inserted, caret)
}

/// Replace `selection` of `text` with two spaces.
///
/// The caret lands right after the spaces, at `selection.start + 2`.
pub fn insert_tab(text: &str, selection: Range<usize>) -> Edit {
    let replacement = plan(text, selection, &Cmd::InsertTab);
    Edit {
        text: replacement.apply_to(text),
        caret: replacement.selection.start,
    }
}

/// Replace `selection` of `text` with `kind`'s markup.
///
/// `selected_text` is wrapped when non-empty, otherwise `placeholder` is. For
/// wrapping kinds the caret lands after the opening token when nothing was
/// selected and after the whole run when something was; for line prefixes it
/// always lands at the end of the inserted text.
pub fn insert_markup(
    text: &str,
    kind: MarkupKind,
    selection: Range<usize>,
    selected_text: &str,
    placeholder: &str,
) -> Edit {
    let selection = clamp_selection(text, selection);
    let replacement = markup_replacement(kind, selection, selected_text, placeholder);
    Edit {
        text: replacement.apply_to(text),
        caret: replacement.selection.start,
    }
}

/// Compile a replacement into a rope delta over `doc`'s buffer
pub(crate) fn compile_replacement(doc: &Document, replacement: &Replacement) -> Delta<RopeInfo> {
    let mut builder = Builder::new(doc.len());
    builder.replace(
        replacement.range.clone(),
        Rope::from(replacement.insert.as_str()),
    );
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // ============ insert_tab ============

    #[rstest]
    #[case("", 0..0)]
    #[case("hello", 0..0)]
    #[case("hello", 5..5)]
    #[case("hello", 2..2)]
    #[case("a\nb", 2..2)]
    fn test_insert_tab_at_caret_grows_by_two(#[case] text: &str, #[case] caret: Range<usize>) {
        let edit = insert_tab(text, caret.clone());

        assert_eq!(edit.text.len(), text.len() + 2);
        assert_eq!(edit.caret, caret.start + 2);
        assert_eq!(&edit.text[caret.start..caret.start + 2], "  ");
    }

    #[test]
    fn test_insert_tab_replaces_selection() {
        let edit = insert_tab("hello world", 5..11);

        assert_eq!(edit.text, "hello  ");
        assert_eq!(edit.caret, 7);
    }

    #[test]
    fn test_insert_tab_clamps_out_of_bounds_selection() {
        let edit = insert_tab("abc", 10..20);

        assert_eq!(edit.text, "abc  ");
        assert_eq!(edit.caret, 5);
    }

    #[test]
    fn test_insert_tab_normalizes_reversed_selection() {
        let edit = insert_tab("abcdef", 4..1);

        assert_eq!(edit.text, "a  ef");
        assert_eq!(edit.caret, 3);
    }

    #[test]
    fn test_insert_tab_snaps_to_char_boundary() {
        // 'é' is two bytes starting at offset 1
        let edit = insert_tab("héllo", 2..2);

        assert_eq!(edit.text, "h  éllo");
        assert_eq!(edit.caret, 3);
    }

    // ============ insert_markup ============

    #[test]
    fn test_bold_wraps_selected_text_caret_after_run() {
        let edit = insert_markup("hi", MarkupKind::Bold, 0..2, "hi", "Bold text");

        assert_eq!(edit.text, "**hi**");
        assert_eq!(edit.caret, 6);
    }

    #[test]
    fn test_bold_placeholder_caret_after_opening_token() {
        let edit = insert_markup("", MarkupKind::Bold, 0..0, "", "Bold text");

        assert_eq!(edit.text, "**Bold text**");
        assert_eq!(edit.caret, 2);
    }

    #[rstest]
    #[case(MarkupKind::Heading1, "# Heading 1", 11)]
    #[case(MarkupKind::Heading2, "## Heading 2", 12)]
    #[case(MarkupKind::Heading3, "### Heading 3", 13)]
    #[case(MarkupKind::Bold, "**Bold text**", 2)]
    #[case(MarkupKind::Italic, "*Italic text*", 1)]
    #[case(MarkupKind::Underline, "<u>Underlined text</u>", 3)]
    #[case(MarkupKind::Strikethrough, "~~Strikethrough text~~", 2)]
    #[case(MarkupKind::BulletItem, "- List item", 11)]
    #[case(MarkupKind::NumberedItem, "1. List item", 12)]
    #[case(MarkupKind::Blockquote, "> Quote", 7)]
    #[case(MarkupKind::Link, "[Link text](url)", 1)]
    #[case(MarkupKind::Image, "![Image alt text](image_url)", 2)]
    #[case(MarkupKind::InlineCode, "`code`", 1)]
    #[case(MarkupKind::CodeBlock, "```\ncode block\n```", 4)]
    #[case(MarkupKind::HorizontalRule, "---", 3)]
    fn test_markup_with_placeholder(
        #[case] kind: MarkupKind,
        #[case] expected: &str,
        #[case] caret: usize,
    ) {
        let edit = insert_markup("", kind, 0..0, "", kind.default_placeholder());

        assert_eq!(edit.text, expected);
        assert_eq!(edit.caret, caret);
    }

    #[rstest]
    #[case(MarkupKind::Heading1, "# word")]
    #[case(MarkupKind::Italic, "*word*")]
    #[case(MarkupKind::Underline, "<u>word</u>")]
    #[case(MarkupKind::Link, "[word](url)")]
    #[case(MarkupKind::Image, "![word](image_url)")]
    #[case(MarkupKind::InlineCode, "`word`")]
    #[case(MarkupKind::CodeBlock, "```\nword\n```")]
    #[case(MarkupKind::BulletItem, "- word")]
    #[case(MarkupKind::Blockquote, "> word")]
    fn test_markup_with_selection_caret_at_end_of_run(
        #[case] kind: MarkupKind,
        #[case] inserted: &str,
    ) {
        let text = "say word now";
        let edit = insert_markup(text, kind, 4..8, "word", "unused");

        assert_eq!(edit.text, format!("say {inserted} now"));
        assert_eq!(edit.caret, 4 + inserted.len());
    }

    #[test]
    fn test_horizontal_rule_drops_selection() {
        let edit = insert_markup("a\nxyz\nb", MarkupKind::HorizontalRule, 2..5, "xyz", "");

        assert_snapshot!(edit.text, @r"
        a
        ---
        b
        ");
        assert_eq!(edit.caret, 5);
    }

    #[test]
    fn test_markup_in_middle_of_document() {
        let edit = insert_markup("Hello world", MarkupKind::Bold, 6..6, "", "Bold text");

        assert_eq!(edit.text, "Hello **Bold text**world");
        assert_eq!(edit.caret, 8);
    }

    #[test]
    fn test_markup_clamps_out_of_bounds_selection() {
        let edit = insert_markup("ab", MarkupKind::Italic, 7..9, "", "x");

        assert_eq!(edit.text, "ab*x*");
        assert_eq!(edit.caret, 3);
    }

    // ============ plan ============

    #[test]
    fn test_plan_backspace_at_start_is_noop() {
        let replacement = plan("abc", 0..0, &Cmd::Backspace);
        assert!(replacement.is_noop());
        assert_eq!(replacement.selection, 0..0);
    }

    #[test]
    fn test_plan_backspace_removes_whole_char() {
        let replacement = plan("a🦀", 5..5, &Cmd::Backspace);
        assert_eq!(replacement.range, 1..5);
        assert_eq!(replacement.apply_to("a🦀"), "a");
    }

    #[test]
    fn test_plan_delete_forward_at_end_is_noop() {
        assert!(plan("abc", 3..3, &Cmd::DeleteForward).is_noop());
    }

    #[test]
    fn test_plan_markup_uses_selected_slice() {
        let cmd = Cmd::InsertMarkup {
            kind: MarkupKind::Strikethrough,
            placeholder: None,
        };
        let replacement = plan("keep this", 5..9, &cmd);

        assert_eq!(replacement.apply_to("keep this"), "keep ~~this~~");
        assert_eq!(replacement.selection, 13..13);
    }

    #[test]
    fn test_boundary_helpers() {
        let text = "aé🦀";
        assert_eq!(floor_boundary(text, 2), 1);
        assert_eq!(prev_boundary(text, 3), 1);
        assert_eq!(next_boundary(text, 3), 7);
        assert_eq!(next_boundary(text, 7), 7);
        assert_eq!(prev_boundary(text, 0), 0);
    }
}
