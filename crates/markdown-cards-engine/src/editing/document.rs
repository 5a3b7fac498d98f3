use std::ops::Range;

use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::commands::{self, Replacement};
use crate::editing::{Cmd, Patch};

/// Caret motions that don't touch the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

/// The raw markdown being edited, with its selection.
///
/// Text lives in a single `xi_rope::Rope` and only changes through
/// [`Document::apply`], which compiles a [`Cmd`] into a `Delta`. Offsets are
/// UTF-8 byte offsets and always sit on char boundaries.
///
/// After every edit the new caret is also parked as a *pending caret*. A front
/// end redraws its text control first and then calls
/// [`Document::take_pending_caret`] to put the caret back.
///
/// ```rust
/// # use markdown_cards_engine::editing::{Cmd, Document, MarkupKind};
/// let mut doc = Document::from_bytes(b"hi").unwrap();
/// doc.set_selection(0..2);
///
/// let patch = doc.apply(Cmd::InsertMarkup { kind: MarkupKind::Bold, placeholder: None });
///
/// assert_eq!(doc.text(), "**hi**");
/// assert_eq!(patch.new_selection, 6..6);
/// assert_eq!(doc.take_pending_caret(), Some(6));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) buffer: Rope,
    /// Always ordered: `start <= end`
    pub(crate) selection: Range<usize>,
    /// Fixed end of the selection while extending
    pub(crate) anchor: usize,
    /// Incremented on each edit that changes the text
    pub(crate) version: u64,
    pub(crate) pending_caret: Option<usize>,
}

impl Document {
    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();

        Self {
            buffer,
            selection: len..len, // Start with cursor at end
            anchor: len,
            version: 0,
            pending_caret: None,
        }
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Apply an edit command.
    ///
    /// The command is planned against the current text and selection, compiled
    /// to a `Delta` and applied to the rope. A command that changes nothing
    /// (backspace at offset 0, say) leaves the version alone.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let text = self.text();
        let replacement = commands::plan(&text, self.selection.clone(), &cmd);
        log::debug!("apply {cmd:?} -> {replacement:?}");

        let mut changed = Vec::new();
        let text_changed = !replacement.is_noop();
        if text_changed {
            let delta = self.compile_replacement(&replacement);
            changed = changed_ranges(&delta);
            self.buffer = delta.apply(&self.buffer);
            self.version += 1;
        }

        let new_selection = replacement.selection.clone();
        self.selection = new_selection.clone();
        self.anchor = new_selection.start;
        self.pending_caret = Some(new_selection.end);

        Patch {
            changed,
            new_selection,
            version: self.version,
            text_changed,
        }
    }

    /// Get the current selection range
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Set the selection range, clamped and ordered
    pub fn set_selection(&mut self, selection: Range<usize>) {
        let text = self.text();
        let anchor = commands::floor_boundary(&text, selection.start);
        let selection = commands::clamp_selection(&text, selection);
        self.selection = selection;
        self.anchor = anchor;
    }

    /// Place a caret
    pub fn set_caret(&mut self, offset: usize) {
        self.set_selection(offset..offset);
    }

    /// The selected slice of text (empty for a caret)
    pub fn selected_text(&self) -> String {
        self.buffer.slice_to_cow(self.selection.clone()).into_owned()
    }

    /// The moving end of the selection
    pub fn head(&self) -> usize {
        if self.anchor == self.selection.start {
            self.selection.end
        } else {
            self.selection.start
        }
    }

    /// Move the caret, either collapsing the selection or extending it
    pub fn move_caret(&mut self, motion: Motion, extend: bool) {
        let text = self.text();
        let head = self.head();

        if !extend && !self.selection.is_empty() {
            let collapse_to = match motion {
                Motion::Left => Some(self.selection.start),
                Motion::Right => Some(self.selection.end),
                _ => None,
            };
            if let Some(offset) = collapse_to {
                self.selection = offset..offset;
                self.anchor = offset;
                return;
            }
        }

        let target = match motion {
            Motion::Left => commands::prev_boundary(&text, head),
            Motion::Right => commands::next_boundary(&text, head),
            Motion::LineStart => text[..head].rfind('\n').map_or(0, |i| i + 1),
            Motion::LineEnd => text[head..].find('\n').map_or(text.len(), |i| head + i),
            Motion::DocumentStart => 0,
            Motion::DocumentEnd => text.len(),
        };

        if extend {
            self.selection = self.anchor.min(target)..self.anchor.max(target);
        } else {
            self.selection = target..target;
            self.anchor = target;
        }
    }

    /// Caret to restore once the front end has redrawn the edited text
    pub fn take_pending_caret(&mut self) -> Option<usize> {
        self.pending_caret.take()
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Get the buffer length
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (line, column) of a byte offset, both 0-based
    pub fn point_of(&self, offset: usize) -> (usize, usize) {
        byte_to_point_in_text(&self.text(), offset)
    }

    pub(crate) fn compile_replacement(&self, replacement: &Replacement) -> Delta<RopeInfo> {
        commands::compile_replacement(self, replacement)
    }
}

/// Inserted ranges of a delta, in new-document offsets
fn changed_ranges(delta: &Delta<RopeInfo>) -> Vec<Range<usize>> {
    let mut changed = Vec::new();
    let mut cursor = 0;
    for op in delta.els.iter() {
        match op {
            xi_rope::delta::DeltaElement::Copy(from, to) => {
                cursor += to - from;
            }
            xi_rope::delta::DeltaElement::Insert(inserted) => {
                let start = cursor;
                let end = cursor + inserted.len();
                if end > start {
                    changed.push(start..end);
                }
                cursor = end;
            }
        }
    }
    changed
}

/// Convert byte offset to (row, column) position in given text
fn byte_to_point_in_text(text: &str, byte_offset: usize) -> (usize, usize) {
    let text_bytes = text.as_bytes();
    let offset = byte_offset.min(text_bytes.len());

    let mut row = 0;
    let mut last_newline = 0;

    for (i, &byte) in text_bytes.iter().enumerate().take(offset) {
        if byte == b'\n' {
            row += 1;
            last_newline = i + 1;
        }
    }

    let col = offset - last_newline;
    (row, col)
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.buffer.to_string() == other.buffer.to_string()
            && self.selection == other.selection
            && self.version == other.version
    }
}
