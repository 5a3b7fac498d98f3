use serde::{Deserialize, Serialize};

/// Toolbar formatting kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkupKind {
    Heading1,
    Heading2,
    Heading3,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    BulletItem,
    NumberedItem,
    Blockquote,
    Link,
    Image,
    InlineCode,
    CodeBlock,
    HorizontalRule,
}

/// How the caret is placed after inserting a kind's markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretRule {
    /// Inside the placeholder when nothing was selected, after the run otherwise
    Wrap,
    /// Always at the end of the inserted text
    LinePrefix,
}

impl MarkupKind {
    pub const ALL: [MarkupKind; 15] = [
        MarkupKind::Heading1,
        MarkupKind::Heading2,
        MarkupKind::Heading3,
        MarkupKind::Bold,
        MarkupKind::Italic,
        MarkupKind::Underline,
        MarkupKind::Strikethrough,
        MarkupKind::BulletItem,
        MarkupKind::NumberedItem,
        MarkupKind::Blockquote,
        MarkupKind::Link,
        MarkupKind::Image,
        MarkupKind::InlineCode,
        MarkupKind::CodeBlock,
        MarkupKind::HorizontalRule,
    ];

    /// Opening and closing tokens
    pub fn tokens(self) -> (&'static str, &'static str) {
        match self {
            MarkupKind::Heading1 => ("# ", ""),
            MarkupKind::Heading2 => ("## ", ""),
            MarkupKind::Heading3 => ("### ", ""),
            MarkupKind::Bold => ("**", "**"),
            MarkupKind::Italic => ("*", "*"),
            MarkupKind::Underline => ("<u>", "</u>"),
            MarkupKind::Strikethrough => ("~~", "~~"),
            MarkupKind::BulletItem => ("- ", ""),
            MarkupKind::NumberedItem => ("1. ", ""),
            MarkupKind::Blockquote => ("> ", ""),
            MarkupKind::Link => ("[", "](url)"),
            MarkupKind::Image => ("![", "](image_url)"),
            MarkupKind::InlineCode => ("`", "`"),
            MarkupKind::CodeBlock => ("```\n", "\n```"),
            MarkupKind::HorizontalRule => ("---", ""),
        }
    }

    /// Text inserted between the tokens when nothing is selected
    pub fn default_placeholder(self) -> &'static str {
        match self {
            MarkupKind::Heading1 => "Heading 1",
            MarkupKind::Heading2 => "Heading 2",
            MarkupKind::Heading3 => "Heading 3",
            MarkupKind::Bold => "Bold text",
            MarkupKind::Italic => "Italic text",
            MarkupKind::Underline => "Underlined text",
            MarkupKind::Strikethrough => "Strikethrough text",
            MarkupKind::BulletItem | MarkupKind::NumberedItem => "List item",
            MarkupKind::Blockquote => "Quote",
            MarkupKind::Link => "Link text",
            MarkupKind::Image => "Image alt text",
            MarkupKind::InlineCode => "code",
            MarkupKind::CodeBlock => "code block",
            MarkupKind::HorizontalRule => "",
        }
    }

    /// Toolbar tooltip
    pub fn label(self) -> &'static str {
        match self {
            MarkupKind::Heading1 => "Heading 1",
            MarkupKind::Heading2 => "Heading 2",
            MarkupKind::Heading3 => "Heading 3",
            MarkupKind::Bold => "Bold",
            MarkupKind::Italic => "Italic",
            MarkupKind::Underline => "Underline",
            MarkupKind::Strikethrough => "Strikethrough",
            MarkupKind::BulletItem => "Bullet List",
            MarkupKind::NumberedItem => "Numbered List",
            MarkupKind::Blockquote => "Blockquote",
            MarkupKind::Link => "Link",
            MarkupKind::Image => "Image",
            MarkupKind::InlineCode => "Inline Code",
            MarkupKind::CodeBlock => "Code Block",
            MarkupKind::HorizontalRule => "Horizontal Rule (Creates a new slide)",
        }
    }

    /// Whether the kind wraps content at all (a rule has none)
    pub fn takes_content(self) -> bool {
        !matches!(self, MarkupKind::HorizontalRule)
    }

    pub fn caret_rule(self) -> CaretRule {
        match self {
            MarkupKind::Bold
            | MarkupKind::Italic
            | MarkupKind::Underline
            | MarkupKind::Strikethrough
            | MarkupKind::Link
            | MarkupKind::Image
            | MarkupKind::InlineCode
            | MarkupKind::CodeBlock => CaretRule::Wrap,
            MarkupKind::Heading1
            | MarkupKind::Heading2
            | MarkupKind::Heading3
            | MarkupKind::BulletItem
            | MarkupKind::NumberedItem
            | MarkupKind::Blockquote
            | MarkupKind::HorizontalRule => CaretRule::LinePrefix,
        }
    }

    /// Build the inserted string for `content`
    pub fn wrap(self, content: &str) -> String {
        let (prefix, suffix) = self.tokens();
        if !self.takes_content() {
            return prefix.to_string();
        }
        let mut out = String::with_capacity(prefix.len() + content.len() + suffix.len());
        out.push_str(prefix);
        out.push_str(content);
        out.push_str(suffix);
        out
    }

    /// Caret offset relative to the start of the inserted string
    pub fn caret_offset(self, inserted_len: usize, had_selection: bool) -> usize {
        match self.caret_rule() {
            CaretRule::Wrap if !had_selection => self.tokens().0.len(),
            CaretRule::Wrap | CaretRule::LinePrefix => inserted_len,
        }
    }
}
