/// Why a clipboard write failed
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// System clipboard, write-only
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Copy the raw markdown (never the rendered HTML)
pub fn copy_document(markdown: &str, clipboard: &mut dyn Clipboard) -> Result<(), ClipboardError> {
    clipboard.write_text(markdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeClipboard {
        contents: Option<String>,
    }

    impl Clipboard for FakeClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_document_writes_raw_markdown() {
        let mut clipboard = FakeClipboard::default();

        copy_document("# Raw **text**", &mut clipboard).unwrap();

        assert_eq!(clipboard.contents.as_deref(), Some("# Raw **text**"));
    }
}
