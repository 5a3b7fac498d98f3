//! Export of the whole (unsegmented) document.
//!
//! Both exports embed the sanitized rendering in a standalone HTML page with
//! a fixed inline style sheet. The HTML export is written to disk as
//! `exported-markdown.html`; the print export goes to a [`PrintSurface`],
//! whose print flow produces the PDF.

use std::fs;
use std::path::{Path, PathBuf};

use crate::render::render;
use crate::slides;

/// File name of the HTML download
pub const EXPORT_FILE_NAME: &str = "exported-markdown.html";

/// Title used when the document has no heading
pub const DEFAULT_TITLE: &str = "Exported Markdown";

const BASE_STYLE: &str = r#"    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, 'Open Sans', 'Helvetica Neue', sans-serif;
      line-height: 1.6;
      color: #333;
      max-width: 800px;
      margin: 0 auto;
      padding: 20px;
    }
    h1, h2, h3 { margin-top: 1.5em; }
    pre {
      background-color: #f6f8fa;
      padding: 16px;
      border-radius: 4px;
      overflow-x: auto;
    }
    code {
      font-family: 'SFMono-Regular', Consolas, 'Liberation Mono', Menlo, Courier, monospace;
      background-color: #f6f8fa;
      padding: 3px 5px;
      border-radius: 3px;
    }
    blockquote {
      margin-left: 0;
      padding-left: 1em;
      border-left: 4px solid #ddd;
      color: #555;
    }
"#;

const PRINT_STYLE: &str = r#"    @media print {
      body { padding: 0; max-width: none; }
      pre { white-space: pre-wrap; }
    }
"#;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write export to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Print failed: {0}")]
    Print(String),
}

/// Somewhere a print-ready page can be handed for printing
pub trait PrintSurface {
    fn print(&mut self, html: &str) -> Result<(), ExportError>;
}

/// First heading of the first slide, or [`DEFAULT_TITLE`]
pub fn document_title(markdown: &str) -> String {
    slides::segment(markdown)
        .first()
        .and_then(|slide| slide.title().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

fn page(markdown: &str, title: &str, print: bool) -> String {
    let body = render(markdown);
    let title = html_escape::encode_text(title);
    let print_style = if print { PRINT_STYLE } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
{BASE_STYLE}{print_style}  </style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

/// Standalone HTML page for the whole document
pub fn html_document(markdown: &str, title: &str) -> String {
    page(markdown, title, false)
}

/// Like [`html_document`], with print rules added
pub fn print_document(markdown: &str, title: &str) -> String {
    page(markdown, title, true)
}

/// Write the HTML export into `dir`, returning the written path
pub fn export_html(markdown: &str, dir: &Path) -> Result<PathBuf, ExportError> {
    let html = html_document(markdown, &document_title(markdown));
    let path = dir.join(EXPORT_FILE_NAME);

    fs::create_dir_all(dir)
        .and_then(|()| fs::write(&path, html))
        .map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

    log::info!("Exported HTML to {}", path.display());
    Ok(path)
}

/// Hand the print page to `surface`
pub fn export_pdf(markdown: &str, surface: &mut dyn PrintSurface) -> Result<(), ExportError> {
    let html = print_document(markdown, &document_title(markdown));
    surface.print(&html)
}

/// Print surface that writes the page to a file for the platform print flow
#[derive(Debug, Clone)]
pub struct FilePrintSurface {
    path: PathBuf,
}

impl FilePrintSurface {
    pub const FILE_NAME: &'static str = "exported-markdown-print.html";

    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrintSurface for FilePrintSurface {
    fn print(&mut self, html: &str) -> Result<(), ExportError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ExportError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, html).map_err(|source| ExportError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Print page ready at {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_file, create_test_storage_dir};

    #[derive(Default)]
    struct RecordingSurface {
        printed: Vec<String>,
    }

    impl PrintSurface for RecordingSurface {
        fn print(&mut self, html: &str) -> Result<(), ExportError> {
            self.printed.push(html.to_string());
            Ok(())
        }
    }

    struct BrokenSurface;

    impl PrintSurface for BrokenSurface {
        fn print(&mut self, _html: &str) -> Result<(), ExportError> {
            Err(ExportError::Print("no printer".to_string()))
        }
    }

    #[test]
    fn test_html_document_embeds_whole_rendering() {
        let html = html_document("# One\n---\n**two**", "Deck");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Deck</title>"));
        assert!(html.contains("<h1>One</h1>"));
        assert!(html.contains("<strong>two</strong>"));
        assert!(html.contains("border-left: 4px solid #ddd;"));
        assert!(!html.contains("@media print"));
    }

    #[test]
    fn test_html_document_is_sanitized() {
        let html = html_document("<script>alert(1)</script>hi", DEFAULT_TITLE);
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = html_document("", "<b>&</b>");
        assert!(html.contains("<title>&lt;b&gt;&amp;&lt;/b&gt;</title>"));
    }

    #[test]
    fn test_print_document_adds_print_rules() {
        let html = print_document("text", DEFAULT_TITLE);
        assert!(html.contains("@media print"));
        assert!(html.contains("white-space: pre-wrap;"));
    }

    #[test]
    fn test_document_title() {
        assert_eq!(document_title("intro\n# Hello\n---\n# Other"), "Hello");
        assert_eq!(document_title("# Learn C#"), "Learn C#");
        assert_eq!(document_title("no heading"), DEFAULT_TITLE);
        assert_eq!(document_title(""), DEFAULT_TITLE);
    }

    #[test]
    fn test_export_html_writes_named_file() {
        let dir = create_test_storage_dir();

        let path = export_html("# Title\n\nbody", dir.path()).unwrap();

        assert_eq!(path, dir.path().join(EXPORT_FILE_NAME));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("<title>Title</title>"));
        assert!(written.contains("<p>body</p>"));
    }

    #[test]
    fn test_export_html_reports_write_failure() {
        let dir = create_test_storage_dir();
        let blocker = create_test_file(&dir, "blocker", "file, not dir");

        let result = export_html("x", &blocker);

        assert!(matches!(result, Err(ExportError::Write { .. })));
    }

    #[test]
    fn test_export_pdf_hands_print_page_to_surface() {
        let mut surface = RecordingSurface::default();

        export_pdf("# Printed", &mut surface).unwrap();

        assert_eq!(surface.printed.len(), 1);
        assert!(surface.printed[0].contains("<h1>Printed</h1>"));
        assert!(surface.printed[0].contains("@media print"));
    }

    #[test]
    fn test_export_pdf_propagates_surface_error() {
        let result = export_pdf("x", &mut BrokenSurface);
        assert!(matches!(result, Err(ExportError::Print(_))));
    }

    #[test]
    fn test_file_print_surface_writes_page() {
        let dir = create_test_storage_dir();
        let mut surface = FilePrintSurface::new(dir.path());

        export_pdf("hello", &mut surface).unwrap();

        let written = std::fs::read_to_string(surface.path()).unwrap();
        assert!(written.contains("<p>hello</p>"));
    }
}
