//! Markdown to sanitized HTML.
//!
//! Conversion is delegated to `pulldown-cmark` and the result is always passed
//! through `ammonia` before it leaves this module, so the output is safe to
//! inject straight into a page. Both steps are total: malformed markdown comes
//! out as literal text and unsafe markup is stripped rather than reported.

use pulldown_cmark::{Options, Parser, html};

/// Markdown extensions enabled for every render
fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render a markdown segment to sanitized HTML.
///
/// Pure and deterministic: the same input always yields the same output.
pub fn render(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let parser = Parser::new_ext(markdown, options());
    let mut unsafe_html = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut unsafe_html, parser);

    ammonia::clean(&unsafe_html)
}
