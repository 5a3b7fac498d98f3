pub mod clipboard;
pub mod editing;
pub mod export;
pub mod io;
pub mod models;
pub mod navigator;
pub mod notify;
pub mod preview;
pub mod render;
pub mod session;
pub mod slides;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use clipboard::{Clipboard, ClipboardError};
pub use editing::{Cmd, Document, MarkupKind, Motion, Patch};
pub use export::{ExportError, FilePrintSurface, PrintSurface};
pub use io::*;
pub use models::*;
pub use navigator::SlideNavigator;
pub use notify::{Notification, NotificationLevel};
pub use preview::{Preview, RenderedDeck};
pub use render::render;
pub use session::EditorSession;
pub use slides::{RenderedSlide, Slide, segment};
