//! One editing session: the document, its persisted copy and its preview.
//!
//! Every text change goes `Cmd -> Document -> save -> segment -> render ->
//! Preview -> navigator clamp`, recomputing the whole deck each time. Copy
//! and export never touch the document; their outcome comes back as a
//! [`Notification`].

use std::path::Path;

use crate::clipboard::{self, Clipboard};
use crate::editing::{Cmd, Document, Motion, Patch};
use crate::export::{self, PrintSurface};
use crate::io::{PersistenceBridge, Storage, default_markdown};
use crate::models::CardSettings;
use crate::navigator::SlideNavigator;
use crate::notify::Notification;
use crate::preview::{Preview, RenderedDeck};
use crate::slides::{self, RenderedSlide};

pub struct EditorSession<S> {
    bridge: PersistenceBridge<S>,
    document: Document,
    preview: Preview,
    navigator: SlideNavigator,
    settings: CardSettings,
    notice: Option<Notification>,
}

impl<S: Storage> EditorSession<S> {
    /// Load the saved document (or the welcome document) and render it.
    ///
    /// A stored document that exists but can't be read is left untouched:
    /// the session shows the welcome document with saving switched off and
    /// queues an error notification.
    pub fn open(storage: S, settings: CardSettings) -> Self {
        let mut bridge = PersistenceBridge::new(storage);
        let mut notice = None;
        let text = match bridge.load_or_default() {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to load saved document, saving disabled: {e}");
                bridge.disable_saving();
                notice = Some(Notification::error(
                    "Failed to load saved document; changes will not be saved",
                ));
                default_markdown()
            }
        };
        let document = Document::from_text(&text);
        log::info!("Opened document ({} bytes)", document.len());

        let mut session = Self {
            bridge,
            document,
            preview: Preview::new(),
            navigator: SlideNavigator::default(),
            settings,
            notice,
        };
        session.refresh();
        session
    }

    /// Notification raised while opening, if any
    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notice.take()
    }

    /// False once a load failure has switched saving off
    pub fn is_saving(&self) -> bool {
        self.bridge.is_saving()
    }

    /// Apply an edit; a changed text is saved and re-rendered
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let patch = self.document.apply(cmd);
        if patch.text_changed {
            self.bridge.save(&self.document.text());
            self.refresh();
        }
        patch
    }

    pub fn move_caret(&mut self, motion: Motion, extend: bool) {
        self.document.move_caret(motion, extend);
    }

    /// Rebuild the deck for the current version and re-fit the navigator
    fn refresh(&mut self) {
        let version = self.document.version();
        self.preview.request(version);
        let deck = RenderedDeck::build(&self.document.text(), version, self.settings.auto_split);
        self.preview.accept(deck);
        self.navigator = self.navigator.clamp(self.preview.slides().len());
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn text(&self) -> String {
        self.document.text()
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn slides(&self) -> &[RenderedSlide] {
        self.preview.slides()
    }

    pub fn navigator(&self) -> SlideNavigator {
        self.navigator
    }

    pub fn current_slide(&self) -> Option<&RenderedSlide> {
        self.preview.slide(self.navigator.index())
    }

    pub fn next_slide(&mut self) {
        self.navigator = self.navigator.next();
    }

    pub fn prev_slide(&mut self) {
        self.navigator = self.navigator.prev();
    }

    /// Show the slide the caret is in
    pub fn follow_caret(&mut self) {
        if !self.settings.auto_split {
            return;
        }
        let index = slides::slide_at(&self.document.text(), self.document.head());
        self.navigator = self.navigator.go_to(index);
    }

    pub fn settings(&self) -> &CardSettings {
        &self.settings
    }

    /// Change card settings; toggling auto split re-renders
    pub fn update_settings(&mut self, update: impl FnOnce(&mut CardSettings)) {
        let auto_split = self.settings.auto_split;
        update(&mut self.settings);
        if self.settings.auto_split != auto_split {
            self.refresh();
        }
    }

    pub fn storage(&self) -> &S {
        self.bridge.storage()
    }

    pub fn copy_to_clipboard(&self, clipboard: &mut dyn Clipboard) -> Notification {
        match clipboard::copy_document(&self.document.text(), clipboard) {
            Ok(()) => Notification::success("Copied to clipboard!"),
            Err(e) => {
                log::error!("Clipboard write failed: {e}");
                Notification::error("Failed to copy to clipboard")
            }
        }
    }

    pub fn export_html(&self, dir: &Path) -> Notification {
        match export::export_html(&self.document.text(), dir) {
            Ok(_) => Notification::success("Exported to HTML successfully!"),
            Err(e) => {
                log::error!("HTML export failed: {e}");
                Notification::error("Failed to export to HTML")
            }
        }
    }

    pub fn export_pdf(&self, surface: &mut dyn PrintSurface) -> Notification {
        match export::export_pdf(&self.document.text(), surface) {
            Ok(()) => Notification::success("Preparing PDF for download..."),
            Err(e) => {
                log::error!("PDF export failed: {e}");
                Notification::error("Failed to export to PDF")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use crate::editing::MarkupKind;
    use crate::export::{ExportError, FilePrintSurface};
    use crate::io::{FileStorage, MemoryStorage, STORAGE_KEY};
    use crate::notify::NotificationLevel;
    use crate::tests::{create_test_file, create_test_storage_dir};
    use pretty_assertions::assert_eq;

    fn session_with(text: &str) -> EditorSession<MemoryStorage> {
        let mut storage = MemoryStorage::new();
        storage.save(STORAGE_KEY, text).unwrap();
        EditorSession::open(storage, CardSettings::default())
    }

    fn saved(session: &EditorSession<MemoryStorage>) -> Option<String> {
        session.storage().load(STORAGE_KEY).unwrap()
    }

    struct FailingClipboard;

    impl Clipboard for FailingClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("denied".to_string()))
        }
    }

    struct FailingPrinter;

    impl PrintSurface for FailingPrinter {
        fn print(&mut self, _html: &str) -> Result<(), ExportError> {
            Err(ExportError::Print("no printer".to_string()))
        }
    }

    #[test]
    fn test_open_without_saved_document_uses_welcome() {
        let session = EditorSession::open(MemoryStorage::new(), CardSettings::default());

        assert_eq!(session.text(), default_markdown());
        assert_eq!(session.slides().len(), 3);
        assert!(!session.preview().is_loading());
    }

    #[test]
    fn test_open_with_saved_empty_document_stays_empty() {
        let session = session_with("");

        assert_eq!(session.text(), "");
        assert_eq!(session.slides().len(), 1);
        assert_eq!(session.navigator().index(), 0);
    }

    #[test]
    fn test_every_change_is_saved() {
        let mut session = session_with("a");
        session.document_mut().set_caret(1);

        session.apply(Cmd::InsertTab);
        assert_eq!(saved(&session).as_deref(), Some("a  "));

        session.apply(Cmd::InsertMarkup {
            kind: MarkupKind::HorizontalRule,
            placeholder: None,
        });
        assert_eq!(saved(&session).as_deref(), Some("a  ---"));
    }

    #[test]
    fn test_edit_recomputes_slides() {
        let mut session = session_with("one");
        session.document_mut().set_caret(3);

        session.apply(Cmd::ReplaceSelection {
            text: "\n---\ntwo".to_string(),
        });

        assert_eq!(session.slides().len(), 2);
        assert!(session.slides()[1].html.contains("two"));
    }

    #[test]
    fn test_navigator_clamped_when_slides_removed() {
        let mut session = session_with("a\n---\nb\n---\nc");
        session.next_slide();
        session.next_slide();
        assert_eq!(session.navigator().index(), 2);

        session.apply(Cmd::ReplaceAll {
            text: "only one".to_string(),
        });

        assert_eq!(session.navigator().index(), 0);
        assert!(session.current_slide().is_some());
    }

    #[test]
    fn test_slide_navigation_is_bounded() {
        let mut session = session_with("a\n---\nb");

        session.prev_slide();
        assert_eq!(session.navigator().index(), 0);
        session.next_slide();
        session.next_slide();
        assert_eq!(session.navigator().index(), 1);
        assert!(session.current_slide().unwrap().html.contains("b"));
    }

    #[test]
    fn test_follow_caret() {
        let mut session = session_with("a\n---\nb\n---\nc");
        session.document_mut().set_caret(7);

        session.follow_caret();

        assert_eq!(session.navigator().index(), 1);
    }

    #[test]
    fn test_turning_off_auto_split_shows_one_card() {
        let mut session = session_with("a\n---\nb");
        session.next_slide();

        session.update_settings(|settings| settings.auto_split = false);

        assert_eq!(session.slides().len(), 1);
        assert_eq!(session.navigator().index(), 0);
    }

    #[test]
    fn test_noop_edit_does_not_save() {
        let mut session = session_with("abc");
        session.document_mut().set_caret(0);
        session.apply(Cmd::Backspace);

        assert_eq!(session.document().version(), 0);
        assert_eq!(saved(&session).as_deref(), Some("abc"));
    }

    #[test]
    fn test_copy_failure_leaves_document_unchanged() {
        let session = session_with("keep me");

        let notification = session.copy_to_clipboard(&mut FailingClipboard);

        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, "Failed to copy to clipboard");
        assert_eq!(session.text(), "keep me");
    }

    #[test]
    fn test_export_html_notifications() {
        let session = session_with("# Export me");
        let dir = create_test_storage_dir();

        let ok = session.export_html(dir.path());
        assert_eq!(ok, Notification::success("Exported to HTML successfully!"));

        let blocker = create_test_file(&dir, "blocker", "");
        let failed = session.export_html(&blocker);
        assert!(failed.is_error());
        assert_eq!(failed.message, "Failed to export to HTML");
    }

    #[test]
    fn test_open_keeps_unreadable_document_intact() {
        let dir = create_test_storage_dir();
        let path = dir.path().join("markdownContent.md");
        let user_bytes = b"# My notes \xE9t\xE9\n---\nlots of work";
        std::fs::write(&path, user_bytes).unwrap();

        let mut session = EditorSession::open(FileStorage::new(dir.path()), CardSettings::default());
        let notice = session.take_notification().unwrap();
        session.apply(Cmd::InsertTab);

        assert_eq!(session.text(), format!("{}  ", default_markdown()));
        assert!(!session.is_saving());
        assert!(notice.is_error());
        assert_eq!(std::fs::read(&path).unwrap(), user_bytes);
        assert_eq!(session.take_notification(), None);
    }

    #[test]
    fn test_open_with_readable_document_raises_nothing() {
        let mut session = session_with("fine");

        assert!(session.is_saving());
        assert_eq!(session.take_notification(), None);
    }

    #[test]
    fn test_export_pdf_notifications() {
        let session = session_with("# Printed");
        let dir = create_test_storage_dir();

        let notification = session.export_pdf(&mut FilePrintSurface::new(dir.path()));

        assert_eq!(
            notification,
            Notification::success("Preparing PDF for download...")
        );
    }

    #[test]
    fn test_export_pdf_failure_notification() {
        let session = session_with("x");

        let notification = session.export_pdf(&mut FailingPrinter);

        assert_eq!(notification, Notification::error("Failed to export to PDF"));
    }
}
