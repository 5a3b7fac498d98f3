/*!
 * # Editing Core
 *
 * The raw markdown text and its caret/selection, plus every operation that
 * mutates them.
 *
 * - **`document`**: `Document`, an xi-rope buffer with an ordered selection,
 *   a version counter and a pending caret
 * - **`commands`**: the `Cmd` enum, the pure `insert_tab` / `insert_markup`
 *   edits and the splice planning behind `Document::apply`
 * - **`markup`**: the toolbar token table and per-kind caret rules
 * - **`patch`**: what an applied command changed
 *
 * ## Usage Pattern
 *
 * ```rust
 * use markdown_cards_engine::editing::*;
 *
 * let mut doc = Document::from_text("");
 * let patch = doc.apply(Cmd::InsertMarkup {
 *     kind: MarkupKind::Bold,
 *     placeholder: Some("Bold text".to_string()),
 * });
 *
 * assert_eq!(doc.text(), "**Bold text**");
 * assert_eq!(patch.new_selection, 2..2);
 * ```
 */

pub mod commands;
pub mod document;
pub mod markup;
pub mod patch;

pub use commands::{Cmd, Edit, TAB, insert_markup, insert_tab};
pub use document::{Document, Motion};
pub use markup::{CaretRule, MarkupKind};
pub use patch::Patch;
