//! Rendered preview state.
//!
//! Slides are recomputed from scratch for every document version. A render
//! may finish after a newer version has been requested (a front end that
//! delays the first render to show a spinner, say), so every deck carries the
//! version it was built from and older decks are dropped on arrival.

use crate::slides::{self, RenderedSlide};

/// Rendered slides for one document version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDeck {
    pub version: u64,
    pub slides: Vec<RenderedSlide>,
}

impl RenderedDeck {
    /// Segment then render `markdown`; `split == false` keeps it as one card
    pub fn build(markdown: &str, version: u64, split: bool) -> Self {
        let segments = if split {
            slides::segment(markdown)
        } else {
            slides::single_slide(markdown)
        };
        log::debug!("rendering {} slide(s) for v{version}", segments.len());

        Self {
            version,
            slides: slides::render_each(&segments),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Preview {
    requested: u64,
    deck: Option<RenderedDeck>,
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that `version` of the document now wants rendering
    pub fn request(&mut self, version: u64) {
        self.requested = self.requested.max(version);
    }

    /// Install `deck` unless something newer was requested or installed.
    ///
    /// Returns whether the deck was taken.
    pub fn accept(&mut self, deck: RenderedDeck) -> bool {
        let installed = self.deck.as_ref().map(|d| d.version);
        if deck.version < self.requested || installed.is_some_and(|v| v > deck.version) {
            log::debug!(
                "dropping stale deck v{} (requested v{})",
                deck.version,
                self.requested
            );
            return false;
        }
        self.requested = deck.version;
        self.deck = Some(deck);
        true
    }

    /// True until the latest requested version has been rendered
    pub fn is_loading(&self) -> bool {
        self.deck
            .as_ref()
            .is_none_or(|deck| deck.version < self.requested)
    }

    pub fn slides(&self) -> &[RenderedSlide] {
        self.deck
            .as_ref()
            .map(|deck| deck.slides.as_slice())
            .unwrap_or_default()
    }

    pub fn slide(&self, index: usize) -> Option<&RenderedSlide> {
        self.slides().get(index)
    }

    pub fn version(&self) -> Option<u64> {
        self.deck.as_ref().map(|deck| deck.version)
    }
}
