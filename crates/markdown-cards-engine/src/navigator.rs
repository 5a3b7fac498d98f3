/// Which slide of the deck is on screen.
///
/// `index` always stays below `max(count, 1)`. Moving past either end is a
/// no-op rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlideNavigator {
    index: usize,
    count: usize,
}

impl SlideNavigator {
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.count
    }

    #[must_use]
    pub fn next(self) -> Self {
        if self.is_last() {
            return self;
        }
        Self {
            index: self.index + 1,
            ..self
        }
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self {
            index: self.index.saturating_sub(1),
            ..self
        }
    }

    /// Re-fit to a recomputed deck of `count` slides
    #[must_use]
    pub fn clamp(self, count: usize) -> Self {
        Self {
            index: self.index.min(count.saturating_sub(1)),
            count,
        }
    }

    #[must_use]
    pub fn go_to(self, index: usize) -> Self {
        Self {
            index: index.min(self.count.saturating_sub(1)),
            ..self
        }
    }

    /// 1-based "current / total" for display
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.count.max(1))
    }
}
