//! Scroll surface geometry and the sentinel observer
//!
//! The feed is a vertical strip of cards, each exactly one screen tall,
//! followed by a short sentinel. The observer reports how much of the
//! sentinel falls inside the viewport extended downward by a root margin,
//! the same way a browser intersection observer would.

/// Height of the sentinel placed after the last card
pub const SENTINEL_ROWS: u16 = 2;

/// Fraction of the sentinel that must be visible to request more articles
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    /// Card at the top of the screen; equal to the card count when the
    /// sentinel screen is showing
    pub index: usize,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            index: 0,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Rows taken by one card
    pub fn card_rows(&self) -> usize {
        usize::from(self.rows.max(1))
    }

    /// Intersection ratio of the sentinel with the viewport plus
    /// `prefetch_screens` screens of root margin below it.
    pub fn sentinel_ratio(&self, card_count: usize, prefetch_screens: u16) -> f32 {
        let card_rows = self.card_rows();
        let screens = 1 + usize::from(prefetch_screens);

        let top = self.index.saturating_mul(card_rows);
        let bottom = top.saturating_add(card_rows.saturating_mul(screens));

        let sentinel_top = card_count.saturating_mul(card_rows);
        let sentinel_bottom = sentinel_top.saturating_add(usize::from(SENTINEL_ROWS));

        let visible = sentinel_bottom
            .min(bottom)
            .saturating_sub(sentinel_top.max(top));
        visible as f32 / f32::from(SENTINEL_ROWS)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObserverState {
    #[default]
    Idle,
    Watching,
}

/// Watches the sentinel between mount and unmount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentinelObserver {
    state: ObserverState,
    threshold: f32,
}

impl Default for SentinelObserver {
    fn default() -> Self {
        Self::new(VISIBILITY_THRESHOLD)
    }
}

impl SentinelObserver {
    pub fn new(threshold: f32) -> Self {
        Self {
            state: ObserverState::Idle,
            threshold,
        }
    }

    pub fn attach(&mut self) {
        self.state = ObserverState::Watching;
    }

    pub fn detach(&mut self) {
        self.state = ObserverState::Idle;
    }

    pub fn state(&self) -> ObserverState {
        self.state
    }

    /// Whether an intersection at `ratio` should request more articles.
    /// Always false while idle.
    pub fn is_triggered(&self, ratio: f32) -> bool {
        self.state == ObserverState::Watching && ratio >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(index: usize, rows: u16) -> Viewport {
        Viewport {
            cols: 80,
            rows,
            index,
        }
    }

    #[test]
    fn empty_feed_shows_sentinel() {
        assert_eq!(at(0, 24).sentinel_ratio(0, 2), 1.0);
    }

    #[test]
    fn sentinel_outside_root_margin_is_hidden() {
        // 40 cards, 3 screens observed from card 36: rows 864..936, sentinel at 960
        assert_eq!(at(36, 24).sentinel_ratio(40, 2), 0.0);
        // Card 37's observed range ends exactly where the sentinel starts
        assert_eq!(at(37, 24).sentinel_ratio(40, 2), 0.0);
    }

    #[test]
    fn sentinel_inside_root_margin_is_visible() {
        assert_eq!(at(38, 24).sentinel_ratio(40, 2), 1.0);
        assert_eq!(at(40, 24).sentinel_ratio(40, 2), 1.0);
    }

    #[test]
    fn no_margin_needs_the_last_card() {
        assert_eq!(at(38, 24).sentinel_ratio(40, 0), 0.0);
        assert_eq!(at(39, 24).sentinel_ratio(40, 0), 0.0);
        assert_eq!(at(40, 24).sentinel_ratio(40, 0), 1.0);
    }

    #[test]
    fn one_row_terminal_sees_half_the_sentinel() {
        assert_eq!(at(3, 1).sentinel_ratio(3, 0), 0.5);
    }

    #[test]
    fn zero_rows_is_treated_as_one() {
        assert_eq!(at(0, 0).card_rows(), 1);
    }

    #[test]
    fn observer_only_triggers_while_watching() {
        let mut observer = SentinelObserver::default();
        assert_eq!(observer.state(), ObserverState::Idle);
        assert!(!observer.is_triggered(1.0));

        observer.attach();
        assert!(observer.is_triggered(1.0));
        assert!(observer.is_triggered(0.5));
        assert!(!observer.is_triggered(0.49));

        observer.detach();
        assert!(!observer.is_triggered(1.0));
    }
}
