//! Featured-post carousel position.

use std::time::Duration;

use crate::domain::{Post, PostId};

/// Time a slide stays up before auto-advancing.
pub const SLIDE_INTERVAL: Duration = Duration::from_secs(5);

/// Rotating index over the featured posts.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    slides: Vec<Post>,
    index: usize,
    shown_for: Duration,
}

impl Carousel {
    pub fn new(slides: Vec<Post>) -> Self {
        Self {
            slides,
            index: 0,
            shown_for: Duration::ZERO,
        }
    }

    /// Replace the slides; the position restarts when the set changes.
    pub fn set_slides(&mut self, slides: Vec<Post>) {
        let same = slides.len() == self.slides.len()
            && slides.iter().zip(&self.slides).all(|(a, b)| a.id == b.id);
        self.slides = slides;
        if !same {
            self.index = 0;
            self.shown_for = Duration::ZERO;
        }
    }

    /// Drop a deleted post from the slides, keeping the current one if possible.
    pub fn remove(&mut self, id: &PostId) {
        let Some(pos) = self.slides.iter().position(|p| &p.id == id) else {
            return;
        };
        self.slides.remove(pos);
        if pos < self.index || self.index >= self.slides.len() {
            self.index = self.index.saturating_sub(1).min(self.slides.len().saturating_sub(1));
        }
    }

    pub fn current(&self) -> Option<&Post> {
        self.slides.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn next(&mut self) {
        if !self.slides.is_empty() {
            self.index = (self.index + 1) % self.slides.len();
        }
        self.shown_for = Duration::ZERO;
    }

    pub fn prev(&mut self) {
        if !self.slides.is_empty() {
            self.index = self.index.checked_sub(1).unwrap_or(self.slides.len() - 1);
        }
        self.shown_for = Duration::ZERO;
    }

    /// Jump to a slide; out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) {
        if index < self.slides.len() {
            self.index = index;
            self.shown_for = Duration::ZERO;
        }
    }

    /// Advance the auto-rotation clock by `elapsed`, moving one slide per
    /// full [`SLIDE_INTERVAL`]. Returns true when the slide changed.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.slides.is_empty() {
            return false;
        }
        self.shown_for += elapsed;
        let mut moved = false;
        while self.shown_for >= SLIDE_INTERVAL {
            self.shown_for -= SLIDE_INTERVAL;
            self.index = (self.index + 1) % self.slides.len();
            moved = true;
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::numbered;

    #[test]
    fn test_next_and_prev_wrap() {
        let mut carousel = Carousel::new(numbered(3));
        carousel.prev();
        assert_eq!(carousel.index(), 2);
        carousel.next();
        assert_eq!(carousel.index(), 0);
        carousel.go_to(1);
        assert_eq!(carousel.current().unwrap().id.as_str(), "p-1");
        carousel.go_to(7);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_tick_advances_every_interval() {
        let mut carousel = Carousel::new(numbered(5));
        assert!(!carousel.tick(Duration::from_secs(4)));
        assert!(carousel.tick(Duration::from_secs(1)));
        assert_eq!(carousel.index(), 1);
        assert!(carousel.tick(Duration::from_secs(11)));
        assert_eq!(carousel.index(), 3);
    }

    #[test]
    fn test_manual_navigation_resets_timer() {
        let mut carousel = Carousel::new(numbered(5));
        carousel.tick(Duration::from_secs(4));
        carousel.next();
        assert!(!carousel.tick(Duration::from_secs(4)));
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_empty_carousel_is_inert() {
        let mut carousel = Carousel::default();
        carousel.next();
        carousel.prev();
        assert!(!carousel.tick(Duration::from_secs(60)));
        assert!(carousel.current().is_none());
    }

    #[test]
    fn test_remove_keeps_position_valid() {
        let mut carousel = Carousel::new(numbered(3));
        carousel.go_to(2);
        carousel.remove(&PostId::new("p-2"));
        assert_eq!(carousel.current().unwrap().id.as_str(), "p-1");

        carousel.remove(&PostId::new("p-0"));
        assert_eq!(carousel.current().unwrap().id.as_str(), "p-1");
        assert_eq!(carousel.len(), 1);
    }

    #[test]
    fn test_set_slides_resets_on_change_only() {
        let mut carousel = Carousel::new(numbered(4));
        carousel.go_to(2);
        carousel.set_slides(numbered(4));
        assert_eq!(carousel.index(), 2);
        carousel.set_slides(numbered(3));
        assert_eq!(carousel.index(), 0);
    }
}
