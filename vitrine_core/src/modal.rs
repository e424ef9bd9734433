// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Testimonial detail modal.
//!
//! The modal container and its overlay share one open flag. Opening records
//! which testimonial's avatar, title, and text the presenter copies in.

/// Modal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TestimonialModal {
    open: bool,
    shown: Option<usize>,
}

impl TestimonialModal {
    /// Creates a closed modal.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            open: false,
            shown: None,
        }
    }

    /// Whether the modal and overlay are showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// The testimonial last copied into the modal.
    #[must_use]
    pub const fn shown(&self) -> Option<usize> {
        self.shown
    }

    /// Testimonial `item` was clicked. Returns `true` if the modal content
    /// must be replaced.
    pub fn open(&mut self, item: usize) -> bool {
        self.open = true;
        self.shown.replace(item) != Some(item)
    }

    /// The close button or the overlay was clicked.
    pub fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_close_cycle() {
        let mut modal = TestimonialModal::new();
        assert!(modal.open(2));
        assert!(modal.is_open());
        modal.close();
        assert!(!modal.is_open());
        assert!(!modal.open(2), "same content, no copy needed");
        assert!(modal.open(0));
        assert_eq!(modal.shown(), Some(0));
    }
}
