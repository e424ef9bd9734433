// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation chrome: menu toggles, anchor scrolling, and tab-like pages.

use alloc::string::String;
use alloc::vec::Vec;

/// Page shown when no link is marked active in the markup.
pub const DEFAULT_PAGE: &str = "about";

/// Smooth-scroll destination for a section at `section_top`, leaving
/// `offset` pixels for the fixed navbar.
#[must_use]
pub fn scroll_target(section_top: f64, offset: f64) -> f64 {
    (section_top - offset).max(0.0)
}

/// Open flag shared by a toggle button and the panel it controls (the
/// mobile menu, the sidebar).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuToggle {
    open: bool,
}

impl MenuToggle {
    /// Creates a closed toggle.
    #[must_use]
    pub const fn new() -> Self {
        Self { open: false }
    }

    /// Whether the panel is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Forces the panel closed. Returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        core::mem::take(&mut self.open)
    }
}

fn page_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Active flags after [`PageNavigator::activate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageChange {
    /// One flag per page article.
    pub pages: Vec<bool>,
    /// One flag per navigation link.
    pub links: Vec<bool>,
}

/// Switches between pages that share one viewport, tab style.
///
/// Page names come from the pages' `data-page` attribute and link names from
/// the links' text; both are compared trimmed and lower-cased.
#[derive(Clone, Debug)]
pub struct PageNavigator {
    pages: Vec<String>,
    links: Vec<String>,
    active: Option<String>,
}

impl PageNavigator {
    /// Creates a navigator with nothing active.
    #[must_use]
    pub fn new<P, L>(pages: P, links: L) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        Self {
            pages: pages.into_iter().map(|p| page_key(p.as_ref())).collect(),
            links: links.into_iter().map(|l| page_key(l.as_ref())).collect(),
            active: None,
        }
    }

    /// Name of the page to show first: the link marked active in the markup,
    /// else [`DEFAULT_PAGE`].
    #[must_use]
    pub fn initial_page(&self, marked_active: Option<usize>) -> &str {
        marked_active
            .and_then(|i| self.links.get(i))
            .map_or(DEFAULT_PAGE, String::as_str)
    }

    /// Returns `true` if the document has no tab-like pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The active page name.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The page name behind link `i`.
    #[must_use]
    pub fn link_target(&self, i: usize) -> Option<&str> {
        self.links.get(i).map(String::as_str)
    }

    /// Shows the page called `name`. Unknown names are a no-op.
    ///
    /// The caller scrolls the window to the top whenever this returns
    /// `Some`.
    pub fn activate(&mut self, name: &str) -> Option<PageChange> {
        let key = page_key(name);
        if !self.pages.contains(&key) {
            tracing::debug!(page = %key, "unknown page");
            return None;
        }
        let change = PageChange {
            pages: self.pages.iter().map(|p| *p == key).collect(),
            links: self.links.iter().map(|l| *l == key).collect(),
        };
        self.active = Some(key);
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_target_never_negative() {
        assert_eq!(scroll_target(500.0, 80.0), 420.0);
        assert_eq!(scroll_target(30.0, 80.0), 0.0);
    }

    #[test]
    fn menu_toggle_and_close() {
        let mut menu = MenuToggle::new();
        assert!(menu.toggle());
        assert!(menu.close());
        assert!(!menu.close(), "already closed");
        assert!(!menu.is_open());
    }

    #[test]
    fn pages_match_case_insensitively() {
        let mut nav = PageNavigator::new(
            ["about", "resume", "portfolio"],
            [" About ", "Resume", "Portfolio", "Blog"],
        );
        assert_eq!(nav.initial_page(None), "about");
        assert_eq!(nav.initial_page(Some(2)), "portfolio");

        let change = nav.activate("RESUME").expect("resume exists");
        assert_eq!(change.pages, [false, true, false]);
        assert_eq!(change.links, [false, true, false, false]);
        assert_eq!(nav.active(), Some("resume"));
    }

    #[test]
    fn unknown_page_is_a_noop() {
        let mut nav = PageNavigator::new(["about"], ["About", "Blog"]);
        nav.activate("about");
        assert_eq!(nav.activate("blog"), None);
        assert_eq!(nav.active(), Some("about"));
    }
}
