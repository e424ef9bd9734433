// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category filter for the project grid.
//!
//! One [`FilterController`] backs both presentations of the filter: the
//! button group and the dropdown select. Each presentation resolves its
//! control to a token index and calls [`FilterController::select`]; the
//! dropdown additionally keeps its own [`Dropdown`] open flag.

use alloc::string::String;
use alloc::vec::Vec;

/// The token that shows every item.
pub const ALL: &str = "all";

/// Normalizes control text or a category attribute into a token.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One filter control: the text it shows and the token it selects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterControl {
    /// Visible text, shown in the dropdown's value label.
    pub label: String,
    /// Normalized category token.
    pub token: String,
}

impl FilterControl {
    /// A control whose token differs from its text (`data-filter`).
    #[must_use]
    pub fn new(label: impl Into<String>, token: &str) -> Self {
        Self {
            label: label.into(),
            token: normalize(token),
        }
    }

    /// A control whose token is its normalized text.
    #[must_use]
    pub fn labelled(label: impl Into<String>) -> Self {
        let label = label.into();
        let token = normalize(&label);
        Self { label, token }
    }
}

impl From<&str> for FilterControl {
    fn from(label: &str) -> Self {
        Self::labelled(label)
    }
}

impl From<String> for FilterControl {
    fn from(label: String) -> Self {
        Self::labelled(label)
    }
}

/// Result of a selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterChange {
    /// Control that was active.
    pub previous: usize,
    /// Control that is active now.
    pub current: usize,
    /// Text for the dropdown's value label.
    pub label: String,
    /// Visibility of every item, in item order.
    pub visible: Vec<bool>,
}

/// Maps the selected category to per-item visibility.
#[derive(Clone, Debug)]
pub struct FilterController {
    tokens: Vec<String>,
    labels: Vec<String>,
    categories: Vec<String>,
    selected: usize,
}

impl FilterController {
    /// Creates a controller.
    ///
    /// `controls` are the filter controls (plain text converts to a control
    /// whose token is the normalized text); `categories` are the items'
    /// category attributes. The initial selection is the `all` control,
    /// else the first control.
    #[must_use]
    pub fn new<C, I>(controls: C, categories: I) -> Self
    where
        C: IntoIterator,
        C::Item: Into<FilterControl>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let (labels, tokens): (Vec<String>, Vec<String>) = controls
            .into_iter()
            .map(|c| {
                let c = c.into();
                (c.label, c.token)
            })
            .unzip();
        let selected = tokens.iter().position(|t| t == ALL).unwrap_or(0);
        Self {
            categories: categories.into_iter().map(|c| normalize(c.as_ref())).collect(),
            tokens,
            labels,
            selected,
        }
    }

    /// Number of controls.
    #[must_use]
    pub fn control_count(&self) -> usize {
        self.tokens.len()
    }

    /// Number of filtered items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.categories.len()
    }

    /// Index of the active control.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Token of the active control, if there are any controls.
    #[must_use]
    pub fn selected_token(&self) -> Option<&str> {
        self.tokens.get(self.selected).map(String::as_str)
    }

    /// Finds the control whose token, else whose label, matches `text`
    /// after normalization.
    #[must_use]
    pub fn position_of(&self, text: &str) -> Option<usize> {
        let token = normalize(text);
        self.tokens
            .iter()
            .position(|t| *t == token)
            .or_else(|| self.labels.iter().position(|l| normalize(l) == token))
    }

    /// The visibility predicate: the selection is `all`, or the item's
    /// category equals it.
    #[must_use]
    pub fn is_visible(&self, item: usize) -> bool {
        let Some(category) = self.categories.get(item) else {
            return false;
        };
        match self.selected_token() {
            None => true,
            Some(ALL) => true,
            Some(token) => category == token,
        }
    }

    /// Current visibility of every item.
    #[must_use]
    pub fn visibility(&self) -> Vec<bool> {
        (0..self.categories.len()).map(|i| self.is_visible(i)).collect()
    }

    /// Activates control `i` and recomputes visibility. Out-of-range indices
    /// are a no-op.
    pub fn select(&mut self, i: usize) -> Option<FilterChange> {
        let label = self.labels.get(i)?.clone();
        let previous = self.selected;
        self.selected = i;
        tracing::debug!(token = %self.tokens[i], "filter change");
        Some(FilterChange {
            previous,
            current: i,
            label,
            visible: self.visibility(),
        })
    }
}

/// Open flag of the dropdown select.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dropdown {
    open: bool,
}

impl Dropdown {
    /// Creates a closed dropdown.
    #[must_use]
    pub const fn new() -> Self {
        Self { open: false }
    }

    /// Whether the option list is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// The select box was clicked.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// An option was chosen.
    pub fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use proptest::prelude::*;

    use super::*;

    fn grid() -> FilterController {
        FilterController::new(
            ["All", "Web", "Mobile", "Design"],
            ["web", "Mobile", "design", "web", "other"],
        )
    }

    #[test]
    fn all_is_initially_selected() {
        let f = grid();
        assert_eq!(f.selected(), 0);
        assert_eq!(f.visibility(), [true; 5]);
    }

    #[test]
    fn category_matching_is_case_insensitive() {
        let mut f = grid();
        let change = f.select(2).expect("mobile control exists");
        assert_eq!(change.previous, 0);
        assert_eq!(change.label, "Mobile");
        assert_eq!(change.visible, [false, true, false, false, false]);
        assert_eq!(f.position_of("  WEB "), Some(1));
    }

    #[test]
    fn attribute_token_keeps_visible_label() {
        let mut f = FilterController::new(
            [
                FilterControl::labelled("All"),
                FilterControl::new("Web Design", "web"),
            ],
            ["web", "mobile"],
        );
        let change = f.select(1).expect("web control exists");
        assert_eq!(change.label, "Web Design");
        assert_eq!(f.selected_token(), Some("web"));
        assert_eq!(change.visible, [true, false]);
        assert_eq!(f.position_of("web design"), Some(1), "dropdown text matches the label");
        assert_eq!(f.position_of("WEB"), Some(1));
        assert_eq!(f.position_of("print"), None);
    }

    #[test]
    fn out_of_range_select_is_a_noop() {
        let mut f = grid();
        f.select(1);
        assert_eq!(f.select(9), None);
        assert_eq!(f.selected(), 1);
    }

    #[test]
    fn no_controls_shows_everything() {
        let f = FilterController::new(Vec::<String>::new(), ["a", "b"]);
        assert_eq!(f.selected_token(), None);
        assert_eq!(f.visibility(), vec![true, true]);
    }

    #[test]
    fn dropdown_toggles_and_closes() {
        let mut d = Dropdown::new();
        assert!(d.toggle());
        assert!(!d.toggle());
        d.toggle();
        d.close();
        assert!(!d.is_open());
    }

    proptest! {
        #[test]
        fn predicate_and_idempotence(
            categories in proptest::collection::vec(0_usize..4, 0..20),
            picks in proptest::collection::vec(0_usize..4, 1..10),
        ) {
            let names = ["all", "web", "mobile", "design"];
            let mut f = FilterController::new(names, categories.iter().map(|&c| names[c]));
            for pick in picks {
                let first = f.select(pick).expect("pick is in range").visible;
                for (item, &c) in categories.iter().enumerate() {
                    prop_assert_eq!(first[item], pick == 0 || c == pick);
                }
                let second = f.select(pick).expect("pick is in range").visible;
                prop_assert_eq!(first, second);
            }
        }
    }
}
