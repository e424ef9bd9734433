// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-derived page state.
//!
//! [`ViewState`] owns everything recomputed on a scroll or resize tick: the
//! active navigation link, the scroll-progress fraction, the navbar's
//! "scrolled" flag, the reveal fallback latches, and the parallax offsets.
//!
//! Scroll events go through a [`Throttle`] and resize events through a
//! [`Debounce`]; when either gate says so, the caller measures the page into
//! a [`ScrollMetrics`] and calls [`ViewState::recompute`], which returns a
//! [`ViewChanges`] describing only what a presenter has to touch.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Affine;

use crate::nav::scroll_target;
use crate::rate_limit::{Debounce, Gate, Throttle};
use crate::time::{Duration, HostTime};
use crate::timer::{TimerHost, Timeout};

/// Tuning for scroll-driven state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrollConfig {
    /// Scroll handler throttle interval.
    pub throttle: Duration,
    /// Resize handler quiet period.
    pub resize_debounce: Duration,
    /// Offset added to `scrollY` before testing section membership.
    pub nav_offset: f64,
    /// Gap left above a section when scrolling to it from a nav link.
    pub anchor_offset: f64,
    /// `scrollY` beyond which the navbar is marked scrolled.
    pub navbar_scrolled_after: f64,
    /// Distance above the viewport bottom a reveal's top must cross in the
    /// fallback path.
    pub reveal_fallback_margin: f64,
    /// Base parallax rate applied to `scrollY`.
    pub parallax_rate: f64,
    /// Per-depth parallax speed step.
    pub parallax_step: f64,
}

impl ScrollConfig {
    /// Defaults: 16ms throttle, 250ms debounce.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            throttle: Duration(16),
            resize_debounce: Duration(250),
            nav_offset: 100.0,
            anchor_offset: 80.0,
            navbar_scrolled_after: 50.0,
            reveal_fallback_margin: 150.0,
            parallax_rate: -0.5,
            parallax_step: 0.1,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A page section's layout, in document coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    /// Anchor identifier (the element id, without `#`).
    pub id: String,
    /// Offset of the section's top from the document top.
    pub top: f64,
    /// Section height.
    pub height: f64,
}

impl Section {
    /// Creates a section.
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Whether `y` falls in `[top, top + height)`.
    #[must_use]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Window measurements taken at a scroll or resize tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// `window.scrollY`.
    pub scroll_y: f64,
    /// `window.innerHeight`.
    pub viewport_height: f64,
    /// `document.documentElement.scrollHeight`.
    pub document_height: f64,
}

/// Active navigation link transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavChange {
    /// Link that was active before, if any.
    pub previous: Option<usize>,
    /// Link that is active now, if any.
    pub current: Option<usize>,
}

/// Incremental result of [`ViewState::recompute`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewChanges {
    /// Set when the active navigation link changed.
    pub nav: Option<NavChange>,
    /// Set when the navbar's scrolled flag flipped.
    pub navbar_scrolled: Option<bool>,
    /// Scroll progress in `[0, 1]`. Always reported.
    pub progress: f64,
    /// Reveal items latched by the fallback path during this tick.
    pub revealed: Vec<usize>,
    /// Vertical translation per parallax element, by depth index.
    pub parallax: Vec<f64>,
}

impl ViewChanges {
    /// Horizontal scale transform for the progress bar.
    #[must_use]
    pub fn progress_transform(&self) -> Affine {
        Affine::scale_non_uniform(self.progress, 1.0)
    }

    /// Translation transform for parallax element `i`.
    #[must_use]
    pub fn parallax_transform(&self, i: usize) -> Option<Affine> {
        self.parallax
            .get(i)
            .map(|&dy| Affine::translate((0.0, dy)))
    }
}

/// Returns the index of the section containing `scroll_y + offset`.
///
/// Sections are scanned in order and the last match wins, so overlapping
/// ranges resolve to the later section.
#[must_use]
pub fn active_section(sections: &[Section], scroll_y: f64, offset: f64) -> Option<usize> {
    let line = scroll_y + offset;
    sections.iter().rposition(|s| s.contains(line))
}

/// Scroll progress `scroll_y / (document_height - viewport_height)`, clamped
/// to `[0, 1]`. A page that cannot scroll reports 0.
#[must_use]
pub fn progress_fraction(m: &ScrollMetrics) -> f64 {
    let range = m.document_height - m.viewport_height;
    if range <= 0.0 || !range.is_finite() {
        return 0.0;
    }
    (m.scroll_y / range).clamp(0.0, 1.0)
}

/// Vertical offset of the parallax element at depth `index`.
///
/// Deeper elements move proportionally faster.
#[must_use]
pub fn parallax_offset(scroll_y: f64, index: usize, rate: f64, step: f64) -> f64 {
    scroll_y * rate * ((index + 1) as f64 * step)
}

/// Scroll-derived state for one page.
#[derive(Debug)]
pub struct ViewState {
    config: ScrollConfig,
    sections: Vec<Section>,
    /// Link index for each section, by matching anchor id.
    section_link: Vec<Option<usize>>,
    link_targets: Vec<String>,
    active_link: Option<usize>,
    navbar_scrolled: bool,
    progress: f64,
    /// `None` when a native observer handles reveals.
    reveal_fallback: Option<Vec<bool>>,
    parallax_count: usize,
    scroll_gate: Throttle,
    resize_gate: Debounce,
}

impl ViewState {
    /// Creates the coordinator.
    ///
    /// `link_targets` are the nav links' `href` values (`#about`, ...).
    /// `reveal_fallback` is the number of reveal items to latch on scroll when
    /// no native observer is available, or `None` when one is.
    #[must_use]
    pub fn new(
        config: ScrollConfig,
        sections: Vec<Section>,
        link_targets: Vec<String>,
        parallax_count: usize,
        reveal_fallback: Option<usize>,
    ) -> Self {
        let mut state = Self {
            scroll_gate: Throttle::new(config.throttle),
            resize_gate: Debounce::new(config.resize_debounce),
            config,
            sections: Vec::new(),
            section_link: Vec::new(),
            link_targets,
            active_link: None,
            navbar_scrolled: false,
            progress: 0.0,
            reveal_fallback: reveal_fallback.map(|n| alloc::vec![false; n]),
            parallax_count,
        };
        state.set_sections(sections);
        state
    }

    /// Starts from the nav link the markup already marks active, so the
    /// first recompute reports it as the link to clear.
    #[must_use]
    pub fn with_active_link(mut self, link: Option<usize>) -> Self {
        self.active_link = link.filter(|&i| i < self.link_targets.len());
        self
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Replaces the section layout (after a resize re-measure).
    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.section_link = sections
            .iter()
            .map(|s| {
                self.link_targets
                    .iter()
                    .position(|t| t.strip_prefix('#').unwrap_or(t) == s.id)
            })
            .collect();
        self.sections = sections;
    }

    /// Current sections.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Index of the active nav link, if any.
    #[must_use]
    pub const fn active_link(&self) -> Option<usize> {
        self.active_link
    }

    /// Whether the navbar is in its scrolled state.
    #[must_use]
    pub const fn navbar_scrolled(&self) -> bool {
        self.navbar_scrolled
    }

    /// Last computed progress fraction.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether reveal item `i` has latched through the fallback path.
    #[must_use]
    pub fn is_revealed(&self, i: usize) -> bool {
        self.reveal_fallback
            .as_ref()
            .and_then(|r| r.get(i).copied())
            .unwrap_or(false)
    }

    /// Returns the scroll target for nav link `link`, if its section exists.
    #[must_use]
    pub fn link_scroll_target(&self, link: usize) -> Option<f64> {
        let section = self.section_link.iter().position(|&l| l == Some(link))?;
        Some(scroll_target(
            self.sections[section].top,
            self.config.anchor_offset,
        ))
    }

    /// Registers a scroll event. Returns [`Gate::Run`] when the caller should
    /// measure and [`recompute`](Self::recompute) now.
    pub fn on_scroll<H: TimerHost + ?Sized>(&mut self, timers: &mut H) -> Gate {
        self.scroll_gate.call(timers, Timeout::ScrollTrailing)
    }

    /// Registers a resize event; the recompute happens on
    /// [`Timeout::ResizeSettled`].
    pub fn on_resize<H: TimerHost + ?Sized>(&mut self, timers: &mut H) {
        self.resize_gate.call(timers, Timeout::ResizeSettled);
    }

    /// Handles this component's timers. Returns `true` when the caller
    /// should measure and recompute. Other purposes return `false`.
    pub fn on_timeout(&mut self, purpose: Timeout, now: HostTime) -> bool {
        match purpose {
            Timeout::ScrollTrailing => self.scroll_gate.on_timeout(now),
            Timeout::ResizeSettled => self.resize_gate.on_timeout(),
            _ => false,
        }
    }

    /// Recomputes all scroll-derived state.
    ///
    /// `reveal_top(i)` returns the current viewport-relative top of reveal
    /// item `i`; it is only called for items not yet latched, and only on
    /// the fallback path.
    pub fn recompute(
        &mut self,
        metrics: &ScrollMetrics,
        mut reveal_top: impl FnMut(usize) -> Option<f64>,
    ) -> ViewChanges {
        let mut changes = ViewChanges::default();

        if let Some(section) = active_section(&self.sections, metrics.scroll_y, self.config.nav_offset)
        {
            let current = self.section_link.get(section).copied().flatten();
            if current != self.active_link {
                changes.nav = Some(NavChange {
                    previous: self.active_link,
                    current,
                });
                self.active_link = current;
            }
        }

        let scrolled = metrics.scroll_y > self.config.navbar_scrolled_after;
        if scrolled != self.navbar_scrolled {
            self.navbar_scrolled = scrolled;
            changes.navbar_scrolled = Some(scrolled);
        }

        self.progress = progress_fraction(metrics);
        changes.progress = self.progress;

        if let Some(latches) = &mut self.reveal_fallback {
            let line = metrics.viewport_height - self.config.reveal_fallback_margin;
            for (i, latched) in latches.iter_mut().enumerate() {
                if *latched {
                    continue;
                }
                if reveal_top(i).is_some_and(|top| top < line) {
                    *latched = true;
                    changes.revealed.push(i);
                }
            }
        }

        changes.parallax = (0..self.parallax_count)
            .map(|i| {
                parallax_offset(
                    metrics.scroll_y,
                    i,
                    self.config.parallax_rate,
                    self.config.parallax_step,
                )
            })
            .collect();

        changes
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use proptest::prelude::*;

    use super::*;
    use crate::timer::ManualTimers;

    fn page() -> ViewState {
        ViewState::new(
            ScrollConfig::new(),
            vec![
                Section::new("home", 0.0, 800.0),
                Section::new("about", 800.0, 600.0),
                Section::new("contact", 1400.0, 700.0),
            ],
            vec!["#home".to_string(), "#about".to_string(), "#contact".to_string()],
            2,
            Some(2),
        )
    }

    fn at(scroll_y: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_y,
            viewport_height: 800.0,
            document_height: 2100.0,
        }
    }

    #[test]
    fn active_link_follows_offset_scroll_position() {
        let mut view = page();
        let changes = view.recompute(&at(0.0), |_| None);
        assert_eq!(
            changes.nav,
            Some(NavChange {
                previous: None,
                current: Some(0)
            })
        );

        // 700 + 100 lands exactly on the top of "about".
        let changes = view.recompute(&at(700.0), |_| None);
        assert_eq!(changes.nav.map(|n| n.current), Some(Some(1)));

        let changes = view.recompute(&at(720.0), |_| None);
        assert_eq!(changes.nav, None, "unchanged link reports nothing");
    }

    #[test]
    fn link_marked_in_markup_is_reported_as_previous() {
        let mut view = page().with_active_link(Some(0));
        assert_eq!(view.active_link(), Some(0));
        let changes = view.recompute(&at(900.0), |_| None);
        assert_eq!(
            changes.nav,
            Some(NavChange {
                previous: Some(0),
                current: Some(1)
            })
        );
        assert_eq!(page().with_active_link(Some(7)).active_link(), None);
    }

    #[test]
    fn gap_between_sections_keeps_previous_link() {
        let mut view = ViewState::new(
            ScrollConfig::new(),
            vec![Section::new("a", 0.0, 500.0), Section::new("b", 900.0, 500.0)],
            vec!["#a".to_string(), "#b".to_string()],
            0,
            None,
        );
        view.recompute(&at(0.0), |_| None);
        let changes = view.recompute(&at(500.0), |_| None);
        assert_eq!(changes.nav, None);
        assert_eq!(view.active_link(), Some(0));
    }

    #[test]
    fn overlapping_sections_resolve_to_last_match() {
        let sections = [Section::new("a", 0.0, 1000.0), Section::new("b", 500.0, 1000.0)];
        assert_eq!(active_section(&sections, 600.0, 100.0), Some(1));
        assert_eq!(active_section(&sections, 0.0, 100.0), Some(0));
        assert_eq!(active_section(&sections, 5000.0, 100.0), None);
    }

    #[test]
    fn progress_is_clamped_and_safe_for_short_pages() {
        assert_eq!(progress_fraction(&at(650.0)), 0.5);
        assert_eq!(progress_fraction(&at(5000.0)), 1.0);
        assert_eq!(progress_fraction(&at(-20.0)), 0.0);
        let short = ScrollMetrics {
            scroll_y: 0.0,
            viewport_height: 900.0,
            document_height: 900.0,
        };
        assert_eq!(progress_fraction(&short), 0.0);
    }

    #[test]
    fn navbar_flag_reported_only_on_flip() {
        let mut view = page();
        assert_eq!(view.recompute(&at(10.0), |_| None).navbar_scrolled, None);
        assert_eq!(view.recompute(&at(51.0), |_| None).navbar_scrolled, Some(true));
        assert_eq!(view.recompute(&at(300.0), |_| None).navbar_scrolled, None);
        assert_eq!(view.recompute(&at(50.0), |_| None).navbar_scrolled, Some(false));
    }

    #[test]
    fn fallback_reveal_latches_once() {
        let mut view = page();
        let mut asked = Vec::new();
        let changes = view.recompute(&at(0.0), |i| {
            asked.push(i);
            Some(if i == 0 { 600.0 } else { 700.0 })
        });
        assert_eq!(changes.revealed, [0], "600 < 800 - 150");
        assert_eq!(asked, [0, 1]);

        let mut asked = Vec::new();
        let changes = view.recompute(&at(100.0), |i| {
            asked.push(i);
            Some(-5000.0)
        });
        assert_eq!(changes.revealed, [1]);
        assert_eq!(asked, [1], "latched items are not measured again");
        assert!(view.is_revealed(0) && view.is_revealed(1));
    }

    #[test]
    fn parallax_deeper_elements_move_faster() {
        let mut view = page();
        let changes = view.recompute(&at(200.0), |_| None);
        assert_eq!(changes.parallax.len(), 2);
        assert!((changes.parallax[0] - -10.0).abs() < 1e-9);
        assert!((changes.parallax[1] - -20.0).abs() < 1e-9);
        let xf = changes.parallax_transform(1).expect("two parallax layers");
        assert!((xf.as_coeffs()[5] - -20.0).abs() < 1e-9);
        assert!(changes.parallax_transform(2).is_none());
    }

    #[test]
    fn scroll_and_resize_are_rate_limited() {
        let mut view = page();
        let mut timers = ManualTimers::new();
        assert_eq!(view.on_scroll(&mut timers), Gate::Run);
        timers.set_now(HostTime(5));
        assert_eq!(view.on_scroll(&mut timers), Gate::Deferred);
        let fired = timers.advance(Duration(20));
        assert_eq!(fired, [Timeout::ScrollTrailing]);
        assert!(view.on_timeout(Timeout::ScrollTrailing, HostTime(16)));

        view.on_resize(&mut timers);
        timers.set_now(HostTime(100));
        view.on_resize(&mut timers);
        assert_eq!(timers.count(Timeout::ResizeSettled), 1);
        assert_eq!(timers.deadline_of(Timeout::ResizeSettled), Some(HostTime(350)));
        assert!(!view.on_timeout(Timeout::CarouselAdvance, HostTime(100)));
    }

    #[test]
    fn link_scroll_target_leaves_room_for_navbar() {
        let view = page();
        assert_eq!(view.link_scroll_target(1), Some(720.0));
        assert_eq!(view.link_scroll_target(0), Some(0.0));
        assert_eq!(view.link_scroll_target(9), None);
    }

    proptest! {
        #[test]
        fn at_most_one_link_and_it_contains_the_offset_line(scrolls in proptest::collection::vec(-200.0_f64..3000.0, 1..40)) {
            let mut view = page();
            for s in scrolls {
                view.recompute(&at(s), |_| None);
                if let Some(link) = view.active_link() {
                    // Links and sections share indices in this fixture.
                    let section = &view.sections()[link];
                    let line = s + 100.0;
                    let still_inside = section.contains(line);
                    let in_gap = active_section(view.sections(), s, 100.0).is_none();
                    prop_assert!(still_inside || in_gap, "link {} active at scroll {}", link, s);
                }
            }
        }
    }
}
