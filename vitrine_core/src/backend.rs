// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! Vitrine splits platform-specific work into a *backend* crate. A backend
//! provides the following pieces:
//!
//! - **Timers**: A [`TimerHost`](crate::timer::TimerHost) whose elapsed
//!   timers are routed back to [`Page::on_timeout`](crate::page::Page::on_timeout).
//!
//! - **Frames**: A frame loop (`requestAnimationFrame` on the web) that calls
//!   [`Page::on_frame`](crate::page::Page::on_frame) while
//!   [`Page::wants_frames`](crate::page::Page::wants_frames) is true.
//!
//! - **Measurement**: Implements [`Measure`] so the page can read scroll
//!   position and layout when a scroll or resize tick runs.
//!
//! - **Presenter**: Implements the [`Presenter`] trait to apply [`Effect`]s
//!   to the document.
//!
//! # Crate boundaries
//!
//! `vitrine_core` owns the state machines, the page coordinator, and this
//! contract module. The backend crate depends on `vitrine_core` and provides
//! platform glue. The application crate depends on both and wires DOM events
//! to [`Page`](crate::page::Page) methods.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::carousel::SlideChange;
use crate::filter::FilterChange;
use crate::form::FieldError;
use crate::intro::Entrance;
use crate::nav::PageChange;
use crate::notify::NoticeChange;
use crate::view_state::{ScrollMetrics, Section, ViewChanges};
use crate::viewport::ObserverGroup;

/// One presentation step produced by the page.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Scroll-derived state changed.
    View(ViewChanges),
    /// Reveal item latched through the native observer.
    Reveal(usize),
    /// Show a counter value.
    Counter {
        /// Counter index.
        index: usize,
        /// Value to display.
        value: u64,
    },
    /// Set a skill bar's width.
    SkillBar {
        /// Bar index.
        index: usize,
        /// Width in percent.
        width: f64,
    },
    /// Carousel moved.
    Slide(SlideChange),
    /// Filter selection changed.
    Filter(FilterChange),
    /// Dropdown select opened or closed.
    Dropdown {
        /// New state.
        open: bool,
    },
    /// Show or clear a field error.
    FieldError {
        /// Field index.
        field: usize,
        /// Error to show, or `None` to clear.
        error: Option<FieldError>,
    },
    /// Toggle the submit control's busy state.
    Submitting(bool),
    /// Empty every form field.
    ClearFields,
    /// Hand the form data to the external submitter.
    Send(Vec<(String, String)>),
    /// A notice lifecycle step.
    Notice(NoticeChange),
    /// Replace the typing text.
    Typing(String),
    /// Hide the loading screen and re-enable scrolling.
    LoadingDone,
    /// Start a hero element's entrance animation.
    Entrance(Entrance),
    /// Mobile menu opened or closed.
    Menu {
        /// New state.
        open: bool,
    },
    /// Sidebar opened or closed.
    Sidebar {
        /// New state.
        open: bool,
    },
    /// Tab-like page switch.
    Pages(PageChange),
    /// Smooth-scroll the window.
    ScrollTo(f64),
    /// Testimonial modal opened or closed.
    Modal {
        /// New state.
        open: bool,
        /// Testimonial to copy in, when the content changes.
        item: Option<usize>,
    },
}

/// Applies page effects to a platform-native document.
///
/// The DOM presenter implements this trait, enabling generic event wiring
/// and recording test doubles.
///
/// ```rust,ignore
/// let effects = page.on_timeout(&mut cx, purpose);
/// presenter.apply(&effects);
/// ```
pub trait Presenter {
    /// Applies `effects` in order.
    fn apply(&mut self, effects: &[Effect]);
}

/// Read-only layout queries the page makes on scroll and resize ticks.
pub trait Measure {
    /// Current scroll position and window/document heights.
    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Current section layout, re-read after a resize settles.
    fn sections(&self) -> Vec<Section>;

    /// Viewport-relative top of reveal item `i`.
    fn reveal_top(&self, i: usize) -> Option<f64>;

    /// The viewport rectangle, in the same space as [`target_bounds`].
    ///
    /// [`target_bounds`]: Measure::target_bounds
    fn viewport(&self) -> Rect;

    /// Bounding rectangles of every target in `group`, for pages without a
    /// native intersection observer.
    fn target_bounds(&self, group: ObserverGroup) -> Vec<Rect>;
}

/// A [`Presenter`] that stores every effect, for tests and headless runs.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    /// Effects applied so far.
    pub effects: Vec<Effect>,
}

impl Presenter for RecordingPresenter {
    fn apply(&mut self, effects: &[Effect]) {
        self.effects.extend_from_slice(effects);
    }
}

/// A [`Measure`] answering from fixed values, for tests and headless runs.
#[derive(Clone, Debug, Default)]
pub struct StaticLayout {
    /// Reported scroll metrics.
    pub metrics: ScrollMetrics,
    /// Reported sections.
    pub sections: Vec<Section>,
    /// Reported reveal tops.
    pub reveal_tops: Vec<f64>,
    /// Reported viewport.
    pub viewport: Rect,
    /// Reported counter bounds.
    pub counter_bounds: Vec<Rect>,
    /// Reported skill bar bounds.
    pub skill_bar_bounds: Vec<Rect>,
}

impl Measure for StaticLayout {
    fn scroll_metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    fn sections(&self) -> Vec<Section> {
        self.sections.clone()
    }

    fn reveal_top(&self, i: usize) -> Option<f64> {
        self.reveal_tops.get(i).copied()
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn target_bounds(&self, group: ObserverGroup) -> Vec<Rect> {
        match group {
            ObserverGroup::Reveal => Vec::new(),
            ObserverGroup::Counters => self.counter_bounds.clone(),
            ObserverGroup::SkillBars => self.skill_bar_bounds.clone(),
        }
    }
}
