// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page coordinator.
//!
//! [`Page`] owns one instance of every component and turns platform events
//! into [`Effect`] lists. Each handler takes a [`Context`] carrying the
//! timer host, the layout queries, and a tracer, so a page can be driven
//! headlessly with [`ManualTimers`](crate::timer::ManualTimers) and
//! [`StaticLayout`](crate::backend::StaticLayout).
//!
//! ```text
//!   DOM event ──► Page::<handler>(cx, ..) ──► Vec<Effect> ──► Presenter::apply()
//!                       │
//!                       └──► TimerHost::schedule() ──(elapsed)──► Page::on_timeout()
//! ```

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::animate::{CounterBank, SkillBars};
use crate::backend::{Effect, Measure};
use crate::carousel::{ArrowKey, Carousel, SlideChange};
use crate::config::SiteConfig;
use crate::filter::{Dropdown, FilterControl, FilterController};
use crate::form::{ContactForm, FormField, OutcomeSource, SimulatedSubmitter, SubmitError, SubmitStart};
use crate::intro::Intro;
use crate::modal::TestimonialModal;
use crate::nav::{MenuToggle, PageNavigator};
use crate::notify::{NoticeChange, NoticeKind, Notices};
use crate::rate_limit::Gate;
use crate::timer::{TimerHost, Timeout};
use crate::trace::{
    CounterEvent, FilterEvent, NavEvent, NoticeEvent, NoticeStep, RevealEvent, RevealSource,
    SlideCause, SlideEvent, SubmissionEvent, SubmissionPhase, Tracer,
};
use crate::typing::Typewriter;
use crate::view_state::{Section, ViewState};
use crate::viewport::{Entry, ObserveMode, ObserverGroup, ViewportObserver};

/// What the DOM scan found at startup.
#[derive(Clone, Debug, Default)]
pub struct PageLayout {
    /// Sections with an id, in document order.
    pub sections: Vec<Section>,
    /// Nav link `href` values.
    pub nav_links: Vec<String>,
    /// Nav link marked active in the markup.
    pub nav_link_marked_active: Option<usize>,
    /// Number of parallax layers.
    pub parallax_count: usize,
    /// Number of reveal items.
    pub reveal_count: usize,
    /// Whether a native intersection observer is available.
    pub observer_supported: bool,
    /// Counter targets (`data-target`).
    pub counter_targets: Vec<u64>,
    /// Skill bar widths in percent (`data-width`).
    pub skill_widths: Vec<f64>,
    /// Number of testimonial slides.
    pub slide_count: usize,
    /// Filter controls, labelled by their visible text.
    pub filter_controls: Vec<FilterControl>,
    /// Project categories (`data-category`).
    pub filter_categories: Vec<String>,
    /// Contact form fields.
    pub form_fields: Vec<FormField>,
    /// Number of hero elements with an entrance animation.
    pub hero_count: usize,
    /// Page names (`data-page`).
    pub pages: Vec<String>,
    /// Page link texts.
    pub page_links: Vec<String>,
    /// Page link marked active in the markup.
    pub page_link_marked_active: Option<usize>,
}

/// How form submissions are carried out.
pub enum SubmitMode {
    /// Settle after the configured latency with outcomes from the source.
    Simulated(Box<dyn OutcomeSource>),
    /// Emit [`Effect::Send`] and wait for [`Page::submission_settled`].
    External,
}

impl core::fmt::Debug for SubmitMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Simulated(_) => f.write_str("Simulated"),
            Self::External => f.write_str("External"),
        }
    }
}

/// Capabilities handed to every [`Page`] handler.
pub struct Context<'a> {
    /// Timer scheduling.
    pub timers: &'a mut dyn TimerHost,
    /// Layout queries.
    pub measure: &'a dyn Measure,
    /// Structured trace output.
    pub tracer: Tracer<'a>,
}

impl core::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Context")
            .field("now", &self.timers.now())
            .finish_non_exhaustive()
    }
}

impl<'a> Context<'a> {
    /// Creates a context without tracing.
    #[must_use]
    pub fn new(timers: &'a mut dyn TimerHost, measure: &'a dyn Measure) -> Self {
        Self {
            timers,
            measure,
            tracer: Tracer::none(),
        }
    }

    /// Replaces the tracer.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Tracer<'a>) -> Self {
        self.tracer = tracer;
        self
    }
}

enum Submission {
    Simulated(SimulatedSubmitter<Box<dyn OutcomeSource>>),
    External,
}

/// Every interactive component of one page.
pub struct Page {
    view: ViewState,
    observer_supported: bool,
    reveals: ViewportObserver,
    counter_observer: ViewportObserver,
    counter_targets: Vec<u64>,
    counters: CounterBank,
    skill_observer: ViewportObserver,
    skill_bars: SkillBars,
    carousel: Carousel,
    filter: FilterController,
    dropdown: Dropdown,
    form: ContactForm,
    submission: Submission,
    notices: Notices,
    typing: Typewriter,
    intro: Intro,
    menu: MenuToggle,
    sidebar: MenuToggle,
    pages: PageNavigator,
    page_marked_active: Option<usize>,
    modal: TestimonialModal,
}

impl core::fmt::Debug for Page {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Page")
            .field("view", &self.view)
            .field("carousel", &self.carousel)
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Builds the page from configuration and the startup scan.
    #[must_use]
    pub fn new(config: &SiteConfig, layout: PageLayout, mode: SubmitMode) -> Self {
        let counter_count = layout.counter_targets.len();
        let skill_count = layout.skill_widths.len();
        Self {
            view: ViewState::new(
                config.scroll,
                layout.sections,
                layout.nav_links,
                layout.parallax_count,
                (!layout.observer_supported).then_some(layout.reveal_count),
            )
            .with_active_link(layout.nav_link_marked_active),
            observer_supported: layout.observer_supported,
            reveals: ViewportObserver::new(
                config.observer.reveal,
                ObserveMode::Persistent,
                layout.reveal_count,
            ),
            counter_observer: ViewportObserver::new(
                config.observer.counters,
                ObserveMode::Once,
                counter_count,
            ),
            counter_targets: layout.counter_targets,
            counters: CounterBank::new(config.counters, counter_count),
            skill_observer: ViewportObserver::new(
                config.observer.skill_bars,
                ObserveMode::Once,
                skill_count,
            ),
            skill_bars: SkillBars::new(config.skill_bars.delay, layout.skill_widths),
            carousel: Carousel::new(config.carousel, layout.slide_count),
            filter: FilterController::new(layout.filter_controls, layout.filter_categories),
            dropdown: Dropdown::new(),
            form: ContactForm::new(layout.form_fields),
            submission: match mode {
                SubmitMode::Simulated(outcomes) => Submission::Simulated(SimulatedSubmitter::new(
                    config.form.latency,
                    outcomes,
                )),
                SubmitMode::External => Submission::External,
            },
            notices: Notices::new(config.notices),
            typing: Typewriter::new(config.typing.clone()),
            intro: Intro::new(config.intro, layout.hero_count),
            menu: MenuToggle::new(),
            sidebar: MenuToggle::new(),
            pages: PageNavigator::new(layout.pages, layout.page_links),
            page_marked_active: layout.page_link_marked_active,
            modal: TestimonialModal::new(),
        }
    }

    /// Scroll-derived state.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// The carousel.
    #[must_use]
    pub const fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// The filter.
    #[must_use]
    pub const fn filter(&self) -> &FilterController {
        &self.filter
    }

    /// The contact form.
    #[must_use]
    pub const fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Notices on screen.
    #[must_use]
    pub const fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Whether target `i` of `group` still needs intersection reports.
    #[must_use]
    pub fn is_observing(&self, group: ObserverGroup, i: usize) -> bool {
        match group {
            ObserverGroup::Reveal => self.reveals.is_observing(i),
            ObserverGroup::Counters => self.counter_observer.is_observing(i),
            ObserverGroup::SkillBars => self.skill_observer.is_observing(i),
        }
    }

    /// Whether a counter needs animation frames.
    #[must_use]
    pub fn wants_frames(&self) -> bool {
        self.counters.is_running()
    }

    /// Kicks off the timed intro, typing, autoplay, and initial page, and
    /// computes the initial scroll-derived state.
    pub fn start(&mut self, cx: &mut Context<'_>) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.intro.start(cx.timers);
        self.typing.start(cx.timers);
        self.carousel.start_autoplay(cx.timers);

        if !self.pages.is_empty() {
            let initial = self.pages.initial_page(self.page_marked_active).to_owned();
            effects.extend(self.show_page(&initial));
        }

        if !self.observer_supported {
            let viewport = cx.measure.viewport();
            let fired = self
                .counter_observer
                .attach(&cx.measure.target_bounds(ObserverGroup::Counters), viewport);
            self.start_counters(cx, &fired);
            let fired = self
                .skill_observer
                .attach(&cx.measure.target_bounds(ObserverGroup::SkillBars), viewport);
            self.fill_skill_bars(cx, &fired);
        }

        effects.push(self.refresh(cx));
        tracing::info!(
            observer = self.observer_supported,
            slides = self.carousel.len(),
            "page started"
        );
        effects
    }

    /// Window scrolled.
    pub fn on_scroll(&mut self, cx: &mut Context<'_>) -> Vec<Effect> {
        match self.view.on_scroll(cx.timers) {
            Gate::Run => alloc::vec![self.refresh(cx)],
            Gate::Deferred => Vec::new(),
        }
    }

    /// Window resized. Layout is re-read once resizing settles.
    pub fn on_resize(&mut self, cx: &mut Context<'_>) {
        self.view.on_resize(cx.timers);
    }

    /// Routes an elapsed timer to its component.
    pub fn on_timeout(&mut self, cx: &mut Context<'_>, purpose: Timeout) -> Vec<Effect> {
        let now = cx.timers.now();
        let mut effects = Vec::new();
        match purpose {
            Timeout::ScrollTrailing => {
                if self.view.on_timeout(purpose, now) {
                    effects.push(self.refresh(cx));
                }
            }
            Timeout::ResizeSettled => {
                if self.view.on_timeout(purpose, now) {
                    self.view.set_sections(cx.measure.sections());
                    effects.push(self.refresh(cx));
                }
            }
            Timeout::CarouselAdvance => {
                if let Some(change) = self.carousel.on_timeout(cx.timers) {
                    effects.push(self.slid(cx, change, SlideCause::Autoplay));
                }
            }
            Timeout::SubmissionSettled => {
                let settled = match &mut self.submission {
                    Submission::Simulated(sim) => sim.settle(),
                    Submission::External => None,
                };
                if let Some(outcome) = settled {
                    effects.extend(self.submission_settled(cx, outcome));
                }
            }
            Timeout::NoticeShow(_) | Timeout::NoticeDismiss(_) | Timeout::NoticeRemove(_) => {
                if let Some(change) = self.notices.on_timeout(cx.timers, purpose) {
                    effects.push(Self::notice_effect(cx, change));
                }
            }
            Timeout::TypingStep => {
                if let Some(text) = self.typing.on_timeout(cx.timers) {
                    effects.push(Effect::Typing(text.to_owned()));
                }
            }
            Timeout::LoadingDone => {
                if self.intro.on_loading_done(cx.timers) {
                    effects.push(Effect::LoadingDone);
                }
            }
            Timeout::EntranceStep(i) => {
                effects.extend(self.intro.entrance(i).map(Effect::Entrance));
            }
            Timeout::SkillBarFill(i) => {
                effects.extend(
                    self.skill_bars
                        .fill(i)
                        .map(|width| Effect::SkillBar { index: i, width }),
                );
            }
            Timeout::Custom(_) => {}
        }
        effects
    }

    /// Advances running counters by one animation frame.
    pub fn on_frame(&mut self) -> Vec<Effect> {
        self.counters
            .frame()
            .into_iter()
            .map(|(index, value)| Effect::Counter { index, value })
            .collect()
    }

    /// Applies native intersection reports for `group`.
    pub fn on_intersections(
        &mut self,
        cx: &mut Context<'_>,
        group: ObserverGroup,
        entries: &[Entry],
    ) -> Vec<Effect> {
        match group {
            ObserverGroup::Reveal => {
                let fired = self.reveals.entries(entries.iter().copied());
                let at = cx.timers.now();
                fired
                    .into_iter()
                    .map(|target| {
                        cx.tracer.reveal(&RevealEvent {
                            at,
                            target,
                            source: RevealSource::Observer,
                        });
                        Effect::Reveal(target)
                    })
                    .collect()
            }
            ObserverGroup::Counters => {
                let fired = self.counter_observer.entries(entries.iter().copied());
                self.start_counters(cx, &fired);
                Vec::new()
            }
            ObserverGroup::SkillBars => {
                let fired = self.skill_observer.entries(entries.iter().copied());
                self.fill_skill_bars(cx, &fired);
                Vec::new()
            }
        }
    }

    /// A nav link was clicked: scroll to its section and close the menu.
    pub fn nav_link_clicked(&mut self, link: usize) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(top) = self.view.link_scroll_target(link) {
            effects.push(Effect::ScrollTo(top));
        }
        if self.menu.close() {
            effects.push(Effect::Menu { open: false });
        }
        effects
    }

    /// The mobile menu button was clicked.
    pub fn menu_toggled(&mut self) -> Effect {
        Effect::Menu {
            open: self.menu.toggle(),
        }
    }

    /// The sidebar button was clicked.
    pub fn sidebar_toggled(&mut self) -> Effect {
        Effect::Sidebar {
            open: self.sidebar.toggle(),
        }
    }

    /// A tab-like page link was clicked.
    pub fn page_link_clicked(&mut self, link: usize) -> Vec<Effect> {
        match self.pages.link_target(link) {
            Some(name) => {
                let name = name.to_owned();
                self.show_page(&name)
            }
            None => Vec::new(),
        }
    }

    /// The carousel's next button was clicked.
    pub fn carousel_next(&mut self, cx: &mut Context<'_>) -> Vec<Effect> {
        let change = self.carousel.next();
        self.slid_opt(cx, change, SlideCause::Button)
    }

    /// The carousel's previous button was clicked.
    pub fn carousel_prev(&mut self, cx: &mut Context<'_>) -> Vec<Effect> {
        let change = self.carousel.prev();
        self.slid_opt(cx, change, SlideCause::Button)
    }

    /// Indicator `i` was clicked.
    pub fn carousel_goto(&mut self, cx: &mut Context<'_>, i: usize) -> Vec<Effect> {
        let change = self.carousel.goto(i);
        self.slid_opt(cx, change, SlideCause::Indicator)
    }

    /// A key went down. `focus_inside` tells whether focus is within the
    /// carousel.
    pub fn key_down(&mut self, cx: &mut Context<'_>, key: &str, focus_inside: bool) -> Vec<Effect> {
        let Some(arrow) = ArrowKey::from_key(key) else {
            return Vec::new();
        };
        let change = self.carousel.on_key(arrow, focus_inside);
        self.slid_opt(cx, change, SlideCause::Keyboard)
    }

    /// The pointer entered (`true`) or left the carousel.
    pub fn carousel_hover(&mut self, cx: &mut Context<'_>, entering: bool) {
        if entering {
            self.carousel.hover_enter(cx.timers);
        } else {
            self.carousel.hover_leave(cx.timers);
        }
    }

    /// Filter control `i` was chosen from the button group.
    pub fn filter_selected(&mut self, cx: &mut Context<'_>, i: usize) -> Vec<Effect> {
        let Some(change) = self.filter.select(i) else {
            return Vec::new();
        };
        cx.tracer.filter(&FilterEvent {
            at: cx.timers.now(),
            control: change.current,
            visible: change.visible.iter().filter(|v| **v).count(),
            total: change.visible.len(),
        });
        alloc::vec![Effect::Filter(change)]
    }

    /// The dropdown select was clicked.
    pub fn dropdown_toggled(&mut self) -> Effect {
        Effect::Dropdown {
            open: self.dropdown.toggle(),
        }
    }

    /// Dropdown option `i` was chosen.
    pub fn dropdown_selected(&mut self, cx: &mut Context<'_>, i: usize) -> Vec<Effect> {
        let mut effects = alloc::vec![self.dropdown_closed()];
        effects.extend(self.filter_selected(cx, i));
        effects
    }

    /// A dropdown option with text `text` was chosen.
    ///
    /// The list closes even when the text names no filter control.
    pub fn dropdown_option_chosen(&mut self, cx: &mut Context<'_>, text: &str) -> Vec<Effect> {
        match self.filter.position_of(text) {
            Some(i) => self.dropdown_selected(cx, i),
            None => {
                tracing::debug!(option = %text, "dropdown option matches no filter");
                alloc::vec![self.dropdown_closed()]
            }
        }
    }

    /// Closes the dropdown list.
    pub fn dropdown_closed(&mut self) -> Effect {
        self.dropdown.close();
        Effect::Dropdown { open: false }
    }

    /// Field `i` lost focus.
    pub fn field_blur(&mut self, i: usize) -> Vec<Effect> {
        match self.form.blur(i) {
            Some(result) => alloc::vec![Effect::FieldError {
                field: i,
                error: result.err(),
            }],
            None => Vec::new(),
        }
    }

    /// Field `i` was edited.
    pub fn field_input(&mut self, i: usize, value: impl Into<String>) -> Vec<Effect> {
        if self.form.input(i, value) {
            alloc::vec![Effect::FieldError {
                field: i,
                error: None,
            }]
        } else {
            Vec::new()
        }
    }

    /// The form was submitted.
    pub fn submit(&mut self, cx: &mut Context<'_>) -> Vec<Effect> {
        let start = self.form.begin_submit();
        let notice = start.notice();
        let at = cx.timers.now();
        let mut effects = Vec::new();
        match start {
            SubmitStart::Invalid(_) => {
                effects.extend(self.form.fields().iter().enumerate().map(|(field, f)| {
                    Effect::FieldError {
                        field,
                        error: f.error(),
                    }
                }));
                cx.tracer.submission(&SubmissionEvent {
                    at,
                    phase: SubmissionPhase::Invalid,
                });
                if let Some((message, kind)) = notice {
                    effects.extend(self.notify(cx, message, kind));
                }
            }
            SubmitStart::Busy => {}
            SubmitStart::Started(data) => {
                cx.tracer.submission(&SubmissionEvent {
                    at,
                    phase: SubmissionPhase::Started,
                });
                effects.push(Effect::Submitting(true));
                match &mut self.submission {
                    Submission::Simulated(sim) => sim.begin(cx.timers),
                    Submission::External => effects.push(Effect::Send(data)),
                }
            }
        }
        effects
    }

    /// Reports the outcome of a pending submission.
    pub fn submission_settled(
        &mut self,
        cx: &mut Context<'_>,
        outcome: Result<(), SubmitError>,
    ) -> Vec<Effect> {
        let Some(resolution) = self.form.resolve(outcome) else {
            return Vec::new();
        };
        cx.tracer.submission(&SubmissionEvent {
            at: cx.timers.now(),
            phase: if resolution.succeeded {
                SubmissionPhase::Succeeded
            } else {
                SubmissionPhase::Failed
            },
        });
        let mut effects = alloc::vec![Effect::Submitting(false)];
        if resolution.cleared {
            effects.push(Effect::ClearFields);
        }
        effects.extend(self.notify(cx, resolution.notice, resolution.kind));
        effects
    }

    /// Testimonial `i` was clicked.
    pub fn testimonial_clicked(&mut self, i: usize) -> Effect {
        let changed = self.modal.open(i);
        Effect::Modal {
            open: true,
            item: changed.then_some(i),
        }
    }

    /// The modal's close button or overlay was clicked.
    pub fn modal_closed(&mut self) -> Effect {
        self.modal.close();
        Effect::Modal {
            open: false,
            item: None,
        }
    }

    /// Shows a notice.
    pub fn notify(
        &mut self,
        cx: &mut Context<'_>,
        message: &str,
        kind: NoticeKind,
    ) -> Vec<Effect> {
        self.notices
            .show(cx.timers, message, kind)
            .into_iter()
            .map(|change| Self::notice_effect(cx, change))
            .collect()
    }

    fn refresh(&mut self, cx: &mut Context<'_>) -> Effect {
        let metrics = cx.measure.scroll_metrics();
        let measure = cx.measure;
        let changes = self.view.recompute(&metrics, |i| measure.reveal_top(i));
        let at = cx.timers.now();
        if let Some(nav) = changes.nav {
            tracing::debug!(previous = ?nav.previous, current = ?nav.current, "active nav link");
            cx.tracer.nav(&NavEvent {
                at,
                previous: nav.previous,
                current: nav.current,
            });
        }
        for &target in &changes.revealed {
            cx.tracer.reveal(&RevealEvent {
                at,
                target,
                source: RevealSource::ScrollFallback,
            });
        }
        if !self.observer_supported {
            let viewport = measure.viewport();
            let fired = self
                .counter_observer
                .measure(&measure.target_bounds(ObserverGroup::Counters), viewport);
            self.start_counters(cx, &fired);
            let fired = self
                .skill_observer
                .measure(&measure.target_bounds(ObserverGroup::SkillBars), viewport);
            self.fill_skill_bars(cx, &fired);
        }
        Effect::View(changes)
    }

    fn start_counters(&mut self, cx: &mut Context<'_>, fired: &[usize]) {
        for &counter in fired {
            let Some(&target) = self.counter_targets.get(counter) else {
                continue;
            };
            self.counters.start(counter, target);
            cx.tracer.counter(&CounterEvent {
                at: cx.timers.now(),
                counter,
                target,
            });
        }
    }

    fn fill_skill_bars(&mut self, cx: &mut Context<'_>, fired: &[usize]) {
        for &bar in fired {
            self.skill_bars.on_visible(cx.timers, bar);
        }
    }

    fn show_page(&mut self, name: &str) -> Vec<Effect> {
        match self.pages.activate(name) {
            Some(change) => alloc::vec![Effect::Pages(change), Effect::ScrollTo(0.0)],
            None => Vec::new(),
        }
    }

    fn slid(&mut self, cx: &mut Context<'_>, change: SlideChange, cause: SlideCause) -> Effect {
        cx.tracer.slide(&SlideEvent {
            at: cx.timers.now(),
            from: change.from,
            to: change.to,
            cause,
        });
        Effect::Slide(change)
    }

    fn slid_opt(
        &mut self,
        cx: &mut Context<'_>,
        change: Option<SlideChange>,
        cause: SlideCause,
    ) -> Vec<Effect> {
        change
            .map(|c| self.slid(cx, c, cause))
            .into_iter()
            .collect()
    }

    fn notice_effect(cx: &mut Context<'_>, change: NoticeChange) -> Effect {
        let (id, step) = match &change {
            NoticeChange::Created { id, .. } => (*id, NoticeStep::Created),
            NoticeChange::Shown(id) => (*id, NoticeStep::Shown),
            NoticeChange::Hiding(id) => (*id, NoticeStep::Hiding),
            NoticeChange::Removed(id) => (*id, NoticeStep::Removed),
        };
        cx.tracer.notice(&NoticeEvent {
            at: cx.timers.now(),
            id,
            step,
        });
        Effect::Notice(change)
    }
}
