// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Applies page effects to the document.
//!
//! Cosmetic writes (classes, inline styles, text) ignore their `Result`;
//! a failed style write leaves the page usable.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString as _};

use wasm_bindgen::JsCast as _;
use web_sys::{
    Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement, ScrollBehavior, ScrollToOptions,
    Window,
};

use vitrine_core::backend::{Effect, Presenter};
use vitrine_core::carousel::SlideChange;
use vitrine_core::filter::FilterChange;
use vitrine_core::form::FieldError;
use vitrine_core::intro::Entrance;
use vitrine_core::nav::PageChange;
use vitrine_core::notify::{NoticeChange, NoticeId};
use vitrine_core::view_state::ViewChanges;

use crate::css;
use crate::elements::{FilterPresentation, PageElements};

/// Maps [`Effect`]s onto the elements found by the startup scan.
pub struct DomPresenter {
    window: Window,
    elements: PageElements,
    notices: BTreeMap<NoticeId, HtmlElement>,
    submit_html: Option<String>,
}

impl core::fmt::Debug for DomPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter")
            .field("notices", &self.notices.len())
            .finish_non_exhaustive()
    }
}

fn set_active(el: &Element, active: bool) {
    let _ = el.class_list().toggle_with_force("active", active);
}

fn set_active_at(list: &[Element], i: Option<usize>, active: bool) {
    if let Some(el) = i.and_then(|i| list.get(i)) {
        set_active(el, active);
    }
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

impl DomPresenter {
    /// Creates a presenter over the scanned elements.
    #[must_use]
    pub fn new(window: Window, elements: PageElements) -> Self {
        let submit_html = elements.submit.as_ref().map(|b| b.inner_html());
        Self {
            window,
            elements,
            notices: BTreeMap::new(),
            submit_html,
        }
    }

    /// The scanned elements.
    #[must_use]
    pub fn elements(&self) -> &PageElements {
        &self.elements
    }

    fn view(&self, changes: &ViewChanges) {
        let e = &self.elements;
        if let Some(nav) = changes.nav {
            set_active_at(&e.nav_links, nav.previous, false);
            set_active_at(&e.nav_links, nav.current, true);
        }
        if let (Some(scrolled), Some(navbar)) = (changes.navbar_scrolled, &e.navbar) {
            let _ = navbar.class_list().toggle_with_force("scrolled", scrolled);
        }
        if let Some(bar) = &e.scroll_progress {
            set_style(bar, "transform", &css::matrix(changes.progress_transform()));
        }
        for &i in &changes.revealed {
            self.reveal(i);
        }
        for (i, el) in e.parallax.iter().enumerate() {
            if let Some(xf) = changes.parallax_transform(i) {
                set_style(el, "transform", &css::matrix(xf));
            }
        }
    }

    fn reveal(&self, i: usize) {
        if let Some(el) = self.elements.reveals.get(i) {
            set_active(el, true);
        }
    }

    fn slide(&self, change: SlideChange) {
        let e = &self.elements;
        for list in [&e.slides, &e.dots] {
            set_active_at(list, Some(change.from), false);
            set_active_at(list, Some(change.to), true);
        }
    }

    fn filter(&self, change: &FilterChange) {
        let e = &self.elements;
        set_active_at(&e.filter_controls, Some(change.previous), false);
        set_active_at(&e.filter_controls, Some(change.current), true);
        if let Some(value) = &e.select_value {
            value.set_inner_text(&change.label);
        }
        for (item, &visible) in e.filter_items.iter().zip(&change.visible) {
            match e.filter_presentation {
                FilterPresentation::Display => {
                    if visible {
                        set_style(item, "display", "block");
                        set_style(item, "animation", css::FILTER_FADE_IN);
                    } else {
                        set_style(item, "display", "none");
                    }
                }
                FilterPresentation::ActiveClass => set_active(item, visible),
            }
        }
    }

    fn field_error(&self, field: usize, error: Option<FieldError>) {
        let Some(input) = self.elements.fields.get(field) else {
            return;
        };
        let existing = input
            .parent_element()
            .and_then(|p| p.query_selector(".error-message").ok().flatten());
        match error {
            Some(error) => {
                set_style(input, "border-color", css::ERROR_BORDER);
                let message = existing.or_else(|| {
                    let doc = input.owner_document()?;
                    let span = doc.create_element("span").ok()?;
                    span.set_class_name("error-message");
                    let _ = span.set_attribute("style", css::ERROR_MESSAGE_STYLE);
                    let _ = input.parent_element()?.append_child(&span);
                    Some(span)
                });
                if let Some(message) = message {
                    message.set_text_content(Some(&error.to_string()));
                }
            }
            None => {
                let _ = input.style().remove_property("border-color");
                if let Some(message) = existing {
                    message.remove();
                }
            }
        }
    }

    fn submitting(&self, busy: bool) {
        let Some(button) = &self.elements.submit else {
            return;
        };
        if busy {
            button.set_inner_html(css::SENDING_HTML);
            let _ = button.set_attribute("disabled", "");
        } else {
            if let Some(html) = &self.submit_html {
                button.set_inner_html(html);
            }
            let _ = button.remove_attribute("disabled");
        }
    }

    fn clear_fields(&self) {
        for field in &self.elements.fields {
            if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
                input.set_value("");
            } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
                area.set_value("");
            }
        }
    }

    fn notice(&mut self, change: &NoticeChange) {
        match change {
            NoticeChange::Created { id, kind, message } => {
                let Some(body) = &self.elements.body else {
                    return;
                };
                let Some(el) = body
                    .owner_document()
                    .and_then(|d| d.create_element("div").ok())
                    .and_then(|e| e.dyn_into::<HtmlElement>().ok())
                else {
                    return;
                };
                el.set_class_name(&alloc::format!("notification {}", kind.class_name()));
                let _ = el.set_attribute("style", css::NOTICE_STYLE);
                set_style(&el, "background", css::notice_background(*kind));
                el.set_text_content(Some(message));
                let _ = body.append_child(&el);
                self.notices.insert(*id, el);
            }
            NoticeChange::Shown(id) => {
                if let Some(el) = self.notices.get(id) {
                    set_style(el, "transform", css::NOTICE_SHOWN);
                }
            }
            NoticeChange::Hiding(id) => {
                if let Some(el) = self.notices.get(id) {
                    set_style(el, "transform", css::NOTICE_HIDDEN);
                }
            }
            NoticeChange::Removed(id) => {
                if let Some(el) = self.notices.remove(id) {
                    el.remove();
                }
            }
        }
    }

    fn loading_done(&self) {
        if let Some(screen) = &self.elements.loading_screen {
            let _ = screen.class_list().add_1("hidden");
        }
        if let Some(body) = &self.elements.body {
            set_style(body, "overflow", "visible");
            let _ = body.class_list().add_1("loaded");
        }
    }

    fn entrance(&self, entrance: Entrance) {
        if let Some(el) = self.elements.hero.get(entrance.index) {
            set_style(
                el,
                "animation",
                &css::entrance_animation(entrance.animation_delay),
            );
        }
    }

    fn pages(&self, change: &PageChange) {
        for (el, &active) in self.elements.pages.iter().zip(&change.pages) {
            set_active(el, active);
        }
        for (el, &active) in self.elements.page_links.iter().zip(&change.links) {
            set_active(el, active);
        }
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn modal(&self, open: bool, item: Option<usize>) {
        let e = &self.elements;
        for el in [&e.modal_container, &e.overlay].into_iter().flatten() {
            set_active(el, open);
        }
        let Some(source) = item.and_then(|i| e.testimonials.get(i)) else {
            return;
        };
        let find = |selector: &str| source.query_selector(selector).ok().flatten();
        if let (Some(avatar), Some(img)) = (find("[data-testimonials-avatar]"), &e.modal_img) {
            if let Some(src) = avatar.get_attribute("src") {
                img.set_src(&src);
            }
            if let Some(alt) = avatar.get_attribute("alt") {
                img.set_alt(&alt);
            }
        }
        if let (Some(title), Some(target)) = (find("[data-testimonials-title]"), &e.modal_title) {
            target.set_inner_html(&title.inner_html());
        }
        if let (Some(text), Some(target)) = (find("[data-testimonials-text]"), &e.modal_text) {
            target.set_inner_html(&text.inner_html());
        }
    }
}

impl Presenter for DomPresenter {
    fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::View(changes) => self.view(changes),
                Effect::Reveal(i) => self.reveal(*i),
                Effect::Counter { index, value } => {
                    if let Some(el) = self.elements.counters.get(*index) {
                        el.set_text_content(Some(&value.to_string()));
                    }
                }
                Effect::SkillBar { index, width } => {
                    if let Some(el) = self.elements.skill_bars.get(*index) {
                        set_style(el, "width", &css::percent(*width));
                    }
                }
                Effect::Slide(change) => self.slide(*change),
                Effect::Filter(change) => self.filter(change),
                Effect::Dropdown { open } => {
                    if let Some(select) = &self.elements.select {
                        set_active(select, *open);
                    }
                }
                Effect::FieldError { field, error } => self.field_error(*field, *error),
                Effect::Submitting(busy) => self.submitting(*busy),
                Effect::ClearFields => self.clear_fields(),
                // Handed to the submitter by the caller.
                Effect::Send(_) => {}
                Effect::Notice(change) => self.notice(change),
                Effect::Typing(text) => {
                    if let Some(el) = &self.elements.typing {
                        el.set_text_content(Some(text));
                    }
                }
                Effect::LoadingDone => self.loading_done(),
                Effect::Entrance(entrance) => self.entrance(*entrance),
                Effect::Menu { open } => {
                    let e = &self.elements;
                    for el in [&e.nav_toggle, &e.nav_menu].into_iter().flatten() {
                        set_active(el, *open);
                    }
                }
                Effect::Sidebar { open } => {
                    if let Some(sidebar) = &self.elements.sidebar {
                        set_active(sidebar, *open);
                    }
                }
                Effect::Pages(change) => self.pages(change),
                Effect::ScrollTo(top) => self.scroll_to(*top),
                Effect::Modal { open, item } => self.modal(*open, *item),
            }
        }
    }
}
