// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser event listeners and intersection observers.
//!
//! Listener closures live for the lifetime of the page, so each one is
//! leaked with [`Closure::forget`] once attached.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    KeyboardEvent, Node,
};

use vitrine_backend_web::{Dom, Observers, PageElements};
use vitrine_core::backend::Effect;
use vitrine_core::config::SiteConfig;
use vitrine_core::page::{Context, Page};
use vitrine_core::viewport::ObserverGroup;

use crate::app::{App, Shared, dispatch};

fn listen(
    app: &Shared,
    target: &EventTarget,
    event: &str,
    mut handler: impl FnMut(&Shared, &Event) + 'static,
) {
    let app = Rc::clone(app);
    let closure =
        Closure::wrap(Box::new(move |e: Event| handler(&app, &e)) as Box<dyn FnMut(Event)>);
    if let Err(err) =
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        tracing::warn!(event, ?err, "listener not attached");
    }
    closure.forget();
}

/// Dispatches `handler` on every `event` from `target`.
fn on(
    app: &Shared,
    target: &EventTarget,
    event: &str,
    handler: impl Fn(&mut Page, &mut Context<'_>) -> Vec<Effect> + 'static,
) {
    listen(app, target, event, move |app, _| dispatch(app, &handler));
}

fn field_value(field: &HtmlElement) -> String {
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

fn is_in_page_anchor(link: &Element) -> bool {
    link.get_attribute("href")
        .is_some_and(|href| href.starts_with('#'))
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// Attaches every listener the scanned markup calls for.
pub(crate) fn listen_all(app: &Shared, dom: &Dom, e: &PageElements) {
    window(app, dom);
    navigation(app, e);
    carousel(app, dom, e);
    filter(app, e);
    form(app, e);
    modal(app, e);
}

fn window(app: &Shared, dom: &Dom) {
    let window = dom.window();
    on(app, window, "scroll", |page, cx| page.on_scroll(cx));
    on(app, window, "resize", |page, cx| {
        page.on_resize(cx);
        Vec::new()
    });
    listen(app, window, "pagehide", |app, _| {
        if let Ok(mut app) = app.try_borrow_mut() {
            app.observers.disconnect();
            app.frames.stop();
        }
    });
}

fn navigation(app: &Shared, e: &PageElements) {
    for (i, link) in e.nav_links.iter().enumerate() {
        let in_page = is_in_page_anchor(link);
        listen(app, link, "click", move |app, event| {
            if in_page {
                event.prevent_default();
            }
            dispatch(app, |page, _| page.nav_link_clicked(i));
        });
    }
    if let Some(toggle) = &e.nav_toggle {
        on(app, toggle, "click", |page, _| vec![page.menu_toggled()]);
    }
    if let Some(button) = &e.sidebar_btn {
        on(app, button, "click", |page, _| vec![page.sidebar_toggled()]);
    }
    for (i, link) in e.page_links.iter().enumerate() {
        on(app, link, "click", move |page, _| page.page_link_clicked(i));
    }
}

fn carousel(app: &Shared, dom: &Dom, e: &PageElements) {
    if e.slides.is_empty() {
        return;
    }
    if let Some(prev) = &e.prev {
        on(app, prev, "click", |page, cx| page.carousel_prev(cx));
    }
    if let Some(next) = &e.next {
        on(app, next, "click", |page, cx| page.carousel_next(cx));
    }
    for (i, dot) in e.dots.iter().enumerate() {
        on(app, dot, "click", move |page, cx| page.carousel_goto(cx, i));
    }
    if let Some(carousel) = &e.carousel {
        for (event, entering) in [("mouseenter", true), ("mouseleave", false)] {
            on(app, carousel, event, move |page, cx| {
                page.carousel_hover(cx, entering);
                Vec::new()
            });
        }
    }

    let carousel = e.carousel.clone();
    let document = dom.document().clone();
    listen(app, dom.document(), "keydown", move |app, event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let key = event.key();
        let focus_inside = match (&carousel, document.active_element()) {
            (Some(carousel), Some(active)) => {
                let active: &Node = &active;
                carousel.contains(Some(active))
            }
            _ => false,
        };
        dispatch(app, |page, cx| page.key_down(cx, &key, focus_inside));
    });
}

fn filter(app: &Shared, e: &PageElements) {
    for (i, control) in e.filter_controls.iter().enumerate() {
        on(app, control, "click", move |page, cx| page.filter_selected(cx, i));
    }
    if let Some(select) = &e.select {
        on(app, select, "click", |page, _| vec![page.dropdown_toggled()]);
    }
    for item in &e.select_items {
        let text = item.text_content().unwrap_or_default();
        on(app, item, "click", move |page, cx| {
            page.dropdown_option_chosen(cx, &text)
        });
    }
}

fn form(app: &Shared, e: &PageElements) {
    let Some(form) = &e.form else {
        return;
    };
    for (i, field) in e.fields.iter().enumerate() {
        on(app, field, "blur", move |page, _| page.field_blur(i));
        let source = field.clone();
        on(app, field, "input", move |page, _| {
            page.field_input(i, field_value(&source))
        });
    }

    // Autofill does not always fire `input`; read every value on submit.
    let fields = e.fields.clone();
    listen(app, form, "submit", move |app, event| {
        event.prevent_default();
        let values: Vec<String> = fields.iter().map(field_value).collect();
        dispatch(app, |page, cx| {
            let mut effects = Vec::new();
            for (i, value) in values.into_iter().enumerate() {
                effects.extend(page.field_input(i, value));
            }
            effects.extend(page.submit(cx));
            effects
        });
    });
}

fn modal(app: &Shared, e: &PageElements) {
    for (i, item) in e.testimonials.iter().enumerate() {
        on(app, item, "click", move |page, _| {
            vec![page.testimonial_clicked(i)]
        });
    }
    for el in [&e.modal_close, &e.overlay].into_iter().flatten() {
        on(app, el, "click", |page, _| vec![page.modal_closed()]);
    }
}

// ---------------------------------------------------------------------------
// Intersection observers
// ---------------------------------------------------------------------------

/// Observes reveal items, counters, and skill bars.
///
/// Targets the page no longer needs reports for are unobserved after each
/// batch.
pub(crate) fn observe(
    app: &Weak<RefCell<App>>,
    config: &SiteConfig,
    e: &PageElements,
) -> Observers {
    let mut observers = Observers::new();
    let groups = [
        (ObserverGroup::Reveal, config.observer.reveal, e.reveals.clone()),
        (
            ObserverGroup::Counters,
            config.observer.counters,
            e.counters.clone(),
        ),
        (
            ObserverGroup::SkillBars,
            config.observer.skill_bars,
            e.skill_bars.iter().cloned().map(Element::from).collect(),
        ),
    ];
    for (group, spec, targets) in groups {
        let app = app.clone();
        let result = observers.observe(group, &spec, targets, move |group, entries| {
            let Some(app) = app.upgrade() else {
                return Vec::new();
            };
            dispatch(&app, |page, cx| page.on_intersections(cx, group, entries));
            app.try_borrow()
                .map(|app| {
                    entries
                        .iter()
                        .map(|entry| entry.target)
                        .filter(|&i| !app.page.is_observing(group, i))
                        .collect()
                })
                .unwrap_or_default()
        });
        if let Err(err) = result {
            tracing::warn!(?group, %err, "intersection observer not created");
        }
    }
    observers
}

