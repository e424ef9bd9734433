// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared page state and the dispatch loop every browser callback goes
//! through.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use web_sys::Window;

use vitrine_backend_web::{
    DomMeasure, DomPresenter, Observers, Presenter as _, RafLoop, WebTimers,
};
use vitrine_core::backend::Effect;
use vitrine_core::form::SubmitError;
use vitrine_core::page::{Context, Page};
use vitrine_core::trace::Tracer;

use crate::trace::DebugTraceSink;

/// Everything a browser callback needs.
pub(crate) struct App {
    pub(crate) page: Page,
    pub(crate) timers: WebTimers,
    pub(crate) measure: DomMeasure,
    pub(crate) presenter: DomPresenter,
    pub(crate) window: Window,
    pub(crate) endpoint: Option<String>,
    pub(crate) trace: Option<DebugTraceSink>,
    pub(crate) frames: RafLoop,
    pub(crate) observers: Observers,
}

impl core::fmt::Debug for App {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("App")
            .field("page", &self.page)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

pub(crate) type Shared = Rc<RefCell<App>>;

/// Runs `handler` against the page, applies its effects, and starts
/// whatever follow-up work they call for.
pub(crate) fn dispatch(
    app: &Shared,
    handler: impl FnOnce(&mut Page, &mut Context<'_>) -> Vec<Effect>,
) {
    let sends = {
        let Ok(mut guard) = app.try_borrow_mut() else {
            tracing::warn!("re-entrant page event dropped");
            return;
        };
        let App {
            page,
            timers,
            measure,
            presenter,
            trace,
            frames,
            ..
        } = &mut *guard;
        let tracer = match trace {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        let mut cx = Context::new(timers, &*measure).with_tracer(tracer);
        let effects = handler(page, &mut cx);
        presenter.apply(&effects);
        if page.wants_frames() {
            frames.start();
        }
        effects
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Send(data) => Some(data),
                _ => None,
            })
            .collect::<Vec<_>>()
    };
    for data in sends {
        send(app, &data);
    }
}

/// Hands form data to the configured endpoint and reports the outcome back.
fn send(app: &Shared, data: &[(String, String)]) {
    let weak = Rc::downgrade(app);
    let settle = move |outcome: Result<(), SubmitError>| {
        if let Err(err) = &outcome {
            tracing::info!(%err, "submission failed");
        } else {
            tracing::info!("submission delivered");
        }
        if let Some(app) = weak.upgrade() {
            dispatch(&app, |page, cx| page.submission_settled(cx, outcome));
        }
    };
    let target = app
        .try_borrow()
        .ok()
        .and_then(|app| Some((app.window.clone(), app.endpoint.clone()?)));
    match target {
        Some((window, endpoint)) => {
            vitrine_backend_web::post_form(&window, &endpoint, data, settle);
        }
        None => settle(Err(SubmitError::Network(String::from(
            "no endpoint configured",
        )))),
    }
}

/// A frame loop that animates counters until none is running.
pub(crate) fn frame_loop(app: Weak<RefCell<App>>) -> RafLoop {
    RafLoop::new(move |_now| {
        let Some(app) = app.upgrade() else {
            return false;
        };
        dispatch(&app, |page, _| page.on_frame());
        app.try_borrow().is_ok_and(|app| app.page.wants_frames())
    })
}
