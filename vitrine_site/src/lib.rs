// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Portfolio page interactivity driven by `vitrine_backend_web`.
//!
//! On load the module scans the document once, builds a [`Page`] from the
//! markup and the optional `#vitrine-config` block, and routes every browser
//! callback (DOM events, timers, intersection reports, animation frames)
//! through a single dispatch function that applies the resulting effects
//! with a [`DomPresenter`].
//!
//! Build with: `wasm-pack build --target web vitrine_site`
//!
//! [`Page`]: vitrine_core::page::Page
//! [`DomPresenter`]: vitrine_backend_web::DomPresenter

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

mod app;
mod config;
mod logging;
mod trace;
mod wire;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;

use vitrine_backend_web::{Dom, DomMeasure, DomPresenter, Observers, PageElements, WebTimers};
use vitrine_core::form::RatioOutcome;
use vitrine_core::page::{Page, SubmitMode};

use crate::app::{App, Shared, dispatch, frame_loop};

/// Entry point, run by `wasm-bindgen` when the module is instantiated.
///
/// Only a missing window or document is an error; every other missing
/// element disables the feature that needs it.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let dom = Dom::global().map_err(|err| JsValue::from_str(&err.to_string()))?;
    let text = dom
        .document()
        .get_element_by_id(config::CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    let (config, rejected) = config::resolve(text.as_deref());
    logging::init(config.log_level);
    if let Some(err) = rejected {
        tracing::warn!(%err, "ignoring #{}, using defaults", config::CONFIG_ELEMENT_ID);
    }

    let elements = PageElements::scan(&dom);
    let observer_supported = Observers::is_supported(dom.window());
    if !observer_supported {
        tracing::info!("IntersectionObserver unavailable, measuring on scroll");
    }
    let mode = if config.form.endpoint.is_some() {
        SubmitMode::External
    } else {
        let seed = js_sys::Math::random().to_bits();
        SubmitMode::Simulated(Box::new(RatioOutcome::new(seed, config.form.success_ratio)))
    };
    let page = Page::new(&config, elements.layout(observer_supported), mode);

    let window = dom.window().clone();
    let timers = WebTimers::new(window.clone());
    let app: Shared = Rc::new_cyclic(|weak: &Weak<RefCell<App>>| {
        let handler = weak.clone();
        timers.set_handler(move |purpose| {
            if let Some(app) = handler.upgrade() {
                dispatch(&app, |page, cx| page.on_timeout(cx, purpose));
            }
        });
        let observers = if observer_supported {
            wire::observe(weak, &config, &elements)
        } else {
            Observers::new()
        };
        RefCell::new(App {
            page,
            timers,
            measure: DomMeasure::new(window.clone(), &elements),
            presenter: DomPresenter::new(window.clone(), elements.clone()),
            window,
            endpoint: config.form.endpoint.clone(),
            trace: config.debug_trace.then(trace::debug_sink),
            frames: frame_loop(weak.clone()),
            observers,
        })
    });

    wire::listen_all(&app, &dom, &elements);
    dispatch(&app, |page, cx| page.start(cx));
    tracing::info!(
        sections = elements.sections.len(),
        slides = elements.slides.len(),
        fields = elements.fields.len(),
        "page ready"
    );

    // Listeners, timers, and observers reach the app through this allocation
    // for as long as the page is open.
    core::mem::forget(app);
    Ok(())
}
