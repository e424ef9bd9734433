// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for vitrine.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`WebTimers`]: `setTimeout` implementation of
//!   [`TimerHost`](vitrine_core::timer::TimerHost)
//! - [`RafLoop`]: `requestAnimationFrame` loop for counter frames
//! - [`Observers`]: `IntersectionObserver` adapter
//! - [`Dom`] and [`PageElements`]: element lookup with a uniform
//!   missing-element policy
//! - [`DomMeasure`]: layout queries
//! - [`DomPresenter`]: applies page effects to the document
//! - [`post_form`]: `fetch` submission of the contact form

#![no_std]

extern crate alloc;

mod css;
mod dom;
mod elements;
mod measure;
mod observer;
mod presenter;
mod raf;
mod submit;
mod timers;

pub use dom::{Dom, DomError};
pub use elements::{FilterPresentation, PageElements};
pub use measure::DomMeasure;
pub use observer::Observers;
pub use presenter::DomPresenter;
pub use raf::RafLoop;
pub use submit::{encode_form, post_form};
pub use timers::WebTimers;
pub use vitrine_core::backend::Presenter;

use vitrine_core::time::HostTime;

/// Returns the current host time from `performance.now()`.
#[must_use]
pub fn now() -> HostTime {
    HostTime::from_high_res(raf::performance_now())
}
