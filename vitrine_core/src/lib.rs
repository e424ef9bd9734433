// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform-agnostic interaction logic for single-page portfolio sites.
//!
//! `vitrine_core` holds every state machine behind a portfolio page: scroll
//! derived navigation state, viewport observation, the testimonial carousel,
//! project filtering, contact form validation and submission, notices, and
//! the timed intro. It is `no_std` compatible (with `alloc`) and never
//! touches a document; a backend crate measures layout, owns the real timers,
//! and applies the [`Effect`](backend::Effect)s the page produces.
//!
//! # Architecture
//!
//! ```text
//!   Backend (DOM events, timers, frames)
//!       │
//!       ▼
//!   Page::<handler>(&mut Context, ..) ──► Vec<Effect> ──► Presenter::apply()
//!       │        │
//!       │        └──► Measure (scroll metrics, sections, bounds)
//!       ▼
//!   TimerHost::schedule() ──(elapsed)──► Page::on_timeout()
//! ```
//!
//! **[`page`]**: The coordinator that owns one instance of every component
//! and routes events and timers to them.
//!
//! **[`timer`]** and **[`rate_limit`]**: Timer identities, the
//! [`TimerHost`](timer::TimerHost) seam, a manual host for tests, and the
//! throttle and debounce gates built on it.
//!
//! **[`view_state`]**: Active section, navbar state, scroll progress,
//! parallax offsets, and the reveal fallback, recomputed per scroll tick.
//!
//! **[`viewport`]**: Threshold and margin based visibility latching, fed
//! either by a native observer or by measured bounds.
//!
//! **[`animate`]**, **[`carousel`]**, **[`filter`]**, **[`form`]**,
//! **[`notify`]**, **[`typing`]**, **[`intro`]**, **[`nav`]**, and
//! **[`modal`]**: The individual components.
//!
//! **[`backend`]**: The [`Presenter`](backend::Presenter) and
//! [`Measure`](backend::Measure) traits backends implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `serde` (disabled by default): Deserialization for [`config`] types.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animate;
pub mod backend;
pub mod carousel;
pub mod config;
pub mod error;
pub mod filter;
pub mod form;
pub mod intro;
pub mod modal;
pub mod nav;
pub mod notify;
pub mod page;
pub mod rate_limit;
pub mod time;
pub mod timer;
pub mod trace;
pub mod typing;
pub mod view_state;
pub mod viewport;
