// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `setTimeout` timer host.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use vitrine_core::time::{Duration, HostTime};
use vitrine_core::timer::{TimerHost, TimerId, Timeout};

type TimeoutClosure = Closure<dyn FnMut()>;

struct Scheduled {
    handle: i32,
    closure: TimeoutClosure,
}

struct TimersInner {
    window: Window,
    next_id: Cell<u64>,
    pending: RefCell<BTreeMap<TimerId, Scheduled>>,
    /// Closure of the most recently fired timer. It cannot be dropped while
    /// running, so it is released when the next timer fires.
    spent: RefCell<Vec<TimeoutClosure>>,
    handler: RefCell<Option<Box<dyn FnMut(Timeout)>>>,
}

/// [`TimerHost`] backed by `window.setTimeout`.
///
/// Cloning yields another handle to the same host. Elapsed timers are
/// delivered to the handler installed with [`set_handler`](Self::set_handler),
/// which must not hold a strong reference back to anything owning this host.
#[derive(Clone)]
pub struct WebTimers {
    inner: Rc<TimersInner>,
}

impl core::fmt::Debug for WebTimers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebTimers")
            .field("pending", &self.inner.pending.borrow().len())
            .finish_non_exhaustive()
    }
}

impl WebTimers {
    /// Creates a host with no handler installed.
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self {
            inner: Rc::new(TimersInner {
                window,
                next_id: Cell::new(0),
                pending: RefCell::new(BTreeMap::new()),
                spent: RefCell::new(Vec::new()),
                handler: RefCell::new(None),
            }),
        }
    }

    /// Installs the dispatcher that receives elapsed timers.
    pub fn set_handler(&self, handler: impl FnMut(Timeout) + 'static) {
        *self.inner.handler.borrow_mut() = Some(Box::new(handler));
    }

    /// Number of timers not yet elapsed or cancelled.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    fn fire(inner: &Weak<TimersInner>, id: TimerId, purpose: Timeout) {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let Some(done) = inner.pending.borrow_mut().remove(&id) else {
            return;
        };
        {
            let mut spent = inner.spent.borrow_mut();
            spent.clear();
            spent.push(done.closure);
        }

        // Take the handler out so it may schedule and cancel freely.
        let handler = inner.handler.borrow_mut().take();
        if let Some(mut handler) = handler {
            handler(purpose);
            let mut slot = inner.handler.borrow_mut();
            if slot.is_none() {
                *slot = Some(handler);
            }
        } else {
            tracing::trace!(?purpose, "timer elapsed without a handler");
        }
    }
}

impl TimerHost for WebTimers {
    fn now(&self) -> HostTime {
        crate::now()
    }

    fn schedule(&mut self, delay: Duration, purpose: Timeout) -> TimerId {
        let id = TimerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        let weak = Rc::downgrade(&self.inner);
        let closure = Closure::wrap(Box::new(move || {
            Self::fire(&weak, id, purpose);
        }) as Box<dyn FnMut()>);

        let ms = i32::try_from(delay.millis()).unwrap_or(i32::MAX);
        match self
            .inner
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                ms,
            ) {
            Ok(handle) => {
                self.inner
                    .pending
                    .borrow_mut()
                    .insert(id, Scheduled { handle, closure });
            }
            Err(err) => {
                tracing::warn!(?purpose, ?err, "setTimeout failed");
            }
        }
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(scheduled) = self.inner.pending.borrow_mut().remove(&id) {
            self.inner.window.clear_timeout_with_handle(scheduled.handle);
        }
    }
}
