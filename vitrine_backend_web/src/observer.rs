// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `IntersectionObserver` adapter.
//!
//! One native observer is created per [`ObserverGroup`], configured from the
//! group's [`ObserverSpec`]. Reports are translated into [`Entry`] values
//! indexed by the target's position in the group. Targets that no longer need
//! reports are unobserved.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{
    Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window,
};

use vitrine_core::viewport::{Entry, ObserverGroup, ObserverSpec};

use crate::dom::DomError;

type EntriesClosure = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// The `rootMargin` string for `spec`.
pub(crate) fn root_margin(spec: &ObserverSpec) -> String {
    format!("0px 0px {}px 0px", spec.bottom_margin)
}

struct Group {
    observer: IntersectionObserver,
    _closure: EntriesClosure,
}

/// The native observers of one page.
pub struct Observers {
    groups: Vec<Group>,
}

impl core::fmt::Debug for Observers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observers")
            .field("groups", &self.groups.len())
            .finish()
    }
}

impl Default for Observers {
    fn default() -> Self {
        Self::new()
    }
}

impl Observers {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Whether the browser provides `IntersectionObserver`.
    #[must_use]
    pub fn is_supported(window: &Window) -> bool {
        js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }

    /// Observes `targets` as `group`.
    ///
    /// `on_entries` receives each batch of reports and returns the targets
    /// that no longer need observing.
    pub fn observe(
        &mut self,
        group: ObserverGroup,
        spec: &ObserverSpec,
        targets: Vec<Element>,
        mut on_entries: impl FnMut(ObserverGroup, &[Entry]) -> Vec<usize> + 'static,
    ) -> Result<(), DomError> {
        if targets.is_empty() {
            return Ok(());
        }
        let targets = Rc::new(targets);
        let lookup = Rc::clone(&targets);
        let stopped = Rc::new(RefCell::new(Vec::<bool>::new()));

        let closure = Closure::wrap(Box::new(move |reports: Array, observer: IntersectionObserver| {
            let entries: Vec<Entry> = reports
                .iter()
                .filter_map(|r| r.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|r| {
                    let el = r.target();
                    let target = lookup.iter().position(|t| *t == el)?;
                    let ratio = if r.is_intersecting() {
                        r.intersection_ratio()
                    } else {
                        0.0
                    };
                    Some(Entry { target, ratio })
                })
                .collect();
            if entries.is_empty() {
                return;
            }
            let mut stopped = stopped.borrow_mut();
            stopped.resize(lookup.len(), false);
            for i in on_entries(group, &entries) {
                if let (Some(el), Some(done)) = (lookup.get(i), stopped.get_mut(i))
                    && !*done
                {
                    *done = true;
                    observer.unobserve(el);
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(spec.threshold));
        init.set_root_margin(&root_margin(spec));
        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)?;
        for el in targets.iter() {
            observer.observe(el);
        }
        tracing::debug!(?group, targets = targets.len(), "observing");
        self.groups.push(Group {
            observer,
            _closure: closure,
        });
        Ok(())
    }

    /// Disconnects every observer.
    pub fn disconnect(&mut self) {
        for group in self.groups.drain(..) {
            group.observer.disconnect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_only_shrinks_bottom() {
        assert_eq!(root_margin(&ObserverSpec::reveal()), "0px 0px -50px 0px");
        assert_eq!(root_margin(&ObserverSpec::half_visible()), "0px 0px 0px 0px");
    }
}
