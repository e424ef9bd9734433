// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersection-based visibility detection.
//!
//! [`ViewportObserver`] tracks a fixed list of targets and latches each one
//! the first time its visible fraction reaches the configured threshold. Input
//! comes either from a native observer ([`Entry`] values carrying the ratio
//! the browser computed) or from element bounds measured by the caller
//! ([`ViewportObserver::measure`]), which is what the scroll fallback and the
//! initial attach use.
//!
//! Geometry is in CSS pixels, in the viewport's coordinate space
//! (`getBoundingClientRect`).

use alloc::vec::Vec;

use kurbo::Rect;

/// Visibility predicate parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObserverSpec {
    /// Minimum visible fraction of the target, in `[0, 1]`.
    pub threshold: f64,
    /// Adjustment of the viewport's bottom edge in pixels. Negative values
    /// shrink the viewport so targets trigger slightly after they enter.
    pub bottom_margin: f64,
}

impl ObserverSpec {
    /// Predicate for scroll reveals: 10% visible, 50px inside the bottom edge.
    #[must_use]
    pub const fn reveal() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: -50.0,
        }
    }

    /// Predicate for counters and skill bars: half visible.
    #[must_use]
    pub const fn half_visible() -> Self {
        Self {
            threshold: 0.5,
            bottom_margin: 0.0,
        }
    }

    /// Returns the root rectangle after applying the margin.
    #[must_use]
    pub fn root(&self, viewport: Rect) -> Rect {
        Rect::new(
            viewport.x0,
            viewport.y0,
            viewport.x1,
            (viewport.y1 + self.bottom_margin).max(viewport.y0),
        )
    }

    /// Returns the fraction of `target` visible inside the margin-adjusted
    /// `viewport`.
    ///
    /// Zero-area targets (an empty skill bar, say) count as fully visible when
    /// they touch the root and invisible otherwise.
    #[must_use]
    pub fn ratio(&self, target: Rect, viewport: Rect) -> f64 {
        let root = self.root(viewport);
        let area = target.area();
        if area <= 0.0 {
            let touches = target.x0 <= root.x1
                && target.x1 >= root.x0
                && target.y0 <= root.y1
                && target.y1 >= root.y0;
            return if touches { 1.0 } else { 0.0 };
        }
        let inter = target.intersect(root);
        (inter.area() / area).clamp(0.0, 1.0)
    }

    /// Whether a target with the given visible fraction satisfies the spec.
    #[must_use]
    pub fn is_satisfied(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

impl Default for ObserverSpec {
    fn default() -> Self {
        Self::reveal()
    }
}

/// The observed element groups on a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObserverGroup {
    /// Scroll reveals.
    Reveal,
    /// Animated counters.
    Counters,
    /// Skill bars.
    SkillBars,
}

/// What happens to a target after it first satisfies the predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObserveMode {
    /// Fire once, then stop observing (counters, skill bars).
    Once,
    /// Latch the active flag but keep observing (scroll reveals).
    Persistent,
}

/// One visibility report from a native observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry {
    /// Index of the target, as registered.
    pub target: usize,
    /// Visible fraction reported by the platform.
    pub ratio: f64,
}

#[derive(Clone, Copy, Debug, Default)]
struct TargetState {
    active: bool,
    observing: bool,
    intersecting: bool,
}

/// Latches targets as they scroll into view.
#[derive(Clone, Debug)]
pub struct ViewportObserver {
    spec: ObserverSpec,
    mode: ObserveMode,
    targets: Vec<TargetState>,
}

impl ViewportObserver {
    /// Creates an observer over `count` targets, all observed and inactive.
    #[must_use]
    pub fn new(spec: ObserverSpec, mode: ObserveMode, count: usize) -> Self {
        Self {
            spec,
            mode,
            targets: alloc::vec![
                TargetState {
                    observing: true,
                    ..TargetState::default()
                };
                count
            ],
        }
    }

    /// The predicate in use.
    #[must_use]
    pub const fn spec(&self) -> &ObserverSpec {
        &self.spec
    }

    /// Number of registered targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if no targets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Whether target `i` has latched.
    #[must_use]
    pub fn is_active(&self, i: usize) -> bool {
        self.targets.get(i).is_some_and(|t| t.active)
    }

    /// Whether target `i` is still being observed.
    #[must_use]
    pub fn is_observing(&self, i: usize) -> bool {
        self.targets.get(i).is_some_and(|t| t.observing)
    }

    /// Returns `true` once every target has latched.
    #[must_use]
    pub fn all_active(&self) -> bool {
        self.targets.iter().all(|t| t.active)
    }

    /// Initial observation: targets already satisfying the predicate fire
    /// immediately rather than waiting for the next viewport change.
    ///
    /// `bounds[i]` is target `i`'s bounding rectangle.
    pub fn attach(&mut self, bounds: &[Rect], viewport: Rect) -> Vec<usize> {
        self.measure(bounds, viewport)
    }

    /// Re-measures every observed target against `viewport` and returns the
    /// ones that latched during this call.
    pub fn measure(&mut self, bounds: &[Rect], viewport: Rect) -> Vec<usize> {
        let spec = self.spec;
        self.entries(bounds.iter().enumerate().map(|(target, &rect)| Entry {
            target,
            ratio: spec.ratio(rect, viewport),
        }))
    }

    /// Applies platform-reported entries and returns the targets that latched
    /// during this call, in entry order.
    ///
    /// Entries for unknown or unobserved targets are ignored.
    pub fn entries(&mut self, entries: impl IntoIterator<Item = Entry>) -> Vec<usize> {
        let mut fired = Vec::new();
        for entry in entries {
            let Some(state) = self.targets.get_mut(entry.target) else {
                continue;
            };
            if !state.observing {
                continue;
            }
            let satisfied = self.spec.is_satisfied(entry.ratio);
            let entering = satisfied && !state.intersecting;
            state.intersecting = satisfied;
            if !entering || state.active {
                continue;
            }
            state.active = true;
            if self.mode == ObserveMode::Once {
                state.observing = false;
            }
            fired.push(entry.target);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

    #[test]
    fn ratio_accounts_for_bottom_margin() {
        let spec = ObserverSpec::reveal();
        // 100px tall element whose top sits 30px above the viewport bottom.
        let el = Rect::new(0.0, 770.0, 100.0, 870.0);
        assert_eq!(spec.ratio(el, VIEWPORT), 0.0, "hidden by the -50px margin");

        let el = Rect::new(0.0, 700.0, 100.0, 800.0);
        let ratio = spec.ratio(el, VIEWPORT);
        assert!((ratio - 0.5).abs() < 1e-9, "expected half visible, got {ratio}");
    }

    #[test]
    fn zero_area_targets_use_touch_test() {
        let spec = ObserverSpec::half_visible();
        let bar = Rect::new(10.0, 300.0, 10.0, 310.0);
        assert_eq!(spec.ratio(bar, VIEWPORT), 1.0);
        let below = Rect::new(10.0, 900.0, 10.0, 910.0);
        assert_eq!(spec.ratio(below, VIEWPORT), 0.0);
    }

    #[test]
    fn already_visible_targets_fire_on_attach() {
        let mut obs = ViewportObserver::new(ObserverSpec::half_visible(), ObserveMode::Once, 2);
        let bounds = [
            Rect::new(0.0, 100.0, 100.0, 200.0),
            Rect::new(0.0, 2000.0, 100.0, 2100.0),
        ];
        assert_eq!(obs.attach(&bounds, VIEWPORT), [0]);
        assert!(obs.is_active(0));
        assert!(!obs.is_observing(0), "one-shot targets are unobserved");
        assert!(obs.is_observing(1));
    }

    #[test]
    fn once_mode_fires_exactly_once() {
        let mut obs = ViewportObserver::new(ObserverSpec::half_visible(), ObserveMode::Once, 1);
        let seen = Entry {
            target: 0,
            ratio: 0.8,
        };
        let gone = Entry {
            target: 0,
            ratio: 0.0,
        };
        assert_eq!(obs.entries([seen]), [0]);
        assert!(obs.entries([gone, seen, gone, seen]).is_empty());
    }

    #[test]
    fn persistent_mode_latches_and_keeps_observing() {
        let mut obs =
            ViewportObserver::new(ObserverSpec::reveal(), ObserveMode::Persistent, 3);
        let fired = obs.entries([
            Entry {
                target: 2,
                ratio: 0.3,
            },
            Entry {
                target: 0,
                ratio: 0.05,
            },
            Entry {
                target: 9,
                ratio: 1.0,
            },
        ]);
        assert_eq!(fired, [2]);
        assert!(obs.is_observing(2));
        assert!(!obs.is_active(0), "below threshold");

        // Leaving the viewport never clears the latch.
        assert!(
            obs.entries([Entry {
                target: 2,
                ratio: 0.0
            }])
            .is_empty()
        );
        assert!(obs.is_active(2));
        assert!(!obs.all_active());
    }
}
