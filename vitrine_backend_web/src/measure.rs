// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout queries against the live document.

use alloc::vec::Vec;

use kurbo::Rect;
use wasm_bindgen::JsValue;
use web_sys::{Element, HtmlElement, Window};

use vitrine_core::backend::Measure;
use vitrine_core::view_state::{ScrollMetrics, Section};
use vitrine_core::viewport::ObserverGroup;

use crate::elements::{PageElements, measure_sections};

/// [`Measure`] reading the window and element boxes.
#[derive(Clone, Debug)]
pub struct DomMeasure {
    window: Window,
    sections: Vec<HtmlElement>,
    reveals: Vec<Element>,
    counters: Vec<Element>,
    skill_bars: Vec<Element>,
}

impl DomMeasure {
    /// Measures the elements found by the startup scan.
    #[must_use]
    pub fn new(window: Window, elements: &PageElements) -> Self {
        Self {
            window,
            sections: elements.sections.clone(),
            reveals: elements.reveals.clone(),
            counters: elements.counters.clone(),
            skill_bars: elements
                .skill_bars
                .iter()
                .cloned()
                .map(Element::from)
                .collect(),
        }
    }

    fn number(value: Result<JsValue, JsValue>) -> f64 {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    }

    fn bounds(el: &Element) -> Rect {
        let r = el.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.right(), r.bottom())
    }
}

impl Measure for DomMeasure {
    fn scroll_metrics(&self) -> ScrollMetrics {
        let document_height = self
            .window
            .document()
            .and_then(|d| d.document_element())
            .map_or(0.0, |e| f64::from(e.scroll_height()));
        ScrollMetrics {
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            viewport_height: Self::number(self.window.inner_height()),
            document_height,
        }
    }

    fn sections(&self) -> Vec<Section> {
        measure_sections(&self.sections)
    }

    fn reveal_top(&self, i: usize) -> Option<f64> {
        self.reveals
            .get(i)
            .map(|el| el.get_bounding_client_rect().top())
    }

    fn viewport(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            Self::number(self.window.inner_width()),
            Self::number(self.window.inner_height()),
        )
    }

    fn target_bounds(&self, group: ObserverGroup) -> Vec<Rect> {
        let targets = match group {
            ObserverGroup::Reveal => &self.reveals,
            ObserverGroup::Counters => &self.counters,
            ObserverGroup::SkillBars => &self.skill_bars,
        };
        targets.iter().map(Self::bounds).collect()
    }
}
