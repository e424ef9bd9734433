// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The startup scan of the page markup.

use alloc::string::String;
use alloc::vec::Vec;

use wasm_bindgen::JsCast as _;
use web_sys::{Element, HtmlElement, HtmlImageElement};

use vitrine_core::filter::FilterControl;
use vitrine_core::form::{FieldKind, FormField};
use vitrine_core::page::PageLayout;
use vitrine_core::view_state::Section;

use crate::dom::{Dom, all_within, text_of};

/// Elements that get the `reveal` class at startup in addition to any
/// marked up with it.
const AUTO_REVEAL: &str = ".section-header, .about-text, .about-image, .skill-category, \
     .service-card, .portfolio-item, .testimonial-item, .contact-info, .contact-form";

/// How filtered items are hidden.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterPresentation {
    /// `.filter-btn` / `.portfolio-item`: inline `display` plus a fade-in.
    Display,
    /// `[data-filter-btn]` / `[data-filter-item]`: the `active` class.
    ActiveClass,
}

/// Every element the site touches, looked up once.
#[derive(Clone, Debug)]
#[expect(missing_docs, reason = "fields are named after the markup they hold")]
pub struct PageElements {
    pub body: Option<HtmlElement>,
    pub navbar: Option<Element>,
    pub nav_toggle: Option<Element>,
    pub nav_menu: Option<Element>,
    pub nav_links: Vec<Element>,
    pub sections: Vec<HtmlElement>,
    pub scroll_progress: Option<HtmlElement>,
    pub parallax: Vec<HtmlElement>,
    pub reveals: Vec<Element>,
    pub counters: Vec<Element>,
    pub skill_bars: Vec<HtmlElement>,
    pub typing: Option<Element>,
    pub loading_screen: Option<Element>,
    pub hero: Vec<HtmlElement>,
    pub carousel: Option<Element>,
    pub slides: Vec<Element>,
    pub dots: Vec<Element>,
    pub prev: Option<Element>,
    pub next: Option<Element>,
    pub filter_presentation: FilterPresentation,
    pub filter_controls: Vec<Element>,
    pub filter_items: Vec<HtmlElement>,
    pub select: Option<Element>,
    pub select_items: Vec<Element>,
    pub select_value: Option<HtmlElement>,
    pub form: Option<Element>,
    pub fields: Vec<HtmlElement>,
    pub submit: Option<HtmlElement>,
    pub sidebar: Option<Element>,
    pub sidebar_btn: Option<Element>,
    pub testimonials: Vec<Element>,
    pub modal_container: Option<Element>,
    pub modal_close: Option<Element>,
    pub overlay: Option<Element>,
    pub modal_img: Option<HtmlImageElement>,
    pub modal_title: Option<Element>,
    pub modal_text: Option<Element>,
    pub pages: Vec<Element>,
    pub page_links: Vec<Element>,
}

impl PageElements {
    /// Looks up every element and marks the auto-reveal targets.
    ///
    /// Only the elements a feature cannot work without are `required`; the
    /// rest of the page is optional markup.
    #[must_use]
    pub fn scan(dom: &Dom) -> Self {
        for el in dom.all(AUTO_REVEAL) {
            let _ = el.class_list().add_1("reveal");
        }

        let (filter_presentation, filter_controls, filter_items) =
            if dom.optional(".filter-btn").is_some() {
                (
                    FilterPresentation::Display,
                    dom.all(".filter-btn"),
                    dom.all_as(".portfolio-item"),
                )
            } else {
                (
                    FilterPresentation::ActiveClass,
                    dom.all("[data-filter-btn]"),
                    dom.all_as("[data-filter-item]"),
                )
            };

        let form = dom.optional("#contactForm");
        let (fields, submit) = match &form {
            Some(form) => (
                all_within(form, "input, textarea")
                    .into_iter()
                    .filter_map(|e| e.dyn_into().ok())
                    .collect(),
                form.query_selector("button[type=\"submit\"]")
                    .ok()
                    .flatten()
                    .and_then(|e| e.dyn_into().ok()),
            ),
            None => (Vec::new(), None),
        };

        let nav_toggle = dom.optional("#navToggle");
        let nav_menu = if nav_toggle.is_some() {
            dom.required("#navMenu")
        } else {
            dom.optional("#navMenu")
        };

        let slides = dom.all(".testimonial-item");
        let carousel = if slides.is_empty() {
            dom.optional(".testimonials-carousel")
        } else {
            dom.required(".testimonials-carousel")
        };

        let testimonials = dom.all("[data-testimonials-item]");
        let modal_container = if testimonials.is_empty() {
            dom.optional("[data-modal-container]")
        } else {
            dom.required("[data-modal-container]")
        };

        Self {
            body: dom.body(),
            navbar: dom.optional("#navbar"),
            nav_toggle,
            nav_menu,
            nav_links: dom.all(".nav-link"),
            sections: dom.all_as("section[id]"),
            scroll_progress: dom.optional_as("#scrollProgress"),
            parallax: dom.all_as(".hero-particles, .floating-icon"),
            reveals: dom.all(".reveal"),
            counters: dom.all(".stat-number[data-target]"),
            skill_bars: dom.all_as(".skill-progress"),
            typing: dom.optional("#typingText"),
            loading_screen: dom.optional("#loadingScreen"),
            hero: dom.all_as(".hero-text > *"),
            carousel,
            slides,
            dots: dom.all(".dot"),
            prev: dom.optional(".prev-btn"),
            next: dom.optional(".next-btn"),
            filter_presentation,
            filter_controls,
            filter_items,
            select: dom.optional("[data-select]"),
            select_items: dom.all("[data-select-item]"),
            select_value: dom.optional_as("[data-selecct-value]"),
            form,
            fields,
            submit,
            sidebar: dom.optional("[data-sidebar]"),
            sidebar_btn: dom.optional("[data-sidebar-btn]"),
            testimonials,
            modal_container,
            modal_close: dom.optional("[data-modal-close-btn]"),
            overlay: dom.optional("[data-overlay]"),
            modal_img: dom.optional_as("[data-modal-img]"),
            modal_title: dom.optional("[data-modal-title]"),
            modal_text: dom.optional("[data-modal-text]"),
            pages: dom.all("[data-page]"),
            page_links: dom.all("[data-nav-link]"),
        }
    }

    /// What the page coordinator needs to know about the markup.
    #[must_use]
    pub fn layout(&self, observer_supported: bool) -> PageLayout {
        PageLayout {
            sections: measure_sections(&self.sections),
            nav_links: self
                .nav_links
                .iter()
                .map(|l| l.get_attribute("href").unwrap_or_default())
                .collect(),
            nav_link_marked_active: self
                .nav_links
                .iter()
                .position(|l| l.class_list().contains("active")),
            parallax_count: self.parallax.len(),
            reveal_count: self.reveals.len(),
            observer_supported,
            counter_targets: self
                .counters
                .iter()
                .map(|c| parse_target(&c.get_attribute("data-target").unwrap_or_default()))
                .collect(),
            skill_widths: self
                .skill_bars
                .iter()
                .map(|b| parse_width(&b.get_attribute("data-width").unwrap_or_default()))
                .collect(),
            slide_count: self.slides.len(),
            filter_controls: self
                .filter_controls
                .iter()
                .map(|c| match c.get_attribute("data-filter") {
                    Some(token) => FilterControl::new(text_of(c), &token),
                    None => FilterControl::labelled(text_of(c)),
                })
                .collect(),
            filter_categories: self
                .filter_items
                .iter()
                .map(|i| i.get_attribute("data-category").unwrap_or_default())
                .collect(),
            form_fields: self.fields.iter().map(form_field).collect(),
            hero_count: self.hero.len(),
            pages: self
                .pages
                .iter()
                .map(|p| p.get_attribute("data-page").unwrap_or_default())
                .collect(),
            page_links: self.page_links.iter().map(text_of).collect(),
            page_link_marked_active: self
                .page_links
                .iter()
                .position(|l| l.class_list().contains("active")),
        }
    }
}

/// Section ids and document-relative extents.
pub(crate) fn measure_sections(sections: &[HtmlElement]) -> Vec<Section> {
    sections
        .iter()
        .map(|s| {
            Section::new(
                s.id(),
                f64::from(s.offset_top()),
                f64::from(s.offset_height()),
            )
        })
        .collect()
}

fn form_field(el: &HtmlElement) -> FormField {
    let name = el
        .get_attribute("name")
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| el.id());
    let ty = el.get_attribute("type").unwrap_or_else(|| String::from("text"));
    FormField::new(name, FieldKind::from_input_type(&ty))
}

/// Parses a counter's `data-target`. Unparsable targets count to zero.
#[must_use]
pub(crate) fn parse_target(raw: &str) -> u64 {
    let raw = raw.trim();
    raw.parse::<u64>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| {
                    #[expect(
                        clippy::cast_possible_truncation,
                        clippy::cast_sign_loss,
                        reason = "checked finite and non-negative; counters show whole numbers"
                    )]
                    let whole = v as u64;
                    whole
                })
        })
        .unwrap_or(0)
}

/// Parses a skill bar's `data-width`, with or without a `%` suffix.
#[must_use]
pub(crate) fn parse_width(raw: &str) -> f64 {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_targets_parse_leniently() {
        assert_eq!(parse_target("150"), 150);
        assert_eq!(parse_target(" 42 "), 42);
        assert_eq!(parse_target("99.7"), 99);
        assert_eq!(parse_target("-3"), 0, "negative targets count to zero");
        assert_eq!(parse_target("lots"), 0);
    }

    #[test]
    fn skill_widths_accept_percent_suffix() {
        assert_eq!(parse_width("85"), 85.0);
        assert_eq!(parse_width("72.5%"), 72.5);
        assert_eq!(parse_width(""), 0.0);
    }
}
