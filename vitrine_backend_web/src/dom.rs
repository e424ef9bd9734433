// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element lookup.
//!
//! Every subsystem looks its elements up once, at startup. Optional elements
//! are simply absent; a missing required element is logged once with
//! `warn!` and the subsystem that needs it is skipped. Nothing here aborts
//! the page.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

/// A DOM operation that could not be carried out.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// No element matches the selector.
    #[error("no element matches `{0}`")]
    Missing(String),
    /// An element exists but has the wrong interface.
    #[error("`{selector}` is not an {expected}")]
    WrongType {
        /// The selector used.
        selector: String,
        /// Interface that was expected.
        expected: &'static str,
    },
    /// A JavaScript exception.
    #[error("JavaScript exception: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        Self::Js(format!("{value:?}"))
    }
}

/// The window and document, with selector helpers.
#[derive(Clone, Debug)]
pub struct Dom {
    window: Window,
    document: Document,
}

impl Dom {
    /// Grabs the global window and its document.
    pub fn global() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or_else(|| DomError::Missing(String::from("window")))?;
        let document = window
            .document()
            .ok_or_else(|| DomError::Missing(String::from("document")))?;
        Ok(Self { window, document })
    }

    /// The window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> Option<HtmlElement> {
        self.document.body()
    }

    /// First element matching `selector`, if any.
    #[must_use]
    pub fn optional(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    /// First element matching `selector`; logs a warning when absent.
    #[must_use]
    pub fn required(&self, selector: &str) -> Option<Element> {
        let found = self.optional(selector);
        if found.is_none() {
            tracing::warn!(%selector, "required element missing; feature disabled");
        }
        found
    }

    /// [`optional`](Self::optional) cast to `T`.
    #[must_use]
    pub fn optional_as<T: JsCast>(&self, selector: &str) -> Option<T> {
        self.optional(selector).and_then(|e| e.dyn_into().ok())
    }

    /// [`required`](Self::required) cast to `T`; logs a warning when absent
    /// or of another interface.
    pub fn required_as<T: JsCast>(&self, selector: &str, expected: &'static str) -> Option<T> {
        let el = self.required(selector)?;
        match cast(el, selector, expected) {
            Ok(el) => Some(el),
            Err(err) => {
                tracing::warn!(%err, "required element unusable; feature disabled");
                None
            }
        }
    }

    /// Every element matching `selector`, in document order.
    #[must_use]
    pub fn all(&self, selector: &str) -> Vec<Element> {
        all_within(&self.document, selector)
    }

    /// Every element matching `selector` that implements `T`.
    #[must_use]
    pub fn all_as<T: JsCast>(&self, selector: &str) -> Vec<T> {
        self.all(selector)
            .into_iter()
            .filter_map(|e| e.dyn_into().ok())
            .collect()
    }
}

/// Casts `el` to `T`.
pub(crate) fn cast<T: JsCast>(el: Element, selector: &str, expected: &'static str) -> Result<T, DomError> {
    el.dyn_into().map_err(|_| DomError::WrongType {
        selector: String::from(selector),
        expected,
    })
}

/// Every match of `selector` below a document or element.
pub(crate) fn all_within(root: &web_sys::Node, selector: &str) -> Vec<Element> {
    let list = if let Some(doc) = root.dyn_ref::<Document>() {
        doc.query_selector_all(selector)
    } else if let Some(el) = root.dyn_ref::<Element>() {
        el.query_selector_all(selector)
    } else {
        return Vec::new();
    };
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

/// Text content trimmed, or empty.
pub(crate) fn text_of(el: &Element) -> String {
    el.text_content()
        .map(|t| String::from(t.trim()))
        .unwrap_or_default()
}
