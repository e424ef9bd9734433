// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `fetch` submission of the contact form.

use alloc::format;
use alloc::string::{String, ToString as _};

use serde_json::{Map, Value};
use wasm_bindgen::{JsCast as _, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, Window};

use vitrine_core::form::SubmitError;

/// Encodes `(name, value)` pairs as a JSON object.
#[must_use]
pub fn encode_form(data: &[(String, String)]) -> String {
    let fields: Map<String, Value> = data
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();
    Value::Object(fields).to_string()
}

fn js_error(err: JsValue) -> SubmitError {
    SubmitError::Network(format!("{err:?}"))
}

fn build_request(endpoint: &str, data: &[(String, String)]) -> Result<Request, SubmitError> {
    let headers = Headers::new().map_err(js_error)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(js_error)?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&encode_form(data)));
    Request::new_with_str_and_init(endpoint, &init).map_err(js_error)
}

async fn send(window: &Window, request: &Request) -> Result<(), SubmitError> {
    let response = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(js_error)?;
    let response: Response = response.dyn_into().map_err(js_error)?;
    if response.ok() {
        Ok(())
    } else {
        Err(SubmitError::Status(response.status()))
    }
}

/// POSTs `data` as JSON to `endpoint` and reports the outcome to `on_done`.
///
/// A 2xx response is success; any other status or a network failure is an
/// error.
pub fn post_form(
    window: &Window,
    endpoint: &str,
    data: &[(String, String)],
    on_done: impl FnOnce(Result<(), SubmitError>) + 'static,
) {
    let request = build_request(endpoint, data);
    let window = window.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = match request {
            Ok(request) => send(&window, &request).await,
            Err(err) => Err(err),
        };
        on_done(outcome);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_encodes_as_flat_object() {
        let body = encode_form(&[
            (String::from("name"), String::from("Ada")),
            (String::from("message"), String::from("Hi \"there\"")),
        ]);
        let parsed: Value = serde_json::from_str(&body).expect("valid JSON");
        assert_eq!(
            parsed,
            serde_json::json!({ "name": "Ada", "message": "Hi \"there\"" })
        );
        assert_eq!(encode_form(&[]), "{}");
    }
}
