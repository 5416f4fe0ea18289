//! `Transport` over `window.fetch`.
//!
//! Requests are same-origin, so the session cookie travels with them.

use js_sys::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::api::{ApiRequest, FORM_CONTENT_TYPE, Transport};
use crate::error::ActionError;

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

/// Best-effort text of a thrown JS value.
pub fn describe(err: &JsValue) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    if let Some(error) = err.dyn_ref::<Error>() {
        return error.message().into();
    }
    format!("{:?}", err)
}

fn network(err: JsValue) -> ActionError {
    ActionError::Network(describe(&err))
}

impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<String, ActionError> {
        let window =
            web_sys::window().ok_or_else(|| ActionError::Network("no window".to_string()))?;

        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        if let Some(body) = &request.body {
            let headers = Headers::new().map_err(network)?;
            headers
                .set("Content-Type", FORM_CONTENT_TYPE)
                .map_err(network)?;
            init.set_headers(&headers);
            init.set_body(&JsValue::from_str(body));
        }

        let req = Request::new_with_str_and_init(&request.path, &init).map_err(network)?;
        let value = JsFuture::from(window.fetch_with_request(&req))
            .await
            .map_err(network)?;
        let response: Response = value.dyn_into().map_err(network)?;
        if !response.ok() {
            return Err(ActionError::Status(response.status()));
        }

        let text = JsFuture::from(response.text().map_err(network)?)
            .await
            .map_err(network)?;
        text.as_string()
            .ok_or_else(|| ActionError::Network("response body is not text".to_string()))
    }
}
