//! `SharePlatform` over `navigator.share`, `navigator.clipboard` and
//! `document.execCommand("copy")`.

use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlTextAreaElement, Window};

use crate::sync::share::{SharePlatform, ShareRequest};
use crate::web::fetch::describe;

pub struct NavigatorShare {
    window: Window,
}

impl NavigatorShare {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn navigator_has(&self, name: &str) -> bool {
        Reflect::has(&self.window.navigator(), &JsValue::from_str(name)).unwrap_or(false)
    }

    fn exec_copy(&self, text: &str) -> Result<bool, JsValue> {
        let document = self
            .window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let field = document
            .create_element("textarea")?
            .dyn_into::<HtmlTextAreaElement>()?;
        field.set_value(text);
        field.set_attribute("readonly", "")?;
        field.style().set_property("position", "fixed")?;
        field.style().set_property("left", "-9999px")?;
        body.append_child(&field)?;
        field.select();

        let exec = Reflect::get(&document, &JsValue::from_str("execCommand"))?;
        let copied = match exec.dyn_into::<Function>() {
            Ok(exec) => exec
                .call1(&document, &JsValue::from_str("copy"))?
                .as_bool()
                .unwrap_or(false),
            Err(_) => false,
        };
        field.remove();
        Ok(copied)
    }
}

impl SharePlatform for NavigatorShare {
    fn can_share(&self) -> bool {
        self.navigator_has("share")
    }

    async fn share(&self, request: &ShareRequest) -> Result<(), String> {
        let navigator = self.window.navigator();
        let data = Object::new();
        for (key, value) in [
            ("title", &request.title),
            ("text", &request.text),
            ("url", &request.url),
        ] {
            Reflect::set(&data, &JsValue::from_str(key), &JsValue::from_str(value))
                .map_err(|e| describe(&e))?;
        }

        let share: Function = Reflect::get(&navigator, &JsValue::from_str("share"))
            .and_then(|f| f.dyn_into())
            .map_err(|e| describe(&e))?;
        let promise: Promise = share
            .call1(&navigator, &data)
            .and_then(|p| p.dyn_into())
            .map_err(|e| describe(&e))?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| describe(&e))
    }

    fn can_write_clipboard(&self) -> bool {
        self.window.is_secure_context() && self.navigator_has("clipboard")
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), String> {
        let promise = self.window.navigator().clipboard().write_text(text);
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| describe(&e))
    }

    fn legacy_copy(&self, text: &str) -> bool {
        match self.exec_copy(text) {
            Ok(copied) => copied,
            Err(err) => {
                log::warn!("legacy copy failed: {}", describe(&err));
                false
            }
        }
    }
}
