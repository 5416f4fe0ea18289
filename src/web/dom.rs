//! DOM-backed implementations of the client seams.

use std::cell::RefCell;

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::api::wire::CommentId;
use crate::config::Timings;
use crate::sync::comments::{CommentForm, CommentList, Prompt};
use crate::sync::counter::{CounterDisplay, CounterEvent};
use crate::view::notify::{self, Notifier, Severity};
use crate::view::transition::{self, Clock, Surface};

/// Label of the submit button while a comment is being posted.
const SENDING_LABEL: &str = r#"<i class="fas fa-spinner fa-spin me-1"></i> Отправка..."#;

#[derive(Clone)]
pub struct DomSurface(HtmlElement);

impl DomSurface {
    pub fn new(element: HtmlElement) -> Self {
        Self(element)
    }

    pub fn from_element(element: Element) -> Option<Self> {
        element.dyn_into::<HtmlElement>().ok().map(Self)
    }

    pub fn element(&self) -> &HtmlElement {
        &self.0
    }
}

impl Surface for DomSurface {
    fn set_style(&self, property: &str, value: &str) {
        if let Err(err) = self.0.style().set_property(property, value) {
            log::warn!("setting {} failed: {:?}", property, err);
        }
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn scroll_into_view(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Nearest);
        self.0.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn remove(&self) {
        self.0.remove();
    }

    fn is_attached(&self) -> bool {
        self.0.is_connected()
    }
}

/// Browser timers and the wasm-bindgen-futures executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClock;

impl Clock for WebClock {
    async fn sleep(&self, ms: u32) {
        gloo_timers::future::TimeoutFuture::new(ms).await;
    }

    fn spawn(&self, task: impl std::future::Future<Output = ()> + 'static) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn now(&self) -> DateTime<FixedOffset> {
        let date = js_sys::Date::new_0();
        // getTimezoneOffset is UTC minus local, in minutes.
        let east = -(date.get_timezone_offset() as i32) * 60;
        let offset = FixedOffset::east_opt(east).unwrap_or_else(|| Utc.fix());
        Utc.timestamp_millis_opt(date.get_time() as i64)
            .single()
            .unwrap_or_default()
            .with_timezone(&offset)
    }
}

// ── Counters ───────────────────────────────────────────────────────

/// A `.like-btn`: the `liked` class on the button and its `.likes-count`.
pub struct LikeCounter {
    button: Element,
    count: Option<DomSurface>,
    timings: Timings,
}

impl LikeCounter {
    pub fn new(button: Element, timings: Timings) -> Self {
        let count = button
            .query_selector(".likes-count")
            .ok()
            .flatten()
            .and_then(DomSurface::from_element);
        Self {
            button,
            count,
            timings,
        }
    }
}

impl CounterDisplay for LikeCounter {
    fn apply(&self, event: &CounterEvent) {
        let CounterEvent::Likes { likes, liked, .. } = *event else {
            return;
        };
        if let Err(err) = self.button.class_list().toggle_with_force("liked", liked) {
            log::warn!("toggling liked class failed: {:?}", err);
        }
        if let Some(count) = &self.count {
            transition::animate(&WebClock, transition::counter_swap(&self.timings, likes), count.clone());
        }
    }
}

/// The `.comments-count` badge of a `.comment-btn`.
pub struct CommentCounter {
    count: DomSurface,
    timings: Timings,
}

impl CommentCounter {
    /// `None` if the button has no badge.
    pub fn find_in(button: &Element, timings: Timings) -> Option<Self> {
        let count = button
            .query_selector(".comments-count")
            .ok()
            .flatten()
            .and_then(DomSurface::from_element)?;
        Some(Self { count, timings })
    }
}

impl CounterDisplay for CommentCounter {
    fn apply(&self, event: &CounterEvent) {
        if let CounterEvent::Comments { count, .. } = *event {
            transition::animate(
                &WebClock,
                transition::counter_swap(&self.timings, count),
                self.count.clone(),
            );
        }
    }
}

// ── Comment modal ──────────────────────────────────────────────────

/// `#commentsList`.
pub struct DomCommentList {
    container: Element,
}

impl DomCommentList {
    pub fn new(container: Element) -> Self {
        Self { container }
    }
}

impl CommentList for DomCommentList {
    type Item = DomSurface;

    fn show_placeholder(&self, html: &str) {
        self.container.set_inner_html(html);
    }

    fn clear(&self) {
        self.container.set_inner_html("");
    }

    fn append(&self, comment_id: CommentId, html: &str) -> Option<DomSurface> {
        if let Err(err) = self.container.insert_adjacent_html("beforeend", html) {
            log::error!("inserting comment {} failed: {:?}", comment_id, err);
            return None;
        }
        self.container
            .last_element_child()
            .and_then(DomSurface::from_element)
    }

    fn find(&self, comment_id: CommentId) -> Option<DomSurface> {
        self.container
            .query_selector(&format!("#comment-{}", comment_id))
            .ok()
            .flatten()
            .and_then(DomSurface::from_element)
    }
}

/// `#commentText` and the submit button of `#commentForm`.
pub struct DomCommentForm {
    input: Element,
    submit: Option<HtmlButtonElement>,
    idle_label: RefCell<Option<String>>,
}

impl DomCommentForm {
    pub fn new(input: Element, submit: Option<HtmlButtonElement>) -> Self {
        Self {
            input,
            submit,
            idle_label: RefCell::new(None),
        }
    }
}

impl CommentForm for DomCommentForm {
    fn text(&self) -> String {
        if let Some(area) = self.input.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(input) = self.input.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else {
            String::new()
        }
    }

    fn clear(&self) {
        if let Some(area) = self.input.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value("");
        } else if let Some(input) = self.input.dyn_ref::<HtmlInputElement>() {
            input.set_value("");
        }
    }

    fn set_busy(&self, busy: bool) {
        let Some(button) = &self.submit else {
            return;
        };
        if busy {
            *self.idle_label.borrow_mut() = Some(button.inner_html());
            button.set_inner_html(SENDING_LABEL);
        } else if let Some(label) = self.idle_label.take() {
            button.set_inner_html(&label);
        }
        button.set_disabled(busy);
    }
}

/// `window.confirm`. No window reads as "no".
pub struct WindowPrompt;

impl Prompt for WindowPrompt {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}

// ── Toasts ─────────────────────────────────────────────────────────

/// Fixed-position Bootstrap alerts appended to `<body>`.
pub struct ToastNotifier {
    document: Document,
    timings: Timings,
}

impl ToastNotifier {
    pub fn new(document: Document, timings: Timings) -> Self {
        Self { document, timings }
    }

    fn insert(&self, message: &str, severity: Severity) -> Result<DomSurface, JsValue> {
        let toast = self
            .document
            .create_element("div")?
            .dyn_into::<HtmlElement>()?;
        toast.set_class_name(&notify::toast_class(severity));
        toast.set_attribute("role", "alert")?;
        toast.set_attribute("style", notify::TOAST_STYLE)?;
        toast.set_inner_html(&notify::render_toast(message, severity));
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.append_child(&toast)?;
        Ok(DomSurface(toast))
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match self.insert(message, severity) {
            Ok(toast) => {
                transition::animate(&WebClock, transition::toast_lifecycle(&self.timings), toast)
            }
            Err(err) => log::error!("showing notification failed: {:?}", err),
        }
    }
}
