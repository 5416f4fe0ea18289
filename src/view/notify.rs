//! Toast notifications.
//!
//! Each call produces one independent, immediately inserted alert. There is
//! no queue and no deduplication; two identical calls give two toasts.

use std::rc::Rc;

use crate::error::{ActionError, ErrorKind};
use crate::view::render::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Bootstrap contextual class suffix.
    pub fn alert_class(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Font Awesome icon name.
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Success => "check-circle",
            Severity::Error => "exclamation-circle",
            Severity::Warning => "exclamation-triangle",
            Severity::Info => "info-circle",
        }
    }
}

pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

impl<N: Notifier> Notifier for Rc<N> {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity)
    }
}

/// Inline style of a toast before its entrance.
pub const TOAST_STYLE: &str = "top: 20px; right: 20px; z-index: 9999; min-width: 300px; \
     opacity: 0; transform: translateX(100px); transition: all 0.4s ease;";

pub fn toast_class(severity: Severity) -> String {
    format!(
        "alert alert-{} alert-dismissible fade show position-fixed",
        severity.alert_class()
    )
}

/// Inner markup of a toast. The dismiss button is handled by Bootstrap.
pub fn render_toast(message: &str, severity: Severity) -> String {
    let mut html = String::with_capacity(256);
    html.push_str(r#"<div class="d-flex align-items-center">"#);
    html.push_str(&format!(r#"<i class="fas fa-{} me-2"></i>"#, severity.icon()));
    html.push_str(&format!(
        r#"<div class="flex-grow-1">{}</div>"#,
        escape_html(message)
    ));
    html.push_str(
        r#"<button type="button" class="btn-close btn-close-white" data-bs-dismiss="alert"></button>"#,
    );
    html.push_str("</div>");
    html
}

/// Surface a failed action. Validation failures show `generic` as a warning.
/// Transport failures are logged and replaced by `generic`; server
/// rejections are shown as sent.
pub fn report<N: Notifier>(notifier: &N, err: &ActionError, generic: &str) {
    match err.kind() {
        ErrorKind::Validation => notifier.notify(&err.user_message(generic), Severity::Warning),
        ErrorKind::Transport => {
            log::error!("{}: {}", generic, err);
            notifier.notify(&err.user_message(generic), Severity::Error);
        }
        ErrorKind::Application => notifier.notify(&err.user_message(generic), Severity::Error),
    }
}
