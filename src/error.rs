//! Error type for user actions (like, comment, delete).
//!
//! Every failure is terminal for the action that raised it; the viewer has
//! to trigger it again.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("sign-in required")]
    SignInRequired,

    #[error("comment text is empty")]
    EmptyComment,

    #[error("network error: {0}")]
    Network(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("payload is missing `{0}`")]
    Incomplete(&'static str),

    /// The server answered `success: false`; the message is shown verbatim.
    #[error("{0}")]
    Rejected(String),
}

/// Where a failure was caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally, before any request.
    Validation,
    /// Network failure, non-OK status or unreadable payload.
    Transport,
    /// The server refused the action.
    Application,
}

impl ActionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionError::SignInRequired | ActionError::EmptyComment => ErrorKind::Validation,
            ActionError::Network(_)
            | ActionError::Status(_)
            | ActionError::Malformed(_)
            | ActionError::Incomplete(_) => ErrorKind::Transport,
            ActionError::Rejected(_) => ErrorKind::Application,
        }
    }

    /// Text to show the viewer. Server rejections are shown as sent; anything
    /// caught on this side shows `generic`, the caller's own wording.
    pub fn user_message(&self, generic: &str) -> String {
        match self.kind() {
            ErrorKind::Application => self.to_string(),
            ErrorKind::Transport | ErrorKind::Validation => generic.to_string(),
        }
    }
}
