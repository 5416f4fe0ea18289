//! Viewer session: who is looking at the page.
//!
//! Read once from the `<body>` data attributes at page init and handed to
//! the client by value. Nothing in the crate reads viewer identity from the
//! document after that.

use crate::api::wire::{Comment, UserId};

/// The signed-in viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: UserId,
    pub name: String,
}

/// Immutable session context for the lifetime of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    viewer: Option<Viewer>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { viewer: None }
    }

    pub fn signed_in(id: UserId, name: impl Into<String>) -> Self {
        Self {
            viewer: Some(Viewer {
                id,
                name: name.into(),
            }),
        }
    }

    /// Build a session from the raw `data-user-id` / `data-username` values.
    ///
    /// A missing, blank or non-numeric id means anonymous. This also covers
    /// an unrendered template placeholder left in the attribute.
    pub fn from_dataset(user_id: Option<&str>, username: Option<&str>) -> Self {
        let id = user_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<UserId>().ok());
        match id {
            Some(id) => Self::signed_in(id, username.unwrap_or("").trim()),
            None => Self::anonymous(),
        }
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    pub fn viewer_id(&self) -> Option<UserId> {
        self.viewer.as_ref().map(|v| v.id)
    }

    pub fn is_signed_in(&self) -> bool {
        self.viewer.is_some()
    }

    /// Whether the delete affordance is offered for `comment`.
    /// Client-side convenience only; the server enforces ownership.
    pub fn owns(&self, comment: &Comment) -> bool {
        self.viewer_id() == Some(comment.user_id)
    }
}
