//! Server-synchronized actions.
//!
//! Each submodule adds operations to `Client`. All of them are
//! confirmation-only: visible state changes after the server answers, never
//! before.

pub mod comments;
pub mod counter;
pub mod likes;
pub mod share;
