//! Presentation: markup, notifications, and timed visual steps.
//!
//! Nothing here touches the DOM directly. Markup is produced as strings and
//! animations as `Transition` data; the `web` layer applies both.

pub mod entrance;
pub mod notify;
pub mod render;
pub mod transition;
