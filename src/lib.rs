//! Game Platform in-browser client.
//!
//! Drives the interactive parts of the game listing page: likes, the comment
//! modal, sharing, toast notifications and the counter animations that keep
//! every copy of a game card in step with the server.
//!
//! The crate is split along one seam. Everything outside `web` is plain Rust
//! that talks to the page through small traits (`Transport`, `Clock`,
//! `Surface`, `Notifier`, ...) and is tested natively. `web` implements those
//! traits over `web-sys` and wires them to the DOM on wasm32.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod sync;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod testing;

pub use client::Client;
pub use error::{ActionError, ErrorKind};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Module entry point: install the panic hook and logger, then wire the page.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }
    web::boot()
}
