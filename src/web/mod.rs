//! Browser bindings.
//!
//! DOM-backed implementations of the client seams, and the page wiring
//! that connects them to the listing markup. Only built for wasm32.

pub mod dom;
pub mod fetch;
pub mod page;
pub mod share;

pub use page::boot;
