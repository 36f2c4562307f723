mod app;
mod background;
mod bridge;
mod components;
mod config;
mod dialogs;
mod dnd;
mod favicon;
pub mod models;
mod search;
mod state;
mod store;
mod sync;
mod tree;
mod util;

pub use app::App;
use leptos::prelude::*;

// Needed for the wasm entrypoints.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    // The same module is loaded by the service worker, which has no window to mount into.
    if web_sys::window().is_none() {
        return;
    }
    mount_to_body(App);
}

/// Entry point for the extension's background service worker.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_background() {
    console_error_panic_hook::set_once();
    background::start();
}
