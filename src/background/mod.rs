//! Background coordinator: relays bookmark store events to any open panel.
//!
//! Runs in the extension's service worker, which has no DOM and no Leptos runtime, so tasks are
//! spawned on `wasm_bindgen_futures` directly.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use crate::bridge;
use crate::models::RuntimeMessage;
use leptos::logging::{log, warn};
use wasm_bindgen_futures::spawn_local;

/// Broadcasts a change to the panel. Nobody listening is normal when the panel is closed.
pub(crate) async fn notify_panel() {
    if let Err(e) = bridge::send_runtime_message(&RuntimeMessage::bookmark_changed()).await {
        log!("[background] change not delivered: {e}");
    }
}

pub(crate) fn start() {
    spawn_local(async {
        if let Err(e) = bridge::open_panel_on_action_click().await {
            warn!("[background] setPanelBehavior failed: {e}");
        }
    });

    bridge::on_bookmark_event(|| spawn_local(notify_panel()));
}
