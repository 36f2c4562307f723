//! Reload cycle: capture scroll, re-fetch the tree, rebuild the projection, restore scroll.

use crate::bridge;
use crate::store::{BookmarkStore, SharedStore, StoreResult};
use crate::tree::{SharedRenderer, TreeProjection, TreeRenderer};
use leptos::html;
use leptos::logging::{error, log};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::request_animation_frame;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ScrollAnchor {
    pub offset: i32,
}

impl ScrollAnchor {
    pub fn capture(container: NodeRef<html::Div>) -> Self {
        let offset = container
            .get_untracked()
            .map(|el| el.scroll_top())
            .unwrap_or_default();
        Self { offset }
    }

    /// Reapplied after the rebuilt rows have been laid out.
    pub fn restore_on_next_frame(self, container: NodeRef<html::Div>) {
        request_animation_frame(move || {
            if let Some(el) = container.get_untracked() {
                el.set_scroll_top(self.offset);
            }
        });
    }
}

/// Tickets for overlapping reloads. A completion may publish only if nothing newer already has.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ReloadSequence {
    started: u64,
    applied: u64,
}

impl ReloadSequence {
    pub fn begin(&mut self) -> u64 {
        self.started += 1;
        self.started
    }

    /// Claims the screen for `ticket`. False when a newer snapshot is already shown.
    pub fn try_apply(&mut self, ticket: u64) -> bool {
        if ticket <= self.applied {
            return false;
        }
        self.applied = ticket;
        true
    }
}

pub(crate) async fn fetch_projection(
    store: &dyn BookmarkStore,
    renderer: &dyn TreeRenderer,
) -> StoreResult<TreeProjection> {
    let root = store.get_tree().await?;
    Ok(renderer.render(&root))
}

#[derive(Clone)]
pub(crate) struct SyncController {
    store: SharedStore,
    renderer: SharedRenderer,
    projection: RwSignal<TreeProjection>,
    scroll_ref: NodeRef<html::Div>,
    sequence: RwSignal<ReloadSequence>,
}

impl SyncController {
    pub fn new(
        store: SharedStore,
        renderer: SharedRenderer,
        projection: RwSignal<TreeProjection>,
        scroll_ref: NodeRef<html::Div>,
    ) -> Self {
        Self {
            store,
            renderer,
            projection,
            scroll_ref,
            sequence: RwSignal::new(ReloadSequence::default()),
        }
    }

    /// Rebuilds the projection from a fresh snapshot. A failed fetch keeps what is on screen.
    pub fn reload(&self) {
        let Some(ticket) = self.sequence.try_update(|s| s.begin()) else {
            return;
        };
        let anchor = ScrollAnchor::capture(self.scroll_ref);
        let this = self.clone();

        spawn_local(async move {
            match fetch_projection(this.store.as_ref(), this.renderer.as_ref()).await {
                Ok(projection) => {
                    let fresh = this
                        .sequence
                        .try_update_untracked(|s| s.try_apply(ticket))
                        .unwrap_or(false);
                    if !fresh {
                        log!("[sync] dropping stale reload #{ticket}");
                        return;
                    }
                    this.projection.set(projection);
                    anchor.restore_on_next_frame(this.scroll_ref);
                }
                Err(e) => error!("[sync] reload #{ticket} failed ({}): {e}", e.kind),
            }
        });
    }

    /// Reloads whenever the background coordinator reports a store change.
    pub fn listen_for_changes(&self) {
        let this = self.clone();
        bridge::on_runtime_message(move |message| {
            if message.is_bookmark_changed() {
                this.reload();
            }
        });
    }
}
