//! Context menu plus the rename and delete dialogs. They share one overlay slot.

use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input};
use crate::models::NodeKind;
use crate::state::PanelContext;
use crate::store::{BookmarkStore, StoreResult};
use crate::tree::ProjectedItem;
use crate::util::{event_target_inside, viewport_size};
use leptos::ev;
use leptos::html;
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use leptos_ui::clx;
use wasm_bindgen::JsCast;

pub(crate) const DIALOG_WIDTH_PX: f64 = 320.0;
pub(crate) const DIALOG_HEIGHT_PX: f64 = 200.0;

mod components {
    use super::*;
    clx! {DialogTitle, h3, "mb-3 text-sm font-semibold"}
    clx! {DialogMessage, p, "mb-2 break-words text-sm"}
    clx! {DialogWarning, p, "mb-2 text-xs text-destructive"}
    clx! {DialogActions, div, "mt-4 flex justify-end gap-2"}
    clx! {MenuItem, button, "block w-full px-3 py-1.5 text-left text-sm hover:bg-accent hover:text-accent-foreground"}
}

use components::*;

/// What a menu or dialog acts on, copied from the row it was opened from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DialogSubject {
    pub id: String,
    pub title: String,
    pub kind: NodeKind,
    pub child_count: usize,
}

impl From<&ProjectedItem> for DialogSubject {
    fn from(item: &ProjectedItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            kind: item.kind,
            child_count: item.child_count,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum Overlay {
    #[default]
    None,
    ContextMenu {
        subject: DialogSubject,
        x: f64,
        y: f64,
    },
    Rename {
        subject: DialogSubject,
        x: f64,
        y: f64,
    },
    Delete {
        subject: DialogSubject,
        x: f64,
        y: f64,
    },
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        !matches!(self, Overlay::None)
    }

    pub fn is_context_menu(&self) -> bool {
        matches!(self, Overlay::ContextMenu { .. })
    }
}

/// Keeps a dialog of the fixed panel size inside the viewport.
pub(crate) fn clamp_position(x: f64, y: f64, viewport: (f64, f64)) -> (f64, f64) {
    let (vw, vh) = viewport;
    (
        x.min(vw - DIALOG_WIDTH_PX).max(0.0),
        y.min(vh - DIALOG_HEIGHT_PX).max(0.0),
    )
}

/// New title to store, or `None` when the input is empty or unchanged.
pub(crate) fn rename_request(current: &str, input: &str) -> Option<String> {
    let title = input.trim();
    if title.is_empty() || title == current {
        None
    } else {
        Some(title.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeletePlan {
    Subtree,
    Single,
}

pub(crate) fn delete_plan(subject: &DialogSubject) -> DeletePlan {
    match subject.kind {
        NodeKind::Folder => DeletePlan::Subtree,
        NodeKind::Bookmark => DeletePlan::Single,
    }
}

pub(crate) fn delete_message(subject: &DialogSubject) -> String {
    format!("Delete \"{}\"?", subject.title)
}

pub(crate) fn delete_warning(subject: &DialogSubject) -> Option<String> {
    (subject.kind == NodeKind::Folder && subject.child_count > 0).then(|| {
        format!(
            "This will also delete {} item(s) inside.",
            subject.child_count
        )
    })
}

/// Returns whether the store was asked to change anything.
pub(crate) async fn apply_rename(
    store: &dyn BookmarkStore,
    subject: &DialogSubject,
    input: &str,
) -> StoreResult<bool> {
    let Some(title) = rename_request(&subject.title, input) else {
        return Ok(false);
    };
    store.update_title(&subject.id, &title).await?;
    Ok(true)
}

pub(crate) async fn apply_delete(
    store: &dyn BookmarkStore,
    subject: &DialogSubject,
) -> StoreResult<()> {
    match delete_plan(subject) {
        DeletePlan::Subtree => store.remove_subtree(&subject.id).await,
        DeletePlan::Single => store.remove(&subject.id).await,
    }
}

fn focus_later(f: impl FnOnce() + 'static) {
    // Next tick: the dialog is mounted by then.
    let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
        wasm_bindgen::closure::Closure::once_into_js(f)
            .as_ref()
            .unchecked_ref(),
        0,
    );
}

#[component]
fn ContextMenu(subject: DialogSubject, x: f64, y: f64) -> impl IntoView {
    let ctx = expect_context::<PanelContext>();
    let overlay = ctx.0.overlay;
    let menu_ref: NodeRef<html::Div> = NodeRef::new();

    // Any click outside the menu closes it.
    let click_handle = window_event_listener(ev::click, move |ev: web_sys::MouseEvent| {
        if !overlay.with_untracked(Overlay::is_context_menu) {
            return;
        }
        let inside = menu_ref
            .get_untracked()
            .is_some_and(|menu| event_target_inside(&ev, &menu));
        if !inside {
            overlay.set(Overlay::None);
        }
    });
    on_cleanup(move || click_handle.remove());

    let for_rename = subject.clone();
    let for_delete = subject;

    view! {
        <div
            node_ref=menu_ref
            data-name="ContextMenu"
            class="fixed z-50 min-w-32 overflow-hidden rounded-md border bg-background py-1 shadow-md"
            style=format!("left: {x}px; top: {y}px;")
        >
            <MenuItem on:click=move |_| {
                overlay.set(Overlay::Rename { subject: for_rename.clone(), x, y });
            }>"Rename"</MenuItem>
            <MenuItem on:click=move |_| {
                overlay.set(Overlay::Delete { subject: for_delete.clone(), x, y });
            }>"Delete"</MenuItem>
        </div>
    }
}

#[component]
fn DialogFrame(x: f64, y: f64, children: Children) -> impl IntoView {
    let ctx = expect_context::<PanelContext>();
    let overlay = ctx.0.overlay;
    let (left, top) = clamp_position(x, y, viewport_size());

    view! {
        <div
            data-name="DialogOverlay"
            class="fixed inset-0 z-40 bg-black/30"
            on:click=move |_| overlay.set(Overlay::None)
        >
            <div
                data-name="Dialog"
                class="fixed w-72 rounded-lg border bg-background p-4 shadow-lg"
                style=format!("left: {left}px; top: {top}px;")
                on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()
            >
                {children()}
            </div>
        </div>
    }
}

#[component]
fn RenameDialog(subject: DialogSubject, x: f64, y: f64) -> impl IntoView {
    let ctx = expect_context::<PanelContext>();
    let state = ctx.0.clone();
    let overlay = ctx.0.overlay;
    let value = RwSignal::new(subject.title.clone());
    let input_ref: NodeRef<html::Input> = NodeRef::new();

    focus_later(move || {
        if let Some(input) = input_ref.get_untracked() {
            let _ = input.focus();
            input.select();
        }
    });

    let subject = StoredValue::new(subject);
    let save = move || {
        let subject = subject.get_value();
        let input = value.get_untracked();
        let store = state.store.clone();
        let sync = state.sync.clone();
        overlay.set(Overlay::None);

        spawn_local(async move {
            match apply_rename(store.as_ref(), &subject, &input).await {
                Ok(true) => sync.reload(),
                Ok(false) => {}
                Err(e) => error!("[dialogs] rename of {} failed ({}): {e}", subject.id, e.kind),
            }
        });
    };
    let save = StoredValue::new(save);

    view! {
        <DialogFrame x=x y=y>
            <DialogTitle>"Rename"</DialogTitle>
            <Input
                bind_value=value
                node_ref=input_ref
                on:keydown=move |ev: web_sys::KeyboardEvent| {
                    if ev.key() == "Enter" {
                        ev.prevent_default();
                        save.with_value(|f| f());
                    }
                }
            />
            <DialogActions>
                <Button
                    variant=ButtonVariant::Cancel
                    size=ButtonSize::Sm
                    on:click=move |_| overlay.set(Overlay::None)
                >
                    "Cancel"
                </Button>
                <Button
                    variant=ButtonVariant::Primary
                    size=ButtonSize::Sm
                    on:click=move |_| save.with_value(|f| f())
                >
                    "Save"
                </Button>
            </DialogActions>
        </DialogFrame>
    }
}

#[component]
fn DeleteDialog(subject: DialogSubject, x: f64, y: f64) -> impl IntoView {
    let ctx = expect_context::<PanelContext>();
    let state = ctx.0.clone();
    let overlay = ctx.0.overlay;
    let actions_ref: NodeRef<html::Div> = NodeRef::new();

    focus_later(move || {
        let confirm = actions_ref
            .get_untracked()
            .and_then(|el| el.query_selector("[data-role=confirm]").ok().flatten())
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
        if let Some(button) = confirm {
            let _ = button.focus();
        }
    });

    let message = delete_message(&subject);
    let warning = delete_warning(&subject);
    let subject = StoredValue::new(subject);

    let on_delete = move |_| {
        let subject = subject.get_value();
        let store = state.store.clone();
        let sync = state.sync.clone();
        overlay.set(Overlay::None);

        spawn_local(async move {
            match apply_delete(store.as_ref(), &subject).await {
                Ok(()) => sync.reload(),
                Err(e) => error!("[dialogs] delete of {} failed ({}): {e}", subject.id, e.kind),
            }
        });
    };

    view! {
        <DialogFrame x=x y=y>
            <DialogTitle>"Delete"</DialogTitle>
            <DialogMessage>{message}</DialogMessage>
            {warning.map(|w| view! { <DialogWarning>{w}</DialogWarning> })}
            <div node_ref=actions_ref>
                <DialogActions>
                    <Button
                        variant=ButtonVariant::Cancel
                        size=ButtonSize::Sm
                        on:click=move |_| overlay.set(Overlay::None)
                    >
                        "Cancel"
                    </Button>
                    <Button
                        variant=ButtonVariant::Danger
                        size=ButtonSize::Sm
                        attr:data-role="confirm"
                        on:click=on_delete
                    >
                        "Delete"
                    </Button>
                </DialogActions>
            </div>
        </DialogFrame>
    }
}

/// Renders whichever overlay is open. Escape closes it.
#[component]
pub(crate) fn OverlayHost() -> impl IntoView {
    let ctx = expect_context::<PanelContext>();
    let overlay = ctx.0.overlay;

    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" && overlay.with_untracked(Overlay::is_open) {
            ev.prevent_default();
            overlay.set(Overlay::None);
        }
    });

    move || match overlay.get() {
        Overlay::None => ().into_any(),
        Overlay::ContextMenu { subject, x, y } => {
            view! { <ContextMenu subject=subject x=x y=y /> }.into_any()
        }
        Overlay::Rename { subject, x, y } => {
            view! { <RenameDialog subject=subject x=x y=y /> }.into_any()
        }
        Overlay::Delete { subject, x, y } => {
            view! { <DeleteDialog subject=subject x=x y=y /> }.into_any()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBookmarkStore, StoreCall};
    use futures::executor::block_on;

    fn subject(id: &str, title: &str, kind: NodeKind, child_count: usize) -> DialogSubject {
        DialogSubject {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            child_count,
        }
    }

    #[test]
    fn test_clamp_keeps_dialog_on_screen() {
        assert_eq!(clamp_position(10.0, 20.0, (800.0, 600.0)), (10.0, 20.0));
        assert_eq!(clamp_position(700.0, 550.0, (800.0, 600.0)), (480.0, 400.0));
        assert_eq!(clamp_position(50.0, 50.0, (200.0, 100.0)), (0.0, 0.0));
    }

    #[test]
    fn test_rename_request_ignores_empty_and_unchanged() {
        assert_eq!(rename_request("Docs", "   "), None);
        assert_eq!(rename_request("Docs", " Docs "), None);
        assert_eq!(rename_request("Docs", " Guides "), Some("Guides".to_string()));
    }

    #[test]
    fn test_delete_texts() {
        let docs = subject("11", "Docs", NodeKind::Folder, 3);
        assert_eq!(delete_message(&docs), "Delete \"Docs\"?");
        assert_eq!(
            delete_warning(&docs).as_deref(),
            Some("This will also delete 3 item(s) inside.")
        );
        assert_eq!(delete_warning(&subject("21", "Empty", NodeKind::Folder, 0)), None);
        assert_eq!(delete_warning(&subject("10", "Rust", NodeKind::Bookmark, 0)), None);
    }

    #[test]
    fn test_deleting_folder_with_children_is_one_subtree_removal() {
        let store = MemoryBookmarkStore::seeded();
        // Docs holds 12 and 13; move 14 in so it has three children.
        block_on(store.move_node(
            "14",
            crate::models::MoveDestination {
                parent_id: Some("11".to_string()),
                index: None,
            },
        ))
        .expect("move into docs");
        let docs = subject("11", "Docs", NodeKind::Folder, 3);
        let before = store.mutations().len();

        block_on(apply_delete(&store, &docs)).expect("delete");

        let issued: Vec<StoreCall> = store.mutations().into_iter().skip(before).collect();
        assert_eq!(issued, vec![StoreCall::RemoveSubtree("11".to_string())]);
        let root = block_on(store.get_tree()).expect("tree");
        assert!(root.find("12").is_none());
        assert!(root.find("14").is_none());
    }

    #[test]
    fn test_deleting_bookmark_is_single_removal() {
        let store = MemoryBookmarkStore::seeded();
        block_on(apply_delete(&store, &subject("10", "Rust", NodeKind::Bookmark, 0)))
            .expect("delete");
        assert_eq!(store.mutations(), vec![StoreCall::Remove("10".to_string())]);
    }

    #[test]
    fn test_apply_rename_skips_store_when_unchanged() {
        let store = MemoryBookmarkStore::seeded();
        let rust = subject("10", "Rust", NodeKind::Bookmark, 0);

        assert!(!block_on(apply_rename(&store, &rust, "Rust")).expect("no-op"));
        assert!(store.mutations().is_empty());

        assert!(block_on(apply_rename(&store, &rust, "  Rust lang ")).expect("renamed"));
        let node = block_on(store.get_node("10")).expect("node");
        assert_eq!(node.title, "Rust lang");
    }
}
