use super::{ProjectedItem, TreeProjection};
use crate::bridge;
use crate::dialogs::{DialogSubject, Overlay};
use crate::dnd::{compute_intent, dispatch_drop, BoxGeometry, DropIntent, DropTarget};
use crate::favicon::FALLBACK_ICON;
use crate::search::{apply_filter, FilterView, SearchQuery};
use crate::state::{PanelContext, PanelState};
use crate::util::{drag_left_into_descendant, event_element};
use icons::{ChevronRight, Folder};
use leptos::html;
use leptos::logging::{error, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::Arc;
use wasm_bindgen::JsCast;

const ROW_CLASS: &str = "flex h-7 cursor-pointer select-none items-center gap-1.5 rounded-sm pr-2 text-sm hover:bg-accent";

fn indicator_class(intent: DropIntent) -> &'static str {
    match intent {
        DropIntent::InsertBefore => "border-t-2 border-primary",
        DropIntent::ReparentInto => "bg-accent ring-1 ring-inset ring-primary",
    }
}

fn drop_target(item: &ProjectedItem) -> DropTarget {
    DropTarget {
        id: item.id.clone(),
        parent_id: item.parent_id.clone(),
        index: item.index,
    }
}

fn open_in_new_tab(url: String) {
    spawn_local(async move {
        if let Err(e) = bridge::open_tab(&url).await {
            warn!("[tree] tabs.create failed ({e}), falling back to window.open");
            if let Err(e) = window().open_with_url_and_target(&url, "_blank") {
                error!("[tree] could not open {url}: {e:?}");
            }
        }
    });
}

/// Row wrapper shared by folders and bookmarks: drag source, drop target, context menu.
#[component]
fn Row(
    item: ProjectedItem,
    #[prop(into)] on_activate: Callback<()>,
    children: Children,
) -> impl IntoView {
    let ctx = expect_context::<PanelContext>();
    let PanelState {
        config,
        store,
        drag,
        overlay,
        sync,
        ..
    } = ctx.0;

    let row_ref: NodeRef<html::Div> = NodeRef::new();
    let padding = format!("padding-left: {}px;", config.indent_px(item.depth));
    let item = StoredValue::new(item);
    let id = item.with_value(|i| i.id.clone());

    let class = {
        let id = id.clone();
        move || {
            drag.with(|d| {
                let mut class = ROW_CLASS.to_string();
                if d.is_dragging(&id) {
                    class.push_str(" dragging opacity-50");
                }
                if let Some(intent) = d.indicator_for(&id) {
                    class.push(' ');
                    class.push_str(intent.as_ref());
                    class.push(' ');
                    class.push_str(indicator_class(intent));
                }
                class
            })
        }
    };

    let intent_at = move |ev: &web_sys::DragEvent| -> Option<DropIntent> {
        let row = row_ref.get_untracked()?;
        let kind = item.with_value(|i| i.kind);
        Some(compute_intent(kind, BoxGeometry::of(&row), f64::from(ev.client_y())))
    };

    let on_dragstart = move |ev: web_sys::DragEvent| {
        let node = item.with_value(ProjectedItem::to_node);
        if let Some(dt) = ev.data_transfer() {
            dt.set_effect_allowed("move");
            let _ = dt.set_data("text/plain", &node.id);
        }
        drag.update(|d| d.start(node));
    };

    let on_dragover = {
        let id = id.clone();
        move |ev: web_sys::DragEvent| {
            ev.prevent_default();
            if drag.with_untracked(|d| d.session().is_none()) {
                return;
            }
            if let Some(dt) = ev.data_transfer() {
                dt.set_drop_effect("move");
            }
            let Some(intent) = intent_at(&ev) else {
                return;
            };
            let changed = drag.with_untracked(|d| {
                let mut next = d.clone();
                next.hover(&id, intent);
                next != *d
            });
            if changed {
                drag.update(|d| d.hover(&id, intent));
            }
        }
    };

    let on_dragleave = {
        let id = id.clone();
        move |ev: web_sys::DragEvent| {
            let Some(row) = row_ref.get_untracked() else {
                return;
            };
            let inside = drag_left_into_descendant(&ev, &row);
            if drag.with_untracked(|d| d.indicator_for(&id).is_some()) {
                drag.update(|d| d.leave(&id, inside));
            }
        }
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();

        let Some(session) = drag.try_update(|d| d.take_drop()).flatten() else {
            return;
        };
        let target = item.with_value(drop_target);
        if session.dragged_id() == target.id {
            return;
        }
        let Some(intent) = intent_at(&ev) else {
            return;
        };
        dispatch_drop(store.clone(), sync.clone(), session, target, intent);
    };

    let on_contextmenu = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        overlay.set(Overlay::ContextMenu {
            subject: item.with_value(|i| DialogSubject::from(i)),
            x: f64::from(ev.client_x()),
            y: f64::from(ev.client_y()),
        });
    };

    view! {
        <div
            node_ref=row_ref
            data-name="TreeRow"
            data-bookmark-id=id
            class=class
            style=padding
            draggable="true"
            on:click=move |_| on_activate.run(())
            on:dragstart=on_dragstart
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:drop=on_drop
            on:dragend=move |_| drag.update(|d| d.end())
            on:contextmenu=on_contextmenu
        >
            {children()}
        </div>
    }
}

#[component]
fn FolderNode(
    item: ProjectedItem,
    projection: Arc<TreeProjection>,
    filter: Memo<FilterView>,
) -> impl IntoView {
    let ctx = expect_context::<PanelContext>();
    let expanded_set = ctx.0.expanded;

    let id = item.id.clone();
    let is_expanded = {
        let id = id.clone();
        move || filter.with(|f| f.is_expanded(&id))
    };
    let toggle = {
        let id = id.clone();
        move |_: ()| {
            expanded_set.update(|s| {
                s.toggle(&id);
            });
        }
    };

    let title = item.title.clone();
    let children = item.children.clone();
    let chevron_expanded = is_expanded.clone();

    view! {
        <div data-name="FolderContainer">
            <Row item=item on_activate=toggle>
                <span class=move || {
                    if chevron_expanded() {
                        "inline-flex rotate-90 transition-transform text-muted-foreground"
                    } else {
                        "inline-flex transition-transform text-muted-foreground"
                    }
                }>
                    <ChevronRight class="size-4" />
                </span>
                <Folder class="size-4 shrink-0 text-amber-500" />
                <span class="truncate">{title}</span>
            </Row>
            <Show when=is_expanded>
                {children
                    .iter()
                    .map(|&pos| {
                        view! { <TreeNode projection=projection.clone() pos=pos filter=filter /> }
                    })
                    .collect_view()}
            </Show>
        </div>
    }
}

#[component]
fn BookmarkLeaf(item: ProjectedItem) -> impl IntoView {
    let ctx = expect_context::<PanelContext>();
    let url = item.url.clone().unwrap_or_default();
    let icon = ctx.0.favicons.resolve(&url);
    let title = if item.title.is_empty() {
        url.clone()
    } else {
        item.title.clone()
    };

    let on_icon_error = move |ev: &web_sys::Event| {
        let Some(img) = event_element(ev).and_then(|el| el.dyn_into::<web_sys::HtmlImageElement>().ok())
        else {
            return;
        };
        if img.src() != FALLBACK_ICON {
            img.set_src(FALLBACK_ICON);
        }
    };

    let href = url.clone();
    view! {
        <Row item=item on_activate=move |_: ()| open_in_new_tab(href.clone())>
            <span class="inline-block size-4 shrink-0" />
            <img
                class="size-4 shrink-0"
                width="16"
                height="16"
                alt=""
                src=icon
                on:error=move |ev| on_icon_error(&ev)
            />
            <span class="truncate" title=url>{title}</span>
        </Row>
    }
}

#[component]
fn TreeNode(projection: Arc<TreeProjection>, pos: usize, filter: Memo<FilterView>) -> AnyView {
    let Some(item) = projection.at(pos).cloned() else {
        return ().into_any();
    };

    let id = item.id.clone();
    let hidden = move || filter.with(|f| !f.is_visible(&id));

    let node = if item.is_folder() {
        view! { <FolderNode item=item projection=projection.clone() filter=filter /> }.into_any()
    } else {
        view! { <BookmarkLeaf item=item /> }.into_any()
    };

    view! { <div class:hidden=hidden>{node}</div> }.into_any()
}

/// Scrollable bookmark tree. The whole tree is rebuilt whenever the projection changes.
#[component]
pub(crate) fn BookmarkTree() -> impl IntoView {
    let ctx = expect_context::<PanelContext>();
    let PanelState {
        projection,
        expanded,
        search_query,
        scroll_ref,
        ..
    } = ctx.0;

    let filter = Memo::new(move |_| {
        let query = SearchQuery::new(&search_query.get());
        projection.with(|p| expanded.with(|e| apply_filter(p, &query, e)))
    });

    let rows = move || {
        let projection = Arc::new(projection.get());
        let roots = projection.roots().to_vec();
        roots
            .into_iter()
            .map(|pos| view! { <TreeNode projection=projection.clone() pos=pos filter=filter /> })
            .collect_view()
    };

    let empty = move || {
        let p = projection.get();
        !p.is_empty() && filter.with(|f| f.visible_count(&p) == 0)
    };

    view! {
        <div node_ref=scroll_ref data-name="BookmarkTree" class="min-h-0 flex-1 overflow-y-auto py-1">
            {rows}
            <Show when=empty>
                <div class="px-4 py-6 text-center text-xs text-muted-foreground">"No matching bookmarks"</div>
            </Show>
        </div>
    }
}
