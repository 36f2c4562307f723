use crate::components::ui::Input;
use crate::dialogs::OverlayHost;
use crate::state::{PanelContext, PanelState};
use crate::tree::BookmarkTree;
use icons::Search;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let state = PanelState::from_environment();

    // Remote changes arrive as runtime messages; the first load is a plain reload.
    state.sync.listen_for_changes();
    state.sync.reload();

    provide_context(PanelContext(state));

    view! { <SidePanel /> }
}

#[component]
fn SidePanel() -> impl IntoView {
    let ctx = expect_context::<PanelContext>();
    let search_query = ctx.0.search_query;

    view! {
        <div data-name="SidePanel" class="flex h-screen flex-col bg-background text-foreground">
            <div class="relative border-b p-2">
                <Search class="pointer-events-none absolute left-4 top-1/2 size-4 -translate-y-1/2 text-muted-foreground" />
                <Input
                    r#type="search"
                    class="h-8 pl-8"
                    placeholder="Search bookmarks"
                    bind_value=search_query
                />
            </div>
            <BookmarkTree />
            <OverlayHost />
        </div>
    }
}
