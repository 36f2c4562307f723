use crate::config::PanelConfig;
use crate::dialogs::Overlay;
use crate::dnd::DragController;
use crate::favicon::FaviconResolver;
use crate::store::{ChromeBookmarkStore, MemoryBookmarkStore, SharedStore};
use crate::sync::SyncController;
use crate::tree::{ExpandedFolderSet, FullRebuildRenderer, SharedRenderer, TreeProjection};
use leptos::html;
use leptos::logging::log;
use leptos::prelude::*;
use std::sync::Arc;

/// Everything the panel keeps for one session. Nothing here outlives the page.
#[derive(Clone)]
pub(crate) struct PanelState {
    pub config: Arc<PanelConfig>,
    pub favicons: Arc<FaviconResolver>,
    pub store: SharedStore,

    /// Last rendered snapshot.
    pub projection: RwSignal<TreeProjection>,
    pub expanded: RwSignal<ExpandedFolderSet>,
    pub drag: RwSignal<DragController>,

    /// Raw search input; normalized when the filter runs.
    pub search_query: RwSignal<String>,
    pub overlay: RwSignal<Overlay>,

    /// Scrollable tree container.
    pub scroll_ref: NodeRef<html::Div>,
    pub sync: SyncController,
}

impl PanelState {
    pub fn new(config: PanelConfig, store: SharedStore) -> Self {
        let renderer: SharedRenderer = Arc::new(FullRebuildRenderer {
            root: config.projection_root(),
        });
        let projection = RwSignal::new(TreeProjection::default());
        let scroll_ref = NodeRef::new();
        let sync = SyncController::new(store.clone(), renderer, projection, scroll_ref);

        Self {
            favicons: Arc::new(FaviconResolver::new(&config)),
            config: Arc::new(config),
            store,
            projection,
            expanded: RwSignal::new(ExpandedFolderSet::default()),
            drag: RwSignal::new(DragController::default()),
            search_query: RwSignal::new(String::new()),
            overlay: RwSignal::new(Overlay::None),
            scroll_ref,
            sync,
        }
    }

    /// Uses the extension's bookmarks when present, otherwise a seeded in-memory tree.
    pub fn from_environment() -> Self {
        let store: SharedStore = if ChromeBookmarkStore::is_available() {
            Arc::new(ChromeBookmarkStore)
        } else {
            log!("[state] chrome.bookmarks unavailable, using the in-memory preview store");
            Arc::new(MemoryBookmarkStore::seeded())
        };
        Self::new(PanelConfig::from_window(), store)
    }
}

#[derive(Clone)]
pub(crate) struct PanelContext(pub PanelState);
