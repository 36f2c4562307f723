use super::{BookmarkStore, StoreError, StoreFuture};
use crate::bridge;
use crate::models::{BookmarkNode, MoveDestination};

/// Adapter over the extension's `chrome.bookmarks` API.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ChromeBookmarkStore;

impl ChromeBookmarkStore {
    /// False outside an extension page (or on non-wasm targets).
    pub fn is_available() -> bool {
        bridge::bookmarks_available()
    }
}

impl BookmarkStore for ChromeBookmarkStore {
    fn get_tree<'a>(&'a self) -> StoreFuture<'a, BookmarkNode> {
        Box::pin(async { bridge::get_tree().await.map_err(StoreError::from_host) })
    }

    fn get_node<'a>(&'a self, id: &'a str) -> StoreFuture<'a, BookmarkNode> {
        Box::pin(async move { bridge::get_node(id).await.map_err(StoreError::from_host) })
    }

    fn move_node<'a>(
        &'a self,
        id: &'a str,
        destination: MoveDestination,
    ) -> StoreFuture<'a, BookmarkNode> {
        Box::pin(async move {
            bridge::move_node(id, &destination)
                .await
                .map_err(StoreError::from_host)
        })
    }

    fn update_title<'a>(&'a self, id: &'a str, title: &'a str) -> StoreFuture<'a, BookmarkNode> {
        Box::pin(async move {
            bridge::update_title(id, title)
                .await
                .map_err(StoreError::from_host)
        })
    }

    fn remove<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move { bridge::remove(id).await.map_err(StoreError::from_host) })
    }

    fn remove_subtree<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move { bridge::remove_tree(id).await.map_err(StoreError::from_host) })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::store::StoreErrorKind;

    #[test]
    fn test_native_build_reports_unavailable() {
        assert!(!ChromeBookmarkStore::is_available());
        let err = futures::executor::block_on(ChromeBookmarkStore.get_tree())
            .expect_err("no host outside wasm32");
        assert_eq!(err.kind, StoreErrorKind::Unavailable);
    }
}
