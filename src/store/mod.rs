//! Bookmark store contract and its adapters.

mod chrome;
mod memory;

pub(crate) use chrome::ChromeBookmarkStore;
pub(crate) use memory::MemoryBookmarkStore;
#[cfg(test)]
pub(crate) use memory::StoreCall;

use crate::models::{BookmarkNode, MoveDestination};
use std::{future::Future, pin::Pin, sync::Arc};

/// Tag carried into diagnostics, e.g. `move of 12 failed (not_found): ...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum StoreErrorKind {
    NotFound,
    InvalidMove,
    Host,
    Decode,
    Unavailable,
}

#[derive(Clone, Debug)]
pub(crate) struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StoreError {
    pub fn not_found(id: &str) -> Self {
        Self {
            kind: StoreErrorKind::NotFound,
            message: format!("Can't find bookmark for id {id}"),
        }
    }

    pub fn invalid_move(reason: impl std::fmt::Display) -> Self {
        Self {
            kind: StoreErrorKind::InvalidMove,
            message: format!("Can't move node: {reason}"),
        }
    }

    /// Classifies a host error message. The host reports failures as plain strings.
    pub fn from_host(message: String) -> Self {
        let kind = if message.starts_with("decode:") || message.starts_with("encode:") {
            StoreErrorKind::Decode
        } else if message.contains("only available when compiled for wasm32") {
            StoreErrorKind::Unavailable
        } else if message.contains("Can't find") {
            StoreErrorKind::NotFound
        } else if message.contains("Can't move") || message.contains("Can't modify the root") {
            StoreErrorKind::InvalidMove
        } else {
            StoreErrorKind::Host
        };
        Self { kind, message }
    }
}

pub(crate) type StoreResult<T> = Result<T, StoreError>;

/// Object-safe boxed future used by [`BookmarkStore`].
pub(crate) type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + 'a>>;

/// Host bookmark store. Completions are ordered only by invocation order into the host.
pub(crate) trait BookmarkStore {
    /// Full tree, rooted at the implicit root node.
    fn get_tree<'a>(&'a self) -> StoreFuture<'a, BookmarkNode>;

    /// A single node without its children. Fails with `NotFound` for unknown ids.
    fn get_node<'a>(&'a self, id: &'a str) -> StoreFuture<'a, BookmarkNode>;

    /// Moves `id`. The destination index counts positions after `id` has been removed from its
    /// old place; `None` appends.
    fn move_node<'a>(
        &'a self,
        id: &'a str,
        destination: MoveDestination,
    ) -> StoreFuture<'a, BookmarkNode>;

    fn update_title<'a>(&'a self, id: &'a str, title: &'a str) -> StoreFuture<'a, BookmarkNode>;

    /// Removes a bookmark or an empty folder.
    fn remove<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()>;

    /// Removes a folder and everything below it.
    fn remove_subtree<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()>;
}

/// Store handle shared across the panel's components.
pub(crate) type SharedStore = Arc<dyn BookmarkStore + Send + Sync>;
