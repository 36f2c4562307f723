use super::{BookmarkStore, StoreError, StoreErrorKind, StoreFuture, StoreResult};
use crate::models::{BookmarkNode, MoveDestination};
use std::sync::{Arc, Mutex};

/// A store call as observed by [`MemoryBookmarkStore`]. Only read back by tests.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum StoreCall {
    GetTree,
    GetNode(String),
    Move(String, MoveDestination),
    UpdateTitle(String, String),
    Remove(String),
    RemoveSubtree(String),
}

impl StoreCall {
    #[cfg(test)]
    pub fn is_mutation(&self) -> bool {
        !matches!(self, StoreCall::GetTree | StoreCall::GetNode(_))
    }
}

struct Inner {
    root: BookmarkNode,
    #[cfg_attr(not(test), allow(dead_code))]
    calls: Vec<StoreCall>,
}

/// In-process bookmark tree with the same contract as the host store.
///
/// Backs the panel when no extension host is present, and doubles as the test double.
#[derive(Clone)]
pub(crate) struct MemoryBookmarkStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBookmarkStore {
    pub fn from_tree(mut root: BookmarkNode) -> Self {
        root.parent_id = None;
        root.index = None;
        normalize(&mut root);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                root,
                calls: vec![],
            })),
        }
    }

    /// A small tree with the two usual top-level collections.
    pub fn seeded() -> Self {
        fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> BookmarkNode {
            BookmarkNode {
                id: id.to_string(),
                parent_id: None,
                index: None,
                title: title.to_string(),
                url: None,
                children: Some(children),
            }
        }
        fn bookmark(id: &str, title: &str, url: &str) -> BookmarkNode {
            BookmarkNode {
                id: id.to_string(),
                parent_id: None,
                index: None,
                title: title.to_string(),
                url: Some(url.to_string()),
                children: None,
            }
        }

        Self::from_tree(folder(
            "0",
            "",
            vec![
                folder(
                    "1",
                    "Bookmarks bar",
                    vec![
                        bookmark("10", "Rust", "https://www.rust-lang.org/"),
                        folder(
                            "11",
                            "Docs",
                            vec![
                                bookmark("12", "std", "https://doc.rust-lang.org/std/"),
                                bookmark("13", "Leptos book", "https://book.leptos.dev/"),
                            ],
                        ),
                        bookmark("14", "crates.io", "https://crates.io/"),
                    ],
                ),
                folder(
                    "2",
                    "Other bookmarks",
                    vec![bookmark("20", "MDN", "https://developer.mozilla.org/")],
                ),
            ],
        ))
    }

    #[cfg(test)]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner
            .lock()
            .map(|inner| inner.calls.clone())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn mutations(&self) -> Vec<StoreCall> {
        self.calls().into_iter().filter(|c| c.is_mutation()).collect()
    }

    fn with_inner<T>(
        &self,
        call: StoreCall,
        f: impl FnOnce(&mut BookmarkNode) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut inner = self.inner.lock().map_err(|_| StoreError {
            kind: StoreErrorKind::Host,
            message: "bookmark store lock poisoned".to_string(),
        })?;
        inner.calls.push(call);
        f(&mut inner.root)
    }
}

/// Rewrites `parent_id`/`index` of every descendant from the tree structure.
fn normalize(node: &mut BookmarkNode) {
    let parent_id = node.id.clone();
    if let Some(children) = node.children.as_mut() {
        for (i, child) in children.iter_mut().enumerate() {
            child.parent_id = Some(parent_id.clone());
            child.index = Some(i as u32);
            normalize(child);
        }
    }
}

fn find_mut<'a>(node: &'a mut BookmarkNode, id: &str) -> Option<&'a mut BookmarkNode> {
    if node.id == id {
        return Some(node);
    }
    node.children
        .as_mut()?
        .iter_mut()
        .find_map(|c| find_mut(c, id))
}

/// Detaches `id` from its parent, returning it with its subtree.
fn take(root: &mut BookmarkNode, id: &str) -> Option<BookmarkNode> {
    let children = root.children.as_mut()?;
    if let Some(pos) = children.iter().position(|c| c.id == id) {
        return Some(children.remove(pos));
    }
    children.iter_mut().find_map(|c| take(c, id))
}

/// Root and the top-level collections are fixed.
fn ensure_modifiable(root: &BookmarkNode, id: &str) -> StoreResult<()> {
    if root.id == id || root.children().iter().any(|c| c.id == id) {
        return Err(StoreError {
            kind: StoreErrorKind::InvalidMove,
            message: "Can't modify the root bookmark folders.".to_string(),
        });
    }
    Ok(())
}

fn move_in(
    root: &mut BookmarkNode,
    id: &str,
    destination: &MoveDestination,
) -> StoreResult<BookmarkNode> {
    let node = root.find(id).ok_or_else(|| StoreError::not_found(id))?;
    ensure_modifiable(root, id)?;

    let parent_id = destination
        .parent_id
        .clone()
        .or_else(|| node.parent_id.clone())
        .ok_or_else(|| StoreError::invalid_move("node has no parent"))?;

    if node.find(&parent_id).is_some() {
        return Err(StoreError::invalid_move("destination is inside the moved node"));
    }
    match root.find(&parent_id) {
        None => return Err(StoreError::not_found(&parent_id)),
        Some(parent) if !parent.is_folder() => {
            return Err(StoreError::invalid_move("destination is not a folder"))
        }
        Some(_) => {}
    }

    let moved = take(root, id).ok_or_else(|| StoreError::not_found(id))?;
    let parent = find_mut(root, &parent_id).ok_or_else(|| StoreError::not_found(&parent_id))?;
    let siblings = parent.children.get_or_insert_with(Vec::new);
    let at = destination
        .index
        .map(|i| (i as usize).min(siblings.len()))
        .unwrap_or(siblings.len());
    siblings.insert(at, moved);

    normalize(root);
    root.find(id)
        .map(BookmarkNode::detached)
        .ok_or_else(|| StoreError::not_found(id))
}

fn remove_in(root: &mut BookmarkNode, id: &str, recursive: bool) -> StoreResult<()> {
    let node = root.find(id).ok_or_else(|| StoreError::not_found(id))?;
    ensure_modifiable(root, id)?;
    if !recursive && node.child_count() > 0 {
        return Err(StoreError {
            kind: StoreErrorKind::Host,
            message: "Can't remove non-empty folder (use recursive to force).".to_string(),
        });
    }
    take(root, id).ok_or_else(|| StoreError::not_found(id))?;
    normalize(root);
    Ok(())
}

impl BookmarkStore for MemoryBookmarkStore {
    fn get_tree<'a>(&'a self) -> StoreFuture<'a, BookmarkNode> {
        let result = self.with_inner(StoreCall::GetTree, |root| Ok(root.clone()));
        Box::pin(async move { result })
    }

    fn get_node<'a>(&'a self, id: &'a str) -> StoreFuture<'a, BookmarkNode> {
        let result = self.with_inner(StoreCall::GetNode(id.to_string()), |root| {
            root.find(id)
                .map(BookmarkNode::detached)
                .ok_or_else(|| StoreError::not_found(id))
        });
        Box::pin(async move { result })
    }

    fn move_node<'a>(
        &'a self,
        id: &'a str,
        destination: MoveDestination,
    ) -> StoreFuture<'a, BookmarkNode> {
        let call = StoreCall::Move(id.to_string(), destination.clone());
        let result = self.with_inner(call, |root| move_in(root, id, &destination));
        Box::pin(async move { result })
    }

    fn update_title<'a>(&'a self, id: &'a str, title: &'a str) -> StoreFuture<'a, BookmarkNode> {
        let call = StoreCall::UpdateTitle(id.to_string(), title.to_string());
        let result = self.with_inner(call, |root| {
            ensure_modifiable(root, id)?;
            let node = find_mut(root, id).ok_or_else(|| StoreError::not_found(id))?;
            node.title = title.to_string();
            Ok(node.detached())
        });
        Box::pin(async move { result })
    }

    fn remove<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        let result = self.with_inner(StoreCall::Remove(id.to_string()), |root| {
            remove_in(root, id, false)
        });
        Box::pin(async move { result })
    }

    fn remove_subtree<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        let result = self.with_inner(StoreCall::RemoveSubtree(id.to_string()), |root| {
            remove_in(root, id, true)
        });
        Box::pin(async move { result })
    }
}
