//! Tree projection: the flattened, render-ready view of a bookmark tree snapshot.
//!
//! Rendering always rebuilds the projection from a full snapshot. Expand/collapse state is kept
//! outside the projection (see [`ExpandedFolderSet`]) so that rebuilding never loses it.

mod view;

pub(crate) use view::BookmarkTree;

use crate::models::{BookmarkNode, NodeKind};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Folders whose children are currently shown. Ids of deleted folders may linger; they are
/// never looked up by a live item so they are harmless.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ExpandedFolderSet(HashSet<String>);

impl ExpandedFolderSet {
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Flips `id` and returns whether it is now expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Where the projection starts inside the snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum ProjectionRoot {
    /// The root's children are the top-level collections ("bar", "other", ...). They are
    /// always open and never shown; their children are the depth-0 items.
    #[default]
    TopLevelCollections,
    /// The root's children themselves are the depth-0 items.
    RootChildren,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ProjectedItem {
    pub id: String,
    pub parent_id: String,
    pub kind: NodeKind,
    pub title: String,
    pub title_norm: String,
    pub url: Option<String>,
    pub url_norm: Option<String>,
    pub depth: usize,
    pub index: u32,
    /// Immediate children in the snapshot, including ones the projection skips.
    pub child_count: usize,
    /// Positions of projected children in [`TreeProjection::items`].
    pub children: Vec<usize>,
}

impl ProjectedItem {
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Detached node as of the last render, used as the drag snapshot.
    pub fn to_node(&self) -> BookmarkNode {
        BookmarkNode {
            id: self.id.clone(),
            parent_id: Some(self.parent_id.clone()),
            index: Some(self.index),
            title: self.title.clone(),
            url: self.url.clone(),
            children: None,
        }
    }
}

/// Items in pre-order: every folder precedes its descendants.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TreeProjection {
    items: Vec<ProjectedItem>,
    roots: Vec<usize>,
    by_id: HashMap<String, usize>,
}

impl TreeProjection {
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ProjectedItem] {
        &self.items
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn at(&self, pos: usize) -> Option<&ProjectedItem> {
        self.items.get(pos)
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn get(&self, id: &str) -> Option<&ProjectedItem> {
        self.by_id.get(id).and_then(|&pos| self.items.get(pos))
    }

    fn push(&mut self, node: &BookmarkNode, parent_id: &str, depth: usize) -> Option<usize> {
        if node.title.is_empty() && node.url.is_none() {
            return None;
        }

        let pos = self.items.len();
        self.items.push(ProjectedItem {
            id: node.id.clone(),
            parent_id: parent_id.to_string(),
            kind: node.kind(),
            title: node.title.clone(),
            title_norm: node.title.to_lowercase(),
            url: node.url.clone(),
            url_norm: node.url.as_ref().map(|u| u.to_lowercase()),
            depth,
            index: node.index.unwrap_or_default(),
            child_count: node.child_count(),
            children: vec![],
        });
        self.by_id.insert(node.id.clone(), pos);

        if node.is_folder() {
            let children: Vec<usize> = node
                .children()
                .iter()
                .filter_map(|child| self.push(child, &node.id, depth + 1))
                .collect();
            self.items[pos].children = children;
        }

        Some(pos)
    }
}

/// Turns a snapshot into a projection. Implementations must be pure in the snapshot.
pub(crate) trait TreeRenderer {
    fn render(&self, root: &BookmarkNode) -> TreeProjection;
}

pub(crate) type SharedRenderer = Arc<dyn TreeRenderer + Send + Sync>;

/// Rebuilds the whole projection on every call.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FullRebuildRenderer {
    pub root: ProjectionRoot,
}

impl TreeRenderer for FullRebuildRenderer {
    fn render(&self, root: &BookmarkNode) -> TreeProjection {
        let mut projection = TreeProjection::default();

        match self.root {
            ProjectionRoot::TopLevelCollections => {
                for collection in root.children() {
                    for node in collection.children() {
                        if let Some(pos) = projection.push(node, &collection.id, 0) {
                            projection.roots.push(pos);
                        }
                    }
                }
            }
            ProjectionRoot::RootChildren => {
                for node in root.children() {
                    if let Some(pos) = projection.push(node, &root.id, 0) {
                        projection.roots.push(pos);
                    }
                }
            }
        }

        projection
    }
}
