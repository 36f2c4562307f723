use serde::{Deserialize, Serialize};

/// A node of the host bookmark tree.
///
/// Mirrors the host's `BookmarkTreeNode` JSON shape (camelCase keys). Host-only fields such as
/// `dateAdded` are ignored. A node is a folder iff `children` is present, and a bookmark iff
/// `url` is present.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Position among siblings. Absent only on the root.
    #[serde(default)]
    pub index: Option<u32>,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Only populated by tree queries; single-node lookups leave it empty even for folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Folder,
    Bookmark,
}

impl BookmarkNode {
    pub fn kind(&self) -> NodeKind {
        if self.url.is_some() {
            NodeKind::Bookmark
        } else {
            NodeKind::Folder
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == NodeKind::Folder
    }

    pub fn children(&self) -> &[BookmarkNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Depth-first lookup including `self`.
    pub fn find(&self, id: &str) -> Option<&BookmarkNode> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(id))
    }

    /// Copy of this node without its subtree, the shape `getNode` returns.
    pub fn detached(&self) -> BookmarkNode {
        BookmarkNode {
            children: None,
            ..self.clone()
        }
    }
}

/// Target of a move request. A `None` index appends to the end of the new parent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoveDestination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

pub const BOOKMARK_CHANGED: &str = "BOOKMARK_CHANGED";

/// Runtime message exchanged between the background coordinator and the panel.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RuntimeMessage {
    #[serde(rename = "type")]
    pub kind: String,
}

impl RuntimeMessage {
    pub fn bookmark_changed() -> Self {
        Self {
            kind: BOOKMARK_CHANGED.to_string(),
        }
    }

    pub fn is_bookmark_changed(&self) -> bool {
        self.kind == BOOKMARK_CHANGED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_tree_node_contract_deserialize() {
        // Shape returned by the host tree query: root without index/parentId.
        let json = r#"{
            "id": "0",
            "title": "",
            "dateAdded": 1700000000000,
            "children": [
                {
                    "id": "1", "parentId": "0", "index": 0, "title": "Bookmarks bar",
                    "dateGroupModified": 1700000000000,
                    "children": [
                        {"id": "5", "parentId": "1", "index": 0, "title": "Rust", "url": "https://www.rust-lang.org/"},
                        {"id": "6", "parentId": "1", "index": 1, "title": "Empty", "children": []}
                    ]
                }
            ]
        }"#;
        let root: BookmarkNode = serde_json::from_str(json).expect("tree should parse");
        assert!(root.parent_id.is_none());
        assert!(root.index.is_none());

        let bar = &root.children()[0];
        assert_eq!(bar.parent_id.as_deref(), Some("0"));
        assert_eq!(bar.kind(), NodeKind::Folder);

        let rust = root.find("5").expect("bookmark present");
        assert_eq!(rust.kind(), NodeKind::Bookmark);
        assert_eq!(rust.index, Some(0));

        let empty = root.find("6").expect("folder present");
        assert!(empty.is_folder());
        assert_eq!(empty.child_count(), 0);
    }

    #[test]
    fn test_detached_drops_subtree_only() {
        let node = BookmarkNode {
            id: "7".to_string(),
            parent_id: Some("1".to_string()),
            index: Some(3),
            title: "Folder".to_string(),
            url: None,
            children: Some(vec![]),
        };
        let d = node.detached();
        assert!(d.children.is_none());
        assert_eq!(d.index, Some(3));
        assert_eq!(d.parent_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_move_destination_serialization_skips_missing_fields() {
        let into = MoveDestination {
            parent_id: Some("9".to_string()),
            index: None,
        };
        let v = serde_json::to_value(into).expect("should serialize");
        assert_eq!(v, serde_json::json!({"parentId": "9"}));
    }

    #[test]
    fn test_runtime_message_contract() {
        let msg: RuntimeMessage =
            serde_json::from_str(r#"{"type":"BOOKMARK_CHANGED"}"#).expect("should parse");
        assert!(msg.is_bookmark_changed());
        assert_eq!(
            serde_json::to_value(RuntimeMessage::bookmark_changed()).expect("should serialize"),
            serde_json::json!({"type": "BOOKMARK_CHANGED"})
        );
    }
}
