//! Drag-and-drop: gesture state, drop intent from pointer geometry, and move resolution.

use crate::models::{BookmarkNode, MoveDestination, NodeKind};
use crate::store::{BookmarkStore, SharedStore, StoreResult};
use crate::sync::SyncController;
use leptos::logging::{error, log};
use leptos::task::spawn_local;

/// Portion of a folder row above which a drop reparents into the folder.
pub(crate) const REPARENT_THRESHOLD: f64 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::AsRefStr, strum::Display)]
pub(crate) enum DropIntent {
    #[strum(serialize = "drop-before")]
    InsertBefore,
    #[strum(serialize = "drop-into")]
    ReparentInto,
}

/// Vertical extent of a candidate row, in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BoxGeometry {
    pub top: f64,
    pub height: f64,
}

impl BoxGeometry {
    pub fn of(el: &web_sys::Element) -> Self {
        let rect = el.get_bounding_client_rect();
        Self {
            top: rect.top(),
            height: rect.height(),
        }
    }
}

pub(crate) fn compute_intent(kind: NodeKind, geometry: BoxGeometry, pointer_y: f64) -> DropIntent {
    if kind == NodeKind::Bookmark || geometry.height <= 0.0 {
        return DropIntent::InsertBefore;
    }
    let h = pointer_y - geometry.top;
    if h > REPARENT_THRESHOLD * geometry.height {
        DropIntent::ReparentInto
    } else {
        DropIntent::InsertBefore
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DragSession {
    pub dragged: BookmarkNode,
    pub dragged_parent_id: Option<String>,
}

impl DragSession {
    pub fn new(dragged: BookmarkNode) -> Self {
        let dragged_parent_id = dragged.parent_id.clone();
        Self {
            dragged,
            dragged_parent_id,
        }
    }

    pub fn dragged_id(&self) -> &str {
        &self.dragged.id
    }
}

/// A row under the pointer, as last rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DropTarget {
    pub id: String,
    pub parent_id: String,
    pub index: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DropIndicator {
    pub target_id: String,
    pub intent: DropIntent,
}

/// At most one session and one marked candidate at any time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct DragController {
    session: Option<DragSession>,
    indicator: Option<DropIndicator>,
}

impl DragController {
    pub fn start(&mut self, dragged: BookmarkNode) {
        self.session = Some(DragSession::new(dragged));
        self.indicator = None;
    }

    pub fn hover(&mut self, target_id: &str, intent: DropIntent) {
        self.indicator = match &self.session {
            Some(s) if s.dragged_id() != target_id => Some(DropIndicator {
                target_id: target_id.to_string(),
                intent,
            }),
            _ => None,
        };
    }

    /// `still_inside` is true when the pointer moved onto a descendant of the left row.
    pub fn leave(&mut self, target_id: &str, still_inside: bool) {
        if still_inside {
            return;
        }
        if self
            .indicator
            .as_ref()
            .is_some_and(|i| i.target_id == target_id)
        {
            self.indicator = None;
        }
    }

    /// Snapshot for the drop handler. Clears the indicator; the session stays until drag-end.
    pub fn take_drop(&mut self) -> Option<DragSession> {
        self.indicator = None;
        self.session.clone()
    }

    pub fn end(&mut self) {
        self.session = None;
        self.indicator = None;
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[cfg(test)]
    pub fn indicator(&self) -> Option<&DropIndicator> {
        self.indicator.as_ref()
    }

    pub fn indicator_for(&self, id: &str) -> Option<DropIntent> {
        self.indicator
            .as_ref()
            .filter(|i| i.target_id == id)
            .map(|i| i.intent)
    }

    pub fn is_dragging(&self, id: &str) -> bool {
        self.session.as_ref().is_some_and(|s| s.dragged_id() == id)
    }
}

/// Index to pass to the store when inserting before a sibling at `target_index`.
///
/// The store counts positions after the dragged node has left its old place, so a node that
/// currently sits before the target shifts the target down by one. `dragged_index` is `Some`
/// only when both share a parent.
pub(crate) fn resolve_insert_index(target_index: u32, dragged_index: Option<u32>) -> u32 {
    match dragged_index {
        Some(from) if from < target_index => target_index - 1,
        _ => target_index,
    }
}

/// Works out where the dragged node goes. `None` means the drop is a no-op.
pub(crate) async fn resolve_destination(
    store: &dyn BookmarkStore,
    session: &DragSession,
    target: &DropTarget,
    intent: DropIntent,
) -> StoreResult<Option<MoveDestination>> {
    if session.dragged_id() == target.id {
        return Ok(None);
    }

    if intent == DropIntent::ReparentInto {
        return Ok(Some(MoveDestination {
            parent_id: Some(target.id.clone()),
            index: None,
        }));
    }

    // The row may be stale; the store's view of the target wins.
    let fresh = store.get_node(&target.id).await?;
    let target_parent = fresh.parent_id.unwrap_or_else(|| target.parent_id.clone());
    let target_index = fresh.index.unwrap_or(target.index);

    let dragged_index = if session.dragged_parent_id.as_deref() == Some(target_parent.as_str()) {
        let current = store.get_node(session.dragged_id()).await?;
        current.index
    } else {
        None
    };

    Ok(Some(MoveDestination {
        parent_id: Some(target_parent),
        index: Some(resolve_insert_index(target_index, dragged_index)),
    }))
}

pub(crate) async fn execute_drop(
    store: &dyn BookmarkStore,
    session: &DragSession,
    target: &DropTarget,
    intent: DropIntent,
) -> StoreResult<Option<BookmarkNode>> {
    let Some(destination) = resolve_destination(store, session, target, intent).await? else {
        return Ok(None);
    };
    let moved = store.move_node(session.dragged_id(), destination).await?;
    Ok(Some(moved))
}

/// Runs a drop in the background and reloads the tree when the store accepted it.
pub(crate) fn dispatch_drop(
    store: SharedStore,
    sync: SyncController,
    session: DragSession,
    target: DropTarget,
    intent: DropIntent,
) {
    log!(
        "[dnd] drop dragged={} dragged_parent={:?} target={} target_parent={} intent={}",
        session.dragged_id(),
        session.dragged_parent_id,
        target.id,
        target.parent_id,
        intent
    );

    spawn_local(async move {
        match execute_drop(store.as_ref(), &session, &target, intent).await {
            Ok(Some(moved)) => {
                log!(
                    "[dnd] moved {} to parent {:?} at {:?}",
                    moved.id,
                    moved.parent_id,
                    moved.index
                );
                sync.reload();
            }
            Ok(None) => {}
            Err(e) => error!(
                "[dnd] move of {} failed ({}): {e}",
                session.dragged_id(),
                e.kind
            ),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBookmarkStore, StoreCall};
    use futures::executor::block_on;

    fn node(store: &MemoryBookmarkStore, id: &str) -> BookmarkNode {
        block_on(store.get_node(id)).expect("node exists")
    }

    fn target(store: &MemoryBookmarkStore, id: &str) -> DropTarget {
        let n = node(store, id);
        DropTarget {
            id: n.id.clone(),
            parent_id: n.parent_id.clone().unwrap_or_default(),
            index: n.index.unwrap_or_default(),
        }
    }

    fn flat_store(ids: &[String]) -> MemoryBookmarkStore {
        let children: Vec<BookmarkNode> = ids
            .iter()
            .map(|id| BookmarkNode {
                id: id.clone(),
                parent_id: None,
                index: None,
                title: format!("b{id}"),
                url: Some(format!("https://{id}.example/")),
                children: None,
            })
            .collect();
        let folder = |id: &str, children| BookmarkNode {
            id: id.to_string(),
            parent_id: None,
            index: None,
            title: "f".to_string(),
            url: None,
            children: Some(children),
        };
        MemoryBookmarkStore::from_tree(folder("0", vec![folder("1", children)]))
    }

    fn child_ids(store: &MemoryBookmarkStore, parent: &str) -> Vec<String> {
        let root = block_on(store.get_tree()).expect("tree");
        root.find(parent)
            .map(|p| p.children().iter().map(|c| c.id.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_intent_threshold_is_strict() {
        let g = BoxGeometry {
            top: 0.0,
            height: 100.0,
        };
        assert_eq!(compute_intent(NodeKind::Folder, g, 60.0), DropIntent::InsertBefore);
        assert_eq!(compute_intent(NodeKind::Folder, g, 60.5), DropIntent::ReparentInto);
        assert_eq!(compute_intent(NodeKind::Folder, g, 59.5), DropIntent::InsertBefore);
    }

    #[test]
    fn test_intent_uses_offset_within_box() {
        let g = BoxGeometry {
            top: 200.0,
            height: 20.0,
        };
        assert_eq!(compute_intent(NodeKind::Folder, g, 215.0), DropIntent::ReparentInto);
        assert_eq!(compute_intent(NodeKind::Folder, g, 205.0), DropIntent::InsertBefore);
    }

    #[test]
    fn test_bookmarks_and_flat_boxes_only_insert_before() {
        let g = BoxGeometry {
            top: 0.0,
            height: 100.0,
        };
        assert_eq!(compute_intent(NodeKind::Bookmark, g, 99.0), DropIntent::InsertBefore);
        let flat = BoxGeometry {
            top: 10.0,
            height: 0.0,
        };
        assert_eq!(compute_intent(NodeKind::Folder, flat, 50.0), DropIntent::InsertBefore);
    }

    #[test]
    fn test_intent_class_names() {
        assert_eq!(DropIntent::InsertBefore.as_ref(), "drop-before");
        assert_eq!(DropIntent::ReparentInto.to_string(), "drop-into");
    }

    #[test]
    fn test_same_parent_forward_move_decrements() {
        assert_eq!(resolve_insert_index(5, Some(2)), 4);
        assert_eq!(resolve_insert_index(2, Some(5)), 2);
    }

    #[test]
    fn test_cross_parent_move_keeps_index() {
        assert_eq!(resolve_insert_index(3, None), 3);
    }

    #[test]
    fn test_same_parent_reorder_against_store() {
        let ids: Vec<String> = (0..7).map(|i| format!("n{i}")).collect();
        let store = flat_store(&ids);
        let session = DragSession::new(node(&store, "n2"));
        let t = target(&store, "n5");

        let dest = block_on(resolve_destination(&store, &session, &t, DropIntent::InsertBefore))
            .expect("resolved")
            .expect("not a no-op");
        assert_eq!(dest.index, Some(4));
        assert_eq!(dest.parent_id.as_deref(), Some("1"));

        block_on(execute_drop(&store, &session, &t, DropIntent::InsertBefore)).expect("moved");
        assert_eq!(
            child_ids(&store, "1"),
            vec!["n0", "n1", "n3", "n4", "n2", "n5", "n6"]
        );
    }

    #[test]
    fn test_cross_parent_insert_before() {
        let store = MemoryBookmarkStore::seeded();
        // 20 lives in "Other"; 13 sits at index 1 of Docs.
        let session = DragSession::new(node(&store, "20"));
        let t = target(&store, "13");
        let dest = block_on(resolve_destination(&store, &session, &t, DropIntent::InsertBefore))
            .expect("resolved")
            .expect("not a no-op");
        assert_eq!(dest.parent_id.as_deref(), Some("11"));
        assert_eq!(dest.index, Some(1));

        block_on(execute_drop(&store, &session, &t, DropIntent::InsertBefore)).expect("moved");
        assert_eq!(child_ids(&store, "11"), vec!["12", "20", "13"]);
    }

    #[test]
    fn test_reparent_appends_without_index() {
        let store = MemoryBookmarkStore::seeded();
        let session = DragSession::new(node(&store, "10"));
        let t = target(&store, "11");
        block_on(execute_drop(&store, &session, &t, DropIntent::ReparentInto)).expect("moved");

        assert_eq!(
            store.mutations(),
            vec![StoreCall::Move(
                "10".to_string(),
                MoveDestination {
                    parent_id: Some("11".to_string()),
                    index: None,
                }
            )]
        );
        assert_eq!(child_ids(&store, "11"), vec!["12", "13", "10"]);
    }

    #[test]
    fn test_self_drop_is_a_no_op() {
        let store = MemoryBookmarkStore::seeded();
        let mut controller = DragController::default();
        controller.start(node(&store, "11"));
        controller.hover("11", DropIntent::ReparentInto);
        assert!(controller.indicator().is_none());

        let session = controller.take_drop().expect("session");
        let t = target(&store, "11");
        let moved = block_on(execute_drop(&store, &session, &t, DropIntent::ReparentInto))
            .expect("no error");
        assert!(moved.is_none());
        assert!(store.mutations().is_empty());
        assert!(controller.indicator().is_none());
    }

    #[test]
    fn test_failed_dragged_lookup_aborts_without_mutation() {
        let store = MemoryBookmarkStore::seeded();
        let mut ghost = node(&store, "10");
        ghost.id = "gone".to_string();
        let session = DragSession::new(ghost);
        let t = target(&store, "14");

        assert!(block_on(execute_drop(&store, &session, &t, DropIntent::InsertBefore)).is_err());
        assert!(store.mutations().is_empty());
    }

    #[test]
    fn test_failed_target_lookup_aborts_without_mutation() {
        let store = MemoryBookmarkStore::seeded();
        let session = DragSession::new(node(&store, "10"));
        let mut t = target(&store, "14");
        t.id = "gone".to_string();

        assert!(block_on(execute_drop(&store, &session, &t, DropIntent::InsertBefore)).is_err());
        assert!(store.mutations().is_empty());
    }

    #[test]
    fn test_cyclic_reparent_is_rejected() {
        let store = MemoryBookmarkStore::seeded();
        let session = DragSession::new(node(&store, "1"));
        let t = target(&store, "11");
        assert!(block_on(execute_drop(&store, &session, &t, DropIntent::ReparentInto)).is_err());
    }

    #[test]
    fn test_controller_marks_one_candidate() {
        let store = MemoryBookmarkStore::seeded();
        let mut c = DragController::default();

        c.hover("10", DropIntent::InsertBefore);
        assert!(c.indicator().is_none(), "no session, no indicator");

        c.start(node(&store, "14"));
        assert!(c.is_dragging("14"));
        c.hover("10", DropIntent::InsertBefore);
        c.hover("11", DropIntent::ReparentInto);
        assert_eq!(c.indicator_for("10"), None);
        assert_eq!(c.indicator_for("11"), Some(DropIntent::ReparentInto));

        c.leave("11", true);
        assert_eq!(c.indicator_for("11"), Some(DropIntent::ReparentInto));
        c.leave("10", false);
        assert_eq!(c.indicator_for("11"), Some(DropIntent::ReparentInto));
        c.leave("11", false);
        assert!(c.indicator().is_none());
    }

    #[test]
    fn test_drag_end_clears_everything() {
        let store = MemoryBookmarkStore::seeded();
        let mut c = DragController::default();
        c.start(node(&store, "14"));
        c.hover("10", DropIntent::InsertBefore);
        let snapshot = c.take_drop().expect("session");
        c.end();

        assert!(c.session().is_none());
        assert!(c.indicator().is_none());
        assert_eq!(snapshot.dragged_parent_id.as_deref(), Some("1"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    proptest::proptest! {
        #[test]
        fn prop_insert_before_lands_immediately_before_target(
            len in 2usize..12,
            a in 0usize..12,
            b in 0usize..12,
        ) {
            let a = a % len;
            let b = b % len;
            proptest::prop_assume!(a != b);

            let ids: Vec<String> = (0..len).map(|i| format!("n{i}")).collect();
            let store = flat_store(&ids);
            let session = DragSession::new(node(&store, &ids[a]));
            let t = target(&store, &ids[b]);

            block_on(execute_drop(&store, &session, &t, DropIntent::InsertBefore))
                .expect("move succeeds");

            let after = child_ids(&store, "1");
            proptest::prop_assert_eq!(after.len(), len);
            let pa = after.iter().position(|id| *id == ids[a]).expect("a present");
            let pb = after.iter().position(|id| *id == ids[b]).expect("b present");
            proptest::prop_assert_eq!(pa + 1, pb);
        }
    }
}
