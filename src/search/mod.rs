use crate::tree::{ExpandedFolderSet, ProjectedItem, TreeProjection};
use std::collections::HashSet;

/// Trimmed, lower-cased search text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SearchQuery(String);

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bookmarks match on title or url. Folders never match by themselves.
    pub fn matches(&self, item: &ProjectedItem) -> bool {
        if item.is_folder() {
            return false;
        }
        item.title_norm.contains(&self.0)
            || item
                .url_norm
                .as_deref()
                .is_some_and(|u| u.contains(&self.0))
    }
}

/// Per-item visibility and expansion derived from a query. Never mutates the expanded set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FilterView {
    hidden: HashSet<String>,
    expanded: HashSet<String>,
}

impl FilterView {
    pub fn is_visible(&self, id: &str) -> bool {
        !self.hidden.contains(id)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn visible_count(&self, projection: &TreeProjection) -> usize {
        projection
            .items()
            .iter()
            .filter(|i| self.is_visible(&i.id))
            .count()
    }
}

pub(crate) fn apply_filter(
    projection: &TreeProjection,
    query: &SearchQuery,
    expanded: &ExpandedFolderSet,
) -> FilterView {
    let mut view = FilterView::default();

    if query.is_empty() {
        view.expanded = projection
            .items()
            .iter()
            .filter(|i| i.is_folder() && expanded.contains(&i.id))
            .map(|i| i.id.clone())
            .collect();
        return view;
    }

    // Pre-order reversed: children are decided before their folder.
    let items = projection.items();
    let mut visible = vec![false; items.len()];
    for (pos, item) in items.iter().enumerate().rev() {
        visible[pos] = if item.is_folder() {
            item.children.iter().any(|&c| visible[c])
        } else {
            query.matches(item)
        };
    }

    for (item, shown) in items.iter().zip(visible) {
        if !shown {
            view.hidden.insert(item.id.clone());
        } else if item.is_folder() {
            view.expanded.insert(item.id.clone());
        }
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::fixtures::sample_tree;
    use crate::tree::{FullRebuildRenderer, TreeRenderer};

    fn projection() -> TreeProjection {
        FullRebuildRenderer::default().render(&sample_tree())
    }

    #[test]
    fn test_query_is_trimmed_and_case_folded() {
        assert_eq!(SearchQuery::new("  ToKiO "), SearchQuery::new("tokio"));
        assert!(SearchQuery::new("   ").is_empty());
    }

    #[test]
    fn test_empty_query_restores_everything() {
        let p = projection();
        let mut expanded = ExpandedFolderSet::default();
        expanded.toggle("21");

        let view = apply_filter(&p, &SearchQuery::new(""), &expanded);
        assert_eq!(view.visible_count(&p), p.len());
        assert!(view.is_expanded("21"));
        assert!(!view.is_expanded("11"));
    }

    #[test]
    fn test_match_reveals_and_expands_ancestors() {
        let p = projection();
        let expanded = ExpandedFolderSet::default();

        let view = apply_filter(&p, &SearchQuery::new("TOKIO"), &expanded);
        assert!(view.is_visible("13"));
        assert!(view.is_visible("11"));
        assert!(view.is_expanded("11"));

        assert!(!view.is_visible("12"));
        assert!(!view.is_visible("10"));
        assert!(!view.is_visible("21"));
        assert!(!view.is_expanded("21"));
    }

    #[test]
    fn test_url_matches() {
        let p = projection();
        let view = apply_filter(&p, &SearchQuery::new("mozilla"), &ExpandedFolderSet::default());
        assert!(view.is_visible("20"));
        assert_eq!(view.visible_count(&p), 1);
    }

    #[test]
    fn test_folder_titles_alone_do_not_match() {
        let p = projection();
        let view = apply_filter(&p, &SearchQuery::new("docs"), &ExpandedFolderSet::default());
        assert!(!view.is_visible("11"));
    }

    #[test]
    fn test_no_match_hides_everything_and_expands_nothing() {
        let p = projection();
        let mut expanded = ExpandedFolderSet::default();
        expanded.toggle("11");

        let view = apply_filter(&p, &SearchQuery::new("zzz-nothing"), &expanded);
        assert_eq!(view.visible_count(&p), 0);
        assert!(p.items().iter().all(|i| !view.is_expanded(&i.id)));
        // The set itself is untouched, so clearing the query restores it.
        assert!(expanded.contains("11"));
        let cleared = apply_filter(&p, &SearchQuery::new(""), &expanded);
        assert!(cleared.is_expanded("11"));
    }
}
