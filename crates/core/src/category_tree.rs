//! In-memory index over the category forest.
//!
//! Categories reference their parent by id only, so the hierarchy is
//! resolved here by lookup rather than by pointers. Every traversal is
//! iterative and tracks visited ids, which keeps it finite even if the
//! stored data were to contain a cycle.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Slug};

/// A category as seen by the tree: identity, label and parent link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub parent_id: Option<CategoryId>,
}

/// Separator used when rendering a category's full path.
pub const PATH_SEPARATOR: &str = " > ";

/// Parent/child index over a set of categories.
///
/// Children and roots keep the order in which nodes were supplied.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: HashMap<CategoryId, CategoryNode>,
    by_slug: HashMap<Slug, CategoryId>,
    children: HashMap<CategoryId, Vec<CategoryId>>,
    roots: Vec<CategoryId>,
}

impl CategoryTree {
    /// Build the index from a flat list of categories.
    #[must_use]
    pub fn new(nodes: impl IntoIterator<Item = CategoryNode>) -> Self {
        let mut tree = Self::default();

        for node in nodes {
            match node.parent_id {
                Some(parent) => tree.children.entry(parent).or_default().push(node.id),
                None => tree.roots.push(node.id),
            }
            tree.by_slug.insert(node.slug.clone(), node.id);
            tree.nodes.insert(node.id, node);
        }

        tree
    }

    /// Number of categories in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a category by id.
    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&CategoryNode> {
        self.nodes.get(&id)
    }

    /// Look up a category by slug.
    #[must_use]
    pub fn find_by_slug(&self, slug: &Slug) -> Option<&CategoryNode> {
        self.by_slug.get(slug).and_then(|id| self.nodes.get(id))
    }

    /// Top-level categories (those without a parent).
    pub fn roots(&self) -> impl Iterator<Item = &CategoryNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Direct children of a category.
    pub fn children(&self, id: CategoryId) -> impl Iterator<Item = &CategoryNode> {
        self.child_ids(id).iter().filter_map(|id| self.nodes.get(id))
    }

    fn child_ids(&self, id: CategoryId) -> &[CategoryId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// All subcategories of `id` at any depth, excluding `id` itself.
    ///
    /// Returned breadth-first; each descendant appears exactly once.
    /// Unknown ids have no descendants.
    #[must_use]
    pub fn descendants(&self, id: CategoryId) -> Vec<CategoryId> {
        let mut seen = HashSet::from([id]);
        let mut queue: VecDeque<CategoryId> = VecDeque::from([id]);
        let mut out = Vec::new();

        while let Some(current) = queue.pop_front() {
            for &child in self.child_ids(current) {
                if seen.insert(child) {
                    out.push(child);
                    queue.push_back(child);
                }
            }
        }

        out
    }

    /// The category itself followed by all of its descendants.
    ///
    /// This is the id set a category page filters products by.
    #[must_use]
    pub fn scope(&self, id: CategoryId) -> Vec<CategoryId> {
        let mut ids = vec![id];
        ids.extend(self.descendants(id));
        ids
    }

    /// The chain from the root down to `id`, inclusive.
    ///
    /// Empty if `id` is unknown.
    #[must_use]
    pub fn path(&self, id: CategoryId) -> Vec<&CategoryNode> {
        let mut seen = HashSet::new();
        let mut chain = Vec::new();
        let mut cursor = self.nodes.get(&id);

        while let Some(node) = cursor {
            if !seen.insert(node.id) {
                break;
            }
            chain.push(node);
            cursor = node.parent_id.and_then(|parent| self.nodes.get(&parent));
        }

        chain.reverse();
        chain
    }

    /// Full display name, e.g. `"Books > Programming > Rust"`.
    #[must_use]
    pub fn display_name(&self, id: CategoryId) -> Option<String> {
        let path = self.path(id);
        if path.is_empty() {
            return None;
        }

        Some(
            path.iter()
                .map(|node| node.name.as_str())
                .collect::<Vec<_>>()
                .join(PATH_SEPARATOR),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn node(id: i32, name: &str, parent: Option<i32>) -> CategoryNode {
        CategoryNode {
            id: CategoryId::new(id),
            name: name.to_string(),
            slug: Slug::from_name(name).unwrap(),
            parent_id: parent.map(CategoryId::new),
        }
    }

    fn ids(raw: &[i32]) -> Vec<CategoryId> {
        raw.iter().copied().map(CategoryId::new).collect()
    }

    /// ```text
    /// 1 Books
    /// ├── 2 Fiction
    /// │   └── 4 Fantasy
    /// │       └── 6 Epic Fantasy
    /// └── 3 Programming
    ///     └── 5 Rust
    /// 7 Music
    /// └── 8 Vinyl
    /// ```
    fn sample_tree() -> CategoryTree {
        CategoryTree::new([
            node(1, "Books", None),
            node(2, "Fiction", Some(1)),
            node(3, "Programming", Some(1)),
            node(4, "Fantasy", Some(2)),
            node(5, "Rust", Some(3)),
            node(6, "Epic Fantasy", Some(4)),
            node(7, "Music", None),
            node(8, "Vinyl", Some(7)),
        ])
    }

    #[test]
    fn test_descendants_depth_three() {
        let tree = sample_tree();
        let mut found = tree.descendants(CategoryId::new(1));
        found.sort();
        assert_eq!(found, ids(&[2, 3, 4, 5, 6]));
    }

    #[test]
    fn test_descendants_are_breadth_first_and_unique() {
        let tree = sample_tree();
        assert_eq!(tree.descendants(CategoryId::new(1)), ids(&[2, 3, 4, 5, 6]));
        assert_eq!(tree.descendants(CategoryId::new(2)), ids(&[4, 6]));
    }

    #[test]
    fn test_descendants_exclude_other_branches() {
        let tree = sample_tree();
        let found = tree.descendants(CategoryId::new(3));
        assert_eq!(found, ids(&[5]));
        assert!(!found.contains(&CategoryId::new(8)));
    }

    #[test]
    fn test_descendants_of_leaf_and_unknown() {
        let tree = sample_tree();
        assert!(tree.descendants(CategoryId::new(6)).is_empty());
        assert!(tree.descendants(CategoryId::new(99)).is_empty());
    }

    #[test]
    fn test_descendants_terminate_on_cycle() {
        let tree = CategoryTree::new([node(1, "A", Some(2)), node(2, "B", Some(1))]);
        assert_eq!(tree.descendants(CategoryId::new(1)), ids(&[2]));
        assert_eq!(tree.path(CategoryId::new(1)).len(), 2);
    }

    #[test]
    fn test_scope_includes_self_first() {
        let tree = sample_tree();
        assert_eq!(tree.scope(CategoryId::new(2)), ids(&[2, 4, 6]));
        assert_eq!(tree.scope(CategoryId::new(8)), ids(&[8]));
    }

    #[test]
    fn test_roots_and_children() {
        let tree = sample_tree();
        let roots: Vec<_> = tree.roots().map(|n| n.name.as_str()).collect();
        assert_eq!(roots, ["Books", "Music"]);

        let children: Vec<_> = tree
            .children(CategoryId::new(1))
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(children, ["Fiction", "Programming"]);
        assert_eq!(tree.children(CategoryId::new(5)).count(), 0);
    }

    #[test]
    fn test_display_name_is_full_path() {
        let tree = sample_tree();
        assert_eq!(
            tree.display_name(CategoryId::new(6)).unwrap(),
            "Books > Fiction > Fantasy > Epic Fantasy"
        );
        assert_eq!(tree.display_name(CategoryId::new(7)).unwrap(), "Music");
        assert!(tree.display_name(CategoryId::new(42)).is_none());
    }

    #[test]
    fn test_find_by_slug() {
        let tree = sample_tree();
        let slug = Slug::parse("epic-fantasy").unwrap();
        assert_eq!(tree.find_by_slug(&slug).unwrap().id, CategoryId::new(6));
        assert!(tree.find_by_slug(&Slug::parse("nope").unwrap()).is_none());
        assert_eq!(tree.len(), 8);
        assert!(!tree.is_empty());
    }
}
