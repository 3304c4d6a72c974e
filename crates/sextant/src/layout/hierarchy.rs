//! Repository hierarchy
//!
//! Flat path listings are folded into a rooted tree stored in an index arena:
//! nodes live in one `Vec`, refer to each other by [`NodeId`], and keep their
//! children in insertion order. A path index makes insertion idempotent.

use std::collections::HashMap;

use log::{debug, trace};

use crate::model::repo::{EntryKind, FileEntry};

/// Name of the synthesized root node
pub const ROOT_NAME: &str = "repo";

/// Index of a node inside a [`HierarchyTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A file or directory of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    name: String,
    path: String,
    kind: EntryKind,
    size: u64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl HierarchyNode {
    /// The last path segment
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slash-joined segments from the root; empty for the root itself
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// An arena-backed file tree rooted at [`ROOT_NAME`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyTree {
    nodes: Vec<HierarchyNode>,
    by_path: HashMap<String, NodeId>,
}

impl Default for HierarchyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyTree {
    /// Creates a tree holding only the root directory
    pub fn new() -> Self {
        let root = HierarchyNode {
            name: ROOT_NAME.to_string(),
            path: String::new(),
            kind: EntryKind::Tree,
            size: 0,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            by_path: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when the tree holds nothing but its root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns the node with the given id.
    ///
    /// Ids are only ever handed out by this tree, so they are always valid
    /// for it.
    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.0]
    }

    /// Looks a node up by its full path; `""` is the root
    pub fn find(&self, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return Some(self.root());
        }
        self.by_path.get(path).copied()
    }

    /// Inserts an entry, synthesizing missing intermediate directories.
    ///
    /// Empty segments are discarded, so `a//b/` is the same as `a/b`. Nodes
    /// that already exist are reused unchanged: the first insertion of a path
    /// decides its type and size. Returns the id of the entry's node, or
    /// `None` when the path has no segments.
    pub fn insert(&mut self, entry: &FileEntry) -> Option<NodeId> {
        let segments: Vec<&str> = entry
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() {
            debug!(path = entry.path(); "Skipping entry without path segments");
            return None;
        }

        let mut cursor = self.root();
        let mut path = String::new();
        for (index, segment) in segments.iter().enumerate() {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(segment);

            if let Some(&existing) = self.by_path.get(&path) {
                cursor = existing;
                continue;
            }

            let is_last = index == segments.len() - 1;
            let id = NodeId(self.nodes.len());
            self.nodes.push(HierarchyNode {
                name: (*segment).to_string(),
                path: path.clone(),
                kind: if is_last { entry.kind() } else { EntryKind::Tree },
                size: if is_last { entry.size() } else { 0 },
                parent: Some(cursor),
                children: Vec::new(),
            });
            self.nodes[cursor.0].children.push(id);
            self.by_path.insert(path.clone(), id);
            trace!(path, is_last; "Hierarchy node created");
            cursor = id;
        }

        Some(cursor)
    }

    /// Depth-first pre-order walk starting at the root
    pub fn iter_depth_first(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.node(id).children.iter().rev().copied());
            Some(id)
        })
    }
}

/// Folds a flat listing into a tree.
///
/// # Examples
///
/// ```
/// # use sextant::layout::build_hierarchy;
/// # use sextant::model::repo::FileEntry;
/// let tree = build_hierarchy(&[FileEntry::file("src/a.js", 10), FileEntry::file("src/b.js", 5)]);
/// let root = tree.node(tree.root());
/// assert_eq!(root.children().len(), 1);
/// assert_eq!(tree.node(root.children()[0]).path(), "src");
/// ```
pub fn build_hierarchy(entries: &[FileEntry]) -> HierarchyTree {
    let mut tree = HierarchyTree::new();
    for entry in entries {
        tree.insert(entry);
    }
    debug!(entries = entries.len(), nodes = tree.len(); "Hierarchy built");
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(tree: &HierarchyTree) -> Vec<&str> {
        tree.iter_depth_first()
            .map(|id| tree.node(id).path())
            .collect()
    }

    #[test]
    fn test_root() {
        let tree = build_hierarchy(&[]);
        let root = tree.node(tree.root());
        assert_eq!(root.name(), "repo");
        assert_eq!(root.path(), "");
        assert_eq!(root.kind(), EntryKind::Tree);
        assert!(tree.is_empty());
        assert_eq!(tree.find(""), Some(tree.root()));
    }

    #[test]
    fn test_intermediate_directories_are_synthesized() {
        let tree = build_hierarchy(&[FileEntry::file("src/ui/app.tsx", 42)]);
        assert_eq!(paths(&tree), ["", "src", "src/ui", "src/ui/app.tsx"]);

        let ui = tree.node(tree.find("src/ui").unwrap());
        assert_eq!(ui.kind(), EntryKind::Tree);
        assert_eq!(ui.size(), 0);

        let app = tree.node(tree.find("src/ui/app.tsx").unwrap());
        assert_eq!(app.kind(), EntryKind::File);
        assert_eq!(app.size(), 42);
        assert_eq!(app.name(), "app.tsx");
    }

    #[test]
    fn test_empty_segments_are_discarded() {
        let tree = build_hierarchy(&[
            FileEntry::file("/docs//guide.md/", 1),
            FileEntry::file("", 3),
            FileEntry::file("///", 3),
        ]);
        assert_eq!(paths(&tree), ["", "docs", "docs/guide.md"]);
    }

    #[test]
    fn test_reinsertion_is_idempotent_and_first_wins() {
        let mut tree = build_hierarchy(&[FileEntry::file("a/b.rs", 7)]);
        let before = tree.clone();

        let id = tree.insert(&FileEntry::file("a/b.rs", 99));
        assert_eq!(tree, before);
        assert_eq!(id, tree.find("a/b.rs"));
        assert_eq!(tree.node(id.unwrap()).size(), 7);

        // An explicit directory entry after its contents changes nothing
        tree.insert(&FileEntry::tree("a"));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let tree = build_hierarchy(&[
            FileEntry::file("z.txt", 1),
            FileEntry::file("lib/x.rs", 1),
            FileEntry::file("a.txt", 1),
        ]);
        let names: Vec<_> = tree
            .node(tree.root())
            .children()
            .iter()
            .map(|&id| tree.node(id).name())
            .collect();
        assert_eq!(names, ["z.txt", "lib", "a.txt"]);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn entries_strategy() -> impl Strategy<Value = Vec<FileEntry>> {
        let segment = prop::sample::select(vec!["src", "lib", "a.rs", "b.js", "docs", ""]);
        let path = prop::collection::vec(segment, 0..5).prop_map(|segments| segments.join("/"));
        prop::collection::vec((path, 0u64..500), 0..25).prop_map(|items| {
            items
                .into_iter()
                .map(|(path, size)| FileEntry::file(path, size))
                .collect()
        })
    }

    fn check_paths_extend_parent_paths(entries: &[FileEntry]) -> Result<(), TestCaseError> {
        let tree = build_hierarchy(entries);
        for id in tree.iter_depth_first() {
            let node = tree.node(id);
            let Some(parent) = node.parent() else {
                prop_assert_eq!(id, tree.root());
                continue;
            };
            let parent = tree.node(parent);
            let expected = if parent.path().is_empty() {
                node.name().to_string()
            } else {
                format!("{}/{}", parent.path(), node.name())
            };
            prop_assert_eq!(node.path(), expected.as_str());
            prop_assert_eq!(tree.find(node.path()), Some(id));
        }
        Ok(())
    }

    fn check_reinsertion_is_idempotent(entries: &[FileEntry]) -> Result<(), TestCaseError> {
        let once = build_hierarchy(entries);
        let mut twice = once.clone();
        for entry in entries {
            twice.insert(entry);
        }
        prop_assert_eq!(once, twice);
        Ok(())
    }

    proptest! {
        #[test]
        fn paths_extend_parent_paths(entries in entries_strategy()) {
            check_paths_extend_parent_paths(&entries)?;
        }

        #[test]
        fn reinsertion_is_idempotent(entries in entries_strategy()) {
            check_reinsertion_is_idempotent(&entries)?;
        }
    }
}
