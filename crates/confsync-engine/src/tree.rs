//! Folder tree built from discovered folder paths.
//!
//! Discovery order is arbitrary. Sorting paths as strings keeps a parent
//! before its children but interleaves unrelated folders (`"a b"` lands
//! between `"a"` and `"a/b"`). Walking a tree depth-first makes the
//! parent-before-child order explicit and keeps every subtree contiguous.

use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Node {
    is_folder: bool,
    children: BTreeMap<String, Node>,
}

/// Tree of page folders keyed by path segment.
#[derive(Debug, Default)]
pub struct FolderTree {
    root: Node,
    len: usize,
}

impl FolderTree {
    /// Build a tree from `/`-separated folder paths.
    ///
    /// Empty segments are ignored, so `"a//b/"` and `"a/b"` are the same
    /// folder. Paths that normalize to the root are dropped.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::default();
        for path in paths {
            tree.insert(path.as_ref());
        }
        tree
    }

    fn insert(&mut self, path: &str) {
        let mut node = &mut self.root;
        let mut depth = 0;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = node.children.entry(segment.to_owned()).or_default();
            depth += 1;
        }
        if depth > 0 && !node.is_folder {
            node.is_folder = true;
            self.len += 1;
        }
    }

    /// Number of folders in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no folders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a normalized path is a folder in the tree.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        let mut node = &self.root;
        let mut depth = 0;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            match node.children.get(segment) {
                Some(child) => node = child,
                None => return false,
            }
            depth += 1;
        }
        depth > 0 && node.is_folder
    }

    /// Folder paths in depth-first pre-order, siblings sorted by segment.
    ///
    /// Every folder appears after all of its ancestors that are folders.
    #[must_use]
    pub fn sync_order(&self) -> Vec<String> {
        let mut order = Vec::with_capacity(self.len);
        // Explicit stack; children pushed in reverse to pop in sorted order
        let mut stack: Vec<(String, &Node)> = self
            .root
            .children
            .iter()
            .rev()
            .map(|(segment, node)| (segment.clone(), node))
            .collect();

        while let Some((path, node)) = stack.pop() {
            for (segment, child) in node.children.iter().rev() {
                stack.push((format!("{path}/{segment}"), child));
            }
            if node.is_folder {
                order.push(path);
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn position(order: &[String], path: &str) -> usize {
        order.iter().position(|p| p == path).unwrap()
    }

    #[test]
    fn test_sync_order_parents_first() {
        let tree = FolderTree::from_paths(["a/b/c", "a", "a/b", "d"]);

        assert_eq!(tree.sync_order(), vec!["a", "a/b", "a/b/c", "d"]);
    }

    #[test]
    fn test_sync_order_ignores_input_order() {
        let paths = ["x/y", "m", "x", "a/b", "a"];
        let mut reversed = paths;
        reversed.reverse();

        assert_eq!(
            FolderTree::from_paths(paths).sync_order(),
            FolderTree::from_paths(reversed).sync_order()
        );
    }

    #[test]
    fn test_sync_order_with_sibling_sorting_before_slash() {
        // ' ' and '-' sort before '/'
        let tree = FolderTree::from_paths(["a/b", "a b", "a-c", "a", "a/b/c"]);
        let order = tree.sync_order();

        assert_eq!(order, vec!["a", "a/b", "a/b/c", "a b", "a-c"]);
        assert!(position(&order, "a") < position(&order, "a/b"));
    }

    #[test]
    fn test_intermediate_directories_are_not_folders() {
        let tree = FolderTree::from_paths(["group/inner"]);

        assert_eq!(tree.sync_order(), vec!["group/inner"]);
        assert!(tree.contains("group/inner"));
        assert!(!tree.contains("group"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_paths_are_normalized() {
        let tree = FolderTree::from_paths(["a//b/", "/a/b", "", "/"]);

        assert_eq!(tree.sync_order(), vec!["a/b"]);
        assert!(tree.contains("a/b/"));
        assert!(!tree.contains(""));
    }

    #[test]
    fn test_empty_tree() {
        let tree = FolderTree::from_paths(Vec::<String>::new());

        assert!(tree.is_empty());
        assert!(tree.sync_order().is_empty());
    }
}
