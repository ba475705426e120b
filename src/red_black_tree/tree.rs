use crate::arena::{Handle, TypedArena};
use crate::entry::Entry;
use crate::red_black_tree::node::Node;
use crate::red_black_tree::{Error, Result};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Arena-backed binary search tree with parent links. This layer only knows how to search,
/// walk, and splice; rebalancing lives in `balance`.
pub struct Tree<T, U> {
    pub arena: TypedArena<Node<T, U>>,
    pub root: Option<Handle>,
}

impl<T, U> Tree<T, U> {
    pub fn new(chunk_size: usize) -> Self {
        Tree {
            arena: TypedArena::new(chunk_size),
            root: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    // absent children are black leaves
    pub fn is_red(&self, node: Option<Handle>) -> bool {
        node.map_or(false, |node| self.arena[node].is_red())
    }

    pub fn entry(&self, node: Handle) -> &Entry<T, U> {
        &self.arena[node].entry
    }

    pub fn entry_mut(&mut self, node: Handle) -> &mut Entry<T, U> {
        &mut self.arena[node].entry
    }

    pub fn find_node<V>(&self, key: &V) -> Result<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(node) = curr {
            let Node {
                ref entry,
                left,
                right,
                ..
            } = self.arena[node];
            curr = match key.cmp(entry.key.borrow()) {
                Ordering::Less => left,
                Ordering::Greater => right,
                Ordering::Equal => return Ok(node),
            };
        }
        Err(Error::NotFound)
    }

    pub fn get_min(&self, mut node: Handle) -> Handle {
        while let Some(left) = self.arena[node].left {
            node = left;
        }
        node
    }

    pub fn get_max(&self, mut node: Handle) -> Handle {
        while let Some(right) = self.arena[node].right {
            node = right;
        }
        node
    }

    pub fn min_node(&self) -> Result<Handle> {
        self.root
            .map(|root| self.get_min(root))
            .ok_or(Error::EmptyTree)
    }

    pub fn max_node(&self) -> Result<Handle> {
        self.root
            .map(|root| self.get_max(root))
            .ok_or(Error::EmptyTree)
    }

    fn collect_in_order<'a>(&'a self, node: Option<Handle>, entries: &mut Vec<&'a Entry<T, U>>) {
        if let Some(node) = node {
            let node = &self.arena[node];
            self.collect_in_order(node.left, entries);
            entries.push(&node.entry);
            self.collect_in_order(node.right, entries);
        }
    }

    /// Returns every entry in ascending key order.
    pub fn traverse(&self) -> Vec<&Entry<T, U>> {
        let mut entries = Vec::with_capacity(self.arena.len());
        self.collect_in_order(self.root, &mut entries);
        entries
    }

    fn collect_handles(&self, node: Option<Handle>, handles: &mut Vec<Handle>) {
        if let Some(handle) = node {
            let node = &self.arena[handle];
            self.collect_handles(node.left, handles);
            handles.push(handle);
            self.collect_handles(node.right, handles);
        }
    }

    /// Consumes the tree and returns its entries in ascending key order.
    pub fn into_entries(mut self) -> Vec<Entry<T, U>> {
        let mut handles = Vec::with_capacity(self.arena.len());
        self.collect_handles(self.root, &mut handles);
        handles
            .into_iter()
            .map(|handle| self.arena.free(handle).entry)
            .collect()
    }

    /// Puts `child` where `node` hangs from its parent, or at the root if `node` is the root.
    /// `node` keeps its own links; callers relink or free it afterwards.
    pub fn replace_node(&mut self, node: Handle, child: Option<Handle>) {
        let parent = self.arena[node].parent;
        match parent {
            None => self.root = child,
            Some(parent) => {
                let parent = &mut self.arena[parent];
                if parent.left == Some(node) {
                    parent.left = child;
                } else {
                    parent.right = child;
                }
            },
        }
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }
}

#[cfg(test)]
impl<T, U> Tree<T, U>
where
    T: Ord,
{
    // Checks every structural and coloring invariant and returns the number of reachable nodes.
    pub fn check_invariants(&self) -> usize {
        fn black_height<T: Ord, U>(
            tree: &Tree<T, U>,
            node: Option<Handle>,
            parent: Option<Handle>,
            count: &mut usize,
        ) -> usize {
            let handle = match node {
                Some(handle) => handle,
                None => return 1,
            };
            *count += 1;
            let node = &tree.arena[handle];
            assert_eq!(node.parent, parent, "parent link out of sync");
            if node.is_red() {
                assert!(!tree.is_red(node.left), "red node with a red left child");
                assert!(!tree.is_red(node.right), "red node with a red right child");
            }
            let left = black_height(tree, node.left, Some(handle), count);
            let right = black_height(tree, node.right, Some(handle), count);
            assert_eq!(left, right, "black heights differ");
            left + if node.is_red() { 0 } else { 1 }
        }

        assert!(!self.is_red(self.root), "red root");
        let mut count = 0;
        black_height(self, self.root, None, &mut count);
        assert_eq!(count, self.arena.len(), "unreachable nodes left in the arena");

        let entries = self.traverse();
        for pair in entries.windows(2) {
            assert!(pair[0].key < pair[1].key, "keys out of order");
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::red_black_tree::node::{Color, Node};
    use crate::red_black_tree::Error;

    // Builds 2(1, 3) by hand, without any balancing.
    fn small_tree() -> Tree<u32, &'static str> {
        let mut tree = Tree::new(8);
        let root = tree.arena.allocate(Node::new(2, "two", None));
        let left = tree.arena.allocate(Node::new(1, "one", Some(root)));
        let right = tree.arena.allocate(Node::new(3, "three", Some(root)));
        tree.arena[root].color = Color::Black;
        tree.arena[root].left = Some(left);
        tree.arena[root].right = Some(right);
        tree.root = Some(root);
        tree
    }

    #[test]
    fn test_find_node() {
        let tree = small_tree();
        for key in 1..4u32 {
            let node = tree.find_node(&key).unwrap();
            assert_eq!(tree.entry(node).key, key);
        }
        assert_eq!(tree.find_node(&0), Err(Error::NotFound));
        assert_eq!(tree.find_node(&4), Err(Error::NotFound));
    }

    #[test]
    fn test_find_node_empty() {
        let tree: Tree<u32, u32> = Tree::new(8);
        assert_eq!(tree.find_node(&0), Err(Error::NotFound));
    }

    #[test]
    fn test_min_max_node() {
        let tree = small_tree();
        assert_eq!(tree.entry(tree.min_node().unwrap()).value, "one");
        assert_eq!(tree.entry(tree.max_node().unwrap()).value, "three");

        let empty: Tree<u32, u32> = Tree::new(8);
        assert_eq!(empty.min_node(), Err(Error::EmptyTree));
        assert_eq!(empty.max_node(), Err(Error::EmptyTree));
    }

    #[test]
    fn test_traverse() {
        let tree = small_tree();
        let values: Vec<&str> = tree.traverse().iter().map(|entry| entry.value).collect();
        assert_eq!(values, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_replace_node_with_child() {
        let mut tree = small_tree();
        let root = tree.root.unwrap();
        let right = tree.arena[root].right;
        tree.replace_node(root, right);

        let new_root = tree.root.unwrap();
        assert_eq!(tree.entry(new_root).key, 3);
        assert_eq!(tree.arena[new_root].parent, None);
    }

    #[test]
    fn test_replace_node_with_nothing() {
        let mut tree = small_tree();
        let left = tree.find_node(&1).unwrap();
        tree.replace_node(left, None);
        tree.arena.free(left);

        assert_eq!(tree.find_node(&1), Err(Error::NotFound));
        assert_eq!(tree.check_invariants(), 2);
    }

    #[test]
    fn test_into_entries() {
        let tree = small_tree();
        let pairs: Vec<(u32, &str)> = tree
            .into_entries()
            .into_iter()
            .map(|entry| entry.into_pair())
            .collect();
        assert_eq!(pairs, vec![(1, "one"), (2, "two"), (3, "three")]);
    }

    #[test]
    fn test_clear() {
        let mut tree = small_tree();
        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.traverse().is_empty());
    }
}
