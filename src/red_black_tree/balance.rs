use crate::arena::Handle;
use crate::entry::Entry;
use crate::red_black_tree::node::{Color, Node};
use crate::red_black_tree::tree::Tree;
use log::trace;
use std::cmp::Ordering;
use std::mem;

/// Shapes handled while repairing a red node with a red parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum InsertCase {
    /// The parent's sibling is red: push the red up to the grandparent.
    UncleRed,
    /// The node is the inner grandchild: rotate it into the outer position.
    Triangle,
    /// The node is the outer grandchild: rotate the grandparent and stop.
    Line,
}

/// Shapes handled while repairing a missing black on the path through a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DeleteCase {
    Root,
    RedSibling,
    BlackFamily,
    RedParent,
    NearNephew,
    FarNephew,
}

impl<T, U> Tree<T, U> {
    pub fn rotate_left(&mut self, node: Handle) {
        let child = self.arena[node]
            .right
            .expect("Expected right child node to be `Some`.");
        trace!("rotating left at {:?}", node);

        let inner = self.arena[child].left;
        self.arena[node].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(node);
        }

        self.replace_node(node, Some(child));
        self.arena[child].left = Some(node);
        self.arena[node].parent = Some(child);
    }

    pub fn rotate_right(&mut self, node: Handle) {
        let child = self.arena[node]
            .left
            .expect("Expected left child node to be `Some`.");
        trace!("rotating right at {:?}", node);

        let inner = self.arena[child].right;
        self.arena[node].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(node);
        }

        self.replace_node(node, Some(child));
        self.arena[child].right = Some(node);
        self.arena[node].parent = Some(child);
    }

    /// Inserts a key-value pair. Returns the previous value if the key was already present, in
    /// which case the tree shape is untouched.
    pub fn insert(&mut self, key: T, value: U) -> Option<U>
    where
        T: Ord,
    {
        let mut curr = match self.root {
            Some(root) => root,
            None => {
                let root = self.arena.allocate(Node::new(key, value, None));
                self.arena[root].color = Color::Black;
                self.root = Some(root);
                return None;
            },
        };

        let (parent, is_left) = loop {
            let node = &self.arena[curr];
            match key.cmp(&node.entry.key) {
                Ordering::Less => match node.left {
                    Some(left) => curr = left,
                    None => break (curr, true),
                },
                Ordering::Greater => match node.right {
                    Some(right) => curr = right,
                    None => break (curr, false),
                },
                Ordering::Equal => {
                    return Some(mem::replace(&mut self.arena[curr].entry.value, value));
                },
            }
        };

        let node = self.arena.allocate(Node::new(key, value, Some(parent)));
        if is_left {
            self.arena[parent].left = Some(node);
        } else {
            self.arena[parent].right = Some(node);
        }
        self.insert_fixup(node);
        None
    }

    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(parent) = self.arena[node].parent {
            if !self.arena[parent].is_red() {
                break;
            }

            let grandparent = self.arena[parent]
                .parent
                .expect("Expected a red node to have a parent.");
            let parent_is_left = self.arena[grandparent].left == Some(parent);
            let uncle = if parent_is_left {
                self.arena[grandparent].right
            } else {
                self.arena[grandparent].left
            };
            let node_is_left = self.arena[parent].left == Some(node);

            let case = if self.is_red(uncle) {
                InsertCase::UncleRed
            } else if node_is_left != parent_is_left {
                InsertCase::Triangle
            } else {
                InsertCase::Line
            };
            trace!("insert fixup: {:?}", case);

            match case {
                InsertCase::UncleRed => {
                    self.arena[parent].color = Color::Black;
                    if let Some(uncle) = uncle {
                        self.arena[uncle].color = Color::Black;
                    }
                    self.arena[grandparent].color = Color::Red;
                    node = grandparent;
                },
                InsertCase::Triangle => {
                    if parent_is_left {
                        self.rotate_left(parent);
                    } else {
                        self.rotate_right(parent);
                    }
                    // the old parent is now the outer grandchild
                    node = parent;
                },
                InsertCase::Line => {
                    if parent_is_left {
                        self.rotate_right(grandparent);
                    } else {
                        self.rotate_left(grandparent);
                    }
                    self.arena[parent].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    break;
                },
            }
        }

        if let Some(root) = self.root {
            self.arena[root].color = Color::Black;
        }
    }

    /// Removes `node` from the tree and returns the entry it held.
    pub fn remove_node(&mut self, node: Handle) -> Entry<T, U> {
        let Node { left, right, .. } = self.arena[node];
        if let (Some(_), Some(right)) = (left, right) {
            let successor = self.get_min(right);
            let successor_entry = self.splice(successor);
            return mem::replace(&mut self.arena[node].entry, successor_entry);
        }
        self.splice(node)
    }

    // precondition: `node` has at most one child
    fn splice(&mut self, node: Handle) -> Entry<T, U> {
        let Node {
            left,
            right,
            parent,
            color,
            ..
        } = self.arena[node];
        let child = left.or(right);

        self.replace_node(node, child);
        if color == Color::Black {
            match child {
                Some(child) if self.arena[child].is_red() => {
                    self.arena[child].color = Color::Black;
                },
                _ => self.delete_fixup(child, parent),
            }
        }

        self.arena.free(node).entry
    }

    // `node` is one black short on every path through it. It may be absent, so its parent is
    // passed alongside it.
    fn delete_fixup(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        loop {
            let parent_handle = match parent {
                Some(parent_handle) => parent_handle,
                None => {
                    trace!("delete fixup: {:?}", DeleteCase::Root);
                    return;
                },
            };

            let node_is_left = self.arena[parent_handle].left == node;
            let sibling = if node_is_left {
                self.arena[parent_handle].right
            } else {
                self.arena[parent_handle].left
            }
            .expect("Expected a node missing a black to have a sibling.");
            let (near, far) = if node_is_left {
                (self.arena[sibling].left, self.arena[sibling].right)
            } else {
                (self.arena[sibling].right, self.arena[sibling].left)
            };

            let case = if self.arena[sibling].is_red() {
                DeleteCase::RedSibling
            } else if !self.is_red(near) && !self.is_red(far) {
                if self.arena[parent_handle].is_red() {
                    DeleteCase::RedParent
                } else {
                    DeleteCase::BlackFamily
                }
            } else if !self.is_red(far) {
                DeleteCase::NearNephew
            } else {
                DeleteCase::FarNephew
            };
            trace!("delete fixup: {:?}", case);

            match case {
                DeleteCase::Root => unreachable!(),
                // the new sibling is black, so the next pass lands in one of the last three cases
                DeleteCase::RedSibling => {
                    self.arena[sibling].color = Color::Black;
                    self.arena[parent_handle].color = Color::Red;
                    self.rotate_toward(parent_handle, node_is_left);
                },
                DeleteCase::BlackFamily => {
                    self.arena[sibling].color = Color::Red;
                    node = Some(parent_handle);
                    parent = self.arena[parent_handle].parent;
                },
                DeleteCase::RedParent => {
                    self.arena[sibling].color = Color::Red;
                    self.arena[parent_handle].color = Color::Black;
                    return;
                },
                // the near nephew becomes a sibling with a red far child
                DeleteCase::NearNephew => {
                    let near = near.expect("Expected a red near nephew.");
                    self.arena[near].color = Color::Black;
                    self.arena[sibling].color = Color::Red;
                    self.rotate_toward(sibling, !node_is_left);
                },
                DeleteCase::FarNephew => {
                    let far = far.expect("Expected a red far nephew.");
                    self.arena[sibling].color = self.arena[parent_handle].color;
                    self.arena[parent_handle].color = Color::Black;
                    self.arena[far].color = Color::Black;
                    self.rotate_toward(parent_handle, node_is_left);
                    return;
                },
            }
        }
    }

    // Rotates at `node` so that its child on the other side takes its place and `node` moves
    // down to the left (`left == true`) or right.
    fn rotate_toward(&mut self, node: Handle, left: bool) {
        if left {
            self.rotate_left(node);
        } else {
            self.rotate_right(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::arena::Handle;
    use crate::red_black_tree::node::Color::{self, Black, Red};
    use crate::red_black_tree::Error;

    fn tree_from(keys: &[u32]) -> Tree<u32, u32> {
        let mut tree = Tree::new(16);
        for &key in keys {
            assert_eq!(tree.insert(key, key * 10), None);
            tree.check_invariants();
        }
        tree
    }

    fn shape(tree: &Tree<u32, u32>) -> Vec<(u32, Color)> {
        fn pre_order(tree: &Tree<u32, u32>, node: Option<Handle>, ret: &mut Vec<(u32, Color)>) {
            if let Some(node) = node {
                let node = &tree.arena[node];
                ret.push((node.entry.key, node.color));
                pre_order(tree, node.left, ret);
                pre_order(tree, node.right, ret);
            }
        }
        let mut ret = Vec::new();
        pre_order(tree, tree.root, &mut ret);
        ret
    }

    fn remove(tree: &mut Tree<u32, u32>, key: u32) -> u32 {
        let node = tree.find_node(&key).unwrap();
        let entry = tree.remove_node(node);
        assert_eq!(entry.key, key);
        tree.check_invariants();
        entry.value
    }

    #[test]
    fn test_rotate_left_right() {
        let mut tree = tree_from(&[2, 1, 4, 3, 5]);
        let root = tree.root.unwrap();

        tree.rotate_left(root);
        assert_eq!(tree.entry(tree.root.unwrap()).key, 4);
        assert_eq!(tree.arena[root].parent, tree.root);
        assert_eq!(
            shape(&tree).iter().map(|pair| pair.0).collect::<Vec<u32>>(),
            vec![4, 2, 1, 3, 5],
        );

        tree.rotate_right(tree.root.unwrap());
        assert_eq!(tree.root, Some(root));
        assert_eq!(
            shape(&tree).iter().map(|pair| pair.0).collect::<Vec<u32>>(),
            vec![2, 1, 4, 3, 5],
        );
        tree.check_invariants();
    }

    #[test]
    fn test_insert_root_is_black() {
        let tree = tree_from(&[1]);
        assert_eq!(shape(&tree), vec![(1, Black)]);
    }

    #[test]
    fn test_insert_replace_keeps_shape() {
        let mut tree = tree_from(&[2, 1, 3]);
        let before = shape(&tree);
        assert_eq!(tree.insert(1, 100), Some(10));
        assert_eq!(shape(&tree), before);
        assert_eq!(tree.entry(tree.find_node(&1).unwrap()).value, 100);
    }

    #[test]
    fn test_insert_uncle_red() {
        let tree = tree_from(&[10, 5, 15, 3]);
        assert_eq!(
            shape(&tree),
            vec![(10, Black), (5, Black), (3, Red), (15, Black)],
        );
    }

    #[test]
    fn test_insert_line() {
        let expected = vec![(2, Black), (1, Red), (3, Red)];
        assert_eq!(shape(&tree_from(&[3, 2, 1])), expected);
        assert_eq!(shape(&tree_from(&[1, 2, 3])), expected);
    }

    #[test]
    fn test_insert_triangle() {
        let expected = vec![(2, Black), (1, Red), (3, Red)];
        assert_eq!(shape(&tree_from(&[3, 1, 2])), expected);
        assert_eq!(shape(&tree_from(&[1, 3, 2])), expected);
    }

    #[test]
    fn test_insert_uncle_red_then_line_higher_up() {
        let tree = tree_from(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(
            shape(&tree),
            vec![
                (4, Black),
                (2, Red),
                (1, Black),
                (3, Black),
                (6, Red),
                (5, Black),
                (7, Black),
                (8, Red),
            ],
        );
    }

    #[test]
    fn test_remove_root_only() {
        let mut tree = tree_from(&[1]);
        assert_eq!(remove(&mut tree, 1), 10);
        assert!(tree.is_empty());
        assert!(tree.arena.is_empty());
    }

    #[test]
    fn test_remove_red_leaf() {
        let mut tree = tree_from(&[10, 5, 15, 3]);
        remove(&mut tree, 3);
        assert_eq!(shape(&tree), vec![(10, Black), (5, Black), (15, Black)]);
    }

    #[test]
    fn test_remove_black_with_red_child() {
        let mut tree = tree_from(&[10, 5, 15, 3]);
        remove(&mut tree, 5);
        assert_eq!(shape(&tree), vec![(10, Black), (3, Black), (15, Black)]);
    }

    #[test]
    fn test_remove_black_family() {
        let mut tree = tree_from(&[10, 5, 15, 3]);
        remove(&mut tree, 3);
        remove(&mut tree, 5);
        assert_eq!(shape(&tree), vec![(10, Black), (15, Red)]);
    }

    #[test]
    fn test_remove_red_sibling_then_red_parent() {
        let mut tree = tree_from(&[10, 5, 20, 15, 25, 30]);
        assert_eq!(
            shape(&tree),
            vec![
                (10, Black),
                (5, Black),
                (20, Red),
                (15, Black),
                (25, Black),
                (30, Red),
            ],
        );

        remove(&mut tree, 5);
        assert_eq!(
            shape(&tree),
            vec![(20, Black), (10, Black), (15, Red), (25, Black), (30, Red)],
        );
    }

    #[test]
    fn test_remove_far_nephew() {
        let mut tree = tree_from(&[10, 5, 15, 3]);
        remove(&mut tree, 3);
        tree.insert(20, 200);
        remove(&mut tree, 5);
        assert_eq!(shape(&tree), vec![(15, Black), (10, Black), (20, Black)]);
    }

    #[test]
    fn test_remove_far_nephew_mirrored() {
        let mut tree = tree_from(&[10, 5, 15, 3]);
        remove(&mut tree, 3);
        tree.insert(1, 10);
        remove(&mut tree, 15);
        assert_eq!(shape(&tree), vec![(5, Black), (1, Black), (10, Black)]);
    }

    #[test]
    fn test_remove_near_nephew() {
        let mut tree = tree_from(&[10, 5, 15, 3]);
        remove(&mut tree, 3);
        tree.insert(12, 120);
        remove(&mut tree, 5);
        assert_eq!(shape(&tree), vec![(12, Black), (10, Black), (15, Black)]);
    }

    #[test]
    fn test_remove_near_nephew_mirrored() {
        let mut tree = tree_from(&[10, 5, 15, 3]);
        remove(&mut tree, 3);
        tree.insert(7, 70);
        remove(&mut tree, 15);
        assert_eq!(shape(&tree), vec![(7, Black), (5, Black), (10, Black)]);
    }

    #[test]
    fn test_remove_two_children_uses_successor() {
        let mut tree = tree_from(&[10, 5, 15, 3, 7, 12, 18]);
        assert_eq!(remove(&mut tree, 10), 100);
        assert_eq!(tree.entry(tree.root.unwrap()).key, 12);
        assert_eq!(tree.find_node(&10), Err(Error::NotFound));
        assert_eq!(tree.check_invariants(), 6);
    }

    #[test]
    fn test_remove_every_order() {
        let keys: Vec<u32> = (0..32).collect();
        for step in 1..32 {
            let mut tree = tree_from(&keys);
            let mut len = keys.len();
            let mut key = 0;
            for _ in 0..keys.len() {
                remove(&mut tree, key);
                len -= 1;
                assert_eq!(tree.check_invariants(), len);
                key = (key + step) % 32;
                while len > 0 && tree.find_node(&key).is_err() {
                    key = (key + 1) % 32;
                }
            }
            assert!(tree.is_empty());
        }
    }

    mod proptests {
        use super::super::Tree;
        use proptest::prelude::*;
        use std::collections::BTreeMap;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn operations_preserve_invariants(
                ops in proptest::collection::vec((any::<bool>(), 0u16..256), 0..512),
            ) {
                let mut tree = Tree::new(32);
                let mut expected = BTreeMap::new();
                for (is_insert, key) in ops {
                    if is_insert {
                        prop_assert_eq!(tree.insert(key, u32::from(key)), expected.insert(key, u32::from(key)));
                    } else {
                        let removed = tree
                            .find_node(&key)
                            .ok()
                            .map(|node| tree.remove_node(node).into_pair());
                        prop_assert_eq!(removed, expected.remove(&key).map(|value| (key, value)));
                    }
                    prop_assert_eq!(tree.check_invariants(), expected.len());
                }

                let keys: Vec<u16> = tree.traverse().iter().map(|entry| entry.key).collect();
                prop_assert_eq!(keys, expected.keys().cloned().collect::<Vec<u16>>());
            }
        }
    }
}
