use crate::arena::Handle;
use crate::entry::Entry;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// A struct representing an internal node of a red black tree.
///
/// Children are owned through the arena that stores the tree; `parent` is a back-reference used
/// only to walk upwards during rotations and fixups.
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub color: Color,
    pub parent: Option<Handle>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U, parent: Option<Handle>) -> Self {
        Node {
            entry: Entry { key, value },
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}
