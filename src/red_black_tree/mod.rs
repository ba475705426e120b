//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.

mod balance;
mod map;
mod node;
mod set;
mod tree;

pub use self::map::{RedBlackMap, RedBlackMapIntoIter, RedBlackMapIter};
pub use self::set::{RedBlackSet, RedBlackSetIntoIter, RedBlackSetIter};

use std::error;
use std::fmt;
use std::result;

/// Number of nodes stored per arena chunk when no chunk size is given.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Convenience `Error` enum for `red_black_tree`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The requested key is not in the tree.
    NotFound,
    /// The operation needs at least one entry.
    EmptyTree,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "key is not in the tree"),
            Error::EmptyTree => write!(f, "tree is empty"),
        }
    }
}

/// Convenience `Result` type for `red_black_tree`.
pub type Result<T> = result::Result<T, Error>;
