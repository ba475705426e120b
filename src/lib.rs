//! Ordered collections backed by a red-black tree whose nodes live in a typed arena.

pub mod arena;
mod entry;
pub mod red_black_tree;
