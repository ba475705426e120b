//! Chunked slab that owns the nodes of a tree and hands out copyable handles.

use log::debug;
use std::mem;
use std::ops::{Index, IndexMut};

/// A copyable reference to a slot of a `TypedArena<T>`.
///
/// Handles do not keep the slot alive. Once a slot is freed its handle may be returned again by
/// a later allocation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk: usize,
    slot: usize,
}

enum Slot<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// A slab allocator for a single type of object.
///
/// Objects live in fixed-size chunks, so growing the arena never moves existing objects.
/// Freed slots are chained into a free list and reused before a new chunk is requested.
///
/// # Examples
///
/// ```
/// use balanced_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new(16);
///
/// let x = arena.allocate(1);
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    free_head: Option<Handle>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    len: usize,
}

impl<T> TypedArena<T> {
    /// Constructs a new, empty `TypedArena<T>` that holds `chunk_size` objects per chunk. A
    /// chunk size of zero is rounded up to one.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// assert_eq!(arena.chunk_size(), 1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        TypedArena {
            free_head: None,
            chunks: Vec::new(),
            chunk_size: chunk_size.max(1),
            len: 0,
        }
    }

    /// Returns the number of objects stored per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn slot(&self, handle: Handle) -> Option<&Slot<T>> {
        self.chunks.get(handle.chunk).and_then(|chunk| chunk.get(handle.slot))
    }

    fn slot_mut(&mut self, handle: Handle) -> Option<&mut Slot<T>> {
        self.chunks
            .get_mut(handle.chunk)
            .and_then(|chunk| chunk.get_mut(handle.slot))
    }

    /// Moves `value` into the arena and returns its handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate("node");
    /// assert_eq!(arena.get(x), Some(&"node"));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;

        if let Some(handle) = self.free_head.take() {
            let slot = &mut self.chunks[handle.chunk][handle.slot];
            match mem::replace(slot, Slot::Occupied(value)) {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => panic!("Expected the free list to point at a vacant slot."),
            }
            return handle;
        }

        let needs_chunk = self
            .chunks
            .last()
            .map_or(true, |chunk| chunk.len() == self.chunk_size);
        if needs_chunk {
            debug!(
                "arena growing to {} chunks of {} slots",
                self.chunks.len() + 1,
                self.chunk_size,
            );
            self.chunks.push(Vec::with_capacity(self.chunk_size));
        }

        let chunk = self.chunks.len() - 1;
        let last_chunk = &mut self.chunks[chunk];
        last_chunk.push(Slot::Occupied(value));
        Handle {
            chunk,
            slot: last_chunk.len() - 1,
        }
    }

    /// Removes the object behind `handle` from the arena and returns it. The slot is pushed on
    /// the free list.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an occupied slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(7);
    /// assert_eq!(arena.free(x), 7);
    /// assert_eq!(arena.get(x), None);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        let next = self.free_head;
        let slot = self
            .slot_mut(handle)
            .expect("Expected handle to refer to an allocated slot.");
        match mem::replace(slot, Slot::Vacant(next)) {
            Slot::Occupied(value) => {
                self.len -= 1;
                self.free_head = Some(handle);
                value
            },
            Slot::Vacant(_) => panic!("Expected handle to refer to an occupied slot."),
        }
    }

    /// Returns an immutable reference to the object behind `handle`, or `None` if the slot is
    /// vacant or out of range.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slot(handle) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the object behind `handle`, or `None` if the slot is
    /// vacant or out of range.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slot_mut(handle) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every object and releases all chunks.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.free_head = None;
        self.len = 0;
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle refers to a vacant slot.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle)
            .expect("Error: handle refers to a vacant slot.")
    }
}

#[cfg(test)]
mod tests {
    use super::{Handle, TypedArena};

    #[test]
    #[should_panic]
    fn test_free_out_of_range() {
        let mut arena: TypedArena<u32> = TypedArena::new(4);
        arena.free(Handle { chunk: 0, slot: 0 });
    }

    #[test]
    #[should_panic]
    fn test_free_twice() {
        let mut arena = TypedArena::new(4);
        let handle = arena.allocate(0);
        arena.free(handle);
        arena.free(handle);
    }

    #[test]
    fn test_allocate_fills_chunks_in_order() {
        let mut arena = TypedArena::new(2);
        assert_eq!(arena.allocate(0), Handle { chunk: 0, slot: 0 });
        assert_eq!(arena.allocate(1), Handle { chunk: 0, slot: 1 });
        assert_eq!(arena.allocate(2), Handle { chunk: 1, slot: 0 });
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_slots_are_reused_last_in_first_out() {
        let mut arena = TypedArena::new(4);
        let a = arena.allocate('a');
        let b = arena.allocate('b');
        arena.allocate('c');

        assert_eq!(arena.free(a), 'a');
        assert_eq!(arena.free(b), 'b');
        assert_eq!(arena.allocate('d'), b);
        assert_eq!(arena.allocate('e'), a);
        assert_eq!(arena.allocate('f'), Handle { chunk: 0, slot: 3 });
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn test_get_vacant_and_out_of_range() {
        let mut arena = TypedArena::new(4);
        let handle = arena.allocate(5);
        assert_eq!(arena.get(Handle { chunk: 0, slot: 1 }), None);
        assert_eq!(arena.get(Handle { chunk: 3, slot: 0 }), None);
        arena.free(handle);
        assert_eq!(arena.get(handle), None);
        assert_eq!(arena.get_mut(handle), None);
    }

    #[test]
    fn test_index_mut() {
        let mut arena = TypedArena::new(4);
        let handle = arena.allocate(1);
        arena[handle] *= 10;
        assert_eq!(arena[handle], 10);
    }

    #[test]
    fn test_clear() {
        let mut arena = TypedArena::new(1);
        let handle = arena.allocate(1);
        arena.allocate(2);
        arena.clear();

        assert!(arena.is_empty());
        assert_eq!(arena.get(handle), None);
        assert_eq!(arena.allocate(3), Handle { chunk: 0, slot: 0 });
    }

    #[test]
    fn test_zero_chunk_size_rounds_up() {
        let mut arena = TypedArena::new(0);
        assert_eq!(arena.chunk_size(), 1);
        assert_eq!(arena.allocate(0), Handle { chunk: 0, slot: 0 });
        assert_eq!(arena.allocate(0), Handle { chunk: 1, slot: 0 });
    }
}
