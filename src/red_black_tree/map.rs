use crate::entry::Entry;
use crate::red_black_tree::tree::Tree;
use crate::red_black_tree::{Error, Result, DEFAULT_CHUNK_SIZE};
use log::debug;
use std::borrow::Borrow;
use std::ops::{Index, IndexMut};
use std::vec;

/// An ordered map implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors every node red or black.
/// The root is black, a red node never has a red child, and every path from a node down to an
/// empty child passes through the same number of black nodes, which keeps the height within
/// `2 * log2(n + 1)`. Insertions and removals repair these rules with rotations and recolorings
/// along a single path, so every operation runs in `O(log n)`.
///
/// Nodes are kept in an arena owned by the map. Each node also knows its parent, which lets the
/// repair walk upwards without recursion.
///
/// # Examples
///
/// ```
/// use balanced_collections::red_black_tree::{Error, RedBlackMap};
///
/// let mut map = RedBlackMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.find(&1), Err(Error::NotFound));
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.find_min(), Ok((&0, &1)));
/// assert_eq!(map.traverse(), Ok(vec![&1, &4]));
///
/// map[&0] = 2;
/// assert_eq!(map.remove(&0), Ok((0, 2)));
/// assert_eq!(map.remove(&1), Err(Error::NotFound));
/// ```
pub struct RedBlackMap<T, U> {
    tree: Tree<T, U>,
    len: usize,
}

impl<T, U> RedBlackMap<T, U> {
    /// Constructs a new, empty `RedBlackMap<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `RedBlackMap<T, U>` whose arena allocates `chunk_size` nodes at a
    /// time.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::with_chunk_size(16);
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackMap {
            tree: Tree::new(chunk_size),
            len: 0,
        }
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, its value is
    /// replaced and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some(1));
    /// assert_eq!(map.get(&1), Some(&2));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<U>
    where
        T: Ord,
    {
        let ret = self.tree.insert(key, value);
        if ret.is_none() {
            self.len += 1;
        }
        ret
    }

    /// Removes a key-value pair from the map and returns it. Returns `Error::NotFound` if the key
    /// does not exist, in which case the map is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::{Error, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Ok((1, 1)));
    /// assert_eq!(map.remove(&1), Err(Error::NotFound));
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Result<(T, U)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let node = self.tree.find_node(key)?;
        let entry = self.tree.remove_node(node);
        self.len -= 1;
        Ok(entry.into_pair())
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.find(key).is_ok()
    }

    /// Returns an immutable reference to the value associated with a particular key. Returns
    /// `Error::NotFound` if the key does not exist, including when the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::{Error, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::new();
    /// assert_eq!(map.find(&1), Err(Error::NotFound));
    /// map.insert(1, 1);
    /// assert_eq!(map.find(&1), Ok(&1));
    /// ```
    pub fn find<V>(&self, key: &V) -> Result<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let node = self.tree.find_node(key)?;
        Ok(&self.tree.entry(node).value)
    }

    /// Returns an immutable reference to the value associated with a particular key. Returns
    /// `None` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get<V>(&self, key: &V) -> Option<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.find(key).ok()
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let node = self.tree.find_node(key).ok()?;
        Some(&mut self.tree.entry_mut(node).value)
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        debug!("clearing red black map with {} entries", self.len);
        self.tree.clear();
        self.len = 0;
    }

    /// Returns the entry with the minimum key. Returns `Error::EmptyTree` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::{Error, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::new();
    /// assert_eq!(map.find_min(), Err(Error::EmptyTree));
    /// map.insert(3, 4);
    /// map.insert(1, 2);
    /// assert_eq!(map.find_min(), Ok((&1, &2)));
    /// ```
    pub fn find_min(&self) -> Result<(&T, &U)> {
        let Entry { key, value } = self.tree.entry(self.tree.min_node()?);
        Ok((key, value))
    }

    /// Returns the entry with the maximum key. Returns `Error::EmptyTree` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::{Error, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::new();
    /// assert_eq!(map.find_max(), Err(Error::EmptyTree));
    /// map.insert(3, 4);
    /// map.insert(1, 2);
    /// assert_eq!(map.find_max(), Ok((&3, &4)));
    /// ```
    pub fn find_max(&self) -> Result<(&T, &U)> {
        let Entry { key, value } = self.tree.entry(self.tree.max_node()?);
        Ok((key, value))
    }

    /// Removes and returns the entry with the minimum key. Returns `Error::EmptyTree` if the map
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::{Error, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(3, 4);
    /// map.insert(1, 2);
    /// assert_eq!(map.pop_min(), Ok((1, 2)));
    /// assert_eq!(map.pop_min(), Ok((3, 4)));
    /// assert_eq!(map.pop_min(), Err(Error::EmptyTree));
    /// ```
    pub fn pop_min(&mut self) -> Result<(T, U)> {
        let node = self.tree.min_node()?;
        let entry = self.tree.remove_node(node);
        self.len -= 1;
        Ok(entry.into_pair())
    }

    /// Removes and returns the entry with the maximum key. Returns `Error::EmptyTree` if the map
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::{Error, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(3, 4);
    /// map.insert(1, 2);
    /// assert_eq!(map.pop_max(), Ok((3, 4)));
    /// assert_eq!(map.pop_max(), Ok((1, 2)));
    /// assert_eq!(map.pop_max(), Err(Error::EmptyTree));
    /// ```
    pub fn pop_max(&mut self) -> Result<(T, U)> {
        let node = self.tree.max_node()?;
        let entry = self.tree.remove_node(node);
        self.len -= 1;
        Ok(entry.into_pair())
    }

    /// Returns the values of the map in ascending key order. Returns `Error::EmptyTree` if the
    /// map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::{Error, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::new();
    /// assert_eq!(map.traverse(), Err(Error::EmptyTree));
    /// map.insert(5, 'b');
    /// map.insert(1, 'a');
    /// assert_eq!(map.traverse(), Ok(vec![&'a', &'b']));
    /// ```
    pub fn traverse(&self) -> Result<Vec<&U>> {
        if self.tree.is_empty() {
            return Err(Error::EmptyTree);
        }
        Ok(self
            .tree
            .traverse()
            .into_iter()
            .map(|entry| &entry.value)
            .collect())
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs in ascending key
    /// order.
    ///
    /// The in-order sequence is collected when the iterator is created and replayed afterwards.
    /// The iterator borrows the map, so the map cannot change while the sequence is alive. An
    /// empty map yields an empty iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 2);
    /// map.insert(5, 6);
    /// map.insert(3, 4);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &2)));
    /// assert_eq!(iterator.next(), Some((&3, &4)));
    /// assert_eq!(iterator.next(), Some((&5, &6)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackMapIter<'_, T, U> {
        RedBlackMapIter {
            entries: self.tree.traverse().into_iter(),
        }
    }
}

impl<T, U> IntoIterator for RedBlackMap<T, U> {
    type IntoIter = RedBlackMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            entries: self.tree.into_entries().into_iter(),
        }
    }
}

impl<'a, T, U> IntoIterator for &'a RedBlackMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = RedBlackMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackMap<T, U>`.
///
/// This iterator yields owned entries in ascending key order.
pub struct RedBlackMapIntoIter<T, U> {
    entries: vec::IntoIter<Entry<T, U>>,
}

impl<T, U> Iterator for RedBlackMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(Entry::into_pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<T, U> DoubleEndedIterator for RedBlackMapIntoIter<T, U> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back().map(Entry::into_pair)
    }
}

impl<T, U> ExactSizeIterator for RedBlackMapIntoIter<T, U> {}

/// An iterator for `RedBlackMap<T, U>`.
///
/// This iterator replays a snapshot of the in-order traversal taken when it was created and
/// yields immutable references.
pub struct RedBlackMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    entries: vec::IntoIter<&'a Entry<T, U>>,
}

impl<'a, T, U> Iterator for RedBlackMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|entry| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<'a, T, U> DoubleEndedIterator for RedBlackMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries
            .next_back()
            .map(|entry| (&entry.key, &entry.value))
    }
}

impl<'a, T, U> ExactSizeIterator for RedBlackMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
}

impl<T, U> Default for RedBlackMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, U, V> Index<&'a V> for RedBlackMap<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    type Output = U;

    fn index(&self, key: &V) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

impl<'a, T, U, V> IndexMut<&'a V> for RedBlackMap<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    fn index_mut(&mut self, key: &V) -> &mut Self::Output {
        self.get_mut(key).expect("Error: key does not exist.")
    }
}
