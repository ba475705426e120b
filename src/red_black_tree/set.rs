use crate::red_black_tree::map::{RedBlackMap, RedBlackMapIntoIter, RedBlackMapIter};
use crate::red_black_tree::{Error, Result};
use std::borrow::Borrow;

/// An ordered set implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that keeps its height logarithmic by
/// coloring nodes and never letting two red nodes sit on top of each other.
///
/// # Examples
///
/// ```
/// use balanced_collections::red_black_tree::{Error, RedBlackSet};
///
/// let mut set = RedBlackSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.find_min(), Ok(&0));
/// assert_eq!(set.find_max(), Ok(&3));
///
/// assert_eq!(set.remove(&0), Ok(0));
/// assert_eq!(set.remove(&1), Err(Error::NotFound));
/// ```
pub struct RedBlackSet<T> {
    map: RedBlackMap<T, ()>,
}

impl<T> RedBlackSet<T> {
    /// Constructs a new, empty `RedBlackSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// ```
    pub fn new() -> Self {
        RedBlackSet {
            map: RedBlackMap::new(),
        }
    }

    /// Constructs a new, empty `RedBlackSet<T>` whose arena allocates `chunk_size` nodes at a
    /// time.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackSet {
            map: RedBlackMap::with_chunk_size(chunk_size),
        }
    }

    /// Inserts a key into the set. Returns `true` if the key was not already in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// ```
    pub fn insert(&mut self, key: T) -> bool
    where
        T: Ord,
    {
        self.map.insert(key, ()).is_none()
    }

    /// Removes a key from the set and returns it. Returns `Error::NotFound` if the key does not
    /// exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::{Error, RedBlackSet};
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Ok(1));
    /// assert_eq!(set.remove(&1), Err(Error::NotFound));
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Result<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.remove(key).map(|pair| pair.0)
    }

    /// Checks if a key exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the set, removing all values.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the minimum key of the set. Returns `Error::EmptyTree` if the set is empty.
    pub fn find_min(&self) -> Result<&T> {
        self.map.find_min().map(|pair| pair.0)
    }

    /// Returns the maximum key of the set. Returns `Error::EmptyTree` if the set is empty.
    pub fn find_max(&self) -> Result<&T> {
        self.map.find_max().map(|pair| pair.0)
    }

    /// Removes and returns the minimum key of the set. Returns `Error::EmptyTree` if the set is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.pop_min(), Ok(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn pop_min(&mut self) -> Result<T> {
        self.map.pop_min().map(|pair| pair.0)
    }

    /// Removes and returns the maximum key of the set. Returns `Error::EmptyTree` if the set is
    /// empty.
    pub fn pop_max(&mut self) -> Result<T> {
        self.map.pop_max().map(|pair| pair.0)
    }

    /// Returns the keys of the set in ascending order. Returns `Error::EmptyTree` if the set is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(3);
    /// set.insert(1);
    /// assert_eq!(set.traverse(), Ok(vec![&1, &3]));
    /// ```
    pub fn traverse(&self) -> Result<Vec<&T>> {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        Ok(self.iter().collect())
    }

    /// Returns an iterator over the set. The iterator replays an in-order snapshot of the keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackSetIter<'_, T> {
        RedBlackSetIter {
            map_iter: self.map.iter(),
        }
    }
}

impl<T> IntoIterator for RedBlackSet<T> {
    type IntoIter = RedBlackSetIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            map_iter: self.map.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a RedBlackSet<T>
where
    T: 'a,
{
    type IntoIter = RedBlackSetIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackSet<T>`.
///
/// This iterator yields owned keys in ascending order.
pub struct RedBlackSetIntoIter<T> {
    map_iter: RedBlackMapIntoIter<T, ()>,
}

impl<T> Iterator for RedBlackSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|pair| pair.0)
    }
}

/// An iterator for `RedBlackSet<T>`.
///
/// This iterator yields immutable references to keys in ascending order.
pub struct RedBlackSetIter<'a, T> {
    map_iter: RedBlackMapIter<'a, T, ()>,
}

impl<'a, T> Iterator for RedBlackSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|pair| pair.0)
    }
}

impl<T> Default for RedBlackSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
