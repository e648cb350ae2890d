//! Ordered key/value collection.
//!
//! This module provides [`Collection`], an insertion-ordered mapping from
//! [`Key`] to any value type, together with the helper operations that make it
//! convenient to use as both a list and a dictionary.

use std::{mem, ops::Index};

use indexmap::IndexMap;
use tracing::trace;

use crate::{
    equality::LooseEq,
    error::{CollectionError, Result},
    key::Key,
};

/// An ordered mapping from [`Key`] to `V`.
///
/// Iteration follows insertion order. Overwriting an existing key keeps the
/// entry in its original position.
///
/// # Examples
///
/// ```rust
/// use keyed_collections::Collection;
///
/// let mut fruits = Collection::from_values(["apple", "pear"]);
/// fruits.set("favourite", "plum");
///
/// assert_eq!(fruits.get(1).unwrap(), &"pear");
/// assert_eq!(fruits.get("favourite").unwrap(), &"plum");
/// assert!(fruits.get("missing").is_err());
/// assert_eq!(fruits.count(), 3);
/// ```
///
/// Operations that build a new collection never touch the receiver:
///
/// ```rust
/// use keyed_collections::Collection;
///
/// let numbers: Collection<i32> = [("one", 1), ("two", 2), ("three", 3)].into_iter().collect();
///
/// let squares = numbers.map(|n| n * n);
/// let odd = numbers.filter(|n, _| n % 2 == 1);
///
/// assert_eq!(squares.get("three").unwrap(), &9);
/// assert!(odd.has("one") && odd.has("three") && !odd.has("two"));
/// assert_eq!(numbers.count(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection<V> {
    pub(crate) entries: IndexMap<Key, V>,
}

impl<V> Default for Collection<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Collection<V> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Creates an empty collection with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Creates a list-like collection, keying `values` by their position.
    ///
    /// ```rust
    /// use keyed_collections::{Collection, Key};
    ///
    /// let list = Collection::from_values([1, 2, 3]);
    /// assert!(list.has(0) && list.has(2));
    /// assert_eq!(list.keys().last(), Some(&Key::Int(2)));
    /// ```
    pub fn from_values<I: IntoIterator<Item = V>>(values: I) -> Self {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| (Key::from(index), value))
            .collect()
    }

    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingKey`] if the key is absent.
    pub fn get<K: Into<Key>>(&self, key: K) -> Result<&V> {
        let key = key.into();
        match self.entries.get(&key) {
            Some(value) => Ok(value),
            None => Err(CollectionError::MissingKey { key }),
        }
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut<K: Into<Key>>(&mut self, key: K) -> Result<&mut V> {
        let key = key.into();
        match self.entries.get_mut(&key) {
            Some(value) => Ok(value),
            None => Err(CollectionError::MissingKey { key }),
        }
    }

    /// Returns `true` if an entry is stored under `key`.
    pub fn has<K: Into<Key>>(&self, key: K) -> bool {
        self.entries.contains_key(&key.into())
    }

    /// Inserts `value` under `key`, overwriting any previous value in place.
    pub fn set<K: Into<Key>>(&mut self, key: K, value: V) {
        self.entries.insert(key.into(), value);
    }

    /// Alias of [`set`](Self::set).
    pub fn add<K: Into<Key>>(&mut self, key: K, value: V) {
        self.set(key, value);
    }

    /// Appends `value` under [`next_index`](Self::next_index) and returns that key.
    ///
    /// ```rust
    /// use keyed_collections::{Collection, Key};
    ///
    /// let mut list = Collection::new();
    /// list.set(4, "four");
    /// list.set("name", "numbers");
    /// assert_eq!(list.push("five"), Key::Int(5));
    /// ```
    pub fn push(&mut self, value: V) -> Key {
        let key = Key::Int(self.next_index());
        self.entries.insert(key.clone(), value);
        key
    }

    /// The integer key [`push`](Self::push) would use: one past the largest
    /// integer key present, or `0` when there is none.
    pub fn next_index(&self) -> i64 {
        self.entries
            .keys()
            .filter_map(Key::as_int)
            .max()
            .map_or(0, |max| max.saturating_add(1))
    }

    /// Sets every pair of `source` in order; later duplicates win.
    pub fn add_all<K, I>(&mut self, source: I)
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in source {
            self.set(key, value);
        }
    }

    /// Returns `true` if some stored value is strictly equal to `value`.
    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.entries.values().any(|stored| stored == value)
    }

    /// Returns `true` if some stored value is loosely equal to `value`.
    ///
    /// ```rust
    /// use keyed_collections::Collection;
    /// use serde_json::json;
    ///
    /// let values = Collection::from_values([json!(1), json!("two")]);
    /// assert!(!values.contains(&json!("1")));
    /// assert!(values.contains_loose(&json!("1")));
    /// ```
    pub fn contains_loose(&self, value: &V) -> bool
    where
        V: LooseEq,
    {
        self.entries.values().any(|stored| stored.loose_eq(value))
    }

    /// Builds a collection with the same keys and each value replaced by `f(value)`.
    pub fn map<U, F>(&self, mut f: F) -> Collection<U>
    where
        F: FnMut(&V) -> U,
    {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), f(value)))
            .collect()
    }

    /// Builds a collection of the pairs for which `f(value, key)` holds.
    pub fn filter<F>(&self, mut f: F) -> Self
    where
        V: Clone,
        F: FnMut(&V, &Key) -> bool,
    {
        self.entries
            .iter()
            .filter(|(key, value)| f(*value, *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Builds a collection keeping the first key of every loosely distinct value.
    ///
    /// ```rust
    /// use keyed_collections::Collection;
    ///
    /// let values = Collection::from_values([3, 1, 3, 2, 1]);
    /// let uniques = values.uniques();
    /// assert_eq!(uniques.values().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
    /// assert!(uniques.has(0) && uniques.has(1) && uniques.has(3));
    /// ```
    pub fn uniques(&self) -> Self
    where
        V: Clone + LooseEq,
    {
        let mut uniques: IndexMap<Key, V> = IndexMap::new();
        for (key, value) in &self.entries {
            if !uniques.values().any(|kept| kept.loose_eq(value)) {
                uniques.insert(key.clone(), value.clone());
            }
        }
        Self { entries: uniques }
    }

    /// Builds a collection over up to `length` entries starting at position `offset`.
    ///
    /// A negative `offset` counts from the end; a negative `length` stops that
    /// many entries before the end; `None` runs to the end. Integer keys of the
    /// slice are renumbered from `0`, string keys are kept.
    ///
    /// ```rust
    /// use keyed_collections::Collection;
    ///
    /// let numbers: Collection<i32> = [("one", 1), ("two", 2), ("three", 3), ("four", 4)]
    ///     .into_iter()
    ///     .collect();
    ///
    /// let tail = numbers.slice(2, None);
    /// assert_eq!(tail.count(), 2);
    /// assert_eq!(tail.get("three").unwrap(), &3);
    ///
    /// let middle = numbers.slice(-3, Some(-1));
    /// assert!(middle.has("two") && middle.has("three"));
    ///
    /// let list = Collection::from_values(['a', 'b', 'c']);
    /// assert_eq!(list.slice(1, Some(1)).get(0).unwrap(), &'b');
    /// ```
    pub fn slice(&self, offset: isize, length: Option<isize>) -> Self
    where
        V: Clone,
    {
        let (start, end) = slice_bounds(self.len(), offset, length);
        let mut sliced = Self::with_capacity(end - start);
        let mut next_index = 0_i64;
        for (key, value) in self.entries.iter().skip(start).take(end - start) {
            let key = match key {
                Key::Int(_) => {
                    next_index += 1;
                    Key::Int(next_index - 1)
                }
                Key::Str(_) => key.clone(),
            };
            sliced.entries.insert(key, value.clone());
        }
        sliced
    }

    /// Replaces every value by `f(value, key, self)`.
    ///
    /// All replacements are computed against the unchanged collection before
    /// any of them is written back, so `f` always observes the original state.
    ///
    /// ```rust
    /// use keyed_collections::Collection;
    ///
    /// let mut numbers = Collection::from_values([1, 2, 3]);
    /// numbers.apply(|n, _, all| n + all.count() as i32);
    /// assert_eq!(numbers.values().copied().collect::<Vec<_>>(), vec![4, 5, 6]);
    /// ```
    pub fn apply<F>(&mut self, f: F)
    where
        F: FnMut(&V, &Key, &Self) -> V,
    {
        let replacements = self.replacements(f);
        self.overwrite_values(replacements);
    }

    pub(crate) fn replacements<F>(&self, mut f: F) -> Vec<V>
    where
        F: FnMut(&V, &Key, &Self) -> V,
    {
        self.entries
            .iter()
            .map(|(key, value)| f(value, key, self))
            .collect()
    }

    pub(crate) fn overwrite_values(&mut self, replacements: Vec<V>) {
        for (slot, value) in self.entries.values_mut().zip(replacements) {
            *slot = value;
        }
    }

    /// Returns the value under `key`, inserting `default` first if it is absent.
    pub fn get_or_create<K: Into<Key>>(&mut self, key: K, default: V) -> &mut V {
        self.entries.entry(key.into()).or_insert(default)
    }

    /// [`get_or_create`](Self::get_or_create) with `V::default()`.
    pub fn get_or_default<K: Into<Key>>(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entries.entry(key.into()).or_default()
    }

    /// Returns `true` if the collection holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Alias of [`count`](Self::count).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes every pair whose value is loosely equal to `value`.
    ///
    /// ```rust
    /// use keyed_collections::Collection;
    ///
    /// let mut numbers = Collection::from_values([1, 2, 3, 2, 1]);
    /// numbers.remove(&1);
    /// assert_eq!(numbers.count(), 3);
    /// assert!(!numbers.contains(&1));
    /// assert!(numbers.has(1) && numbers.has(3));
    /// ```
    pub fn remove(&mut self, value: &V)
    where
        V: LooseEq,
    {
        let before = self.len();
        self.entries.retain(|_, stored| !stored.loose_eq(value));
        trace!(removed = before - self.len(), "removed matching values");
    }

    /// Removes every pair whose value `other` [`contains`](Self::contains).
    pub fn remove_all(&mut self, other: &Collection<V>)
    where
        V: PartialEq,
    {
        let before = self.len();
        self.entries.retain(|_, stored| !other.contains(stored));
        trace!(removed = before - self.len(), "removed values of another collection");
    }

    /// Moves every pair for which `predicate(value)` holds into a new collection.
    ///
    /// The returned collection keeps the original keys and relative order; the
    /// receiver keeps the remaining pairs.
    ///
    /// ```rust
    /// use keyed_collections::Collection;
    ///
    /// let mut numbers = Collection::from_values([1, 2, 3, 2, 1]);
    /// let removed = numbers.remove_if(|n| *n != 2);
    ///
    /// assert_eq!(numbers.count(), 2);
    /// assert_eq!(removed.count(), 3);
    /// assert!(removed.has(0) && removed.has(2) && removed.has(4));
    /// ```
    pub fn remove_if<F>(&mut self, mut predicate: F) -> Self
    where
        F: FnMut(&V) -> bool,
    {
        let (removed, kept): (IndexMap<Key, V>, IndexMap<Key, V>) = mem::take(&mut self.entries)
            .into_iter()
            .partition(|(_, value)| predicate(value));
        self.entries = kept;
        trace!(removed = removed.len(), "removed values matching a predicate");
        Self { entries: removed }
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        trace!(removed = self.len(), "cleared collection");
        self.entries.clear();
    }

    /// Returns `true` if the keys are exactly `0, 1, .., n - 1` in this order.
    pub fn is_list(&self) -> bool {
        self.entries
            .keys()
            .enumerate()
            .all(|(index, key)| key.as_int() == Some(index as i64))
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, V> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, V> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, Key, V> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, Key, V> {
        self.entries.values_mut()
    }

    /// The underlying ordered map.
    pub fn entries(&self) -> &IndexMap<Key, V> {
        &self.entries
    }

    pub fn into_entries(self) -> IndexMap<Key, V> {
        self.entries
    }
}

/// Resolves `offset`/`length` against `len` into a `start..end` position range.
fn slice_bounds(len: usize, offset: isize, length: Option<isize>) -> (usize, usize) {
    let len = isize::try_from(len).unwrap_or(isize::MAX);
    let start = if offset < 0 {
        len.saturating_add(offset).max(0)
    } else {
        offset.min(len)
    };
    let end = match length {
        None => len,
        Some(length) if length < 0 => len.saturating_add(length),
        Some(length) => start.saturating_add(length).min(len),
    };
    (start as usize, end.max(start) as usize)
}

impl<V> From<Vec<V>> for Collection<V> {
    fn from(values: Vec<V>) -> Self {
        Self::from_values(values)
    }
}

impl<V> From<IndexMap<Key, V>> for Collection<V> {
    fn from(entries: IndexMap<Key, V>) -> Self {
        Self { entries }
    }
}

impl<K: Into<Key>, V> FromIterator<(K, V)> for Collection<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.add_all(iter);
        collection
    }
}

impl<K: Into<Key>, V> Extend<(K, V)> for Collection<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<V> IntoIterator for Collection<V> {
    type Item = (Key, V);
    type IntoIter = indexmap::map::IntoIter<Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Collection<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = indexmap::map::Iter<'a, Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Panicking lookup, for keys known to be present.
impl<K: Into<Key>, V> Index<K> for Collection<V> {
    type Output = V;

    fn index(&self, key: K) -> &V {
        let key = key.into();
        match self.entries.get(&key) {
            Some(value) => value,
            None => panic!("No {key} key in the collection"),
        }
    }
}
