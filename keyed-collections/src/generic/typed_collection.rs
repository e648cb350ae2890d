//! Type-constrained collection.
//!
//! This module provides [`TypedCollection`], a [`Collection`] whose every
//! insertion path runs a [`TypeGate`] first. A rejected value never reaches
//! the underlying collection.

use std::{borrow::Cow, ops::Deref};

use indexmap::map::Entry;

use crate::{
    equality::LooseEq,
    error::Result,
    generic::{collection::Collection, type_gate::TypeGate},
    key::Key,
};

/// A [`Collection`] whose values all satisfy the type gate `G`.
///
/// Read access goes through [`Deref`] to the inner collection. Every mutating
/// operation is defined on `TypedCollection` itself, so there is no way to
/// store a value that skipped the gate.
///
/// Operations that only drop entries ([`filter`](Self::filter),
/// [`uniques`](Self::uniques), [`slice`](Self::slice) and the collection
/// returned by [`remove_if`](Self::remove_if)) keep the gate. [`map`](Self::map)
/// re-validates every mapped value; use [`map_untyped`](Self::map_untyped) to
/// get a plain collection instead.
///
/// # Examples
///
/// ```rust
/// use keyed_collections::{CollectionError, InstanceOf, Object, TypedCollection};
///
/// struct Widget;
/// struct Gadget;
///
/// let mut widgets = TypedCollection::new(InstanceOf::<Widget>::new());
/// widgets.push(Object::new(Widget)).unwrap();
/// widgets.set("spare", Object::new(Widget)).unwrap();
///
/// let err = widgets.push(Object::new(Gadget)).unwrap_err();
/// assert!(matches!(err, CollectionError::InvalidValueType { .. }));
/// assert!(err.to_string().ends_with("Widget"));
/// assert_eq!(widgets.count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct TypedCollection<V, G> {
    gate: G,
    inner: Collection<V>,
}

impl<V, G: TypeGate<V>> TypedCollection<V, G> {
    /// Creates an empty collection guarded by `gate`.
    pub fn new(gate: G) -> Self {
        Self {
            gate,
            inner: Collection::new(),
        }
    }

    /// Creates a collection from `entries`, inserting them one at a time.
    ///
    /// # Errors
    ///
    /// Fails with [`CollectionError::InvalidValueType`] on the first entry the
    /// gate rejects.
    ///
    /// [`CollectionError::InvalidValueType`]: crate::CollectionError::InvalidValueType
    pub fn with_entries<K, I>(gate: G, entries: I) -> Result<Self>
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut collection = Self::new(gate);
        for (key, value) in entries {
            collection.set(key, value)?;
        }
        Ok(collection)
    }

    /// Creates a list-like collection, keying `values` by their position.
    pub fn from_values<I: IntoIterator<Item = V>>(gate: G, values: I) -> Result<Self> {
        Self::with_entries(
            gate,
            values
                .into_iter()
                .enumerate()
                .map(|(index, value)| (Key::from(index), value)),
        )
    }

    /// Wraps an existing collection after checking all of its values.
    pub fn from_collection(gate: G, collection: Collection<V>) -> Result<Self> {
        for value in collection.values() {
            gate.check(value)?;
        }
        Ok(Self {
            gate,
            inner: collection,
        })
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Name of the type every value satisfies.
    pub fn type_name(&self) -> Cow<'_, str> {
        self.gate.type_name()
    }

    /// Checks `value`, then inserts it under `key`.
    pub fn set<K: Into<Key>>(&mut self, key: K, value: V) -> Result<()> {
        self.gate.check(&value)?;
        self.inner.set(key, value);
        Ok(())
    }

    /// Alias of [`set`](Self::set).
    pub fn add<K: Into<Key>>(&mut self, key: K, value: V) -> Result<()> {
        self.set(key, value)
    }

    /// Checks `value`, then appends it under the next integer key.
    pub fn push(&mut self, value: V) -> Result<Key> {
        self.gate.check(&value)?;
        Ok(self.inner.push(value))
    }

    /// Checks every value of `source`, then sets them all in order.
    ///
    /// Nothing is inserted unless the whole source passes the gate.
    pub fn add_all<K, I>(&mut self, source: I) -> Result<()>
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, V)>,
    {
        let staged: Vec<(K, V)> = source.into_iter().collect();
        for (_, value) in &staged {
            self.gate.check(value)?;
        }
        self.inner.add_all(staged);
        Ok(())
    }

    /// Returns the value under `key`, inserting `default` first if it is absent.
    ///
    /// `default` is only checked when it is about to be inserted.
    pub fn get_or_create<K: Into<Key>>(&mut self, key: K, default: V) -> Result<&V> {
        match self.inner.entries.entry(key.into()) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                self.gate.check(&default)?;
                Ok(&*entry.insert(default))
            }
        }
    }

    /// Builds a collection with each value replaced by `f(value)`, checking
    /// every mapped value against the same gate.
    ///
    /// ```rust
    /// use keyed_collections::{Predicate, TypedCollection};
    ///
    /// let small = Predicate::new("small number", |n: &i32| n.abs() < 10);
    /// let numbers = TypedCollection::from_values(small, [1, 2, 3]).unwrap();
    ///
    /// assert_eq!(numbers.map(|n| n * 3).unwrap().values().sum::<i32>(), 18);
    /// assert!(numbers.map(|n| n * 4).is_err());
    /// ```
    pub fn map<F>(&self, f: F) -> Result<Self>
    where
        G: Clone,
        F: FnMut(&V) -> V,
    {
        Self::from_collection(self.gate.clone(), self.inner.map(f))
    }

    /// Builds a plain collection with each value replaced by `f(value)`.
    pub fn map_untyped<U, F>(&self, f: F) -> Collection<U>
    where
        F: FnMut(&V) -> U,
    {
        self.inner.map(f)
    }

    pub fn filter<F>(&self, f: F) -> Self
    where
        V: Clone,
        G: Clone,
        F: FnMut(&V, &Key) -> bool,
    {
        self.derive(self.inner.filter(f))
    }

    pub fn uniques(&self) -> Self
    where
        V: Clone + LooseEq,
        G: Clone,
    {
        self.derive(self.inner.uniques())
    }

    pub fn slice(&self, offset: isize, length: Option<isize>) -> Self
    where
        V: Clone,
        G: Clone,
    {
        self.derive(self.inner.slice(offset, length))
    }

    /// Replaces every value by `f(value, key, collection)`.
    ///
    /// All replacements are computed and checked before any is written, so a
    /// rejected replacement leaves the collection untouched.
    pub fn apply<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(&V, &Key, &Collection<V>) -> V,
    {
        let replacements = self.inner.replacements(f);
        for value in &replacements {
            self.gate.check(value)?;
        }
        self.inner.overwrite_values(replacements);
        Ok(())
    }

    pub fn remove(&mut self, value: &V)
    where
        V: LooseEq,
    {
        self.inner.remove(value);
    }

    pub fn remove_all(&mut self, other: &Collection<V>)
    where
        V: PartialEq,
    {
        self.inner.remove_all(other);
    }

    /// Moves every pair for which `predicate(value)` holds into a new
    /// collection guarded by the same gate.
    pub fn remove_if<F>(&mut self, predicate: F) -> Self
    where
        G: Clone,
        F: FnMut(&V) -> bool,
    {
        let removed = self.inner.remove_if(predicate);
        self.derive(removed)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Drops the gate, returning the plain collection.
    pub fn into_inner(self) -> Collection<V> {
        self.inner
    }

    /// Wraps entries taken from this collection, which already passed the gate.
    fn derive(&self, inner: Collection<V>) -> Self
    where
        G: Clone,
    {
        Self {
            gate: self.gate.clone(),
            inner,
        }
    }
}

impl<V, G> Deref for TypedCollection<V, G> {
    type Target = Collection<V>;

    fn deref(&self) -> &Collection<V> {
        &self.inner
    }
}

impl<V, G> AsRef<Collection<V>> for TypedCollection<V, G> {
    fn as_ref(&self) -> &Collection<V> {
        &self.inner
    }
}

impl<V: PartialEq, G> PartialEq for TypedCollection<V, G> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<V, G> IntoIterator for TypedCollection<V, G> {
    type Item = (Key, V);
    type IntoIter = indexmap::map::IntoIter<Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, V, G> IntoIterator for &'a TypedCollection<V, G> {
    type Item = (&'a Key, &'a V);
    type IntoIter = indexmap::map::Iter<'a, Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
