//! A wrapper around a sorted vector of tuples that backs [`Packed::Object`].
//!
//! Entries are kept sorted by key with no repeats, so two maps holding the same
//! entries compare equal no matter which order they were built or decoded in.
//! Building a map from pairs keeps the *last* value given for a key.
//!
//! # Example
//!
//! ```
//! use packed_json::prelude::*;
//! use std::collections::{BTreeMap, HashMap};
//!
//! let key = "a".to_string();
//! let value = 1;
//!
//! // from a `BTreeMap`
//! let mut btmap = BTreeMap::new();
//! btmap.insert(key.clone(), value);
//!
//! let bt_vm = VecMap::from(btmap);
//!
//! // from a `HashMap`
//! let mut hashmap = HashMap::new();
//! hashmap.insert(key.clone(), value);
//!
//! let hm_vm = VecMap::from(hashmap);
//!
//! // from a vector of tuples, later entries win
//! let vec_vm = VecMap::from(vec![(key.clone(), 0), (key.clone(), value)]);
//!
//! assert_eq!(bt_vm, hm_vm);
//! assert_eq!(hm_vm, vec_vm);
//! ```
//!
//! [`Packed::Object`]: crate::Packed::Object

use std::{
    borrow::Borrow,
    collections::{BTreeMap, HashMap},
    hash::*,
    iter::FromIterator,
    slice::Iter,
    vec::IntoIter,
};

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
/// A map implemented as a sorted [`Vec`] of pairs.
///
/// See also: [module level documentation](`crate::vecmap`).
pub struct VecMap<K: Ord, V>(Vec<(K, V)>);

impl<K: Ord, V> Default for VecMap<K, V> {
    fn default() -> Self { VecMap(Vec::new()) }
}

impl<K: Ord, V> VecMap<K, V> {
    /// Creates an empty [`VecMap`].
    pub fn new() -> Self { Self::default() }

    /// Creates a [`VecMap`] from a vector of key-value pairs sorted by their first
    /// elements.
    ///
    /// # Arguments
    ///
    /// * `v: Vec<(K, V)>` - A vector of key-value pairs sorted by their first element.
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::prelude::*;
    ///
    /// let vmap = VecMap::from_sorted(vec![(1, "foo"), (2, "bar"), (3, "baz")]);
    /// ```
    ///
    /// # Panics
    ///
    /// This function will panic if `v` is not strictly sorted by its first element.
    ///
    /// ```should_panic
    /// use packed_json::prelude::*;
    ///
    /// let vmap = VecMap::from_sorted(vec![("a", ""), ("a", "")]);
    /// ```
    pub fn from_sorted(v: Vec<(K, V)>) -> Self {
        for i in 1..v.len() {
            if v[i - 1].0 >= v[i].0 {
                panic!("`Vec` is not sorted by key")
            }
        }
        VecMap(v)
    }

    /// Returns length.
    pub fn len(&self) -> usize { self.0.len() }

    /// Indicates whether the [`VecMap`] is empty.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns an [`Iter`] of the key value pairs, in key order.
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::prelude::*;
    ///
    /// let vmap = VecMap::from(vec![(2, "bar"), (1, "foo")]);
    ///
    /// let (k, v) = vmap.iter().next().unwrap();
    ///
    /// assert_eq!((k, v), (&1, &"foo"))
    /// ```
    pub fn iter(&self) -> Iter<(K, V)> { self.0.iter() }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> { self.0.iter().map(|(k, _)| k) }

    /// Iterates over the values in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> { self.0.iter().map(|(_, v)| v) }

    fn search<Q: Ord + ?Sized>(&self, key: &Q) -> Result<usize, usize>
    where
        K: Borrow<Q>,
    {
        self.0.binary_search_by(|(k, _)| k.borrow().cmp(key))
    }

    /// Looks up the value for `key`.
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::prelude::*;
    ///
    /// let vmap = VecMap::from(vec![("a".to_string(), 1)]);
    ///
    /// assert_eq!(vmap.get("a"), Some(&1));
    /// assert_eq!(vmap.get("b"), None);
    /// ```
    pub fn get<Q: Ord + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.search(key).ok().map(|i| &self.0[i].1)
    }

    /// Indicates whether `key` is present.
    pub fn contains_key<Q: Ord + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.search(key).is_ok()
    }

    /// Inserts a pair, returning the value it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            Ok(i) => Some(std::mem::replace(&mut self.0[i].1, value)),
            Err(i) => {
                self.0.insert(i, (key, value));
                None
            }
        }
    }

    /// Removes `key`, returning its value.
    pub fn remove<Q: Ord + ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
    {
        match self.search(key) {
            Ok(i) => Some(self.0.remove(i).1),
            Err(_) => None,
        }
    }
}

impl<K: Ord + Hash, V> VecMap<K, V> {
    /// Consumes a [`VecMap`], producing a [`HashMap`] from the entries.
    pub fn into_hashmap<S: BuildHasher + Default>(self) -> HashMap<K, V, S> {
        self.into_iter().collect()
    }
}

impl<K: Ord, V> From<Vec<(K, V)>> for VecMap<K, V> {
    fn from(mut v: Vec<(K, V)>) -> Self {
        // stable, so among equal keys the last pushed stays last
        v.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));

        let mut out: Vec<(K, V)> = Vec::with_capacity(v.len());
        for (k, val) in v {
            match out.last_mut() {
                Some(last) if last.0 == k => last.1 = val,
                _ => out.push((k, val)),
            }
        }
        VecMap(out)
    }
}

impl<K: Ord + Hash, V, S: BuildHasher> From<HashMap<K, V, S>> for VecMap<K, V> {
    fn from(hm: HashMap<K, V, S>) -> Self {
        let v: Vec<(K, V)> = hm.into_iter().collect();
        v.into()
    }
}

impl<K: Ord, V> From<BTreeMap<K, V>> for VecMap<K, V> {
    // already sorted and unique
    fn from(bt: BTreeMap<K, V>) -> Self { VecMap(bt.into_iter().collect()) }
}

impl<K: Ord, V> IntoIterator for VecMap<K, V> {
    type IntoIter = IntoIter<(K, V)>;
    type Item = (K, V);

    fn into_iter(self) -> IntoIter<(K, V)> { self.0.into_iter() }
}

impl<'a, K: Ord, V> IntoIterator for &'a VecMap<K, V> {
    type IntoIter = Iter<'a, (K, V)>;
    type Item = &'a (K, V);

    fn into_iter(self) -> Iter<'a, (K, V)> { self.0.iter() }
}

impl<K: Ord, V> FromIterator<(K, V)> for VecMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> VecMap<K, V> {
        VecMap::from(Vec::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let vm = VecMap::from(vec![("b", 1), ("a", 2), ("b", 3), ("a", 4)]);
        assert_eq!(vm.len(), 2);
        assert_eq!(vm.get("a"), Some(&4));
        assert_eq!(vm.get("b"), Some(&3));
    }

    #[test]
    fn order_independent_equality() {
        let one: VecMap<&str, u8> = vec![("x", 1), ("y", 2)].into_iter().collect();
        let two: VecMap<&str, u8> = vec![("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(one, two);
    }

    #[test]
    fn insert_and_remove() {
        let mut vm = VecMap::new();
        assert_eq!(vm.insert("b", 1), None);
        assert_eq!(vm.insert("a", 2), None);
        assert_eq!(vm.insert("b", 3), Some(1));
        assert_eq!(vm.keys().collect::<Vec<_>>(), vec![&"a", &"b"]);
        assert_eq!(vm.remove("a"), Some(2));
        assert!(!vm.contains_key("a"));
        assert_eq!(vm.values().collect::<Vec<_>>(), vec![&3]);
    }

    #[test]
    #[should_panic]
    fn from_sorted_checks_order() { VecMap::from_sorted(vec![("b", ()), ("a", ())]); }
}
