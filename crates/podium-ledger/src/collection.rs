use std::collections::HashMap;
use std::hash::Hash;

/// Id-keyed entity map that remembers insertion order.
///
/// Lookups go through the map; iteration follows the order entities were
/// inserted, which is the order rankings fall back to on ties.
#[derive(Clone, Debug)]
pub(crate) struct Registry<K, V> {
    entries: HashMap<K, V>,
    order: Vec<K>,
}

impl<K: Clone + Eq + Hash, V> Registry<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Build from `(key, value)` pairs, keeping the first of any duplicates.
    pub(crate) fn from_pairs(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut registry = Self::new();
        for (key, value) in pairs {
            if !registry.contains(&key) {
                registry.insert(key, value);
            }
        }
        registry
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Insert or replace. A replaced entry keeps its original position.
    pub(crate) fn insert(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push(key);
        }
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Values in insertion order.
    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.order.iter().filter_map(|k| self.entries.get(k))
    }

    /// Mutable access to every value; order unspecified.
    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.values_mut()
    }
}

impl<K: Clone + Eq + Hash, V: Clone> Registry<K, V> {
    /// Owned copies of all values in insertion order.
    pub(crate) fn to_vec(&self) -> Vec<V> {
        self.values().cloned().collect()
    }
}

impl<K: Clone + Eq + Hash, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_follows_insertion_order() {
        let mut reg = Registry::new();
        reg.insert(3u32, "c");
        reg.insert(1, "a");
        reg.insert(2, "b");
        assert_eq!(reg.to_vec(), vec!["c", "a", "b"]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut reg = Registry::new();
        reg.insert(1u32, "a");
        reg.insert(2, "b");
        reg.insert(1, "z");
        assert_eq!(reg.to_vec(), vec!["z", "b"]);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn remove_drops_from_order() {
        let mut reg = Registry::new();
        reg.insert(1u32, "a");
        reg.insert(2, "b");
        assert_eq!(reg.remove(&1), Some("a"));
        assert_eq!(reg.remove(&1), None);
        assert_eq!(reg.to_vec(), vec!["b"]);
        assert!(!reg.contains(&1));
    }

    #[test]
    fn from_pairs_keeps_first_duplicate() {
        let reg = Registry::from_pairs([(1u32, "first"), (2, "b"), (1, "second")]);
        assert_eq!(reg.to_vec(), vec!["first", "b"]);
    }
}
