//! Surrogate key assignment.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Maps natural keys to 0-based surrogate keys in first-seen order.
#[derive(Debug, Clone)]
pub struct KeyRegistry<K> {
    keys: HashMap<K, usize>,
}

impl<K> Default for KeyRegistry<K> {
    fn default() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> KeyRegistry<K> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the surrogate key for `key`, assigning the next free one if
    /// the key is new. The flag is true when the key was just assigned.
    pub fn register(&mut self, key: K) -> (usize, bool) {
        let next = self.keys.len();
        match self.keys.entry(key) {
            std::collections::hash_map::Entry::Occupied(entry) => (*entry.get(), false),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(next);
                (next, true)
            }
        }
    }

    /// Looks up the surrogate key of a registered natural key.
    pub fn get<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.keys.get(key).copied()
    }

    /// Returns true if the key has been registered.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.keys.contains_key(key)
    }

    /// Surrogate keys in assignment order.
    pub fn values(&self) -> Vec<usize> {
        let mut values: Vec<usize> = self.keys.values().copied().collect();
        values.sort_unstable();
        values
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no key has been registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let mut registry = KeyRegistry::new();
        assert_eq!(registry.register("SUBJ0".to_string()), (0, true));
        assert_eq!(registry.register("SUBJ1".to_string()), (1, true));
        assert_eq!(registry.register("SUBJ0".to_string()), (0, false));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_lookup_by_borrowed_key() {
        let mut registry = KeyRegistry::new();
        registry.register("test".to_string());

        assert_eq!(registry.get("test"), Some(0));
        assert_eq!(registry.get("other"), None);
        assert!(registry.contains("test"));
    }

    #[test]
    fn test_tuple_keys() {
        let mut registry: KeyRegistry<(String, String)> = KeyRegistry::new();
        registry.register(("SUBJ0".to_string(), "VISIT0".to_string()));
        registry.register(("SUBJ1".to_string(), "VISIT0".to_string()));

        assert_eq!(
            registry.get(&("SUBJ1".to_string(), "VISIT0".to_string())),
            Some(1)
        );
        assert_eq!(registry.values(), vec![0, 1]);
    }
}
