//! Specialized collection types

pub use slotmap::{Key, SlotMap};

/// Slot map that also remembers insertion order.
///
/// Handles stay valid until their value is removed; after that, lookups with
/// the stale handle return `None` instead of aliasing a reused slot. Iteration
/// follows insertion order, which the collision pass depends on.
pub struct OrderedHandleMap<K: Key, V> {
    slots: SlotMap<K, V>,
    order: Vec<K>,
}

impl<K: Key, V> OrderedHandleMap<K, V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Insert a value at the end of the iteration order
    pub fn insert(&mut self, value: V) -> K {
        let key = self.slots.insert(value);
        self.order.push(key);
        key
    }

    /// Remove a value, invalidating its handle
    pub fn remove(&mut self, key: K) -> Option<V> {
        let value = self.slots.remove(key)?;
        self.order.retain(|k| *k != key);
        Some(value)
    }

    /// Remove every value matching `predicate`, returning them in iteration order
    pub fn drain_where(&mut self, mut predicate: impl FnMut(&V) -> bool) -> Vec<V> {
        let mut drained = Vec::new();
        let slots = &mut self.slots;
        self.order.retain(|key| {
            let matches = slots.get(*key).map_or(false, &mut predicate);
            if matches {
                if let Some(value) = slots.remove(*key) {
                    drained.push(value);
                }
            }
            !matches
        });
        drained
    }

    /// Get a value by handle
    pub fn get(&self, key: K) -> Option<&V> {
        self.slots.get(key)
    }

    /// Get a mutable value by handle
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.slots.get_mut(key)
    }

    /// Mutable access to two distinct values at once
    pub fn get_pair_mut(&mut self, a: K, b: K) -> Option<(&mut V, &mut V)> {
        let [first, second] = self.slots.get_disjoint_mut([a, b])?;
        Some((first, second))
    }

    /// Whether the handle still refers to a live value
    pub fn contains(&self, key: K) -> bool {
        self.slots.contains_key(key)
    }

    /// Number of live values
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles in insertion order
    pub fn keys(&self) -> &[K] {
        &self.order
    }

    /// Iterate `(handle, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.order.iter().filter_map(move |key| self.slots.get(*key).map(|v| (*key, v)))
    }

    /// Iterate values mutably (slot order, not insertion order)
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.slots.values_mut()
    }
}

impl<K: Key, V> Default for OrderedHandleMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    slotmap::new_key_type! { struct TestKey; }

    #[test]
    fn test_iteration_follows_insertion_order_after_reuse() {
        let mut map: OrderedHandleMap<TestKey, &str> = OrderedHandleMap::new();
        let a = map.insert("a");
        let _b = map.insert("b");
        map.remove(a);
        let _c = map.insert("c");

        let values: Vec<_> = map.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!["b", "c"]);
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut map: OrderedHandleMap<TestKey, u32> = OrderedHandleMap::new();
        let a = map.insert(1);
        map.remove(a);
        let _reused = map.insert(2);

        assert!(map.get(a).is_none());
        assert!(!map.contains(a));
    }

    #[test]
    fn test_drain_where_keeps_remaining_order() {
        let mut map: OrderedHandleMap<TestKey, u32> = OrderedHandleMap::new();
        for i in 0..6 {
            map.insert(i);
        }
        let odd = map.drain_where(|v| v % 2 == 1);

        assert_eq!(odd, vec![1, 3, 5]);
        let rest: Vec<_> = map.iter().map(|(_, v)| *v).collect();
        assert_eq!(rest, vec![0, 2, 4]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_pair_mut_rejects_same_key() {
        let mut map: OrderedHandleMap<TestKey, u32> = OrderedHandleMap::new();
        let a = map.insert(1);
        let b = map.insert(2);

        assert!(map.get_pair_mut(a, a).is_none());
        let (x, y) = map.get_pair_mut(a, b).unwrap();
        std::mem::swap(x, y);
        assert_eq!(map.get(a), Some(&2));
    }
}
