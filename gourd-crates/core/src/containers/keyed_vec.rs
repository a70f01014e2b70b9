use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// A type which identifies a position in a [`KeyedVec`].
pub trait StorageKey: Clone {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}

impl StorageKey for usize {
    fn index(&self) -> usize {
        *self
    }

    fn create_from_index(index: usize) -> Self {
        index
    }
}

/// A vector indexed by a dedicated key type rather than by `usize`.
///
/// Domains, propagators and reversible cells all live in [`KeyedVec`]s and refer to each other
/// through their keys; mixing up two kinds of keys is a type error.
#[derive(Debug, Hash, PartialEq, Eq)]
pub struct KeyedVec<Key, Value> {
    elements: Vec<Value>,
    key: PhantomData<Key>,
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        KeyedVec {
            elements: Vec::new(),
            key: PhantomData,
        }
    }
}

// Derived `Clone` would require `Key: Clone` for the marker.
impl<Key, Value: Clone> Clone for KeyedVec<Key, Value> {
    fn clone(&self) -> Self {
        KeyedVec {
            elements: self.elements.clone(),
            key: PhantomData,
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Appends `value` and returns its key.
    pub fn push(&mut self, value: Value) -> Key {
        let key = Key::create_from_index(self.elements.len());
        self.elements.push(value);
        key
    }

    pub fn get(&self, key: Key) -> Option<&Value> {
        self.elements.get(key.index())
    }

    pub fn get_mut(&mut self, key: Key) -> Option<&mut Value> {
        self.elements.get_mut(key.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &'_ Value> {
        self.elements.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> {
        (0..self.elements.len()).map(Key::create_from_index)
    }

    /// The values together with their keys, in key order.
    pub fn enumerate(&self) -> impl Iterator<Item = (Key, &'_ Value)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, value)| (Key::create_from_index(index), value))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &'_ mut Value> {
        self.elements.iter_mut()
    }

    pub(crate) fn as_slice(&self) -> &[Value] {
        &self.elements
    }
}

impl<Key: StorageKey, Value: Clone> KeyedVec<Key, Value> {
    /// Grows the vector with copies of `filler` until `key` is a valid index.
    pub(crate) fn ensure_key(&mut self, key: Key, filler: Value) {
        let required_len = key.index() + 1;
        if self.elements.len() < required_len {
            self.elements.resize(required_len, filler);
        }
    }

    /// Replaces the first `values.len()` elements by `values`.
    pub(crate) fn overwrite_prefix(&mut self, values: &[Value]) {
        self.elements[..values.len()].clone_from_slice(values);
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, key: Key) -> &Self::Output {
        &self.elements[key.index()]
    }
}

impl<Key: StorageKey, Value> Index<&Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, key: &Key) -> &Self::Output {
        &self.elements[key.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, key: Key) -> &mut Self::Output {
        &mut self.elements[key.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_values_are_found_under_their_key() {
        let mut keyed_vec: KeyedVec<usize, &str> = KeyedVec::default();
        let first = keyed_vec.push("first");
        let second = keyed_vec.push("second");

        assert_eq!(keyed_vec[first], "first");
        assert_eq!(keyed_vec.get(second), Some(&"second"));
        assert_eq!(keyed_vec.get(2), None);
        assert_eq!(
            keyed_vec.enumerate().collect::<Vec<_>>(),
            vec![(0, &"first"), (1, &"second")]
        );
    }

    #[test]
    fn ensuring_a_key_only_grows() {
        let mut keyed_vec: KeyedVec<usize, bool> = KeyedVec::default();
        keyed_vec.ensure_key(3, false);
        keyed_vec[3] = true;
        keyed_vec.ensure_key(1, false);

        assert_eq!(keyed_vec.as_slice(), &[false, false, false, true]);
    }

    #[test]
    fn overwriting_a_prefix_leaves_the_tail_intact() {
        let mut keyed_vec: KeyedVec<usize, i64> = KeyedVec::default();
        for value in [1, 2, 3, 4] {
            let _ = keyed_vec.push(value);
        }

        keyed_vec.overwrite_prefix(&[10, 20]);

        assert_eq!(keyed_vec.as_slice(), &[10, 20, 3, 4]);
    }
}
