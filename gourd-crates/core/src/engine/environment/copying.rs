use super::ReversibleStore;
use super::StoredInteger;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// Copies every cell when a world is pushed.
///
/// Cells allocated after a snapshot was taken are reset to their initial value when that
/// snapshot is restored.
#[derive(Default, Debug, Clone)]
pub(crate) struct CopyingEnvironment {
    values: KeyedVec<StoredInteger, i64>,
    initial_values: KeyedVec<StoredInteger, i64>,
    /// The snapshot at index i holds the cells as they were in world i.
    snapshots: Vec<KeyedVec<StoredInteger, i64>>,
}

impl ReversibleStore for CopyingEnvironment {
    fn grow(&mut self, initial_value: i64) -> StoredInteger {
        let _ = self.initial_values.push(initial_value);
        self.values.push(initial_value)
    }

    fn read(&self, cell: StoredInteger) -> i64 {
        self.values[cell]
    }

    fn assign(&mut self, cell: StoredInteger, value: i64) {
        self.values[cell] = value;
    }

    fn push_world(&mut self) {
        self.snapshots.push(self.values.clone());
    }

    fn pop_until(&mut self, world: usize) {
        if world >= self.snapshots.len() {
            return;
        }

        let snapshot = &self.snapshots[world];
        self.values.overwrite_prefix(snapshot.as_slice());
        for index in snapshot.len()..self.values.len() {
            let cell = StoredInteger::create_from_index(index);
            self.values[cell] = self.initial_values[cell];
        }
        self.snapshots.truncate(world);
    }

    fn world_index(&self) -> usize {
        self.snapshots.len()
    }
}
