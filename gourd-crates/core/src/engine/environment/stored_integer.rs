use crate::containers::StorageKey;

/// A handle to an integer cell in the reversible environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct StoredInteger {
    id: u32,
}

impl StorageKey for StoredInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}
