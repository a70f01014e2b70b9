use super::ReversibleStore;
use super::StoredInteger;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;

#[derive(Debug, Clone, Copy)]
struct StoredChange {
    old_value: i64,
    reference: StoredInteger,
}

/// Keeps an undo record for every write to a cell.
#[derive(Default, Debug, Clone)]
pub(crate) struct TrailingEnvironment {
    trail: Trail<StoredChange>,
    values: KeyedVec<StoredInteger, i64>,
}

impl ReversibleStore for TrailingEnvironment {
    fn grow(&mut self, initial_value: i64) -> StoredInteger {
        self.values.push(initial_value)
    }

    fn read(&self, cell: StoredInteger) -> i64 {
        self.values[cell]
    }

    fn assign(&mut self, cell: StoredInteger, value: i64) {
        let old_value = self.values[cell];
        if old_value == value {
            return;
        }

        // Writes at the root are permanent.
        if self.trail.world_index() > 0 {
            self.trail.push(StoredChange {
                old_value,
                reference: cell,
            });
        }
        self.values[cell] = value;
    }

    fn push_world(&mut self) {
        self.trail.push_world()
    }

    fn pop_until(&mut self, world: usize) {
        if world >= self.trail.world_index() {
            return;
        }

        self.trail
            .pop_to(world)
            .for_each(|change| self.values[change.reference] = change.old_value)
    }

    fn world_index(&self) -> usize {
        self.trail.world_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_writes_are_not_recorded() {
        let mut environment = TrailingEnvironment::default();
        let cell = environment.grow(0);

        environment.assign(cell, 3);
        assert!(environment.trail.is_empty());

        environment.push_world();
        environment.assign(cell, 4);
        environment.assign(cell, 4);
        assert_eq!(environment.trail.entries_in_world(1).len(), 1);
    }
}
