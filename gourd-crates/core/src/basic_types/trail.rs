use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::gourd_assert_simple;

/// A stack of entries partitioned into nested worlds.
///
/// Entries pushed after [`Trail::push_world`] belong to the new world; [`Trail::pop_to`] hands
/// back the entries of every discarded world, most recent first, so that callers can undo them.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    world_index: usize,
    /// At index i is the position on the trail where world i + 1 starts.
    world_starts: Vec<usize>,
    entries: Vec<T>,
}

// Implemented by hand so that `T` is not required to implement `Default`.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            world_index: 0,
            world_starts: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn push_world(&mut self) {
        self.world_index += 1;
        self.world_starts.push(self.entries.len());
    }

    pub(crate) fn world_index(&self) -> usize {
        self.world_index
    }

    /// Discards every world above `world` and returns their entries in reverse order.
    pub(crate) fn pop_to(&mut self, world: usize) -> Rev<Drain<'_, T>> {
        gourd_assert_simple!(
            world < self.world_index,
            "cannot pop to world {world} from world {}",
            self.world_index
        );

        let new_len = self.world_starts[world];

        self.world_index = world;
        self.world_starts.truncate(world);
        self.entries.drain(new_len..).rev()
    }

    #[cfg(test)]
    pub(crate) fn entries_in_world(&self, world: usize) -> &[T] {
        gourd_assert_simple!(world <= self.world_index);

        let start = if world == 0 {
            0
        } else {
            self.world_starts[world - 1]
        };
        let end = if world == self.world_index {
            self.entries.len()
        } else {
            self.world_starts[world]
        };

        &self.entries[start..end]
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popping_a_world_removes_its_entries() {
        let mut trail = Trail::default();

        trail.push_world();
        trail.push(1);
        let _ = trail.pop_to(0);

        assert!(trail.is_empty());
        assert_eq!(trail.world_index(), 0);
    }

    #[test]
    fn popping_several_worlds_at_once_keeps_lower_worlds() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.push_world();
        trail.push(2);
        trail.push_world();
        trail.push(3);
        trail.push_world();
        trail.push(4);

        let _ = trail.pop_to(1);

        assert_eq!(&[1, 2], trail.deref());
    }

    #[test]
    fn popped_entries_are_handed_back_most_recent_first() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.push_world();
        trail.push(2);
        trail.push_world();
        trail.push(3);
        trail.push(4);

        let popped = trail.pop_to(0).collect::<Vec<_>>();
        assert_eq!(vec![4, 3, 2], popped);
    }

    #[test]
    fn entries_are_grouped_per_world() {
        let mut trail = Trail::default();
        trail.push(1);
        trail.push(2);

        trail.push_world();
        trail.push(3);
        trail.push_world();

        assert_eq!(&[1, 2], trail.entries_in_world(0));
        assert_eq!(&[3], trail.entries_in_world(1));
        assert!(trail.entries_in_world(2).is_empty());
    }
}
