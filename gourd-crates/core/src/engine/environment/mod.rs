//! The reversible memory of the solver.
//!
//! Every piece of state which has to be restored on backtrack (domain bounds, domain bitsets,
//! propagator activity) lives in [`StoredInteger`] cells of an environment. Two strategies are
//! provided behind the [`ReversibleStore`] trait:
//! - [`EnvironmentKind::Trailing`] records the previous value of a cell on every write and
//!   undoes those records when a world is popped;
//! - [`EnvironmentKind::Copying`] snapshots all cells when a world is pushed and copies the
//!   snapshot back when it is popped.
//!
//! The choice is a performance trade-off only; observable behaviour is identical.
mod copying;
mod stored_integer;
mod trailing;

use std::fmt::Display;

pub(crate) use copying::CopyingEnvironment;
pub(crate) use stored_integer::StoredInteger;
pub(crate) use trailing::TrailingEnvironment;

/// Storage of integer cells which can be saved and restored in nested worlds.
pub(crate) trait ReversibleStore {
    /// Allocates a new cell holding `initial_value`.
    fn grow(&mut self, initial_value: i64) -> StoredInteger;

    fn read(&self, cell: StoredInteger) -> i64;

    fn assign(&mut self, cell: StoredInteger, value: i64);

    fn add_assign(&mut self, cell: StoredInteger, addition: i64) {
        let value = self.read(cell);
        self.assign(cell, value + addition);
    }

    /// Creates world `world_index() + 1`.
    fn push_world(&mut self);

    /// Restores every cell to its value when world `world` was current; worlds nest strictly so
    /// only worlds above `world` are discarded.
    fn pop_until(&mut self, world: usize);

    #[cfg(test)]
    fn pop_world(&mut self) {
        let world = self.world_index();
        self.pop_until(world - 1);
    }

    fn world_index(&self) -> usize;
}

/// The backtracking strategy used by the environment of a solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum EnvironmentKind {
    /// Store undo records per write.
    #[default]
    Trailing,
    /// Snapshot all cells per world.
    Copying,
}

impl Display for EnvironmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentKind::Trailing => write!(f, "trailing"),
            EnvironmentKind::Copying => write!(f, "copying"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Environment {
    Trailing(TrailingEnvironment),
    Copying(CopyingEnvironment),
}

impl Environment {
    pub(crate) fn new(kind: EnvironmentKind) -> Self {
        match kind {
            EnvironmentKind::Trailing => Environment::Trailing(TrailingEnvironment::default()),
            EnvironmentKind::Copying => Environment::Copying(CopyingEnvironment::default()),
        }
    }

    pub(crate) fn kind(&self) -> EnvironmentKind {
        match self {
            Environment::Trailing(_) => EnvironmentKind::Trailing,
            Environment::Copying(_) => EnvironmentKind::Copying,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new(EnvironmentKind::default())
    }
}

impl ReversibleStore for Environment {
    fn grow(&mut self, initial_value: i64) -> StoredInteger {
        match self {
            Environment::Trailing(environment) => environment.grow(initial_value),
            Environment::Copying(environment) => environment.grow(initial_value),
        }
    }

    fn read(&self, cell: StoredInteger) -> i64 {
        match self {
            Environment::Trailing(environment) => environment.read(cell),
            Environment::Copying(environment) => environment.read(cell),
        }
    }

    fn assign(&mut self, cell: StoredInteger, value: i64) {
        match self {
            Environment::Trailing(environment) => environment.assign(cell, value),
            Environment::Copying(environment) => environment.assign(cell, value),
        }
    }

    fn push_world(&mut self) {
        match self {
            Environment::Trailing(environment) => environment.push_world(),
            Environment::Copying(environment) => environment.push_world(),
        }
    }

    fn pop_until(&mut self, world: usize) {
        match self {
            Environment::Trailing(environment) => environment.pop_until(world),
            Environment::Copying(environment) => environment.pop_until(world),
        }
    }

    fn world_index(&self) -> usize {
        match self {
            Environment::Trailing(environment) => environment.world_index(),
            Environment::Copying(environment) => environment.world_index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(kind: EnvironmentKind) {
        let mut environment = Environment::new(kind);
        let a = environment.grow(0);
        let b = environment.grow(7);

        environment.push_world();
        environment.add_assign(a, 5);
        environment.assign(b, 1);

        environment.push_world();
        environment.add_assign(a, 1);
        let c = environment.grow(3);
        environment.assign(c, 4);
        assert_eq!(environment.read(a), 6);

        environment.pop_world();
        assert_eq!(environment.world_index(), 1);
        assert_eq!(environment.read(a), 5);
        assert_eq!(environment.read(c), 3);
        assert_eq!(environment.read(b), 1);

        environment.pop_until(0);
        assert_eq!(environment.read(a), 0);
        assert_eq!(environment.read(b), 7);
    }

    #[test]
    fn trailing_environment_restores_nested_worlds() {
        exercise(EnvironmentKind::Trailing);
    }

    #[test]
    fn copying_environment_restores_nested_worlds() {
        exercise(EnvironmentKind::Copying);
    }

    #[test]
    fn pop_until_current_world_is_a_no_op() {
        for kind in [EnvironmentKind::Trailing, EnvironmentKind::Copying] {
            let mut environment = Environment::new(kind);
            let a = environment.grow(2);
            environment.push_world();
            environment.assign(a, 9);

            environment.pop_until(1);

            assert_eq!(environment.read(a), 9);
            assert_eq!(environment.kind(), kind);
        }
    }
}
