//! Collections shared across the solver.
mod keyed_vec;

use fnv::FnvBuildHasher;
pub use keyed_vec::*;

/// A [`std::collections::HashMap`] with the FNV hasher, whose iteration order does not change
/// between runs.
#[allow(clippy::disallowed_types, reason = "the alias itself is the allowed way")]
pub type HashMap<K, V, Hasher = FnvBuildHasher> = std::collections::HashMap<K, V, Hasher>;
