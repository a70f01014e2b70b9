use std::fmt::Debug;
use std::marker::PhantomData;

use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// The propagators of a solver, indexed by [`PropagatorId`].
///
/// Removed (temporary) propagators leave an empty slot behind, so ids stay stable.
#[derive(Default, Clone)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Option<Box<dyn Propagator>>>,
}

/// A typed handle to a propagator, which allows retrieving the concrete propagator from the
/// solver.
#[derive(Debug)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    pub(crate) fn new(id: PropagatorId) -> Self {
        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    /// Get a type-erased handle to the propagator.
    pub fn propagator_id(&self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

impl PropagatorStore {
    /// The id the next added propagator will receive.
    pub(crate) fn next_id(&self) -> PropagatorId {
        PropagatorId::create_from_index(self.propagators.len())
    }

    pub(crate) fn add(&mut self, propagator: Box<dyn Propagator>) -> PropagatorId {
        self.propagators.push(Some(propagator))
    }

    pub(crate) fn remove(&mut self, propagator_id: PropagatorId) -> Option<Box<dyn Propagator>> {
        self.propagators.get_mut(propagator_id)?.take()
    }

    pub(crate) fn contains(&self, propagator_id: PropagatorId) -> bool {
        self.get(propagator_id).is_some()
    }

    pub(crate) fn get(&self, propagator_id: PropagatorId) -> Option<&dyn Propagator> {
        self.propagators.get(propagator_id)?.as_deref()
    }

    pub(crate) fn get_mut(
        &mut self,
        propagator_id: PropagatorId,
    ) -> Option<&mut (dyn Propagator + 'static)> {
        self.propagators.get_mut(propagator_id)?.as_deref_mut()
    }

    /// Iterate over the propagators which have not been removed.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (PropagatorId, &dyn Propagator)> + '_ {
        self.propagators
            .enumerate()
            .filter_map(|(id, propagator)| Some((id, propagator.as_deref()?)))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Propagator>> + '_ {
        self.propagators.iter_mut().flatten()
    }

    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.get(handle.id)?.downcast_ref()
    }

    pub(crate) fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.get_mut(handle.id)?.downcast_mut()
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.propagators
                    .iter()
                    .map(|propagator| propagator.as_ref().map(|propagator| propagator.name())),
            )
            .finish()
    }
}
