use enumset::EnumSet;

use super::DomainEvent;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorVarId;

/// For every domain, the propagators (and their local variable ids) to wake per event kind.
#[derive(Default, Debug, Clone)]
pub(crate) struct WatchListDomainEvents {
    watchers: KeyedVec<DomainId, Watcher>,
}

#[derive(Debug, Default, Clone)]
struct Watcher {
    lower_bound_watchers: Vec<PropagatorVarId>,
    upper_bound_watchers: Vec<PropagatorVarId>,
    assign_watchers: Vec<PropagatorVarId>,
    removal_watchers: Vec<PropagatorVarId>,
}

impl Watcher {
    fn watchers_mut(&mut self, event: DomainEvent) -> &mut Vec<PropagatorVarId> {
        match event {
            DomainEvent::Assign => &mut self.assign_watchers,
            DomainEvent::LowerBound => &mut self.lower_bound_watchers,
            DomainEvent::UpperBound => &mut self.upper_bound_watchers,
            DomainEvent::Removal => &mut self.removal_watchers,
        }
    }
}

impl WatchListDomainEvents {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(Watcher::default());
    }

    pub(crate) fn get_affected_propagators(
        &self,
        event: DomainEvent,
        domain: DomainId,
    ) -> &[PropagatorVarId] {
        let watcher = &self.watchers[domain];

        match event {
            DomainEvent::Assign => &watcher.assign_watchers,
            DomainEvent::LowerBound => &watcher.lower_bound_watchers,
            DomainEvent::UpperBound => &watcher.upper_bound_watchers,
            DomainEvent::Removal => &watcher.removal_watchers,
        }
    }

    fn watch_all(
        &mut self,
        domain: DomainId,
        events: EnumSet<DomainEvent>,
        propagator_var: PropagatorVarId,
    ) {
        let watcher = &mut self.watchers[domain];

        for event in events {
            let watchers = watcher.watchers_mut(event);
            if !watchers.contains(&propagator_var) {
                watchers.push(propagator_var);
            }
        }
    }

    /// Removes every subscription of the given propagator on the given domain.
    pub(crate) fn unwatch_all(&mut self, domain: DomainId, propagator: PropagatorId) {
        let watcher = &mut self.watchers[domain];

        for event in EnumSet::<DomainEvent>::all() {
            watcher
                .watchers_mut(event)
                .retain(|propagator_var| propagator_var.propagator != propagator);
        }
    }
}

/// Used to register a propagator for notifications about events to a particular variable.
#[derive(Debug)]
pub struct Watchers<'a> {
    propagator_var: PropagatorVarId,
    watch_list: &'a mut WatchListDomainEvents,
    watched_domains: &'a mut Vec<DomainId>,
}

impl<'a> Watchers<'a> {
    pub(crate) fn new(
        propagator_var: PropagatorVarId,
        watch_list: &'a mut WatchListDomainEvents,
        watched_domains: &'a mut Vec<DomainId>,
    ) -> Self {
        Watchers {
            propagator_var,
            watch_list,
            watched_domains,
        }
    }

    pub(crate) fn watch_all(&mut self, domain: DomainId, events: EnumSet<DomainEvent>) {
        self.watch_list
            .watch_all(domain, events, self.propagator_var);
        if !self.watched_domains.contains(&domain) {
            self.watched_domains.push(domain);
        }
    }
}
