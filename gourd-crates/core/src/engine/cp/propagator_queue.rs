use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use crate::containers::KeyedVec;
use crate::gourd_assert_moderate;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;

/// The propagators waiting to be called, one FIFO queue per [`Priority`].
///
/// A propagator is at most once in the queue. Popping returns the propagator which was enqueued
/// first among those with the highest priority, so the order of calls is deterministic.
#[derive(Debug, Clone)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<PropagatorId>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    num_enqueued: usize,
    present_priorities: BinaryHeap<Reverse<u32>>,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        Self::new(Priority::NUM_LEVELS)
    }
}

impl PropagatorQueue {
    pub(crate) fn new(num_priority_levels: u32) -> PropagatorQueue {
        PropagatorQueue {
            queues: vec![VecDeque::new(); num_priority_levels as usize],
            is_enqueued: KeyedVec::default(),
            num_enqueued: 0,
            present_priorities: BinaryHeap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    /// Enqueues the propagator unless it is already waiting.
    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: Priority) {
        gourd_assert_moderate!((priority as usize) < self.queues.len());

        if self.is_propagator_enqueued(propagator_id) {
            return;
        }

        self.is_enqueued.ensure_key(propagator_id, false);
        self.is_enqueued[propagator_id] = true;
        self.num_enqueued += 1;

        if self.queues[priority as usize].is_empty() {
            self.present_priorities.push(Reverse(priority as u32));
        }
        self.queues[priority as usize].push_back(propagator_id);
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let top_priority = self.present_priorities.peek()?.0 as usize;
        gourd_assert_moderate!(!self.queues[top_priority].is_empty());

        let propagator_id = self.queues[top_priority].pop_front()?;
        self.is_enqueued[propagator_id] = false;
        self.num_enqueued -= 1;

        if self.queues[top_priority].is_empty() {
            let _ = self.present_priorities.pop();
        }

        Some(propagator_id)
    }

    pub(crate) fn clear(&mut self) {
        while let Some(Reverse(priority)) = self.present_priorities.pop() {
            self.queues[priority as usize].clear();
        }

        for is_propagator_enqueued in self.is_enqueued.iter_mut() {
            *is_propagator_enqueued = false;
        }

        self.num_enqueued = 0;
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator_id)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_priorities_are_popped_first() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(1), Priority::High);
        queue.enqueue_propagator(PropagatorId(0), Priority::Medium);
        queue.enqueue_propagator(PropagatorId(3), Priority::VeryLow);
        queue.enqueue_propagator(PropagatorId(4), Priority::Low);

        assert_eq!(queue.pop(), Some(PropagatorId(1)));
        assert_eq!(queue.pop(), Some(PropagatorId(0)));
        assert_eq!(queue.pop(), Some(PropagatorId(4)));
        assert_eq!(queue.pop(), Some(PropagatorId(3)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn equal_priorities_keep_insertion_order_and_are_deduplicated() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(7), Priority::Low);
        queue.enqueue_propagator(PropagatorId(2), Priority::Low);
        queue.enqueue_propagator(PropagatorId(7), Priority::Low);
        queue.enqueue_propagator(PropagatorId(5), Priority::Low);

        assert_eq!(queue.pop(), Some(PropagatorId(7)));
        assert_eq!(queue.pop(), Some(PropagatorId(2)));
        assert_eq!(queue.pop(), Some(PropagatorId(5)));
        assert!(queue.is_empty());
    }

    #[test]
    fn cleared_queue_accepts_propagators_again() {
        let mut queue = PropagatorQueue::default();
        queue.enqueue_propagator(PropagatorId(0), Priority::High);
        queue.enqueue_propagator(PropagatorId(1), Priority::VeryLow);

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);

        queue.enqueue_propagator(PropagatorId(1), Priority::VeryLow);
        assert_eq!(queue.pop(), Some(PropagatorId(1)));
    }
}
