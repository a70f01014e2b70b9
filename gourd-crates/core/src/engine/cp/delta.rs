use crate::engine::variables::DomainId;

/// The values removed from one domain during the current propagation cycle, as inclusive
/// intervals in the order they were removed.
///
/// An interval produced by a bound change may cover values which were already absent from an
/// enumerated domain.
#[derive(Debug, Clone, Default)]
pub(crate) struct DomainDelta {
    cycle: u64,
    removed: Vec<(i32, i32)>,
}

impl DomainDelta {
    pub(crate) fn new(cycle: u64) -> Self {
        DomainDelta {
            cycle,
            removed: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, cycle: u64, from: i32, to: i32) {
        if self.cycle != cycle {
            self.cycle = cycle;
            self.removed.clear();
        }

        self.removed.push((from, to));
    }

    /// The intervals recorded in `cycle` starting from `cursor`.
    pub(crate) fn removed_since(&self, cycle: u64, cursor: usize) -> &[(i32, i32)] {
        if self.cycle != cycle {
            return &[];
        }

        &self.removed[cursor.min(self.removed.len())..]
    }
}

/// A cursor into the delta of one domain, owned by the propagator consuming it.
///
/// Reading a monitor (through [`Assignments::read_delta`]) yields the intervals removed since
/// the previous read within the current propagation cycle.
///
/// [`Assignments::read_delta`]: crate::engine::cp::Assignments::read_delta
#[derive(Debug, Clone, Copy)]
pub struct DeltaMonitor {
    pub(crate) domain: Option<DomainId>,
    pub(crate) cycle: u64,
    pub(crate) cursor: usize,
}

impl DeltaMonitor {
    pub(crate) fn new(domain: DomainId, cycle: u64) -> Self {
        DeltaMonitor {
            domain: Some(domain),
            cycle,
            cursor: 0,
        }
    }

    /// A monitor for a variable whose domain never changes.
    pub(crate) fn detached() -> Self {
        DeltaMonitor {
            domain: None,
            cycle: 0,
            cursor: 0,
        }
    }
}
