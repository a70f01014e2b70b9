//! Arc-consistent filtering for the all-different constraint, following Régin's algorithm.
//!
//! The constraint is modelled as a bipartite graph between variables and values with an edge
//! for every value in the domain of a variable. The graph is built when the propagator first
//! runs and afterwards kept in sync with the domains: the deltas of the variables remove edges,
//! and popping a world restores the edges removed above it. A maximum matching is repaired
//! whenever one of its edges disappears. The strongly connected components of the residual
//! graph then identify every edge which belongs to no maximum matching; those values are
//! removed.
mod components;
mod matching;
mod value_graph;

use log::trace;

use self::components::StronglyConnectedComponents;
use self::matching::Matching;
use self::value_graph::ResidualGraph;
use self::value_graph::ValueGraph;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::create_statistics_struct;
use crate::engine::cp::DeltaMonitor;
use crate::engine::notifications::DomainEvents;
use crate::engine::variables::IntegerVariable;
use crate::gourd_assert_moderate;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::Priority;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(AllDifferentStatistics {
    num_calls: u64,
    num_graph_builds: u64,
    num_matching_repairs: u64,
    num_edges_removed_by_deltas: u64,
    num_removed_values: u64,
});

/// The [`PropagatorConstructor`] for the [`AllDifferentPropagator`].
#[derive(Clone, Debug)]
pub(crate) struct AllDifferentArgs<Var> {
    pub(crate) variables: Box<[Var]>,
}

impl<Var> PropagatorConstructor for AllDifferentArgs<Var>
where
    Var: IntegerVariable + 'static,
{
    type PropagatorImpl = AllDifferentPropagator<Var>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let AllDifferentArgs { variables } = self;

        let monitors = variables
            .iter()
            .enumerate()
            .map(|(index, variable)| {
                context.register(
                    variable.clone(),
                    DomainEvents::ANY_INT,
                    LocalId::from(index as u32),
                );
                context.monitor_delta(variable)
            })
            .collect::<Box<[_]>>();

        AllDifferentPropagator {
            fixed: Vec::new(),
            matching: Matching::new(0, 0),
            graph: ValueGraph::default(),
            graph_is_stale: true,
            components: StronglyConnectedComponents::default(),
            removals: Vec::new(),
            variables,
            monitors,
            statistics: AllDifferentStatistics::default(),
        }
    }
}

/// Enforces that the variables take pairwise distinct values, removing every value which is not
/// part of any assignment satisfying the constraint.
///
/// Values in the interior of a domain which cannot represent holes are only removed once they
/// become a bound.
#[derive(Clone, Debug)]
pub(crate) struct AllDifferentPropagator<Var> {
    variables: Box<[Var]>,
    monitors: Box<[DeltaMonitor]>,

    graph: ValueGraph,
    /// Set when a world below the one the graph was built in is restored; the domains may then
    /// contain values the graph does not know.
    graph_is_stale: bool,
    matching: Matching,
    components: StronglyConnectedComponents,

    /// Variables which became fixed and whose value still has to be removed from the others.
    fixed: Vec<usize>,
    removals: Vec<usize>,

    statistics: AllDifferentStatistics,
}

impl<Var: IntegerVariable + 'static> AllDifferentPropagator<Var> {
    #[cfg(test)]
    fn matching_size(&self) -> usize {
        self.matching.size()
    }

    /// Builds the graph from the current domains and starts from an empty matching.
    fn build_graph(&mut self, context: &PropagationContextMut) -> PropagationStatusCP {
        let domains = self
            .variables
            .iter()
            .map(|variable| context.iterate_domain(variable).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        self.graph = ValueGraph::new(&domains, context.get_checkpoint());
        self.matching = Matching::new(self.variables.len(), self.graph.num_values());
        self.graph_is_stale = false;
        self.statistics.num_graph_builds += 1;

        if self.graph.num_values() < self.variables.len() {
            return Err(PropagatorConflict {
                propagator: "AllDifferent",
                message: "fewer values than variables",
            }
            .into());
        }

        Ok(())
    }

    /// Removes the edge from `index` to `value` if the domain lost the value, keeping the graph
    /// in line with removals made by this propagator, which it is not notified about.
    fn forget_removed_value(
        &mut self,
        context: &PropagationContextMut,
        index: usize,
        value: usize,
    ) {
        if context.contains(&self.variables[index], self.graph.value(value)) {
            return;
        }

        if self
            .graph
            .remove_edge(index, value, context.get_checkpoint())
        {
            self.statistics.num_removed_values += 1;
            if self.matching.value_of(index) == Some(value) {
                self.matching.unmatch_variable(index);
            }
        }
    }

    /// Removes the value of every newly fixed variable from the other variables, before the
    /// matching is repaired.
    fn remove_fixed_values(&mut self, context: &mut PropagationContextMut) -> PropagationStatusCP {
        while let Some(index) = self.fixed.pop() {
            let Some(value) = context.fixed_value(&self.variables[index]) else {
                continue;
            };
            let Some(value_index) = self.graph.index_of(value) else {
                continue;
            };

            for other in 0..self.variables.len() {
                if other == index || !self.graph.has_edge(other, value_index) {
                    continue;
                }

                let _ = context.remove(&self.variables[other], value)?;
                self.forget_removed_value(context, other, value_index);

                if context.is_fixed(&self.variables[other]) {
                    self.fixed.push(other);
                }
            }
        }

        Ok(())
    }

    /// Matches every unmatched variable, or reports that no matching covers all variables.
    fn repair_matching(&mut self) -> PropagationStatusCP {
        for variable in 0..self.variables.len() {
            if self.matching.value_of(variable).is_some() {
                continue;
            }

            self.statistics.num_matching_repairs += 1;
            if !self.matching.augment(variable, &self.graph) {
                trace!("all-different: variable {variable} cannot be matched");
                return Err(PropagatorConflict {
                    propagator: "AllDifferent",
                    message: "no value assignment covers every variable",
                }
                .into());
            }
        }

        Ok(())
    }

    fn filter(&mut self, context: &mut PropagationContextMut) -> PropagationStatusCP {
        let num_variables = self.variables.len();

        for index in 0..num_variables {
            let Some(matched_value) = self.matching.value_of(index) else {
                continue;
            };
            let component = self.components.component(index);
            let components = &self.components;

            self.removals.clear();
            if components.component(num_variables + matched_value) != component {
                // No other matching uses this variable differently.
                let _ = context.instantiate(
                    &self.variables[index],
                    self.graph.value(matched_value),
                )?;
                self.removals.extend(
                    self.graph
                        .neighbours(index)
                        .iter()
                        .filter(|&&value| value != matched_value),
                );
            } else {
                self.removals.extend(
                    self.graph.neighbours(index).iter().filter(|&&value| {
                        components.component(num_variables + value) != component
                    }),
                );
                // Value indices follow the order of the values. Ascending and then descending,
                // so that domains without holes can shrink from both ends.
                self.removals.sort_unstable();
                for &value in self.removals.iter().chain(self.removals.iter().rev()) {
                    let _ = context.remove(&self.variables[index], self.graph.value(value))?;
                }
            }

            let removals = std::mem::take(&mut self.removals);
            for &value in &removals {
                self.forget_removed_value(context, index, value);
            }
            self.removals = removals;
        }

        Ok(())
    }

    fn propagate_matching(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
        self.statistics.num_calls += 1;

        self.remove_fixed_values(&mut context)?;
        self.repair_matching()?;
        self.components
            .compute(&ResidualGraph::new(&self.graph, &self.matching));
        self.filter(&mut context)?;

        if self
            .variables
            .iter()
            .all(|variable| context.is_fixed(variable))
        {
            context.set_passive();
        }

        Ok(())
    }
}

impl<Var: IntegerVariable + 'static> Propagator for AllDifferentPropagator<Var> {
    fn name(&self) -> &str {
        "AllDifferent"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn synchronise(&mut self, context: PropagationContext) {
        self.fixed.clear();

        let world = context.get_checkpoint();
        if world < self.graph.built_at() {
            self.graph_is_stale = true;
        } else {
            self.graph.undo_until(world);
        }
    }

    fn propagate_from_scratch(&mut self, context: PropagationContextMut) -> PropagationStatusCP {
        for monitor in self.monitors.iter_mut() {
            // The graph is built from the domains themselves.
            let _ = context.read_delta(monitor);
        }

        self.build_graph(&context)?;
        self.fixed.clear();
        self.fixed.extend(
            self.variables
                .iter()
                .enumerate()
                .filter(|(_, variable)| context.is_fixed(*variable))
                .map(|(index, _)| index),
        );

        self.propagate_matching(context)
    }

    fn propagate(&mut self, context: PropagationContextMut) -> PropagationStatusCP {
        if self.graph_is_stale {
            return self.propagate_from_scratch(context);
        }

        let world = context.get_checkpoint();
        for index in 0..self.variables.len() {
            let removed = context.read_delta(&mut self.monitors[index]);
            if removed.is_empty() {
                continue;
            }

            for &(from, to) in &removed {
                self.statistics.num_edges_removed_by_deltas +=
                    self.graph.remove_interval(index, from, to, world) as u64;
            }

            if let Some(value) = self.matching.value_of(index) {
                if !self.graph.has_edge(index, value) {
                    self.matching.unmatch_variable(index);
                }
            }

            if context.is_fixed(&self.variables[index]) {
                self.fixed.push(index);
            }
        }

        gourd_assert_moderate!(self.variables.iter().enumerate().all(|(index, variable)| {
            self.graph
                .neighbours(index)
                .iter()
                .all(|&value| context.contains(variable, self.graph.value(value)))
        }));

        self.propagate_matching(context)
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        let mut fixed_values = self
            .variables
            .iter()
            .filter_map(|variable| context.fixed_value(variable))
            .collect::<Vec<_>>();
        let num_fixed = fixed_values.len();

        fixed_values.sort_unstable();
        fixed_values.dedup();

        if fixed_values.len() < num_fixed {
            Entailment::Disentailed
        } else if num_fixed == self.variables.len() {
            Entailment::Entailed
        } else {
            Entailment::Undecided
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
