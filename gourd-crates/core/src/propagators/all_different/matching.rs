use std::collections::VecDeque;

use super::value_graph::ValueGraph;

/// A matching in the bipartite graph between the variables and the values of an all-different
/// constraint. Variables and values are referred to by their index.
///
/// The matching is not reversible: edges only return on backtrack, so a matching which is valid
/// in a world stays valid in every world below it.
#[derive(Clone, Debug)]
pub(super) struct Matching {
    value_of_variable: Vec<Option<usize>>,
    variable_of_value: Vec<Option<usize>>,

    // Scratch space for the breadth-first search of augmenting paths.
    reached_from: Vec<usize>,
    visited: Vec<bool>,
    queue: VecDeque<usize>,
}

impl Matching {
    pub(super) fn new(num_variables: usize, num_values: usize) -> Matching {
        Matching {
            value_of_variable: vec![None; num_variables],
            variable_of_value: vec![None; num_values],
            reached_from: vec![0; num_values],
            visited: vec![false; num_values],
            queue: VecDeque::new(),
        }
    }

    #[cfg(test)]
    pub(super) fn size(&self) -> usize {
        self.value_of_variable.iter().flatten().count()
    }

    pub(super) fn value_of(&self, variable: usize) -> Option<usize> {
        self.value_of_variable[variable]
    }

    pub(super) fn variable_of(&self, value: usize) -> Option<usize> {
        self.variable_of_value[value]
    }

    pub(super) fn unmatch_variable(&mut self, variable: usize) {
        if let Some(value) = self.value_of_variable[variable].take() {
            self.variable_of_value[value] = None;
        }
    }

    /// Searches for an augmenting path starting at the unmatched `root` and flips it, which
    /// grows the matching by one. Returns `false` if no such path exists, in which case the
    /// matching is unchanged.
    ///
    /// Only edges of `graph` are used.
    pub(super) fn augment(&mut self, root: usize, graph: &ValueGraph) -> bool {
        debug_assert!(self.value_of_variable[root].is_none());

        self.visited.fill(false);
        self.queue.clear();
        self.queue.push_back(root);

        while let Some(variable) = self.queue.pop_front() {
            for &value in graph.neighbours(variable) {
                if self.visited[value] {
                    continue;
                }
                self.visited[value] = true;
                self.reached_from[value] = variable;

                match self.variable_of_value[value] {
                    Some(mate) => self.queue.push_back(mate),
                    None => {
                        self.flip_path(value);
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Flips the alternating path ending in the free value `end`.
    fn flip_path(&mut self, end: usize) {
        let mut value = end;
        loop {
            let variable = self.reached_from[value];
            let previous_value = self.value_of_variable[variable];

            self.value_of_variable[variable] = Some(value);
            self.variable_of_value[value] = Some(variable);

            match previous_value {
                Some(previous_value) => value = previous_value,
                None => break,
            }
        }
    }
}
