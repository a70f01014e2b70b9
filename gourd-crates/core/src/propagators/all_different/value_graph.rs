use super::components::Digraph;
use super::matching::Matching;
use crate::containers::HashMap;

/// The bipartite graph between the variables and the values of an all-different constraint,
/// with an edge for every value in the domain of a variable. Values are referred to by their
/// index in the sorted value table.
///
/// The edges of a variable are a sparse set: the first `degree[x]` entries of `adjacency[x]`
/// are present, and removing an edge swaps it behind them. Removals are logged with the world
/// they happen in, so that popping worlds restores the edges by growing the degrees again.
#[derive(Clone, Debug, Default)]
pub(super) struct ValueGraph {
    values: Vec<i32>,
    value_index: HashMap<i32, usize>,

    adjacency: Vec<Vec<usize>>,
    degree: Vec<usize>,
    /// The position of the edge `(variable, value)` in `adjacency[variable]`.
    position: HashMap<(usize, usize), usize>,
    /// `(world, variable)` for every removed edge, in the order of removal.
    removed: Vec<(usize, usize)>,

    /// The world the graph was built in; worlds below it may contain values outside the table.
    built_at: usize,
}

impl ValueGraph {
    /// Creates the graph in which variable `x` is connected to the values of `domains[x]`.
    pub(super) fn new(domains: &[Vec<i32>], world: usize) -> ValueGraph {
        let mut values = domains.iter().flatten().copied().collect::<Vec<_>>();
        values.sort_unstable();
        values.dedup();

        let value_index = values
            .iter()
            .enumerate()
            .map(|(index, &value)| (value, index))
            .collect::<HashMap<_, _>>();

        let mut position = HashMap::default();
        let adjacency = domains
            .iter()
            .enumerate()
            .map(|(variable, domain)| {
                domain
                    .iter()
                    .enumerate()
                    .map(|(slot, value)| {
                        let value = value_index[value];
                        let _ = position.insert((variable, value), slot);
                        value
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        ValueGraph {
            values,
            value_index,
            degree: adjacency.iter().map(Vec::len).collect(),
            adjacency,
            position,
            removed: Vec::new(),
            built_at: world,
        }
    }

    pub(super) fn num_variables(&self) -> usize {
        self.adjacency.len()
    }

    pub(super) fn num_values(&self) -> usize {
        self.values.len()
    }

    pub(super) fn value(&self, value: usize) -> i32 {
        self.values[value]
    }

    pub(super) fn index_of(&self, value: i32) -> Option<usize> {
        self.value_index.get(&value).copied()
    }

    pub(super) fn built_at(&self) -> usize {
        self.built_at
    }

    /// The values connected to `variable`, in no particular order.
    pub(super) fn neighbours(&self, variable: usize) -> &[usize] {
        &self.adjacency[variable][..self.degree[variable]]
    }

    #[cfg(test)]
    pub(super) fn num_edges(&self) -> usize {
        self.degree.iter().sum()
    }

    pub(super) fn has_edge(&self, variable: usize, value: usize) -> bool {
        self.position
            .get(&(variable, value))
            .is_some_and(|&slot| slot < self.degree[variable])
    }

    /// Removes the edge in `world`. Returns `false` if it was already absent.
    pub(super) fn remove_edge(&mut self, variable: usize, value: usize, world: usize) -> bool {
        let Some(&slot) = self.position.get(&(variable, value)) else {
            return false;
        };
        let last = self.degree[variable];
        if slot >= last {
            return false;
        }

        let last = last - 1;
        let moved = self.adjacency[variable][last];
        self.adjacency[variable].swap(slot, last);
        let _ = self.position.insert((variable, moved), slot);
        let _ = self.position.insert((variable, value), last);

        self.degree[variable] = last;
        self.removed.push((world, variable));
        true
    }

    /// Removes the edges from `variable` to the values in `[from, to]`, returning how many
    /// were present.
    pub(super) fn remove_interval(
        &mut self,
        variable: usize,
        from: i32,
        to: i32,
        world: usize,
    ) -> usize {
        let width = (to as i64 - from as i64 + 1) as usize;
        let mut num_removed = 0;

        if width <= self.degree[variable] {
            for value in from..=to {
                if let Some(value) = self.index_of(value) {
                    num_removed += usize::from(self.remove_edge(variable, value, world));
                }
            }
        } else {
            // A removal swaps in an edge from behind the cursor, which was already checked.
            for slot in (0..self.degree[variable]).rev() {
                let value = self.adjacency[variable][slot];
                if (from..=to).contains(&self.values[value]) {
                    num_removed += usize::from(self.remove_edge(variable, value, world));
                }
            }
        }

        num_removed
    }

    /// Restores the edges removed in the worlds above `world`.
    pub(super) fn undo_until(&mut self, world: usize) {
        while let Some(&(removed_in, variable)) = self.removed.last() {
            if removed_in <= world {
                break;
            }
            let _ = self.removed.pop();
            self.degree[variable] += 1;
        }
    }
}

/// The graph in which an edge lies in a strongly connected component exactly when it belongs
/// to some maximum matching: unmatched edges go from variable to value, matched edges from
/// value to variable, and free values are connected through a sink to the matched ones.
///
/// Nodes are the variables, then the values, then the sink.
#[derive(Clone, Copy, Debug)]
pub(super) struct ResidualGraph<'a> {
    graph: &'a ValueGraph,
    matching: &'a Matching,
}

impl<'a> ResidualGraph<'a> {
    pub(super) fn new(graph: &'a ValueGraph, matching: &'a Matching) -> Self {
        ResidualGraph { graph, matching }
    }

    fn value_node(&self, value: usize) -> usize {
        self.graph.num_variables() + value
    }

    fn sink(&self) -> usize {
        self.graph.num_variables() + self.graph.num_values()
    }
}

impl Digraph for ResidualGraph<'_> {
    fn num_nodes(&self) -> usize {
        self.sink() + 1
    }

    fn next_successor(&self, node: usize, cursor: &mut usize) -> Option<usize> {
        let num_variables = self.graph.num_variables();

        if node < num_variables {
            let matched_value = self.matching.value_of(node);
            let neighbours = self.graph.neighbours(node);
            while let Some(&value) = neighbours.get(*cursor) {
                *cursor += 1;
                if Some(value) != matched_value {
                    return Some(self.value_node(value));
                }
            }
            None
        } else if node < self.sink() {
            if *cursor > 0 {
                return None;
            }
            *cursor = 1;
            Some(
                self.matching
                    .variable_of(node - num_variables)
                    .unwrap_or(self.sink()),
            )
        } else {
            while *cursor < self.graph.num_values() {
                let value = *cursor;
                *cursor += 1;
                if self.matching.variable_of(value).is_some() {
                    return Some(self.value_node(value));
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_neighbours(graph: &ValueGraph, variable: usize) -> Vec<i32> {
        let mut values = graph
            .neighbours(variable)
            .iter()
            .map(|&value| graph.value(value))
            .collect::<Vec<_>>();
        values.sort_unstable();
        values
    }

    #[test]
    fn value_table_is_sorted_and_shared() {
        let graph = ValueGraph::new(&[vec![3, 5], vec![1, 5]], 0);

        assert_eq!(graph.num_values(), 3);
        assert_eq!(graph.index_of(1), Some(0));
        assert_eq!(graph.index_of(5), Some(2));
        assert_eq!(graph.index_of(4), None);
        assert_eq!(graph.num_edges(), 4);
    }

    #[test]
    fn removed_edges_return_when_their_world_is_undone() {
        let mut graph = ValueGraph::new(&[vec![1, 2, 3], vec![1, 2]], 0);

        assert!(graph.remove_edge(0, 0, 0));
        assert!(graph.remove_edge(0, 2, 1));
        assert!(graph.remove_edge(1, 1, 2));
        assert!(!graph.remove_edge(1, 1, 2));
        assert_eq!(sorted_neighbours(&graph, 0), vec![2]);

        graph.undo_until(1);
        assert_eq!(sorted_neighbours(&graph, 1), vec![1, 2]);
        assert_eq!(sorted_neighbours(&graph, 0), vec![2]);

        graph.undo_until(0);
        assert_eq!(sorted_neighbours(&graph, 0), vec![2, 3]);
        assert!(!graph.has_edge(0, 0));
        assert!(graph.has_edge(0, 2));
    }

    #[test]
    fn intervals_remove_only_present_edges() {
        let mut graph = ValueGraph::new(&[vec![1, 4, 6, 9], vec![2, 4]], 0);

        assert_eq!(graph.remove_interval(0, 3, 7, 0), 2);
        assert_eq!(sorted_neighbours(&graph, 0), vec![1, 9]);

        // Wider than the remaining edges of the variable.
        assert_eq!(graph.remove_interval(0, i32::MIN, 1, 0), 1);
        assert_eq!(sorted_neighbours(&graph, 0), vec![9]);

        assert_eq!(graph.remove_interval(1, 4, 4, 0), 1);
        assert_eq!(sorted_neighbours(&graph, 1), vec![2]);
    }
}
