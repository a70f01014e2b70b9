const UNVISITED: u32 = u32::MAX;

/// A directed graph over the nodes `0..num_nodes()` whose arcs are enumerated through a cursor.
pub(super) trait Digraph {
    fn num_nodes(&self) -> usize;

    /// The next successor of `node` from `cursor` onwards, advancing the cursor past it.
    fn next_successor(&self, node: usize, cursor: &mut usize) -> Option<usize>;
}

/// The strongly connected components of a [`Digraph`], computed by an iterative version of
/// Tarjan's algorithm.
///
/// The buffers are kept between calls to avoid reallocating them on every propagation.
#[derive(Clone, Debug, Default)]
pub(super) struct StronglyConnectedComponents {
    component: Vec<u32>,

    index: Vec<u32>,
    lowlink: Vec<u32>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    call_stack: Vec<(usize, usize)>,
}

impl StronglyConnectedComponents {
    /// The component of `node`, as computed by the last call to
    /// [`StronglyConnectedComponents::compute`].
    pub(super) fn component(&self, node: usize) -> u32 {
        self.component[node]
    }

    pub(super) fn compute(&mut self, graph: &impl Digraph) {
        let num_nodes = graph.num_nodes();
        let StronglyConnectedComponents {
            component,
            index,
            lowlink,
            on_stack,
            stack,
            call_stack,
        } = self;

        component.clear();
        component.resize(num_nodes, UNVISITED);
        index.clear();
        index.resize(num_nodes, UNVISITED);
        lowlink.clear();
        lowlink.resize(num_nodes, UNVISITED);
        on_stack.clear();
        on_stack.resize(num_nodes, false);
        stack.clear();
        call_stack.clear();

        let mut next_index = 0;
        let mut next_component = 0;

        for root in 0..num_nodes {
            if index[root] != UNVISITED {
                continue;
            }

            index[root] = next_index;
            lowlink[root] = next_index;
            next_index += 1;
            stack.push(root);
            on_stack[root] = true;
            call_stack.push((root, 0));

            while let Some((node, cursor)) = call_stack.last_mut() {
                let node = *node;

                if let Some(successor) = graph.next_successor(node, cursor) {
                    if index[successor] == UNVISITED {
                        index[successor] = next_index;
                        lowlink[successor] = next_index;
                        next_index += 1;
                        stack.push(successor);
                        on_stack[successor] = true;
                        call_stack.push((successor, 0));
                    } else if on_stack[successor] {
                        lowlink[node] = lowlink[node].min(index[successor]);
                    }
                    continue;
                }

                let _ = call_stack.pop();
                if let Some(&(parent, _)) = call_stack.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[node]);
                }

                if lowlink[node] == index[node] {
                    while let Some(member) = stack.pop() {
                        on_stack[member] = false;
                        component[member] = next_component;
                        if member == node {
                            break;
                        }
                    }
                    next_component += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AdjacencyLists(Vec<Vec<usize>>);

    impl Digraph for AdjacencyLists {
        fn num_nodes(&self) -> usize {
            self.0.len()
        }

        fn next_successor(&self, node: usize, cursor: &mut usize) -> Option<usize> {
            let successor = self.0[node].get(*cursor).copied();
            *cursor += 1;
            successor
        }
    }

    #[test]
    fn cycles_form_components() {
        // 0 -> 1 -> 2 -> 0, 2 -> 3, 3 -> 4 -> 3
        let graph = AdjacencyLists(vec![vec![1], vec![2], vec![0, 3], vec![4], vec![3]]);
        let mut components = StronglyConnectedComponents::default();

        components.compute(&graph);

        assert_eq!(components.component(0), components.component(1));
        assert_eq!(components.component(1), components.component(2));
        assert_eq!(components.component(3), components.component(4));
        assert_ne!(components.component(0), components.component(3));
    }

    #[test]
    fn recomputing_discards_previous_components() {
        let mut components = StronglyConnectedComponents::default();
        components.compute(&AdjacencyLists(vec![vec![1], vec![0]]));
        assert_eq!(components.component(0), components.component(1));

        components.compute(&AdjacencyLists(vec![vec![1], vec![]]));

        assert_ne!(components.component(0), components.component(1));
    }
}
