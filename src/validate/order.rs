// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Deterministic graph-order algorithms
//!
//! Cycle detection (three-color depth-first search) and topological
//! ordering (Kahn's algorithm) over the petgraph adjacency structure the
//! validator builds from resolved, non-feedback channels. Both walk nodes
//! in declaration order and break ties the same way, so repeated runs over
//! the same candidate produce identical results.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::graph::{ChannelId, NodeId};

/// Adjacency structure over node declaration indices.
pub(crate) type FlowGraph = DiGraph<NodeId, ChannelId>;

/// Successors of a node in edge insertion order.
///
/// petgraph iterates neighbors most-recent-first; reversing restores bind
/// order. Parallel edges are collapsed to their first occurrence so a pair
/// of duplicate channels cannot report the same cycle twice.
fn successors(graph: &FlowGraph, node: usize) -> Vec<usize> {
    let mut seen = std::collections::HashSet::new();
    let mut result: Vec<usize> = graph
        .neighbors(NodeIndex::new(node))
        .map(NodeIndex::index)
        .collect();
    result.reverse();
    result.retain(|n| seen.insert(*n));
    result
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Find every cycle reachable through untagged edges.
///
/// Depth-first search rooted at each node in declaration order. Each back
/// edge to an in-progress node yields one cycle: the slice of the active
/// path starting at that node. The first cycle reported is therefore the
/// first one discovered in declaration order.
pub(crate) fn find_cycles(graph: &FlowGraph) -> Vec<Vec<NodeId>> {
    let node_count = graph.node_count();
    let mut marks = vec![Mark::Unvisited; node_count];
    let mut cycles = Vec::new();

    for root in 0..node_count {
        if marks[root] != Mark::Unvisited {
            continue;
        }

        // Explicit stack of (node, ordered successors, next position);
        // the stack prefix at any moment is the active path.
        let mut stack: Vec<(usize, Vec<usize>, usize)> = Vec::new();
        marks[root] = Mark::InProgress;
        stack.push((root, successors(graph, root), 0));

        while let Some(top) = stack.len().checked_sub(1) {
            let (node, position) = (stack[top].0, stack[top].2);

            if position >= stack[top].1.len() {
                stack.pop();
                marks[node] = Mark::Done;
                continue;
            }

            let next = stack[top].1[position];
            stack[top].2 += 1;

            match marks[next] {
                Mark::Unvisited => {
                    marks[next] = Mark::InProgress;
                    let next_successors = successors(graph, next);
                    stack.push((next, next_successors, 0));
                }
                Mark::InProgress => {
                    // Back edge: the active path from `next` down to `node`
                    // closes a cycle.
                    if let Some(start) = stack.iter().position(|(id, _, _)| *id == next) {
                        let cycle = stack[start..]
                            .iter()
                            .map(|(id, _, _)| NodeId::from_index(*id))
                            .collect();
                        cycles.push(cycle);
                    }
                }
                Mark::Done => {}
            }
        }
    }

    cycles
}

/// Topological order via Kahn's algorithm, ties broken by declaration
/// order.
///
/// Must only be called on an acyclic graph; [`find_cycles`] gates it.
pub(crate) fn topological_order(graph: &FlowGraph) -> Vec<NodeId> {
    let node_count = graph.node_count();
    let mut in_degree: Vec<usize> = (0..node_count)
        .map(|n| {
            graph
                .neighbors_directed(NodeIndex::new(n), Direction::Incoming)
                .count()
        })
        .collect();

    // Min-heap over declaration indices: among all ready nodes, the
    // earliest-declared one is removed first.
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(n, _)| Reverse(n))
        .collect();

    let mut order = Vec::with_capacity(node_count);
    while let Some(Reverse(node)) = ready.pop() {
        order.push(NodeId::from_index(node));
        for neighbor in graph.neighbors(NodeIndex::new(node)) {
            let n = neighbor.index();
            in_degree[n] -= 1;
            if in_degree[n] == 0 {
                ready.push(Reverse(n));
            }
        }
    }

    debug_assert_eq!(order.len(), node_count, "graph must be acyclic");
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(node_count: usize, edges: &[(usize, usize)]) -> FlowGraph {
        let mut graph = FlowGraph::new();
        for n in 0..node_count {
            graph.add_node(NodeId::from_index(n));
        }
        for (i, (from, to)) in edges.iter().enumerate() {
            graph.add_edge(
                NodeIndex::new(*from),
                NodeIndex::new(*to),
                ChannelId::from_index(i),
            );
        }
        graph
    }

    fn indices(ids: &[NodeId]) -> Vec<usize> {
        ids.iter().map(NodeId::index).collect()
    }

    #[test]
    fn test_linear_order() {
        let graph = graph_of(3, &[(0, 1), (1, 2)]);
        assert!(find_cycles(&graph).is_empty());
        assert_eq!(indices(&topological_order(&graph)), vec![0, 1, 2]);
    }

    #[test]
    fn test_kahn_ties_break_by_declaration_order() {
        // Diamond: 0 -> {2, 1} -> 3; both 1 and 2 become ready together
        let graph = graph_of(4, &[(0, 2), (0, 1), (1, 3), (2, 3)]);
        assert_eq!(indices(&topological_order(&graph)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_independent_nodes_keep_declaration_order() {
        let graph = graph_of(3, &[]);
        assert_eq!(indices(&topological_order(&graph)), vec![0, 1, 2]);
    }

    #[test]
    fn test_two_node_cycle() {
        let graph = graph_of(2, &[(0, 1), (1, 0)]);
        let cycles = find_cycles(&graph);

        assert_eq!(cycles.len(), 1);
        assert_eq!(indices(&cycles[0]), vec![0, 1]);
    }

    #[test]
    fn test_self_loop_cycle() {
        let graph = graph_of(1, &[(0, 0)]);
        let cycles = find_cycles(&graph);

        assert_eq!(cycles.len(), 1);
        assert_eq!(indices(&cycles[0]), vec![0]);
    }

    #[test]
    fn test_two_disjoint_cycles_both_reported() {
        let graph = graph_of(4, &[(0, 1), (1, 0), (2, 3), (3, 2)]);
        let cycles = find_cycles(&graph);

        assert_eq!(cycles.len(), 2);
        assert_eq!(indices(&cycles[0]), vec![0, 1]);
        assert_eq!(indices(&cycles[1]), vec![2, 3]);
    }

    #[test]
    fn test_cycle_detection_is_deterministic() {
        let graph = graph_of(3, &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(find_cycles(&graph), find_cycles(&graph));
    }
}
