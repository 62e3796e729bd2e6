//! Global shortest-path computation over a `Network`.
//!
//! The simulation itself never uses this: each node only sees neighbor
//! advertisements. It exists as an independent oracle to verify converged
//! distance-vector tables against.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use crate::network::Network;
use crate::{NodeId, Weight};

#[derive(Debug, Clone)]
pub struct ShortestPath {
    pub cost: Weight,
    pub next_hop: Option<NodeId>,
    pub path: Vec<NodeId>,
}

#[derive(Debug)]
struct State {
    cost: Weight,
    node: NodeId,
}

impl Eq for State {}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other.cost.cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest paths from `source` to every reachable destination.
/// Unreachable destinations (and the source itself) are absent from the
/// result.
pub fn calculate_shortest_paths(
    network: &Network,
    source: &NodeId,
) -> BTreeMap<NodeId, ShortestPath> {
    let mut distances: HashMap<NodeId, Weight> = HashMap::new();
    let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
    let mut heap = BinaryHeap::new();

    distances.insert(source.clone(), 0);
    heap.push(State {
        cost: 0,
        node: source.clone(),
    });

    while let Some(State { cost, node }) = heap.pop() {
        // Skip if we've already found a better path
        if cost > *distances.get(&node).unwrap_or(&Weight::MAX) {
            continue;
        }

        let Some(entry) = network.node(&node) else {
            continue;
        };

        for (neighbor, &link_cost) in entry.neighbors() {
            let new_cost = cost + link_cost;

            if new_cost < *distances.get(neighbor).unwrap_or(&Weight::MAX) {
                distances.insert(neighbor.clone(), new_cost);
                previous.insert(neighbor.clone(), node.clone());

                heap.push(State {
                    cost: new_cost,
                    node: neighbor.clone(),
                });
            }
        }
    }

    let mut paths = BTreeMap::new();
    for (dest, &cost) in &distances {
        if dest == source {
            continue;
        }
        let path = reconstruct_path(&previous, source, dest);
        let next_hop = path.get(1).cloned();
        paths.insert(dest.clone(), ShortestPath { cost, next_hop, path });
    }

    paths
}

fn reconstruct_path(
    previous: &HashMap<NodeId, NodeId>,
    source: &NodeId,
    dest: &NodeId,
) -> Vec<NodeId> {
    let mut path = vec![dest.clone()];
    let mut current = dest;

    while current != source {
        match previous.get(current) {
            Some(prev) => {
                path.push(prev.clone());
                current = prev;
            }
            None => break,
        }
    }

    path.reverse();
    path
}
