//! Random topology generation.
//!
//! Builds a connected network: a spanning chain first (so every node is
//! reachable), then extra random links to diversify the graph. Weights are
//! uniform in 1..=10. The RNG is seeded, so a (node count, seed) pair
//! always produces the same topology.

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::SimError;
use crate::network::Network;
use crate::NodeId;

/// Generated node ids are single letters, A through Z.
pub const MAX_NODES: usize = 26;

const MAX_LINK_WEIGHT: u32 = 10;

fn node_label(index: usize) -> NodeId {
    char::from(b'A' + index as u8).to_string()
}

/// Generate a connected random network of `num_nodes` nodes.
pub fn generate(num_nodes: usize, seed: u64) -> Result<Network, SimError> {
    if num_nodes > MAX_NODES {
        return Err(SimError::TooManyNodes {
            nodes: num_nodes,
            max: MAX_NODES,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let labels: Vec<NodeId> = (0..num_nodes).map(node_label).collect();
    let mut network = Network::new(labels.clone())?;

    // Spanning chain guarantees connectivity.
    for pair in labels.windows(2) {
        let weight = rng.gen_range(1..=MAX_LINK_WEIGHT);
        network.add_link(&pair[0], &pair[1], weight)?;
    }

    // Extra random links per node to diversify the topology.
    if num_nodes > 1 {
        for label in &labels {
            let count = rng.gen_range(1..num_nodes);
            let picks: Vec<NodeId> = labels
                .choose_multiple(&mut rng, count)
                .cloned()
                .collect();
            for other in picks {
                if other != *label && !network.linked(label, &other) {
                    let weight = rng.gen_range(1..=MAX_LINK_WEIGHT);
                    network.add_link(label, &other, weight)?;
                }
            }
        }
    }

    info!(
        "generated network: {} nodes, {} links (seed {})",
        network.len(),
        network.links().len(),
        seed
    );

    Ok(network)
}
