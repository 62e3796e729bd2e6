use log::{debug, info};
use std::collections::BTreeMap;

use crate::error::SimError;
use crate::network::Network;
use crate::protocol::{Distance, TableSnapshot};
use crate::NodeId;

/// Engine lifecycle. `Converged` is terminal: no round changed any table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Converged,
}

/// Drives synchronous convergence rounds over a fixed network.
///
/// Each round every node's table is snapshotted first, then every node
/// applies every neighbor's pre-round snapshot — simultaneous broadcast,
/// then simultaneous apply. Update order within a round therefore cannot
/// leak a partially updated table into another node's relaxation.
pub struct SimulationEngine {
    network: Network,
    round: u32,
    state: EngineState,
}

impl SimulationEngine {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            round: 0,
            state: EngineState::Running,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    /// Rounds that changed at least one table so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_converged(&self) -> bool {
        self.state == EngineState::Converged
    }

    /// Execute one synchronous round. Returns whether any table changed;
    /// `false` also means the engine is now converged.
    ///
    /// Aborts with `DistanceRegression` if any recorded distance grew over
    /// the round, and with `ConvergenceOverrun` if the round counter passes
    /// the `N`-round bound — both signal internal bugs, not runtime
    /// conditions.
    pub fn step(&mut self) -> Result<bool, SimError> {
        if self.state == EngineState::Converged {
            return Ok(false);
        }

        // Simultaneous broadcast: every snapshot is taken before any
        // update of this round is applied.
        let snapshots: BTreeMap<NodeId, TableSnapshot> = self
            .network
            .nodes()
            .map(|n| (n.id().clone(), n.snapshot()))
            .collect();

        let ids: Vec<NodeId> = self.network.node_ids().cloned().collect();
        let mut changed = false;

        for id in &ids {
            let Some(node) = self.network.node_mut(id) else {
                continue;
            };
            let neighbor_ids: Vec<NodeId> = node.neighbors().keys().cloned().collect();
            for from in &neighbor_ids {
                if let Some(advertised) = snapshots.get(from) {
                    if node.receive_update(from, advertised) {
                        changed = true;
                    }
                }
            }
        }

        self.check_monotonic(&snapshots)?;

        if !changed {
            self.state = EngineState::Converged;
            return Ok(false);
        }

        self.round += 1;
        if self.round as usize > self.network.len() {
            return Err(SimError::ConvergenceOverrun {
                rounds: self.round,
                nodes: self.network.len(),
            });
        }

        Ok(true)
    }

    /// Run rounds until convergence; returns the number of changing
    /// rounds. Per-round tables go to the debug log.
    pub fn run(&mut self) -> Result<u32, SimError> {
        info!(
            "simulating {} nodes, {} links",
            self.network.len(),
            self.network.links().len()
        );

        while self.step()? {
            debug!("after round {}:", self.round);
            for node in self.network.nodes() {
                debug!("{}", node.table());
            }
        }

        info!("converged after {} rounds", self.round);
        Ok(self.round)
    }

    /// Every recorded distance must be non-increasing across a round.
    fn check_monotonic(&self, pre_round: &BTreeMap<NodeId, TableSnapshot>) -> Result<(), SimError> {
        for (id, snapshot) in pre_round {
            let Some(node) = self.network.node(id) else {
                continue;
            };
            for (dest, before) in snapshot.entries() {
                let after = node
                    .table()
                    .route(dest)
                    .map(|e| e.distance)
                    .unwrap_or(Distance::Unreachable);
                if after > before.distance {
                    return Err(SimError::DistanceRegression {
                        round: self.round,
                        node: id.clone(),
                        dest: dest.clone(),
                        before: before.distance,
                        after,
                    });
                }
            }
        }
        Ok(())
    }
}
