use crate::protocol::Distance;
use crate::NodeId;

/// Errors raised while building a network or driving the simulation.
///
/// Configuration problems are rejected before the engine runs; the
/// invariant variants signal a bug in the relaxation rule or topology
/// seeding and abort the run rather than produce silently wrong tables.
/// Plain "node not found" lookups are `Option` returns, not errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("network must contain at least one node")]
    EmptyNetwork,

    #[error("duplicate node id `{0}`")]
    DuplicateNode(NodeId),

    #[error("unknown node `{0}`")]
    UnknownNode(NodeId),

    #[error("cannot link node `{0}` to itself")]
    SelfLink(NodeId),

    #[error("link {0} <-> {1} must have a positive weight")]
    ZeroWeightLink(NodeId, NodeId),

    #[error("network of {nodes} nodes exceeds the {max} single-letter node ids")]
    TooManyNodes { nodes: usize, max: usize },

    #[error(
        "round {round}: distance from `{node}` to `{dest}` regressed from {before} to {after}"
    )]
    DistanceRegression {
        round: u32,
        node: NodeId,
        dest: NodeId,
        before: Distance,
        after: Distance,
    },

    #[error("no convergence after {rounds} rounds ({nodes} nodes should settle in at most {nodes} rounds)")]
    ConvergenceOverrun { rounds: u32, nodes: usize },
}
