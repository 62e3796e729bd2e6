use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SimError;
use crate::protocol::Node;
use crate::{NodeId, Weight};

/// One undirected weighted link, for export and visualization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: Weight,
}

/// The simulated network: all nodes, unique by id, built once before the
/// first round and structurally immutable afterwards.
#[derive(Debug, Clone)]
pub struct Network {
    nodes: BTreeMap<NodeId, Node>,
}

impl Network {
    /// Build a network over the given node ids. Every node starts with a
    /// fully populated routing table (all destinations unreachable) and no
    /// links.
    pub fn new<I>(ids: I) -> Result<Self, SimError>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let all: Vec<NodeId> = ids.into_iter().collect();
        if all.is_empty() {
            return Err(SimError::EmptyNetwork);
        }

        let mut nodes = BTreeMap::new();
        for id in &all {
            let node = Node::new(id.clone(), &all);
            if nodes.insert(id.clone(), node).is_some() {
                return Err(SimError::DuplicateNode(id.clone()));
            }
        }

        Ok(Self { nodes })
    }

    /// Link two distinct existing nodes with a positive weight. The link is
    /// recorded symmetrically on both endpoints and both routing tables are
    /// seeded with the direct route. Re-linking overwrites the weight.
    pub fn add_link(&mut self, a: &NodeId, b: &NodeId, weight: Weight) -> Result<(), SimError> {
        if a == b {
            return Err(SimError::SelfLink(a.clone()));
        }
        if weight == 0 {
            return Err(SimError::ZeroWeightLink(a.clone(), b.clone()));
        }
        for id in [a, b] {
            if !self.nodes.contains_key(id) {
                return Err(SimError::UnknownNode(id.clone()));
            }
        }

        self.nodes
            .get_mut(a)
            .expect("checked above")
            .set_link(b.clone(), weight);
        self.nodes
            .get_mut(b)
            .expect("checked above")
            .set_link(a.clone(), weight);

        Ok(())
    }

    /// Look up a node by id. A miss is an `Option`, not an error.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn linked(&self, a: &NodeId, b: &NodeId) -> bool {
        self.nodes
            .get(a)
            .map(|n| n.neighbors().contains_key(b))
            .unwrap_or(false)
    }

    /// The weighted-edge view of the topology, derived on demand from the
    /// nodes' neighbor maps so it can never disagree with them. One entry
    /// per undirected link, endpoints in ascending order.
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for (id, node) in &self.nodes {
            for (neighbor, &weight) in node.neighbors() {
                if id < neighbor {
                    links.push(Link {
                        from: id.clone(),
                        to: neighbor.clone(),
                        weight,
                    });
                }
            }
        }
        links
    }
}
