use log::warn;
use std::collections::BTreeMap;

use crate::protocol::{RoutingTable, TableSnapshot};
use crate::{NodeId, Weight};

/// A router in the simulated network: an identity, the direct neighbors
/// with their link weights, and this node's routing table.
///
/// A node's table has exactly one writer, the node itself; other nodes
/// only ever see value-copy snapshots.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    neighbors: BTreeMap<NodeId, Weight>,
    table: RoutingTable,
}

impl Node {
    pub fn new<'a, I>(id: NodeId, all_ids: I) -> Self
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        let table = RoutingTable::new(id.clone(), all_ids);
        Self {
            id,
            neighbors: BTreeMap::new(),
            table,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn neighbors(&self) -> &BTreeMap<NodeId, Weight> {
        &self.neighbors
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Record a direct link to `other` and seed the routing table with it.
    /// Re-linking overwrites the previous weight, no accumulation. The
    /// topology layer calls this on both endpoints to keep links symmetric.
    pub(crate) fn set_link(&mut self, other: NodeId, weight: Weight) {
        self.neighbors.insert(other.clone(), weight);
        self.table.set_direct(other, weight);
    }

    /// Apply a neighbor's advertised table to this node's own.
    ///
    /// The link weight comes from this node's neighbor map, never from the
    /// advertisement. An update from a node that is not actually a
    /// neighbor is dropped. Returns whether any table entry changed.
    pub fn receive_update(&mut self, from: &NodeId, advertised: &TableSnapshot) -> bool {
        debug_assert_eq!(from, advertised.origin());

        let Some(&link_weight) = self.neighbors.get(from) else {
            warn!("node {}: dropping update from non-neighbor {}", self.id, from);
            return false;
        };

        self.table.relax(from, link_weight, advertised)
    }

    /// Value copy of the current table, tagged with this node's id.
    pub fn snapshot(&self) -> TableSnapshot {
        self.table.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Distance;

    fn ids(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn update_from_non_neighbor_is_dropped() {
        let all = ids(&["A", "B", "C"]);
        let mut a = Node::new("A".to_string(), &all);
        let mut c = Node::new("C".to_string(), &all);
        c.set_link("B".to_string(), 1);

        // C is not A's neighbor; its advertisement must not change A.
        assert!(!a.receive_update(&"C".to_string(), &c.snapshot()));
        assert_eq!(
            a.table().route(&"B".to_string()).unwrap().distance,
            Distance::Unreachable
        );
    }

    #[test]
    fn snapshot_is_a_value_copy() {
        let all = ids(&["A", "B"]);
        let mut a = Node::new("A".to_string(), &all);
        let before = a.snapshot();

        a.set_link("B".to_string(), 3);

        // The earlier snapshot must not observe the later mutation.
        let (_, entry) = before.entries().next().unwrap();
        assert_eq!(entry.distance, Distance::Unreachable);
    }

    #[test]
    fn relinking_overwrites_weight_and_direct_route() {
        let all = ids(&["A", "B"]);
        let mut a = Node::new("A".to_string(), &all);
        a.set_link("B".to_string(), 7);
        a.set_link("B".to_string(), 2);

        assert_eq!(a.neighbors()[&"B".to_string()], 2);
        assert_eq!(
            a.table().route(&"B".to_string()).unwrap().distance,
            Distance::Finite(2)
        );
    }
}
