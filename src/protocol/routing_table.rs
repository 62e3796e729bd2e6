use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{NodeId, Weight};

/// Distance to a destination: a finite hop cost or unreachable.
///
/// `Unreachable` orders after every finite value, so the relaxation rule
/// can compare candidates directly without a numeric infinity sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Distance {
    Finite(Weight),
    Unreachable,
}

impl Distance {
    /// Cost of reaching a destination through a link of the given weight.
    /// Anything past an unreachable hop stays unreachable, as does an
    /// overflowing sum.
    pub fn extend(self, link_weight: Weight) -> Distance {
        match self {
            Distance::Finite(d) => d
                .checked_add(link_weight)
                .map_or(Distance::Unreachable, Distance::Finite),
            Distance::Unreachable => Distance::Unreachable,
        }
    }

    pub fn is_finite(self) -> bool {
        matches!(self, Distance::Finite(_))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{}", d),
            Distance::Unreachable => write!(f, "∞"),
        }
    }
}

/// Best known route to one destination.
///
/// `next_hop` is `None` exactly when the distance is `Unreachable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub distance: Distance,
    pub next_hop: Option<NodeId>,
}

impl RouteEntry {
    fn unreachable() -> Self {
        Self {
            distance: Distance::Unreachable,
            next_hop: None,
        }
    }
}

/// Immutable value copy of a routing table, tagged with the advertising
/// node. This is what neighbors consume during a round: relaxation always
/// reads a consistent pre-round view, never a live table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    origin: NodeId,
    entries: BTreeMap<NodeId, RouteEntry>,
}

impl TableSnapshot {
    pub fn origin(&self) -> &NodeId {
        &self.origin
    }

    pub fn entries(&self) -> impl Iterator<Item = (&NodeId, &RouteEntry)> {
        self.entries.iter()
    }
}

/// One node's view of the network: destination -> best known route.
///
/// Created fully populated (every non-self destination unreachable) and
/// only ever improved afterwards — a destination's recorded distance is
/// non-increasing across the table's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTable {
    owner: NodeId,
    entries: BTreeMap<NodeId, RouteEntry>,
}

impl RoutingTable {
    /// Table for `owner` covering every destination in `all_ids` except
    /// the owner itself (a node does not route to itself).
    pub fn new<'a, I>(owner: NodeId, all_ids: I) -> Self
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        let entries = all_ids
            .into_iter()
            .filter(|id| **id != owner)
            .map(|id| (id.clone(), RouteEntry::unreachable()))
            .collect();

        Self { owner, entries }
    }

    pub fn owner(&self) -> &NodeId {
        &self.owner
    }

    /// Seed the direct-link route to a neighbor. Unconditional overwrite:
    /// used at construction time only, never during relaxation.
    pub fn set_direct(&mut self, neighbor: NodeId, weight: Weight) {
        self.entries.insert(
            neighbor.clone(),
            RouteEntry {
                distance: Distance::Finite(weight),
                next_hop: Some(neighbor),
            },
        );
    }

    /// Bellman-Ford edge relaxation against a neighbor's advertised table.
    ///
    /// For every destination the neighbor advertises (other than this
    /// table's owner), the candidate cost is the local link weight plus
    /// the advertised distance — the neighbor's claimed distance to itself
    /// is never trusted, only the known direct link cost. An entry is
    /// replaced only on strict improvement; equal-cost alternatives keep
    /// the incumbent route.
    ///
    /// Returns whether any entry changed.
    pub fn relax(
        &mut self,
        via: &NodeId,
        link_weight: Weight,
        advertised: &TableSnapshot,
    ) -> bool {
        let mut changed = false;

        for (dest, entry) in advertised.entries() {
            if *dest == self.owner {
                continue;
            }

            let candidate = entry.distance.extend(link_weight);
            let current = self
                .entries
                .get(dest)
                .map(|e| e.distance)
                .unwrap_or(Distance::Unreachable);

            if candidate < current {
                self.entries.insert(
                    dest.clone(),
                    RouteEntry {
                        distance: candidate,
                        next_hop: Some(via.clone()),
                    },
                );
                changed = true;
            }
        }

        changed
    }

    /// Value copy of the current table tagged with its owner, for
    /// neighbors to consume.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            origin: self.owner.clone(),
            entries: self.entries.clone(),
        }
    }

    pub fn route(&self, dest: &NodeId) -> Option<&RouteEntry> {
        self.entries.get(dest)
    }

    /// Entries in destination order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &RouteEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for RoutingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Routing table for {}:", self.owner)?;
        for (dest, entry) in &self.entries {
            let next_hop = entry.next_hop.as_deref().unwrap_or("-");
            writeln!(
                f,
                "  Destination: {}, Distance: {}, Next hop: {}",
                dest, entry.distance, next_hop
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn snapshot_of(origin: &str, entries: &[(&str, Distance, Option<&str>)]) -> TableSnapshot {
        TableSnapshot {
            origin: origin.to_string(),
            entries: entries
                .iter()
                .map(|(dest, distance, hop)| {
                    (
                        dest.to_string(),
                        RouteEntry {
                            distance: *distance,
                            next_hop: hop.map(|h| h.to_string()),
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn distance_orders_finite_below_unreachable() {
        assert!(Distance::Finite(u32::MAX) < Distance::Unreachable);
        assert!(Distance::Finite(2) < Distance::Finite(3));
    }

    #[test]
    fn extend_saturates_to_unreachable() {
        assert_eq!(Distance::Unreachable.extend(1), Distance::Unreachable);
        assert_eq!(Distance::Finite(u32::MAX).extend(1), Distance::Unreachable);
        assert_eq!(Distance::Finite(3).extend(2), Distance::Finite(5));
    }

    #[test]
    fn new_table_excludes_owner_and_starts_unreachable() {
        let all = ids(&["A", "B", "C"]);
        let table = RoutingTable::new("A".to_string(), &all);

        assert_eq!(table.len(), 2);
        assert!(table.route(&"A".to_string()).is_none());
        for (_, entry) in table.iter() {
            assert_eq!(entry.distance, Distance::Unreachable);
            assert_eq!(entry.next_hop, None);
        }
    }

    #[test]
    fn set_direct_overwrites() {
        let all = ids(&["A", "B"]);
        let mut table = RoutingTable::new("A".to_string(), &all);

        table.set_direct("B".to_string(), 4);
        table.set_direct("B".to_string(), 2);

        let entry = table.route(&"B".to_string()).unwrap();
        assert_eq!(entry.distance, Distance::Finite(2));
        assert_eq!(entry.next_hop.as_deref(), Some("B"));
    }

    #[test]
    fn relax_takes_strictly_shorter_route() {
        let all = ids(&["A", "B", "C"]);
        let mut table = RoutingTable::new("A".to_string(), &all);
        table.set_direct("B".to_string(), 1);

        // B advertises C at distance 2; A should reach C at 1 + 2 via B.
        let snap = snapshot_of("B", &[("C", Distance::Finite(2), Some("C"))]);
        assert!(table.relax(&"B".to_string(), 1, &snap));

        let entry = table.route(&"C".to_string()).unwrap();
        assert_eq!(entry.distance, Distance::Finite(3));
        assert_eq!(entry.next_hop.as_deref(), Some("B"));
    }

    #[test]
    fn relax_keeps_incumbent_on_tie() {
        let all = ids(&["A", "B", "C", "D"]);
        let mut table = RoutingTable::new("A".to_string(), &all);
        table.set_direct("B".to_string(), 1);
        table.set_direct("D".to_string(), 1);

        let via_b = snapshot_of("B", &[("C", Distance::Finite(2), Some("C"))]);
        assert!(table.relax(&"B".to_string(), 1, &via_b));

        // Same total cost via D must not displace the route via B.
        let via_d = snapshot_of("D", &[("C", Distance::Finite(2), Some("C"))]);
        assert!(!table.relax(&"D".to_string(), 1, &via_d));
        assert_eq!(
            table.route(&"C".to_string()).unwrap().next_hop.as_deref(),
            Some("B")
        );
    }

    #[test]
    fn relax_is_idempotent() {
        let all = ids(&["A", "B", "C"]);
        let mut table = RoutingTable::new("A".to_string(), &all);
        table.set_direct("B".to_string(), 1);

        let snap = snapshot_of("B", &[("C", Distance::Finite(2), Some("C"))]);
        assert!(table.relax(&"B".to_string(), 1, &snap));
        assert!(!table.relax(&"B".to_string(), 1, &snap));
    }

    #[test]
    fn relax_never_selects_an_unreachable_candidate() {
        let all = ids(&["A", "B", "C"]);
        let mut table = RoutingTable::new("A".to_string(), &all);
        table.set_direct("B".to_string(), 1);

        let snap = snapshot_of("B", &[("C", Distance::Unreachable, None)]);
        assert!(!table.relax(&"B".to_string(), 1, &snap));

        let entry = table.route(&"C".to_string()).unwrap();
        assert_eq!(entry.distance, Distance::Unreachable);
        assert_eq!(entry.next_hop, None);
    }

    #[test]
    fn relax_skips_route_to_self() {
        let all = ids(&["A", "B"]);
        let mut table = RoutingTable::new("A".to_string(), &all);
        table.set_direct("B".to_string(), 5);

        // B advertises a route back to A; A must not record one.
        let snap = snapshot_of("B", &[("A", Distance::Finite(5), Some("A"))]);
        assert!(!table.relax(&"B".to_string(), 5, &snap));
        assert!(table.route(&"A".to_string()).is_none());
    }

    #[test]
    fn display_marks_unreachable_with_infinity() {
        let all = ids(&["A", "B"]);
        let table = RoutingTable::new("A".to_string(), &all);
        let text = table.to_string();
        assert!(text.contains("Destination: B, Distance: ∞, Next hop: -"));
    }
}
