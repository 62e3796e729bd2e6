//! Output sinks: Graphviz DOT export of the topology and JSON export of
//! the routing tables. Pure formatting over the network's enumerable
//! views, no effect on the simulation.

use std::collections::BTreeMap;

use crate::network::Network;
use crate::protocol::RoutingTable;
use crate::NodeId;

/// Render the topology as an undirected Graphviz graph, edge labels
/// carrying the link weights.
pub fn to_dot(network: &Network) -> String {
    let mut out = String::from("graph network {\n");
    for id in network.node_ids() {
        out.push_str(&format!("    \"{}\";\n", id));
    }
    for link in network.links() {
        out.push_str(&format!(
            "    \"{}\" -- \"{}\" [label=\"{}\"];\n",
            link.from, link.to, link.weight
        ));
    }
    out.push_str("}\n");
    out
}

/// All routing tables as pretty-printed JSON, keyed by node id.
pub fn tables_json(network: &Network) -> serde_json::Result<String> {
    let tables: BTreeMap<&NodeId, &RoutingTable> =
        network.nodes().map(|n| (n.id(), n.table())).collect();
    serde_json::to_string_pretty(&tables)
}
