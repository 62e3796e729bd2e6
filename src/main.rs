use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use std::fs;
use std::path::PathBuf;

use routesim::algorithms::dijkstra::calculate_shortest_paths;
use routesim::builder;
use routesim::engine::SimulationEngine;
use routesim::protocol::Distance;
use routesim::render;

/// Distance-vector (Bellman-Ford) routing protocol simulator
#[derive(Parser, Debug)]
#[command(name = "routesim", version, about)]
struct Cli {
    /// Number of nodes in the generated network (1..=26)
    #[arg(default_value_t = 7)]
    nodes: usize,

    /// RNG seed for topology generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write the topology as Graphviz DOT to this path
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Print converged routing tables as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Check converged tables against a global shortest-path computation
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    info!("creating a network with {} nodes", cli.nodes);
    let network = builder::generate(cli.nodes, cli.seed)?;

    let mut engine = SimulationEngine::new(network);
    let rounds = engine.run()?;
    println!("Converged after {} rounds", rounds);

    if cli.json {
        println!("{}", render::tables_json(engine.network())?);
    } else {
        for node in engine.network().nodes() {
            println!("{}", node.table());
        }
    }

    if cli.verify {
        verify(engine.network())?;
        println!("Verification passed: tables match global shortest paths");
    }

    if let Some(path) = cli.dot {
        fs::write(&path, render::to_dot(engine.network()))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote topology to {}", path.display());
    }

    Ok(())
}

/// Compare every converged table entry against an independent Dijkstra
/// run over the same topology.
fn verify(network: &routesim::network::Network) -> Result<()> {
    for source in network.nodes() {
        let oracle = calculate_shortest_paths(network, source.id());
        for (dest, entry) in source.table().iter() {
            match (entry.distance, oracle.get(dest)) {
                (Distance::Finite(d), Some(path)) if path.cost == d => {}
                (Distance::Unreachable, None) => {}
                (recorded, expected) => bail!(
                    "table mismatch {} -> {}: recorded {}, shortest path {:?}",
                    source.id(),
                    dest,
                    recorded,
                    expected.map(|p| p.cost)
                ),
            }
        }
    }
    Ok(())
}
