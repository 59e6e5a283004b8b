use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

use matchgraph::dijkstra::{dijkstra, graph_from_edges, Graph};
use matchgraph::io;

#[derive(Parser, Debug)]
#[command(name = "route")]
#[command(about = "Build a graph from a CSV with u,v,weight per row (as written by matchgraph --mst-out) and run Dijkstra from a source node id.", long_about = None)]
struct Cli {
    /// Path to the .csv file
    #[arg(short, long)]
    csv: PathBuf,

    /// Source node id
    #[arg(short, long)]
    source: String,

    /// Print the path to this node instead of every distance
    #[arg(short, long)]
    target: Option<String>,

    /// Treat every row as an undirected edge
    #[arg(long, default_value_t = false)]
    undirected: bool,
}

fn parse_csv_and_build_graph(path: &Path, directed: bool) -> Result<Graph> {
    let edges = io::read_edges(path)?;
    Ok(graph_from_edges(&edges, directed))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let graph = parse_csv_and_build_graph(&cli.csv, !cli.undirected)?;
    log::info!("Graph: {} nodes with outgoing edges", graph.len());

    let now = Instant::now();
    let paths = dijkstra(&graph, &cli.source);
    log::info!("Dijkstra took {} s", now.elapsed().as_secs_f64());

    if let Some(target) = &cli.target {
        match paths.path_to(target) {
            Some(path) => {
                println!("{}", path.join(" -> "));
                println!("Distance: {:.6}", paths.distance(target));
            }
            None => println!("{} is unreachable from {}", target, cli.source),
        }
        return Ok(());
    }

    let mut dist_with_id: Vec<(&String, &f64)> = paths.distances.iter().collect();
    dist_with_id.sort_by(|a, b| a.1.total_cmp(b.1).then_with(|| a.0.cmp(b.0)));
    for (id, d) in &dist_with_id {
        let val = if d.is_finite() {
            format!("{:.6}", d)
        } else {
            String::from("inf")
        };
        println!("{},{}", id, val);
    }
    let reachable = dist_with_id.iter().filter(|(_, d)| d.is_finite()).count();
    println!("Reachable from {}: {} of {}", cli.source, reachable, dist_with_id.len());

    Ok(())
}
