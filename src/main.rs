use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use matchgraph::cost_matrix::{CostOptions, Node};
use matchgraph::generate::{generate_nodes, Area};
use matchgraph::geo::Metric;
use matchgraph::io;
use matchgraph::report::MatchingReport;

#[derive(Parser, Debug)]
#[command(name = "matchgraph")]
#[command(about = "Match drivers to passengers optimally, compare against naive in-order pairing, and build an MST over every node.", long_about = None)]
struct Cli {
    /// CSV of drivers (id,lat,lng)
    #[arg(short, long)]
    drivers: Option<PathBuf>,

    /// CSV of passengers (id,lat,lng)
    #[arg(short, long)]
    passengers: Option<PathBuf>,

    /// Generate this many random drivers instead of reading a CSV
    #[arg(long)]
    random_drivers: Option<usize>,

    /// Generate this many random passengers instead of reading a CSV
    #[arg(long)]
    random_passengers: Option<usize>,

    /// Seed for random generation
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = Area::default().center_lat)]
    center_lat: f64,

    #[arg(long, default_value_t = Area::default().center_lng)]
    center_lng: f64,

    /// Half-width of the random box, in degrees
    #[arg(long, default_value_t = Area::default().spread)]
    spread: f64,

    /// Distance metric: euclidean or haversine
    #[arg(short, long, default_value_t = Metric::Euclidean)]
    metric: Metric,

    /// Cost per unit of distance
    #[arg(long, default_value_t = 2.0)]
    cost_per_unit: f64,

    /// Output CSV for the optimal assignment (source_id,target_id,cost)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Output CSV for the MST edges (u,v,weight)
    #[arg(long)]
    mst_out: Option<PathBuf>,
}

fn load(
    role: &str,
    prefix: &str,
    path: &Option<PathBuf>,
    random: Option<usize>,
    area: &Area,
    rng: &mut StdRng,
) -> Result<Vec<Node>> {
    match (path, random) {
        (Some(path), None) => io::read_nodes(path),
        (None, Some(count)) => Ok(generate_nodes(prefix, count, area, rng)),
        (Some(_), Some(_)) => bail!("give either a CSV or a random count for {}, not both", role),
        (None, None) => bail!("no {} given: pass a CSV or a random count", role),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    if !(cli.cost_per_unit > 0.0) {
        bail!("--cost-per-unit must be positive, got {}", cli.cost_per_unit);
    }

    let area = Area {
        center_lat: cli.center_lat,
        center_lng: cli.center_lng,
        spread: cli.spread,
    };
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let drivers = load("drivers", "D", &cli.drivers, cli.random_drivers, &area, &mut rng)?;
    let passengers = load("passengers", "P", &cli.passengers, cli.random_passengers, &area, &mut rng)?;
    info!("Loaded {} drivers and {} passengers", drivers.len(), passengers.len());

    let options = CostOptions {
        metric: cli.metric,
        cost_per_unit_distance: cli.cost_per_unit,
    };

    let now = Instant::now();
    let report = MatchingReport::compute(&drivers, &passengers, &options);
    info!("Solved in {} s", now.elapsed().as_secs_f64());

    println!("Metric: {}, cost per unit: {}", options.metric, options.cost_per_unit_distance);
    println!("Matched pairs: {}", report.assignments.len());
    println!("Naive total cost: {:.4}", report.naive_total);
    println!("Optimal total cost: {:.4}", report.optimal_total);
    println!(
        "Savings: {:.4} ({:.2}%)",
        report.savings(),
        report.savings_percent()
    );
    println!(
        "MST: {} edges, total weight {:.4}",
        report.mst.edges.len(),
        report.mst.total_weight
    );

    if let Some(out_path) = &cli.out {
        io::write_pairs(out_path, &report.assignments)?;
        println!("Wrote {} pairs to {}", report.assignments.len(), out_path.display());
    } else {
        for pair in &report.assignments {
            println!("  {} -> {}: {:.4}", pair.source_id, pair.target_id, pair.cost);
        }
    }

    if let Some(mst_path) = &cli.mst_out {
        io::write_edges(mst_path, &report.mst.edges)?;
        println!("Wrote {} MST edges to {}", report.mst.edges.len(), mst_path.display());
    }

    Ok(())
}
