//! Workforce Allocation
//!
//! Loads a worker registry, evolves allocations on a background thread and
//! prints the Pareto fronts of the final population.
//!
//! ```text
//! cargo run --example allocate -- workers.txt [config.json]
//! ```
//!
//! The registry file holds the worker count on its first line followed by
//! one `cost,error` line per worker. Set `RUST_LOG=workforce_evo=debug` to
//! see per-generation progress.

use std::env;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workforce_evo::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "workforce_evo=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Workforce Allocation ===\n");

    let mut args = env::args().skip(1);
    let registry_path = args
        .next()
        .ok_or("usage: allocate <workers-file> [config.json]")?;
    let registry = WorkerRegistry::from_path(&registry_path)?;

    let config = match args.next() {
        Some(path) => OptimizerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => OptimizerConfig::default(),
    };

    println!("Workers: {}", registry.len());
    println!("Variant: {:?}", config.variant);
    println!("Population: {}", config.population_size);
    println!("Generations: {}\n", config.generations);

    let report_every = (config.generations / 10).max(1);
    let handle = Optimizer::new(config, registry)?.spawn();

    for event in handle.events() {
        match event {
            RunEvent::Generation(snapshot) if snapshot.generation % report_every == 0 => {
                let stats = &snapshot.stats;
                println!(
                    "Gen {:4}: min cost = {:.2}, min error = {:.2}, front 0 = {}, drift = {}",
                    snapshot.generation,
                    stats.min_cost,
                    stats.min_error,
                    stats.pareto_size,
                    stats.budget_drift
                );
            }
            RunEvent::Generation(_) => {}
            RunEvent::Completed(result) => {
                println!("\n=== Results ===\n");
                print!("{result}");
            }
        }
    }

    let result = handle.join()?;
    println!(
        "{} fronts, {} on the Pareto front, {:.1} ms",
        result.fronts.len(),
        result.pareto_front().map_or(0, Front::len),
        result.stats.total_runtime_ms
    );

    Ok(())
}
