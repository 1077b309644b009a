//! Amino Acid Analysis Example
//!
//! Runs the reference analysis (seed 42, 1000 observations, 80/20 split)
//! and prints the summary table, rankings, and per-outcome model scores.
//!
//! Run with: cargo run --example amino_analysis
//! JSON report: cargo run --example amino_analysis -- --json
//! Custom config: cargo run --example amino_analysis -- --config run.json

use amino_stats::{Analysis, AnalysisConfig, Outcome};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");

    let config = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args.get(i + 1).context("--config needs a path")?;
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            AnalysisConfig::from_json(&text)?
        }
        None => AnalysisConfig::default(),
    };

    let run = Analysis::new(config)?.run()?;
    let report = run.report()?;

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("=== Amino Acid Effects ===\n");
    print!("{report}");

    // Box-plot view of one outcome
    println!("\nHypertrophy distribution (min / q1 / median / q3 / max):");
    for dist in run.distributions(Outcome::Hypertrophy) {
        let s = dist.stats;
        println!(
            "  {:<15} {:>6.2} {:>6.2} {:>6.2} {:>6.2} {:>6.2}",
            dist.amino_acid.name(),
            s.min,
            s.q1,
            s.median,
            s.q3,
            s.max
        );
    }

    Ok(())
}
