// src/main.rs
use std::path::PathBuf;
use anyhow::{Result, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agile_montecarlo::analysis::summary::SENSITIVITY_THRESHOLD;
use agile_montecarlo::file::{export_to_path, ConfigFileHandler, FileHandler, RunArchive};
use agile_montecarlo::{Configuration, ExecutionMode, ProjectInputs, SimulationRunner, SummaryReport};

#[derive(Parser, Debug)]
#[command(name = "agile-montecarlo")]
#[command(about = "Monte Carlo cost, schedule and profit estimate for an agile project", long_about = None)]
struct Args {
    /// Project inputs in RON format (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of trials
    #[arg(short, long)]
    trials: Option<usize>,

    /// Override the reproducibility seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run trials on a single thread
    #[arg(long)]
    sequential: bool,

    /// Write the results table as CSV
    #[arg(long)]
    export: Option<PathBuf>,

    /// Archive the run under DIR/runs/<run id>
    #[arg(long, value_name = "DIR")]
    archive: Option<PathBuf>,

    /// Write the default inputs to FILE and exit
    #[arg(long, value_name = "FILE")]
    write_default: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let handler = ConfigFileHandler::new();

    if let Some(path) = &args.write_default {
        handler.save(&ProjectInputs::default(), path)?;
        info!(path = %path.display(), "default inputs written");
        return Ok(());
    }

    let mut inputs = match &args.config {
        Some(path) => handler.load(path)?,
        None => ProjectInputs::default(),
    };
    if let Some(trials) = args.trials {
        inputs.trials = trials;
    }
    if let Some(seed) = args.seed {
        inputs.seed = seed;
    }

    let config = Configuration::from_inputs(&inputs).context("Invalid project configuration")?;
    let estimate = config.nominal_estimate();
    info!(
        sprints = estimate.sprints,
        months = estimate.months,
        "nominal estimate at base velocity"
    );

    let mode = if args.sequential {
        ExecutionMode::Sequential
    } else {
        ExecutionMode::Parallel
    };
    let result = SimulationRunner::new(config)?.with_mode(mode).run()?;
    let summary = result.summary();

    print_summary(&summary);

    if let Some(path) = &args.export {
        export_to_path(result.trials(), path)?;
        info!(path = %path.display(), "results exported");
    }

    if let Some(dir) = &args.archive {
        RunArchive::new(dir).save_run(&inputs, &result, &summary)?;
    }

    Ok(())
}

fn print_summary(summary: &SummaryReport) {
    println!("Agile Monte Carlo Simulator ({} trials)", summary.trial_count);
    println!();
    println!("  Median scope:        {:.0} SP", summary.median_scope);
    println!("  Median duration:     {:.1} mo", summary.duration_months.median);
    println!("  Median TCO (total):  ${}", format_currency(summary.tco_total.median));
    println!("  Median margin:       {:.1}%", summary.median_profit_margin);
    println!();
    println!("  P80 TCO (total):     ${}", format_currency(summary.tco_total.p80));
    println!("  Chance of profit:    {:.1}%", summary.probability_of_profit * 100.0);
    println!("  P90 duration:        {:.1} months", summary.duration_months.p90);
    println!();
    println!("Top cost drivers (|r| > {}):", SENSITIVITY_THRESHOLD);
    for entry in &summary.sensitivity {
        println!("  {:<24} {:>6.3}", entry.driver.label(), entry.correlation);
    }

    if !summary.highest_impact_risks.is_empty() {
        let names: Vec<&str> = summary.highest_impact_risks.iter().map(|r| r.label()).collect();
        println!();
        println!("Highest impact risks: {}", names.join(", "));
    }
}

/// Whole-unit amount with thousands separators.
fn format_currency(amount: f64) -> String {
    let rounded = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, c) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0.0 && rounded != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
