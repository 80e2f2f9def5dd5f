//! Loss of Support CLI
//!
//! Computes one case file and prints the summary; optionally writes the
//! yearly breakdown as CSV or the full result as JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use loss_of_support::assumptions::{loader::DEFAULT_DATA_PATH, Assumptions, LifeTableKind};
use loss_of_support::case::{load_case, load_dependents};
use loss_of_support::report::{person_summaries, write_yearly_csv, Phase, SupporterPhases};
use loss_of_support::SupportEngine;

#[derive(Debug, Parser)]
#[command(name = "loss_of_support", version, about = "Compute loss-of-support compensation for a case file")]
struct Args {
    /// JSON case file
    case: PathBuf,

    /// CSV roster of additional dependents
    #[arg(long)]
    dependents: Option<PathBuf>,

    /// Reference data directory (life_tables/, min_wage.csv)
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    /// Write the yearly breakdown to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the full result as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,
}

fn print_phase(label: &str, phase: &Phase) {
    match &phase.window {
        Some(window) => println!(
            "  {:<16} {} - {}  {:>6} days  ({}y {}m {}d)",
            label, window.start, window.end, phase.days, phase.years, phase.months, phase.day_part
        ),
        None => println!("  {:<16} -", label),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut case = load_case(&args.case).with_context(|| format!("Failed to load case {}", args.case.display()))?;
    if let Some(path) = &args.dependents {
        let roster = load_dependents(path).with_context(|| format!("Failed to load roster {}", path.display()))?;
        case = case.with_dependents(roster);
    }
    let input = case.into_input().context("Invalid case")?;

    let assumptions = Assumptions::from_data_dir(&args.data_dir)
        .with_context(|| format!("Failed to load reference data from {}", args.data_dir.display()))?;
    assumptions
        .life_tables
        .initialize(&[LifeTableKind::Trh2010, LifeTableKind::Pmf1931]);

    let engine = SupportEngine::new(assumptions);
    let result = engine.compute(&input).context("Calculation failed")?;

    println!("Supporter: {} (born {})", input.supporter.name, input.supporter.birth);
    println!("Incident {}, valuation {}", input.incident_date, input.valuation_date);
    println!();

    let phases = SupporterPhases::new(&input, &result);
    println!("Support window:");
    print_phase("total", &phases.total);
    print_phase("past", &phases.past);
    print_phase("future active", &phases.future_active);
    print_phase("future passive", &phases.future_passive);
    println!();

    println!("Per person:");
    for summary in person_summaries(&input, &result) {
        println!("  {:<24} {:>16.2}  {:>6} days", summary.label, summary.amount, summary.days);
    }
    println!();

    println!("Total support:                  {:>16.2}", result.total_support);
    if result.training_total > 0.0 {
        println!("Child-rearing cost:             {:>16.2}", result.training_total);
    }
    println!("Social-insurance capital value: {:>16.2}", result.social_insurance_deduction);
    println!("After social insurance:         {:>16.2}", result.total_after_social_insurance);
    println!("After fault ({:>5.1}%):          {:>16.2}", input.params.fault_rate, result.total_after_fault);

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_yearly_csv(BufWriter::new(file), &result).context("Failed to write yearly CSV")?;
        println!("\nYearly breakdown written to {}", path.display());
    }

    if let Some(path) = &args.json {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &result).context("Failed to write JSON result")?;
        println!("Result written to {}", path.display());
    }

    Ok(())
}
