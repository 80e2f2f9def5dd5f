//! Compute every case file in a directory
//!
//! Writes one summary line per case to a CSV file

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use loss_of_support::assumptions::{loader::DEFAULT_DATA_PATH, Assumptions};
use loss_of_support::case::load_case;
use loss_of_support::{CalculationInput, ScenarioRunner};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Compute every *.json case in a directory")]
struct Args {
    /// Directory of JSON case files
    cases: PathBuf,

    /// Reference data directory
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    /// Summary CSV output
    #[arg(long, default_value = "batch_summary.csv")]
    output: PathBuf,
}

/// One line of the summary
#[derive(Debug, Serialize)]
struct SummaryRow {
    case: String,
    supporter: String,
    supporter_start: String,
    supporter_end: String,
    years: usize,
    total_support: f64,
    social_insurance_deduction: f64,
    training_total: f64,
    total_after_fault: f64,
    error: String,
}

impl SummaryRow {
    fn failed(case: String, error: String) -> Self {
        Self {
            case,
            supporter: String::new(),
            supporter_start: String::new(),
            supporter_end: String::new(),
            years: 0,
            total_support: 0.0,
            social_insurance_deduction: 0.0,
            training_total: 0.0,
            total_after_fault: 0.0,
            error,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let mut paths: Vec<PathBuf> = fs::read_dir(&args.cases)
        .with_context(|| format!("Failed to read {}", args.cases.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    println!("Found {} case files in {}", paths.len(), args.cases.display());

    let runner = ScenarioRunner::from_data_dir(&args.data_dir)
        .with_context(|| format!("Failed to load reference data from {}", args.data_dir.display()))?;

    // Case files that fail to parse are reported, not fatal
    let loaded: Vec<(String, Result<CalculationInput, String>)> = paths
        .par_iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let input = load_case(path)
                .and_then(|case| case.into_input())
                .map_err(|e| e.to_string());
            (name, input)
        })
        .collect();

    let rows: Vec<SummaryRow> = loaded
        .into_par_iter()
        .map(|(name, input)| {
            let input = match input {
                Ok(input) => input,
                Err(e) => {
                    error!("{}: {}", name, e);
                    return SummaryRow::failed(name, e);
                }
            };
            match runner.run(&input) {
                Ok(result) => SummaryRow {
                    case: name,
                    supporter: input.supporter.name.clone(),
                    supporter_start: result.supporter_start.to_string(),
                    supporter_end: result.supporter_end.to_string(),
                    years: result.rows.len(),
                    total_support: result.total_support,
                    social_insurance_deduction: result.social_insurance_deduction,
                    training_total: result.training_total,
                    total_after_fault: result.total_after_fault,
                    error: String::new(),
                },
                Err(e) => {
                    error!("{}: {}", name, e);
                    SummaryRow::failed(name, e.to_string())
                }
            }
        })
        .collect();

    let file = File::create(&args.output).with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let failed = rows.iter().filter(|r| !r.error.is_empty()).count();
    let grand_total: f64 = rows.iter().map(|r| r.total_after_fault).sum();
    info!("Computed {} cases ({} failed) in {:?}", rows.len(), failed, start.elapsed());

    println!("Summary written to {}", args.output.display());
    println!("  Cases:       {}", rows.len());
    println!("  Failed:      {}", failed);
    println!("  Grand total: {:.2}", grand_total);
    println!("  Time:        {:?}", start.elapsed());

    Ok(())
}
