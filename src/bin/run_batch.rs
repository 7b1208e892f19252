//! Quote a block of loan scenarios from CSV
//!
//! Usage: run_batch [scenarios.csv] [output.csv]
//! Defaults to loan_scenarios.csv and loan_batch_output.csv.

use smart_tools::finance::batch::{load_scenarios, run_scenarios, write_summaries};
use std::fs::File;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input_path = args.next().unwrap_or_else(|| "loan_scenarios.csv".to_string());
    let output_path = args.next().unwrap_or_else(|| "loan_batch_output.csv".to_string());

    let start = Instant::now();
    println!("Loading scenarios from {}...", input_path);
    let scenarios = load_scenarios(&input_path)?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let run_start = Instant::now();
    let report = run_scenarios(&scenarios);
    println!("Quoted {} scenarios in {:?}", report.summaries.len(), run_start.elapsed());

    write_summaries(File::create(&output_path)?, &report.summaries)?;
    println!("Output written to {}", output_path);

    if !report.rejected.is_empty() {
        println!("\nRejected {} scenarios:", report.rejected.len());
        for (id, reason) in &report.rejected {
            println!("  {}: {}", id, reason);
        }
    }

    let total_interest: f64 = report.summaries.iter().map(|s| s.total_interest).sum();
    let total_saved: f64 = report.summaries.iter().map(|s| s.interest_saved).sum();
    println!("\nBlock Summary:");
    println!("  Total interest:        ${:.2}", total_interest);
    println!("  Interest saved (extra): ${:.2}", total_saved);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
