//! Batch loan quotes from CSV
//!
//! Each scenario row is validated and amortized independently, so the batch is
//! evaluated in parallel. Rows that fail validation are reported, not fatal.

use super::{round_cents, LoanParameters};
use crate::error::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// One input row: `id,principal,annual_rate,term_months,extra_payment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanScenario {
    pub id: String,
    pub principal: f64,
    pub annual_rate: f64,
    pub term_months: u32,
    #[serde(default)]
    pub extra_payment: f64,
}

impl LoanScenario {
    pub fn parameters(&self) -> LoanParameters {
        LoanParameters::new(self.principal, self.annual_rate, self.term_months)
            .with_extra_payment(self.extra_payment)
    }
}

/// One output row, amounts rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_paid: f64,
    pub months: u32,
    pub extra_total_interest: f64,
    pub months_with_extra: u32,
    pub interest_saved: f64,
    pub months_saved: u32,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub summaries: Vec<ScenarioSummary>,
    /// (scenario id, validation message)
    pub rejected: Vec<(String, String)>,
}

/// Load scenarios from a CSV file with a header row
pub fn load_scenarios(path: impl AsRef<Path>) -> Result<Vec<LoanScenario>> {
    let file = File::open(path.as_ref())?;
    load_scenarios_from_reader(file)
}

pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<LoanScenario>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut scenarios = Vec::new();
    for record in rdr.deserialize() {
        scenarios.push(record?);
    }
    Ok(scenarios)
}

/// Quote every scenario in parallel, preserving input order
pub fn run_scenarios(scenarios: &[LoanScenario]) -> BatchReport {
    let outcomes: Vec<std::result::Result<ScenarioSummary, (String, String)>> = scenarios
        .par_iter()
        .map(|scenario| {
            let params = scenario.parameters();
            params
                .validate()
                .map_err(|e| (scenario.id.clone(), e.to_string()))?;
            let cmp = params.compare();
            Ok(ScenarioSummary {
                id: scenario.id.clone(),
                monthly_payment: round_cents(cmp.monthly_payment),
                total_interest: round_cents(cmp.total_interest),
                total_paid: round_cents(cmp.total_paid),
                months: cmp.schedule.len() as u32,
                extra_total_interest: round_cents(cmp.extra_total_interest),
                months_with_extra: cmp.months_to_payoff_with_extra,
                interest_saved: round_cents(cmp.interest_saved),
                months_saved: cmp.months_saved,
            })
        })
        .collect();

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(summary) => report.summaries.push(summary),
            Err((id, reason)) => {
                log::warn!("Skipping scenario {}: {}", id, reason);
                report.rejected.push((id, reason));
            }
        }
    }
    report
}

/// Write summaries as CSV with a header row
pub fn write_summaries<W: Write>(writer: W, summaries: &[ScenarioSummary]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for summary in summaries {
        wtr.serialize(summary)?;
    }
    wtr.flush()?;
    Ok(())
}
