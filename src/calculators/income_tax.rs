//! Progressive income tax over bracket tables
//!
//! The built-in tables are illustrative sample brackets, not tax law. Real
//! tables can be loaded from CSV with `filing_status,min,max,rate` columns
//! (empty `max` for the open top bracket).

use crate::error::{ensure_non_negative, Result, ToolsError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingStatus {
    Single,
    Married,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: f64,
    /// None for the top bracket
    pub max: Option<f64>,
    /// Marginal rate in percent
    pub rate: f64,
}

impl TaxBracket {
    const fn new(min: f64, max: Option<f64>, rate: f64) -> Self {
        Self { min, max, rate }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketAmount {
    pub bracket: TaxBracket,
    pub income_in_bracket: f64,
    pub tax_in_bracket: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    pub total_tax: f64,
    /// Total tax over income, in percent
    pub effective_rate: f64,
    pub bracket_breakdown: Vec<BracketAmount>,
}

/// Bracket tables per filing status
#[derive(Debug, Clone, PartialEq)]
pub struct TaxTable {
    single: Vec<TaxBracket>,
    married: Vec<TaxBracket>,
}

impl Default for TaxTable {
    fn default() -> Self {
        Self {
            single: vec![
                TaxBracket::new(0.0, Some(10_000.0), 10.0),
                TaxBracket::new(10_001.0, Some(40_000.0), 12.0),
                TaxBracket::new(40_001.0, Some(85_000.0), 22.0),
                TaxBracket::new(85_001.0, Some(160_000.0), 24.0),
                TaxBracket::new(160_001.0, None, 32.0),
            ],
            married: vec![
                TaxBracket::new(0.0, Some(20_000.0), 10.0),
                TaxBracket::new(20_001.0, Some(80_000.0), 12.0),
                TaxBracket::new(80_001.0, Some(170_000.0), 22.0),
                TaxBracket::new(170_001.0, Some(320_000.0), 24.0),
                TaxBracket::new(320_001.0, None, 32.0),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct BracketRecord {
    filing_status: FilingStatus,
    min: f64,
    max: Option<f64>,
    rate: f64,
}

impl TaxTable {
    pub fn brackets(&self, status: FilingStatus) -> &[TaxBracket] {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::Married => &self.married,
        }
    }

    pub fn from_csv_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// Both filing statuses must be present; brackets are sorted by `min`
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut single = Vec::new();
        let mut married = Vec::new();
        for record in rdr.deserialize() {
            let row: BracketRecord = record?;
            let bracket = TaxBracket::new(row.min, row.max, row.rate);
            match row.filing_status {
                FilingStatus::Single => single.push(bracket),
                FilingStatus::Married => married.push(bracket),
            }
        }

        if single.is_empty() || married.is_empty() {
            return Err(ToolsError::invalid(
                "tax_table",
                "Tax table needs brackets for both single and married filers",
            ));
        }
        single.sort_by(|a, b| a.min.total_cmp(&b.min));
        married.sort_by(|a, b| a.min.total_cmp(&b.min));

        Ok(Self { single, married })
    }

    pub fn calculate(&self, annual_income: f64, status: FilingStatus) -> IncomeTaxResult {
        calculate_with_brackets(annual_income, self.brackets(status))
    }
}

pub fn validate_income(annual_income: f64) -> Result<()> {
    ensure_non_negative("annual_income", annual_income, "Annual income cannot be negative")
}

/// Tax under the built-in sample tables
pub fn calculate_income_tax(annual_income: f64, status: FilingStatus) -> IncomeTaxResult {
    TaxTable::default().calculate(annual_income, status)
}

fn calculate_with_brackets(annual_income: f64, brackets: &[TaxBracket]) -> IncomeTaxResult {
    if annual_income <= 0.0 {
        return IncomeTaxResult {
            total_tax: 0.0,
            effective_rate: 0.0,
            bracket_breakdown: Vec::new(),
        };
    }

    let mut breakdown = Vec::new();
    let mut total_tax = 0.0;

    for bracket in brackets {
        if annual_income <= bracket.min {
            continue;
        }
        let top = bracket.max.map_or(annual_income, |max| max.min(annual_income));
        let income_in_bracket = top - bracket.min;
        if income_in_bracket > 0.0 {
            let tax_in_bracket = income_in_bracket * bracket.rate / 100.0;
            total_tax += tax_in_bracket;
            breakdown.push(BracketAmount {
                bracket: *bracket,
                income_in_bracket,
                tax_in_bracket,
            });
        }
    }

    let effective_rate = total_tax / annual_income * 100.0;

    IncomeTaxResult {
        total_tax: (total_tax * 100.0).round() / 100.0,
        effective_rate: (effective_rate * 100.0).round() / 100.0,
        bracket_breakdown: breakdown,
    }
}
