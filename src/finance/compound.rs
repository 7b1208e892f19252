//! Compound growth with monthly contributions
//!
//! Contributions are quoted per month and converted to the compounding cadence.
//! Daily compounding injects a contribution every 30 days, an approximation kept
//! so that results stay comparable with previously published figures.

use super::round_cents;
use crate::error::{ensure_non_negative, ensure_range, Result, ToolsError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingFrequency {
    Yearly,
    Quarterly,
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            Self::Yearly => 1,
            Self::Quarterly => 4,
            Self::Monthly => 12,
            Self::Daily => 365,
        }
    }

    /// Periods between two contributions
    pub fn contribution_stride(self) -> u32 {
        match self {
            Self::Yearly => 12,
            Self::Quarterly => 3,
            Self::Monthly => 1,
            Self::Daily => 30,
        }
    }
}

impl std::str::FromStr for CompoundingFrequency {
    type Err = ToolsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yearly" | "annually" => Ok(Self::Yearly),
            "quarterly" => Ok(Self::Quarterly),
            "monthly" => Ok(Self::Monthly),
            "daily" => Ok(Self::Daily),
            other => Err(ToolsError::invalid(
                "compounding_frequency",
                format!("Unknown compounding frequency '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompoundGrowthParameters {
    pub principal: f64,
    pub monthly_contribution: f64,
    /// Annual rate in percent
    pub annual_rate: f64,
    pub years: u32,
    pub compounding_frequency: CompoundingFrequency,
}

impl CompoundGrowthParameters {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("principal", self.principal, "Principal cannot be negative")?;
        ensure_non_negative(
            "monthly_contribution",
            self.monthly_contribution,
            "Monthly contribution cannot be negative",
        )?;
        ensure_range("annual_rate", self.annual_rate, 0.0, 100.0, "Interest rate must be between 0 and 100%")?;
        if self.years == 0 || self.years > 100 {
            return Err(ToolsError::invalid("years", "Years must be between 1 and 100"));
        }
        Ok(())
    }
}

/// Growth over one horizon year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyBreakdown {
    pub year: u32,
    pub starting_balance: f64,
    pub contributions: f64,
    pub interest: f64,
    pub ending_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundGrowthResult {
    pub final_balance: f64,
    /// Includes the initial principal
    pub total_contributions: f64,
    pub total_interest: f64,
    pub yearly_breakdown: Vec<YearlyBreakdown>,
}

/// Run the compounding loop
///
/// Totals are rounded to cents after the loop; the yearly breakdown carries
/// unrounded balances.
pub fn compound_growth(params: &CompoundGrowthParameters) -> CompoundGrowthResult {
    let periods_per_year = params.compounding_frequency.periods_per_year();
    let stride = params.compounding_frequency.contribution_stride();
    let periodic_rate = params.annual_rate / 100.0 / periods_per_year as f64;
    let total_periods = params.years * periods_per_year;
    let contribution = params.monthly_contribution * (12.0 / periods_per_year as f64);

    let mut balance = params.principal;
    let mut total_contributions = params.principal;
    let mut total_interest = 0.0;

    let mut breakdown = Vec::with_capacity(params.years as usize);
    let mut year_start = balance;
    let mut year_contributions = 0.0;
    let mut year_interest = 0.0;

    for period in 1..=total_periods {
        if (period - 1) % stride == 0 {
            balance += contribution;
            total_contributions += contribution;
            year_contributions += contribution;
        }

        let interest = balance * periodic_rate;
        balance += interest;
        total_interest += interest;
        year_interest += interest;

        if period % periods_per_year == 0 || period == total_periods {
            breakdown.push(YearlyBreakdown {
                year: period.div_ceil(periods_per_year),
                starting_balance: year_start,
                contributions: year_contributions,
                interest: year_interest,
                ending_balance: balance,
            });
            year_start = balance;
            year_contributions = 0.0;
            year_interest = 0.0;
        }
    }

    log::debug!(
        "Compounded {} periods ({:?}): balance {:.2}, interest {:.2}",
        total_periods, params.compounding_frequency, balance, total_interest
    );

    CompoundGrowthResult {
        final_balance: round_cents(balance),
        total_contributions: round_cents(total_contributions),
        total_interest: round_cents(total_interest),
        yearly_breakdown: breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn params(principal: f64, monthly: f64, rate: f64, years: u32, freq: CompoundingFrequency) -> CompoundGrowthParameters {
        CompoundGrowthParameters {
            principal,
            monthly_contribution: monthly,
            annual_rate: rate,
            years,
            compounding_frequency: freq,
        }
    }

    #[test]
    fn test_nothing_in_nothing_out() {
        for freq in [
            CompoundingFrequency::Yearly,
            CompoundingFrequency::Quarterly,
            CompoundingFrequency::Monthly,
            CompoundingFrequency::Daily,
        ] {
            let result = compound_growth(&params(0.0, 0.0, 12.0, 25, freq));
            assert_eq!(result.final_balance, 0.0);
            assert_eq!(result.total_interest, 0.0);
        }
    }

    #[test]
    fn test_lump_sum_yearly() {
        // 10,000 at 5% for 10 years: 10,000 * 1.05^10
        let result = compound_growth(&params(10_000.0, 0.0, 5.0, 10, CompoundingFrequency::Yearly));
        assert_abs_diff_eq!(result.final_balance, 16_288.95, epsilon = 0.01);
        assert_abs_diff_eq!(result.total_interest, 6_288.95, epsilon = 0.01);
        assert_eq!(result.total_contributions, 10_000.0);
        assert_eq!(result.yearly_breakdown.len(), 10);
    }

    #[test]
    fn test_monthly_contributions_at_zero_rate() {
        let result = compound_growth(&params(1_000.0, 100.0, 0.0, 2, CompoundingFrequency::Monthly));
        assert_eq!(result.final_balance, 3_400.0);
        assert_eq!(result.total_contributions, 3_400.0);
        assert_eq!(result.total_interest, 0.0);
    }

    #[test]
    fn test_yearly_frequency_contributes_a_year_at_once() {
        // One period per year; 12 monthly contributions land at the start of it
        let result = compound_growth(&params(0.0, 100.0, 10.0, 1, CompoundingFrequency::Yearly));
        assert_abs_diff_eq!(result.final_balance, 1_320.0, epsilon = 0.01);
    }

    #[test]
    fn test_daily_stride_approximation() {
        // 365 daily periods, contributions on days 1, 31, ..., 361: 13 injections
        let result = compound_growth(&params(0.0, 100.0, 0.0, 1, CompoundingFrequency::Daily));
        let per_injection = 100.0 * 12.0 / 365.0;
        assert_abs_diff_eq!(result.total_contributions, round_cents(13.0 * per_injection), epsilon = 1e-9);
    }

    #[test]
    fn test_breakdown_chains_years() {
        let result = compound_growth(&params(5_000.0, 200.0, 6.0, 5, CompoundingFrequency::Quarterly));
        let rows = &result.yearly_breakdown;

        assert_eq!(rows.len(), 5);
        for pair in rows.windows(2) {
            assert_eq!(pair[1].starting_balance, pair[0].ending_balance);
        }
        for row in rows {
            assert_abs_diff_eq!(
                row.starting_balance + row.contributions + row.interest,
                row.ending_balance,
                epsilon = 1e-6
            );
        }
        assert_abs_diff_eq!(rows[4].ending_balance, result.final_balance, epsilon = 0.005);
    }

    #[test]
    fn test_frequency_parsing_and_validation() {
        assert_eq!("Monthly".parse::<CompoundingFrequency>().unwrap(), CompoundingFrequency::Monthly);
        assert!("weekly".parse::<CompoundingFrequency>().is_err());

        assert!(params(1.0, 0.0, 5.0, 0, CompoundingFrequency::Monthly).validate().is_err());
        assert!(params(1.0, 0.0, 101.0, 5, CompoundingFrequency::Monthly).validate().is_err());
        assert!(params(1.0, -1.0, 5.0, 5, CompoundingFrequency::Monthly).validate().is_err());
        assert!(params(1.0, 0.0, 5.0, 5, CompoundingFrequency::Monthly).validate().is_ok());
    }
}
