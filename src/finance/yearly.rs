//! Annual roll-up of an amortization schedule

use super::schedule::AmortizationRow;
use super::MONTHS_PER_YEAR;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    /// Schedule year, 1-based
    pub year: u32,
    pub total_principal: f64,
    pub total_interest: f64,
    /// Balance after the last period of the year
    pub ending_balance: f64,
}

/// Group rows into consecutive 12-period years
///
/// The last year may hold fewer than 12 rows when the schedule ends early.
pub fn summarize_by_year(rows: &[AmortizationRow]) -> Vec<YearlySummary> {
    rows.chunks(MONTHS_PER_YEAR as usize)
        .enumerate()
        .map(|(idx, chunk)| YearlySummary {
            year: idx as u32 + 1,
            total_principal: chunk.iter().map(|r| r.principal).sum(),
            total_interest: chunk.iter().map(|r| r.interest).sum(),
            ending_balance: chunk.last().map(|r| r.remaining_balance).unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::{total_interest, total_principal, LoanParameters};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_year_count_and_keys() {
        let rows = LoanParameters::new(50_000.0, 7.0, 60).schedule();
        let years = summarize_by_year(&rows);

        assert_eq!(years.len(), 5);
        assert!(years.iter().enumerate().all(|(i, y)| y.year == i as u32 + 1));
        assert_eq!(years[0].ending_balance, rows[11].remaining_balance);
    }

    #[test]
    fn test_totals_match_schedule() {
        let rows = LoanParameters::new(180_000.0, 4.25, 240).schedule();
        let years = summarize_by_year(&rows);

        let principal: f64 = years.iter().map(|y| y.total_principal).sum();
        let interest: f64 = years.iter().map(|y| y.total_interest).sum();
        assert_abs_diff_eq!(principal, total_principal(&rows), epsilon = 1e-6);
        assert_abs_diff_eq!(interest, total_interest(&rows), epsilon = 1e-6);
    }

    #[test]
    fn test_partial_final_year() {
        let loan = LoanParameters::new(20_000.0, 5.0, 120).with_extra_payment(500.0);
        let rows = loan.extra_payment_schedule();
        let years = summarize_by_year(&rows);

        assert_eq!(years.len(), (rows.len() + 11) / 12);
        assert!(years.last().unwrap().ending_balance <= 0.01);
    }

    #[test]
    fn test_empty_schedule() {
        assert!(summarize_by_year(&[]).is_empty());
    }
}
