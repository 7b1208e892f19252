//! Month-by-month amortization schedules

use super::payment::{monthly_payment, monthly_rate};
use super::yearly::{summarize_by_year, YearlySummary};
use super::{MAX_TERM_MONTHS, MONTHS_PER_YEAR, PAYOFF_EPSILON};
use crate::error::{ensure_non_negative, ensure_range, Result, ToolsError};
use serde::{Deserialize, Serialize};

/// Upper bound on accepted annual rates (percent)
pub const MAX_ANNUAL_RATE_PCT: f64 = 100.0;

/// Loan terms for a single calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount financed
    pub principal: f64,
    /// Annual nominal rate in percent (5.0 = 5%)
    pub annual_rate: f64,
    pub term_months: u32,
    /// Fixed extra principal paid every period on top of the level payment
    #[serde(default)]
    pub extra_payment: f64,
}

impl LoanParameters {
    pub fn new(principal: f64, annual_rate: f64, term_months: u32) -> Self {
        Self { principal, annual_rate, term_months, extra_payment: 0.0 }
    }

    pub fn with_extra_payment(mut self, extra_payment: f64) -> Self {
        self.extra_payment = extra_payment;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("principal", self.principal, "Principal cannot be negative")?;
        ensure_range(
            "annual_rate",
            self.annual_rate,
            0.0,
            MAX_ANNUAL_RATE_PCT,
            "Interest rate must be between 0 and 100%",
        )?;
        if self.term_months == 0 {
            return Err(ToolsError::invalid("term_months", "Loan term must be greater than 0"));
        }
        if self.term_months > MAX_TERM_MONTHS {
            return Err(ToolsError::invalid("term_months", "Loan term cannot exceed 1200 months"));
        }
        ensure_non_negative("extra_payment", self.extra_payment, "Extra payment cannot be negative")
    }

    /// Level monthly principal and interest payment
    pub fn payment(&self) -> f64 {
        monthly_payment(self.principal, self.annual_rate, self.term_months)
    }

    pub fn schedule(&self) -> Vec<AmortizationRow> {
        build_schedule(self.principal, self.annual_rate, self.payment(), self.term_months)
    }

    pub fn extra_payment_schedule(&self) -> Vec<AmortizationRow> {
        build_extra_payment_schedule(
            self.principal,
            self.annual_rate,
            self.payment(),
            self.extra_payment,
            self.term_months,
        )
    }

    /// Run both schedules and report what the extra payment saves
    pub fn compare(&self) -> LoanComparison {
        let payment = self.payment();
        let base_schedule = build_schedule(self.principal, self.annual_rate, payment, self.term_months);
        let extra_schedule = build_extra_payment_schedule(
            self.principal,
            self.annual_rate,
            payment,
            self.extra_payment,
            self.term_months,
        );

        let base_interest = total_interest(&base_schedule);
        let extra_interest = total_interest(&extra_schedule);

        log::debug!(
            "Loan {:.2} @ {:.3}% over {} months: payment {:.2}, {} rows base, {} rows with extra",
            self.principal, self.annual_rate, self.term_months, payment,
            base_schedule.len(), extra_schedule.len()
        );

        LoanComparison {
            monthly_payment: payment,
            total_interest: base_interest,
            total_paid: total_paid(&base_schedule),
            yearly_summary: summarize_by_year(&base_schedule),
            extra_monthly_payment: payment + self.extra_payment,
            extra_total_interest: extra_interest,
            extra_total_paid: total_paid(&extra_schedule),
            months_to_payoff_with_extra: extra_schedule.len() as u32,
            interest_saved: (base_interest - extra_interest).max(0.0),
            months_saved: base_schedule.len().saturating_sub(extra_schedule.len()) as u32,
            extra_yearly_summary: summarize_by_year(&extra_schedule),
            schedule: base_schedule,
            extra_schedule,
        }
    }
}

/// One period of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Period index, 1-based
    pub period: u32,
    /// Schedule year, 1-based (periods 1-12 are year 1)
    pub year: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub remaining_balance: f64,
}

/// Base schedule alongside the extra-payment schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanComparison {
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_paid: f64,
    pub schedule: Vec<AmortizationRow>,
    pub yearly_summary: Vec<YearlySummary>,

    pub extra_monthly_payment: f64,
    pub extra_total_interest: f64,
    pub extra_total_paid: f64,
    pub months_to_payoff_with_extra: u32,
    pub interest_saved: f64,
    pub months_saved: u32,
    pub extra_schedule: Vec<AmortizationRow>,
    pub extra_yearly_summary: Vec<YearlySummary>,
}

/// Build the schedule for a level payment over at most `term_months` periods
///
/// A payment that does not cover the period's interest repays no principal.
pub fn build_schedule(
    principal: f64,
    annual_rate_pct: f64,
    payment: f64,
    term_months: u32,
) -> Vec<AmortizationRow> {
    amortize(principal, monthly_rate(annual_rate_pct), payment, term_months, 0.0)
}

/// Same as [`build_schedule`] with `extra_payment` added to every period
///
/// Stops as soon as the balance is repaid, so the result is never longer
/// than the base schedule.
pub fn build_extra_payment_schedule(
    principal: f64,
    annual_rate_pct: f64,
    base_payment: f64,
    extra_payment: f64,
    term_months: u32,
) -> Vec<AmortizationRow> {
    amortize(principal, monthly_rate(annual_rate_pct), base_payment + extra_payment, term_months, 0.0)
}

/// Extra-payment schedule that still repays `principal / term_months` in
/// periods where the payment does not cover interest
pub(crate) fn build_floored_schedule(
    principal: f64,
    annual_rate_pct: f64,
    base_payment: f64,
    extra_payment: f64,
    term_months: u32,
) -> Vec<AmortizationRow> {
    let floor_step = if term_months > 0 { principal / term_months as f64 } else { 0.0 };
    amortize(
        principal,
        monthly_rate(annual_rate_pct),
        base_payment + extra_payment,
        term_months,
        floor_step,
    )
}

fn amortize(
    principal: f64,
    rate: f64,
    payment: f64,
    max_periods: u32,
    floor_step: f64,
) -> Vec<AmortizationRow> {
    let mut rows = Vec::with_capacity(max_periods.min(MAX_TERM_MONTHS) as usize);
    let mut balance = principal;

    let mut period = 1;
    while period <= max_periods && balance > PAYOFF_EPSILON {
        let interest = balance * rate;
        let mut principal_part = (payment - interest).min(balance);
        if principal_part <= 0.0 {
            principal_part = balance.min(floor_step);
        }
        balance = (balance - principal_part).max(0.0);

        let is_final = period == max_periods || balance <= PAYOFF_EPSILON;
        rows.push(AmortizationRow {
            period,
            year: (period - 1) / MONTHS_PER_YEAR + 1,
            payment: if is_final { principal_part + interest } else { payment },
            principal: principal_part,
            interest,
            remaining_balance: balance,
        });
        period += 1;
    }

    rows
}

pub fn total_interest(rows: &[AmortizationRow]) -> f64 {
    rows.iter().map(|r| r.interest).sum()
}

pub fn total_principal(rows: &[AmortizationRow]) -> f64 {
    rows.iter().map(|r| r.principal).sum()
}

pub fn total_paid(rows: &[AmortizationRow]) -> f64 {
    rows.iter().map(|r| r.payment).sum()
}
