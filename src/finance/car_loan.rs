//! Car loan with sales tax, trade-in and dated payments

use super::payment::monthly_payment;
use super::schedule::{build_floored_schedule, total_interest, total_paid};
use super::{MAX_TERM_YEARS, MONTHS_PER_YEAR};
use crate::error::{ensure_non_negative, ensure_positive, Result, ToolsError};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarLoanInputs {
    pub vehicle_price: f64,
    #[serde(default)]
    pub down_payment: f64,
    #[serde(default)]
    pub trade_in_value: f64,
    #[serde(default)]
    pub sales_tax_percent: f64,
    pub term_years: u32,
    pub annual_interest_rate: f64,
    #[serde(default)]
    pub extra_monthly_payment: f64,
    pub start_date: NaiveDate,
}

impl CarLoanInputs {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("vehicle_price", self.vehicle_price, "Vehicle price must be greater than 0")?;
        if self.term_years == 0 {
            return Err(ToolsError::invalid("term_years", "Loan term must be greater than 0"));
        }
        if self.term_years > MAX_TERM_YEARS {
            return Err(ToolsError::invalid("term_years", "Loan term cannot exceed 100 years"));
        }
        ensure_non_negative(
            "annual_interest_rate",
            self.annual_interest_rate,
            "Interest rate must be 0 or greater",
        )?;
        ensure_non_negative("down_payment", self.down_payment, "Down payment cannot be negative")?;
        ensure_non_negative("trade_in_value", self.trade_in_value, "Trade-in value cannot be negative")?;
        ensure_non_negative("sales_tax_percent", self.sales_tax_percent, "Sales tax cannot be negative")?;
        ensure_non_negative(
            "extra_monthly_payment",
            self.extra_monthly_payment,
            "Extra payment cannot be negative",
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarLoanRow {
    pub month_index: u32,
    pub date: NaiveDate,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarLoanResults {
    pub tax_amount: f64,
    pub loan_amount: f64,
    pub base_monthly_payment: f64,
    /// Base payment plus the extra monthly payment
    pub actual_monthly_payment: f64,
    pub total_payments: f64,
    pub total_interest: f64,
    pub payoff_date: NaiveDate,
    pub amortization_schedule: Vec<CarLoanRow>,
}

/// Price a car loan. Inputs must already be validated.
pub fn calculate_car_loan(inputs: &CarLoanInputs) -> CarLoanResults {
    // Sales tax applies after trade-in and down payment
    let taxable = (inputs.vehicle_price - inputs.trade_in_value - inputs.down_payment).max(0.0);
    let tax_amount = taxable * inputs.sales_tax_percent / 100.0;
    let loan_amount =
        (inputs.vehicle_price + tax_amount - inputs.down_payment - inputs.trade_in_value).max(0.0);

    let term_months = inputs.term_years.saturating_mul(MONTHS_PER_YEAR);
    let base_monthly_payment = monthly_payment(loan_amount, inputs.annual_interest_rate, term_months);

    let rows = build_floored_schedule(
        loan_amount,
        inputs.annual_interest_rate,
        base_monthly_payment,
        inputs.extra_monthly_payment,
        term_months,
    );

    let total_payments = total_paid(&rows);
    let total_interest = total_interest(&rows);

    // Month arithmetic clamps to the end of shorter months (Jan 31 + 1 month = Feb 28/29)
    let schedule: Vec<CarLoanRow> = rows
        .iter()
        .map(|row| CarLoanRow {
            month_index: row.period,
            date: inputs
                .start_date
                .checked_add_months(Months::new(row.period))
                .unwrap_or(NaiveDate::MAX),
            payment: row.payment,
            principal: row.principal,
            interest: row.interest,
            remaining_balance: row.remaining_balance,
        })
        .collect();

    let payoff_date = schedule.last().map(|r| r.date).unwrap_or(inputs.start_date);

    log::debug!(
        "Car loan {:.2} over {} months: {} payments, payoff {}",
        loan_amount, term_months, schedule.len(), payoff_date
    );

    CarLoanResults {
        tax_amount,
        loan_amount,
        base_monthly_payment,
        actual_monthly_payment: base_monthly_payment + inputs.extra_monthly_payment,
        total_payments,
        total_interest,
        payoff_date,
        amortization_schedule: schedule,
    }
}
