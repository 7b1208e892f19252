//! Loan amortization and compound growth engines

mod payment;
mod schedule;
mod yearly;
mod compound;
pub mod mortgage;
pub mod car_loan;
pub mod batch;

pub use payment::{monthly_payment, monthly_rate};
pub use schedule::{
    build_schedule, build_extra_payment_schedule, total_interest, total_paid, total_principal,
    AmortizationRow, LoanParameters, LoanComparison,
};
pub use yearly::{summarize_by_year, YearlySummary};
pub use compound::{
    compound_growth, CompoundGrowthParameters, CompoundGrowthResult, CompoundingFrequency,
    YearlyBreakdown,
};
pub use mortgage::{calculate_mortgage, DownPayment, MortgageInputs, MortgageResults, PropertyTax};
pub use car_loan::{calculate_car_loan, CarLoanInputs, CarLoanResults, CarLoanRow};

// ============================================================================
// Schedule Constants
// ============================================================================
// A balance at or below one cent is treated as paid off. The same threshold
// stops both the base and the extra-payment schedules.

/// Remaining balance treated as fully repaid
pub const PAYOFF_EPSILON: f64 = 0.01;

/// Rows per schedule year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest accepted loan term in years
pub const MAX_TERM_YEARS: u32 = 100;

/// Longest accepted loan term in months
pub const MAX_TERM_MONTHS: u32 = MAX_TERM_YEARS * MONTHS_PER_YEAR;

/// Round to cents for reporting; internal accumulation stays unrounded
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
