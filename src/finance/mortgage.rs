//! Mortgage quote: P&I, escrow items and the extra-payment comparison

use super::schedule::{AmortizationRow, LoanParameters};
use super::yearly::YearlySummary;
use super::{MAX_TERM_YEARS, MONTHS_PER_YEAR};
use crate::error::{ensure_non_negative, ensure_positive, ensure_range, Result, ToolsError};
use serde::{Deserialize, Serialize};

/// Down payment below this share of the price triggers PMI
pub const PMI_DOWN_PAYMENT_THRESHOLD_PCT: f64 = 20.0;

/// Highest accepted mortgage rate (percent)
pub const MAX_MORTGAGE_RATE_PCT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DownPayment {
    /// Currency amount, capped at the home price
    Amount(f64),
    /// Percent of the home price
    Percentage(f64),
}

impl DownPayment {
    pub fn resolve(&self, home_price: f64) -> f64 {
        match *self {
            DownPayment::Amount(amount) => amount.min(home_price),
            DownPayment::Percentage(pct) => home_price * pct / 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyTax {
    /// Annual percent of the home price
    Percent(f64),
    /// Annual amount
    Amount(f64),
}

impl PropertyTax {
    pub fn monthly(&self, home_price: f64) -> f64 {
        match *self {
            PropertyTax::Percent(pct) => home_price * pct / 100.0 / 12.0,
            PropertyTax::Amount(annual) => annual / 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgageInputs {
    pub home_price: f64,
    pub down_payment: DownPayment,
    pub loan_term_years: u32,
    /// Annual rate in percent
    pub annual_interest_rate: f64,
    pub property_tax: PropertyTax,
    #[serde(default)]
    pub annual_insurance: f64,
    /// Annual PMI as a percent of the loan amount
    #[serde(default)]
    pub pmi_percent: f64,
    #[serde(default)]
    pub include_pmi: bool,
    #[serde(default)]
    pub monthly_hoa: f64,
    #[serde(default)]
    pub extra_principal_payment: f64,
}

impl MortgageInputs {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("home_price", self.home_price, "Home price must be greater than 0")?;
        ensure_range(
            "annual_interest_rate",
            self.annual_interest_rate,
            0.0,
            MAX_MORTGAGE_RATE_PCT,
            "Interest rate must be between 0 and 30%",
        )?;
        if self.loan_term_years == 0 {
            return Err(ToolsError::invalid("loan_term_years", "Loan term must be greater than 0"));
        }
        if self.loan_term_years > MAX_TERM_YEARS {
            return Err(ToolsError::invalid("loan_term_years", "Loan term cannot exceed 100 years"));
        }
        match self.down_payment {
            DownPayment::Amount(v) | DownPayment::Percentage(v) => {
                ensure_non_negative("down_payment", v, "Down payment cannot be negative")?
            }
        }
        match self.property_tax {
            PropertyTax::Percent(v) | PropertyTax::Amount(v) => {
                ensure_non_negative("property_tax", v, "Property tax cannot be negative")?
            }
        }
        ensure_non_negative("annual_insurance", self.annual_insurance, "Insurance cannot be negative")?;
        ensure_non_negative("pmi_percent", self.pmi_percent, "PMI cannot be negative")?;
        ensure_non_negative("monthly_hoa", self.monthly_hoa, "HOA dues cannot be negative")?;
        ensure_non_negative(
            "extra_principal_payment",
            self.extra_principal_payment,
            "Extra payment cannot be negative",
        )
    }

    pub fn loan_term_months(&self) -> u32 {
        self.loan_term_years.saturating_mul(MONTHS_PER_YEAR)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageResults {
    pub down_payment: f64,
    pub loan_amount: f64,
    pub monthly_pi: f64,
    pub monthly_property_tax: f64,
    pub monthly_insurance: f64,
    pub monthly_pmi: f64,
    pub monthly_hoa: f64,
    pub total_monthly_payment: f64,
    pub total_interest_paid: f64,
    /// Loan amount plus interest
    pub total_cost: f64,
    pub amortization_schedule: Vec<AmortizationRow>,
    pub yearly_summary: Vec<YearlySummary>,

    pub extra_monthly_payment: f64,
    pub extra_total_interest_paid: f64,
    pub extra_total_cost: f64,
    pub months_to_payoff_with_extra: u32,
    pub interest_saved: f64,
    pub months_saved: u32,
    pub extra_amortization_schedule: Vec<AmortizationRow>,
    pub extra_yearly_summary: Vec<YearlySummary>,
}

/// Price a mortgage. Inputs must already be validated.
pub fn calculate_mortgage(inputs: &MortgageInputs) -> MortgageResults {
    let down_payment = inputs.down_payment.resolve(inputs.home_price);
    let loan_amount = (inputs.home_price - down_payment).max(0.0);

    let loan = LoanParameters::new(loan_amount, inputs.annual_interest_rate, inputs.loan_term_months())
        .with_extra_payment(inputs.extra_principal_payment);
    let cmp = loan.compare();

    let monthly_property_tax = inputs.property_tax.monthly(inputs.home_price);
    let monthly_insurance = inputs.annual_insurance / 12.0;

    let down_payment_pct = if inputs.home_price > 0.0 {
        down_payment / inputs.home_price * 100.0
    } else {
        0.0
    };
    let monthly_pmi = if inputs.include_pmi && down_payment_pct < PMI_DOWN_PAYMENT_THRESHOLD_PCT {
        inputs.pmi_percent / 100.0 * loan_amount / 12.0
    } else {
        0.0
    };

    let total_monthly_payment =
        cmp.monthly_payment + monthly_property_tax + monthly_insurance + monthly_pmi + inputs.monthly_hoa;

    MortgageResults {
        down_payment,
        loan_amount,
        monthly_pi: cmp.monthly_payment,
        monthly_property_tax,
        monthly_insurance,
        monthly_pmi,
        monthly_hoa: inputs.monthly_hoa,
        total_monthly_payment,
        total_interest_paid: cmp.total_interest,
        total_cost: loan_amount + cmp.total_interest,
        amortization_schedule: cmp.schedule,
        yearly_summary: cmp.yearly_summary,
        extra_monthly_payment: cmp.extra_monthly_payment,
        extra_total_interest_paid: cmp.extra_total_interest,
        extra_total_cost: loan_amount + cmp.extra_total_interest,
        months_to_payoff_with_extra: cmp.months_to_payoff_with_extra,
        interest_saved: cmp.interest_saved,
        months_saved: cmp.months_saved,
        extra_amortization_schedule: cmp.extra_schedule,
        extra_yearly_summary: cmp.extra_yearly_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn base_inputs() -> MortgageInputs {
        MortgageInputs {
            home_price: 437_500.0,
            down_payment: DownPayment::Percentage(20.0),
            loan_term_years: 30,
            annual_interest_rate: 5.0,
            property_tax: PropertyTax::Percent(1.2),
            annual_insurance: 1_200.0,
            pmi_percent: 0.5,
            include_pmi: true,
            monthly_hoa: 50.0,
            extra_principal_payment: 0.0,
        }
    }

    #[test]
    fn test_reference_quote() {
        let results = calculate_mortgage(&base_inputs());

        assert_abs_diff_eq!(results.loan_amount, 350_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(results.monthly_pi, 1878.88, epsilon = 0.01);
        assert_abs_diff_eq!(results.monthly_property_tax, 437.5, epsilon = 1e-9);
        assert_abs_diff_eq!(results.monthly_insurance, 100.0, epsilon = 1e-9);
        // Exactly 20% down: no PMI
        assert_eq!(results.monthly_pmi, 0.0);
        assert_abs_diff_eq!(
            results.total_monthly_payment,
            results.monthly_pi + 437.5 + 100.0 + 50.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(results.total_interest_paid, 326_395.24, epsilon = 0.05);
        assert_eq!(results.amortization_schedule.len(), 360);
        assert_eq!(results.yearly_summary.len(), 30);
    }

    #[test]
    fn test_pmi_below_threshold() {
        let inputs = MortgageInputs {
            down_payment: DownPayment::Amount(43_750.0), // 10%
            ..base_inputs()
        };
        let results = calculate_mortgage(&inputs);
        let expected = 0.005 * (437_500.0 - 43_750.0) / 12.0;
        assert_abs_diff_eq!(results.monthly_pmi, expected, epsilon = 1e-9);

        let no_pmi = calculate_mortgage(&MortgageInputs { include_pmi: false, ..inputs });
        assert_eq!(no_pmi.monthly_pmi, 0.0);
    }

    #[test]
    fn test_down_payment_amount_is_capped() {
        let inputs = MortgageInputs {
            down_payment: DownPayment::Amount(500_000.0),
            ..base_inputs()
        };
        let results = calculate_mortgage(&inputs);
        assert_eq!(results.down_payment, 437_500.0);
        assert_eq!(results.loan_amount, 0.0);
        assert!(results.amortization_schedule.is_empty());
        assert_eq!(results.monthly_pi, 0.0);
    }

    #[test]
    fn test_extra_payment_savings() {
        let inputs = MortgageInputs {
            extra_principal_payment: 300.0,
            ..base_inputs()
        };
        let results = calculate_mortgage(&inputs);

        assert!(results.months_to_payoff_with_extra < 360);
        assert_eq!(results.months_saved, 360 - results.months_to_payoff_with_extra);
        assert!(results.interest_saved > 0.0);
        assert_abs_diff_eq!(
            results.extra_total_cost,
            results.loan_amount + results.extra_total_interest_paid,
            epsilon = 1e-6
        );
        assert_eq!(results.extra_amortization_schedule.len() as u32, results.months_to_payoff_with_extra);
    }

    #[test]
    fn test_property_tax_amount() {
        let tax = PropertyTax::Amount(6_000.0);
        assert_eq!(tax.monthly(1.0), 500.0);
    }

    #[test]
    fn test_validation() {
        assert!(base_inputs().validate().is_ok());
        assert!(MortgageInputs { home_price: 0.0, ..base_inputs() }.validate().is_err());
        assert!(MortgageInputs { annual_interest_rate: 31.0, ..base_inputs() }.validate().is_err());
        assert!(MortgageInputs { loan_term_years: 0, ..base_inputs() }.validate().is_err());
        assert!(MortgageInputs { monthly_hoa: -1.0, ..base_inputs() }.validate().is_err());
    }

    #[test]
    fn test_term_is_capped() {
        assert!(MortgageInputs { loan_term_years: 100, ..base_inputs() }.validate().is_ok());
        let huge = MortgageInputs { loan_term_years: 400_000_000, ..base_inputs() };
        assert!(huge.validate().is_err());
        assert_eq!(huge.loan_term_months(), u32::MAX);
        assert!(MortgageInputs { loan_term_years: 101, ..base_inputs() }.validate().is_err());
    }

    #[test]
    fn test_down_payment_json_shape() {
        let dp: DownPayment = serde_json::from_str(r#"{ "type": "percentage", "value": 15 }"#).unwrap();
        assert_eq!(dp, DownPayment::Percentage(15.0));
    }
}
