//! Cross-module properties of the amortization and growth engines

use approx::assert_abs_diff_eq;
use smart_tools::finance::{
    build_extra_payment_schedule, build_schedule, compound_growth, monthly_payment,
    summarize_by_year, total_interest, total_paid, total_principal,
};
use smart_tools::{CompoundGrowthParameters, CompoundingFrequency, LoanParameters};

const CASES: [(f64, f64, u32); 5] = [
    (350_000.0, 5.0, 360),
    (25_000.0, 7.9, 60),
    (1_000.0, 0.0, 12),
    (480_000.0, 6.75, 180),
    (9_999.99, 18.0, 37),
];

#[test]
fn principal_is_conserved_at_every_period() {
    for (principal, rate, n) in CASES {
        let payment = monthly_payment(principal, rate, n);
        let rows = build_schedule(principal, rate, payment, n);
        let mut repaid = 0.0;
        for row in &rows {
            repaid += row.principal;
            assert_abs_diff_eq!(repaid + row.remaining_balance, principal, epsilon = 1e-6);
        }
    }
}

#[test]
fn schedules_end_at_zero() {
    for (principal, rate, n) in CASES {
        let params = LoanParameters::new(principal, rate, n).with_extra_payment(100.0);
        let base = params.schedule();
        let extra = params.extra_payment_schedule();
        assert!(base.last().unwrap().remaining_balance <= 0.01);
        assert!(extra.last().unwrap().remaining_balance <= 0.01);
    }
}

#[test]
fn zero_rate_splits_evenly() {
    let payment = monthly_payment(1_200.0, 0.0, 12);
    assert_eq!(payment, 100.0);
    for row in build_schedule(1_200.0, 0.0, payment, 12) {
        assert_eq!(row.interest, 0.0);
        assert_abs_diff_eq!(row.principal, payment, epsilon = 1e-9);
    }
}

#[test]
fn extra_payment_never_lengthens_the_loan() {
    for (principal, rate, n) in CASES {
        let payment = monthly_payment(principal, rate, n);
        let base = build_schedule(principal, rate, payment, n);
        let same = build_extra_payment_schedule(principal, rate, payment, 0.0, n);
        let faster = build_extra_payment_schedule(principal, rate, payment, 50.0, n);
        assert_eq!(same.len(), base.len());
        assert!(faster.len() < base.len());
    }
}

#[test]
fn reference_mortgage() {
    let params = LoanParameters::new(350_000.0, 5.0, 360);
    let schedule = params.schedule();
    assert_abs_diff_eq!(params.payment(), 1_878.88, epsilon = 0.01);
    assert_abs_diff_eq!(total_paid(&schedule), 676_395.24, epsilon = 0.01);
    assert_abs_diff_eq!(total_interest(&schedule), 326_395.24, epsilon = 0.01);
}

#[test]
fn nothing_invested_grows_nothing() {
    for frequency in [
        CompoundingFrequency::Yearly,
        CompoundingFrequency::Quarterly,
        CompoundingFrequency::Monthly,
        CompoundingFrequency::Daily,
    ] {
        let result = compound_growth(&CompoundGrowthParameters {
            principal: 0.0,
            monthly_contribution: 0.0,
            annual_rate: 8.0,
            years: 10,
            compounding_frequency: frequency,
        });
        assert_eq!(result.final_balance, 0.0);
        assert_eq!(result.total_interest, 0.0);
    }
}

#[test]
fn yearly_summary_accounts_for_all_principal() {
    for (principal, rate, n) in CASES {
        let payment = monthly_payment(principal, rate, n);
        let rows = build_schedule(principal, rate, payment, n);
        let yearly = summarize_by_year(&rows);
        let summed: f64 = yearly.iter().map(|y| y.total_principal).sum();
        assert_abs_diff_eq!(summed, total_principal(&rows), epsilon = 1e-6);
        assert_eq!(yearly.len(), rows.len().div_ceil(12));
    }
}
