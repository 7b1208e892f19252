//! Closed-form annuity payment

/// Monthly rate from an annual nominal percentage (5.0 = 5%)
pub fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 100.0 / 12.0
}

/// Level monthly payment that retires `principal` over `term_months`
///
/// Formula: P * r * (1 + r)^n / ((1 + r)^n - 1), with r the monthly rate.
/// A zero rate degenerates to straight-line repayment P / n.
///
/// Inputs are expected to be validated by the caller; an empty loan or an
/// empty term yields a zero payment.
pub fn monthly_payment(principal: f64, annual_rate_pct: f64, term_months: u32) -> f64 {
    if principal <= 0.0 || term_months == 0 {
        return 0.0;
    }

    let r = monthly_rate(annual_rate_pct);
    let n = term_months as f64;

    if r == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + r).powf(n);
    principal * r * growth / (growth - 1.0)
}
