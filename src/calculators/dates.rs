//! Age and date difference
//!
//! Both break an interval into whole years, months and days: count the whole
//! calendar months first, then the days left after stepping that many months
//! from the start date (Jan 31 + 1 month lands on the last day of February).

use crate::error::{Result, ToolsError};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeResult {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateDifferenceResult {
    /// Total elapsed days
    pub days: i64,
    /// Whole weeks in `days`
    pub weeks: i64,
    /// Calendar breakdown
    pub years: i32,
    pub months: i32,
    pub remaining_days: i32,
}

/// Age on `today` for someone born on `dob`
pub fn calculate_age(dob: NaiveDate, today: NaiveDate) -> Result<AgeResult> {
    if dob > today {
        return Err(ToolsError::invalid("date_of_birth", "Date of birth cannot be in the future"));
    }
    let (years, months, days) = calendar_breakdown(dob, today);
    Ok(AgeResult { years, months, days })
}

/// Elapsed time from `start` to `end`
pub fn calculate_date_difference(start: NaiveDate, end: NaiveDate) -> Result<DateDifferenceResult> {
    if end < start {
        return Err(ToolsError::invalid("end_date", "End date cannot be before start date"));
    }
    let days = (end - start).num_days();
    let (years, months, remaining_days) = calendar_breakdown(start, end);
    Ok(DateDifferenceResult {
        days,
        weeks: days / 7,
        years,
        months,
        remaining_days,
    })
}

fn calendar_breakdown(from: NaiveDate, to: NaiveDate) -> (i32, i32, i32) {
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    let months = months.max(0);

    // Whole months from `from`, clamped to month end, then the leftover days
    let anchor = from
        .checked_add_months(Months::new(months as u32))
        .unwrap_or(to);
    let days = (to - anchor).num_days().max(0) as i32;

    (months / 12, months % 12, days)
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

impl AgeResult {
    /// "30 years, 2 months, 5 days", omitting zero parts
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.years > 0 {
            parts.push(plural(self.years as i64, "year"));
        }
        if self.months > 0 {
            parts.push(plural(self.months as i64, "month"));
        }
        if self.days > 0 || parts.is_empty() {
            parts.push(plural(self.days as i64, "day"));
        }
        parts.join(", ")
    }
}

impl DateDifferenceResult {
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.years > 0 {
            parts.push(plural(self.years as i64, "year"));
        }
        if self.months > 0 {
            parts.push(plural(self.months as i64, "month"));
        }
        if self.weeks > 0 {
            parts.push(plural(self.weeks, "week"));
        }
        if self.days > 0 || parts.is_empty() {
            parts.push(plural(self.days, "day"));
        }
        parts.join(", ")
    }
}
