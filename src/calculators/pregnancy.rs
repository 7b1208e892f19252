//! Pregnancy due date (Naegele's rule adjusted for cycle length)

use crate::error::{Result, ToolsError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days from LMP to the due date for a 28-day cycle
pub const GESTATION_DAYS: i64 = 280;
pub const REFERENCE_CYCLE_DAYS: u32 = 28;

/// Offsets from LMP: week 13 and week 28, counted from day zero
const SECOND_TRIMESTER_OFFSET: i64 = 13 * 7 - 1;
const THIRD_TRIMESTER_OFFSET: i64 = 28 * 7 - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PregnancyInputs {
    pub last_menstrual_period: NaiveDate,
    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,
}

fn default_cycle_length() -> u32 { REFERENCE_CYCLE_DAYS }

impl PregnancyInputs {
    /// LMP must fall within a year of `today` in either direction
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if !(21..=35).contains(&self.cycle_length) {
            return Err(ToolsError::invalid(
                "cycle_length",
                "Cycle length should be between 21 and 35 days",
            ));
        }
        let latest = shift_days(today, 365, "today")?;
        let earliest = shift_days(today, -365, "today")?;
        if self.last_menstrual_period > latest {
            return Err(ToolsError::invalid(
                "last_menstrual_period",
                "Last menstrual period cannot be more than 1 year in the future",
            ));
        }
        if self.last_menstrual_period < earliest {
            return Err(ToolsError::invalid(
                "last_menstrual_period",
                "Last menstrual period should be within the last year",
            ));
        }
        Ok(())
    }
}

fn shift_days(date: NaiveDate, days: i64, field: &'static str) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| ToolsError::invalid(field, "Date is outside the supported calendar range"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    pub fn from_weeks(weeks: i64) -> Self {
        if weeks < 13 {
            Trimester::First
        } else if weeks < 28 {
            Trimester::Second
        } else {
            Trimester::Third
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trimester::First => "First Trimester",
            Trimester::Second => "Second Trimester",
            Trimester::Third => "Third Trimester",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PregnancyResult {
    pub due_date: NaiveDate,
    pub gestational_age_weeks: i64,
    pub gestational_age_days: i64,
    pub second_trimester_start: NaiveDate,
    pub third_trimester_start: NaiveDate,
    /// False when the LMP is after `today`; gestational age is then zero
    pub is_pregnancy_started: bool,
    pub current_trimester: Trimester,
}

/// Fails only when a derived date falls off the calendar
pub fn calculate_due_date(inputs: &PregnancyInputs, today: NaiveDate) -> Result<PregnancyResult> {
    let lmp = inputs.last_menstrual_period;
    let cycle_adjustment = inputs.cycle_length as i64 - REFERENCE_CYCLE_DAYS as i64;
    let due_date = shift_days(lmp, GESTATION_DAYS + cycle_adjustment, "last_menstrual_period")?;

    let days_since_lmp = (today - lmp).num_days();
    let is_pregnancy_started = days_since_lmp >= 0;
    let (weeks, days) = if is_pregnancy_started {
        (days_since_lmp / 7, days_since_lmp % 7)
    } else {
        (0, 0)
    };

    Ok(PregnancyResult {
        due_date,
        gestational_age_weeks: weeks,
        gestational_age_days: days,
        second_trimester_start: shift_days(lmp, SECOND_TRIMESTER_OFFSET, "last_menstrual_period")?,
        third_trimester_start: shift_days(lmp, THIRD_TRIMESTER_OFFSET, "last_menstrual_period")?,
        is_pregnancy_started,
        current_trimester: Trimester::from_weeks(weeks),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_standard_cycle() {
        let inputs = PregnancyInputs { last_menstrual_period: d(2025, 1, 1), cycle_length: 28 };
        let result = calculate_due_date(&inputs, d(2025, 3, 5)).unwrap();

        assert_eq!(result.due_date, d(2025, 10, 8));
        // 63 days since LMP
        assert_eq!((result.gestational_age_weeks, result.gestational_age_days), (9, 0));
        assert_eq!(result.second_trimester_start, d(2025, 4, 1));
        assert_eq!(result.third_trimester_start, d(2025, 7, 15));
        assert_eq!(result.current_trimester, Trimester::First);
        assert!(result.is_pregnancy_started);
    }

    #[test]
    fn test_long_cycle_moves_due_date() {
        let inputs = PregnancyInputs { last_menstrual_period: d(2025, 1, 1), cycle_length: 32 };
        let result = calculate_due_date(&inputs, d(2025, 1, 1)).unwrap();
        assert_eq!(result.due_date, d(2025, 10, 12));
    }

    #[test]
    fn test_future_lmp() {
        let inputs = PregnancyInputs { last_menstrual_period: d(2025, 6, 1), cycle_length: 28 };
        let result = calculate_due_date(&inputs, d(2025, 5, 1)).unwrap();
        assert!(!result.is_pregnancy_started);
        assert_eq!(result.gestational_age_weeks, 0);
    }

    #[test]
    fn test_trimester_labels() {
        assert_eq!(Trimester::from_weeks(12).label(), "First Trimester");
        assert_eq!(Trimester::from_weeks(13), Trimester::Second);
        assert_eq!(Trimester::from_weeks(28), Trimester::Third);
    }

    #[test]
    fn test_validation() {
        let today = d(2025, 3, 1);
        let ok = PregnancyInputs { last_menstrual_period: d(2025, 1, 1), cycle_length: 28 };
        assert!(ok.validate(today).is_ok());
        assert!(PregnancyInputs { cycle_length: 20, ..ok }.validate(today).is_err());
        assert!(PregnancyInputs { last_menstrual_period: d(2023, 1, 1), ..ok }.validate(today).is_err());
        assert!(PregnancyInputs { last_menstrual_period: d(2026, 6, 1), ..ok }.validate(today).is_err());
    }

    #[test]
    fn test_calendar_edges_are_errors() {
        let ok = PregnancyInputs { last_menstrual_period: d(2025, 1, 1), cycle_length: 28 };
        let err = ok.validate(NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, ToolsError::InvalidInput { field: "today", .. }));
        assert!(ok.validate(NaiveDate::MIN).is_err());

        // Within a year of the last day, but the due date does not exist
        let late = PregnancyInputs { last_menstrual_period: NaiveDate::MAX, cycle_length: 28 };
        assert!(calculate_due_date(&late, NaiveDate::MAX).is_err());
    }
}
