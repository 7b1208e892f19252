//! Body mass index

use crate::error::{ensure_positive, Result};
use serde::{Deserialize, Serialize};

const LB_PER_KG: f64 = 2.20462;
const CM_PER_INCH: f64 = 2.54;
/// Imperial conversion factor for lb/in²
const IMPERIAL_FACTOR: f64 = 703.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Weight in kilograms, height in centimeters
    Metric,
    /// Weight in pounds, height in inches
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiInputs {
    pub weight: f64,
    pub height: f64,
    pub unit_system: UnitSystem,
}

impl BmiInputs {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("weight", self.weight, "Weight must be greater than 0")?;
        ensure_positive("height", self.height, "Height must be greater than 0")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obesity,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obesity
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obesity => "Obesity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// Rounded to one decimal
    pub bmi: f64,
    pub category: BmiCategory,
}

/// Category is taken from the unrounded value
pub fn calculate_bmi(inputs: &BmiInputs) -> BmiResult {
    let bmi = match inputs.unit_system {
        UnitSystem::Metric => {
            let meters = inputs.height / 100.0;
            inputs.weight / (meters * meters)
        }
        UnitSystem::Imperial => IMPERIAL_FACTOR * inputs.weight / (inputs.height * inputs.height),
    };

    BmiResult {
        bmi: (bmi * 10.0).round() / 10.0,
        category: BmiCategory::from_bmi(bmi),
    }
}

pub fn feet_inches_to_inches(feet: f64, inches: f64) -> f64 {
    feet * 12.0 + inches
}

/// Whole feet and rounded remaining inches
pub fn inches_to_feet_inches(total_inches: f64) -> (u32, u32) {
    let feet = (total_inches / 12.0).floor();
    let inches = (total_inches % 12.0).round();
    (feet as u32, inches as u32)
}

pub fn kg_to_lb(kg: f64) -> f64 { kg * LB_PER_KG }
pub fn lb_to_kg(lb: f64) -> f64 { lb / LB_PER_KG }
pub fn cm_to_inches(cm: f64) -> f64 { cm / CM_PER_INCH }
pub fn inches_to_cm(inches: f64) -> f64 { inches * CM_PER_INCH }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric() {
        let result = calculate_bmi(&BmiInputs { weight: 70.0, height: 175.0, unit_system: UnitSystem::Metric });
        assert_eq!(result.bmi, 22.9);
        assert_eq!(result.category, BmiCategory::Normal);
        assert_eq!(result.category.label(), "Normal weight");
    }

    #[test]
    fn test_imperial() {
        // 180 lb at 5'10"
        let height = feet_inches_to_inches(5.0, 10.0);
        let result = calculate_bmi(&BmiInputs { weight: 180.0, height, unit_system: UnitSystem::Imperial });
        assert_eq!(result.bmi, 25.8);
        assert_eq!(result.category, BmiCategory::Overweight);
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obesity);
    }

    #[test]
    fn test_conversions() {
        assert!((kg_to_lb(lb_to_kg(150.0)) - 150.0).abs() < 1e-9);
        assert!((inches_to_cm(10.0) - 25.4).abs() < 1e-9);
        assert!((cm_to_inches(25.4) - 10.0).abs() < 1e-9);
        assert_eq!(inches_to_feet_inches(70.0), (5, 10));
    }

    #[test]
    fn test_validation() {
        let ok = BmiInputs { weight: 70.0, height: 175.0, unit_system: UnitSystem::Metric };
        assert!(ok.validate().is_ok());
        assert!(BmiInputs { weight: 0.0, ..ok }.validate().is_err());
        assert!(BmiInputs { height: -1.0, ..ok }.validate().is_err());
    }
}
