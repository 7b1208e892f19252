//! Everyday calculators: dates, health, grades, tax and currency

pub mod dates;
pub mod pregnancy;
pub mod bmi;
pub mod gpa;
pub mod income_tax;
pub mod currency;

pub use dates::{calculate_age, calculate_date_difference, AgeResult, DateDifferenceResult};
pub use pregnancy::{calculate_due_date, PregnancyInputs, PregnancyResult, Trimester};
pub use bmi::{calculate_bmi, BmiCategory, BmiInputs, BmiResult, UnitSystem};
pub use gpa::{calculate_gpa, Course, GpaResult};
pub use income_tax::{calculate_income_tax, FilingStatus, IncomeTaxResult, TaxBracket, TaxTable};
pub use currency::{convert_currency, ConversionResult, ExchangeRates, SUPPORTED_CURRENCIES};
