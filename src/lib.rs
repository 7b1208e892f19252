//! SmartTools - stateless calculators and text utilities
//!
//! This library provides:
//! - Loan amortization (mortgage, car loan) with extra-payment comparison
//! - Compound growth with periodic contributions
//! - Everyday calculators (age, date difference, pregnancy, BMI, GPA, income tax, currency)
//! - Text tools (similarity check, citation formatting)
//! - A thin proxy to a hosted language model for grammar, essay and summary tools
//! - A JSON dispatcher used by the Lambda and CLI front ends

pub mod error;
pub mod config;
pub mod finance;
pub mod calculators;
pub mod text;
pub mod assistant;
pub mod api;

// Re-export commonly used types
pub use error::{Result, ToolsError};
pub use config::ServiceConfig;
pub use finance::{
    AmortizationRow, CompoundGrowthParameters, CompoundingFrequency, LoanParameters, YearlySummary,
};
pub use api::{ApiRequest, ApiResponse, Dispatcher};
