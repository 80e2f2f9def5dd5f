//! Loss of Support - Date-exact actuarial engine for loss-of-support compensation
//!
//! This library provides:
//! - Support windows for the supporter and each dependent from life tables
//! - Year-by-year allocation of lost support across the household
//! - Progressive and actuarial discounting to the valuation date
//! - Statutory adjustments (social-insurance offset, child-rearing cost, fault)
//! - Reporting summaries and batch / sensitivity runs

pub mod assumptions;
pub mod case;
pub mod error;
pub mod input;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use assumptions::{Assumptions, LifeTableCache, LifeTableKind, WageSchedule};
pub use case::{CaseFile, Dependent, DependentType, Gender, Person};
pub use error::{LoadError, ValidationError};
pub use input::{CalculationInput, IncomeMode, InputOverrides, Parameters, Profile};
pub use projection::{CalculationResult, PeriodLabel, SupportEngine, SupportInterval, YearRow};
pub use scenario::ScenarioRunner;

/// Compute one input against the default reference data
pub fn compute(input: &CalculationInput) -> Result<CalculationResult, ValidationError> {
    SupportEngine::default().compute(input)
}
