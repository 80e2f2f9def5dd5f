//! Error types for input validation and reference-data loading

use chrono::NaiveDate;
use thiserror::Error;

/// Fatal input problems, raised before any computation runs.
///
/// Every message starts with the name of the offending field so callers
/// can attribute the failure to a form input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("valuation_date: valuation date {valuation} is before incident date {incident}")]
    ValuationBeforeIncident {
        incident: NaiveDate,
        valuation: NaiveDate,
    },

    #[error("supporter.birth: birth date {birth} must be strictly before incident date {incident}")]
    SupporterBornAfterIncident {
        birth: NaiveDate,
        incident: NaiveDate,
    },

    #[error("fault_rate: {0} is outside [0, 100]")]
    FaultRateOutOfRange(f64),

    #[error("report_discount_rate: {0} must not be negative")]
    NegativeReportDiscountRate(f64),

    #[error("technical_interest: {0} must not be negative")]
    NegativeTechnicalInterest(f64),

    #[error("dependents: name '{0}' is used more than once")]
    DuplicateDependentName(String),

    #[error("dependents: name '{0}' is reserved for a computed party")]
    ReservedDependentName(String),
}

/// Failures while reading case files or reference tables.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown gender '{0}'")]
    UnknownGender(String),

    #[error("unknown dependent type '{0}'")]
    UnknownDependentType(String),

    #[error("wage schedule: {0}")]
    InvalidWageSchedule(String),

    #[error("life table {table}: {reason}")]
    InvalidLifeTable { table: String, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
