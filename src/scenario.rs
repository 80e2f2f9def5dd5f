//! Scenario runner for batch and sensitivity calculations
//!
//! Holds one engine (and so one set of loaded reference data) and fans
//! independent calculations out over rayon's pool.

use std::path::Path;

use rayon::prelude::*;

use crate::assumptions::Assumptions;
use crate::error::{LoadError, ValidationError};
use crate::input::{CalculationInput, DiscountMethod, InputOverrides};
use crate::projection::{CalculationResult, SupportEngine};

/// Outcome of one point of a sensitivity sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityPoint {
    pub value: f64,
    pub result: CalculationResult,
}

/// Pre-loaded runner for many calculations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_data_dir(Path::new("data"))?;
/// let results = runner.run_batch(&inputs);
/// let sweep = runner.fault_sensitivity(&input, &[0.0, 25.0, 50.0])?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: SupportEngine,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner reading reference data from `path`
    pub fn from_data_dir(path: &Path) -> Result<Self, LoadError> {
        Ok(Self::with_assumptions(Assumptions::from_data_dir(path)?))
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            engine: SupportEngine::new(assumptions),
        }
    }

    pub fn engine(&self) -> &SupportEngine {
        &self.engine
    }

    pub fn run(&self, input: &CalculationInput) -> Result<CalculationResult, ValidationError> {
        self.engine.compute(input)
    }

    /// Compute every input in parallel; results keep the input order
    pub fn run_batch(&self, inputs: &[CalculationInput]) -> Vec<Result<CalculationResult, ValidationError>> {
        inputs.par_iter().map(|input| self.engine.compute(input)).collect()
    }

    /// Recompute `input` for each fault rate (percent)
    pub fn fault_sensitivity(
        &self,
        input: &CalculationInput,
        fault_rates: &[f64],
    ) -> Result<Vec<SensitivityPoint>, ValidationError> {
        self.sweep(input, fault_rates, |value| InputOverrides {
            fault_rate: Some(value),
            ..Default::default()
        })
    }

    /// Recompute `input` for each discount rate (percent) of the selected method
    pub fn discount_sensitivity(
        &self,
        input: &CalculationInput,
        rates: &[f64],
    ) -> Result<Vec<SensitivityPoint>, ValidationError> {
        let method = input.params.discount_method;
        self.sweep(input, rates, |value| match method {
            DiscountMethod::Progressive => InputOverrides {
                report_discount_rate: Some(value),
                ..Default::default()
            },
            DiscountMethod::Actuarial => InputOverrides {
                technical_interest: Some(value),
                ..Default::default()
            },
        })
    }

    fn sweep<F>(&self, input: &CalculationInput, values: &[f64], overrides: F) -> Result<Vec<SensitivityPoint>, ValidationError>
    where
        F: Fn(f64) -> InputOverrides + Sync,
    {
        values
            .par_iter()
            .map(|&value| {
                let derived = input.rebuild(&overrides(value))?;
                let result = self.engine.compute(&derived)?;
                Ok(SensitivityPoint { value, result })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Dependent, DependentType, Gender, Person};
    use crate::input::IncomeMode;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn runner() -> ScenarioRunner {
        ScenarioRunner::with_assumptions(Assumptions::synthetic())
    }

    fn input(monthly: f64) -> CalculationInput {
        CalculationInput::builder(
            date(2020, 1, 1),
            date(2025, 1, 1),
            Person::new("Ahmet", date(1985, 1, 1), Gender::Male),
            IncomeMode::manual(monthly),
        )
        .dependent(Dependent::new(Person::new("Ayse", date(1987, 3, 10), Gender::Female), DependentType::Spouse))
        .build()
        .unwrap()
    }

    #[test]
    fn test_batch_preserves_order() {
        let runner = runner();
        let inputs: Vec<_> = [2_000.0, 4_000.0, 6_000.0].into_iter().map(input).collect();
        let results = runner.run_batch(&inputs);

        assert_eq!(results.len(), 3);
        let totals: Vec<f64> = results.iter().map(|r| r.as_ref().unwrap().total_support).collect();
        assert!(totals[0] < totals[1] && totals[1] < totals[2]);
        assert_relative_eq!(totals[1], totals[0] * 2.0, max_relative = 1e-9);
    }

    #[test]
    fn test_batch_reports_invalid_inputs_individually() {
        let runner = runner();
        let mut bad = input(4_000.0);
        bad.params.fault_rate = -1.0;
        let results = runner.run_batch(&[input(4_000.0), bad]);

        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_fault_sensitivity() {
        let runner = runner();
        let points = runner.fault_sensitivity(&input(4_000.0), &[0.0, 20.0, 50.0]).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[1].value, 20.0);
        assert_relative_eq!(
            points[2].result.total_after_fault,
            points[0].result.total_after_fault * 0.5,
            max_relative = 1e-12
        );
        assert!(runner.fault_sensitivity(&input(4_000.0), &[120.0]).is_err());
    }

    #[test]
    fn test_discount_sensitivity_uses_selected_method() {
        let runner = runner();
        let progressive = runner.discount_sensitivity(&input(4_000.0), &[0.0, 2.0, 5.0]).unwrap();
        assert!(progressive[0].result.total_support > progressive[1].result.total_support);
        assert!(progressive[1].result.total_support > progressive[2].result.total_support);

        let actuarial_input = input(4_000.0)
            .rebuild(&InputOverrides {
                discount_method: Some(DiscountMethod::Actuarial),
                ..Default::default()
            })
            .unwrap();
        let actuarial = runner.discount_sensitivity(&actuarial_input, &[2.0]).unwrap();
        assert_relative_eq!(actuarial[0].result.total_support, progressive[1].result.total_support, max_relative = 1e-12);
    }
}
