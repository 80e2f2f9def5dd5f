//! Statutory adjustments applied to the aggregate totals
//!
//! Stages run in a fixed order, each reading the previous stage's output:
//! social-insurance capital value, child-rearing cost, fault reduction.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;

use super::interval::fractional_age;
use crate::assumptions::WageSchedule;
use crate::case::DependentType;
use crate::input::CalculationInput;

/// Age below which the parents' child-rearing cost is clawed back
pub const TRAINING_AGE_LIMIT: f64 = 18.0;

/// One post-aggregation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    SocialInsurance,
    ChildRearing,
    Fault,
}

/// Stages in application order
pub const PIPELINE: [Adjustment; 3] = [Adjustment::SocialInsurance, Adjustment::ChildRearing, Adjustment::Fault];

/// Aggregate totals as they pass through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub total_support: f64,
    pub total_by_person: BTreeMap<String, f64>,
    pub social_insurance_deduction: f64,
    pub total_after_social_insurance: f64,
    pub training_total: f64,
    pub total_after_fault: f64,
}

impl Totals {
    /// Totals before any adjustment
    pub fn new(total_support: f64, total_by_person: BTreeMap<String, f64>) -> Self {
        Self {
            total_support,
            total_by_person,
            social_insurance_deduction: 0.0,
            total_after_social_insurance: total_support,
            training_total: 0.0,
            total_after_fault: total_support,
        }
    }
}

/// Capital value of a monthly social-insurance income
pub fn social_insurance_capital_value(input: &CalculationInput) -> f64 {
    let params = &input.params;
    if params.social_insurance_monthly_income <= 0.0 {
        return 0.0;
    }
    params.social_insurance_monthly_income * 12.0 * params.social_insurance_capital_factor
}

/// Run every stage over `totals`
pub fn apply_all(totals: Totals, input: &CalculationInput, wages: &WageSchedule) -> Totals {
    PIPELINE
        .iter()
        .fold(totals, |acc, stage| apply(*stage, acc, input, wages))
}

/// Run one stage
pub fn apply(stage: Adjustment, mut totals: Totals, input: &CalculationInput, wages: &WageSchedule) -> Totals {
    let params = &input.params;
    match stage {
        Adjustment::SocialInsurance => {
            let capital_value = social_insurance_capital_value(input);
            let deducted = capital_value * params.social_insurance_deduction.fraction();
            totals.social_insurance_deduction = capital_value;
            totals.total_after_social_insurance = (totals.total_support - deducted).max(0.0);
            debug!("Social insurance capital value {:.2}, deducted {:.2}", capital_value, deducted);
        }
        Adjustment::ChildRearing => {
            let costs = child_rearing_costs(input, wages);
            if !costs.is_empty() {
                for (parent, cost) in &costs {
                    *totals.total_by_person.entry(parent.clone()).or_insert(0.0) -= cost;
                }
                let training_total: f64 = costs.values().sum();
                totals.training_total = training_total;
                totals.total_support = (totals.total_support - training_total).max(0.0);
                totals.total_after_social_insurance =
                    (totals.total_after_social_insurance - training_total).max(0.0);
                debug!("Child-rearing cost {:.2} across {} parent(s)", training_total, costs.len());
            }
        }
        Adjustment::Fault => {
            totals.total_after_fault = totals.total_after_social_insurance * (1.0 - params.fault_rate / 100.0);
        }
    }
    totals
}

/// Child-rearing cost per working parent, keyed by parent name.
///
/// Applies only when enabled and the supporter was under 18 at the incident.
pub fn child_rearing_costs(input: &CalculationInput, wages: &WageSchedule) -> BTreeMap<String, f64> {
    let params = &input.params;
    let mut costs = BTreeMap::new();

    let age_at_incident = fractional_age(input.supporter.birth, input.incident_date);
    if !params.training_enabled || age_at_incident >= TRAINING_AGE_LIMIT {
        return costs;
    }

    let base_monthly = training_base_monthly(input, wages, input.incident_date);
    let per_parent = base_monthly * 12.0 * params.training_rate * (TRAINING_AGE_LIMIT - age_at_incident);

    // Last entered father / mother counts
    let father = input.dependents.iter().rfind(|d| d.dep_type == DependentType::Father);
    let mother = input.dependents.iter().rfind(|d| d.dep_type == DependentType::Mother);

    let working = [
        father.filter(|_| params.father_working),
        mother.filter(|_| params.mother_working),
    ];
    for parent in working.into_iter().flatten() {
        costs.insert(parent.name().to_string(), per_parent);
    }
    costs
}

fn training_base_monthly(input: &CalculationInput, wages: &WageSchedule, on: NaiveDate) -> f64 {
    if input.params.training_base_monthly > 0.0 {
        input.params.training_base_monthly
    } else {
        wages.net_monthly(on, None)
    }
}
