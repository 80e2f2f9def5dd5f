//! The supporter's income for a year
//!
//! Yearly support before day-weighting: zero during military service (male
//! supporters, when enabled) and before the active start age, twelve monthly
//! incomes through the active end age, then the passive model.

use chrono::NaiveDate;

use super::interval::{anniversary, fractional_age};
use crate::assumptions::{FamilyStatus, WageSchedule};
use crate::case::{DependentType, Gender};
use crate::input::{CalculationInput, IncomeMode, PassiveIncomeModel};

/// Income rules bound to one input and wage schedule
#[derive(Debug, Clone, Copy)]
pub struct IncomeModel<'a> {
    input: &'a CalculationInput,
    wages: &'a WageSchedule,
}

impl<'a> IncomeModel<'a> {
    pub fn new(input: &'a CalculationInput, wages: &'a WageSchedule) -> Self {
        Self { input, wages }
    }

    /// Family facts at `date` for the family allowance.
    ///
    /// Real children count only once born. Hypothetical children count only
    /// while the marriage hypothesis applies, i.e. with no real spouse.
    pub fn family_status(&self, date: NaiveDate) -> FamilyStatus {
        let input = self.input;
        let params = &input.params;
        let supporter_age = fractional_age(input.supporter.birth, date);

        let real_spouse = input.dependents.iter().rfind(|d| d.dep_type == DependentType::Spouse);
        let hypothesis = params.assume_marriage_if_single && real_spouse.is_none();

        let (married, spouse_has_income) = match real_spouse {
            Some(spouse) => (true, spouse.has_own_income),
            None if hypothesis && supporter_age >= f64::from(params.assumed_marriage_age) => {
                (true, params.assumed_spouse_has_income)
            }
            None => (false, false),
        };

        let under_18 = |age: f64| (0.0..18.0).contains(&age);

        let real_children = input
            .dependents
            .iter()
            .filter(|d| d.dep_type == DependentType::Child && d.person.birth <= date)
            .filter(|d| under_18(fractional_age(d.person.birth, date)))
            .count();

        let virtual_children = if hypothesis {
            [params.assumed_child1_after_years, params.assumed_child2_after_years]
                .into_iter()
                .map(|after| supporter_age - (f64::from(params.assumed_marriage_age) + f64::from(after)))
                .filter(|age| under_18(*age))
                .count()
        } else {
            0
        };

        FamilyStatus {
            married,
            spouse_has_income,
            child_count: (real_children + virtual_children) as u32,
        }
    }

    /// Net monthly income at `date` under the input's income mode
    pub fn monthly_income(&self, date: NaiveDate) -> f64 {
        match &self.input.income {
            IncomeMode::MinimumWage => {
                let status = self.input.params.use_family_allowance.then(|| self.family_status(date));
                self.wages.net_monthly(date, status.as_ref())
            }
            IncomeMode::Manual {
                monthly_income,
                regular_extra_income,
            } => monthly_income + regular_extra_income,
        }
    }

    /// Whether the supporter is in the excluded military-service window at `age`
    pub fn in_military_service(&self, age: f64) -> bool {
        let params = &self.input.params;
        if !params.military_enabled || self.input.supporter.gender != Gender::Male {
            return false;
        }
        let start = f64::from(params.military_start_age);
        let end = start + f64::from(params.military_duration_months) / 12.0;
        (start..end).contains(&age)
    }

    /// Support for a full calendar `year`, assessed at the incident anniversary
    pub fn yearly_support(&self, year: i32) -> f64 {
        let params = &self.input.params;
        let date = anniversary(year, self.input.incident_date);
        let age = fractional_age(self.input.supporter.birth, date);

        if self.in_military_service(age) {
            return 0.0;
        }
        if age < f64::from(params.active_start_age) {
            return 0.0;
        }
        if age <= f64::from(params.active_end_age) {
            return 12.0 * self.monthly_income(date);
        }

        match params.passive_income {
            PassiveIncomeModel::NetMinimumWage => 12.0 * self.wages.net_monthly(date, None),
            PassiveIncomeModel::ActiveIncomeRatio => 12.0 * self.monthly_income(date) * params.passive_ratio,
        }
    }
}
