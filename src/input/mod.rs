//! The immutable calculation input and its builder
//!
//! A `CalculationInput` is assembled once: a base `Profile` supplies the
//! parameter set, an explicit `InputOverrides` is laid over it, and the
//! result is validated. Nothing is changed in place afterwards; variants
//! are derived with [`CalculationInput::rebuild`].

mod parameters;

pub use parameters::{
    DiscountMethod, InputOverrides, Parameters, PassiveIncomeModel, Profile, SocialInsuranceDeduction,
};

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::case::{Dependent, Person};
use crate::error::ValidationError;
use crate::projection::is_reserved_party_name;

/// Where the supporter's monthly income comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum IncomeMode {
    /// Net statutory minimum wage for each year
    MinimumWage,
    /// Declared net monthly income plus regular extras
    Manual {
        monthly_income: f64,
        #[serde(default)]
        regular_extra_income: f64,
    },
}

impl IncomeMode {
    pub fn manual(monthly_income: f64) -> Self {
        IncomeMode::Manual {
            monthly_income,
            regular_extra_income: 0.0,
        }
    }
}

/// Complete, validated parameter bundle for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub incident_date: NaiveDate,
    pub valuation_date: NaiveDate,
    pub supporter: Person,
    pub income: IncomeMode,
    pub profile: Profile,
    pub params: Parameters,
    pub dependents: Vec<Dependent>,
}

impl CalculationInput {
    /// Start building an input from the case facts that have no default
    pub fn builder(
        incident_date: NaiveDate,
        valuation_date: NaiveDate,
        supporter: Person,
        income: IncomeMode,
    ) -> CalculationInputBuilder {
        CalculationInputBuilder {
            incident_date,
            valuation_date,
            supporter,
            income,
            profile: Profile::default(),
            overrides: InputOverrides::default(),
            dependents: Vec::new(),
        }
    }

    /// Derive a new input with `overrides` laid over the current parameters
    pub fn rebuild(&self, overrides: &InputOverrides) -> Result<Self, ValidationError> {
        let derived = Self {
            params: overrides.apply(self.params.clone()),
            ..self.clone()
        };
        derived.validate()?;
        Ok(derived)
    }

    /// Check the invariants every calculation relies on
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.valuation_date < self.incident_date {
            return Err(ValidationError::ValuationBeforeIncident {
                incident: self.incident_date,
                valuation: self.valuation_date,
            });
        }

        if self.supporter.birth >= self.incident_date {
            return Err(ValidationError::SupporterBornAfterIncident {
                birth: self.supporter.birth,
                incident: self.incident_date,
            });
        }

        // Written as a containment check so NaN is rejected too
        if !(0.0..=100.0).contains(&self.params.fault_rate) {
            return Err(ValidationError::FaultRateOutOfRange(self.params.fault_rate));
        }

        if !(self.params.report_discount_rate >= 0.0) {
            return Err(ValidationError::NegativeReportDiscountRate(self.params.report_discount_rate));
        }

        if !(self.params.technical_interest >= 0.0) {
            return Err(ValidationError::NegativeTechnicalInterest(self.params.technical_interest));
        }

        let mut seen = HashSet::new();
        for dependent in &self.dependents {
            let name = dependent.name();
            if is_reserved_party_name(name) {
                return Err(ValidationError::ReservedDependentName(name.to_string()));
            }
            if !seen.insert(name) {
                return Err(ValidationError::DuplicateDependentName(name.to_string()));
            }
        }

        Ok(())
    }

    /// Whether any real spouse was entered
    pub fn has_real_spouse(&self) -> bool {
        self.dependents
            .iter()
            .any(|d| matches!(d.dep_type, crate::case::DependentType::Spouse))
    }
}

/// Builder for [`CalculationInput`]: profile first, then overrides
#[derive(Debug, Clone)]
pub struct CalculationInputBuilder {
    incident_date: NaiveDate,
    valuation_date: NaiveDate,
    supporter: Person,
    income: IncomeMode,
    profile: Profile,
    overrides: InputOverrides,
    dependents: Vec<Dependent>,
}

impl CalculationInputBuilder {
    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn overrides(mut self, overrides: InputOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn dependent(mut self, dependent: Dependent) -> Self {
        self.dependents.push(dependent);
        self
    }

    pub fn dependents(mut self, dependents: impl IntoIterator<Item = Dependent>) -> Self {
        self.dependents.extend(dependents);
        self
    }

    /// Resolve the parameter set and validate
    pub fn build(self) -> Result<CalculationInput, ValidationError> {
        let params = self.overrides.apply(self.profile.base_parameters());
        let input = CalculationInput {
            incident_date: self.incident_date,
            valuation_date: self.valuation_date,
            supporter: self.supporter,
            income: self.income,
            profile: self.profile,
            params,
            dependents: self.dependents,
        };
        input.validate()?;
        Ok(input)
    }
}
