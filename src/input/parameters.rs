//! Tunable calculation parameters, calculation profiles, and override sets

use serde::{Deserialize, Serialize};

use crate::assumptions::LifeTableKind;

/// How income is modelled after the active period ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassiveIncomeModel {
    /// Net minimum wage for the year, without family allowance
    NetMinimumWage,
    /// Active-period monthly income times `passive_ratio`
    ActiveIncomeRatio,
}

/// Which rate discounts years after the valuation year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMethod {
    /// Progressive annuity: report discount rate
    Progressive,
    /// Classical actuarial: technical interest
    Actuarial,
}

/// Share of the social-insurance capital value deducted from the total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialInsuranceDeduction {
    None,
    /// Third-party liability: half the capital value
    Half,
    /// Employer liability: the full capital value
    Full,
}

impl SocialInsuranceDeduction {
    /// Fraction of the capital value deducted
    pub fn fraction(&self) -> f64 {
        match self {
            SocialInsuranceDeduction::None => 0.0,
            SocialInsuranceDeduction::Half => 0.5,
            SocialInsuranceDeduction::Full => 1.0,
        }
    }
}

/// Base parameter set a calculation starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Flexible expert mode: the plain defaults
    #[default]
    Expert,
    /// Conservative assumptions aligned with appellate case law
    Court,
}

impl Profile {
    /// Parameters this profile starts from
    pub fn base_parameters(&self) -> Parameters {
        let defaults = Parameters::default();
        match self {
            Profile::Expert => defaults,
            Profile::Court => Parameters {
                life_table: LifeTableKind::Trh2010,
                active_start_age: 18,
                active_end_age: 60,
                passive_ratio: 0.70,
                report_discount_rate: 0.0,
                assume_marriage_if_single: true,
                assumed_marriage_age: 25,
                assumed_child1_after_years: 2,
                assumed_child2_after_years: 4,
                parent_share_cap_enabled: true,
                ..defaults
            },
        }
    }
}

/// Every tunable of a calculation. Rates given as percentages are noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub life_table: LifeTableKind,

    pub active_start_age: u32,
    pub active_end_age: u32,
    pub passive_income: PassiveIncomeModel,
    pub passive_ratio: f64,

    pub child_support_age_male: u32,
    pub child_support_age_female_non_student: u32,
    pub child_support_age_student: u32,

    pub discount_method: DiscountMethod,
    /// Percent
    pub report_discount_rate: f64,
    /// Percent
    pub technical_interest: f64,

    pub separate_parent_pool: bool,
    /// Parents together never exceed 25% while a spouse or child is supported
    pub parent_share_cap_enabled: bool,

    pub social_insurance_monthly_income: f64,
    pub social_insurance_capital_factor: f64,
    pub social_insurance_deduction: SocialInsuranceDeduction,

    /// Percent, 0-100
    pub fault_rate: f64,

    pub apply_remarriage_discount: bool,

    pub training_enabled: bool,
    pub training_rate: f64,
    /// 0 means use the net minimum wage at the incident date
    pub training_base_monthly: f64,
    pub mother_working: bool,
    pub father_working: bool,

    pub military_enabled: bool,
    pub military_start_age: u32,
    pub military_duration_months: u32,

    pub assume_marriage_if_single: bool,
    pub assumed_marriage_age: u32,
    pub assumed_child1_after_years: u32,
    pub assumed_child2_after_years: u32,
    pub assumed_spouse_has_income: bool,

    pub use_family_allowance: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            life_table: LifeTableKind::Trh2010,
            active_start_age: 18,
            active_end_age: 60,
            passive_income: PassiveIncomeModel::ActiveIncomeRatio,
            passive_ratio: 0.70,
            child_support_age_male: 18,
            child_support_age_female_non_student: 22,
            child_support_age_student: 25,
            discount_method: DiscountMethod::Progressive,
            report_discount_rate: 0.0,
            technical_interest: 1.80,
            separate_parent_pool: true,
            parent_share_cap_enabled: true,
            social_insurance_monthly_income: 0.0,
            social_insurance_capital_factor: 12.0,
            social_insurance_deduction: SocialInsuranceDeduction::None,
            fault_rate: 0.0,
            apply_remarriage_discount: true,
            training_enabled: false,
            training_rate: 0.05,
            training_base_monthly: 0.0,
            mother_working: true,
            father_working: true,
            military_enabled: false,
            military_start_age: 20,
            military_duration_months: 12,
            assume_marriage_if_single: false,
            assumed_marriage_age: 25,
            assumed_child1_after_years: 2,
            assumed_child2_after_years: 4,
            assumed_spouse_has_income: false,
            use_family_allowance: true,
        }
    }
}

/// Explicit per-field overrides applied on top of a profile.
///
/// `None` keeps whatever the base parameter set says.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputOverrides {
    pub life_table: Option<LifeTableKind>,
    pub active_start_age: Option<u32>,
    pub active_end_age: Option<u32>,
    pub passive_income: Option<PassiveIncomeModel>,
    pub passive_ratio: Option<f64>,
    pub child_support_age_male: Option<u32>,
    pub child_support_age_female_non_student: Option<u32>,
    pub child_support_age_student: Option<u32>,
    pub discount_method: Option<DiscountMethod>,
    pub report_discount_rate: Option<f64>,
    pub technical_interest: Option<f64>,
    pub separate_parent_pool: Option<bool>,
    pub parent_share_cap_enabled: Option<bool>,
    pub social_insurance_monthly_income: Option<f64>,
    pub social_insurance_capital_factor: Option<f64>,
    pub social_insurance_deduction: Option<SocialInsuranceDeduction>,
    pub fault_rate: Option<f64>,
    pub apply_remarriage_discount: Option<bool>,
    pub training_enabled: Option<bool>,
    pub training_rate: Option<f64>,
    pub training_base_monthly: Option<f64>,
    pub mother_working: Option<bool>,
    pub father_working: Option<bool>,
    pub military_enabled: Option<bool>,
    pub military_start_age: Option<u32>,
    pub military_duration_months: Option<u32>,
    pub assume_marriage_if_single: Option<bool>,
    pub assumed_marriage_age: Option<u32>,
    pub assumed_child1_after_years: Option<u32>,
    pub assumed_child2_after_years: Option<u32>,
    pub assumed_spouse_has_income: Option<bool>,
    pub use_family_allowance: Option<bool>,
}

impl InputOverrides {
    /// Overlay these overrides on `base`, returning the merged set
    pub fn apply(&self, base: Parameters) -> Parameters {
        Parameters {
            life_table: self.life_table.unwrap_or(base.life_table),
            active_start_age: self.active_start_age.unwrap_or(base.active_start_age),
            active_end_age: self.active_end_age.unwrap_or(base.active_end_age),
            passive_income: self.passive_income.unwrap_or(base.passive_income),
            passive_ratio: self.passive_ratio.unwrap_or(base.passive_ratio),
            child_support_age_male: self.child_support_age_male.unwrap_or(base.child_support_age_male),
            child_support_age_female_non_student: self
                .child_support_age_female_non_student
                .unwrap_or(base.child_support_age_female_non_student),
            child_support_age_student: self.child_support_age_student.unwrap_or(base.child_support_age_student),
            discount_method: self.discount_method.unwrap_or(base.discount_method),
            report_discount_rate: self.report_discount_rate.unwrap_or(base.report_discount_rate),
            technical_interest: self.technical_interest.unwrap_or(base.technical_interest),
            separate_parent_pool: self.separate_parent_pool.unwrap_or(base.separate_parent_pool),
            parent_share_cap_enabled: self.parent_share_cap_enabled.unwrap_or(base.parent_share_cap_enabled),
            social_insurance_monthly_income: self
                .social_insurance_monthly_income
                .unwrap_or(base.social_insurance_monthly_income),
            social_insurance_capital_factor: self
                .social_insurance_capital_factor
                .unwrap_or(base.social_insurance_capital_factor),
            social_insurance_deduction: self.social_insurance_deduction.unwrap_or(base.social_insurance_deduction),
            fault_rate: self.fault_rate.unwrap_or(base.fault_rate),
            apply_remarriage_discount: self.apply_remarriage_discount.unwrap_or(base.apply_remarriage_discount),
            training_enabled: self.training_enabled.unwrap_or(base.training_enabled),
            training_rate: self.training_rate.unwrap_or(base.training_rate),
            training_base_monthly: self.training_base_monthly.unwrap_or(base.training_base_monthly),
            mother_working: self.mother_working.unwrap_or(base.mother_working),
            father_working: self.father_working.unwrap_or(base.father_working),
            military_enabled: self.military_enabled.unwrap_or(base.military_enabled),
            military_start_age: self.military_start_age.unwrap_or(base.military_start_age),
            military_duration_months: self.military_duration_months.unwrap_or(base.military_duration_months),
            assume_marriage_if_single: self.assume_marriage_if_single.unwrap_or(base.assume_marriage_if_single),
            assumed_marriage_age: self.assumed_marriage_age.unwrap_or(base.assumed_marriage_age),
            assumed_child1_after_years: self.assumed_child1_after_years.unwrap_or(base.assumed_child1_after_years),
            assumed_child2_after_years: self.assumed_child2_after_years.unwrap_or(base.assumed_child2_after_years),
            assumed_spouse_has_income: self.assumed_spouse_has_income.unwrap_or(base.assumed_spouse_has_income),
            use_family_allowance: self.use_family_allowance.unwrap_or(base.use_family_allowance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_court_profile_turns_on_marriage_hypothesis() {
        let expert = Profile::Expert.base_parameters();
        let court = Profile::Court.base_parameters();

        assert!(!expert.assume_marriage_if_single);
        assert!(court.assume_marriage_if_single);
        assert_eq!(court.assumed_marriage_age, 25);
        assert_eq!(court.life_table, LifeTableKind::Trh2010);
        // Untouched fields carry over from the defaults
        assert_eq!(court.technical_interest, expert.technical_interest);
    }

    #[test]
    fn test_overrides_win_over_profile() {
        let overrides = InputOverrides {
            assume_marriage_if_single: Some(false),
            fault_rate: Some(25.0),
            ..Default::default()
        };
        let params = overrides.apply(Profile::Court.base_parameters());

        assert!(!params.assume_marriage_if_single);
        assert_eq!(params.fault_rate, 25.0);
        assert_eq!(params.assumed_marriage_age, 25);
    }

    #[test]
    fn test_overrides_deserialize_sparse() {
        let overrides: InputOverrides =
            serde_json::from_str(r#"{"passive_ratio": 0.4, "discount_method": "actuarial"}"#).unwrap();
        assert_eq!(overrides.passive_ratio, Some(0.4));
        assert_eq!(overrides.discount_method, Some(DiscountMethod::Actuarial));
        assert!(overrides.fault_rate.is_none());
    }

    #[test]
    fn test_deduction_fractions() {
        assert_eq!(SocialInsuranceDeduction::None.fraction(), 0.0);
        assert_eq!(SocialInsuranceDeduction::Half.fraction(), 0.5);
        assert_eq!(SocialInsuranceDeduction::Full.fraction(), 1.0);
    }
}
