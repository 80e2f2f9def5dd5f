//! Core engine: yearly allocation of support across the household
//!
//! For each calendar year the supporter is supported in:
//! 1. day-weighted gross support and its present value
//! 2. the parent pool (when kept separate), capped at 25% while a spouse or
//!    child is supported
//! 3. the remaining value split by weight among the supporter and the
//!    non-parent parties (parents too when the pool is shared, then capped)
//! 4. the remarriage discount on spouse shares
//!
//! Aggregate totals then go through the statutory adjustments.

use std::collections::BTreeMap;

use chrono::Datelike;
use log::{debug, info};

use super::adjustments::{apply_all, Totals};
use super::discount::DiscountCurve;
use super::eligibility::{dependent_window, supporter_window};
use super::family::VirtualFamily;
use super::income::IncomeModel;
use super::interval::{anniversary, calendar_age, fractional_age, mid_year, SupportInterval};
use super::result::{CalculationResult, PeriodLabel, YearRow};
use super::shares::{base_weight, parent_fraction, split, CHILD_WEIGHT, PARENT_CAP, SPOUSE_WEIGHT, SUPPORTER_WEIGHT};
use super::{HYPOTHETICAL_SPOUSE, SUPPORTER_PARTY};
use crate::assumptions::Assumptions;
use crate::case::{Dependent, DependentType};
use crate::error::ValidationError;
use crate::input::CalculationInput;

/// Tolerance before the shared-pool parent cap is enforced
const CAP_TOLERANCE: f64 = 1e-9;

/// A real dependent and the window derived for it
#[derive(Debug, Clone)]
struct Party<'a> {
    dependent: &'a Dependent,
    window: Option<SupportInterval>,
}

impl Party<'_> {
    fn year_fraction(&self, year: i32) -> f64 {
        self.window.map(|w| w.year_fraction(year)).unwrap_or(0.0)
    }

    fn name(&self) -> &str {
        self.dependent.name()
    }
}

/// Everything derived once per calculation and read every year
struct Household<'a> {
    input: &'a CalculationInput,
    supporter: SupportInterval,
    parties: Vec<Party<'a>>,
    family: VirtualFamily,
    parent_fraction: f64,
    discount: DiscountCurve,
    income: IncomeModel<'a>,
}

impl<'a> Household<'a> {
    fn parents<'s>(&'s self) -> impl Iterator<Item = &'s Party<'a>> + 's {
        self.parties.iter().filter(|p| p.dependent.dep_type.is_parent())
    }

    /// Whether a real or hypothetical spouse or child overlaps `year`
    fn spouse_or_child_active(&self, year: i32) -> bool {
        let real = self.parties.iter().any(|p| {
            matches!(p.dependent.dep_type, DependentType::Spouse | DependentType::Child) && p.year_fraction(year) > 0.0
        });
        real || self.family.any_active_in(year)
    }

    /// Weights of everyone sharing the non-parent pool this year
    fn shared_pool_weights(&self, year: i32, supporter_fraction: f64) -> BTreeMap<String, f64> {
        let separate_parents = self.input.params.separate_parent_pool;
        let mut weights = BTreeMap::new();
        weights.insert(SUPPORTER_PARTY.to_string(), SUPPORTER_WEIGHT * supporter_fraction);

        for party in &self.parties {
            let fraction = party.year_fraction(year);
            if fraction <= 0.0 {
                continue;
            }
            let weight = match party.dependent.dep_type {
                DependentType::Spouse | DependentType::Child => base_weight(party.dependent),
                DependentType::Mother | DependentType::Father if !separate_parents => base_weight(party.dependent),
                DependentType::Mother | DependentType::Father | DependentType::Other => continue,
            };
            *weights.entry(party.name().to_string()).or_insert(0.0) += weight * fraction;
        }

        if let Some(spouse) = &self.family.spouse {
            let fraction = spouse.year_fraction(year);
            if fraction > 0.0 {
                weights.insert(HYPOTHETICAL_SPOUSE.to_string(), SPOUSE_WEIGHT * fraction);
            }
        }
        for child in &self.family.children {
            let fraction = child.window.year_fraction(year);
            if fraction > 0.0 {
                weights.insert(child.label.to_string(), CHILD_WEIGHT * fraction);
            }
        }

        weights
    }
}

/// Main support engine
#[derive(Debug, Clone)]
pub struct SupportEngine {
    assumptions: Assumptions,
}

impl SupportEngine {
    /// Create an engine reading the given reference data
    pub fn new(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Run one calculation. Fails only on invalid input.
    pub fn compute(&self, input: &CalculationInput) -> Result<CalculationResult, ValidationError> {
        input.validate()?;

        let table = self.assumptions.life_tables.table(input.params.life_table);
        if table.is_synthetic() {
            debug!("Using synthetic {} life table", input.params.life_table.as_str());
        }

        let supporter = supporter_window(input, &table);
        let parties: Vec<Party> = input
            .dependents
            .iter()
            .map(|dependent| Party {
                dependent,
                window: dependent_window(dependent, input, &table, &supporter),
            })
            .collect();
        let family = VirtualFamily::hypothesize(input, &supporter);

        let household = Household {
            input,
            supporter,
            parties,
            family,
            parent_fraction: parent_fraction(&input.dependents),
            discount: DiscountCurve::from_params(&input.params),
            income: IncomeModel::new(input, &self.assumptions.wages),
        };

        let rows: Vec<YearRow> = (supporter.start.year()..=supporter.end.year())
            .filter_map(|year| self.calculate_year(&household, year))
            .collect();

        let total_support: f64 = rows.iter().map(|r| r.present_value).sum();
        let mut total_by_person: BTreeMap<String, f64> = BTreeMap::new();
        for row in &rows {
            for (party, amount) in &row.shares {
                *total_by_person.entry(party.clone()).or_insert(0.0) += amount;
            }
        }

        let totals = apply_all(Totals::new(total_support, total_by_person), input, &self.assumptions.wages);

        info!(
            "{}: {} years from {} to {}, total support {:.2}, after fault {:.2}",
            input.supporter.name,
            rows.len(),
            supporter.start,
            supporter.end,
            totals.total_support,
            totals.total_after_fault
        );

        Ok(CalculationResult {
            rows,
            total_support: totals.total_support,
            total_by_person: totals.total_by_person,
            social_insurance_deduction: totals.social_insurance_deduction,
            total_after_social_insurance: totals.total_after_social_insurance,
            total_after_fault: totals.total_after_fault,
            training_total: totals.training_total,
            supporter_start: supporter.start,
            supporter_end: supporter.end,
            dependent_intervals: household
                .parties
                .iter()
                .map(|p| (p.name().to_string(), p.window))
                .collect(),
            virtual_intervals: household.family.windows(),
        })
    }

    /// Allocate a single calendar year; `None` when the supporter is not supported in it
    fn calculate_year(&self, household: &Household, year: i32) -> Option<YearRow> {
        let input = household.input;
        let params = &input.params;

        let supporter_fraction = household.supporter.year_fraction(year);
        if supporter_fraction <= 0.0 {
            return None;
        }

        let gross_support = household.income.yearly_support(year) * supporter_fraction;
        let present_value = household
            .discount
            .present_value(gross_support, year, input.valuation_date.year());

        let parent_amounts = if params.separate_parent_pool {
            self.allocate_parent_pool(household, year, present_value)
        } else {
            BTreeMap::new()
        };
        let parent_total: f64 = parent_amounts.values().sum();
        let remaining = (present_value - parent_total).max(0.0);

        let mut shares = split(remaining, &household.shared_pool_weights(year, supporter_fraction));

        if !params.separate_parent_pool && params.parent_share_cap_enabled {
            let parents: Vec<&str> = household.parents().map(|p| p.name()).collect();
            cap_shared_pool_parents(&mut shares, &parents, present_value);
        }

        for (parent, amount) in parent_amounts {
            *shares.entry(parent).or_insert(0.0) += amount;
        }

        if params.apply_remarriage_discount {
            self.apply_remarriage_discount(household, year, &mut shares);
        }

        let reference = anniversary(year, input.incident_date);
        let period = if reference < input.valuation_date {
            PeriodLabel::Past
        } else if fractional_age(input.supporter.birth, reference) <= f64::from(params.active_end_age) {
            PeriodLabel::FutureActive
        } else {
            PeriodLabel::FuturePassive
        };

        debug!(
            "{}: fraction {:.4}, gross {:.2}, pv {:.2}, parents {:.2}",
            year, supporter_fraction, gross_support, present_value, parent_total
        );

        Some(YearRow {
            year,
            supporter_age: calendar_age(input.supporter.birth, reference),
            period,
            gross_support,
            present_value,
            shares,
        })
    }

    /// Separate parent pool: parents' base fraction of the year's value,
    /// capped while a spouse or child is supported, split by weight
    fn allocate_parent_pool(&self, household: &Household, year: i32, present_value: f64) -> BTreeMap<String, f64> {
        let weights: BTreeMap<String, f64> = household
            .parents()
            .filter_map(|p| {
                let fraction = p.year_fraction(year);
                (fraction > 0.0).then(|| (p.name().to_string(), base_weight(p.dependent) * fraction))
            })
            .collect();

        if weights.is_empty() || household.parent_fraction <= 0.0 {
            return BTreeMap::new();
        }

        let mut total = present_value * household.parent_fraction;
        if household.input.params.parent_share_cap_enabled && household.spouse_or_child_active(year) {
            total = total.min(present_value * PARENT_CAP);
        }

        if weights.len() == 1 {
            return weights.into_keys().map(|name| (name, total)).collect();
        }
        split(total, &weights)
    }

    /// Scale spouse shares by the remarriage factor; the reduction is not redistributed
    fn apply_remarriage_discount(&self, household: &Household, year: i32, shares: &mut BTreeMap<String, f64>) {
        let mid = mid_year(year);
        let remarriage = &self.assumptions.remarriage;

        let real_children = household
            .parties
            .iter()
            .filter(|p| p.dependent.dep_type == DependentType::Child && p.year_fraction(year) > 0.0)
            .filter(|p| fractional_age(p.dependent.person.birth, mid) < 18.0)
            .count();
        let virtual_children = household
            .family
            .children
            .iter()
            .filter(|c| c.window.overlap_with_year(year) > 0 && fractional_age(c.birth, mid) < 18.0)
            .count();
        let children_under_18 = real_children + virtual_children;

        for party in &household.parties {
            let dependent = party.dependent;
            if dependent.dep_type != DependentType::Spouse
                || !dependent.remarriage_discount_eligible
                || party.year_fraction(year) <= 0.0
            {
                continue;
            }
            let age = fractional_age(dependent.person.birth, mid).trunc() as i64;
            let factor = remarriage.factor(age, dependent.person.gender, children_under_18);
            if let Some(amount) = shares.get_mut(party.name()) {
                *amount *= factor;
            }
        }

        if let Some(spouse) = &household.family.spouse {
            if spouse.overlap_with_year(year) > 0 {
                let supporter = &household.input.supporter;
                let age = fractional_age(supporter.birth, mid).trunc() as i64;
                let factor = remarriage.factor(age, supporter.gender.opposite(), children_under_18);
                if let Some(amount) = shares.get_mut(HYPOTHETICAL_SPOUSE) {
                    *amount *= factor;
                }
            }
        }
    }
}

impl Default for SupportEngine {
    fn default() -> Self {
        Self::new(Assumptions::default_tables())
    }
}

/// Shared pool: cap the parents' combined share at 25% of the year's value
/// and scale everyone else up to fill the rest. Skipped when no one but the
/// parents holds a share.
fn cap_shared_pool_parents(shares: &mut BTreeMap<String, f64>, parents: &[&str], present_value: f64) {
    let is_parent = |name: &str| parents.iter().any(|p| *p == name);

    let parent_sum: f64 = shares.iter().filter(|(n, _)| is_parent(n)).map(|(_, a)| a).sum();
    let others_sum: f64 = shares.iter().filter(|(n, _)| !is_parent(n)).map(|(_, a)| a).sum();
    if parent_sum <= 0.0 || others_sum <= 0.0 {
        return;
    }

    let cap = present_value * PARENT_CAP;
    if parent_sum <= cap + CAP_TOLERANCE {
        return;
    }

    let parent_scale = cap / parent_sum;
    let others_scale = (present_value - cap) / others_sum;
    for (name, amount) in shares.iter_mut() {
        *amount *= if is_parent(name) { parent_scale } else { others_scale };
    }
}
