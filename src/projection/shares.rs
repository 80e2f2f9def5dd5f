//! Share weights and normalization
//!
//! Base weights: supporter 2, spouse 2, child 1, parent 1 (0.5 when reduced),
//! other 1. A party's weight in a year is its base weight times the share of
//! the year it is supported for.

use std::collections::BTreeMap;

use crate::case::{Dependent, DependentType};

pub const SUPPORTER_WEIGHT: f64 = 2.0;
pub const SPOUSE_WEIGHT: f64 = 2.0;
pub const CHILD_WEIGHT: f64 = 1.0;
pub const PARENT_WEIGHT: f64 = 1.0;
pub const REDUCED_PARENT_WEIGHT: f64 = 0.5;
pub const OTHER_WEIGHT: f64 = 1.0;

/// Parents together never take more than this share of a year's value
/// while a spouse or child is supported
pub const PARENT_CAP: f64 = 0.25;

pub fn base_weight(dependent: &Dependent) -> f64 {
    match dependent.dep_type {
        DependentType::Spouse => SPOUSE_WEIGHT,
        DependentType::Child => CHILD_WEIGHT,
        DependentType::Mother | DependentType::Father => {
            if dependent.reduced_share {
                REDUCED_PARENT_WEIGHT
            } else {
                PARENT_WEIGHT
            }
        }
        DependentType::Other => OTHER_WEIGHT,
    }
}

/// Parents' base weight over the supporter's plus every real dependent's,
/// regardless of who is active in a given year
pub fn parent_fraction(dependents: &[Dependent]) -> f64 {
    let parents: f64 = dependents
        .iter()
        .filter(|d| d.dep_type.is_parent())
        .map(base_weight)
        .sum();
    let total = SUPPORTER_WEIGHT + dependents.iter().map(base_weight).sum::<f64>();

    if parents > 0.0 && total > 0.0 {
        parents / total
    } else {
        0.0
    }
}

/// Each weight over the sum of all weights; all zero when the sum is not positive
pub fn normalize(weights: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let total: f64 = weights.values().sum();
    weights
        .iter()
        .map(|(name, weight)| {
            let ratio = if total > 0.0 { weight / total } else { 0.0 };
            (name.clone(), ratio)
        })
        .collect()
}

/// Split `amount` across `weights` in proportion
pub fn split(amount: f64, weights: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    normalize(weights)
        .into_iter()
        .map(|(name, ratio)| (name, amount * ratio))
        .collect()
}
