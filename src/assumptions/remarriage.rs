//! Remarriage probability table for surviving spouses
//!
//! Base probabilities (percent) are banded by age and differ by gender; every
//! child under 18 lowers the probability by 5 points.

use crate::case::Gender;

/// Percentage points removed per dependent child under 18
pub const CHILD_REDUCTION_POINTS: f64 = 5.0;

/// (min age, max age inclusive, female %, male %)
const BANDS: [(i64, i64, f64, f64); 7] = [
    (17, 20, 52.0, 90.0),
    (21, 25, 40.0, 70.0),
    (26, 30, 27.0, 48.0),
    (31, 35, 17.0, 30.0),
    (36, 40, 9.0, 15.0),
    (41, 50, 2.0, 4.0),
    (51, 55, 1.0, 2.0),
];

/// Age and gender banded remarriage probabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemarriageTable;

impl RemarriageTable {
    /// Base remarriage probability in percent, 0 outside the table
    pub fn base_percentage(&self, age: i64, gender: Gender) -> f64 {
        BANDS
            .iter()
            .find(|(min, max, _, _)| (*min..=*max).contains(&age))
            .map(|&(_, _, female, male)| match gender {
                Gender::Female => female,
                Gender::Male => male,
            })
            .unwrap_or(0.0)
    }

    /// Multiplier applied to a spouse's yearly share
    pub fn factor(&self, age: i64, gender: Gender, children_under_18: usize) -> f64 {
        let adjusted =
            (self.base_percentage(age, gender) - CHILD_REDUCTION_POINTS * children_under_18 as f64).max(0.0);
        1.0 - adjusted / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_band_lookup() {
        let table = RemarriageTable;
        assert_relative_eq!(table.base_percentage(17, Gender::Female), 52.0);
        assert_relative_eq!(table.base_percentage(25, Gender::Male), 70.0);
        assert_relative_eq!(table.base_percentage(33, Gender::Female), 17.0);
        assert_relative_eq!(table.base_percentage(55, Gender::Male), 2.0);
        assert_relative_eq!(table.base_percentage(56, Gender::Female), 0.0);
        assert_relative_eq!(table.base_percentage(16, Gender::Male), 0.0);
    }

    #[test]
    fn test_decreasing_with_age() {
        let table = RemarriageTable;
        for gender in [Gender::Male, Gender::Female] {
            for age in 18..70 {
                assert!(table.base_percentage(age, gender) <= table.base_percentage(age - 1, gender));
            }
        }
    }

    #[test]
    fn test_children_reduce_discount() {
        let table = RemarriageTable;
        assert_relative_eq!(table.factor(28, Gender::Female, 0), 0.73);
        assert_relative_eq!(table.factor(28, Gender::Female, 2), 0.83);
        // Floored: 9 - 5*3 < 0
        assert_relative_eq!(table.factor(38, Gender::Female, 3), 1.0);
        assert_relative_eq!(table.factor(70, Gender::Male, 0), 1.0);
    }
}
