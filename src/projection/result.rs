//! Output structures of a calculation

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::interval::SupportInterval;

/// Which part of the support horizon a year belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodLabel {
    /// Anniversary before the valuation date
    Past,
    /// On or after valuation, through the active end age
    FutureActive,
    /// On or after valuation, past the active end age
    FuturePassive,
}

impl PeriodLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodLabel::Past => "past",
            PeriodLabel::FutureActive => "future_active",
            PeriodLabel::FuturePassive => "future_passive",
        }
    }
}

/// One calendar year of the projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    pub year: i32,
    /// Calendar age at the incident anniversary
    pub supporter_age: i32,
    pub period: PeriodLabel,
    /// Undiscounted, day-weighted support for the year
    pub gross_support: f64,
    pub present_value: f64,
    /// Party name to allocated amount
    pub shares: BTreeMap<String, f64>,
}

impl YearRow {
    pub fn share_total(&self) -> f64 {
        self.shares.values().sum()
    }

    pub fn share_of(&self, party: &str) -> f64 {
        self.shares.get(party).copied().unwrap_or(0.0)
    }
}

/// Full result of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub rows: Vec<YearRow>,

    /// Sum of present values, less any child-rearing cost
    pub total_support: f64,
    pub total_by_person: BTreeMap<String, f64>,

    /// Capital value of the social-insurance income (before the deduction fraction)
    pub social_insurance_deduction: f64,
    pub total_after_social_insurance: f64,
    /// Final compensation
    pub total_after_fault: f64,
    pub training_total: f64,

    pub supporter_start: NaiveDate,
    pub supporter_end: NaiveDate,
    /// `None` for dependents never eligible
    pub dependent_intervals: BTreeMap<String, Option<SupportInterval>>,
    pub virtual_intervals: BTreeMap<String, SupportInterval>,
}

impl CalculationResult {
    pub fn supporter_window(&self) -> SupportInterval {
        SupportInterval {
            start: self.supporter_start,
            end: self.supporter_end,
        }
    }

    /// Total for one party across all years
    pub fn total_for(&self, party: &str) -> f64 {
        self.total_by_person.get(party).copied().unwrap_or(0.0)
    }

    pub fn row(&self, year: i32) -> Option<&YearRow> {
        self.rows.iter().find(|r| r.year == year)
    }

    /// Every party that received a share in any year
    pub fn parties(&self) -> Vec<String> {
        let mut parties: Vec<String> = self
            .rows
            .iter()
            .flat_map(|r| r.shares.keys().cloned())
            .collect();
        parties.sort();
        parties.dedup();
        parties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, shares: &[(&str, f64)]) -> YearRow {
        YearRow {
            year,
            supporter_age: 40,
            period: PeriodLabel::FutureActive,
            gross_support: 100.0,
            present_value: 100.0,
            shares: shares.iter().map(|(n, a)| (n.to_string(), *a)).collect(),
        }
    }

    #[test]
    fn test_row_lookups() {
        let row = row(2030, &[("supporter", 60.0), ("Ayse", 40.0)]);
        assert_eq!(row.share_total(), 100.0);
        assert_eq!(row.share_of("Ayse"), 40.0);
        assert_eq!(row.share_of("nobody"), 0.0);
        assert_eq!(PeriodLabel::FuturePassive.as_str(), "future_passive");
    }

    #[test]
    fn test_parties_are_sorted_and_unique() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let result = CalculationResult {
            rows: vec![row(2020, &[("supporter", 1.0), ("Ela", 1.0)]), row(2021, &[("supporter", 1.0), ("Ayse", 1.0)])],
            total_support: 4.0,
            total_by_person: BTreeMap::new(),
            social_insurance_deduction: 0.0,
            total_after_social_insurance: 4.0,
            total_after_fault: 4.0,
            training_total: 0.0,
            supporter_start: start,
            supporter_end: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            dependent_intervals: BTreeMap::new(),
            virtual_intervals: BTreeMap::new(),
        };

        assert_eq!(result.parties(), vec!["Ayse", "Ela", "supporter"]);
        assert_eq!(result.row(2021).unwrap().year, 2021);
        assert!(result.row(2019).is_none());
        assert_eq!(result.total_for("Ayse"), 0.0);
        assert_eq!(result.supporter_window().start, start);
    }
}
