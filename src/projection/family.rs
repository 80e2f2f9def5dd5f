//! Hypothetical family of an unmarried supporter
//!
//! When no real spouse is entered and the marriage hypothesis is on, the
//! supporter is assumed to marry at the configured age and have two children
//! some years later. Each hypothetical party gets its own support window.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;

use super::interval::{add_years, SupportInterval};
use super::{HYPOTHETICAL_CHILDREN, HYPOTHETICAL_SPOUSE};
use crate::input::CalculationInput;

/// A hypothetical child and its support window
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualChild {
    pub label: &'static str,
    pub birth: NaiveDate,
    pub window: SupportInterval,
}

/// Hypothetical spouse and children; empty when the hypothesis does not apply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VirtualFamily {
    pub spouse: Option<SupportInterval>,
    pub children: Vec<VirtualChild>,
}

impl VirtualFamily {
    /// Whether the marriage hypothesis applies to this input
    pub fn applies(input: &CalculationInput) -> bool {
        input.params.assume_marriage_if_single && !input.has_real_spouse()
    }

    /// Derive the hypothetical family against the supporter's window
    pub fn hypothesize(input: &CalculationInput, supporter: &SupportInterval) -> Self {
        if !Self::applies(input) {
            return Self::default();
        }

        let params = &input.params;
        let birth = input.supporter.birth;
        let marriage_date = add_years(birth, f64::from(params.assumed_marriage_age));
        if marriage_date >= supporter.end {
            debug!("Hypothetical marriage on {} falls after the support window", marriage_date);
            return Self::default();
        }

        let spouse = SupportInterval::new(input.incident_date.max(marriage_date), supporter.end);

        let offsets = [params.assumed_child1_after_years, params.assumed_child2_after_years];
        let children = HYPOTHETICAL_CHILDREN
            .into_iter()
            .zip(offsets)
            .filter_map(|(label, after_years)| {
                let child_birth = add_years(birth, f64::from(params.assumed_marriage_age) + f64::from(after_years));
                let end = add_years(child_birth, f64::from(params.child_support_age_male)).min(supporter.end);
                let window = SupportInterval::new(input.incident_date.max(child_birth), end)?;
                Some(VirtualChild {
                    label,
                    birth: child_birth,
                    window,
                })
            })
            .collect::<Vec<_>>();

        debug!(
            "Hypothetical family: marriage {}, spouse {}, {} children",
            marriage_date,
            if spouse.is_some() { "active" } else { "none" },
            children.len()
        );

        Self { spouse, children }
    }

    pub fn is_empty(&self) -> bool {
        self.spouse.is_none() && self.children.is_empty()
    }

    /// Whether any hypothetical party overlaps calendar `year`
    pub fn any_active_in(&self, year: i32) -> bool {
        self.spouse.iter().any(|w| w.overlap_with_year(year) > 0)
            || self.children.iter().any(|c| c.window.overlap_with_year(year) > 0)
    }

    /// Windows keyed by label
    pub fn windows(&self) -> BTreeMap<String, SupportInterval> {
        let mut windows = BTreeMap::new();
        if let Some(spouse) = self.spouse {
            windows.insert(HYPOTHETICAL_SPOUSE.to_string(), spouse);
        }
        for child in &self.children {
            windows.insert(child.label.to_string(), child.window);
        }
        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Dependent, DependentType, Gender, Person};
    use crate::input::{IncomeMode, InputOverrides, Profile};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn single_supporter(birth: NaiveDate) -> CalculationInput {
        CalculationInput::builder(
            date(2020, 1, 1),
            date(2025, 1, 1),
            Person::new("Emre", birth, Gender::Male),
            IncomeMode::MinimumWage,
        )
        .profile(Profile::Court)
        .build()
        .unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> SupportInterval {
        SupportInterval::new(start, end).unwrap()
    }

    #[test]
    fn test_young_single_supporter_gets_family() {
        let input = single_supporter(date(2000, 1, 1));
        let supporter = window(date(2020, 1, 1), date(2078, 1, 1));
        let family = VirtualFamily::hypothesize(&input, &supporter);

        assert_eq!(family.spouse, Some(window(date(2025, 1, 1), date(2078, 1, 1))));
        assert_eq!(family.children.len(), 2);
        assert_eq!(family.children[0].birth, date(2027, 1, 1));
        assert_eq!(family.children[0].window, window(date(2027, 1, 1), date(2045, 1, 1)));
        assert_eq!(family.children[1].window, window(date(2029, 1, 1), date(2047, 1, 1)));

        assert!(family.any_active_in(2025));
        assert!(!family.any_active_in(2024));
        assert_eq!(family.windows().len(), 3);
    }

    #[test]
    fn test_already_past_marriage_age_starts_at_incident() {
        let input = single_supporter(date(1980, 1, 1));
        let supporter = window(date(2020, 1, 1), date(2058, 1, 1));
        let family = VirtualFamily::hypothesize(&input, &supporter);

        assert_eq!(family.spouse.unwrap().start, date(2020, 1, 1));
        // Children born 2007 and 2009 still under 18 at the incident
        assert_eq!(family.children[0].window, window(date(2020, 1, 1), date(2025, 1, 1)));
        assert_eq!(family.children[1].window, window(date(2020, 1, 1), date(2027, 1, 1)));
    }

    #[test]
    fn test_children_aged_out_are_dropped() {
        let input = single_supporter(date(1960, 1, 1));
        let supporter = window(date(2020, 1, 1), date(2040, 1, 1));
        let family = VirtualFamily::hypothesize(&input, &supporter);

        assert!(family.spouse.is_some());
        assert!(family.children.is_empty());
    }

    #[test]
    fn test_real_spouse_disables_hypothesis() {
        let spouse = Dependent::new(Person::new("Ayse", date(1999, 1, 1), Gender::Female), DependentType::Spouse);
        let input = CalculationInput::builder(
            date(2020, 1, 1),
            date(2025, 1, 1),
            Person::new("Emre", date(2000, 1, 1), Gender::Male),
            IncomeMode::MinimumWage,
        )
        .profile(Profile::Court)
        .dependent(spouse)
        .build()
        .unwrap();

        let supporter = window(date(2020, 1, 1), date(2078, 1, 1));
        assert!(VirtualFamily::hypothesize(&input, &supporter).is_empty());
    }

    #[test]
    fn test_hypothesis_can_be_switched_off() {
        let input = single_supporter(date(2000, 1, 1))
            .rebuild(&InputOverrides {
                assume_marriage_if_single: Some(false),
                ..Default::default()
            })
            .unwrap();
        let supporter = window(date(2020, 1, 1), date(2078, 1, 1));
        assert!(VirtualFamily::hypothesize(&input, &supporter).is_empty());
    }

    #[test]
    fn test_far_child_offsets_drop_children() {
        let input = single_supporter(date(2000, 1, 1))
            .rebuild(&InputOverrides {
                assumed_child1_after_years: Some(u32::MAX),
                assumed_child2_after_years: Some(u32::MAX),
                ..Default::default()
            })
            .unwrap();
        let supporter = window(date(2020, 1, 1), date(2078, 1, 1));
        let family = VirtualFamily::hypothesize(&input, &supporter);

        assert_eq!(family.spouse, Some(window(date(2025, 1, 1), date(2078, 1, 1))));
        assert!(family.children.is_empty());
    }
}
