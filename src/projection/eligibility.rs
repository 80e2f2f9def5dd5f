//! Support windows for the supporter and each dependent

use chrono::NaiveDate;
use log::debug;

use super::interval::{add_years, fractional_age, SupportInterval};
use crate::assumptions::LifeTable;
use crate::case::{Dependent, DependentType, Gender, Person};
use crate::input::{CalculationInput, Parameters};

/// Expected death date: valuation date plus remaining life-years at the
/// (truncated) age reached on the valuation date
pub fn expected_death_date(person: &Person, valuation_date: NaiveDate, table: &LifeTable) -> NaiveDate {
    let age = fractional_age(person.birth, valuation_date).trunc() as i64;
    let remaining = table.life_expectancy(age, person.gender);
    add_years(valuation_date, remaining)
}

/// The supporter's window `[incident, expected death)`.
///
/// May be empty when the valuation falls on the incident date and no
/// life-years remain; every overlap with it is then zero.
pub fn supporter_window(input: &CalculationInput, table: &LifeTable) -> SupportInterval {
    let end = expected_death_date(&input.supporter, input.valuation_date, table);
    SupportInterval {
        start: input.incident_date,
        end: end.max(input.incident_date),
    }
}

/// Years from birth a child is supported for
pub fn child_support_years(dependent: &Dependent, params: &Parameters) -> f64 {
    if let Some(years) = dependent.custom_support_years {
        return years;
    }
    let threshold = if dependent.is_student {
        params.child_support_age_student
    } else {
        match dependent.person.gender {
            Gender::Female => params.child_support_age_female_non_student,
            Gender::Male => params.child_support_age_male,
        }
    };
    f64::from(threshold)
}

/// A dependent's window, or `None` when it is empty
pub fn dependent_window(
    dependent: &Dependent,
    input: &CalculationInput,
    table: &LifeTable,
    supporter: &SupportInterval,
) -> Option<SupportInterval> {
    let start = input.incident_date.max(dependent.person.birth);
    let own_death = expected_death_date(&dependent.person, input.valuation_date, table);

    let age_limit = match dependent.dep_type {
        DependentType::Child => Some(add_years(
            dependent.person.birth,
            child_support_years(dependent, &input.params),
        )),
        DependentType::Spouse | DependentType::Mother | DependentType::Father | DependentType::Other => None,
    };

    let end = [Some(own_death), age_limit, dependent.custom_exit_date, Some(supporter.end)]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(own_death);

    let window = SupportInterval::new(start, end);
    match &window {
        Some(w) => debug!("{} ({}): supported {} to {}", dependent.name(), dependent.dep_type.as_str(), w.start, w.end),
        None => debug!("{} ({}): no support window", dependent.name(), dependent.dep_type.as_str()),
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::LifeTableKind;
    use crate::input::IncomeMode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input_with(dependents: Vec<Dependent>) -> CalculationInput {
        CalculationInput::builder(
            date(2020, 1, 1),
            date(2025, 1, 1),
            Person::new("Ahmet", date(1985, 1, 1), Gender::Male),
            IncomeMode::manual(4_000.0),
        )
        .dependents(dependents)
        .build()
        .unwrap()
    }

    #[test]
    fn test_supporter_window_uses_life_expectancy_at_valuation() {
        let table = LifeTable::synthetic(LifeTableKind::Trh2010);
        let input = input_with(Vec::new());
        let window = supporter_window(&input, &table);

        // Age 40 at valuation, synthetic male: 38 years remaining
        assert_eq!(window.start, date(2020, 1, 1));
        assert_eq!(window.end, date(2063, 1, 1));
    }

    #[test]
    fn test_female_non_student_child_ages_out_at_threshold() {
        let table = LifeTable::synthetic(LifeTableKind::Trh2010);
        let child = Dependent::new(Person::new("Ela", date(2015, 1, 1), Gender::Female), DependentType::Child);
        let input = input_with(vec![child.clone()]);
        let supporter = supporter_window(&input, &table);

        let window = dependent_window(&child, &input, &table, &supporter).unwrap();
        assert_eq!(window.start, date(2020, 1, 1));
        assert_eq!(window.end, date(2037, 1, 1));
    }

    #[test]
    fn test_window_clipped_to_supporter() {
        let table = LifeTable::synthetic(LifeTableKind::Trh2010);
        let spouse = Dependent::new(Person::new("Ayse", date(1990, 1, 1), Gender::Female), DependentType::Spouse);
        let input = input_with(vec![spouse.clone()]);
        let supporter = supporter_window(&input, &table);

        let window = dependent_window(&spouse, &input, &table, &supporter).unwrap();
        assert_eq!(window.end, supporter.end);
    }

    #[test]
    fn test_child_born_after_incident_starts_at_birth() {
        let table = LifeTable::synthetic(LifeTableKind::Trh2010);
        let child = Dependent::new(Person::new("Can", date(2020, 6, 1), Gender::Male), DependentType::Child)
            .student(true);
        let input = input_with(vec![child.clone()]);
        let supporter = supporter_window(&input, &table);

        let window = dependent_window(&child, &input, &table, &supporter).unwrap();
        assert_eq!(window.start, date(2020, 6, 1));
        assert_eq!(window.end, date(2045, 6, 1));
    }

    #[test]
    fn test_custom_exit_before_start_yields_none() {
        let table = LifeTable::synthetic(LifeTableKind::Trh2010);
        let mother = Dependent::new(Person::new("Fatma", date(1960, 1, 1), Gender::Female), DependentType::Mother)
            .exit_on(date(2019, 6, 1));
        let input = input_with(vec![mother.clone()]);
        let supporter = supporter_window(&input, &table);

        assert!(dependent_window(&mother, &input, &table, &supporter).is_none());
    }

    #[test]
    fn test_custom_support_years_replace_threshold() {
        let params = Parameters::default();
        let child = Dependent::new(Person::new("Can", date(2010, 1, 1), Gender::Male), DependentType::Child)
            .support_years(20.5);
        assert_eq!(child_support_years(&child, &params), 20.5);

        let student = Dependent::new(Person::new("Ela", date(2010, 1, 1), Gender::Female), DependentType::Child)
            .student(true);
        assert_eq!(child_support_years(&student, &params), 25.0);
    }
}
