//! Data-level summaries of a calculation for presentation layers
//!
//! Nothing here formats currency or dates for display. Phases and person
//! summaries carry raw values; the yearly export writes plain CSV.

use std::cmp::Ordering;
use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::input::CalculationInput;
use crate::projection::{add_years, span_ymd, CalculationResult, SupportInterval, SUPPORTER_PARTY};

/// One stretch of the supporter's window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phase {
    /// `None` when the phase is empty
    pub window: Option<SupportInterval>,
    pub days: i64,
    pub years: i32,
    pub months: i32,
    pub day_part: i32,
}

impl Phase {
    fn between(start: NaiveDate, end: NaiveDate) -> Self {
        match SupportInterval::new(start, end) {
            Some(window) => {
                let (years, months, day_part) = span_ymd(window.start, window.end);
                Self {
                    window: Some(window),
                    days: window.days(),
                    years,
                    months,
                    day_part,
                }
            }
            None => Self {
                window: None,
                days: 0,
                years: 0,
                months: 0,
                day_part: 0,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_none()
    }
}

/// The supporter's window split at the valuation date and the active end age
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupporterPhases {
    pub total: Phase,
    pub past: Phase,
    pub future_active: Phase,
    pub future_passive: Phase,
}

impl SupporterPhases {
    pub fn new(input: &CalculationInput, result: &CalculationResult) -> Self {
        let start = result.supporter_start;
        let end = result.supporter_end;
        let birth = input.supporter.birth;
        let active_start = add_years(birth, f64::from(input.params.active_start_age));
        let active_end = add_years(birth, f64::from(input.params.active_end_age));

        Self {
            total: Phase::between(start, end),
            past: Phase::between(start.max(input.incident_date), end.min(input.valuation_date)),
            future_active: Phase::between(
                start.max(input.valuation_date).max(active_start),
                end.min(active_end),
            ),
            future_passive: Phase::between(start.max(input.valuation_date).max(active_end), end),
        }
    }
}

/// One party's total with the window it was supported over
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonSummary {
    /// Display label; the supporter's own share carries the supporter's name
    pub label: String,
    pub party: String,
    pub amount: f64,
    pub window: Option<SupportInterval>,
    pub days: i64,
    pub years: i32,
    pub months: i32,
    pub day_part: i32,
}

/// Per-party totals, largest first
pub fn person_summaries(input: &CalculationInput, result: &CalculationResult) -> Vec<PersonSummary> {
    let mut summaries: Vec<PersonSummary> = result
        .total_by_person
        .iter()
        .map(|(party, amount)| {
            let (label, window) = if party == SUPPORTER_PARTY {
                (input.supporter.name.clone(), Some(result.supporter_window()))
            } else if let Some(window) = result.dependent_intervals.get(party) {
                (party.clone(), *window)
            } else {
                (party.clone(), result.virtual_intervals.get(party).copied())
            };
            let phase = window
                .map(|w| Phase::between(w.start, w.end))
                .unwrap_or_else(|| Phase::between(result.supporter_start, result.supporter_start));

            PersonSummary {
                label,
                party: party.clone(),
                amount: *amount,
                window,
                days: phase.days,
                years: phase.years,
                months: phase.months,
                day_part: phase.day_part,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });
    summaries
}

/// Write one CSV row per year with a column per party
pub fn write_yearly_csv<W: Write>(writer: W, result: &CalculationResult) -> Result<(), csv::Error> {
    let parties = result.parties();
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![
        "year".to_string(),
        "supporter_age".to_string(),
        "period".to_string(),
        "gross_support".to_string(),
        "present_value".to_string(),
    ];
    header.extend(parties.iter().cloned());
    csv_writer.write_record(&header)?;

    for row in &result.rows {
        let mut record = vec![
            row.year.to_string(),
            row.supporter_age.to_string(),
            row.period.as_str().to_string(),
            format!("{:.2}", row.gross_support),
            format!("{:.2}", row.present_value),
        ];
        record.extend(parties.iter().map(|p| format!("{:.2}", row.share_of(p))));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::Assumptions;
    use crate::case::{Dependent, DependentType, Gender, Person};
    use crate::input::IncomeMode;
    use crate::projection::SupportEngine;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn computed() -> (CalculationInput, CalculationResult) {
        let input = CalculationInput::builder(
            date(2020, 1, 1),
            date(2025, 1, 1),
            Person::new("Ahmet", date(1985, 1, 1), Gender::Male),
            IncomeMode::manual(4_000.0),
        )
        .dependent(Dependent::new(Person::new("Ela", date(2015, 1, 1), Gender::Female), DependentType::Child))
        .build()
        .unwrap();
        let result = SupportEngine::new(Assumptions::synthetic()).compute(&input).unwrap();
        (input, result)
    }

    #[test]
    fn test_supporter_phases() {
        let (input, result) = computed();
        let phases = SupporterPhases::new(&input, &result);

        assert_eq!(phases.total.window.unwrap().end, date(2063, 1, 1));
        assert_eq!((phases.total.years, phases.total.months, phases.total.day_part), (43, 0, 0));

        assert_eq!(phases.past.window.unwrap().end, date(2025, 1, 1));
        assert_eq!(phases.past.days, 1827);
        assert_eq!(phases.past.years, 5);

        let active = phases.future_active.window.unwrap();
        assert_eq!((active.start, active.end), (date(2025, 1, 1), date(2045, 1, 1)));
        let passive = phases.future_passive.window.unwrap();
        assert_eq!((passive.start, passive.end), (date(2045, 1, 1), date(2063, 1, 1)));

        assert_eq!(
            phases.past.days + phases.future_active.days + phases.future_passive.days,
            phases.total.days
        );
    }

    #[test]
    fn test_person_summaries_sorted_and_labelled() {
        let (input, result) = computed();
        let summaries = person_summaries(&input, &result);

        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].amount >= summaries[1].amount);

        let supporter = summaries.iter().find(|s| s.party == SUPPORTER_PARTY).unwrap();
        assert_eq!(supporter.label, "Ahmet");
        assert_eq!(supporter.window, Some(result.supporter_window()));

        let child = summaries.iter().find(|s| s.party == "Ela").unwrap();
        assert_eq!(child.window.unwrap().end, date(2037, 1, 1));
        assert_eq!(child.years, 17);
    }

    #[test]
    fn test_yearly_csv_layout() {
        let (_, result) = computed();
        let mut buffer = Vec::new();
        write_yearly_csv(&mut buffer, &result).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "year,supporter_age,period,gross_support,present_value,Ela,supporter"
        );
        assert_eq!(lines.next().unwrap().split(',').next().unwrap(), "2020");
        assert_eq!(text.lines().count(), result.rows.len() + 1);
        assert!(text.contains(",past,"));
        assert!(text.contains(",future_passive,"));
    }
}
