//! Load case files (JSON) and dependent rosters (CSV)

use super::{Dependent, DependentType, Gender, Person};
use crate::error::LoadError;
use crate::input::{CalculationInput, IncomeMode, InputOverrides, Profile};
use chrono::NaiveDate;
use csv::Reader;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// On-disk representation of a case: facts, profile, and overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    pub incident_date: NaiveDate,
    pub valuation_date: NaiveDate,
    pub supporter: Person,
    pub income: IncomeMode,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub overrides: InputOverrides,
    #[serde(default)]
    pub dependents: Vec<Dependent>,
}

impl CaseFile {
    /// Append dependents from another source (e.g. a CSV roster)
    pub fn with_dependents(mut self, dependents: Vec<Dependent>) -> Self {
        self.dependents.extend(dependents);
        self
    }

    /// Resolve through the builder into a validated input
    pub fn into_input(self) -> Result<CalculationInput, LoadError> {
        let input = CalculationInput::builder(self.incident_date, self.valuation_date, self.supporter, self.income)
            .profile(self.profile)
            .overrides(self.overrides)
            .dependents(self.dependents)
            .build()?;
        Ok(input)
    }
}

/// Load a case file from a JSON path
pub fn load_case<P: AsRef<Path>>(path: P) -> Result<CaseFile, LoadError> {
    let file = File::open(path)?;
    load_case_from_reader(BufReader::new(file))
}

/// Load a case file from any reader (e.g. an HTTP body)
pub fn load_case_from_reader<R: std::io::Read>(reader: R) -> Result<CaseFile, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Raw CSV row of a dependent roster
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    birth: NaiveDate,
    gender: String,
    #[serde(rename = "type")]
    dep_type: String,
    #[serde(default)]
    is_student: bool,
    #[serde(default)]
    reduced_share: bool,
    #[serde(default)]
    remarriage_discount: Option<bool>,
    #[serde(default)]
    has_own_income: bool,
    #[serde(default)]
    custom_support_years: Option<f64>,
    #[serde(default)]
    custom_exit_date: Option<NaiveDate>,
}

impl CsvRow {
    fn to_dependent(self) -> Result<Dependent, LoadError> {
        let gender = parse_gender(&self.gender)?;
        let dep_type = parse_dependent_type(&self.dep_type)?;

        Ok(Dependent {
            person: Person::new(self.name, self.birth, gender),
            dep_type,
            is_student: self.is_student,
            reduced_share: self.reduced_share,
            remarriage_discount_eligible: self.remarriage_discount.unwrap_or(true),
            has_own_income: self.has_own_income,
            custom_support_years: self.custom_support_years,
            custom_exit_date: self.custom_exit_date,
        })
    }
}

fn parse_gender(raw: &str) -> Result<Gender, LoadError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "male" | "m" => Ok(Gender::Male),
        "female" | "f" => Ok(Gender::Female),
        _ => Err(LoadError::UnknownGender(raw.to_string())),
    }
}

fn parse_dependent_type(raw: &str) -> Result<DependentType, LoadError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "spouse" => Ok(DependentType::Spouse),
        "child" => Ok(DependentType::Child),
        "mother" => Ok(DependentType::Mother),
        "father" => Ok(DependentType::Father),
        "other" => Ok(DependentType::Other),
        _ => Err(LoadError::UnknownDependentType(raw.to_string())),
    }
}

/// Load a dependent roster from a CSV file
pub fn load_dependents<P: AsRef<Path>>(path: P) -> Result<Vec<Dependent>, LoadError> {
    let file = File::open(path)?;
    load_dependents_from_reader(file)
}

/// Load a dependent roster from any reader
pub fn load_dependents_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Dependent>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut dependents = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        dependents.push(row.to_dependent()?);
    }

    Ok(dependents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "\
name,birth,gender,type,is_student,reduced_share,remarriage_discount,has_own_income,custom_support_years,custom_exit_date
Ayse,1987-03-10,Female,Spouse,false,false,true,false,,
Mehmet,2015-01-01,Male,Child,true,false,,false,,
Fatma,1960-05-05,F,mother,false,true,,false,,2030-01-01
";

    #[test]
    fn test_load_roster() {
        let dependents = load_dependents_from_reader(ROSTER.as_bytes()).expect("roster should parse");
        assert_eq!(dependents.len(), 3);

        assert_eq!(dependents[0].dep_type, DependentType::Spouse);
        assert!(dependents[1].is_student);
        assert!(dependents[1].remarriage_discount_eligible);
        assert_eq!(dependents[2].dep_type, DependentType::Mother);
        assert_eq!(dependents[2].person.gender, Gender::Female);
        assert!(dependents[2].reduced_share);
        assert_eq!(dependents[2].custom_exit_date, NaiveDate::from_ymd_opt(2030, 1, 1));
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let roster = "name,birth,gender,type\nX,2000-01-01,Male,Cousin\n";
        let result = load_dependents_from_reader(roster.as_bytes());
        assert!(matches!(result, Err(LoadError::UnknownDependentType(_))));
    }

    #[test]
    fn test_case_file_into_input() {
        let json = r#"{
            "incident_date": "2020-01-01",
            "valuation_date": "2025-01-01",
            "supporter": {"name": "Ahmet", "birth": "1985-01-01", "gender": "Male"},
            "income": {"mode": "manual", "monthly_income": 4000.0},
            "profile": "court",
            "overrides": {"fault_rate": 20.0},
            "dependents": [
                {"person": {"name": "Ayse", "birth": "1987-03-10", "gender": "Female"}, "dep_type": "Spouse"}
            ]
        }"#;

        let case = load_case_from_reader(json.as_bytes()).expect("case should parse");
        let input = case.into_input().expect("case should validate");

        assert_eq!(input.profile, Profile::Court);
        assert_eq!(input.params.fault_rate, 20.0);
        assert_eq!(input.dependents.len(), 1);
        assert!(input.dependents[0].remarriage_discount_eligible);
    }

    #[test]
    fn test_invalid_case_surfaces_validation_error() {
        let json = r#"{
            "incident_date": "2020-01-01",
            "valuation_date": "2025-01-01",
            "supporter": {"name": "Ahmet", "birth": "1985-01-01", "gender": "Male"},
            "income": {"mode": "minimum_wage"},
            "overrides": {"fault_rate": 150.0}
        }"#;

        let case = load_case_from_reader(json.as_bytes()).unwrap();
        let err = case.into_input().unwrap_err();
        assert!(err.to_string().starts_with("fault_rate:"));
    }
}
