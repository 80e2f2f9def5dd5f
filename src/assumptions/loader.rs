//! CSV-based reference data loader
//!
//! Loads life tables from `data/life_tables/` and an optional minimum-wage
//! schedule from `data/min_wage.csv`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use super::life_table::{LifeTable, LifeTableKind};
use super::wages::{WagePeriod, WageSchedule};
use crate::error::LoadError;

/// Default path to the reference data directory
pub const DEFAULT_DATA_PATH: &str = "data";

/// Life tables live in this subdirectory of the data directory
pub const LIFE_TABLE_DIR: &str = "life_tables";

/// Minimum-wage schedule file inside the data directory
pub const WAGE_SCHEDULE_FILE: &str = "min_wage.csv";

#[derive(Debug, Deserialize)]
struct LifeTableRow {
    age: i64,
    male_ex: f64,
    female_ex: f64,
}

#[derive(Debug, Deserialize)]
struct WageRow {
    start: NaiveDate,
    end: NaiveDate,
    gross_monthly: f64,
}

/// Load one life-table variant from `dir` (file name per [`LifeTableKind::file_name`])
pub fn load_life_table(dir: &Path, kind: LifeTableKind) -> Result<LifeTable, LoadError> {
    let file = File::open(dir.join(kind.file_name()))?;
    load_life_table_from_reader(file, kind)
}

/// Load a life table from `age,male_ex,female_ex` CSV records
pub fn load_life_table_from_reader<R: Read>(reader: R, kind: LifeTableKind) -> Result<LifeTable, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let row: LifeTableRow = result?;
        if row.male_ex < 0.0 || row.female_ex < 0.0 {
            return Err(LoadError::InvalidLifeTable {
                table: kind.as_str().to_string(),
                reason: format!("negative life expectancy at age {}", row.age),
            });
        }
        records.push((row.age, row.male_ex, row.female_ex));
    }

    if records.is_empty() {
        return Err(LoadError::InvalidLifeTable {
            table: kind.as_str().to_string(),
            reason: "no rows".to_string(),
        });
    }

    Ok(LifeTable::from_records(kind, records))
}

/// Load a minimum-wage schedule from a CSV file
pub fn load_wage_schedule(path: &Path) -> Result<WageSchedule, LoadError> {
    let file = File::open(path)?;
    load_wage_schedule_from_reader(file)
}

/// Load a minimum-wage schedule from `start,end,gross_monthly` CSV records
pub fn load_wage_schedule_from_reader<R: Read>(reader: R) -> Result<WageSchedule, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut periods = Vec::new();

    for result in csv_reader.deserialize() {
        let row: WageRow = result?;
        periods.push(WagePeriod {
            start: row.start,
            end: row.end,
            gross_monthly: row.gross_monthly,
        });
    }

    WageSchedule::new(periods)
}
