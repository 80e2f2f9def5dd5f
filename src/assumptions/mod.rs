//! Reference data: life tables, minimum wages, remarriage probabilities

mod cache;
mod life_table;
mod remarriage;
mod wages;
pub mod loader;

pub use cache::LifeTableCache;
pub use life_table::{LifeTable, LifeTableKind, MAX_TABLE_AGE};
pub use remarriage::RemarriageTable;
pub use wages::{FamilyStatus, WagePeriod, WageSchedule};

use std::path::Path;
use std::sync::Arc;

use log::info;

use crate::error::LoadError;

/// Container for all reference data a calculation reads
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub life_tables: Arc<LifeTableCache>,
    pub wages: Arc<WageSchedule>,
    pub remarriage: RemarriageTable,
}

impl Assumptions {
    /// Process-wide life-table cache and the built-in wage schedule
    pub fn default_tables() -> Self {
        Self {
            life_tables: LifeTableCache::global(),
            wages: Arc::new(WageSchedule::builtin()),
            remarriage: RemarriageTable,
        }
    }

    /// Load from a data directory (`life_tables/` and an optional `min_wage.csv`)
    pub fn from_data_dir(path: &Path) -> Result<Self, LoadError> {
        let wage_path = path.join(loader::WAGE_SCHEDULE_FILE);
        let wages = if wage_path.exists() {
            let schedule = loader::load_wage_schedule(&wage_path)?;
            info!("Loaded {} wage periods from {}", schedule.periods().len(), wage_path.display());
            schedule
        } else {
            WageSchedule::builtin()
        };

        Ok(Self {
            life_tables: Arc::new(LifeTableCache::new(path.join(loader::LIFE_TABLE_DIR))),
            wages: Arc::new(wages),
            remarriage: RemarriageTable,
        })
    }

    /// Built-in wages with synthetic life tables only; no file access
    pub fn synthetic() -> Self {
        Self {
            life_tables: Arc::new(LifeTableCache::synthetic_only()),
            wages: Arc::new(WageSchedule::builtin()),
            remarriage: RemarriageTable,
        }
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_tables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::Gender;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_data_dir_without_files() {
        let dir = std::env::temp_dir().join(format!("los-assumptions-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let assumptions = Assumptions::from_data_dir(&dir).unwrap();
        assert_eq!(*assumptions.wages, WageSchedule::builtin());
        assert!(assumptions.life_tables.table(LifeTableKind::Trh2010).is_synthetic());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_from_data_dir_with_wages() {
        let dir = std::env::temp_dir().join(format!("los-assumptions-wages-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("min_wage.csv"),
            "start,end,gross_monthly\n2000-01-01,2100-01-01,1000.0\n",
        )
        .unwrap();

        let assumptions = Assumptions::from_data_dir(&dir).unwrap();
        assert_eq!(assumptions.wages.periods().len(), 1);
        assert_relative_eq!(
            assumptions.life_tables.life_expectancy(0, LifeTableKind::Pmf1931, Gender::Female),
            73.0
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
