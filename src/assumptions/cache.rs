//! Process-wide life-table cache
//!
//! Tables are static reference data: loaded on first use, never invalidated.
//! Two threads missing the same table at once may both load it; the first
//! insert wins and both see identical content.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use log::{info, warn};

use super::life_table::{LifeTable, LifeTableKind};
use super::loader::{load_life_table, DEFAULT_DATA_PATH, LIFE_TABLE_DIR};
use crate::case::Gender;

static GLOBAL_CACHE: OnceLock<Arc<LifeTableCache>> = OnceLock::new();

/// Read-mostly cache of life tables keyed by variant
#[derive(Debug)]
pub struct LifeTableCache {
    /// Directory holding the table CSVs; `None` always uses the synthetic curve
    dir: Option<PathBuf>,
    tables: RwLock<HashMap<LifeTableKind, Arc<LifeTable>>>,
}

impl LifeTableCache {
    /// Cache reading tables from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Cache with no backing data; every table is the synthetic fallback
    pub fn synthetic_only() -> Self {
        Self {
            dir: None,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// The shared instance reading `data/life_tables/`
    pub fn global() -> Arc<LifeTableCache> {
        GLOBAL_CACHE
            .get_or_init(|| Arc::new(LifeTableCache::new(Path::new(DEFAULT_DATA_PATH).join(LIFE_TABLE_DIR))))
            .clone()
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Load the given variants up front
    pub fn initialize(&self, kinds: &[LifeTableKind]) {
        for kind in kinds {
            self.table(*kind);
        }
    }

    /// Install a table directly, replacing any cached one
    pub fn preload(&self, table: LifeTable) {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables.insert(table.kind(), Arc::new(table));
    }

    /// Look up a variant, loading it on first use
    pub fn table(&self, kind: LifeTableKind) -> Arc<LifeTable> {
        {
            let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(table) = tables.get(&kind) {
                return Arc::clone(table);
            }
        }

        // Load outside the lock so lookups of other variants are not blocked
        let loaded = Arc::new(self.load(kind));

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(tables.entry(kind).or_insert(loaded))
    }

    /// Remaining life-years for `gender` at integer `age`
    pub fn life_expectancy(&self, age: i64, kind: LifeTableKind, gender: Gender) -> f64 {
        self.table(kind).life_expectancy(age, gender)
    }

    /// Number of variants currently cached
    pub fn len(&self) -> usize {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(&self, kind: LifeTableKind) -> LifeTable {
        let Some(dir) = &self.dir else {
            return LifeTable::synthetic(kind);
        };

        match load_life_table(dir, kind) {
            Ok(table) => {
                info!("Loaded life table {} ({} ages) from {}", kind.as_str(), table.len(), dir.display());
                table
            }
            Err(err) => {
                warn!(
                    "Life table {} unavailable in {} ({}); using synthetic approximation",
                    kind.as_str(),
                    dir.display(),
                    err
                );
                LifeTable::synthetic(kind)
            }
        }
    }
}

impl Default for LifeTableCache {
    fn default() -> Self {
        Self::new(Path::new(DEFAULT_DATA_PATH).join(LIFE_TABLE_DIR))
    }
}
