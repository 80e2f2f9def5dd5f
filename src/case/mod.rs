//! Case facts: the supporter, dependents, and case-file loading

mod data;
pub mod loader;

pub use data::{Person, Gender, Dependent, DependentType};
pub use loader::{load_case, load_case_from_reader, load_dependents, load_dependents_from_reader, CaseFile};
