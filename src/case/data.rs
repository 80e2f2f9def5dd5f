//! Person and dependent records as entered for a case

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Gender of a person, used for life-table and remarriage lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The other gender (used for the hypothetical spouse)
    pub fn opposite(&self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Relationship of a dependent to the supporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependentType {
    Spouse,
    Child,
    Mother,
    Father,
    Other,
}

impl DependentType {
    /// Mother or father: these draw from the parent pool
    pub fn is_parent(&self) -> bool {
        matches!(self, DependentType::Mother | DependentType::Father)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DependentType::Spouse => "Spouse",
            DependentType::Child => "Child",
            DependentType::Mother => "Mother",
            DependentType::Father => "Father",
            DependentType::Other => "Other",
        }
    }
}

/// Immutable personal facts. The name is for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub birth: NaiveDate,
    pub gender: Gender,
}

impl Person {
    pub fn new(name: impl Into<String>, birth: NaiveDate, gender: Gender) -> Self {
        Self {
            name: name.into(),
            birth,
            gender,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A person entitled to a share of the supporter's income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependent {
    pub person: Person,

    pub dep_type: DependentType,

    /// Children only: student threshold applies
    #[serde(default)]
    pub is_student: bool,

    /// Parents only: weight is halved
    #[serde(default)]
    pub reduced_share: bool,

    /// Spouse only: remarriage discount may be applied
    #[serde(default = "default_true")]
    pub remarriage_discount_eligible: bool,

    /// Whether this person has their own income (family allowance rules)
    #[serde(default)]
    pub has_own_income: bool,

    /// Children only: support duration in years from birth, replacing the age thresholds
    #[serde(default)]
    pub custom_support_years: Option<f64>,

    /// Exclusive last day of support, if cut short by the facts of the case
    #[serde(default)]
    pub custom_exit_date: Option<NaiveDate>,
}

impl Dependent {
    /// Create a dependent with all modifiers at their defaults
    pub fn new(person: Person, dep_type: DependentType) -> Self {
        Self {
            person,
            dep_type,
            is_student: false,
            reduced_share: false,
            remarriage_discount_eligible: true,
            has_own_income: false,
            custom_support_years: None,
            custom_exit_date: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.person.name
    }

    pub fn student(mut self, is_student: bool) -> Self {
        self.is_student = is_student;
        self
    }

    pub fn reduced(mut self, reduced_share: bool) -> Self {
        self.reduced_share = reduced_share;
        self
    }

    pub fn with_own_income(mut self, has_own_income: bool) -> Self {
        self.has_own_income = has_own_income;
        self
    }

    pub fn without_remarriage_discount(mut self) -> Self {
        self.remarriage_discount_eligible = false;
        self
    }

    pub fn support_years(mut self, years: f64) -> Self {
        self.custom_support_years = Some(years);
        self
    }

    pub fn exit_on(mut self, date: NaiveDate) -> Self {
        self.custom_exit_date = Some(date);
        self
    }
}
