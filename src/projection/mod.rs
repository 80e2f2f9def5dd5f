//! Year-by-year support projection and allocation

mod adjustments;
mod discount;
mod eligibility;
mod engine;
mod family;
mod income;
mod interval;
mod result;
mod shares;

pub use adjustments::{apply_all as apply_adjustments, child_rearing_costs, social_insurance_capital_value, Adjustment, Totals, PIPELINE};
pub use discount::DiscountCurve;
pub use eligibility::{dependent_window, expected_death_date, supporter_window};
pub use engine::SupportEngine;
pub use family::{VirtualChild, VirtualFamily};
pub use income::IncomeModel;
pub use interval::{add_years, anniversary, calendar_age, fractional_age, span_ymd, SupportInterval, DAYS_PER_YEAR};
pub use result::{CalculationResult, PeriodLabel, YearRow};
pub use shares::{base_weight, normalize, parent_fraction, PARENT_CAP};

/// Share key of the supporter's own consumption
pub const SUPPORTER_PARTY: &str = "supporter";

pub const HYPOTHETICAL_SPOUSE: &str = "Hypothetical spouse";

pub const HYPOTHETICAL_CHILDREN: [&str; 2] = ["Hypothetical child 1", "Hypothetical child 2"];

/// Whether `name` collides with a computed party's share key
pub fn is_reserved_party_name(name: &str) -> bool {
    name == SUPPORTER_PARTY || name == HYPOTHETICAL_SPOUSE || HYPOTHETICAL_CHILDREN.contains(&name)
}
