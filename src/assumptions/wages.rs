//! Minimum-wage schedule and net-wage rules
//!
//! Gross minimum wages are kept as an ordered list of half-open `[start, end)`
//! periods, the last one running to a far-future sentinel. Net wages follow
//! the deduction rules of the era: up to 2021 income tax and stamp duty apply
//! (income tax reduced by the family allowance), from 2022 on only the
//! employee's social-insurance and unemployment contributions are deducted.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Employee social-insurance contribution
pub const SOCIAL_INSURANCE_RATE: f64 = 0.14;
/// Employee unemployment-insurance contribution
pub const UNEMPLOYMENT_RATE: f64 = 0.01;
/// Income tax on the post-contribution base
pub const INCOME_TAX_RATE: f64 = 0.15;
/// Stamp duty on gross
pub const STAMP_DUTY_RATE: f64 = 0.00759;

/// First year the family allowance applies
pub const ALLOWANCE_FIRST_YEAR: i32 = 2008;
/// From this year on, minimum wage is exempt from income tax and stamp duty
pub const TAX_EXEMPT_FROM_YEAR: i32 = 2022;

/// Built-in schedule: (start, end, gross monthly), dates as (year, month)
const BUILTIN_PERIODS: &[((i32, u32), (i32, u32), f64)] = &[
    ((2008, 1), (2008, 7), 608.40),
    ((2008, 7), (2009, 1), 638.70),
    ((2009, 1), (2009, 7), 666.00),
    ((2009, 7), (2010, 1), 693.00),
    ((2010, 1), (2010, 7), 729.00),
    ((2010, 7), (2011, 1), 760.50),
    ((2011, 1), (2011, 7), 796.50),
    ((2011, 7), (2012, 1), 837.00),
    ((2012, 1), (2012, 7), 886.50),
    ((2012, 7), (2013, 1), 940.50),
    ((2013, 1), (2013, 7), 978.60),
    ((2013, 7), (2014, 1), 1021.50),
    ((2014, 1), (2014, 7), 1071.00),
    ((2014, 7), (2015, 1), 1134.00),
    ((2015, 1), (2015, 7), 1201.50),
    ((2015, 7), (2016, 1), 1273.50),
    ((2016, 1), (2017, 1), 1647.00),
    ((2017, 1), (2018, 1), 1777.50),
    ((2018, 1), (2019, 1), 2029.50),
    ((2019, 1), (2020, 1), 2558.40),
    ((2020, 1), (2021, 1), 2943.00),
    ((2021, 1), (2022, 1), 3577.50),
    ((2022, 1), (2022, 7), 5004.00),
    ((2022, 7), (2023, 1), 6471.00),
    ((2023, 1), (2023, 7), 10008.00),
    ((2023, 7), (2024, 1), 13414.50),
    ((2024, 1), (2025, 1), 20002.50),
    ((2025, 1), (2100, 1), 26005.50),
];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One gross minimum wage, valid over `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WagePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub gross_monthly: f64,
}

/// Family facts that drive the family allowance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FamilyStatus {
    pub married: bool,
    pub spouse_has_income: bool,
    pub child_count: u32,
}

impl FamilyStatus {
    /// Allowance rate: the employee's own 50% plus spouse and child add-ons
    pub fn allowance_rate(&self) -> f64 {
        let mut rate = 0.50;
        if self.married && !self.spouse_has_income {
            rate += 0.10;
        }
        let tiers = [(1, 0.075), (2, 0.075), (3, 0.10), (4, 0.05), (5, 0.05)];
        for (threshold, add_on) in tiers {
            if self.child_count >= threshold {
                rate += add_on;
            }
        }
        rate
    }
}

/// Ordered, non-overlapping gross minimum-wage periods
#[derive(Debug, Clone, PartialEq)]
pub struct WageSchedule {
    periods: Vec<WagePeriod>,
}

impl WageSchedule {
    /// Validate and build a schedule. Periods must be non-empty, each with
    /// `start < end` and ordered without overlap.
    pub fn new(periods: Vec<WagePeriod>) -> Result<Self, LoadError> {
        if periods.is_empty() {
            return Err(LoadError::InvalidWageSchedule("no periods".to_string()));
        }

        for period in &periods {
            if period.start >= period.end {
                return Err(LoadError::InvalidWageSchedule(format!(
                    "period starting {} does not end after it starts",
                    period.start
                )));
            }
            if !(period.gross_monthly >= 0.0) {
                return Err(LoadError::InvalidWageSchedule(format!(
                    "period starting {} has invalid gross wage {}",
                    period.start, period.gross_monthly
                )));
            }
        }

        for pair in periods.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(LoadError::InvalidWageSchedule(format!(
                    "period starting {} overlaps or precedes the previous one",
                    pair[1].start
                )));
            }
        }

        Ok(Self { periods })
    }

    /// Statutory gross minimum wages, 2008 through the 2100 sentinel
    pub fn builtin() -> Self {
        let periods = BUILTIN_PERIODS
            .iter()
            .filter_map(|&((sy, sm), (ey, em), gross_monthly)| {
                Some(WagePeriod {
                    start: NaiveDate::from_ymd_opt(sy, sm, 1)?,
                    end: NaiveDate::from_ymd_opt(ey, em, 1)?,
                    gross_monthly,
                })
            })
            .collect();
        Self { periods }
    }

    pub fn periods(&self) -> &[WagePeriod] {
        &self.periods
    }

    /// Gross monthly minimum wage at `date`.
    ///
    /// Dates before the first period use the first period; dates past the
    /// sentinel use the last.
    pub fn gross_monthly(&self, date: NaiveDate) -> f64 {
        if let Some(period) = self.periods.iter().find(|p| p.start <= date && date < p.end) {
            return period.gross_monthly;
        }

        let fallback = match self.periods.first() {
            Some(first) if date < first.start => Some(first),
            _ => self.periods.last(),
        };
        fallback.map(|p| p.gross_monthly).unwrap_or(0.0)
    }

    /// Monthly family allowance at `date`, zero outside [2008, 2022)
    pub fn family_allowance(&self, date: NaiveDate, status: &FamilyStatus) -> f64 {
        let year = date.year();
        if !(ALLOWANCE_FIRST_YEAR..TAX_EXEMPT_FROM_YEAR).contains(&year) {
            return 0.0;
        }

        let yearly = self.gross_monthly(date) * status.allowance_rate() * INCOME_TAX_RATE;
        round2(yearly / 12.0)
    }

    /// Net monthly minimum wage at `date`; `None` means no family allowance
    pub fn net_monthly(&self, date: NaiveDate, status: Option<&FamilyStatus>) -> f64 {
        let gross = self.gross_monthly(date);
        let social_insurance = gross * SOCIAL_INSURANCE_RATE;
        let unemployment = gross * UNEMPLOYMENT_RATE;
        let tax_base = gross - social_insurance - unemployment;

        if date.year() >= TAX_EXEMPT_FROM_YEAR {
            return round2(tax_base);
        }

        let income_tax = tax_base * INCOME_TAX_RATE;
        let stamp_duty = gross * STAMP_DUTY_RATE;
        let allowance = status.map(|s| self.family_allowance(date, s)).unwrap_or(0.0);
        let tax_paid = (income_tax - allowance).max(0.0);

        round2(gross - social_insurance - unemployment - tax_paid - stamp_duty)
    }
}

impl Default for WageSchedule {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_builtin_is_valid() {
        let builtin = WageSchedule::builtin();
        assert_eq!(builtin.periods().len(), BUILTIN_PERIODS.len());
        assert!(WageSchedule::new(builtin.periods().to_vec()).is_ok());
        assert_eq!(builtin.periods().last().unwrap().end, date(2100, 1, 1));
    }

    #[test]
    fn test_gross_lookup() {
        let wages = WageSchedule::builtin();
        assert_relative_eq!(wages.gross_monthly(date(2008, 6, 30)), 608.40);
        assert_relative_eq!(wages.gross_monthly(date(2008, 7, 1)), 638.70);
        assert_relative_eq!(wages.gross_monthly(date(2020, 3, 15)), 2943.00);
        assert_relative_eq!(wages.gross_monthly(date(2060, 1, 1)), 26005.50);
        // Before the first period
        assert_relative_eq!(wages.gross_monthly(date(1999, 1, 1)), 608.40);
        // Past the sentinel
        assert_relative_eq!(wages.gross_monthly(date(2150, 1, 1)), 26005.50);
    }

    #[test]
    fn test_allowance_rate_tiers() {
        assert_relative_eq!(FamilyStatus::default().allowance_rate(), 0.50);

        let married = FamilyStatus {
            married: true,
            spouse_has_income: false,
            child_count: 0,
        };
        assert_relative_eq!(married.allowance_rate(), 0.60);

        let working_spouse = FamilyStatus {
            spouse_has_income: true,
            ..married
        };
        assert_relative_eq!(working_spouse.allowance_rate(), 0.50);

        let five = FamilyStatus {
            child_count: 5,
            ..married
        };
        assert_relative_eq!(five.allowance_rate(), 0.60 + 0.075 + 0.075 + 0.10 + 0.05 + 0.05);
    }

    #[test]
    fn test_allowance_window() {
        let wages = WageSchedule::builtin();
        let status = FamilyStatus::default();

        assert_relative_eq!(wages.family_allowance(date(2007, 12, 31), &status), 0.0);
        assert_relative_eq!(wages.family_allowance(date(2022, 1, 1), &status), 0.0);
        // 2943.00 * 0.50 * 0.15 / 12 = 18.39375
        assert_relative_eq!(wages.family_allowance(date(2020, 6, 1), &status), 18.39);
    }

    #[test]
    fn test_net_before_and_after_cutoff() {
        let wages = WageSchedule::builtin();

        // 2022+: gross - 14% - 1%
        assert_relative_eq!(wages.net_monthly(date(2024, 6, 1), None), 17002.13, epsilon = 0.011);

        // 2020, no allowance:
        // base = 2501.55, tax = 375.2325, stamp = 22.33737
        assert_relative_eq!(wages.net_monthly(date(2020, 6, 1), None), 2103.98, epsilon = 0.005);

        let with_allowance = wages.net_monthly(date(2020, 6, 1), Some(&FamilyStatus::default()));
        assert_relative_eq!(with_allowance - wages.net_monthly(date(2020, 6, 1), None), 18.39, epsilon = 0.011);
    }

    #[test]
    fn test_invalid_schedules() {
        assert!(WageSchedule::new(Vec::new()).is_err());

        let inverted = vec![WagePeriod {
            start: date(2020, 1, 1),
            end: date(2019, 1, 1),
            gross_monthly: 100.0,
        }];
        assert!(matches!(WageSchedule::new(inverted), Err(LoadError::InvalidWageSchedule(_))));
    }
}
