//! Discounting of future years to the valuation date
//!
//! Both methods compound annually: a year `k` calendar years after the
//! valuation year is multiplied by `1 / (1 + r)^k`. The progressive method
//! uses the report discount rate, the actuarial method the technical
//! interest. Past years and the valuation year itself are not discounted.

use serde::{Deserialize, Serialize};

use crate::input::{DiscountMethod, Parameters};

/// Discount curve for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountCurve {
    pub method: DiscountMethod,
    /// Annual rate as a fraction (1.8% is 0.018)
    pub annual_rate: f64,
}

impl DiscountCurve {
    /// Pick the rate matching the selected method; rates are given in percent
    pub fn from_params(params: &Parameters) -> Self {
        let percent = match params.discount_method {
            DiscountMethod::Progressive => params.report_discount_rate,
            DiscountMethod::Actuarial => params.technical_interest,
        };
        Self {
            method: params.discount_method,
            annual_rate: percent / 100.0,
        }
    }

    /// Factor for a year `years_after_valuation` calendar years after the valuation year
    pub fn factor(&self, years_after_valuation: i32) -> f64 {
        if years_after_valuation <= 0 || self.annual_rate <= 0.0 {
            return 1.0;
        }
        (1.0 + self.annual_rate).powi(-years_after_valuation)
    }

    /// Present value of `amount` received in `year`
    pub fn present_value(&self, amount: f64, year: i32, valuation_year: i32) -> f64 {
        amount * self.factor(year - valuation_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rate_follows_method() {
        let params = Parameters {
            report_discount_rate: 5.0,
            technical_interest: 1.8,
            ..Parameters::default()
        };
        assert_relative_eq!(DiscountCurve::from_params(&params).annual_rate, 0.05);

        let actuarial = Parameters {
            discount_method: DiscountMethod::Actuarial,
            ..params
        };
        assert_relative_eq!(DiscountCurve::from_params(&actuarial).annual_rate, 0.018);
    }

    #[test]
    fn test_compounding_factor() {
        let curve = DiscountCurve {
            method: DiscountMethod::Actuarial,
            annual_rate: 0.018,
        };
        assert_relative_eq!(curve.factor(0), 1.0);
        assert_relative_eq!(curve.factor(-3), 1.0);
        assert_relative_eq!(curve.factor(1), 1.0 / 1.018);
        assert_relative_eq!(curve.factor(10), 1.0 / 1.018_f64.powi(10));
        assert_relative_eq!(curve.present_value(1_000.0, 2027, 2025), 1_000.0 / 1.018_f64.powi(2));
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let curve = DiscountCurve::from_params(&Parameters::default());
        assert_relative_eq!(curve.factor(30), 1.0);
    }

    #[test]
    fn test_factor_decreases_with_rate() {
        let low = DiscountCurve {
            method: DiscountMethod::Progressive,
            annual_rate: 0.02,
        };
        let high = DiscountCurve {
            annual_rate: 0.05,
            ..low
        };
        for k in 1..40 {
            assert!(high.factor(k) < low.factor(k));
        }
    }
}
