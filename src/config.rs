use serde::{Deserialize, Serialize};

use crate::errors::{CalculatorError, Result};
use crate::types::{PaymentFrequency, RoundingRule};

/// default number of payment periods in a year (monthly payments)
pub const DEFAULT_PERIODS_PER_YEAR: u32 = 12;

/// default upper bound on the number of periods, 100 years of monthly payments
pub const DEFAULT_MAX_TERM_PERIODS: u32 = 1200;

/// calculator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// periods the nominal annual rate is split into
    pub periods_per_year: u32,
    /// decimal places of the reported payment
    pub decimal_places: u32,
    pub rounding: RoundingRule,
    pub max_term_periods: u32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self::monthly()
    }
}

impl CalculatorConfig {
    /// monthly payments, cents, round half up
    pub fn monthly() -> Self {
        Self {
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            decimal_places: 2,
            rounding: RoundingRule::HalfUp,
            max_term_periods: DEFAULT_MAX_TERM_PERIODS,
        }
    }

    /// configuration for a payment frequency; the term cap keeps 100 years
    pub fn from_frequency(frequency: PaymentFrequency) -> Self {
        let periods_per_year = frequency.periods_per_year();
        Self {
            periods_per_year,
            max_term_periods: periods_per_year * 100,
            ..Self::monthly()
        }
    }

    pub fn with_periods_per_year(mut self, periods_per_year: u32) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingRule) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_decimal_places(mut self, decimal_places: u32) -> Self {
        self.decimal_places = decimal_places;
        self
    }

    pub fn with_max_term_periods(mut self, max_term_periods: u32) -> Self {
        self.max_term_periods = max_term_periods;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.periods_per_year == 0 {
            return Err(CalculatorError::InvalidConfiguration {
                message: "periods per year must be at least 1".to_string(),
            });
        }

        // Money carries 8 decimal places
        if self.decimal_places > 8 {
            return Err(CalculatorError::InvalidConfiguration {
                message: format!("decimal places must be 8 or fewer, got {}", self.decimal_places),
            });
        }

        if self.max_term_periods == 0 {
            return Err(CalculatorError::InvalidConfiguration {
                message: "maximum term must be at least 1 period".to_string(),
            });
        }

        Ok(())
    }
}
