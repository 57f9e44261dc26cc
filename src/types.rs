use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// loan terms submitted for a single calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: Money,
    /// nominal annual rate as a percent, 5.5 means 5.5%
    pub annual_rate_percent: Decimal,
    pub term_periods: u32,
}

impl LoanRequest {
    pub fn new(principal: Money, annual_rate_percent: Decimal, term_periods: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_periods,
        }
    }

    pub fn annual_rate(&self) -> Rate {
        Rate::from_percentage(self.annual_rate_percent)
    }
}

/// outcome of a payment calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanResult {
    /// periodic payment, already rounded
    pub payment: Money,
}

/// how often payments fall due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentFrequency {
    Weekly,
    Biweekly,
    SemiMonthly,
    #[default]
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl PaymentFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Biweekly => 26,
            PaymentFrequency::SemiMonthly => 24,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Annual => 1,
        }
    }
}

/// midpoint rule used when rounding payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoundingRule {
    /// 0.125 -> 0.13
    #[default]
    HalfUp,
    /// 0.125 -> 0.12
    HalfEven,
}

impl RoundingRule {
    pub fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingRule::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingRule::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}
