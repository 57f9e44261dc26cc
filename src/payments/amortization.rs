use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::CalculatorConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::types::{LoanRequest, LoanResult};

/// scheduled payment in amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledPayment {
    pub period: u32,
    pub beginning_balance: Money,
    pub payment_amount: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub ending_balance: Money,
}

/// amortization schedule
#[derive(Debug, Clone, Serialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub annual_rate: Rate,
    pub periodic_rate: Rate,
    pub term_periods: u32,
    pub payment: Money,
    pub payments: Vec<ScheduledPayment>,
    pub total_interest: Money,
    pub total_paid: Money,
}

impl AmortizationSchedule {
    /// get payment for specific period (1-based)
    pub fn get_payment(&self, period: u32) -> Option<&ScheduledPayment> {
        period
            .checked_sub(1)
            .and_then(|index| self.payments.get(index as usize))
    }

    /// balance left after the last scheduled payment
    pub fn final_balance(&self) -> Money {
        self.payments
            .last()
            .map(|p| p.ending_balance)
            .unwrap_or(self.principal)
    }
}

/// level-payment calculator for fully amortizing fixed-rate loans
#[derive(Debug, Clone, Copy, Default)]
pub struct LoanCalculator {
    config: CalculatorConfig,
}

impl LoanCalculator {
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// periodic payment, rounded per the configured rule
    pub fn compute_payment(&self, request: &LoanRequest) -> Result<LoanResult> {
        self.validate(request)?;

        let periodic_rate = request.annual_rate().periodic(self.config.periods_per_year);
        let raw = level_payment(
            request.principal.as_decimal(),
            periodic_rate.as_decimal(),
            request.term_periods,
        )?;
        let payment = Money::from_decimal(self.round(raw));

        if !payment.is_positive() {
            return Err(CalculatorError::invalid_input(
                "amount",
                "Loan amount is too small to spread over that many payments.",
            ));
        }

        tracing::debug!(
            principal = %request.principal,
            annual_rate_percent = %request.annual_rate_percent,
            term_periods = request.term_periods,
            periods_per_year = self.config.periods_per_year,
            payment = %payment,
            "computed loan payment"
        );

        Ok(LoanResult { payment })
    }

    /// full period-by-period schedule for the rounded payment
    pub fn schedule(&self, request: &LoanRequest) -> Result<AmortizationSchedule> {
        let LoanResult { payment } = self.compute_payment(request)?;
        let annual_rate = request.annual_rate();
        let periodic_rate = annual_rate.periodic(self.config.periods_per_year);
        let r = periodic_rate.as_decimal();

        let mut payments = Vec::with_capacity(request.term_periods as usize);
        let mut balance = request.principal;
        let mut total_interest = Money::ZERO;
        let mut total_paid = Money::ZERO;

        for period in 1..=request.term_periods {
            let interest_portion = balance
                .as_decimal()
                .checked_mul(r)
                .map(|interest| Money::from_decimal(self.round(interest)))
                .ok_or_else(|| schedule_overflow(period))?;
            let mut principal_portion = payment
                .checked_sub(interest_portion)
                .ok_or_else(|| schedule_overflow(period))?
                .max(Money::ZERO);

            // last period absorbs rounding drift
            if period == request.term_periods || principal_portion > balance {
                principal_portion = balance;
            }

            let payment_amount = principal_portion
                .checked_add(interest_portion)
                .ok_or_else(|| schedule_overflow(period))?;
            let ending_balance = balance
                .checked_sub(principal_portion)
                .ok_or_else(|| schedule_overflow(period))?;

            total_interest = total_interest
                .checked_add(interest_portion)
                .ok_or_else(|| schedule_overflow(period))?;
            total_paid = total_paid
                .checked_add(payment_amount)
                .ok_or_else(|| schedule_overflow(period))?;

            payments.push(ScheduledPayment {
                period,
                beginning_balance: balance,
                payment_amount,
                interest_portion,
                principal_portion,
                ending_balance,
            });

            balance = ending_balance;
            if balance.is_zero() {
                break;
            }
        }

        Ok(AmortizationSchedule {
            principal: request.principal,
            annual_rate,
            periodic_rate,
            term_periods: request.term_periods,
            payment,
            payments,
            total_interest,
            total_paid,
        })
    }

    fn validate(&self, request: &LoanRequest) -> Result<()> {
        if !request.principal.is_positive() {
            return Err(CalculatorError::invalid_input(
                "amount",
                "Loan amount must be greater than zero.",
            ));
        }

        if request.annual_rate_percent < Decimal::ZERO {
            return Err(CalculatorError::invalid_input(
                "rate",
                "Interest rate cannot be negative.",
            ));
        }

        if request.term_periods == 0 {
            return Err(CalculatorError::invalid_input(
                "term",
                "Term must be at least one payment.",
            ));
        }

        if request.term_periods > self.config.max_term_periods {
            return Err(CalculatorError::invalid_input(
                "term",
                format!(
                    "Term cannot exceed {} payments.",
                    self.config.max_term_periods
                ),
            ));
        }

        Ok(())
    }

    fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.config.decimal_places, self.config.rounding.strategy())
    }
}

fn schedule_overflow(period: u32) -> CalculatorError {
    CalculatorError::calculation(format!("schedule exceeds decimal range at period {}", period))
}

/// compute a monthly payment with the default configuration
pub fn compute_payment(
    principal: Money,
    annual_rate_percent: Decimal,
    term_periods: u32,
) -> Result<Money> {
    let request = LoanRequest::new(principal, annual_rate_percent, term_periods);
    LoanCalculator::default()
        .compute_payment(&request)
        .map(|result| result.payment)
}

/// unrounded level payment
fn level_payment(principal: Decimal, periodic_rate: Decimal, periods: u32) -> Result<Decimal> {
    let n = Decimal::from(periods);

    if periodic_rate.is_zero() {
        return Ok(principal / n);
    }

    // P = principal * r * (1 + r)^n / ((1 + r)^n - 1)
    let factor = match compound_factor(periodic_rate, periods) {
        Some(compound) => {
            let growth = compound - Decimal::ONE;
            // rate below decimal precision, (1 + r)^n rounded to exactly 1
            if growth.is_zero() {
                return Ok(principal / n);
            }
            compound
                .checked_div(growth)
                .and_then(|ratio| periodic_rate.checked_mul(ratio))
        }
        // (1 + r)^n outside decimal range, ratio to (1 + r)^n - 1 is 1
        None => Some(periodic_rate),
    };

    factor
        .and_then(|f| principal.checked_mul(f))
        .ok_or_else(|| CalculatorError::calculation("payment exceeds decimal range"))
}

/// (1 + rate)^periods by repeated squaring, None on overflow
fn compound_factor(rate: Decimal, periods: u32) -> Option<Decimal> {
    let mut base = Decimal::ONE.checked_add(rate)?;
    let mut exp = periods;
    let mut result = Decimal::ONE;

    while exp > 0 {
        if exp & 1 == 1 {
            result = result.checked_mul(base)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = base.checked_mul(base)?;
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoundingRule;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn request(principal: i64, rate: Decimal, term: u32) -> LoanRequest {
        LoanRequest::new(Money::from_major(principal), rate, term)
    }

    #[test]
    fn test_standard_monthly_payment() {
        let payment = compute_payment(Money::from_major(10_000), dec!(5), 12).unwrap();
        assert_eq!(payment, Money::from_decimal(dec!(856.07)));
    }

    #[test]
    fn test_thirty_year_mortgage() {
        let payment = compute_payment(Money::from_major(100_000), dec!(6), 360).unwrap();
        assert_eq!(payment, Money::from_decimal(dec!(599.55)));

        let payment = compute_payment(Money::from_major(200_000), dec!(6.5), 360).unwrap();
        assert_eq!(payment, Money::from_decimal(dec!(1264.14)));
    }

    #[test]
    fn test_zero_rate_is_simple_division() {
        let payment = compute_payment(Money::from_major(1_200), dec!(0), 12).unwrap();
        assert_eq!(payment, Money::from_decimal(dec!(100.00)));
    }

    #[test]
    fn test_single_period_zero_rate_returns_principal() {
        let payment = compute_payment(Money::from_major(4_321), Decimal::ZERO, 1).unwrap();
        assert_eq!(payment, Money::from_major(4_321));
    }

    #[test]
    fn test_rate_too_small_for_precision_falls_back() {
        // 1e-27 percent a year underflows the periodic rate to zero
        let tiny = Decimal::new(1, 27);
        let payment = compute_payment(Money::from_major(1_200), tiny, 12).unwrap();
        assert_eq!(payment, Money::from_major(100));
    }

    #[test]
    fn test_rounding_rule_is_half_up_by_default() {
        // 0.25 / 2 = 0.125
        let principal = Money::from_decimal(dec!(0.25));
        let payment = compute_payment(principal, Decimal::ZERO, 2).unwrap();
        assert_eq!(payment, Money::from_decimal(dec!(0.13)));

        let calculator = LoanCalculator::new(
            CalculatorConfig::default().with_rounding(RoundingRule::HalfEven),
        )
        .unwrap();
        let result = calculator
            .compute_payment(&LoanRequest::new(principal, Decimal::ZERO, 2))
            .unwrap();
        assert_eq!(result.payment, Money::from_decimal(dec!(0.12)));
    }

    #[test]
    fn test_periods_per_year_is_configurable() {
        let calculator =
            LoanCalculator::new(CalculatorConfig::default().with_periods_per_year(1)).unwrap();
        let result = calculator.compute_payment(&request(1_000, dec!(10), 1)).unwrap();
        assert_eq!(result.payment, Money::from_major(1_100));

        let weekly = LoanCalculator::new(CalculatorConfig::from_frequency(
            crate::types::PaymentFrequency::Weekly,
        ))
        .unwrap();
        let result = weekly.compute_payment(&request(10_000, dec!(5), 52)).unwrap();
        assert_eq!(result.payment, Money::from_decimal(dec!(197.25)));
    }

    #[test]
    fn test_payment_increases_with_rate() {
        let calculator = LoanCalculator::default();
        let mut previous = Money::ZERO;
        for rate in 1..=30 {
            let result = calculator
                .compute_payment(&request(25_000, Decimal::from(rate), 60))
                .unwrap();
            assert!(result.payment > previous, "rate {} did not increase payment", rate);
            previous = result.payment;
        }
    }

    #[test]
    fn test_payments_positive_across_inputs() {
        let calculator = LoanCalculator::default();
        for principal in [100, 500, 10_000, 750_000] {
            for rate in [dec!(0), dec!(0.1), dec!(3.75), dec!(19.99), dec!(250)] {
                for term in [1, 12, 360, 1200] {
                    let result = calculator
                        .compute_payment(&request(principal, rate, term))
                        .unwrap();
                    assert!(result.payment.is_positive());
                }
            }
        }
    }

    #[test]
    fn test_huge_rate_uses_interest_only_limit() {
        // (1 + 100)^1200 does not fit in a decimal
        let payment = compute_payment(Money::from_major(1_000), dec!(120000), 1200).unwrap();
        assert_eq!(payment, Money::from_major(100_000));
    }

    #[test]
    fn test_invalid_principal() {
        let zero = compute_payment(Money::ZERO, dec!(5), 12);
        assert!(matches!(
            zero,
            Err(CalculatorError::InvalidInput { field: "amount", .. })
        ));

        let negative = compute_payment(Money::from_major(-100), dec!(5), 12);
        assert!(matches!(
            negative,
            Err(CalculatorError::InvalidInput { field: "amount", .. })
        ));
    }

    #[test]
    fn test_invalid_rate_and_term() {
        let negative_rate = compute_payment(Money::from_major(1_000), dec!(-0.5), 12);
        assert!(matches!(
            negative_rate,
            Err(CalculatorError::InvalidInput { field: "rate", .. })
        ));

        let zero_term = compute_payment(Money::from_major(1_000), dec!(5), 0);
        assert!(matches!(
            zero_term,
            Err(CalculatorError::InvalidInput { field: "term", .. })
        ));

        let long_term = compute_payment(Money::from_major(1_000), dec!(5), 1201);
        assert!(matches!(
            long_term,
            Err(CalculatorError::InvalidInput { field: "term", .. })
        ));
    }

    #[test]
    fn test_dust_principal_is_rejected() {
        let result = compute_payment(Money::CENT, Decimal::ZERO, 12);
        assert!(matches!(
            result,
            Err(CalculatorError::InvalidInput { field: "amount", .. })
        ));
    }

    #[test]
    fn test_overflowing_principal_is_calculation_error() {
        let principal = Money::from_decimal(Decimal::MAX);
        let result = compute_payment(principal, dec!(2400), 12);
        assert!(matches!(result, Err(CalculatorError::CalculationError { .. })));
    }

    #[test]
    fn test_schedule_beyond_decimal_range_is_calculation_error() {
        let calculator = LoanCalculator::default();

        // payment fits, twelve of them summed do not
        let huge_rate = LoanRequest::new(
            Money::from_major(10_000),
            Decimal::from_str("1000000000000000000000000000").unwrap(),
            12,
        );
        assert!(calculator.compute_payment(&huge_rate).is_ok());
        assert!(matches!(
            calculator.schedule(&huge_rate),
            Err(CalculatorError::CalculationError { .. })
        ));

        let huge_principal = LoanRequest::new(
            Money::from_str("79000000000000000000000000000").unwrap(),
            dec!(5),
            12,
        );
        assert!(matches!(
            calculator.schedule(&huge_principal),
            Err(CalculatorError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_schedule_pays_off_loan() {
        let calculator = LoanCalculator::default();
        let loan = request(10_000, dec!(5), 12);
        let schedule = calculator.schedule(&loan).unwrap();

        assert_eq!(schedule.payment, Money::from_decimal(dec!(856.07)));
        assert_eq!(schedule.payments.len(), 12);
        assert_eq!(schedule.final_balance(), Money::ZERO);
        assert_eq!(
            schedule.total_paid.checked_sub(schedule.total_interest),
            Some(loan.principal)
        );

        // first period: 10000 * 0.05 / 12 = 41.666.. -> 41.67
        let first = schedule.get_payment(1).unwrap();
        assert_eq!(first.beginning_balance, loan.principal);
        assert_eq!(first.interest_portion, Money::from_decimal(dec!(41.67)));
        assert_eq!(first.principal_portion, Money::from_decimal(dec!(814.40)));

        // every payment but the last is the level amount
        for scheduled in &schedule.payments[..11] {
            assert_eq!(scheduled.payment_amount, schedule.payment);
        }
        let last = schedule.get_payment(12).unwrap();
        let drift = last.payment_amount.as_decimal() - schedule.payment.as_decimal();
        assert!(drift.abs() < Decimal::ONE);

        assert!(schedule.get_payment(0).is_none());
        assert!(schedule.get_payment(13).is_none());
    }

    #[test]
    fn test_interest_declines_each_period() {
        let schedule = LoanCalculator::default()
            .schedule(&request(100_000, dec!(6), 360))
            .unwrap();

        for i in 1..schedule.payments.len() {
            assert!(schedule.payments[i].interest_portion <= schedule.payments[i - 1].interest_portion);
        }
        assert_eq!(schedule.final_balance(), Money::ZERO);
    }

    #[test]
    fn test_zero_rate_schedule_has_no_interest() {
        let schedule = LoanCalculator::default()
            .schedule(&request(1_000, Decimal::ZERO, 3))
            .unwrap();

        // 333.33 twice, then 333.34 to clear the balance
        assert_eq!(schedule.total_interest, Money::ZERO);
        assert_eq!(schedule.total_paid, Money::from_major(1_000));
        assert_eq!(
            schedule.payments[2].payment_amount,
            Money::from_decimal(dec!(333.34))
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = LoanCalculator::new(CalculatorConfig::default().with_periods_per_year(0));
        assert!(matches!(
            result,
            Err(CalculatorError::InvalidConfiguration { .. })
        ));
    }
}
