//! Parsing of the submitted loan form.
//!
//! The form carries exactly three text fields. Each is trimmed and parsed
//! into a typed value; range checks are left to the calculator.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};
use crate::types::LoanRequest;

/// raw `application/x-www-form-urlencoded` body of the calculator form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanForm {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub rate: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
}

impl LoanForm {
    pub fn new(amount: &str, rate: &str, term: &str) -> Self {
        Self {
            amount: Some(amount.to_string()),
            rate: Some(rate.to_string()),
            term: Some(term.to_string()),
        }
    }

    pub fn parse(&self) -> Result<LoanRequest> {
        let amount: Money = parse_number("amount", "Loan amount", self.amount.as_deref())?;
        let rate: Decimal = parse_number("rate", "Interest rate", self.rate.as_deref())?;
        let term = parse_term(self.term.as_deref())?;

        Ok(LoanRequest::new(amount, rate, term))
    }
}

fn required<'a>(field: &'static str, label: &str, raw: Option<&'a str>) -> Result<&'a str> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CalculatorError::invalid_input(
            field,
            format!("{} is required.", label),
        )),
    }
}

fn parse_number<T: FromStr>(field: &'static str, label: &str, raw: Option<&str>) -> Result<T> {
    let value = required(field, label, raw)?;
    value.parse().map_err(|_| {
        CalculatorError::invalid_input(field, format!("{} must be a number.", label))
    })
}

fn parse_term(raw: Option<&str>) -> Result<u32> {
    let value = required("term", "Term", raw)?;
    let term: i64 = value.parse().map_err(|_| {
        CalculatorError::invalid_input("term", "Term must be a whole number of payments.")
    })?;

    if term <= 0 {
        return Err(CalculatorError::invalid_input(
            "term",
            "Term must be a positive whole number.",
        ));
    }

    u32::try_from(term)
        .map_err(|_| CalculatorError::invalid_input("term", "Term is too long."))
}
