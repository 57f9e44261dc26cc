//! Askama templates for the calculator pages.
//!
//! Every value reaches the page through askama's HTML escaping; none of the
//! templates use the `safe` filter.

use askama::Template;
use askama_web::WebTemplate;

use crate::config::CalculatorConfig;
use crate::decimal::Money;
use crate::errors::CalculatorError;
use crate::form::LoanForm;
use crate::payments::AmortizationSchedule;

/// Input form, empty or re-rendered with a validation message.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub amount: String,
    pub rate: String,
    pub term: String,
    pub error: Option<String>,
    pub error_field: Option<&'static str>,
    pub periods_per_year: u32,
}

impl IndexTemplate {
    pub fn empty(config: &CalculatorConfig) -> Self {
        Self {
            amount: String::new(),
            rate: String::new(),
            term: String::new(),
            error: None,
            error_field: None,
            periods_per_year: config.periods_per_year,
        }
    }

    /// echo the submitted values back next to the error
    pub fn with_error(form: &LoanForm, error: &CalculatorError, config: &CalculatorConfig) -> Self {
        Self {
            amount: form.amount.clone().unwrap_or_default(),
            rate: form.rate.clone().unwrap_or_default(),
            term: form.term.clone().unwrap_or_default(),
            error: Some(error.user_message()),
            error_field: error.field(),
            periods_per_year: config.periods_per_year,
        }
    }

    /// form body that could not be decoded at all
    pub fn unreadable(config: &CalculatorConfig) -> Self {
        Self {
            error: Some("The form could not be read. Please fill in every field.".to_string()),
            ..Self::empty(config)
        }
    }

    pub fn field_class(&self, field: &str) -> &'static str {
        match self.error_field {
            Some(f) if f == field => "invalid",
            _ => "",
        }
    }
}

/// One row of the schedule table, preformatted.
pub struct ScheduleRow {
    pub period: u32,
    pub payment: String,
    pub interest: String,
    pub principal: String,
    pub balance: String,
}

/// Result page with the payment and its schedule.
#[derive(Template, WebTemplate)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub principal: String,
    pub annual_rate: String,
    pub term_periods: u32,
    pub periods_per_year: u32,
    pub payment: String,
    pub total_paid: String,
    pub total_interest: String,
    pub rows: Vec<ScheduleRow>,
}

impl ResultTemplate {
    pub fn new(schedule: &AmortizationSchedule, config: &CalculatorConfig) -> Self {
        let dp = config.decimal_places as usize;
        let fmt = |m: Money| format!("{:.*}", dp, m);

        Self {
            principal: fmt(schedule.principal),
            annual_rate: schedule.annual_rate.to_string(),
            term_periods: schedule.term_periods,
            periods_per_year: config.periods_per_year,
            payment: fmt(schedule.payment),
            total_paid: fmt(schedule.total_paid),
            total_interest: fmt(schedule.total_interest),
            rows: schedule
                .payments
                .iter()
                .map(|p| ScheduleRow {
                    period: p.period,
                    payment: fmt(p.payment_amount),
                    interest: fmt(p.interest_portion),
                    principal: fmt(p.principal_portion),
                    balance: fmt(p.ending_balance),
                })
                .collect(),
        }
    }
}
