pub mod config;
pub mod decimal;
pub mod errors;
pub mod form;
pub mod payments;
pub mod types;
pub mod web;

// re-export key types
pub use config::CalculatorConfig;
pub use decimal::{Money, Rate};
pub use errors::{CalculatorError, Result};
pub use form::LoanForm;
pub use payments::{compute_payment, AmortizationSchedule, LoanCalculator, ScheduledPayment};
pub use types::{LoanRequest, LoanResult, PaymentFrequency, RoundingRule};
pub use web::{LoanServer, ServerConfig, ServerError};
