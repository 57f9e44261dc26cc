pub mod amortization;

pub use amortization::{compute_payment, AmortizationSchedule, LoanCalculator, ScheduledPayment};
