//! loan-calculator binary
//!
//! Serves the loan payment form over HTTP.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use loan_calculator_rs::web::shutdown_signal;
use loan_calculator_rs::{CalculatorConfig, LoanServer, RoundingRule, ServerConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command line arguments for the calculator server.
#[derive(Parser, Debug)]
#[command(name = "loan-calculator")]
#[command(about = "Web form that computes fixed-rate loan payments")]
#[command(version)]
struct Args {
    /// Server bind address
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    bind: String,

    /// Payment periods per year the annual rate is divided into
    #[arg(long, default_value_t = 12)]
    periods_per_year: u32,

    /// Midpoint rule for rounding payments
    #[arg(long, value_enum, default_value_t = Rounding::HalfUp)]
    rounding: Rounding,

    /// Longest accepted term, in payments
    #[arg(long, default_value_t = 1200)]
    max_term: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = 16384)]
    max_body_size: usize,

    /// Log every request with an id and latency
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    logging: bool,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Rounding {
    HalfUp,
    HalfEven,
}

impl From<Rounding> for RoundingRule {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::HalfUp => RoundingRule::HalfUp,
            Rounding::HalfEven => RoundingRule::HalfEven,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let calculator = CalculatorConfig::default()
        .with_periods_per_year(args.periods_per_year)
        .with_rounding(args.rounding.into())
        .with_max_term_periods(args.max_term);

    let config = ServerConfig::new()
        .with_bind_addr_str(&args.bind)?
        .with_calculator(calculator)
        .with_request_timeout(Duration::from_secs(args.timeout))
        .with_max_body_size(args.max_body_size)
        .with_logging(args.logging);

    let server = LoanServer::new(config)?;

    tracing::info!(
        bind = %server.config().bind_addr,
        periods_per_year = args.periods_per_year,
        rounding = ?args.rounding,
        max_term = args.max_term,
        timeout_secs = args.timeout,
        max_body_size = args.max_body_size,
        "starting loan calculator"
    );

    server.serve_with_shutdown(shutdown_signal()).await?;

    Ok(())
}
