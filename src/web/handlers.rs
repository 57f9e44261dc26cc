//! Request handlers for the calculator form.

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::errors::CalculatorError;
use crate::form::LoanForm;
use crate::web::templates::{IndexTemplate, ResultTemplate};
use crate::web::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// GET / renders an empty form.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    IndexTemplate::empty(state.calculator.config())
}

/// POST / parses the form, computes the payment and renders the result.
pub async fn calculate(
    State(state): State<AppState>,
    form: std::result::Result<Form<LoanForm>, FormRejection>,
) -> Response {
    let config = state.calculator.config();

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected unreadable loan form");
            return (StatusCode::BAD_REQUEST, IndexTemplate::unreadable(config)).into_response();
        }
    };

    let outcome = form
        .parse()
        .and_then(|request| state.calculator.schedule(&request));

    match outcome {
        Ok(schedule) => {
            tracing::info!(
                principal = %schedule.principal,
                annual_rate = %schedule.annual_rate,
                term_periods = schedule.term_periods,
                payment = %schedule.payment,
                "loan payment calculated"
            );
            ResultTemplate::new(&schedule, config).into_response()
        }
        Err(err) => {
            let status = match &err {
                CalculatorError::InvalidInput { field, .. } => {
                    tracing::info!(field = *field, "loan form failed validation");
                    StatusCode::BAD_REQUEST
                }
                CalculatorError::CalculationError { .. } => {
                    tracing::warn!(error = %err, "loan payment could not be computed");
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                CalculatorError::InvalidConfiguration { .. } => {
                    tracing::error!(error = %err, "calculator misconfigured");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, IndexTemplate::with_error(&form, &err, config)).into_response()
        }
    }
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
