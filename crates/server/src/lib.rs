//! HTTP services: the mock currency-rate API and the random-arithmetic demo API.

use axum::{Json, http::StatusCode, response::IntoResponse};
use api_types::{number::NumberErrorBody, rate::RateErrorBody};

pub use server::{Service, router, run_with_listener, spawn_with_listener};

mod numbers;
mod rates;
mod server;

/// Failures of the HTTP handlers; every variant answers `400 Bad Request`.
#[derive(Debug)]
pub enum ServerError {
    MissingCurrency,
    UnknownCurrency(String),
    InvalidParam(String),
    DivisionByZero,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::MissingCurrency => (
                StatusCode::BAD_REQUEST,
                Json(RateErrorBody {
                    message: "Currency parameter is required".to_string(),
                }),
            )
                .into_response(),
            ServerError::UnknownCurrency(_) => (
                StatusCode::BAD_REQUEST,
                Json(RateErrorBody {
                    message: "UNKNOWN CURRENCY".to_string(),
                }),
            )
                .into_response(),
            ServerError::InvalidParam(param) => (
                StatusCode::BAD_REQUEST,
                Json(NumberErrorBody {
                    error: format!("invalid parameter: {param}"),
                }),
            )
                .into_response(),
            ServerError::DivisionByZero => (
                StatusCode::BAD_REQUEST,
                Json(NumberErrorBody {
                    error: "Division by zero!".to_string(),
                }),
            )
                .into_response(),
        }
    }
}
