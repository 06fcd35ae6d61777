//! Mock currency-rate endpoint.

use api_types::rate::{RateQuery, RateResponse};
use axum::{Json, extract::Query};
use chrono::Utc;
use engine::Currency;

use crate::ServerError;

/// Base-currency units per one unit of the foreign currency.
const RATES: [(Currency, f64); 3] = [
    (Currency::Usd, 90.5),
    (Currency::Eur, 98.7),
    (Currency::Cny, 12.3),
];

pub(crate) fn lookup(code: &str) -> Option<f64> {
    let currency = Currency::try_from(code).ok()?;
    RATES
        .iter()
        .find_map(|(c, rate)| (*c == currency).then_some(*rate))
}

/// `GET /rate?currency=<CODE>`
pub async fn get(Query(query): Query<RateQuery>) -> Result<Json<RateResponse>, ServerError> {
    let code = query
        .currency
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_ascii_uppercase();

    if code.is_empty() {
        tracing::warn!("rate requested without currency");
        return Err(ServerError::MissingCurrency);
    }

    let Some(rate) = lookup(&code) else {
        tracing::warn!("rate requested for unknown currency {code}");
        return Err(ServerError::UnknownCurrency(code));
    };

    tracing::info!("serving rate {code} = {rate}");
    Ok(Json(RateResponse {
        currency: Some(code),
        rate,
        timestamp: Some(Utc::now()),
    }))
}
