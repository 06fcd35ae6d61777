//! Random-arithmetic demo endpoints under `/number/`.

use api_types::number::{
    NumberDraw, NumberOperation, NumberQuery, NumberRequest, NumberResult, Operation,
};
use axum::{Json, extract::Query};
use rand::{Rng, seq::SliceRandom};

use crate::ServerError;

/// Draws a random number in `[0, 100)` and a random operation.
fn draw() -> (f64, Operation) {
    let mut rng = rand::thread_rng();
    let number = rng.gen_range(0.0..100.0);
    let operation = *Operation::ALL.choose(&mut rng).unwrap_or(&Operation::Add);
    (number, operation)
}

/// Only finite numbers are accepted; `NaN` and infinities would leak into
/// the JSON answer, which cannot represent them.
fn finite(value: f64, name: &str) -> Result<f64, ServerError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ServerError::InvalidParam(name.to_string()))
    }
}

/// `GET /number/?param=<f64>` multiplies a random number by `param`.
pub async fn get(Query(query): Query<NumberQuery>) -> Result<Json<NumberResult>, ServerError> {
    let raw = query.param.unwrap_or_default();
    let param: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ServerError::InvalidParam("param".to_string()))?;
    let param = finite(param, "param")?;

    let (number, _) = draw();
    Ok(Json(NumberResult {
        result: number * param,
    }))
}

/// `POST /number/` applies a random operation between a random number and `jsonParam`.
pub async fn post(Json(payload): Json<NumberRequest>) -> Result<Json<NumberOperation>, ServerError> {
    finite(payload.json_param, "jsonParam")?;
    let (number, operation) = draw();
    let result = operation
        .apply(number, payload.json_param)
        .ok_or(ServerError::DivisionByZero)?;

    tracing::debug!(
        "{number} {} {} = {result}",
        operation.symbol(),
        payload.json_param
    );
    Ok(Json(NumberOperation {
        random_number: number,
        operation,
        result,
    }))
}

/// `DELETE /number/` only draws a number and an operation.
pub async fn delete() -> Json<NumberDraw> {
    let (random_number, operation) = draw();
    Json(NumberDraw {
        random_number,
        operation,
    })
}
