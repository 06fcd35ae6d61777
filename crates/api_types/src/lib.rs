//! Wire types shared by the HTTP services and their clients.

use serde::{Deserialize, Serialize};

pub mod rate {
    use chrono::{DateTime, Utc};

    use super::*;

    /// Query string of `GET /rate`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RateQuery {
        pub currency: Option<String>,
    }

    /// Successful `GET /rate` body.
    ///
    /// `rate` is the amount of base currency one unit of `currency` costs.
    /// Clients only rely on `rate`; the other fields are informative.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RateResponse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub currency: Option<String>,
        pub rate: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub timestamp: Option<DateTime<Utc>>,
    }

    /// Error body of `GET /rate`.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RateErrorBody {
        pub message: String,
    }
}

pub mod number {
    use super::*;

    /// Arithmetic operation drawn by the number service.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Operation {
        #[serde(rename = "+")]
        Add,
        #[serde(rename = "-")]
        Sub,
        #[serde(rename = "*")]
        Mul,
        #[serde(rename = "/")]
        Div,
    }

    impl Operation {
        pub const ALL: [Operation; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

        /// Applies the operation, `None` on division by zero.
        #[must_use]
        pub fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
            match self {
                Self::Add => Some(lhs + rhs),
                Self::Sub => Some(lhs - rhs),
                Self::Mul => Some(lhs * rhs),
                Self::Div if rhs == 0.0 => None,
                Self::Div => Some(lhs / rhs),
            }
        }

        pub fn symbol(self) -> &'static str {
            match self {
                Self::Add => "+",
                Self::Sub => "-",
                Self::Mul => "*",
                Self::Div => "/",
            }
        }
    }

    /// Query string of `GET /number/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct NumberQuery {
        pub param: Option<String>,
    }

    /// `GET /number/` body.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct NumberResult {
        pub result: f64,
    }

    /// `POST /number/` request body.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct NumberRequest {
        #[serde(rename = "jsonParam")]
        pub json_param: f64,
    }

    /// `POST /number/` body.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct NumberOperation {
        pub random_number: f64,
        pub operation: Operation,
        pub result: f64,
    }

    /// `DELETE /number/` body.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct NumberDraw {
        pub random_number: f64,
        pub operation: Operation,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NumberErrorBody {
        pub error: String,
    }
}
