//! # Request/Response Layer
//!
//! Turns JSON requests into JSON responses. Every request is answered on its
//! own and the layer holds no state between calls.
//!
//! ## Envelope
//!
//! ```text
//! CalculationResponse
//! ├── request_id: UUID v4
//! ├── computed_at: UTC timestamp
//! ├── calc_type: "lamina-engineering-constants" | "laminate-plate-properties" | ...
//! ├── status: 200 | 422 | 500
//! └── result | error
//! ```
//!
//! ## Example
//!
//! ```rust
//! use composite_core::api::handle_json;
//! use composite_core::validation::ValidationLimits;
//!
//! let request = r#"{"type": "lamina-engineering-constants",
//!                   "E1": 150000, "E2": 10000, "G12": 5000, "nu12": 0.3, "layup_angle": 45}"#;
//! let response = handle_json(request, &ValidationLimits::default());
//! assert_eq!(response.status, 200);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculations::{CalculationItem, CalculationOutput};
use crate::errors::{CalcError, CalcResult};
use crate::validation::ValidationLimits;

/// `calc_type` reported when a request could not be parsed far enough to know its kind
pub const UNKNOWN_CALC_TYPE: &str = "unknown";

/// Error body of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable code such as `INVALID_INPUT` or `SINGULAR_MATRIX`
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// The structured error
    pub error: CalcError,
}

impl From<CalcError> for ErrorBody {
    fn from(error: CalcError) -> Self {
        ErrorBody {
            code: error.error_code().to_string(),
            message: error.to_string(),
            error,
        }
    }
}

/// Response envelope for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub request_id: Uuid,

    pub computed_at: DateTime<Utc>,

    pub calc_type: String,

    /// 200 on success, 422 for invalid requests, 500 for failed computations
    pub status: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CalculationOutput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl CalculationResponse {
    fn new(calc_type: &str, outcome: CalcResult<CalculationOutput>) -> Self {
        let (status, result, error) = match outcome {
            Ok(output) => (200, Some(output), None),
            Err(e) => (e.http_status(), None, Some(ErrorBody::from(e))),
        };
        CalculationResponse {
            request_id: Uuid::new_v4(),
            computed_at: Utc::now(),
            calc_type: calc_type.to_string(),
            status,
            result,
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Validate, compute and wrap one typed request.
pub fn handle(item: &CalculationItem, limits: &ValidationLimits) -> CalculationResponse {
    let response = CalculationResponse::new(item.calc_type(), item.calculate(limits));
    log_response(&response);
    response
}

/// Parse and answer one JSON request.
///
/// Parse failures are answered with status 422 rather than returned as `Err`.
pub fn handle_json(text: &str, limits: &ValidationLimits) -> CalculationResponse {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => handle_value(value, limits),
        Err(e) => reject(UNKNOWN_CALC_TYPE, e.into()),
    }
}

/// Answer a request document holding one request object or an array of them.
///
/// Responses come back in request order; a bad element does not affect its
/// neighbours. A document that is not JSON at all yields a single 422 response.
pub fn handle_batch_json(text: &str, limits: &ValidationLimits) -> Vec<CalculationResponse> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Array(items)) => {
            info!(count = items.len(), "handling batch");
            items.into_iter().map(|v| handle_value(v, limits)).collect()
        }
        Ok(value) => vec![handle_value(value, limits)],
        Err(e) => vec![reject(UNKNOWN_CALC_TYPE, e.into())],
    }
}

fn handle_value(value: serde_json::Value, limits: &ValidationLimits) -> CalculationResponse {
    let calc_type = value
        .get("type")
        .and_then(|t| t.as_str())
        .unwrap_or(UNKNOWN_CALC_TYPE)
        .to_string();

    match serde_json::from_value::<CalculationItem>(value) {
        Ok(item) => handle(&item, limits),
        Err(e) => reject(&calc_type, e.into()),
    }
}

fn reject(calc_type: &str, error: CalcError) -> CalculationResponse {
    let response = CalculationResponse::new(calc_type, Err(error));
    log_response(&response);
    response
}

fn log_response(response: &CalculationResponse) {
    match &response.error {
        None => debug!(calc_type = %response.calc_type, request_id = %response.request_id, "request answered"),
        Some(body) => warn!(
            calc_type = %response.calc_type,
            status = response.status,
            code = %body.code,
            "request failed: {}",
            body.message
        ),
    }
}
