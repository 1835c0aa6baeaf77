use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::CatalogError;
use crate::domain::order::OrderError;
use crate::service::ServiceError;

// ============================================================================
// Fault - the error shape every transport adapter answers with
// ============================================================================
//
// `{ "status": <integer>, "message": <string | structured> }`
//
// Raw error values coming from collaborators are folded into this shape with
// one rule: an object carrying both `status` and `message` keeps its status
// when that status is numeric, and gets 400 otherwise; anything else becomes
// the message of a 400 fault.
//
// ============================================================================

pub const DEFAULT_FAULT_STATUS: u16 = 400;

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{status}: {message}")]
pub struct Fault {
    pub status: u16,
    pub message: Value,
}

impl Fault {
    pub fn new(status: u16, message: impl Into<Value>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<Value>) -> Self {
        Self::new(DEFAULT_FAULT_STATUS, message)
    }

    /// Fold an arbitrary error value into a fault
    pub fn from_raw(raw: Value) -> Self {
        match raw {
            Value::Object(mut map) if map.contains_key("status") && map.contains_key("message") => {
                let status = map
                    .get("status")
                    .and_then(numeric_status)
                    .unwrap_or(DEFAULT_FAULT_STATUS);
                let message = map.remove("message").unwrap_or(Value::Null);
                Self { status, message }
            }
            other => Self::bad_request(other),
        }
    }
}

/// A status is numeric when it is a number, or a string holding one, that
/// fits an HTTP status code
fn numeric_status(value: &Value) -> Option<u16> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if number.fract() != 0.0 || !(100.0..=599.0).contains(&number) {
        return None;
    }
    Some(number as u16)
}

impl ResponseError for Fault {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

impl From<OrderError> for Fault {
    fn from(err: OrderError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ServiceError> for Fault {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::OrderNotFound(_) => Self::new(404, err.to_string()),
            ServiceError::OrderCreationFailed => Self::bad_request(err.to_string()),
            ServiceError::Catalog(CatalogError::UpstreamUnavailable(detail)) => {
                tracing::error!(error = %detail, "Products service unavailable");
                Self::new(503, "Products service unavailable")
            }
            ServiceError::Catalog(CatalogError::ValidationRejected(raw)) => Self::from_raw(raw),
            ServiceError::Store(e) => {
                tracing::error!(error = %e, "Order store failure");
                Self::new(500, "Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_numeric_status_is_kept() {
        let fault = Fault::from_raw(json!({"status": 404, "message": "missing"}));
        assert_eq!(fault, Fault::new(404, "missing"));
    }

    #[test]
    fn test_numeric_string_status_is_kept() {
        let fault = Fault::from_raw(json!({"status": "409", "message": "conflict"}));
        assert_eq!(fault.status, 409);
    }

    #[test]
    fn test_non_numeric_status_defaults_to_400() {
        let fault = Fault::from_raw(json!({"status": "NOT_FOUND", "message": "missing"}));
        assert_eq!(fault, Fault::new(400, "missing"));

        let fault = Fault::from_raw(json!({"status": null, "message": "x"}));
        assert_eq!(fault.status, 400);
    }

    #[test]
    fn test_out_of_range_status_defaults_to_400() {
        assert_eq!(Fault::from_raw(json!({"status": 42, "message": "x"})).status, 400);
        assert_eq!(Fault::from_raw(json!({"status": 404.5, "message": "x"})).status, 400);
    }

    #[test]
    fn test_structured_message_is_preserved() {
        let fault = Fault::from_raw(json!({"status": 400, "message": ["a", "b"]}));
        assert_eq!(fault.message, json!(["a", "b"]));
    }

    #[test]
    fn test_extra_rejection_keys_are_dropped() {
        let fault = Fault::from_raw(json!({
            "status": 404,
            "message": "Products not found",
            "error": "Not Found",
            "ids": [7]
        }));

        let body = serde_json::to_value(&fault).unwrap();
        assert_eq!(body, json!({"status": 404, "message": "Products not found"}));
    }

    #[test]
    fn test_non_object_becomes_message() {
        assert_eq!(Fault::from_raw(json!("boom")), Fault::new(400, "boom"));

        let partial = json!({"message": "no status"});
        assert_eq!(Fault::from_raw(partial.clone()), Fault::new(400, partial));
    }

    #[test]
    fn test_service_error_mapping() {
        let id = Uuid::new_v4();
        let not_found = Fault::from(ServiceError::OrderNotFound(id));
        assert_eq!(not_found.status, 404);
        assert_eq!(not_found.message, json!(format!("Order with id: {} not found", id)));

        let failed = Fault::from(ServiceError::OrderCreationFailed);
        assert_eq!(failed, Fault::new(400, "Check logs"));

        let unavailable = Fault::from(ServiceError::Catalog(CatalogError::UpstreamUnavailable(
            "connection refused".to_string(),
        )));
        assert_eq!(unavailable.status, 503);

        let rejected = Fault::from(ServiceError::Catalog(CatalogError::ValidationRejected(
            json!({"status": "BAD", "message": "Products not found"}),
        )));
        assert_eq!(rejected, Fault::new(400, "Products not found"));
    }

    #[test]
    fn test_fault_serializes_to_boundary_shape() {
        let json = serde_json::to_value(Fault::new(404, "missing")).unwrap();
        assert_eq!(json, json!({"status": 404, "message": "missing"}));
    }
}
