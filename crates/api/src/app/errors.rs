use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockline_catalog::ConditionError;
use stockline_infra::SaveError;
use stockline_inventory::{RepositoryError, ValidationResult};
use stockline_sales::SalabilityError;

use crate::app::dto::TransportError;

pub fn save_error_to_response(err: SaveError) -> axum::response::Response {
    match err {
        SaveError::InputEmpty => message_error(StatusCode::BAD_REQUEST, err.to_string(), None),
        SaveError::Validation(ref result) => {
            message_error(StatusCode::BAD_REQUEST, err.to_string(), Some(result))
        }
        SaveError::CouldNotSave { ref reason } => {
            tracing::warn!(reason = %reason, "source items save failed");
            message_error(StatusCode::BAD_REQUEST, err.to_string(), None)
        }
        SaveError::IndexOutdated { ref reason } => {
            tracing::error!(reason = %reason, "stock status index is stale after save");
            message_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None)
        }
    }
}

pub fn transport_error_to_response(err: TransportError) -> axum::response::Response {
    message_error(StatusCode::BAD_REQUEST, err.to_string(), None)
}

pub fn salability_error_to_response(err: SalabilityError) -> axum::response::Response {
    match err {
        SalabilityError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
    }
}

pub fn condition_error_to_response(err: ConditionError) -> axum::response::Response {
    match err {
        ConditionError::UnsupportedOperator(_) => {
            json_error(StatusCode::BAD_REQUEST, "unsupported_operator", err.to_string())
        }
        ConditionError::UnknownField(_) => json_error(StatusCode::BAD_REQUEST, "unknown_field", err.to_string()),
    }
}

pub fn repository_error_to_response(err: RepositoryError) -> axum::response::Response {
    match err {
        RepositoryError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        RepositoryError::Unavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
    }
}

/// Malformed or mistyped request bodies.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(rejection.status(), "invalid_body", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// `{"message", "errors": [{"message", "parameters": {"field"}}]}`; `errors`
/// is omitted when there are none.
fn message_error(
    status: StatusCode,
    message: String,
    result: Option<&ValidationResult>,
) -> axum::response::Response {
    let mut body = json!({ "message": message });
    if let Some(result) = result.filter(|r| !r.is_valid()) {
        body["errors"] = result
            .errors()
            .iter()
            .map(|e| {
                json!({
                    "message": e.message,
                    "parameters": { "field": e.field },
                })
            })
            .collect();
    }
    (status, axum::Json(body)).into_response()
}
