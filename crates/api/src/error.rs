use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use planpm_core::error::CoreError;
use planpm_core::projection::ProjectionError;
use serde::Serialize;

use crate::advisor::AdvisorError;

/// Everything a handler can fail with, rendered as `{ "error", "code" }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Strict-mode projection refused a configuration.
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// The failure-prediction model call failed.
    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    /// A dependency required by the endpoint is not configured.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A lookup by something other than id found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

type Mapped = (StatusCode, &'static str, String);

/// Generic 500; the detail only goes to the log.
fn internal(detail: &dyn std::fmt::Display) -> Mapped {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn map_core(core: &CoreError) -> Mapped {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = match &self {
            AppError::Core(core) => map_core(core),
            AppError::Database(err) => map_sqlx(err),
            AppError::Projection(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PROJECTION_ERROR",
                err.to_string(),
            ),
            AppError::Advisor(err) => {
                tracing::error!(error = %err, "Advisor request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "ADVISOR_ERROR",
                    "The maintenance advisor could not produce a prediction".to_string(),
                )
            }
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };

        (status, Json(ErrorBody { error, code })).into_response()
    }
}

/// Map sqlx failures by SQLSTATE and constraint prefix.
///
/// `uq_` unique violations are 409. `fk_` violations are 409 when deleting a
/// referenced row and 400 when pointing at a missing one. `ck_` violations
/// are 400. Anything else is a sanitized 500.
fn map_sqlx(err: &sqlx::Error) -> Mapped {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            )
        }
        sqlx::Error::Database(db_err) => db_err,
        other => return internal(other),
    };

    let constraint = db_err.constraint().unwrap_or("unknown");
    // Postgres words the delete-side violation "update or delete on ...".
    let deleting = db_err.message().starts_with("update or delete");
    match (db_err.code().as_deref(), constraint) {
        (Some("23505"), c) if c.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {c}"),
        ),
        (Some("23503"), c) if c.starts_with("fk_") && deleting => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Record is still referenced: {c}"),
        ),
        (Some("23503"), c) if c.starts_with("fk_") => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            format!("Referenced record does not exist: {c}"),
        ),
        (Some("23514"), c) if c.starts_with("ck_") => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value violates check constraint: {c}"),
        ),
        _ => internal(db_err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_status_codes() {
        let cases = [
            (CoreError::NotFound { entity: "Instrument", id: 3 }, StatusCode::NOT_FOUND),
            (CoreError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (CoreError::Conflict("dup".into()), StatusCode::CONFLICT),
            (CoreError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (CoreError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (CoreError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError::Core(err).into_response().status(), expected);
        }
    }

    #[test]
    fn projection_error_is_unprocessable() {
        let err = ProjectionError::UnknownFrequency {
            configuration_id: 4,
            frequency: "Fortnightly".into(),
        };
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn row_not_found_is_404() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
