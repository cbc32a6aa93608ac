use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Every failure leaves the server as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// `message` goes to the client, `cause` only to the log.
    #[error("{message}")]
    Store { message: &'static str, cause: String },
}

impl ApiError {
    /// Map a service error, using `message` as the public text of store failures.
    pub fn from_service(err: ServiceError, message: &'static str) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::InvalidRequest(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Db(cause) => ApiError::Store { message, cause },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::from_service(err, "Internal server error")
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => ApiError::InvalidRequest(msg),
            AuthError::Conflict => ApiError::Conflict("user already exists".into()),
            AuthError::NotFound => ApiError::NotFound("user not found".into()),
            AuthError::Unauthorized => ApiError::Unauthorized,
            other => ApiError::Store { message: "Internal server error", cause: format!("auth code {}: {}", other.code(), other) },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Store { message, cause } = &self {
            error!(event = "store_failure", error = %cause, "{message}");
        }
        (status, Json(serde_json::json!({"error": self.to_string()}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("bootstrap failed: {0}")]
    Bootstrap(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_hide_the_cause() {
        let err = ApiError::from_service(ServiceError::Db("relation missing".into()), "Failed to load page content");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to load page content");
    }

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(ApiError::from(ServiceError::Validation("x".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(ServiceError::NotFound("x".into())).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(ServiceError::Conflict("x".into())).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::from(AuthError::Unauthorized).status(), StatusCode::UNAUTHORIZED);
    }
}
