use aide::OperationOutput;
use axum::{http::StatusCode, response::IntoResponse, Json};
use schemars::JsonSchema;
use serde_json::json;

/// Represent errors in the application
///
/// All `ServiceError`s can be transformed to http errors.
#[derive(Debug, Clone, PartialEq, JsonSchema)]
pub enum ServiceError {
    NotFound(&'static str),
    BadRequest(String),
    Unauthorized(&'static str),
    InternalServerError(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ServiceError {}

/// Helper for `ServiceError` result
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<sqlx::Error> for ServiceError {
    fn from(error: sqlx::Error) -> Self {
        ServiceError::InternalServerError(error.to_string())
    }
}

impl OperationOutput for ServiceError {
    type Inner = String;
}
impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServiceError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message })))
            }
            ServiceError::BadRequest(ref message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
            }
            ServiceError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": message })))
            }
            ServiceError::InternalServerError(ref cause) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": cause })),
            ),
        }
        .into_response()
    }
}
