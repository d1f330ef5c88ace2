use aide::axum::routing::get_with;
use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use aide::OperationOutput;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rand::distributions::Alphanumeric;
use rand::Rng;
use schemars::JsonSchema;
use serde::Serialize;

use crate::database::AppState;
use crate::error::{ServiceError, ServiceResult};

pub mod auth;
pub mod cuisines;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod outlets;
pub mod reservations;
pub mod tables;
pub mod users;

pub fn init(app_state: AppState) -> ApiRouter {
    ApiRouter::new()
        .route("/", axum::routing::get(index))
        .api_route("/health", get_with(health, health_docs))
        .merge(auth::router(app_state.clone()))
        .merge(users::router(app_state.clone()))
        .merge(cuisines::router(app_state.clone()))
        .merge(outlets::router(app_state.clone()))
        .merge(menu_items::router(app_state.clone()))
        .merge(orders::router(app_state.clone()))
        .merge(order_items::router(app_state.clone()))
        .merge(tables::router(app_state.clone()))
        .merge(reservations::router(app_state))
}

async fn index() -> axum::response::Html<&'static str> {
    axum::response::Html("<h1>Welcome to NextGen Food Court APIs</h1>")
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct HealthDto {
    pub status: String,
    pub message: String,
}

async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "healthy".to_string(),
        message: "Backend is running".to_string(),
    })
}

fn health_docs(op: TransformOperation) -> TransformOperation {
    op.description("Health check.")
        .response::<200, Json<HealthDto>>()
}

/// Response body for delete and logout endpoints.
#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Json response wrapper that answers with `201 Created`.
pub struct Created<T>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

impl<T: Serialize + JsonSchema> OperationOutput for Created<T> {
    type Inner = T;
}

const PASSWORD_SALT_LENGTH: usize = 16;

pub fn password_hash_create(password: &str) -> Vec<u8> {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_SALT_LENGTH)
        .map(char::from)
        .collect();
    let hash = argon2rs::argon2i_simple(password, &salt);

    let mut result = salt.into_bytes();
    result.extend_from_slice(&hash);
    result
}

pub fn password_hash_verify(hash: &[u8], password: &str) -> ServiceResult<bool> {
    if hash.len() <= PASSWORD_SALT_LENGTH {
        return Ok(false);
    }

    let (salt, reference) = hash.split_at(PASSWORD_SALT_LENGTH);
    let salt = std::str::from_utf8(salt)
        .map_err(|_| ServiceError::InternalServerError("Could not read password salt".to_string()))?;
    let result = argon2rs::argon2i_simple(password, salt);

    Ok(result.as_slice() == reference)
}

#[cfg(test)]
mod password_tests {
    use super::{password_hash_create, password_hash_verify};

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = password_hash_create("hunter2");

        assert!(password_hash_verify(&hash, "hunter2").unwrap());
        assert!(!password_hash_verify(&hash, "hunter3").unwrap());
        assert!(!password_hash_verify(&hash, "").unwrap());
    }

    #[test]
    fn test_password_hash_is_salted() {
        let first = password_hash_create("hunter2");
        let second = password_hash_create("hunter2");

        assert_ne!(first, second);
        assert!(password_hash_verify(&first, "hunter2").unwrap());
        assert!(password_hash_verify(&second, "hunter2").unwrap());
    }

    #[test]
    fn test_password_hash_rejects_truncated_hash() {
        assert!(!password_hash_verify(&[1, 2, 3], "hunter2").unwrap());
    }
}
