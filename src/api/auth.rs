use std::ops::Add;

use aide::axum::routing::{get_with, post_with};
use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::Json;
use chrono::{Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::database::AppState;
use crate::error::{ServiceError, ServiceResult};
use crate::models;
use crate::request_state::RequestState;

use super::users::{RoleDto, UserDto};
use super::{password_hash_create, password_hash_verify, Created, MessageDto};

const SESSION_LIFETIME_HOURS: i64 = 24;

pub fn router(app_state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route("/register", post_with(register, register_docs))
        .api_route("/login", post_with(login, login_docs))
        .api_route("/logout", post_with(logout, logout_docs))
        .api_route("/check-auth", get_with(check_auth, check_auth_docs))
        .with_state(app_state)
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct RegisterDto {
    pub name: String,
    pub email: String,
    pub phone_no: String,
    pub role: RoleDto,
    pub password: String,
}

async fn register(
    mut state: RequestState,
    form: Json<RegisterDto>,
) -> ServiceResult<Created<UserDto>> {
    let form = form.0;

    let user = models::User {
        id: 0,
        name: form.name,
        email: form.email,
        phone_no: form.phone_no,
        role: form.role.into(),
        password_hash: password_hash_create(&form.password),
    };

    let user = state.db.store_user(user).await?;
    Ok(Created(UserDto::from(&user)))
}

fn register_docs(op: TransformOperation) -> TransformOperation {
    op.description("Register a new user.")
        .tag("auth")
        .response::<201, Json<UserDto>>()
        .response_with::<400, (), _>(|res| res.description("A user with this email already exists!"))
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct LoginResponseDto {
    pub access_token: String,
    pub user: UserDto,
}

async fn login(
    mut state: RequestState,
    form: Json<LoginDto>,
) -> ServiceResult<Json<LoginResponseDto>> {
    let form = form.0;

    let user = state.db.get_user_by_email(&form.email).await?;
    if let Some(user) = user {
        if password_hash_verify(&user.password_hash, &form.password)? {
            let access_token = state
                .db
                .create_session_token(
                    user.id,
                    Utc::now().add(Duration::hours(SESSION_LIFETIME_HOURS)),
                )
                .await?;

            return Ok(Json(LoginResponseDto {
                access_token,
                user: UserDto::from(&user),
            }));
        }
    }

    Err(ServiceError::Unauthorized("Invalid credentials"))
}

fn login_docs(op: TransformOperation) -> TransformOperation {
    op.description("Login with email and password.")
        .tag("auth")
        .response::<200, Json<LoginResponseDto>>()
        .response_with::<401, (), _>(|res| res.description("Invalid credentials!"))
}

async fn logout(mut state: RequestState) -> ServiceResult<Json<MessageDto>> {
    let session = state.session_require()?;
    state.db.delete_session_token(&session.token).await?;

    Ok(MessageDto::new("Successfully logged out"))
}

fn logout_docs(op: TransformOperation) -> TransformOperation {
    op.description("Logout the current session. The token is deleted from the server and cannot be used again.")
        .tag("auth")
        .response::<200, Json<MessageDto>>()
        .response_with::<401, (), _>(|res| res.description("Missing login!"))
        .security_requirement("SessionToken")
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct SessionUserDto {
    pub id: u64,
    pub role: RoleDto,
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct CheckAuthDto {
    pub message: String,
    pub user: SessionUserDto,
}

async fn check_auth(state: RequestState) -> ServiceResult<Json<CheckAuthDto>> {
    let session = state.session_require()?;

    Ok(Json(CheckAuthDto {
        message: "Authenticated".to_string(),
        user: SessionUserDto {
            id: session.user_id,
            role: (&session.role).into(),
        },
    }))
}

fn check_auth_docs(op: TransformOperation) -> TransformOperation {
    op.description("Check whether the request carries a valid session token.")
        .tag("auth")
        .response::<200, Json<CheckAuthDto>>()
        .response_with::<401, (), _>(|res| res.description("Missing login!"))
        .security_requirement("SessionToken")
}
