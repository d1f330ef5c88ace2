use aide::axum::routing::get_with;
use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::Path;
use axum::Json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::database::AppState;
use crate::error::{ServiceError, ServiceResult};
use crate::models;
use crate::request_state::RequestState;

use super::MessageDto;

pub fn router(app_state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/users/:id",
            get_with(get_user, get_user_docs)
                .patch_with(update_user, update_user_docs)
                .delete_with(delete_user, delete_user_docs),
        )
        .api_route("/users", get_with(list_users, list_users_docs))
        .with_state(app_state)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleDto {
    Customer,
    Owner,
    Admin,
}

impl From<&models::Role> for RoleDto {
    fn from(value: &models::Role) -> Self {
        match value {
            models::Role::Customer => RoleDto::Customer,
            models::Role::Owner => RoleDto::Owner,
            models::Role::Admin => RoleDto::Admin,
        }
    }
}
impl From<RoleDto> for models::Role {
    fn from(value: RoleDto) -> Self {
        match value {
            RoleDto::Customer => models::Role::Customer,
            RoleDto::Owner => models::Role::Owner,
            RoleDto::Admin => models::Role::Admin,
        }
    }
}

/// The password hash never leaves the database layer.
#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct UserDto {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone_no: String,
    pub role: RoleDto,
}

impl From<&models::User> for UserDto {
    fn from(value: &models::User) -> Self {
        Self {
            id: value.id.to_owned(),
            name: value.name.to_owned(),
            email: value.email.to_owned(),
            phone_no: value.phone_no.to_owned(),
            role: (&value.role).into(),
        }
    }
}

pub async fn list_users(mut state: RequestState) -> ServiceResult<Json<Vec<UserDto>>> {
    state.session_require()?;

    let users = state.db.get_all_users().await?;
    Ok(Json(users.iter().map(|u| u.into()).collect()))
}

fn list_users_docs(op: TransformOperation) -> TransformOperation {
    op.description("List all users.")
        .tag("users")
        .response::<200, Json<Vec<UserDto>>>()
        .response_with::<401, (), _>(|res| res.description("Missing login!"))
        .security_requirement("SessionToken")
}

pub async fn get_user(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<UserDto>> {
    state.session_require()?;

    let user = state.db.get_user_by_id(id).await?;

    if let Some(user) = user {
        return Ok(Json(UserDto::from(&user)));
    }

    Err(ServiceError::NotFound("User not found."))
}

fn get_user_docs(op: TransformOperation) -> TransformOperation {
    op.description("Get a user by id.")
        .tag("users")
        .response::<200, Json<UserDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested user does not exist!"))
        .response_with::<401, (), _>(|res| res.description("Missing login!"))
        .security_requirement("SessionToken")
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_no: Option<String>,
}

async fn update_user(
    mut state: RequestState,
    Path(id): Path<u64>,
    form: Json<UpdateUserDto>,
) -> ServiceResult<Json<UserDto>> {
    state.session_require()?;

    let form = form.0;
    let user = state.db.get_user_by_id(id).await?;

    if let Some(mut user) = user {
        if let Some(name) = form.name {
            user.name = name;
        }
        if let Some(email) = form.email {
            user.email = email;
        }
        if let Some(phone_no) = form.phone_no {
            user.phone_no = phone_no;
        }

        let user = state.db.store_user(user).await?;
        return Ok(Json(UserDto::from(&user)));
    }

    Err(ServiceError::NotFound("User not found."))
}

fn update_user_docs(op: TransformOperation) -> TransformOperation {
    op.description("Update an existing user. Only the provided fields are changed.")
        .tag("users")
        .response::<200, Json<UserDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested user does not exist!"))
        .response_with::<401, (), _>(|res| res.description("Missing login!"))
        .security_requirement("SessionToken")
}

async fn delete_user(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<MessageDto>> {
    state.session_require()?;

    if state.db.delete_user(id).await? {
        return Ok(MessageDto::new("User deleted Successfully"));
    }

    Err(ServiceError::NotFound("User not found."))
}

fn delete_user_docs(op: TransformOperation) -> TransformOperation {
    op.description("Delete an existing user.")
        .tag("users")
        .response::<200, Json<MessageDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested user does not exist!"))
        .response_with::<401, (), _>(|res| res.description("Missing login!"))
        .security_requirement("SessionToken")
}
