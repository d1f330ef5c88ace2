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

use super::{Created, MessageDto};

pub fn router(app_state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/cuisines/:id",
            get_with(get_cuisine, get_cuisine_docs)
                .patch_with(update_cuisine, update_cuisine_docs)
                .delete_with(delete_cuisine, delete_cuisine_docs),
        )
        .api_route(
            "/cuisines",
            get_with(list_cuisines, list_cuisines_docs)
                .post_with(create_cuisine, create_cuisine_docs),
        )
        .with_state(app_state)
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct CuisineDto {
    pub id: u64,
    pub name: String,
}

impl From<&models::Cuisine> for CuisineDto {
    fn from(value: &models::Cuisine) -> Self {
        Self {
            id: value.id.to_owned(),
            name: value.name.to_owned(),
        }
    }
}

pub async fn list_cuisines(mut state: RequestState) -> ServiceResult<Json<Vec<CuisineDto>>> {
    let cuisines = state.db.get_all_cuisines().await?;
    Ok(Json(cuisines.iter().map(|c| c.into()).collect()))
}

fn list_cuisines_docs(op: TransformOperation) -> TransformOperation {
    op.description("List all cuisines.")
        .tag("cuisines")
        .response::<200, Json<Vec<CuisineDto>>>()
}

pub async fn get_cuisine(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<CuisineDto>> {
    let cuisine = state.db.get_cuisine_by_id(id).await?;

    if let Some(cuisine) = cuisine {
        return Ok(Json(CuisineDto::from(&cuisine)));
    }

    Err(ServiceError::NotFound("Cuisine not found."))
}

fn get_cuisine_docs(op: TransformOperation) -> TransformOperation {
    op.description("Get a cuisine by id.")
        .tag("cuisines")
        .response::<200, Json<CuisineDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested cuisine does not exist!"))
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct SaveCuisineDto {
    pub name: String,
}

async fn create_cuisine(
    mut state: RequestState,
    form: Json<SaveCuisineDto>,
) -> ServiceResult<Created<CuisineDto>> {
    let form = form.0;

    let cuisine = models::Cuisine {
        id: 0,
        name: form.name,
    };

    let cuisine = state.db.store_cuisine(cuisine).await?;
    Ok(Created(CuisineDto::from(&cuisine)))
}

fn create_cuisine_docs(op: TransformOperation) -> TransformOperation {
    op.description("Create a new cuisine.")
        .tag("cuisines")
        .response::<201, Json<CuisineDto>>()
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateCuisineDto {
    pub name: Option<String>,
}

async fn update_cuisine(
    mut state: RequestState,
    Path(id): Path<u64>,
    form: Json<UpdateCuisineDto>,
) -> ServiceResult<Json<CuisineDto>> {
    let form = form.0;
    let cuisine = state.db.get_cuisine_by_id(id).await?;

    if let Some(mut cuisine) = cuisine {
        if let Some(name) = form.name {
            cuisine.name = name;
        }

        let cuisine = state.db.store_cuisine(cuisine).await?;
        return Ok(Json(CuisineDto::from(&cuisine)));
    }

    Err(ServiceError::NotFound("Cuisine not found."))
}

fn update_cuisine_docs(op: TransformOperation) -> TransformOperation {
    op.description("Update an existing cuisine. Only the provided fields are changed.")
        .tag("cuisines")
        .response::<200, Json<CuisineDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested cuisine does not exist!"))
}

async fn delete_cuisine(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<MessageDto>> {
    if state.db.delete_cuisine(id).await? {
        return Ok(MessageDto::new("Cuisine deleted successfully"));
    }

    Err(ServiceError::NotFound("Cuisine not found."))
}

fn delete_cuisine_docs(op: TransformOperation) -> TransformOperation {
    op.description("Delete an existing cuisine.")
        .tag("cuisines")
        .response::<200, Json<MessageDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested cuisine does not exist!"))
}
