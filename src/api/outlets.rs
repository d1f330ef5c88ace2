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
            "/outlets/:id",
            get_with(get_outlet, get_outlet_docs)
                .patch_with(update_outlet, update_outlet_docs)
                .delete_with(delete_outlet, delete_outlet_docs),
        )
        .api_route(
            "/outlets",
            get_with(list_outlets, list_outlets_docs).post_with(create_outlet, create_outlet_docs),
        )
        .with_state(app_state)
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct OutletDto {
    pub id: u64,
    pub name: String,
    pub contact: String,
    pub img_url: String,
    pub description: String,
    pub cuisine_id: u64,
    pub owner_id: u64,
}

impl From<&models::Outlet> for OutletDto {
    fn from(value: &models::Outlet) -> Self {
        Self {
            id: value.id.to_owned(),
            name: value.name.to_owned(),
            contact: value.contact.to_owned(),
            img_url: value.img_url.to_owned(),
            description: value.description.to_owned(),
            cuisine_id: value.cuisine_id.to_owned(),
            owner_id: value.owner_id.to_owned(),
        }
    }
}

pub async fn list_outlets(mut state: RequestState) -> ServiceResult<Json<Vec<OutletDto>>> {
    let outlets = state.db.get_all_outlets().await?;
    Ok(Json(outlets.iter().map(|o| o.into()).collect()))
}

fn list_outlets_docs(op: TransformOperation) -> TransformOperation {
    op.description("List all outlets.")
        .tag("outlets")
        .response::<200, Json<Vec<OutletDto>>>()
}

pub async fn get_outlet(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<OutletDto>> {
    let outlet = state.db.get_outlet_by_id(id).await?;

    if let Some(outlet) = outlet {
        return Ok(Json(OutletDto::from(&outlet)));
    }

    Err(ServiceError::NotFound("Outlet not found."))
}

fn get_outlet_docs(op: TransformOperation) -> TransformOperation {
    op.description("Get an outlet by id.")
        .tag("outlets")
        .response::<200, Json<OutletDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested outlet does not exist!"))
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct SaveOutletDto {
    pub name: String,
    pub contact: String,
    pub img_url: String,
    pub description: String,
    pub cuisine_id: u64,
    pub owner_id: u64,
}

async fn create_outlet(
    mut state: RequestState,
    form: Json<SaveOutletDto>,
) -> ServiceResult<Created<OutletDto>> {
    let form = form.0;

    let outlet = models::Outlet {
        id: 0,
        name: form.name,
        contact: form.contact,
        img_url: form.img_url,
        description: form.description,
        cuisine_id: form.cuisine_id,
        owner_id: form.owner_id,
    };

    let outlet = state.db.store_outlet(outlet).await?;
    Ok(Created(OutletDto::from(&outlet)))
}

fn create_outlet_docs(op: TransformOperation) -> TransformOperation {
    op.description("Create a new outlet.")
        .tag("outlets")
        .response::<201, Json<OutletDto>>()
        .response_with::<400, (), _>(|res| res.description("Outlet already exists or invalid data!"))
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateOutletDto {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub img_url: Option<String>,
    pub description: Option<String>,
    pub cuisine_id: Option<u64>,
    pub owner_id: Option<u64>,
}

async fn update_outlet(
    mut state: RequestState,
    Path(id): Path<u64>,
    form: Json<UpdateOutletDto>,
) -> ServiceResult<Json<OutletDto>> {
    let form = form.0;
    let outlet = state.db.get_outlet_by_id(id).await?;

    if let Some(mut outlet) = outlet {
        if let Some(name) = form.name {
            outlet.name = name;
        }
        if let Some(contact) = form.contact {
            outlet.contact = contact;
        }
        if let Some(img_url) = form.img_url {
            outlet.img_url = img_url;
        }
        if let Some(description) = form.description {
            outlet.description = description;
        }
        if let Some(cuisine_id) = form.cuisine_id {
            outlet.cuisine_id = cuisine_id;
        }
        if let Some(owner_id) = form.owner_id {
            outlet.owner_id = owner_id;
        }

        let outlet = state.db.store_outlet(outlet).await?;
        return Ok(Json(OutletDto::from(&outlet)));
    }

    Err(ServiceError::NotFound("Outlet not found."))
}

fn update_outlet_docs(op: TransformOperation) -> TransformOperation {
    op.description("Update an existing outlet. Only the provided fields are changed.")
        .tag("outlets")
        .response::<200, Json<OutletDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested outlet does not exist!"))
}

async fn delete_outlet(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<MessageDto>> {
    if state.db.delete_outlet(id).await? {
        return Ok(MessageDto::new("Outlet deleted successfully"));
    }

    Err(ServiceError::NotFound("Outlet not found."))
}

fn delete_outlet_docs(op: TransformOperation) -> TransformOperation {
    op.description("Delete an existing outlet.")
        .tag("outlets")
        .response::<200, Json<MessageDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested outlet does not exist!"))
}
