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
            "/tables/:id",
            get_with(get_table, get_table_docs)
                .patch_with(update_table, update_table_docs)
                .delete_with(delete_table, delete_table_docs),
        )
        .api_route(
            "/tables",
            get_with(list_tables, list_tables_docs).post_with(create_table, create_table_docs),
        )
        .with_state(app_state)
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct TableDto {
    pub id: u64,
    pub outlet_id: u64,
    pub table_number: i32,
    pub capacity: i32,
    pub status: String,
    pub is_available: bool,
}

impl From<&models::Table> for TableDto {
    fn from(value: &models::Table) -> Self {
        Self {
            id: value.id.to_owned(),
            outlet_id: value.outlet_id.to_owned(),
            table_number: value.table_number.to_owned(),
            capacity: value.capacity.to_owned(),
            status: value.status.to_owned(),
            is_available: value.is_available.to_owned(),
        }
    }
}

pub async fn list_tables(mut state: RequestState) -> ServiceResult<Json<Vec<TableDto>>> {
    let tables = state.db.get_all_tables().await?;
    Ok(Json(tables.iter().map(|t| t.into()).collect()))
}

fn list_tables_docs(op: TransformOperation) -> TransformOperation {
    op.description("List all tables.")
        .tag("tables")
        .response::<200, Json<Vec<TableDto>>>()
}

pub async fn get_table(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<TableDto>> {
    let table = state.db.get_table_by_id(id).await?;

    if let Some(table) = table {
        return Ok(Json(TableDto::from(&table)));
    }

    Err(ServiceError::NotFound("Table not found."))
}

fn get_table_docs(op: TransformOperation) -> TransformOperation {
    op.description("Get a table by id.")
        .tag("tables")
        .response::<200, Json<TableDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested table does not exist!"))
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct SaveTableDto {
    pub outlet_id: u64,
    pub table_number: i32,
    pub capacity: i32,
    pub status: Option<String>,
}

async fn create_table(
    mut state: RequestState,
    form: Json<SaveTableDto>,
) -> ServiceResult<Created<TableDto>> {
    let form = form.0;

    let table = models::Table {
        id: 0,
        outlet_id: form.outlet_id,
        table_number: form.table_number,
        capacity: form.capacity,
        status: form.status.unwrap_or_else(|| "available".to_string()),
        is_available: true,
    };

    let table = state.db.store_table(table).await?;
    Ok(Created(TableDto::from(&table)))
}

fn create_table_docs(op: TransformOperation) -> TransformOperation {
    op.description("Create a new table. New tables start available.")
        .tag("tables")
        .response::<201, Json<TableDto>>()
}

/// `is_available` is deliberately absent: the flag is only changed by the
/// reservation endpoints.
#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateTableDto {
    pub table_number: Option<i32>,
    pub capacity: Option<i32>,
    pub status: Option<String>,
    pub outlet_id: Option<u64>,
}

async fn update_table(
    mut state: RequestState,
    Path(id): Path<u64>,
    form: Json<UpdateTableDto>,
) -> ServiceResult<Json<TableDto>> {
    let form = form.0;
    let table = state.db.get_table_by_id(id).await?;

    if let Some(mut table) = table {
        if let Some(table_number) = form.table_number {
            table.table_number = table_number;
        }
        if let Some(capacity) = form.capacity {
            table.capacity = capacity;
        }
        if let Some(status) = form.status {
            table.status = status;
        }
        if let Some(outlet_id) = form.outlet_id {
            table.outlet_id = outlet_id;
        }

        let table = state.db.store_table(table).await?;
        return Ok(Json(TableDto::from(&table)));
    }

    Err(ServiceError::NotFound("Table not found."))
}

fn update_table_docs(op: TransformOperation) -> TransformOperation {
    op.description("Update an existing table. Only the provided fields are changed; the availability flag cannot be set here.")
        .tag("tables")
        .response::<200, Json<TableDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested table does not exist!"))
}

async fn delete_table(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<MessageDto>> {
    if state.db.delete_table(id).await? {
        return Ok(MessageDto::new("Table deleted successfully"));
    }

    Err(ServiceError::NotFound("Table not found."))
}

fn delete_table_docs(op: TransformOperation) -> TransformOperation {
    op.description("Delete an existing table.")
        .tag("tables")
        .response::<200, Json<MessageDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested table does not exist!"))
}
