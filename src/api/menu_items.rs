use aide::axum::routing::get_with;
use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::{Path, Query};
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
            "/menu-items/:id",
            get_with(get_menu_item, get_menu_item_docs)
                .patch_with(update_menu_item, update_menu_item_docs)
                .delete_with(delete_menu_item, delete_menu_item_docs),
        )
        .api_route(
            "/menu-items",
            get_with(list_menu_items, list_menu_items_docs)
                .post_with(create_menu_item, create_menu_item_docs),
        )
        .with_state(app_state)
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct MenuItemDto {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub outlet_id: u64,
}

impl From<&models::MenuItem> for MenuItemDto {
    fn from(value: &models::MenuItem) -> Self {
        Self {
            id: value.id.to_owned(),
            name: value.name.to_owned(),
            description: value.description.to_owned(),
            price: value.price.to_owned(),
            category: value.category.to_owned(),
            outlet_id: value.outlet_id.to_owned(),
        }
    }
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct MenuItemListQuery {
    /// Restrict the list to the menu of one outlet.
    pub outlet_id: Option<u64>,
}

pub async fn list_menu_items(
    mut state: RequestState,
    Query(query): Query<MenuItemListQuery>,
) -> ServiceResult<Json<Vec<MenuItemDto>>> {
    let menu_items = state.db.get_all_menu_items(query.outlet_id).await?;
    Ok(Json(menu_items.iter().map(|m| m.into()).collect()))
}

fn list_menu_items_docs(op: TransformOperation) -> TransformOperation {
    op.description("List all menu items, optionally filtered by outlet.")
        .tag("menu_items")
        .response::<200, Json<Vec<MenuItemDto>>>()
}

pub async fn get_menu_item(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<MenuItemDto>> {
    let menu_item = state.db.get_menu_item_by_id(id).await?;

    if let Some(menu_item) = menu_item {
        return Ok(Json(MenuItemDto::from(&menu_item)));
    }

    Err(ServiceError::NotFound("Menu item not found."))
}

fn get_menu_item_docs(op: TransformOperation) -> TransformOperation {
    op.description("Get a menu item by id.")
        .tag("menu_items")
        .response::<200, Json<MenuItemDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested menu item does not exist!"))
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct SaveMenuItemDto {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub outlet_id: u64,
}

async fn create_menu_item(
    mut state: RequestState,
    form: Json<SaveMenuItemDto>,
) -> ServiceResult<Created<MenuItemDto>> {
    let form = form.0;

    let menu_item = models::MenuItem {
        id: 0,
        name: form.name,
        description: form.description,
        price: form.price,
        category: form.category,
        outlet_id: form.outlet_id,
    };

    let menu_item = state.db.store_menu_item(menu_item).await?;
    Ok(Created(MenuItemDto::from(&menu_item)))
}

fn create_menu_item_docs(op: TransformOperation) -> TransformOperation {
    op.description("Create a new menu item.")
        .tag("menu_items")
        .response::<201, Json<MenuItemDto>>()
        .response_with::<400, (), _>(|res| {
            res.description("Menu item already exists or invalid data!")
        })
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateMenuItemDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub category: Option<String>,
    pub outlet_id: Option<u64>,
}

async fn update_menu_item(
    mut state: RequestState,
    Path(id): Path<u64>,
    form: Json<UpdateMenuItemDto>,
) -> ServiceResult<Json<MenuItemDto>> {
    let form = form.0;
    let menu_item = state.db.get_menu_item_by_id(id).await?;

    if let Some(mut menu_item) = menu_item {
        if let Some(name) = form.name {
            menu_item.name = name;
        }
        if let Some(description) = form.description {
            menu_item.description = description;
        }
        if let Some(price) = form.price {
            menu_item.price = price;
        }
        if let Some(category) = form.category {
            menu_item.category = category;
        }
        if let Some(outlet_id) = form.outlet_id {
            menu_item.outlet_id = outlet_id;
        }

        let menu_item = state.db.store_menu_item(menu_item).await?;
        return Ok(Json(MenuItemDto::from(&menu_item)));
    }

    Err(ServiceError::NotFound("Menu item not found."))
}

fn update_menu_item_docs(op: TransformOperation) -> TransformOperation {
    op.description("Update an existing menu item. Only the provided fields are changed.")
        .tag("menu_items")
        .response::<200, Json<MenuItemDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested menu item does not exist!"))
}

async fn delete_menu_item(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<MessageDto>> {
    if state.db.delete_menu_item(id).await? {
        return Ok(MessageDto::new("Menu item deleted successfully"));
    }

    Err(ServiceError::NotFound("Menu item not found."))
}

fn delete_menu_item_docs(op: TransformOperation) -> TransformOperation {
    op.description("Delete an existing menu item.")
        .tag("menu_items")
        .response::<200, Json<MessageDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested menu item does not exist!"))
}
