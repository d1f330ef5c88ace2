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
            "/order-items/:id",
            get_with(get_order_item, get_order_item_docs)
                .patch_with(update_order_item, update_order_item_docs)
                .delete_with(delete_order_item, delete_order_item_docs),
        )
        .api_route(
            "/order-items",
            get_with(list_order_items, list_order_items_docs)
                .post_with(create_order_item, create_order_item_docs),
        )
        .with_state(app_state)
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct OrderItemDto {
    pub id: u64,
    pub order_id: u64,
    pub menuitem_id: u64,
    pub quantity: i32,
    pub sub_total: i64,
}

impl From<&models::OrderItem> for OrderItemDto {
    fn from(value: &models::OrderItem) -> Self {
        Self {
            id: value.id.to_owned(),
            order_id: value.order_id.to_owned(),
            menuitem_id: value.menuitem_id.to_owned(),
            quantity: value.quantity.to_owned(),
            sub_total: value.sub_total.to_owned(),
        }
    }
}

pub async fn list_order_items(mut state: RequestState) -> ServiceResult<Json<Vec<OrderItemDto>>> {
    let order_items = state.db.get_all_order_items().await?;
    Ok(Json(order_items.iter().map(|i| i.into()).collect()))
}

fn list_order_items_docs(op: TransformOperation) -> TransformOperation {
    op.description("List all order items.")
        .tag("order_items")
        .response::<200, Json<Vec<OrderItemDto>>>()
}

pub async fn get_order_item(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<OrderItemDto>> {
    let order_item = state.db.get_order_item_by_id(id).await?;

    if let Some(order_item) = order_item {
        return Ok(Json(OrderItemDto::from(&order_item)));
    }

    Err(ServiceError::NotFound("Order item not found."))
}

fn get_order_item_docs(op: TransformOperation) -> TransformOperation {
    op.description("Get an order item by id.")
        .tag("order_items")
        .response::<200, Json<OrderItemDto>>()
        .response_with::<404, (), _>(|res| {
            res.description("The requested order item does not exist!")
        })
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct SaveOrderItemDto {
    pub order_id: u64,
    pub menuitem_id: u64,
    pub quantity: Option<i32>,
    pub sub_total: i64,
}

async fn create_order_item(
    mut state: RequestState,
    form: Json<SaveOrderItemDto>,
) -> ServiceResult<Created<OrderItemDto>> {
    let form = form.0;

    let order_item = models::OrderItem {
        id: 0,
        order_id: form.order_id,
        menuitem_id: form.menuitem_id,
        quantity: form.quantity.unwrap_or(1),
        sub_total: form.sub_total,
    };

    let order_item = state.db.store_order_item(order_item).await?;
    Ok(Created(OrderItemDto::from(&order_item)))
}

fn create_order_item_docs(op: TransformOperation) -> TransformOperation {
    op.description("Create a new order item.")
        .tag("order_items")
        .response::<201, Json<OrderItemDto>>()
        .response_with::<400, (), _>(|res| res.description("Invalid order item data!"))
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateOrderItemDto {
    pub quantity: Option<i32>,
    pub sub_total: Option<i64>,
}

async fn update_order_item(
    mut state: RequestState,
    Path(id): Path<u64>,
    form: Json<UpdateOrderItemDto>,
) -> ServiceResult<Json<OrderItemDto>> {
    let form = form.0;
    let order_item = state.db.get_order_item_by_id(id).await?;

    if let Some(mut order_item) = order_item {
        if let Some(quantity) = form.quantity {
            order_item.quantity = quantity;
        }
        if let Some(sub_total) = form.sub_total {
            order_item.sub_total = sub_total;
        }

        let order_item = state.db.store_order_item(order_item).await?;
        return Ok(Json(OrderItemDto::from(&order_item)));
    }

    Err(ServiceError::NotFound("Order item not found."))
}

fn update_order_item_docs(op: TransformOperation) -> TransformOperation {
    op.description("Update an existing order item. Only the provided fields are changed.")
        .tag("order_items")
        .response::<200, Json<OrderItemDto>>()
        .response_with::<404, (), _>(|res| {
            res.description("The requested order item does not exist!")
        })
}

async fn delete_order_item(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<MessageDto>> {
    if state.db.delete_order_item(id).await? {
        return Ok(MessageDto::new("Order item deleted successfully"));
    }

    Err(ServiceError::NotFound("Order item not found."))
}

fn delete_order_item_docs(op: TransformOperation) -> TransformOperation {
    op.description("Delete an existing order item.")
        .tag("order_items")
        .response::<200, Json<MessageDto>>()
        .response_with::<404, (), _>(|res| {
            res.description("The requested order item does not exist!")
        })
}
