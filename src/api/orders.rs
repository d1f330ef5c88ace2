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

use super::reservations::UserSummaryDto;
use super::{Created, MessageDto};

pub fn router(app_state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/orders/:id",
            get_with(get_order, get_order_docs)
                .patch_with(update_order, update_order_docs)
                .delete_with(delete_order, delete_order_docs),
        )
        .api_route(
            "/orders",
            get_with(list_orders, list_orders_docs).post_with(create_order, create_order_docs),
        )
        .with_state(app_state)
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct OrderDto {
    pub id: u64,
    pub user_id: u64,
    pub total_price: i64,
    pub status: String,
}

impl From<&models::Order> for OrderDto {
    fn from(value: &models::Order) -> Self {
        Self {
            id: value.id.to_owned(),
            user_id: value.user_id.to_owned(),
            total_price: value.total_price.to_owned(),
            status: value.status.to_owned(),
        }
    }
}

/// List entry: the order plus a display-ready summary of its user.
#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct OrderOverviewDto {
    pub id: u64,
    pub user_id: u64,
    pub total_price: i64,
    pub status: String,
    pub user: Option<UserSummaryDto>,
}

impl From<&models::OrderOverview> for OrderOverviewDto {
    fn from(value: &models::OrderOverview) -> Self {
        Self {
            id: value.order.id.to_owned(),
            user_id: value.order.user_id.to_owned(),
            total_price: value.order.total_price.to_owned(),
            status: value.order.status.to_owned(),
            user: value.user.as_ref().map(|u| u.into()),
        }
    }
}

pub async fn list_orders(mut state: RequestState) -> ServiceResult<Json<Vec<OrderOverviewDto>>> {
    let orders = state.db.get_all_orders().await?;
    Ok(Json(orders.iter().map(|o| o.into()).collect()))
}

fn list_orders_docs(op: TransformOperation) -> TransformOperation {
    op.description("List all orders with a summary of the ordering user.")
        .tag("orders")
        .response::<200, Json<Vec<OrderOverviewDto>>>()
}

pub async fn get_order(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<OrderDto>> {
    let order = state.db.get_order_by_id(id).await?;

    if let Some(order) = order {
        return Ok(Json(OrderDto::from(&order)));
    }

    Err(ServiceError::NotFound("Order not found."))
}

fn get_order_docs(op: TransformOperation) -> TransformOperation {
    op.description("Get an order by id.")
        .tag("orders")
        .response::<200, Json<OrderDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested order does not exist!"))
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct SaveOrderDto {
    pub user_id: u64,
    pub total_price: i64,
    pub status: Option<String>,
}

async fn create_order(
    mut state: RequestState,
    form: Json<SaveOrderDto>,
) -> ServiceResult<Created<OrderDto>> {
    let form = form.0;

    let order = models::Order {
        id: 0,
        user_id: form.user_id,
        total_price: form.total_price,
        status: form.status.unwrap_or_else(|| "pending".to_string()),
    };

    let order = state.db.store_order(order).await?;
    Ok(Created(OrderDto::from(&order)))
}

fn create_order_docs(op: TransformOperation) -> TransformOperation {
    op.description("Create a new order.")
        .tag("orders")
        .response::<201, Json<OrderDto>>()
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateOrderDto {
    pub status: Option<String>,
    pub total_price: Option<i64>,
}

async fn update_order(
    mut state: RequestState,
    Path(id): Path<u64>,
    form: Json<UpdateOrderDto>,
) -> ServiceResult<Json<OrderDto>> {
    let form = form.0;
    let order = state.db.get_order_by_id(id).await?;

    if let Some(mut order) = order {
        if let Some(status) = form.status {
            order.status = status;
        }
        if let Some(total_price) = form.total_price {
            order.total_price = total_price;
        }

        let order = state.db.store_order(order).await?;
        return Ok(Json(OrderDto::from(&order)));
    }

    Err(ServiceError::NotFound("Order not found."))
}

fn update_order_docs(op: TransformOperation) -> TransformOperation {
    op.description("Update an existing order. Only the provided fields are changed.")
        .tag("orders")
        .response::<200, Json<OrderDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested order does not exist!"))
}

async fn delete_order(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<MessageDto>> {
    if state.db.delete_order(id).await? {
        return Ok(MessageDto::new("Order deleted successfully"));
    }

    Err(ServiceError::NotFound("Order not found."))
}

fn delete_order_docs(op: TransformOperation) -> TransformOperation {
    op.description("Delete an existing order.")
        .tag("orders")
        .response::<200, Json<MessageDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested order does not exist!"))
}
