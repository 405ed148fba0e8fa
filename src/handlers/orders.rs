use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{
    HistoryEntry, OrderItemView, OrderStatus, OrderView, Shipping, TargetStatus,
};
use crate::errors::AppError;

use super::auth::AuthenticatedUser;
use super::Orders;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub name: String,
    pub address: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub total: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub order_id: Uuid,
    pub status: TargetStatus,
    /// Free-text note stored in the order history.
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price at the time of purchase.
    pub price: i64,
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(i: OrderItemView) -> Self {
        Self {
            id: i.id,
            product_id: i.product_id,
            product_name: i.product_name,
            quantity: i.quantity,
            price: i.price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub status: OrderStatus,
    pub message: String,
    pub created_at: String,
}

impl From<HistoryEntry> for HistoryResponse {
    fn from(h: HistoryEntry) -> Self {
        Self {
            status: h.status,
            message: h.message,
            created_at: h.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub email: String,
    pub total: i64,
    pub status: OrderStatus,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
    pub history: Vec<HistoryResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            name: o.shipping.name,
            address: o.shipping.address,
            email: o.shipping.email,
            total: o.total,
            status: o.status,
            created_at: o.created_at.to_rfc3339(),
            items: o.items.into_iter().map(OrderItemResponse::from).collect(),
            history: o.history.into_iter().map(HistoryResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    /// PENDING, SHIPPED and DELIVERED orders.
    pub active: Vec<OrderResponse>,
    /// CONFIRMED, CANCELED and RETURNED orders.
    pub completed: Vec<OrderResponse>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /checkout
///
/// Turns the selected cart lines into a PENDING order. Stock is reserved, item
/// prices are frozen and the consumed lines are removed in one transaction; if
/// any line fails nothing is changed.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = CheckoutResponse),
        (status = 400, description = "Empty selection, invalid shipping details or insufficient stock"),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn checkout(
    user: AuthenticatedUser,
    orders: web::Data<Orders>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let shipping = Shipping {
        name: body.name,
        address: body.address,
        email: body.email,
    };

    let receipt = web::block(move || orders.checkout(user.id, shipping))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CheckoutResponse {
        order_id: receipt.order_id,
        total: receipt.total,
    }))
}

/// GET /orders
///
/// Returns the caller's orders, newest first, split into active and completed.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "The caller's orders", body = ListOrdersResponse),
        (status = 401, description = "Not signed in"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    user: AuthenticatedUser,
    orders: web::Data<Orders>,
) -> Result<HttpResponse, AppError> {
    let result = web::block(move || orders.list_orders(user.id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        active: result.active.into_iter().map(OrderResponse::from).collect(),
        completed: result.completed.into_iter().map(OrderResponse::from).collect(),
    }))
}

/// GET /orders/{id}
///
/// Returns the order together with its items and status history.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    user: AuthenticatedUser,
    orders: web::Data<Orders>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || orders.get_order(user.id, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /orders
///
/// Customer-requested status change. CANCELED and RETURNED put the reserved
/// stock back; CONFIRMED only records receipt.
#[utoipa::path(
    put,
    path = "/orders",
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = StatusResponse),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed from the current status"),
    ),
    tag = "orders"
)]
pub async fn update_status(
    user: AuthenticatedUser,
    orders: web::Data<Orders>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let status = web::block(move || {
        orders.update_status(user.id, body.order_id, body.status, body.message)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(StatusResponse { status }))
}

/// PUT /orders/{id}/cancel
#[utoipa::path(
    put,
    path = "/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order canceled and stock restored", body = StatusResponse),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is no longer PENDING"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    user: AuthenticatedUser,
    orders: web::Data<Orders>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let status = web::block(move || orders.cancel(user.id, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(StatusResponse { status }))
}

/// PUT /orders/{id}/return
#[utoipa::path(
    put,
    path = "/orders/{id}/return",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order returned and stock restored", body = StatusResponse),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order has not been delivered"),
    ),
    tag = "orders"
)]
pub async fn return_order(
    user: AuthenticatedUser,
    orders: web::Data<Orders>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let status = web::block(move || orders.return_order(user.id, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(StatusResponse { status }))
}

/// PUT /orders/{id}/confirm
#[utoipa::path(
    put,
    path = "/orders/{id}/confirm",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Receipt confirmed", body = StatusResponse),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order cannot be confirmed from its current status"),
    ),
    tag = "orders"
)]
pub async fn confirm_order(
    user: AuthenticatedUser,
    orders: web::Data<Orders>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let status = web::block(move || orders.confirm(user.id, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(StatusResponse { status }))
}
