use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::cart::{AddLine, CartLine, CartLineView, UpdateLine};
use crate::errors::AppError;

use super::auth::AuthenticatedUser;
use super::Carts;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct CartQuery {
    /// Only report the displayed quantity of this product's line.
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCartLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
    pub selected: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartLineRequest {
    pub cart_id: Uuid,
    pub quantity: i32,
    pub selected: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartLineRequest {
    pub cart_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price: i64,
    /// Stored quantity clamped to current stock.
    pub quantity: i32,
    pub available: i32,
    pub selected: bool,
}

impl From<CartLineView> for CartLineResponse {
    fn from(v: CartLineView) -> Self {
        Self {
            id: v.id,
            product_id: v.product_id,
            product_name: v.product_name,
            unit_price: v.unit_price,
            quantity: v.quantity,
            available: v.available,
            selected: v.selected,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredCartLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub selected: bool,
}

impl From<CartLine> for StoredCartLineResponse {
    fn from(l: CartLine) -> Self {
        Self {
            id: l.id,
            product_id: l.product_id,
            quantity: l.quantity,
            selected: l.selected,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LineQuantityResponse {
    pub quantity: i32,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
///
/// Lists the caller's cart with quantities clamped to live stock. Lines whose
/// product is out of stock are deleted as part of the listing.
#[utoipa::path(
    get,
    path = "/cart",
    params(CartQuery),
    responses(
        (status = 200, description = "Cart lines, or one line's quantity when productId is given", body = Vec<CartLineResponse>),
        (status = 401, description = "Not signed in"),
    ),
    tag = "cart"
)]
pub async fn list_cart(
    user: AuthenticatedUser,
    carts: web::Data<Carts>,
    query: web::Query<CartQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;

    if let Some(product_id) = query.into_inner().product_id {
        let quantity = web::block(move || carts.line_quantity(user_id, product_id))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;
        return Ok(HttpResponse::Ok().json(LineQuantityResponse { quantity }));
    }

    let lines = web::block(move || carts.list_lines(user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    let body: Vec<CartLineResponse> = lines.into_iter().map(CartLineResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /cart
#[utoipa::path(
    post,
    path = "/cart",
    request_body = AddCartLineRequest,
    responses(
        (status = 200, description = "Line added or merged", body = StoredCartLineResponse),
        (status = 400, description = "Quantity exceeds stock or is not positive"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Product not found"),
    ),
    tag = "cart"
)]
pub async fn add_line(
    user: AuthenticatedUser,
    carts: web::Data<Carts>,
    body: web::Json<AddCartLineRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let line = AddLine {
        product_id: body.product_id,
        quantity: body.quantity,
        selected: body.selected,
    };

    let stored = web::block(move || carts.add_line(user.id, line))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(StoredCartLineResponse::from(stored)))
}

/// PUT /cart
#[utoipa::path(
    put,
    path = "/cart",
    request_body = UpdateCartLineRequest,
    responses(
        (status = 200, description = "Line updated", body = StoredCartLineResponse),
        (status = 400, description = "Quantity exceeds stock or is not positive"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Cart line not found"),
    ),
    tag = "cart"
)]
pub async fn update_line(
    user: AuthenticatedUser,
    carts: web::Data<Carts>,
    body: web::Json<UpdateCartLineRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let update = UpdateLine {
        cart_id: body.cart_id,
        quantity: body.quantity,
        selected: body.selected,
    };

    let stored = web::block(move || carts.update_line(user.id, update))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(StoredCartLineResponse::from(stored)))
}

/// DELETE /cart
#[utoipa::path(
    delete,
    path = "/cart",
    request_body = RemoveCartLineRequest,
    responses(
        (status = 204, description = "Line removed"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Cart line not found"),
    ),
    tag = "cart"
)]
pub async fn remove_line(
    user: AuthenticatedUser,
    carts: web::Data<Carts>,
    body: web::Json<RemoveCartLineRequest>,
) -> Result<HttpResponse, AppError> {
    let cart_id = body.into_inner().cart_id;

    web::block(move || carts.remove_line(user.id, cart_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::NoContent().finish())
}
