use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::catalog_service::DEFAULT_PAGE_SIZE;
use crate::domain::product::{Product, ProductQuery};
use crate::errors::AppError;

use super::Catalog;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub author: String,
    pub publisher: String,
    pub category: String,
    pub description: String,
    /// Price in minor currency units.
    pub price: i64,
    /// Units currently in stock.
    pub quantity: i32,
    pub sold: i32,
    pub created_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            author: p.author,
            publisher: p.publisher,
            category: p.category,
            description: p.description,
            price: p.price,
            quantity: p.quantity,
            sold: p.sold,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListProductsParams {
    /// Free-text search over name, author, publisher and category.
    pub q: Option<String>,
    pub category: Option<String>,
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListProductsResponse {
    pub items: Vec<ProductResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockResponse {
    pub stock: i32,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "Paginated list of products", body = ListProductsResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(
    catalog: web::Data<Catalog>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let query = ProductQuery {
        search: params.q,
        category: params.category.filter(|c| !c.trim().is_empty()),
        page: params.page,
        limit: params.limit,
    };

    let result = web::block(move || catalog.list_products(query))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListProductsResponse {
        items: result.items.into_iter().map(ProductResponse::from).collect(),
        total: result.total,
        page: result.page,
        limit: result.limit,
    }))
}

/// GET /products/categories
#[utoipa::path(
    get,
    path = "/products/categories",
    responses(
        (status = 200, description = "Distinct category names", body = Vec<String>),
    ),
    tag = "products"
)]
pub async fn list_categories(catalog: web::Data<Catalog>) -> Result<HttpResponse, AppError> {
    let categories = web::block(move || catalog.categories())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(categories))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    catalog: web::Data<Catalog>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = web::block(move || catalog.get_product(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// GET /products/{id}/stock
#[utoipa::path(
    get,
    path = "/products/{id}/stock",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Units in stock", body = StockResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_stock(
    catalog: web::Data<Catalog>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let stock = web::block(move || catalog.stock(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(StockResponse { stock }))
}
