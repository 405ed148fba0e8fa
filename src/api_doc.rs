use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::order::{OrderStatus, TargetStatus};
use crate::handlers::{cart, orders, products};

struct SessionAuth;

impl Modify for SessionAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Session token; the `token` cookie is accepted as well",
                    ))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionAuth),
    info(
        title = "Bookstore API",
        description = "Catalog, cart and order lifecycle of the bookstore."
    ),
    tags(
        (name = "products", description = "Catalog and stock"),
        (name = "cart", description = "The caller's shopping cart"),
        (name = "orders", description = "Checkout and order lifecycle")
    ),
    paths(
        products::list_products,
        products::list_categories,
        products::get_product,
        products::get_stock,
        cart::list_cart,
        cart::add_line,
        cart::update_line,
        cart::remove_line,
        orders::checkout,
        orders::list_orders,
        orders::get_order,
        orders::update_status,
        orders::cancel_order,
        orders::return_order,
        orders::confirm_order,
    ),
    components(schemas(
        products::ProductResponse,
        products::ListProductsResponse,
        products::StockResponse,
        cart::AddCartLineRequest,
        cart::UpdateCartLineRequest,
        cart::RemoveCartLineRequest,
        cart::CartLineResponse,
        cart::StoredCartLineResponse,
        cart::LineQuantityResponse,
        orders::CheckoutRequest,
        orders::CheckoutResponse,
        orders::UpdateStatusRequest,
        orders::StatusResponse,
        orders::OrderItemResponse,
        orders::HistoryResponse,
        orders::OrderResponse,
        orders::ListOrdersResponse,
        OrderStatus,
        TargetStatus,
    ))
)]
pub struct ApiDoc;
