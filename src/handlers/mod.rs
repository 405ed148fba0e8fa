pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use crate::application::cart_service::CartService;
use crate::application::catalog_service::CatalogService;
use crate::application::order_service::OrderService;
use crate::infrastructure::cart_repo::DieselCartRepository;
use crate::infrastructure::catalog_repo::DieselCatalogRepository;
use crate::infrastructure::order_repo::DieselOrderRepository;

pub type Catalog = CatalogService<DieselCatalogRepository>;
pub type Carts = CartService<DieselCartRepository>;
pub type Orders = OrderService<DieselOrderRepository>;
