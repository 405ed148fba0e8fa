use uuid::Uuid;

use super::cart::{AddLine, CartLine, Reconciliation, UpdateLine};
use super::errors::DomainError;
use super::order::{CheckoutReceipt, OrderStatus, OrderView, Shipping};
use super::product::{NewProduct, Product, ProductPage, ProductQuery};
use super::transition::TransitionPlan;

pub trait CatalogRepository: Send + Sync + 'static {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
    fn search(&self, query: &ProductQuery) -> Result<ProductPage, DomainError>;
    fn categories(&self) -> Result<Vec<String>, DomainError>;
    /// Raises available stock; the only way `quantity + sold` grows.
    fn restock(&self, id: Uuid, quantity: i32) -> Result<Product, DomainError>;
}

pub trait CartRepository: Send + Sync + 'static {
    fn add_line(&self, user_id: Uuid, line: AddLine) -> Result<CartLine, DomainError>;
    fn update_line(&self, user_id: Uuid, update: UpdateLine) -> Result<CartLine, DomainError>;
    fn remove_line(&self, user_id: Uuid, cart_id: Uuid) -> Result<(), DomainError>;
    /// Lines exactly as stored, without consulting stock.
    fn stored_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, DomainError>;
    /// Clamps lines to live stock and deletes those whose product ran out.
    /// Restricted to one product's line when `product_id` is given.
    fn reconcile(
        &self,
        user_id: Uuid,
        product_id: Option<Uuid>,
    ) -> Result<Reconciliation, DomainError>;
}

/// Decides, from an order's current status, what a transition must do.
pub type TransitionDecision<'a> = &'a dyn Fn(OrderStatus) -> Result<TransitionPlan, DomainError>;

pub trait OrderRepository: Send + Sync + 'static {
    /// Turns the user's selected cart lines into a pending order, reserving
    /// stock for every line, all in one transaction.
    fn checkout(&self, user_id: Uuid, shipping: Shipping) -> Result<CheckoutReceipt, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError>;
    /// Locks the order, asks `decide` for a plan, then applies it atomically:
    /// status update, optional restock and exactly one history row.
    /// `owner` is checked when present.
    fn transition(
        &self,
        order_id: Uuid,
        owner: Option<Uuid>,
        decide: TransitionDecision<'_>,
        message: Option<String>,
    ) -> Result<OrderStatus, DomainError>;
}
