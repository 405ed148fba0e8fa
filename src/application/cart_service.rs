use uuid::Uuid;

use crate::domain::cart::{AddLine, CartLine, CartLineView, UpdateLine};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;

pub struct CartService<R> {
    repo: R,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_line(&self, user_id: Uuid, line: AddLine) -> Result<CartLine, DomainError> {
        self.repo.add_line(user_id, line).inspect_err(|e| {
            log::warn!("Rejected add to cart for user {}: {}", user_id, e);
        })
    }

    pub fn update_line(&self, user_id: Uuid, update: UpdateLine) -> Result<CartLine, DomainError> {
        self.repo.update_line(user_id, update).inspect_err(|e| {
            log::warn!("Rejected cart update for user {}: {}", user_id, e);
        })
    }

    pub fn remove_line(&self, user_id: Uuid, cart_id: Uuid) -> Result<(), DomainError> {
        self.repo.remove_line(user_id, cart_id)
    }

    /// Displayed cart. Side effect: lines whose product is out of stock are deleted.
    pub fn list_lines(&self, user_id: Uuid) -> Result<Vec<CartLineView>, DomainError> {
        Ok(self.repo.reconcile(user_id, None)?.lines)
    }

    /// Displayed quantity of one product's line, 0 when absent or pruned.
    pub fn line_quantity(&self, user_id: Uuid, product_id: Uuid) -> Result<i32, DomainError> {
        Ok(self
            .repo
            .reconcile(user_id, Some(product_id))?
            .lines
            .first()
            .map_or(0, |line| line.quantity))
    }

    pub fn stored_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
        self.repo.stored_lines(user_id)
    }
}
