use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    CheckoutReceipt, CustomerOrders, OrderStatus, OrderView, Shipping, TargetStatus,
};
use crate::domain::ports::OrderRepository;
use crate::domain::transition::{
    plan_fulfillment, plan_transition, ConfirmPolicy, FulfillmentRules, NoFulfillment,
};

pub struct OrderService<R> {
    repo: R,
    confirm_policy: ConfirmPolicy,
    fulfillment: Box<dyn FulfillmentRules>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R, confirm_policy: ConfirmPolicy) -> Self {
        Self {
            repo,
            confirm_policy,
            fulfillment: Box::new(NoFulfillment),
        }
    }

    pub fn with_fulfillment(mut self, rules: impl FulfillmentRules) -> Self {
        self.fulfillment = Box::new(rules);
        self
    }

    pub fn checkout(
        &self,
        user_id: Uuid,
        shipping: Shipping,
    ) -> Result<CheckoutReceipt, DomainError> {
        match self.repo.checkout(user_id, shipping) {
            Ok(receipt) => {
                log::info!(
                    "Order {} placed by user {} (total {})",
                    receipt.order_id,
                    user_id,
                    receipt.total
                );
                Ok(receipt)
            }
            Err(e) => {
                log::warn!("Checkout rejected for user {}: {}", user_id, e);
                Err(e)
            }
        }
    }

    pub fn get_order(&self, user_id: Uuid, order_id: Uuid) -> Result<OrderView, DomainError> {
        let order = self
            .repo
            .find_by_id(order_id)?
            .ok_or(DomainError::NotFound("order"))?;
        if order.user_id != user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(order)
    }

    pub fn list_orders(&self, user_id: Uuid) -> Result<CustomerOrders, DomainError> {
        Ok(CustomerOrders::partition(self.repo.list_for_user(user_id)?))
    }

    /// Customer-requested status change; restocks on `CANCELED` and `RETURNED`.
    pub fn update_status(
        &self,
        user_id: Uuid,
        order_id: Uuid,
        target: TargetStatus,
        message: Option<String>,
    ) -> Result<OrderStatus, DomainError> {
        let policy = self.confirm_policy;
        let result = self.repo.transition(
            order_id,
            Some(user_id),
            &|current| plan_transition(current, target, policy),
            message,
        );
        match &result {
            Ok(status) => log::info!("Order {} moved to {} by user {}", order_id, status, user_id),
            Err(e) => log::warn!(
                "Status change of order {} to {:?} rejected: {}",
                order_id,
                target,
                e
            ),
        }
        result
    }

    pub fn cancel(&self, user_id: Uuid, order_id: Uuid) -> Result<OrderStatus, DomainError> {
        self.update_status(user_id, order_id, TargetStatus::Canceled, None)
    }

    pub fn return_order(&self, user_id: Uuid, order_id: Uuid) -> Result<OrderStatus, DomainError> {
        self.update_status(user_id, order_id, TargetStatus::Returned, None)
    }

    pub fn confirm(&self, user_id: Uuid, order_id: Uuid) -> Result<OrderStatus, DomainError> {
        self.update_status(user_id, order_id, TargetStatus::Confirmed, None)
    }

    /// Status change reported by the fulfillment process, gated by the
    /// configured [`FulfillmentRules`]. Never touches inventory.
    pub fn record_fulfillment(
        &self,
        order_id: Uuid,
        status: OrderStatus,
        message: Option<String>,
    ) -> Result<OrderStatus, DomainError> {
        let rules = self.fulfillment.as_ref();
        let next = self.repo.transition(
            order_id,
            None,
            &|current| plan_fulfillment(rules, current, status),
            message,
        )?;
        log::info!("Order {} moved to {} by fulfillment", order_id, next);
        Ok(next)
    }
}
