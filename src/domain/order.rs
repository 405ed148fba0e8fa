use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Canceled,
    Returned,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Canceled => "CANCELED",
            OrderStatus::Returned => "RETURNED",
        }
    }

    /// Statuses a customer still has to act on or wait for.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Shipped | OrderStatus::Delivered
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELED" => Ok(OrderStatus::Canceled),
            "RETURNED" => Ok(OrderStatus::Returned),
            other => Err(DomainError::IntegrityFault(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

/// Statuses a customer may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetStatus {
    Canceled,
    Returned,
    Confirmed,
}

impl From<TargetStatus> for OrderStatus {
    fn from(t: TargetStatus) -> Self {
        match t {
            TargetStatus::Canceled => OrderStatus::Canceled,
            TargetStatus::Returned => OrderStatus::Returned,
            TargetStatus::Confirmed => OrderStatus::Confirmed,
        }
    }
}

/// Shipping details captured at checkout; never re-read from the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipping {
    pub name: String,
    pub address: String,
    pub email: String,
}

impl Shipping {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() || self.address.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "shipping name and address are required".to_string(),
            ));
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(DomainError::InvalidInput(format!(
                "invalid shipping email '{email}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: Uuid,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price frozen at purchase time.
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub status: OrderStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping: Shipping,
    pub total: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
    pub history: Vec<HistoryEntry>,
}

/// A customer's orders split the way the storefront displays them.
#[derive(Debug, Clone, Default)]
pub struct CustomerOrders {
    pub active: Vec<OrderView>,
    pub completed: Vec<OrderView>,
}

impl CustomerOrders {
    pub fn partition(orders: Vec<OrderView>) -> Self {
        let (active, completed) = orders.into_iter().partition(|o| o.status.is_active());
        Self { active, completed }
    }
}
