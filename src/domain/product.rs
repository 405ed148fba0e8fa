use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub author: String,
    pub publisher: String,
    pub category: String,
    pub description: String,
    /// Unit price in minor currency units.
    pub price: i64,
    /// Available stock.
    pub quantity: i32,
    /// Cumulative units sold.
    pub sold: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub author: String,
    pub publisher: String,
    pub category: String,
    pub description: String,
    pub price: i64,
    pub quantity: i32,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "product name must not be empty".to_string(),
            ));
        }
        if self.price < 0 || self.quantity < 0 {
            return Err(DomainError::InvalidInput(
                "price and quantity must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Filters for browsing the catalog.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Case-insensitive substring matched against name, author, publisher and category.
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: i64,
    /// The page actually served, after clamping.
    pub page: i64,
    pub limit: i64,
}
