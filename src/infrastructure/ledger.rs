//! Inventory ledger: every change to a product's `quantity` / `sold` pair goes
//! through here, as a single conditional UPDATE on the connection of the
//! surrounding transaction.
//!
//! A conditional UPDATE takes the row lock and re-evaluates its predicate
//! against the latest committed version, so two concurrent reservations for
//! the same product cannot both pass the stock check.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::schema::products;

use super::models::ProductRow;

/// `quantity -= n; sold += n`, only if `n` units are available.
pub fn reserve(conn: &mut PgConnection, product_id: Uuid, n: i32) -> Result<(), DomainError> {
    if n < 1 {
        return Err(DomainError::InvalidInput(format!(
            "cannot reserve {n} units of product {product_id}"
        )));
    }

    let updated = diesel::update(products::table)
        .filter(products::id.eq(product_id))
        .filter(products::quantity.ge(n))
        .set((
            products::quantity.eq(products::quantity - n),
            products::sold.eq(products::sold + n),
        ))
        .execute(conn)?;
    if updated == 1 {
        return Ok(());
    }

    match available(conn, product_id)? {
        Some(available) => Err(DomainError::InsufficientStock {
            product_id,
            available,
        }),
        None => Err(DomainError::NotFound("product")),
    }
}

/// `quantity += n; sold -= n`. A resulting negative `sold` is surfaced as an
/// integrity fault and aborts the surrounding transaction.
pub fn release(conn: &mut PgConnection, product_id: Uuid, n: i32) -> Result<(), DomainError> {
    let sold: Option<i32> = diesel::update(products::table.find(product_id))
        .set((
            products::quantity.eq(products::quantity + n),
            products::sold.eq(products::sold - n),
        ))
        .returning(products::sold)
        .get_result(conn)
        .optional()?;

    match sold {
        Some(sold) if sold < 0 => Err(DomainError::IntegrityFault(format!(
            "product {product_id} sold count went negative ({sold}) releasing {n} units"
        ))),
        Some(_) => Ok(()),
        None => Err(DomainError::NotFound("product")),
    }
}

/// Adds fresh stock without touching `sold`.
pub fn restock(
    conn: &mut PgConnection,
    product_id: Uuid,
    n: i32,
) -> Result<ProductRow, DomainError> {
    if n < 1 {
        return Err(DomainError::InvalidInput(format!(
            "restock quantity must be at least 1, got {n}"
        )));
    }
    diesel::update(products::table.find(product_id))
        .set(products::quantity.eq(products::quantity + n))
        .returning(ProductRow::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or(DomainError::NotFound("product"))
}

pub fn available(conn: &mut PgConnection, product_id: Uuid) -> Result<Option<i32>, DomainError> {
    Ok(products::table
        .find(product_id)
        .select(products::quantity)
        .first(conn)
        .optional()?)
}
