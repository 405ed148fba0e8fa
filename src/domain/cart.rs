use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::product::Product;

/// A cart line exactly as it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub selected: bool,
    pub created_at: DateTime<Utc>,
}

/// A cart line as shown to the customer, with its quantity clamped to live stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub available: i32,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct AddLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub selected: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct UpdateLine {
    pub cart_id: Uuid,
    pub quantity: i32,
    pub selected: Option<bool>,
}

/// Outcome of comparing stored cart lines with live stock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub lines: Vec<CartLineView>,
    /// Lines whose product is out of stock; these must be deleted.
    pub pruned: Vec<Uuid>,
}

pub fn ensure_positive_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity < 1 {
        return Err(DomainError::InvalidInput(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }
    Ok(())
}

/// Fails with `InsufficientStock` when `requested` exceeds the product's live quantity.
pub fn ensure_within_stock(product: &Product, requested: i32) -> Result<(), DomainError> {
    if requested > product.quantity {
        return Err(DomainError::InsufficientStock {
            product_id: product.id,
            available: product.quantity,
        });
    }
    Ok(())
}

/// Clamps each line to `min(stored, stock)` and marks lines whose product has
/// no stock left for pruning. Pure: the caller applies the deletions.
pub fn reconcile(stocked: Vec<(CartLine, Product)>) -> Reconciliation {
    let mut out = Reconciliation::default();
    for (line, product) in stocked {
        if product.quantity <= 0 {
            out.pruned.push(line.id);
            continue;
        }
        out.lines.push(CartLineView {
            id: line.id,
            product_id: product.id,
            product_name: product.name,
            unit_price: product.price,
            quantity: line.quantity.min(product.quantity),
            available: product.quantity,
            selected: line.selected,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Clean Code".to_string(),
            author: "Robert C. Martin".to_string(),
            publisher: "Prentice Hall".to_string(),
            category: "Technology".to_string(),
            description: String::new(),
            price: 450_000,
            quantity,
            sold: 0,
            created_at: Utc::now(),
        }
    }

    fn line(product: &Product, quantity: i32) -> CartLine {
        CartLine {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            product_id: product.id,
            quantity,
            selected: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn reconcile_clamps_quantity_to_stock() {
        let p = product(3);
        let l = line(&p, 5);
        let result = reconcile(vec![(l.clone(), p)]);

        assert!(result.pruned.is_empty());
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].id, l.id);
        assert_eq!(result.lines[0].quantity, 3);
        assert_eq!(result.lines[0].available, 3);
    }

    #[test]
    fn reconcile_keeps_quantity_below_stock() {
        let p = product(10);
        let l = line(&p, 2);
        let result = reconcile(vec![(l, p)]);
        assert_eq!(result.lines[0].quantity, 2);
    }

    #[test]
    fn reconcile_prunes_out_of_stock_lines() {
        let gone = product(0);
        let kept = product(4);
        let gone_line = line(&gone, 1);
        let kept_line = line(&kept, 1);

        let result = reconcile(vec![(gone_line.clone(), gone), (kept_line.clone(), kept)]);

        assert_eq!(result.pruned, vec![gone_line.id]);
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].id, kept_line.id);
    }

    #[test]
    fn ensure_positive_quantity_rejects_zero_and_negative() {
        assert!(matches!(
            ensure_positive_quantity(0),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            ensure_positive_quantity(-2),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(ensure_positive_quantity(1).is_ok());
    }

    #[test]
    fn ensure_within_stock_reports_available_quantity() {
        let p = product(7);
        match ensure_within_stock(&p, 8) {
            Err(DomainError::InsufficientStock {
                product_id,
                available,
            }) => {
                assert_eq!(product_id, p.id);
                assert_eq!(available, 7);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert!(ensure_within_stock(&p, 7).is_ok());
    }
}
