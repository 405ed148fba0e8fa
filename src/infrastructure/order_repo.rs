use diesel::dsl::now;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    CheckoutReceipt, HistoryEntry, OrderItemView, OrderStatus, OrderView, Shipping,
};
use crate::domain::ports::{OrderRepository, TransitionDecision};
use crate::schema::{cart_lines, order_history, order_items, orders, products};

use super::ledger;
use super::models::{
    CartLineRow, NewOrderHistoryRow, NewOrderItemRow, NewOrderRow, OrderHistoryRow, OrderItemRow,
    OrderRow, ProductRow,
};

const ORDER_PLACED: &str = "Order placed";

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn append_history(
    conn: &mut PgConnection,
    order_id: Uuid,
    status: OrderStatus,
    message: &str,
) -> Result<(), DomainError> {
    diesel::insert_into(order_history::table)
        .values(&NewOrderHistoryRow {
            id: Uuid::new_v4(),
            order_id,
            status: status.as_str().to_string(),
            message: message.to_string(),
        })
        .execute(conn)?;
    Ok(())
}

fn to_views(conn: &mut PgConnection, rows: Vec<OrderRow>) -> Result<Vec<OrderView>, DomainError> {
    let items: Vec<(OrderItemRow, String)> = OrderItemRow::belonging_to(&rows)
        .inner_join(products::table)
        .select((OrderItemRow::as_select(), products::name))
        .order(products::name.asc())
        .load(conn)?;
    let history: Vec<OrderHistoryRow> = OrderHistoryRow::belonging_to(&rows)
        .select(OrderHistoryRow::as_select())
        .order(order_history::created_at.asc())
        .load(conn)?;

    let items = items.grouped_by(&rows);
    let history = history.grouped_by(&rows);

    rows.into_iter()
        .zip(items)
        .zip(history)
        .map(|((order, items), history)| -> Result<OrderView, DomainError> {
            Ok(OrderView {
                id: order.id,
                user_id: order.user_id,
                shipping: Shipping {
                    name: order.shipping_name,
                    address: order.shipping_address,
                    email: order.shipping_email,
                },
                total: order.total,
                status: order.status.parse()?,
                created_at: order.created_at,
                items: items
                    .into_iter()
                    .map(|(item, product_name)| OrderItemView {
                        id: item.id,
                        product_id: item.product_id,
                        product_name,
                        quantity: item.quantity,
                        price: item.price,
                    })
                    .collect(),
                history: history
                    .into_iter()
                    .map(|h| -> Result<HistoryEntry, DomainError> {
                        Ok(HistoryEntry {
                            status: h.status.parse()?,
                            message: h.message,
                            created_at: h.created_at,
                        })
                    })
                    .collect::<Result<_, DomainError>>()?,
            })
        })
        .collect()
}

impl OrderRepository for DieselOrderRepository {
    fn checkout(&self, user_id: Uuid, shipping: Shipping) -> Result<CheckoutReceipt, DomainError> {
        shipping.validate()?;
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Selected lines with live product rows, locked until commit.
            // Rows are locked in product id order, the same order every
            // checkout and restock uses, so they cannot deadlock each other.
            let lines: Vec<(CartLineRow, ProductRow)> = cart_lines::table
                .inner_join(products::table)
                .filter(cart_lines::user_id.eq(user_id))
                .filter(cart_lines::selected.eq(true))
                .select((CartLineRow::as_select(), ProductRow::as_select()))
                .order(products::id.asc())
                .for_update()
                .load(conn)?;
            if lines.is_empty() {
                return Err(DomainError::EmptyCart);
            }

            // 2. Total at current prices, then the order itself.
            let total = lines.iter().try_fold(0i64, |acc, (line, product)| {
                i64::from(line.quantity)
                    .checked_mul(product.price)
                    .and_then(|subtotal| acc.checked_add(subtotal))
                    .ok_or_else(|| DomainError::InvalidInput("order total overflows".to_string()))
            })?;

            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    user_id,
                    shipping_name: shipping.name.trim().to_string(),
                    shipping_address: shipping.address.trim().to_string(),
                    shipping_email: shipping.email.trim().to_string(),
                    total,
                    status: OrderStatus::Pending.as_str().to_string(),
                })
                .execute(conn)?;

            // 3-5. Re-validate, reserve and freeze each line.
            let mut consumed = Vec::with_capacity(lines.len());
            for (line, product) in &lines {
                if line.quantity <= 0 {
                    return Err(DomainError::InvalidInput(format!(
                        "invalid quantity {} for product {}",
                        line.quantity, product.id
                    )));
                }
                if line.quantity > product.quantity {
                    return Err(DomainError::InsufficientStock {
                        product_id: product.id,
                        available: product.quantity,
                    });
                }
                ledger::reserve(conn, product.id, line.quantity)?;

                diesel::insert_into(order_items::table)
                    .values(&NewOrderItemRow {
                        id: Uuid::new_v4(),
                        order_id,
                        product_id: product.id,
                        quantity: line.quantity,
                        price: product.price,
                    })
                    .execute(conn)?;
                consumed.push(line.id);
            }

            // 6. Only the consumed lines; unselected ones stay in the cart.
            diesel::delete(cart_lines::table.filter(cart_lines::id.eq_any(&consumed)))
                .execute(conn)?;

            append_history(conn, order_id, OrderStatus::Pending, ORDER_PLACED)?;

            Ok(CheckoutReceipt { order_id, total })
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        Ok(to_views(&mut conn, vec![order])?.pop())
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let rows = orders::table
                .filter(orders::user_id.eq(user_id))
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.asc()))
                .load(conn)?;
            to_views(conn, rows)
        })
    }

    fn transition(
        &self,
        order_id: Uuid,
        owner: Option<Uuid>,
        decide: TransitionDecision<'_>,
        message: Option<String>,
    ) -> Result<OrderStatus, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // The row lock makes a concurrent second transition see the new
            // status, so a restock can never run twice.
            let order = orders::table
                .find(order_id)
                .select(OrderRow::as_select())
                .for_update()
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound("order"))?;

            if owner.is_some_and(|owner| owner != order.user_id) {
                return Err(DomainError::Forbidden);
            }

            let current: OrderStatus = order.status.parse()?;
            let plan = decide(current)?;

            diesel::update(orders::table.find(order_id))
                .set((
                    orders::status.eq(plan.next.as_str()),
                    orders::updated_at.eq(now),
                ))
                .execute(conn)?;

            if plan.restock {
                let items = order_items::table
                    .filter(order_items::order_id.eq(order_id))
                    .select(OrderItemRow::as_select())
                    .order(order_items::product_id.asc())
                    .load(conn)?;
                for item in items {
                    ledger::release(conn, item.product_id, item.quantity)?;
                }
            }

            let message = message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(plan.default_message);
            append_history(conn, order_id, plan.next, message)?;

            Ok(plan.next)
        })
    }
}
