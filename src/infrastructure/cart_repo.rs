use diesel::dsl::now;
use diesel::prelude::*;
use diesel::upsert::excluded;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::{
    self, ensure_positive_quantity, ensure_within_stock, AddLine, CartLine, Reconciliation,
    UpdateLine,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::domain::product::Product;
use crate::schema::{cart_lines, products};

use super::models::{CartLineRow, NewCartLineRow, ProductRow};

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn load_product(conn: &mut PgConnection, id: Uuid) -> Result<Product, DomainError> {
    products::table
        .find(id)
        .select(ProductRow::as_select())
        .first(conn)
        .optional()?
        .map(Product::from)
        .ok_or(DomainError::NotFound("product"))
}

impl CartRepository for DieselCartRepository {
    fn add_line(&self, user_id: Uuid, line: AddLine) -> Result<CartLine, DomainError> {
        ensure_positive_quantity(line.quantity)?;
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let product = load_product(conn, line.product_id)?;

            let existing: Option<i32> = cart_lines::table
                .filter(cart_lines::user_id.eq(user_id))
                .filter(cart_lines::product_id.eq(line.product_id))
                .select(cart_lines::quantity)
                .for_update()
                .first(conn)
                .optional()?;
            let merged = existing
                .unwrap_or(0)
                .checked_add(line.quantity)
                .ok_or(DomainError::InsufficientStock {
                    product_id: product.id,
                    available: product.quantity,
                })?;
            ensure_within_stock(&product, merged)?;

            // A concurrent first add can still race the check above; the
            // merged row is validated again and an over-stock result rolls
            // the upsert back.
            let mut row = diesel::insert_into(cart_lines::table)
                .values(&NewCartLineRow {
                    id: Uuid::new_v4(),
                    user_id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    selected: line.selected.unwrap_or(false),
                })
                .on_conflict((cart_lines::user_id, cart_lines::product_id))
                .do_update()
                .set((
                    cart_lines::quantity.eq(cart_lines::quantity + excluded(cart_lines::quantity)),
                    cart_lines::updated_at.eq(now),
                ))
                .returning(CartLineRow::as_returning())
                .get_result(conn)?;

            ensure_within_stock(&product, row.quantity)?;

            if let Some(selected) = line.selected {
                if row.selected != selected {
                    row = diesel::update(cart_lines::table.find(row.id))
                        .set(cart_lines::selected.eq(selected))
                        .returning(CartLineRow::as_returning())
                        .get_result(conn)?;
                }
            }

            Ok(row.into())
        })
    }

    fn update_line(&self, user_id: Uuid, update: UpdateLine) -> Result<CartLine, DomainError> {
        ensure_positive_quantity(update.quantity)?;
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let existing = cart_lines::table
                .find(update.cart_id)
                .filter(cart_lines::user_id.eq(user_id))
                .select(CartLineRow::as_select())
                .for_update()
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound("cart line"))?;

            let product = load_product(conn, existing.product_id)?;
            ensure_within_stock(&product, update.quantity)?;

            let row = diesel::update(cart_lines::table.find(existing.id))
                .set((
                    cart_lines::quantity.eq(update.quantity),
                    cart_lines::selected.eq(update.selected.unwrap_or(existing.selected)),
                    cart_lines::updated_at.eq(now),
                ))
                .returning(CartLineRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
    }

    fn remove_line(&self, user_id: Uuid, cart_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(
            cart_lines::table
                .filter(cart_lines::id.eq(cart_id))
                .filter(cart_lines::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound("cart line"));
        }
        Ok(())
    }

    fn stored_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = cart_lines::table
            .filter(cart_lines::user_id.eq(user_id))
            .select(CartLineRow::as_select())
            .order((cart_lines::created_at.asc(), cart_lines::id.asc()))
            .load(&mut conn)?;
        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    fn reconcile(
        &self,
        user_id: Uuid,
        product_id: Option<Uuid>,
    ) -> Result<Reconciliation, DomainError> {
        let mut conn = self.pool.get()?;

        let result = conn.transaction::<_, DomainError, _>(|conn| {
            let mut query = cart_lines::table
                .inner_join(products::table)
                .filter(cart_lines::user_id.eq(user_id))
                .into_boxed();
            if let Some(product_id) = product_id {
                query = query.filter(cart_lines::product_id.eq(product_id));
            }
            let rows: Vec<(CartLineRow, ProductRow)> = query
                .select((CartLineRow::as_select(), ProductRow::as_select()))
                .order((cart_lines::created_at.asc(), cart_lines::id.asc()))
                .load(conn)?;

            let reconciliation = cart::reconcile(
                rows.into_iter()
                    .map(|(line, product)| (line.into(), product.into()))
                    .collect(),
            );

            if !reconciliation.pruned.is_empty() {
                diesel::delete(
                    cart_lines::table.filter(cart_lines::id.eq_any(&reconciliation.pruned)),
                )
                .execute(conn)?;
            }
            Ok(reconciliation)
        })?;

        if !result.pruned.is_empty() {
            log::info!(
                "Pruned {} out-of-stock cart line(s) for user {}",
                result.pruned.len(),
                user_id
            );
        }
        Ok(result)
    }
}
