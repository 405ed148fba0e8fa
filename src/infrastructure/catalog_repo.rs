use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::domain::product::{NewProduct, Product, ProductPage, ProductQuery};
use crate::schema::products;

use super::ledger;
use super::models::{NewProductRow, ProductRow};

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn filtered(query: &ProductQuery) -> products::BoxedQuery<'static, Pg> {
    let mut q = products::table.into_boxed();
    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = escape_like(term);
        q = q.filter(
            products::name
                .ilike(pattern.clone())
                .or(products::author.ilike(pattern.clone()))
                .or(products::publisher.ilike(pattern.clone()))
                .or(products::category.ilike(pattern)),
        );
    }
    if let Some(category) = query.category.clone() {
        q = q.filter(products::category.eq(category));
    }
    q
}

impl CatalogRepository for DieselCatalogRepository {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        product.validate()?;
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(products::table)
            .values(&NewProductRow {
                id: Uuid::new_v4(),
                name: product.name,
                author: product.author,
                publisher: product.publisher,
                category: product.category,
                description: product.description,
                price: product.price,
                quantity: product.quantity,
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn search(&self, query: &ProductQuery) -> Result<ProductPage, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (query.page - 1) * query.limit;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filtered(query).count().get_result(conn)?;

            let rows = filtered(query)
                .select(ProductRow::as_select())
                .order((products::created_at.desc(), products::id.asc()))
                .limit(query.limit)
                .offset(offset)
                .load(conn)?;

            Ok(ProductPage {
                items: rows.into_iter().map(Product::from).collect(),
                total,
                page: query.page,
                limit: query.limit,
            })
        })
    }

    fn categories(&self) -> Result<Vec<String>, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(products::table
            .select(products::category)
            .distinct()
            .order(products::category.asc())
            .load(&mut conn)?)
    }

    fn restock(&self, id: Uuid, quantity: i32) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;
        let row = ledger::restock(&mut conn, id, quantity)?;
        log::info!("Restocked product {} by {} (now {})", id, quantity, row.quantity);
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::test_support::{book, setup_db};

    #[test]
    fn escape_like_wraps_and_escapes_wildcards() {
        assert_eq!(escape_like("python"), "%python%");
        assert_eq!(escape_like("100%_off"), "%100\\%\\_off%");
    }

    #[tokio::test]
    async fn create_and_find_by_id_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        let created = repo.create(book("Clean Code", 450_000, 30)).expect("create failed");
        let found = repo
            .find_by_id(created.id)
            .expect("find failed")
            .expect("product should exist");

        assert_eq!(found, created);
        assert_eq!(found.quantity, 30);
        assert_eq!(found.sold, 0);
    }

    #[tokio::test]
    async fn search_matches_author_case_insensitively() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        repo.create(book("Clean Code", 450_000, 30)).expect("create failed");
        repo.create(book("Think and Grow Rich", 150_000, 10)).expect("create failed");

        let page = repo
            .search(&ProductQuery {
                search: Some("clean".to_string()),
                category: None,
                page: 1,
                limit: 20,
            })
            .expect("search failed");

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Clean Code");
    }

    #[tokio::test]
    async fn search_paginates_and_filters_by_category() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        for i in 0..5 {
            repo.create(book(&format!("Volume {i}"), 1_000, 1)).expect("create failed");
        }
        let mut other = book("Atlas", 1_000, 1);
        other.category = "Geography".to_string();
        repo.create(other).expect("create failed");

        let query = ProductQuery {
            search: None,
            category: Some("Technology".to_string()),
            page: 2,
            limit: 3,
        };
        let page = repo.search(&query).expect("search failed");
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);

        let categories = repo.categories().expect("categories failed");
        assert_eq!(categories, vec!["Geography".to_string(), "Technology".to_string()]);
    }

    #[tokio::test]
    async fn restock_raises_quantity_only() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        let created = repo.create(book("Clean Code", 450_000, 2)).expect("create failed");
        let restocked = repo.restock(created.id, 5).expect("restock failed");

        assert_eq!(restocked.quantity, 7);
        assert_eq!(restocked.sold, 0);
        assert!(matches!(
            repo.restock(Uuid::new_v4(), 1),
            Err(DomainError::NotFound("product"))
        ));
        assert!(matches!(
            repo.restock(created.id, 0),
            Err(DomainError::InvalidInput(_))
        ));
    }
}
