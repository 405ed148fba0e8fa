use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::domain::product::{NewProduct, Product, ProductPage, ProductQuery};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

pub struct CatalogService<R> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_products(&self, mut query: ProductQuery) -> Result<ProductPage, DomainError> {
        query.page = query.page.max(1);
        query.limit = query.limit.clamp(1, MAX_PAGE_SIZE);
        self.repo.search(&query)
    }

    pub fn get_product(&self, id: Uuid) -> Result<Product, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound("product"))
    }

    pub fn stock(&self, id: Uuid) -> Result<i32, DomainError> {
        Ok(self.get_product(id)?.quantity)
    }

    pub fn categories(&self) -> Result<Vec<String>, DomainError> {
        self.repo.categories()
    }

    pub fn create_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        let created = self.repo.create(product)?;
        log::info!("Created product {} ({})", created.id, created.name);
        Ok(created)
    }

    pub fn restock(&self, id: Uuid, quantity: i32) -> Result<Product, DomainError> {
        self.repo.restock(id, quantity)
    }
}
