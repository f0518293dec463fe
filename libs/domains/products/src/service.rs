//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, InventoryReport, Product, SeedReport, UpdateOutcome, UpdateProduct,
};
use crate::query::ProductFilter;
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Each operation issues at most one mutating store call; request handling
/// never retries.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Underlying store, for startup tasks such as index creation
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// List products with optional filters
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        self.repository.list(filter).await
    }

    /// Create a new product, refusing names that are already taken
    #[instrument(skip(self, input), fields(product_id = input.id, product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        if self.repository.exists_by_name(&input.name).await? {
            return Err(ProductError::DuplicateName(input.name));
        }

        self.repository.create(input.into()).await
    }

    /// Apply a partial update and report whether anything changed
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: i64, input: UpdateProduct) -> ProductResult<UpdateOutcome> {
        if input.is_empty() {
            return match self.repository.get_by_id(id).await? {
                Some(_) => Ok(UpdateOutcome::Unchanged),
                None => Err(ProductError::NotFound(id)),
            };
        }

        let before = self
            .repository
            .update(id, input.clone())
            .await?
            .ok_or(ProductError::NotFound(id))?;

        if before.merged(&input) == before {
            tracing::info!(product_id = id, "No changes made to product");
            Ok(UpdateOutcome::Unchanged)
        } else {
            tracing::info!(product_id = id, "Product modified");
            Ok(UpdateOutcome::Modified)
        }
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> ProductResult<Product> {
        self.repository
            .delete(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Stock totals over the whole catalog
    #[instrument(skip(self))]
    pub async fn inventory_report(&self) -> ProductResult<InventoryReport> {
        self.repository.inventory_report().await
    }

    /// Replace the whole catalog with `products`
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn reseed(&self, products: Vec<Product>) -> ProductResult<SeedReport> {
        let removed = self.repository.clear().await?;
        let inserted = self.repository.insert_many(products).await?;

        tracing::info!(removed, inserted, "Product catalog reseeded");
        Ok(SeedReport { removed, inserted })
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
