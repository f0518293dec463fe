use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{InventoryReport, Product, UpdateProduct};
use crate::query::ProductFilter;

/// Repository trait for Product persistence
///
/// Every method is a single store round-trip. `update` and `delete` are
/// atomic find-and-modify operations keyed by the product `id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List products matching a filter, in store order
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>>;

    /// Check if a product with exactly this name exists
    async fn exists_by_name(&self, name: &str) -> ProductResult<bool>;

    /// Insert a new product
    async fn create(&self, product: Product) -> ProductResult<Product>;

    /// Get a product by id
    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// Apply the supplied fields and return the document as it was before
    async fn update(&self, id: i64, changes: UpdateProduct) -> ProductResult<Option<Product>>;

    /// Delete a product and return the removed document
    async fn delete(&self, id: i64) -> ProductResult<Option<Product>>;

    /// Totals over the whole collection
    async fn inventory_report(&self) -> ProductResult<InventoryReport>;

    /// Remove every product, returning how many were removed
    async fn clear(&self) -> ProductResult<u64>;

    /// Bulk insert, returning how many were inserted
    async fn insert_many(&self, products: Vec<Product>) -> ProductResult<u64>;
}
