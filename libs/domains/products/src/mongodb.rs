//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use database::mongodb::is_duplicate_key_error;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{InventoryReport, Product, UpdateProduct};
use crate::query::{ProductFilter, QueryBound};
use crate::repository::ProductRepository;

/// Collection used when none is configured
pub const DEFAULT_COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// Create the `id` lookup index and the unique `name` index.
    ///
    /// The unique index is what makes duplicate names impossible even when
    /// two creates race past the existence check. A collection that already
    /// holds duplicate names cannot get it; that is logged and startup goes
    /// on with only the existence check guarding creates.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().name("idx_id".to_string()).build())
            .build();
        self.collection.create_index(id_index).await?;

        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_name_unique".to_string())
                    .build(),
            )
            .build();

        match self.collection.create_index(name_index).await {
            Ok(_) => {
                tracing::info!("Product indexes created successfully");
                Ok(())
            }
            Err(e) if is_duplicate_key_error(&e) => {
                tracing::warn!(
                    error = %e,
                    "Existing products share a name; unique name index not created"
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }

    /// Build a MongoDB filter document from ProductFilter
    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        // The name is a user pattern; an invalid one fails in the store
        if let Some(ref name) = filter.name {
            doc.insert("name", doc! { "$regex": name, "$options": "i" });
        }

        if let Some(range) = range_document(filter.min_price, filter.max_price) {
            doc.insert("price", range);
        }

        if let Some(range) = range_document(filter.min_quantity, filter.max_quantity) {
            doc.insert("quantity", range);
        }

        doc
    }

    fn duplicate_or(err: mongodb::error::Error, name: &str) -> ProductError {
        if is_duplicate_key_error(&err) {
            ProductError::DuplicateName(name.to_string())
        } else {
            err.into()
        }
    }
}

// MongoDB orders NaN below every number, so an unparsable bound cannot be
// sent as-is; an empty `$in` matches no documents.
fn range_document<T: Copy + Into<Bson>>(
    min: Option<QueryBound<T>>,
    max: Option<QueryBound<T>>,
) -> Option<Document> {
    if min.is_none() && max.is_none() {
        return None;
    }

    if matches!(min, Some(QueryBound::Unparsable)) || matches!(max, Some(QueryBound::Unparsable)) {
        return Some(doc! { "$in": [] });
    }

    let mut range = doc! {};
    if let Some(QueryBound::Value(min)) = min {
        range.insert("$gte", min.into());
    }
    if let Some(QueryBound::Value(max)) = max {
        range.insert("$lte", max.into());
    }
    Some(range)
}

fn numeric_field(totals: &Document, key: &str) -> ProductResult<f64> {
    match totals.get(key) {
        Some(Bson::Int32(n)) => Ok(f64::from(*n)),
        Some(Bson::Int64(n)) => Ok(*n as f64),
        Some(Bson::Double(n)) => Ok(*n),
        None | Some(Bson::Null) => Ok(0.0),
        Some(other) => Err(ProductError::Internal(format!(
            "{key} is not numeric: {other}"
        ))),
    }
}

fn integer_field(totals: &Document, key: &str) -> ProductResult<i64> {
    match totals.get(key) {
        Some(Bson::Int32(n)) => Ok(i64::from(*n)),
        Some(Bson::Int64(n)) => Ok(*n),
        _ => numeric_field(totals, key).map(|n| n as i64),
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let mongo_filter = Self::build_filter(&filter);

        let cursor = self.collection.find(mongo_filter).await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn exists_by_name(&self, name: &str) -> ProductResult<bool> {
        let count = self.collection.count_documents(doc! { "name": name }).await?;
        Ok(count > 0)
    }

    #[instrument(skip(self, product), fields(product_id = product.id, product_name = %product.name))]
    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.collection
            .insert_one(&product)
            .await
            .map_err(|e| Self::duplicate_or(e, &product.name))?;

        tracing::info!("Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(doc! { "id": id }).await?;
        Ok(product)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: i64, changes: UpdateProduct) -> ProductResult<Option<Product>> {
        let update = doc! { "$set": changes.to_set_document() };

        let before = self
            .collection
            .find_one_and_update(doc! { "id": id }, update)
            .return_document(ReturnDocument::Before)
            .await
            .map_err(|e| match changes.name {
                Some(ref name) => Self::duplicate_or(e, name),
                None => e.into(),
            })?;

        if before.is_some() {
            tracing::info!(product_id = id, "Product update applied");
        }
        Ok(before)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> ProductResult<Option<Product>> {
        let removed = self.collection.find_one_and_delete(doc! { "id": id }).await?;

        if removed.is_some() {
            tracing::info!(product_id = id, "Product deleted successfully");
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn inventory_report(&self) -> ProductResult<InventoryReport> {
        let pipeline = vec![doc! {
            "$group": {
                "_id": Bson::Null,
                "totalQuantity": { "$sum": "$quantity" },
                "totalValue": { "$sum": { "$multiply": ["$quantity", "$price"] } },
            }
        }];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        let Some(totals) = cursor.try_next().await? else {
            return Ok(InventoryReport::default());
        };

        Ok(InventoryReport {
            total_quantity: integer_field(&totals, "totalQuantity")?,
            total_value: numeric_field(&totals, "totalValue")?,
        })
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> ProductResult<u64> {
        let result = self.collection.delete_many(doc! {}).await?;
        tracing::info!(removed = result.deleted_count, "Product collection cleared");
        Ok(result.deleted_count)
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn insert_many(&self, products: Vec<Product>) -> ProductResult<u64> {
        if products.is_empty() {
            return Ok(0);
        }

        let result = self.collection.insert_many(&products).await?;

        let inserted = result.inserted_ids.len() as u64;
        tracing::info!(inserted, "Products inserted");
        Ok(inserted)
    }
}
