//! Application state management.
//!
//! This module defines the state shared by the app-level routes and startup.

use database::mongodb::Client;
use domain_products::{MongoProductRepository, ProductService};

/// Shared application state.
///
/// Cloning is cheap: the Mongo client shares one connection pool and the
/// service holds its repository behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// Product catalog service over the configured collection
    pub products: ProductService<MongoProductRepository>,
}

impl AppState {
    pub fn new(config: crate::config::Config, mongo_client: Client) -> Self {
        let db = mongo_client.database(config.mongodb.database());
        let repository = MongoProductRepository::with_collection(&db, &config.catalog.collection);

        Self {
            config,
            mongo_client,
            products: ProductService::new(repository),
        }
    }
}
