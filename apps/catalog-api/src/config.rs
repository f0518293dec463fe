use std::path::PathBuf;

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, env_parse_or, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Seed file used when `PRODUCTS_SEED_FILE` is unset
pub const DEFAULT_SEED_FILE: &str = "data/products.json";

/// Catalog-specific settings
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Collection holding the product documents
    pub collection: String,
    /// JSON array of products loaded at startup
    pub seed_file: PathBuf,
    /// Replace the catalog with the seed file contents on every start
    pub seed_on_startup: bool,
}

impl FromEnv for CatalogConfig {
    /// - `PRODUCTS_COLLECTION` (default: `products`)
    /// - `PRODUCTS_SEED_FILE` (default: `data/products.json`)
    /// - `PRODUCTS_SEED_ON_STARTUP` (default: `true`)
    fn from_env() -> Result<Self, ConfigError> {
        let collection = env_or_default(
            "PRODUCTS_COLLECTION",
            domain_products::mongodb::DEFAULT_COLLECTION,
        );

        if collection.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "PRODUCTS_COLLECTION".to_string(),
                details: "collection name cannot be empty".to_string(),
            });
        }

        Ok(Self {
            collection,
            seed_file: PathBuf::from(env_or_default("PRODUCTS_SEED_FILE", DEFAULT_SEED_FILE)),
            seed_on_startup: env_parse_or("PRODUCTS_SEED_ON_STARTUP", true)?,
        })
    }
}

/// Application configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let app = app_info!();
        let mongodb = MongoConfig::from_env()?.with_app_name(app.name);
        let server = ServerConfig::from_env()?;
        let catalog = CatalogConfig::from_env()?;

        Ok(Self {
            app,
            mongodb,
            server,
            catalog,
            environment,
        })
    }
}
