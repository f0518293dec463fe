//! Startup seeding from a JSON file

use std::path::Path;

use domain_products::{Product, ProductRepository, ProductService, SeedReport};
use eyre::WrapErr;
use tracing::info;

/// Read a JSON array of products
pub async fn load_products(path: &Path) -> eyre::Result<Vec<Product>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("failed to read seed file {}", path.display()))?;

    serde_json::from_str(&raw)
        .wrap_err_with(|| format!("seed file {} is not a JSON array of products", path.display()))
}

/// Replace the catalog with the contents of the seed file
pub async fn seed_catalog<R: ProductRepository>(
    service: &ProductService<R>,
    path: &Path,
) -> eyre::Result<SeedReport> {
    let products = load_products(path).await?;
    let report = service.reseed(products).await?;

    info!(
        file = %path.display(),
        removed = report.removed,
        inserted = report.inserted,
        "Seeded product catalog"
    );
    Ok(report)
}
