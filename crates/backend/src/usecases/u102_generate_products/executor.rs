use contracts::domain::a002_product::{format_product_id, Product};
use contracts::enums::Category;

use crate::domain::a002_product::{CatalogItem, PRICING_CATALOG};
use crate::shared::config::Config;
use crate::shared::data::csv_storage::{self, TableReport};
use crate::usecases::common::GenerationError;

/// One product per (category, item) in catalog order, ids `P001`, `P002`, ...
///
/// No randomness: the same catalog always yields the same table.
pub fn generate_products(catalog: &[(Category, &[CatalogItem])]) -> Vec<Product> {
    catalog
        .iter()
        .flat_map(|(category, items)| items.iter().map(move |item| (*category, item.name)))
        .enumerate()
        .map(|(i, (category, name))| Product {
            product_id: format_product_id(i + 1),
            name: name.to_string(),
            category,
        })
        .collect()
}

/// Publish `productos.csv` from the built-in pricing catalog
pub fn execute(config: &Config) -> Result<(Vec<Product>, TableReport), GenerationError> {
    let products = generate_products(PRICING_CATALOG);

    let report = csv_storage::write_table(&config.data.products_path(), &products)?;
    tracing::info!(
        "U102: {} products written to {} (sha256 {})",
        report.rows,
        report.path.display(),
        report.sha256
    );

    Ok((products, report))
}
