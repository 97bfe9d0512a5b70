use contracts::domain::a001_customer::Customer;
use contracts::domain::a002_product::Product;
use contracts::domain::a003_sale::Sale;

use super::projection_builder;
use crate::shared::config::Config;
use crate::shared::data::csv_storage::{self, TableReport};
use crate::usecases::common::GenerationError;

/// Rebuild `ventas_limpias.csv` from the raw tables handed off by generation
pub fn rebuild(config: &Config) -> Result<TableReport, GenerationError> {
    let customers: Vec<Customer> = csv_storage::read_table(&config.data.customers_path())?;
    let products: Vec<Product> = csv_storage::read_table(&config.data.products_path())?;
    let sales: Vec<Sale> = csv_storage::read_table(&config.data.sales_path())?;

    tracing::info!(
        "P100: enriching {} sales with {} customers and {} products",
        sales.len(),
        customers.len(),
        products.len()
    );

    let rows = projection_builder::build(&sales, &customers, &products)?;

    let negative = rows.iter().filter(|r| r.profit < 0.0).count();
    if negative > 0 {
        tracing::warn!("P100: {} sales carry negative profit", negative);
    }

    let report = csv_storage::write_table(&config.data.enriched_sales_path(), &rows)?;
    tracing::info!(
        "P100: {} rows written to {} (sha256 {})",
        report.rows,
        report.path.display(),
        report.sha256
    );

    Ok(report)
}
