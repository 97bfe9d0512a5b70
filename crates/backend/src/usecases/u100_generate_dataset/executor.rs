use crate::projections::p100_sales_enriched;
use crate::shared::config::Config;
use crate::shared::data::csv_storage::TableReport;
use crate::usecases::common::GenerationError;
use crate::usecases::{u101_generate_customers, u102_generate_products, u103_generate_sales};

/// Tables published by one full generation run
#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub customers: TableReport,
    pub products: TableReport,
    pub sales: TableReport,
    pub enriched: TableReport,
}

impl DatasetReport {
    pub fn tables(&self) -> [&TableReport; 4] {
        [&self.customers, &self.products, &self.sales, &self.enriched]
    }
}

/// Generate customers, products and sales, then rebuild the enriched table.
///
/// Each stage publishes its file before the next one starts; a failure
/// leaves earlier tables in place and later ones untouched.
pub fn execute(config: &Config) -> Result<DatasetReport, GenerationError> {
    tracing::info!(
        "U100: generating dataset (seed {}, {} transactions, {})",
        config.generation.seed,
        config.generation.transactions,
        config.generation.strategy
    );

    let (customers, customers_report) = u101_generate_customers::execute(config)?;
    let (products, products_report) = u102_generate_products::execute(config)?;
    let (_, sales_report) = u103_generate_sales::execute(config, &customers, &products)?;
    let enriched_report = p100_sales_enriched::rebuild(config)?;

    let report = DatasetReport {
        customers: customers_report,
        products: products_report,
        sales: sales_report,
        enriched: enriched_report,
    };

    tracing::info!("U100: dataset complete");
    Ok(report)
}
