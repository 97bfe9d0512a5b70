//! Synthetic transaction log.
//!
//! One seeded generator on the sales stream feeds every draw, so the same seed,
//! dimensions and plan always publish the same bytes. Revenue and profit are
//! derived from the sampled fields, never sampled themselves.

use chrono::{Duration, NaiveDateTime};
use contracts::domain::a001_customer::Customer;
use contracts::domain::a002_product::Product;
use contracts::domain::a003_sale::{Sale, SaleDraft};
use contracts::enums::{Category, Channel, GenerationStrategy, Region};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::domain::a002_product::{CatalogItem, PRICING_CATALOG};
use crate::shared::config::Config;
use crate::shared::data::csv_storage::{self, TableReport};
use crate::shared::random::{stage_rng, GenRng, SALES_STREAM};
use crate::usecases::common::GenerationError;

/// Standard deviation of price/cost noise as a fraction of the base value
const NOISE_RATIO: f64 = 0.1;
/// Sampled price is raised to at least `cost + MIN_UNIT_MARGIN`
const MIN_UNIT_MARGIN: f64 = 1.0;

const PRICE_MIN: f64 = 50.0;
const PRICE_MAX: f64 = 1200.0;
const COST_FRACTION_MIN: f64 = 0.5;
const COST_FRACTION_MAX: f64 = 0.8;
const DISCOUNT_MAX: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesPlan {
    pub transactions: usize,
    /// Timestamp of the first sale; sale `i` is stamped `start + i hours`
    pub start: NaiveDateTime,
    pub strategy: GenerationStrategy,
}

/// Dimension tables and catalog the generator samples from
#[derive(Debug, Clone, Copy)]
pub struct SalesSources<'a> {
    pub customers: &'a [Customer],
    pub products: &'a [Product],
    pub catalog: &'a [(Category, &'a [CatalogItem])],
}

pub fn generate_sales(
    plan: &SalesPlan,
    sources: SalesSources<'_>,
    rng: &mut GenRng,
) -> Result<Vec<Sale>, GenerationError> {
    if plan.transactions == 0 {
        return Ok(Vec::new());
    }
    if sources.customers.is_empty() {
        return Err(GenerationError::EmptyDimension("clientes"));
    }

    let channels = Channel::all();
    let regions = Region::all();
    let mut sales = Vec::with_capacity(plan.transactions);

    for i in 0..plan.transactions {
        let date = plan.start + Duration::hours(i as i64);
        let mut draft = match plan.strategy {
            GenerationStrategy::CatalogSampling => catalog_draw(sources.catalog, date, rng)?,
            GenerationStrategy::DimensionJoin => dimension_draw(sources.products, date, rng)?,
        };

        draft.customer_id = pick(sources.customers, rng, "clientes")?.customer_id;
        draft.channel = *pick(channels.as_slice(), rng, "canales")?;
        draft.region = *pick(regions.as_slice(), rng, "regiones")?;
        draft.discount = rng.gen_range(0.0..DISCOUNT_MAX);

        sales.push(draft.into_sale());
    }

    Ok(sales)
}

/// Inline product drawn from the catalog, price and cost perturbed independently
fn catalog_draw(
    catalog: &[(Category, &[CatalogItem])],
    date: NaiveDateTime,
    rng: &mut GenRng,
) -> Result<SaleDraft, GenerationError> {
    let (category, items) = pick(catalog, rng, "categorías")?;
    let item = pick(*items, rng, "catálogo")?;

    let price = noisy(item.base_price, rng)?;
    let cost = noisy(item.base_cost, rng)?;

    Ok(SaleDraft {
        date,
        customer_id: 0,
        product_id: None,
        product: Some(item.name.to_string()),
        category: Some(*category),
        price: price.max(cost + MIN_UNIT_MARGIN),
        cost,
        channel: Channel::Web,
        region: Region::Cdmx,
        discount: 0.0,
    })
}

/// Product row sampled with replacement, price uniform and cost a fraction of it
fn dimension_draw(
    products: &[Product],
    date: NaiveDateTime,
    rng: &mut GenRng,
) -> Result<SaleDraft, GenerationError> {
    let product = pick(products, rng, "productos")?;
    let price = rng.gen_range(PRICE_MIN..PRICE_MAX);
    let cost = price * rng.gen_range(COST_FRACTION_MIN..COST_FRACTION_MAX);

    Ok(SaleDraft {
        date,
        customer_id: 0,
        product_id: Some(product.product_id.clone()),
        product: None,
        category: None,
        price,
        cost,
        channel: Channel::Web,
        region: Region::Cdmx,
        discount: 0.0,
    })
}

fn noisy(base: f64, rng: &mut GenRng) -> Result<f64, GenerationError> {
    let std_dev = base * NOISE_RATIO;
    let normal = Normal::new(base, std_dev).map_err(|e| {
        GenerationError::InvalidDistribution(format!("N({base}, {std_dev}): {e}"))
    })?;
    Ok(normal.sample(rng))
}

fn pick<'a, T>(
    items: &'a [T],
    rng: &mut GenRng,
    what: &'static str,
) -> Result<&'a T, GenerationError> {
    items.choose(rng).ok_or(GenerationError::EmptyDimension(what))
}

/// Generate the transaction log from configuration and publish `ventas_empresa.csv`
pub fn execute(
    config: &Config,
    customers: &[Customer],
    products: &[Product],
) -> Result<(Vec<Sale>, TableReport), GenerationError> {
    let gen = &config.generation;
    let plan = SalesPlan {
        transactions: gen.transactions,
        start: gen.start,
        strategy: gen.strategy,
    };
    let sources = SalesSources {
        customers,
        products,
        catalog: PRICING_CATALOG,
    };

    let mut rng = stage_rng(gen.seed, SALES_STREAM);
    let sales = generate_sales(&plan, sources, &mut rng)?;

    let report = csv_storage::write_table(&config.data.sales_path(), &sales)?;
    tracing::info!(
        "U103: {} sales ({}) written to {} (sha256 {})",
        report.rows,
        plan.strategy,
        report.path.display(),
        report.sha256
    );

    Ok((sales, report))
}

/// Generate sales from the published dimension tables.
///
/// `productos.csv` is read only under dimension join; catalog sampling
/// needs nothing beyond `clientes.csv`.
pub fn execute_from_tables(config: &Config) -> Result<(Vec<Sale>, TableReport), GenerationError> {
    let customers: Vec<Customer> = csv_storage::read_table(&config.data.customers_path())?;
    let products: Vec<Product> = match config.generation.strategy {
        GenerationStrategy::DimensionJoin => {
            csv_storage::read_table(&config.data.products_path())?
        }
        GenerationStrategy::CatalogSampling => Vec::new(),
    };

    execute(config, &customers, &products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_customer::NameModel;
    use crate::shared::config::default_config;
    use crate::shared::data::csv_storage::StorageError;
    use crate::shared::random::seeded_rng;
    use crate::usecases::u101_generate_customers::{generate_customers, CustomerRange};
    use crate::usecases::u102_generate_products::generate_products;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn customers() -> Vec<Customer> {
        let mut rng = seeded_rng(42);
        generate_customers(
            CustomerRange {
                min_id: 1000,
                max_id: 1999,
                max_email_attempts: 1000,
            },
            &NameModel::es_mx(),
            &mut rng,
        )
        .unwrap()
    }

    fn run(strategy: GenerationStrategy, n: usize, seed: u64) -> Vec<Sale> {
        let customers = customers();
        let products = generate_products(PRICING_CATALOG);
        let plan = SalesPlan {
            transactions: n,
            start: start(),
            strategy,
        };
        let sources = SalesSources {
            customers: &customers,
            products: &products,
            catalog: PRICING_CATALOG,
        };
        generate_sales(&plan, sources, &mut seeded_rng(seed)).unwrap()
    }

    const BOTH: [GenerationStrategy; 2] = [
        GenerationStrategy::CatalogSampling,
        GenerationStrategy::DimensionJoin,
    ];

    #[test]
    fn test_derived_metrics_are_exact() {
        for strategy in BOTH {
            for s in run(strategy, 5000, 42) {
                assert_eq!(s.revenue, s.price * (1.0 - s.discount));
                assert_eq!(s.profit, s.revenue - s.cost);
            }
        }
    }

    #[test]
    fn test_foreign_keys_exist() {
        let customer_ids: HashSet<i64> = customers().iter().map(|c| c.customer_id).collect();
        let product_ids: HashSet<String> = generate_products(PRICING_CATALOG)
            .into_iter()
            .map(|p| p.product_id)
            .collect();

        for strategy in BOTH {
            for s in run(strategy, 5000, 42) {
                assert!(customer_ids.contains(&s.customer_id));
                if let Some(pid) = &s.product_id {
                    assert!(product_ids.contains(pid), "unknown product {pid}");
                }
            }
        }
    }

    #[test]
    fn test_hourly_cadence_and_attribute_ranges() {
        for strategy in BOTH {
            let sales = run(strategy, 500, 42);
            assert_eq!(sales.len(), 500);
            for (i, s) in sales.iter().enumerate() {
                assert_eq!(s.date, start() + Duration::hours(i as i64));
                assert!((0.0..0.25).contains(&s.discount));
            }
        }
    }

    #[test]
    fn test_catalog_sampling_keeps_price_above_cost() {
        let names: HashSet<&str> = PRICING_CATALOG
            .iter()
            .flat_map(|(_, items)| items.iter().map(|i| i.name))
            .collect();

        for s in run(GenerationStrategy::CatalogSampling, 5000, 42) {
            assert!(s.price > s.cost, "price {} <= cost {}", s.price, s.cost);
            assert!(s.product_id.is_none());
            assert!(names.contains(s.product.as_deref().unwrap()));
            assert!(s.category.is_some());
        }
    }

    #[test]
    fn test_catalog_sampling_category_matches_item() {
        for s in run(GenerationStrategy::CatalogSampling, 1000, 7) {
            let category = s.category.unwrap();
            let (_, items) = PRICING_CATALOG.iter().find(|(c, _)| *c == category).unwrap();
            assert!(items.iter().any(|i| Some(i.name) == s.product.as_deref()));
        }
    }

    #[test]
    fn test_dimension_join_price_and_cost_ranges() {
        for s in run(GenerationStrategy::DimensionJoin, 5000, 42) {
            assert!((PRICE_MIN..PRICE_MAX).contains(&s.price));
            let fraction = s.cost / s.price;
            assert!(fraction >= COST_FRACTION_MIN - 1e-12 && fraction < COST_FRACTION_MAX + 1e-12);
            assert!(s.product.is_none() && s.category.is_none());
        }
    }

    #[test]
    fn test_all_channels_and_regions_appear() {
        let sales = run(GenerationStrategy::DimensionJoin, 2000, 3);
        let channels: HashSet<Channel> = sales.iter().map(|s| s.channel).collect();
        let regions: HashSet<Region> = sales.iter().map(|s| s.region).collect();
        assert_eq!(channels.len(), 3);
        assert_eq!(regions.len(), 4);
    }

    #[test]
    fn test_same_seed_same_bytes() {
        for strategy in BOTH {
            let a = csv_storage::to_csv_bytes(&run(strategy, 1000, 42)).unwrap();
            let b = csv_storage::to_csv_bytes(&run(strategy, 1000, 42)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_empty_customers_is_an_error() {
        let plan = SalesPlan {
            transactions: 10,
            start: start(),
            strategy: GenerationStrategy::CatalogSampling,
        };
        let sources = SalesSources {
            customers: &[],
            products: &[],
            catalog: PRICING_CATALOG,
        };
        let err = generate_sales(&plan, sources, &mut seeded_rng(1)).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyDimension("clientes")));
    }

    #[test]
    fn test_dimension_join_requires_products() {
        let customers = customers();
        let plan = SalesPlan {
            transactions: 10,
            start: start(),
            strategy: GenerationStrategy::DimensionJoin,
        };
        let sources = SalesSources {
            customers: &customers,
            products: &[],
            catalog: PRICING_CATALOG,
        };
        let err = generate_sales(&plan, sources, &mut seeded_rng(1)).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyDimension("productos")));
    }

    fn config_in(dir: &std::path::Path, strategy: GenerationStrategy) -> Config {
        let mut config = default_config().unwrap();
        config.data.raw_dir = dir.join("raw").to_string_lossy().into_owned();
        config.data.processed_dir = dir.join("processed").to_string_lossy().into_owned();
        config.generation.strategy = strategy;
        config.generation.transactions = 50;
        config
    }

    #[test]
    fn test_catalog_sampling_runs_without_product_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), GenerationStrategy::CatalogSampling);
        csv_storage::write_table(&config.data.customers_path(), &customers()).unwrap();
        assert!(!config.data.products_path().exists());

        let (sales, report) = execute_from_tables(&config).unwrap();
        assert_eq!(sales.len(), 50);
        assert_eq!(report.rows, 50);
        assert!(sales.iter().all(|s| s.product_id.is_none()));
    }

    #[test]
    fn test_dimension_join_reports_missing_product_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), GenerationStrategy::DimensionJoin);
        csv_storage::write_table(&config.data.customers_path(), &customers()).unwrap();

        let err = execute_from_tables(&config).unwrap_err();
        match err {
            GenerationError::Storage(StorageError::MissingSource { path }) => {
                assert_eq!(path, config.data.products_path())
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!config.data.sales_path().exists());
    }

    #[test]
    fn test_zero_transactions() {
        assert!(run(GenerationStrategy::DimensionJoin, 0, 1).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_identities_hold_for_any_seed(seed in any::<u64>(), catalog in any::<bool>()) {
            let strategy = if catalog {
                GenerationStrategy::CatalogSampling
            } else {
                GenerationStrategy::DimensionJoin
            };
            for s in run(strategy, 200, seed) {
                prop_assert_eq!(s.revenue, s.price * (1.0 - s.discount));
                prop_assert_eq!(s.profit, s.revenue - s.cost);
                if catalog {
                    prop_assert!(s.price > s.cost);
                }
            }
        }
    }
}
