pub mod catalog;

pub use catalog::{CatalogItem, PRICING_CATALOG};
