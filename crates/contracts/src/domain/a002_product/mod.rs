pub mod aggregate;

pub use aggregate::{format_product_id, Product, PRODUCT_ID_WIDTH};
