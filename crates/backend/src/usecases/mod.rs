pub mod common;
pub mod u100_generate_dataset;
pub mod u101_generate_customers;
pub mod u102_generate_products;
pub mod u103_generate_sales;
