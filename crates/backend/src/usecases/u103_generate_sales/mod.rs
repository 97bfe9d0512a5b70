pub mod executor;

pub use executor::{execute, execute_from_tables, generate_sales, SalesPlan, SalesSources};
