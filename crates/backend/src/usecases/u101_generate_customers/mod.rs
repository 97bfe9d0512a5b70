pub mod executor;

pub use executor::{execute, generate_customers, CustomerRange};
