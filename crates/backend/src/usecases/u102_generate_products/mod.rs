pub mod executor;

pub use executor::{execute, generate_products};
