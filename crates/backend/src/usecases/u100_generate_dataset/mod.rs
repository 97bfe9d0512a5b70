pub mod executor;

pub use executor::{execute, DatasetReport};
