pub mod error;

pub use error::GenerationError;
