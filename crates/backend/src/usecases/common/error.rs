use thiserror::Error;

use crate::shared::data::csv_storage::StorageError;

/// Errors that abort a generation run. Nothing is published when one occurs.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid customer id range: min {min} > max {max}")]
    InvalidRange { min: i64, max: i64 },

    #[error("unique email space exhausted for customer {customer_id} after {attempts} attempts")]
    EmailSpaceExhausted { customer_id: i64, attempts: u32 },

    #[error("cannot sample from empty {0} table")]
    EmptyDimension(&'static str),

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("{table} has no row with key '{key}'")]
    MissingReference { table: &'static str, key: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
