pub mod aggregate;

pub use aggregate::{derive_profit, derive_revenue, Sale, SaleDraft};
