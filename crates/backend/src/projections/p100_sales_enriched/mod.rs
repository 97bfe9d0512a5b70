pub mod projection_builder;
pub mod service;

pub use service::rebuild;
