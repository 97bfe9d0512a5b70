pub mod name_model;

pub use name_model::NameModel;
