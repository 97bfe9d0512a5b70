pub mod csv_storage;
pub mod raw_table;
pub mod schema_registry;
