pub mod a001_customer;
pub mod a002_product;
pub mod a003_sale;
