pub mod p100_sales_enriched;
