use serde::{Deserialize, Serialize};

use crate::enums::Category;

/// Width of the numeric part of `producto_id` (`P001`)
pub const PRODUCT_ID_WIDTH: usize = 3;

/// Product dimension row (`productos.csv`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "producto_id")]
    pub product_id: String,

    #[serde(rename = "nombre_producto")]
    pub name: String,

    #[serde(rename = "categoria")]
    pub category: Category,
}

/// Format a 1-based catalog sequence number as a product identifier.
///
/// Identifiers are opaque: the number only reflects catalog order.
pub fn format_product_id(sequence: usize) -> String {
    format!("P{:0width$}", sequence, width = PRODUCT_ID_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_product_id() {
        assert_eq!(format_product_id(1), "P001");
        assert_eq!(format_product_id(12), "P012");
        assert_eq!(format_product_id(1234), "P1234");
    }
}
