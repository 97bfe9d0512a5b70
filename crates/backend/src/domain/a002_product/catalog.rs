use contracts::enums::Category;

/// Catalog item with its list price and unit cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogItem {
    pub name: &'static str,
    pub base_price: f64,
    pub base_cost: f64,
}

const fn item(name: &'static str, base_price: f64, base_cost: f64) -> CatalogItem {
    CatalogItem {
        name,
        base_price,
        base_cost,
    }
}

const ELECTRONICA: &[CatalogItem] = &[
    item("Laptop Lenovo IdeaPad", 800.0, 500.0),
    item("Smartphone Samsung Galaxy", 600.0, 350.0),
    item("Audífonos Bluetooth Sony", 120.0, 60.0),
    item("Monitor LG 24 pulgadas", 220.0, 140.0),
];

const ROPA: &[CatalogItem] = &[
    item("Playera deportiva Nike", 35.0, 15.0),
    item("Tenis Adidas Running", 90.0, 50.0),
    item("Sudadera Puma", 60.0, 30.0),
    item("Jeans Levi's", 70.0, 40.0),
];

const HOGAR: &[CatalogItem] = &[
    item("Silla ergonómica", 150.0, 90.0),
    item("Lámpara LED moderna", 45.0, 20.0),
    item("Mesa de centro", 200.0, 120.0),
    item("Cafetera automática", 180.0, 100.0),
];

/// Pricing catalog, category then item order.
///
/// Product identifiers are assigned in this order, so reordering it renumbers
/// every downstream `producto_id`.
pub const PRICING_CATALOG: &[(Category, &[CatalogItem])] = &[
    (Category::Electronica, ELECTRONICA),
    (Category::Ropa, ROPA),
    (Category::Hogar, HOGAR),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        assert_eq!(PRICING_CATALOG.len(), 3);
        for (_, items) in PRICING_CATALOG {
            assert_eq!(items.len(), 4);
            for it in *items {
                assert!(it.base_price > it.base_cost);
            }
        }
    }

    #[test]
    fn test_catalog_category_order() {
        let order: Vec<Category> = PRICING_CATALOG.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, Category::all());
    }
}
