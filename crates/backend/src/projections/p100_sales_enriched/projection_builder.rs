use contracts::domain::a001_customer::Customer;
use contracts::domain::a002_product::Product;
use contracts::domain::a003_sale::Sale;
use contracts::enums::Segment;
use contracts::projections::p100_sales_enriched::EnrichedSaleDto;
use std::collections::HashMap;

use crate::usecases::common::GenerationError;

/// Share of purchasing customers (by revenue rank) in the top segment, percent
const HIGH_VALUE_PERCENT: usize = 20;
/// Cumulative share covered by the top and middle segments, percent
const MEDIUM_VALUE_PERCENT: usize = 50;

/// Segment per purchasing customer from lifetime revenue rank.
///
/// Ranking is by revenue descending, ties by customer id ascending.
pub fn assign_segments(sales: &[Sale]) -> HashMap<i64, Segment> {
    let mut totals: HashMap<i64, f64> = HashMap::new();
    for sale in sales {
        *totals.entry(sale.customer_id).or_insert(0.0) += sale.revenue;
    }

    let mut ranked: Vec<(i64, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let n = ranked.len();
    let high_cut = ceil_percent(n, HIGH_VALUE_PERCENT);
    let medium_cut = ceil_percent(n, MEDIUM_VALUE_PERCENT);

    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, (customer_id, _))| {
            let segment = if rank < high_cut {
                Segment::AltoValor
            } else if rank < medium_cut {
                Segment::Medio
            } else {
                Segment::BajoValor
            };
            (customer_id, segment)
        })
        .collect()
}

fn ceil_percent(n: usize, percent: usize) -> usize {
    (n * percent).div_ceil(100)
}

/// Margin stored on each enriched row: profit over revenue, `None` at zero revenue
pub fn margin_pct(revenue: f64, profit: f64) -> Option<f64> {
    if revenue == 0.0 {
        None
    } else {
        Some(profit / revenue)
    }
}

/// Join raw sales to their dimension rows.
///
/// Every `cliente_id` must exist in `customers` and every `producto_id` in
/// `products`; rows without `producto_id` must carry the inline product.
pub fn build(
    sales: &[Sale],
    customers: &[Customer],
    products: &[Product],
) -> Result<Vec<EnrichedSaleDto>, GenerationError> {
    let customer_index: HashMap<i64, &Customer> =
        customers.iter().map(|c| (c.customer_id, c)).collect();
    let product_index: HashMap<&str, &Product> = products
        .iter()
        .map(|p| (p.product_id.as_str(), p))
        .collect();
    let segments = assign_segments(sales);

    let mut rows = Vec::with_capacity(sales.len());

    for sale in sales {
        let customer = customer_index.get(&sale.customer_id).ok_or_else(|| {
            GenerationError::MissingReference {
                table: "clientes",
                key: sale.customer_id.to_string(),
            }
        })?;

        let (product_name, category) = match (&sale.product_id, &sale.product, sale.category) {
            (Some(product_id), _, _) => {
                let product = product_index.get(product_id.as_str()).ok_or_else(|| {
                    GenerationError::MissingReference {
                        table: "productos",
                        key: product_id.clone(),
                    }
                })?;
                (product.name.clone(), product.category)
            }
            (None, Some(name), Some(category)) => (name.clone(), category),
            (None, _, _) => {
                return Err(GenerationError::MissingReference {
                    table: "productos",
                    key: format!("(sin producto, {})", sale.date),
                })
            }
        };

        // Every customer with a sale has a segment
        let segment = segments
            .get(&sale.customer_id)
            .copied()
            .unwrap_or(Segment::BajoValor);

        rows.push(EnrichedSaleDto {
            date: sale.date,
            customer_id: sale.customer_id,
            customer_name: customer.full_name.clone(),
            segment,
            product_id: sale.product_id.clone(),
            product: sale.product.clone(),
            product_name,
            category,
            price: sale.price,
            cost: sale.cost,
            channel: sale.channel,
            region: sale.region,
            discount: sale.discount,
            revenue: sale.revenue,
            profit: sale.profit,
            margin_pct: margin_pct(sale.revenue, sale.profit),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use contracts::domain::a003_sale::SaleDraft;
    use contracts::enums::{Category, Channel, Region};

    fn sale(i: i64, customer_id: i64, product_id: Option<&str>, price: f64) -> Sale {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::hours(i);
        SaleDraft {
            date,
            customer_id,
            product_id: product_id.map(str::to_string),
            product: None,
            category: None,
            price,
            cost: price * 0.6,
            channel: Channel::Web,
            region: Region::Norte,
            discount: 0.0,
        }
        .into_sale()
    }

    fn customers(ids: &[i64]) -> Vec<Customer> {
        ids.iter()
            .map(|&id| {
                Customer::new(
                    id,
                    "Ana".to_string(),
                    format!("Soto{id}"),
                    format!("ana{id}@gmail.com"),
                )
            })
            .collect()
    }

    fn products() -> Vec<Product> {
        vec![Product {
            product_id: "P001".to_string(),
            name: "Silla ergonómica".to_string(),
            category: Category::Hogar,
        }]
    }

    #[test]
    fn test_segments_by_revenue_rank() {
        // Ten customers, revenue grows with id
        let sales: Vec<Sale> = (0..10)
            .map(|i| sale(i, 100 + i, Some("P001"), 100.0 * (i + 1) as f64))
            .collect();
        let segments = assign_segments(&sales);

        assert_eq!(segments.len(), 10);
        assert_eq!(segments[&109], Segment::AltoValor);
        assert_eq!(segments[&108], Segment::AltoValor);
        assert_eq!(segments[&107], Segment::Medio);
        assert_eq!(segments[&105], Segment::Medio);
        assert_eq!(segments[&104], Segment::BajoValor);
        assert_eq!(segments[&100], Segment::BajoValor);
    }

    #[test]
    fn test_equal_revenue_ranks_lower_id_first() {
        // Five equal customers: cuts at ceil(1.0) = 1 and ceil(2.5) = 3
        let sales: Vec<Sale> = [5, 3, 1, 4, 2]
            .iter()
            .enumerate()
            .map(|(i, &id)| sale(i as i64, id, Some("P001"), 100.0))
            .collect();

        assert_eq!(
            assign_segments(&sales),
            maplit::hashmap! {
                1 => Segment::AltoValor,
                2 => Segment::Medio,
                3 => Segment::Medio,
                4 => Segment::BajoValor,
                5 => Segment::BajoValor,
            }
        );
    }

    #[test]
    fn test_single_customer_is_high_value() {
        let segments = assign_segments(&[sale(0, 7, Some("P001"), 10.0)]);
        assert_eq!(segments[&7], Segment::AltoValor);
    }

    #[test]
    fn test_join_resolves_product_and_customer() {
        let rows = build(&[sale(0, 1, Some("P001"), 200.0)], &customers(&[1]), &products()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_name, "Silla ergonómica");
        assert_eq!(rows[0].category, Category::Hogar);
        assert_eq!(rows[0].customer_name, "Ana Soto1");
        assert_eq!(rows[0].margin_pct, Some(rows[0].profit / rows[0].revenue));
        assert!(rows[0].product.is_none());
    }

    #[test]
    fn test_inline_product_is_copied() {
        let mut s = sale(0, 1, None, 90.0);
        s.product = Some("Tenis Adidas Running".to_string());
        s.category = Some(Category::Ropa);

        let rows = build(&[s], &customers(&[1]), &[]).unwrap();
        assert_eq!(rows[0].product_name, "Tenis Adidas Running");
        assert_eq!(rows[0].product.as_deref(), Some("Tenis Adidas Running"));
        assert_eq!(rows[0].category, Category::Ropa);
    }

    #[test]
    fn test_unknown_customer_is_rejected() {
        let err = build(&[sale(0, 99, Some("P001"), 10.0)], &customers(&[1]), &products()).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MissingReference { table: "clientes", ref key } if key == "99"
        ));
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let err = build(&[sale(0, 1, Some("P999"), 10.0)], &customers(&[1]), &products()).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MissingReference { table: "productos", ref key } if key == "P999"
        ));
    }

    #[test]
    fn test_margin_at_zero_revenue() {
        assert_eq!(margin_pct(0.0, -5.0), None);
        assert_eq!(margin_pct(100.0, 25.0), Some(0.25));
    }
}
