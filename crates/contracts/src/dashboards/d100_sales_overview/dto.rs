use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Active customer-segment selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SegmentFilter {
    /// Every observed segment (the default selection)
    #[default]
    All,
    /// Only the listed segments; an empty set selects nothing
    Only(BTreeSet<String>),
}

impl SegmentFilter {
    pub fn only<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SegmentFilter::Only(segments.into_iter().map(Into::into).collect())
    }

    /// Parse the `segmentos` query value.
    ///
    /// Absent selects every segment. A single item is taken as is, so `""`
    /// selects nothing. In a list of two or more items empty entries name the
    /// empty segment: `",Medio"` selects `{"", "Medio"}` and `","` selects
    /// only the empty segment.
    pub fn from_query(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return SegmentFilter::All;
        };

        let items: Vec<&str> = raw.split(',').map(str::trim).collect();
        if items.len() == 1 {
            return SegmentFilter::Only(
                items.into_iter().filter(|s| !s.is_empty()).map(str::to_string).collect(),
            );
        }
        SegmentFilter::Only(items.into_iter().map(str::to_string).collect())
    }

    /// Encode a segment list so that [`SegmentFilter::from_query`] reads it back
    pub fn to_query<S: AsRef<str>>(segments: &[S]) -> String {
        let parts: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
        match parts.as_slice() {
            [""] => ",".to_string(),
            _ => parts.join(","),
        }
    }

    pub fn matches(&self, segment: &str) -> bool {
        match self {
            SegmentFilter::All => true,
            SegmentFilter::Only(set) => set.contains(segment),
        }
    }
}

/// GET /api/d100/sales_overview?segmentos=Alto%20valor,Medio
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesOverviewRequest {
    pub segmentos: Option<String>,
}

impl SalesOverviewRequest {
    pub fn filter(&self) -> SegmentFilter {
        SegmentFilter::from_query(self.segmentos.as_deref())
    }
}

/// One transaction as seen by the dashboard after load and reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRow {
    pub date: NaiveDateTime,
    /// `None` when the source cell was empty
    pub customer_id: Option<i64>,
    pub segment: String,
    pub product_name: String,
    pub category: String,
    pub revenue: f64,
    pub profit: f64,
    pub margin_pct: Option<f64>,
}

/// Scalar KPIs over the filtered row set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Ingresos totales
    pub total_revenue: f64,
    /// Ganancia total
    pub total_profit: f64,
    /// Margen promedio: unweighted mean of stored `margen_pct`, `None` without data
    pub avg_margin_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummaryRow {
    pub product_name: String,
    pub revenue: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfitRow {
    pub category: String,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSegmentRevenueRow {
    pub customer_id: Option<i64>,
    pub segment: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProfitRow {
    pub date: NaiveDate,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCustomerRow {
    /// Dense 1-based rank
    pub rank: usize,
    pub customer_id: Option<i64>,
    pub revenue: f64,
}

/// Response for the sales overview dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOverviewResponse {
    pub kpis: Kpis,
    /// Revenue and profit per product, first-appearance order
    pub by_product: Vec<ProductSummaryRow>,
    /// Profit per category, first-appearance order
    pub by_category: Vec<CategoryProfitRow>,
    /// Revenue per (customer, segment), first-appearance order
    pub by_customer_segment: Vec<CustomerSegmentRevenueRow>,
    /// Profit per calendar date, ascending
    pub daily_profit: Vec<DailyProfitRow>,
    /// Top 10 customers by revenue
    pub top_customers: Vec<TopCustomerRow>,
    /// Every segment observed in the loaded table (filter options)
    pub segments: Vec<String>,
    pub filtered_rows: usize,
    /// Rows excluded at load because `fecha` could not be parsed
    pub unparsable_rows: usize,
}

/// Response for GET /api/d100/rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredRowsResponse {
    pub rows: Vec<SaleRow>,
    pub unparsable_rows: usize,
}
