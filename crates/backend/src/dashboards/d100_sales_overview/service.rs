use contracts::dashboards::d100_sales_overview::{
    CategoryProfitRow, CustomerSegmentRevenueRow, DailyProfitRow, FilteredRowsResponse, Kpis,
    ProductSummaryRow, SaleRow, SalesOverviewRequest, SalesOverviewResponse, SegmentFilter,
    TopCustomerRow,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use std::path::Path;

use super::repository::{self, LoadError, LoadedSales};

pub const TOP_CUSTOMERS_LIMIT: usize = 10;

/// Sales overview for the enriched table at `path`
pub fn get_sales_overview(
    path: &Path,
    request: &SalesOverviewRequest,
) -> Result<SalesOverviewResponse, LoadError> {
    let loaded = repository::load_cached(path)?;
    let filter = request.filter();
    let response = build_overview(&loaded, &filter);

    tracing::info!(
        "D100: overview for {:?}: {} of {} rows, revenue {:.2}",
        filter,
        response.filtered_rows,
        loaded.rows.len(),
        response.kpis.total_revenue
    );

    Ok(response)
}

/// Filtered rows, unaggregated
pub fn get_filtered_rows(
    path: &Path,
    request: &SalesOverviewRequest,
) -> Result<FilteredRowsResponse, LoadError> {
    let loaded = repository::load_cached(path)?;
    let filter = request.filter();

    Ok(FilteredRowsResponse {
        rows: filter_rows(&loaded.rows, &filter).into_iter().cloned().collect(),
        unparsable_rows: loaded.unparsable_rows,
    })
}

/// Segment values available for filtering
pub fn get_segments(path: &Path) -> Result<Vec<String>, LoadError> {
    let loaded = repository::load_cached(path)?;
    Ok(observed_segments(&loaded.rows))
}

pub fn build_overview(loaded: &LoadedSales, filter: &SegmentFilter) -> SalesOverviewResponse {
    let rows = filter_rows(&loaded.rows, filter);

    SalesOverviewResponse {
        kpis: compute_kpis(&rows),
        by_product: revenue_profit_by_product(&rows),
        by_category: profit_by_category(&rows),
        by_customer_segment: revenue_by_customer_segment(&rows),
        daily_profit: daily_profit(&rows),
        top_customers: top_customers(&rows, TOP_CUSTOMERS_LIMIT),
        segments: observed_segments(&loaded.rows),
        filtered_rows: rows.len(),
        unparsable_rows: loaded.unparsable_rows,
    }
}

/// Rows whose segment is selected, in source order
pub fn filter_rows<'a>(rows: &'a [SaleRow], filter: &SegmentFilter) -> Vec<&'a SaleRow> {
    rows.iter().filter(|r| filter.matches(&r.segment)).collect()
}

pub fn compute_kpis(rows: &[&SaleRow]) -> Kpis {
    let total_revenue = rows.iter().map(|r| r.revenue).sum();
    let total_profit = rows.iter().map(|r| r.profit).sum();

    let margins: Vec<f64> = rows.iter().filter_map(|r| r.margin_pct).collect();
    let avg_margin_pct = if margins.is_empty() {
        None
    } else {
        Some(margins.iter().sum::<f64>() / margins.len() as f64)
    };

    Kpis {
        total_revenue,
        total_profit,
        avg_margin_pct,
    }
}

pub fn revenue_profit_by_product(rows: &[&SaleRow]) -> Vec<ProductSummaryRow> {
    group_in_discovery_order(
        rows,
        |r| r.product_name.clone(),
        |acc: &mut (f64, f64), r| {
            acc.0 += r.revenue;
            acc.1 += r.profit;
        },
    )
    .into_iter()
    .map(|(product_name, (revenue, profit))| ProductSummaryRow {
        product_name,
        revenue,
        profit,
    })
    .collect()
}

pub fn profit_by_category(rows: &[&SaleRow]) -> Vec<CategoryProfitRow> {
    group_in_discovery_order(
        rows,
        |r| r.category.clone(),
        |acc: &mut f64, r| *acc += r.profit,
    )
    .into_iter()
    .map(|(category, profit)| CategoryProfitRow { category, profit })
    .collect()
}

pub fn revenue_by_customer_segment(rows: &[&SaleRow]) -> Vec<CustomerSegmentRevenueRow> {
    group_in_discovery_order(
        rows,
        |r| (r.customer_id, r.segment.clone()),
        |acc: &mut f64, r| *acc += r.revenue,
    )
    .into_iter()
    .map(|((customer_id, segment), revenue)| CustomerSegmentRevenueRow {
        customer_id,
        segment,
        revenue,
    })
    .collect()
}

/// Profit per calendar date, ascending
pub fn daily_profit(rows: &[&SaleRow]) -> Vec<DailyProfitRow> {
    let mut by_date = BTreeMap::new();
    for row in rows {
        *by_date.entry(row.date.date()).or_insert(0.0) += row.profit;
    }
    by_date
        .into_iter()
        .map(|(date, profit)| DailyProfitRow { date, profit })
        .collect()
}

/// Customers ranked by revenue, highest first.
///
/// Equal revenue is ordered by ascending id; rows without a customer form
/// their own group and sort after any id with the same revenue.
pub fn top_customers(rows: &[&SaleRow], limit: usize) -> Vec<TopCustomerRow> {
    let mut totals = group_in_discovery_order(
        rows,
        |r| r.customer_id,
        |acc: &mut f64, r| *acc += r.revenue,
    );

    totals.sort_by(|(id_a, rev_a), (id_b, rev_b)| {
        rev_b
            .total_cmp(rev_a)
            .then_with(|| cmp_customer_id(id_a, id_b))
    });
    totals.truncate(limit);

    totals
        .into_iter()
        .enumerate()
        .map(|(i, (customer_id, revenue))| TopCustomerRow {
            rank: i + 1,
            customer_id,
            revenue,
        })
        .collect()
}

/// Distinct segments in first-appearance order
pub fn observed_segments(rows: &[SaleRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut segments = Vec::new();
    for row in rows {
        if seen.insert(row.segment.as_str()) {
            segments.push(row.segment.clone());
        }
    }
    segments
}

fn cmp_customer_id(a: &Option<i64>, b: &Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn group_in_discovery_order<K, V, FK, FA>(
    rows: &[&SaleRow],
    key: FK,
    accumulate: FA,
) -> Vec<(K, V)>
where
    K: Eq + Hash + Clone,
    V: Default,
    FK: Fn(&SaleRow) -> K,
    FA: Fn(&mut V, &SaleRow),
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, V)> = Vec::new();

    for row in rows {
        let k = key(row);
        let slot = match index.get(&k) {
            Some(&slot) => slot,
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, V::default()));
                groups.len() - 1
            }
        };
        accumulate(&mut groups[slot].1, row);
    }

    groups
}
