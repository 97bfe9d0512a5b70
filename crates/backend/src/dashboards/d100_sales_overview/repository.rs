//! Loads the enriched transaction table for the dashboard.
//!
//! The table is negotiated against the known schema versions, reconciled to
//! canonical column names and parsed into [`SaleRow`]s. Loads are memoized per
//! (path, modification time); touching the file forces a reload.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use contracts::dashboards::d100_sales_overview::SaleRow;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use thiserror::Error;

use crate::shared::data::csv_storage::{self, StorageError};
use crate::shared::data::raw_table::RawTable;
use crate::shared::data::schema_registry::{
    self, SchemaMismatch, COL_CATEGORY, COL_CUSTOMER_ID, COL_DATE, COL_MARGIN_PCT,
    COL_PRODUCT_NAME, COL_PROFIT, COL_REVENUE, COL_SEGMENT,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatch),

    #[error("invalid value in row {row}, column '{column}': '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Parsed transaction table
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSales {
    pub rows: Vec<SaleRow>,
    /// Rows excluded because `fecha` could not be parsed
    pub unparsable_rows: usize,
    /// Schema version the source matched before reconciliation
    pub schema_version: u32,
}

struct CacheEntry {
    modified: SystemTime,
    data: Arc<LoadedSales>,
}

static LOAD_CACHE: Lazy<Mutex<HashMap<PathBuf, CacheEntry>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Load `path`, reusing the previous result while its mtime is unchanged
pub fn load_cached(path: &Path) -> Result<Arc<LoadedSales>, LoadError> {
    let modified = modified_time(path)?;

    {
        let cache = LOAD_CACHE.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(entry) = cache.get(path) {
            if entry.modified == modified {
                tracing::debug!("D100: cache hit for {}", path.display());
                return Ok(entry.data.clone());
            }
        }
    }

    let data = Arc::new(load(path)?);

    let mut cache = LOAD_CACHE.lock().unwrap_or_else(|p| p.into_inner());
    cache.insert(
        path.to_path_buf(),
        CacheEntry {
            modified,
            data: data.clone(),
        },
    );

    Ok(data)
}

/// Load and parse `path` without the cache
pub fn load(path: &Path) -> Result<LoadedSales, LoadError> {
    let raw = csv_storage::read_raw(path)?;
    let loaded = parse_table(raw)?;

    if loaded.unparsable_rows > 0 {
        tracing::warn!(
            "D100: {} rows in {} have an unparsable '{}' and were excluded",
            loaded.unparsable_rows,
            path.display(),
            COL_DATE
        );
    }
    tracing::info!(
        "D100: loaded {} rows from {} (schema v{})",
        loaded.rows.len(),
        path.display(),
        loaded.schema_version
    );

    Ok(loaded)
}

/// Reconcile column names and parse every row
pub fn parse_table(raw: RawTable) -> Result<LoadedSales, LoadError> {
    let (table, schema) = schema_registry::reconcile(raw)?;

    let col = |name: &'static str| {
        table.column_index(name).ok_or_else(|| SchemaMismatch {
            column: name.to_string(),
            tried: vec![schema.version],
        })
    };
    let date_idx = col(COL_DATE)?;
    let customer_idx = col(COL_CUSTOMER_ID)?;
    let segment_idx = col(COL_SEGMENT)?;
    let product_idx = col(COL_PRODUCT_NAME)?;
    let category_idx = col(COL_CATEGORY)?;
    let revenue_idx = col(COL_REVENUE)?;
    let profit_idx = col(COL_PROFIT)?;
    let margin_idx = col(COL_MARGIN_PCT)?;

    let mut rows = Vec::with_capacity(table.len());
    let mut unparsable_rows = 0;

    for (i, record) in table.rows().iter().enumerate() {
        let row = i + 1;
        let cell = |idx: usize| record.get(idx).map(String::as_str).unwrap_or("");

        let Some(date) = parse_timestamp(cell(date_idx)) else {
            unparsable_rows += 1;
            continue;
        };

        rows.push(SaleRow {
            date,
            customer_id: parse_customer_id(cell(customer_idx), row)?,
            segment: cell(segment_idx).to_string(),
            product_name: cell(product_idx).to_string(),
            category: cell(category_idx).to_string(),
            revenue: parse_number(cell(revenue_idx), row, COL_REVENUE)?,
            profit: parse_number(cell(profit_idx), row, COL_PROFIT)?,
            margin_pct: parse_optional_number(cell(margin_idx), row, COL_MARGIN_PCT)?,
        });
    }

    Ok(LoadedSales {
        rows,
        unparsable_rows,
        schema_version: schema.version,
    })
}

/// ISO-8601 date-time (with or without offset) or a bare date at midnight
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_number(value: &str, row: usize, column: &'static str) -> Result<f64, LoadError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| LoadError::InvalidValue {
            row,
            column,
            value: value.to_string(),
        })
}

fn parse_optional_number(
    value: &str,
    row: usize,
    column: &'static str,
) -> Result<Option<f64>, LoadError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_number(value, row, column).map(Some)
    }
}

fn parse_customer_id(value: &str, row: usize) -> Result<Option<i64>, LoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(id) = trimmed.parse::<i64>() {
        return Ok(Some(id));
    }
    // Float-typed exports write ids as "1000.0"
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
        _ => Err(LoadError::InvalidValue {
            row,
            column: COL_CUSTOMER_ID,
            value: value.to_string(),
        }),
    }
}

fn modified_time(path: &Path) -> Result<SystemTime, LoadError> {
    let metadata = std::fs::metadata(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            StorageError::MissingSource {
                path: path.to_path_buf(),
            }
        } else {
            StorageError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    metadata.modified().map_err(|source| {
        LoadError::Storage(StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "fecha,cliente_id,segmento_cliente,nombre_producto,categoria,ingreso,ganancia,margen_pct";

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-01-02T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-02 00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-02"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-02T00:00:00.000"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-02T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-02 00:00"), Some(midnight));
        assert_eq!(parse_timestamp("ayer"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_unparsable_dates_are_counted_not_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{HEADER}\n\
             2024-01-01T00:00:00,1000,Medio,Silla,Hogar,100,20,0.2\n\
             no-es-fecha,1001,Medio,Silla,Hogar,50,10,0.2\n\
             2024-01-01T02:00:00,1002,Medio,Silla,Hogar,80,16,0.2\n"
        );
        let path = write(dir.path(), "v.csv", &body);

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.rows.len(), 2);
        assert_eq!(loaded.unparsable_rows, 1);
        assert_eq!(loaded.schema_version, 2);
    }

    #[test]
    fn test_empty_keys_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!("{HEADER}\n2024-01-01,,,,,100,20,\n");
        let path = write(dir.path(), "v.csv", &body);

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.rows.len(), 1);
        let row = &loaded.rows[0];
        assert_eq!(row.customer_id, None);
        assert_eq!(row.segment, "");
        assert_eq!(row.product_name, "");
        assert_eq!(row.category, "");
        assert_eq!(row.margin_pct, None);
    }

    #[test]
    fn test_legacy_label_column_is_reconciled() {
        let dir = tempfile::tempdir().unwrap();
        let body = "fecha,cliente_id,segmento_cliente,producto,categoria,ingreso,ganancia,margen_pct\n\
                    2024-01-01,1000,Medio,Sudadera Puma,Ropa,60,30,0.5\n";
        let path = write(dir.path(), "legacy.csv", body);

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.schema_version, 1);
        assert_eq!(loaded.rows[0].product_name, "Sudadera Puma");
    }

    #[test]
    fn test_missing_display_column_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let body = "fecha,cliente_id,segmento_cliente,categoria,ingreso,ganancia,margen_pct\n\
                    2024-01-01,1000,Medio,Ropa,60,30,0.5\n";
        let path = write(dir.path(), "broken.csv", body);

        match load(&path).unwrap_err() {
            LoadError::SchemaMismatch(e) => assert_eq!(e.column, "nombre_producto"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!("{HEADER}\n2024-01-01,1000,Medio,Silla,Hogar,cien,20,0.2\n");
        let path = write(dir.path(), "v.csv", &body);

        match load(&path).unwrap_err() {
            LoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "ingreso");
                assert_eq!(value, "cien");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_float_formatted_customer_id() {
        assert_eq!(parse_customer_id("1000.0", 1).unwrap(), Some(1000));
        assert!(parse_customer_id("1000.5", 1).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ventas_limpias.csv");

        let err = load_cached(&path).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Storage(StorageError::MissingSource { .. })
        ));
        assert!(err.to_string().contains("ventas_limpias.csv"));
    }

    #[test]
    fn test_cache_reuses_until_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!("{HEADER}\n2024-01-01,1000,Medio,Silla,Hogar,100,20,0.2\n");
        let path = write(dir.path(), "v.csv", &body);

        let first = load_cached(&path).unwrap();
        let second = load_cached(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let body = format!("{body}2024-01-02,1001,Medio,Silla,Hogar,50,10,0.2\n");
        std::fs::write(&path, body).unwrap();
        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + std::time::Duration::from_secs(60))
            .unwrap();

        let third = load_cached(&path).unwrap();
        assert_eq!(third.rows.len(), 2);
    }
}
