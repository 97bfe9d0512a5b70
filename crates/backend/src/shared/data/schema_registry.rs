//! Versioned column mapping for the enriched transaction table.
//!
//! Generator releases renamed some columns. At load time the newest schema is
//! tried first, then older ones in a fixed priority order. A matching older
//! schema is reconciled by appending each canonical column as a copy of its
//! legacy source; nothing is removed. If no version matches, loading fails.

use thiserror::Error;

use super::raw_table::RawTable;

/// Canonical column and the physical column it is read from in one version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub canonical: &'static str,
    pub source: &'static str,
}

impl ColumnMapping {
    const fn same(name: &'static str) -> Self {
        Self {
            canonical: name,
            source: name,
        }
    }

    const fn alias(canonical: &'static str, source: &'static str) -> Self {
        Self { canonical, source }
    }

    pub fn is_alias(&self) -> bool {
        self.canonical != self.source
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaVersion {
    pub version: u32,
    pub name: &'static str,
    pub columns: &'static [ColumnMapping],
}

pub const COL_DATE: &str = "fecha";
pub const COL_CUSTOMER_ID: &str = "cliente_id";
pub const COL_SEGMENT: &str = "segmento_cliente";
pub const COL_PRODUCT_NAME: &str = "nombre_producto";
pub const COL_CATEGORY: &str = "categoria";
pub const COL_REVENUE: &str = "ingreso";
pub const COL_PROFIT: &str = "ganancia";
pub const COL_MARGIN_PCT: &str = "margen_pct";

/// Legacy inline product label written by the catalog-sampling generator
pub const COL_LEGACY_PRODUCT: &str = "producto";

const V2_COLUMNS: &[ColumnMapping] = &[
    ColumnMapping::same(COL_DATE),
    ColumnMapping::same(COL_CUSTOMER_ID),
    ColumnMapping::same(COL_SEGMENT),
    ColumnMapping::same(COL_PRODUCT_NAME),
    ColumnMapping::same(COL_CATEGORY),
    ColumnMapping::same(COL_REVENUE),
    ColumnMapping::same(COL_PROFIT),
    ColumnMapping::same(COL_MARGIN_PCT),
];

const V1_COLUMNS: &[ColumnMapping] = &[
    ColumnMapping::same(COL_DATE),
    ColumnMapping::same(COL_CUSTOMER_ID),
    ColumnMapping::same(COL_SEGMENT),
    ColumnMapping::alias(COL_PRODUCT_NAME, COL_LEGACY_PRODUCT),
    ColumnMapping::same(COL_CATEGORY),
    ColumnMapping::same(COL_REVENUE),
    ColumnMapping::same(COL_PROFIT),
    ColumnMapping::same(COL_MARGIN_PCT),
];

/// Known schemas, newest first. Probe order is this order.
pub const SCHEMA_VERSIONS: &[SchemaVersion] = &[
    SchemaVersion {
        version: 2,
        name: "enriched",
        columns: V2_COLUMNS,
    },
    SchemaVersion {
        version: 1,
        name: "legacy-product-label",
        columns: V1_COLUMNS,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema mismatch: required column '{column}' not found (tried schema versions {tried:?})")]
pub struct SchemaMismatch {
    pub column: String,
    pub tried: Vec<u32>,
}

impl SchemaVersion {
    fn missing_sources(&self, table: &RawTable) -> Vec<&'static ColumnMapping> {
        self.columns
            .iter()
            .filter(|c| !table.has_column(c.source))
            .collect()
    }
}

/// Pick the newest schema version whose source columns are all present
pub fn negotiate(table: &RawTable) -> Result<&'static SchemaVersion, SchemaMismatch> {
    // (missing count, first missing canonical column) of the closest candidate
    let mut closest: Option<(usize, &'static str)> = None;

    for schema in SCHEMA_VERSIONS {
        let missing = schema.missing_sources(table);
        if missing.is_empty() {
            return Ok(schema);
        }
        let candidate = (missing.len(), missing[0].canonical);
        // Strictly fewer missing wins, so newer versions keep ties
        if closest.map_or(true, |(count, _)| candidate.0 < count) {
            closest = Some(candidate);
        }
    }

    let column = closest.map(|(_, c)| c).unwrap_or(COL_DATE).to_string();
    Err(SchemaMismatch {
        column,
        tried: SCHEMA_VERSIONS.iter().map(|s| s.version).collect(),
    })
}

/// Negotiate and bring `table` to the canonical column names.
///
/// Idempotent: a reconciled table matches the newest version and is returned
/// unchanged on a second pass.
pub fn reconcile(mut table: RawTable) -> Result<(RawTable, &'static SchemaVersion), SchemaMismatch> {
    let schema = negotiate(&table)?;

    for mapping in schema.columns.iter().filter(|c| c.is_alias()) {
        if table.append_column_copy(mapping.canonical, mapping.source) {
            tracing::info!(
                "Schema v{} ({}): synthesized column '{}' from '{}'",
                schema.version,
                schema.name,
                mapping.canonical,
                mapping.source
            );
        }
    }

    Ok((table, schema))
}
