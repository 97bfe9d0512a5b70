//! Flat CSV tables handed off between pipeline stages.
//!
//! Writes are published atomically: the whole table is serialized in memory,
//! written next to the target as `*.tmp` and renamed over it, so a failed run
//! never leaves a half-written file under the published name.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::raw_table::RawTable;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("source file not found: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV serialization failed: {0}")]
    Serialize(#[from] csv::Error),
}

/// Summary of a published table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub path: PathBuf,
    pub rows: usize,
    /// SHA-256 of the published bytes, hex encoded
    pub sha256: String,
}

/// Serialize rows (with header) into CSV bytes without touching disk
pub fn to_csv_bytes<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, StorageError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| StorageError::Serialize(csv::Error::from(e.into_error())))
}

pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Serialize `rows` and publish them at `path`
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<TableReport, StorageError> {
    let bytes = to_csv_bytes(rows)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let tmp_path = temp_path_for(path);
    if let Err(source) = std::fs::write(&tmp_path, &bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(StorageError::Io {
            path: tmp_path,
            source,
        });
    }
    if let Err(source) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(StorageError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    let report = TableReport {
        path: path.to_path_buf(),
        rows: rows.len(),
        sha256: fingerprint(&bytes),
    };

    tracing::debug!(
        "Published {} rows to {} (sha256 {})",
        report.rows,
        report.path.display(),
        report.sha256
    );

    Ok(report)
}

/// Read a typed table
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    let text = read_text(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T = record.map_err(|source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Read a table as untyped strings, keeping the header order
pub fn read_raw(path: &Path) -> Result<RawTable, StorageError> {
    let text = read_text(path)?;
    let csv_err = |source| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, rows))
}

fn read_text(path: &Path) -> Result<String, StorageError> {
    if !path.exists() {
        return Err(StorageError::MissingSource {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Strip UTF-8 BOM if present
    Ok(text.trim_start_matches('\u{FEFF}').to_string())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: i64,
        amount: f64,
        label: Option<String>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                amount: 0.1 + 0.2,
                label: Some("Café".to_string()),
            },
            Row {
                id: 2,
                amount: 1234.5678901234,
                label: None,
            },
        ]
    }

    #[test]
    fn test_write_then_read_keeps_exact_floats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("t.csv");

        let report = write_table(&path, &rows()).unwrap();
        assert_eq!(report.rows, 2);
        assert_eq!(report.sha256.len(), 64);
        assert!(!dir.path().join("nested").join("t.csv.tmp").exists());

        let back: Vec<Row> = read_table(&path).unwrap();
        assert_eq!(back, rows());
    }

    #[test]
    fn test_fingerprint_matches_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let report = write_table(&path, &rows()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, to_csv_bytes(&rows()).unwrap());
        assert_eq!(report.sha256, fingerprint(&bytes));
    }

    #[test]
    fn test_missing_source_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        let err = read_raw(&path).unwrap_err();
        match &err {
            StorageError::MissingSource { path: p } => assert_eq!(p, &path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn test_read_raw_strips_bom_and_keeps_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        std::fs::write(&path, "\u{FEFF}a,b\n1,\n,x\n").unwrap();

        let table = read_raw(&path).unwrap();
        assert_eq!(table.headers(), &["a".to_string(), "b".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 1), Some(""));
        assert_eq!(table.cell(1, 0), Some(""));
    }
}
