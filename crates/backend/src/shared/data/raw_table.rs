/// Untyped table as read from disk: header names plus string cells
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }

    /// Append `target` as a copy of `source`. Existing columns are untouched.
    /// Returns false when `source` is absent or `target` already exists.
    pub fn append_column_copy(&mut self, target: &str, source: &str) -> bool {
        if self.has_column(target) {
            return false;
        }
        let Some(src) = self.column_index(source) else {
            return false;
        };

        self.headers.push(target.to_string());
        for row in &mut self.rows {
            let value = row.get(src).cloned().unwrap_or_default();
            row.push(value);
        }
        true
    }
}
