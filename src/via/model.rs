//! Flattened row and table types.

use std::collections::HashSet;

use serde_json::{Map, Value};

/// A single cell value.
///
/// VIA attributes are mostly scalars, but polygon shapes carry arrays
/// (`all_points_x`, `all_points_y`); those are kept as-is.
pub type Cell = Value;

/// Column holding the image identifier.
pub const PATH_COLUMN: &str = "path";

/// Column holding the 0-based position of the region within its image.
pub const REGION_ID_COLUMN: &str = "region_id";

/// One flattened region.
///
/// Keys keep insertion order. Re-inserting an existing key replaces its
/// value in place, so the key's column position is that of its first
/// appearance.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    image_key: String,
    cells: Map<String, Value>,
}

impl Row {
    /// Creates a row holding only the `path` and `region_id` cells.
    pub fn new(path: impl Into<String>, region_id: usize) -> Self {
        let image_key = path.into();
        let mut cells = Map::new();
        cells.insert(PATH_COLUMN.to_string(), Value::String(image_key.clone()));
        cells.insert(REGION_ID_COLUMN.to_string(), Value::from(region_id));
        Self { image_key, cells }
    }

    /// The key of the image this region came from.
    ///
    /// Unlike [`Row::path`], attributes merged into the row cannot change it.
    pub fn image_key(&self) -> &str {
        &self.image_key
    }

    /// Merges `attributes` into the row; values for existing keys are replaced.
    pub fn merge(&mut self, attributes: &Map<String, Value>) {
        for (key, value) in attributes {
            self.cells.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.cells.get(key)
    }

    /// The `path` cell, if it is (still) a string.
    pub fn path(&self) -> Option<&str> {
        self.cells.get(PATH_COLUMN).and_then(Value::as_str)
    }

    /// The `region_id` cell, if it is (still) a non-negative integer.
    pub fn region_id(&self) -> Option<u64> {
        self.cells.get(REGION_ID_COLUMN).and_then(Value::as_u64)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Rows plus the union of their keys.
///
/// Columns are listed in order of first appearance across rows. A row
/// without a given column has a missing cell there.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Builds a table from rows, computing the column union.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();

        for row in &rows {
            for key in row.keys() {
                if seen.insert(key) {
                    columns.push(key.to_string());
                }
            }
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Returns the cell at (`row`, `column`), or `None` if either is absent.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Yields one entry per row for `column`; `None` marks a missing cell.
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = Option<&'a Cell>> + 'a {
        self.rows.iter().map(move |row| row.get(column))
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
