//! CSV writer for flattened tables.
//!
//! The header is the table's column list. Each row writes one field per
//! column:
//! - missing cells and `null` are written as empty fields
//! - strings are written as raw text
//! - numbers and booleans use their JSON spelling
//! - arrays and objects (e.g. polygon point lists) are written as compact JSON
//!
//! Quoting is left to the `csv` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use super::model::Table;
use crate::error::ViatabError;

/// Writes a table to a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_table_csv(path: &Path, table: &Table) -> Result<(), ViatabError> {
    let file = File::create(path).map_err(ViatabError::Io)?;
    let writer = BufWriter::new(file);

    write_csv(writer, table, path)?.flush().map_err(ViatabError::Io)
}

/// Writes a table as CSV to a string.
///
/// Useful for testing without file I/O.
pub fn to_csv_string(table: &Table) -> Result<String, ViatabError> {
    let path = Path::new("<string>");
    let bytes = write_csv(Vec::new(), table, path)?;

    // Every field is built from `String`s, so the output is always UTF-8.
    String::from_utf8(bytes).map_err(|e| {
        ViatabError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Writes a table as CSV to any writer and hands the writer back.
///
/// `path` is only used to label errors.
pub fn write_csv<W: Write>(writer: W, table: &Table, path: &Path) -> Result<W, ViatabError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if !table.columns().is_empty() {
        csv_writer
            .write_record(table.columns())
            .map_err(|source| csv_error(path, source))?;
    }

    for row in table {
        let record = table
            .columns()
            .iter()
            .map(|column| row.get(column).map(cell_to_field).unwrap_or_default());
        csv_writer
            .write_record(record)
            .map_err(|source| csv_error(path, source))?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| ViatabError::Io(e.into_error()))
}

/// Renders a single cell as a CSV field.
pub fn cell_to_field(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_error(path: &Path, source: csv::Error) -> ViatabError {
    ViatabError::CsvWrite {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::via::from_via_str;
    use serde_json::json;

    #[test]
    fn cell_rendering() {
        assert_eq!(cell_to_field(&Value::Null), "");
        assert_eq!(cell_to_field(&json!("cat")), "cat");
        assert_eq!(cell_to_field(&json!(12)), "12");
        assert_eq!(cell_to_field(&json!(1.5)), "1.5");
        assert_eq!(cell_to_field(&json!(true)), "true");
        assert_eq!(cell_to_field(&json!([1, 2, 3])), "[1,2,3]");
    }

    #[test]
    fn writes_header_and_blank_missing_cells() {
        let table = from_via_str(
            r#"{"_via_img_metadata": {
                "a.jpg": {"regions": [
                    {"shape_attributes": {"name": "rect", "x": 1}, "region_attributes": {"label": "cat"}}
                ]},
                "b.jpg": {"regions": [
                    {"shape_attributes": {"name": "point", "cx": 4}, "region_attributes": {}}
                ]}
            }}"#,
        )
        .expect("parse");

        let csv = to_csv_string(&table).expect("write csv");
        assert_eq!(
            csv,
            "path,region_id,name,x,label,cx\n\
             a.jpg,0,rect,1,cat,\n\
             b.jpg,0,point,,,4\n"
        );
    }

    #[test]
    fn quotes_fields_containing_separators() {
        let table = from_via_str(
            r#"{"_via_img_metadata": {"a.jpg": {"regions": [
                {"shape_attributes": {"name": "polygon", "all_points_x": [1, 2]},
                 "region_attributes": {"note": "big, red"}}
            ]}}}"#,
        )
        .expect("parse");

        let csv = to_csv_string(&table).expect("write csv");
        assert!(csv.contains("\"[1,2]\""), "{csv}");
        assert!(csv.contains("\"big, red\""), "{csv}");
    }

    #[test]
    fn empty_table_writes_nothing() {
        let table = from_via_str(r#"{"_via_img_metadata": {}}"#).expect("parse");
        assert_eq!(to_csv_string(&table).expect("write csv"), "");
    }
}
