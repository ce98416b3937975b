//! JSON records writer for flattened tables.
//!
//! Output is an array with one object per row. Every object lists every
//! table column in column order; missing cells are written as `null`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};

use super::model::Table;
use crate::error::ViatabError;

/// Writes a table to a JSON file as an array of records.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_table_json(path: &Path, table: &Table) -> Result<(), ViatabError> {
    let file = File::create(path).map_err(ViatabError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &records(table)).map_err(|source| {
        ViatabError::JsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.write_all(b"\n").map_err(ViatabError::Io)?;
    writer.flush().map_err(ViatabError::Io)
}

/// Writes a table as an array of JSON records to a string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(table: &Table) -> Result<String, ViatabError> {
    serde_json::to_string_pretty(&records(table)).map_err(|source| ViatabError::JsonWrite {
        path: Path::new("<string>").to_path_buf(),
        source,
    })
}

fn records(table: &Table) -> Vec<Map<String, Value>> {
    table
        .iter()
        .map(|row| {
            table
                .columns()
                .iter()
                .map(|column| {
                    let cell = row.get(column).cloned().unwrap_or(Value::Null);
                    (column.clone(), cell)
                })
                .collect()
        })
        .collect()
}
