//! Table inspection and statistics.
//!
//! This module summarizes a flattened table: how many regions and images it
//! covers, how densely each column is filled, and how regions split across
//! shape types.

mod report;

pub use report::{ColumnFill, InspectReport, ShapeCount, SummarySection};

use std::collections::HashMap;

use serde_json::Value;

use crate::via::Table;

/// Options for table inspection.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Column holding the shape type. VIA writes it as `name`.
    pub shape_column: String,
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            shape_column: "name".to_string(),
            bar_width: 20,
        }
    }
}

/// Inspect a flattened table and produce a report.
pub fn inspect_table(table: &Table, opts: &InspectOptions) -> InspectReport {
    InspectReport {
        summary: compute_summary(table),
        columns: compute_column_fill(table),
        shapes: compute_shapes(table, &opts.shape_column),
        bar_width: opts.bar_width,
    }
}

fn compute_summary(table: &Table) -> SummarySection {
    let mut regions_per_image: HashMap<&str, usize> = HashMap::new();
    for row in table {
        *regions_per_image.entry(row.image_key()).or_insert(0) += 1;
    }

    SummarySection {
        rows: table.len(),
        images: regions_per_image.len(),
        max_regions_per_image: regions_per_image.values().copied().max().unwrap_or(0),
        columns: table.columns().len(),
    }
}

/// Counts present, non-null cells per column, in column order.
fn compute_column_fill(table: &Table) -> Vec<ColumnFill> {
    table
        .columns()
        .iter()
        .map(|name| ColumnFill {
            name: name.clone(),
            filled: table
                .column(name)
                .filter(|cell| !matches!(cell, None | Some(Value::Null)))
                .count(),
        })
        .collect()
}

fn compute_shapes(table: &Table, shape_column: &str) -> Vec<ShapeCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for cell in table.column(shape_column) {
        let shape = match cell {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => "(none)".to_string(),
            Some(other) => other.to_string(),
        };
        *counts.entry(shape).or_insert(0) += 1;
    }

    // Count descending, then name ascending for deterministic output
    let mut sorted: Vec<ShapeCount> = counts
        .into_iter()
        .map(|(shape, count)| ShapeCount { shape, count })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.shape.cmp(&b.shape)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::via::from_via_str;

    fn sample_table() -> Table {
        from_via_str(
            r#"{"_via_img_metadata": {
                "a.jpg": {"regions": [
                    {"shape_attributes": {"name": "rect", "x": 1}, "region_attributes": {"label": "cat"}},
                    {"shape_attributes": {"name": "rect", "x": 2}, "region_attributes": {"label": null}},
                    {"shape_attributes": {"name": "polygon"}, "region_attributes": {}}
                ]},
                "b.jpg": {"regions": []},
                "c.jpg": {"regions": [
                    {"shape_attributes": {"cx": 3}, "region_attributes": {"label": "dog"}}
                ]}
            }}"#,
        )
        .expect("parse sample")
    }

    #[test]
    fn summary_counts() {
        let report = inspect_table(&sample_table(), &InspectOptions::default());

        assert_eq!(report.summary.rows, 4);
        assert_eq!(report.summary.images, 2);
        assert_eq!(report.summary.max_regions_per_image, 3);
        assert_eq!(report.summary.columns, 6);
    }

    #[test]
    fn column_fill_skips_missing_and_null() {
        let report = inspect_table(&sample_table(), &InspectOptions::default());

        let fill: Vec<_> = report
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.filled))
            .collect();
        assert_eq!(
            fill,
            vec![
                ("path", 4),
                ("region_id", 4),
                ("name", 3),
                ("x", 2),
                ("label", 2),
                ("cx", 1),
            ]
        );
    }

    #[test]
    fn shapes_sorted_by_count_then_name() {
        let report = inspect_table(&sample_table(), &InspectOptions::default());

        let shapes: Vec<_> = report
            .shapes
            .iter()
            .map(|s| (s.shape.as_str(), s.count))
            .collect();
        assert_eq!(shapes, vec![("rect", 2), ("(none)", 1), ("polygon", 1)]);
    }

    #[test]
    fn images_counted_by_source_key_not_path_cell() {
        let table = from_via_str(
            r#"{"_via_img_metadata": {
                "a.jpg": {"regions": [
                    {"shape_attributes": {"name": "rect"}, "region_attributes": {"path": "x/1.jpg"}},
                    {"shape_attributes": {"name": "rect"}, "region_attributes": {"path": 42}}
                ]},
                "b.jpg": {"regions": [
                    {"shape_attributes": {"name": "rect"}, "region_attributes": {}}
                ]}
            }}"#,
        )
        .expect("parse");

        let report = inspect_table(&table, &InspectOptions::default());
        assert_eq!(report.summary.rows, 3);
        assert_eq!(report.summary.images, 2);
        assert_eq!(report.summary.max_regions_per_image, 2);
    }

    #[test]
    fn empty_table_report() {
        let table = from_via_str(r#"{"_via_img_metadata": {}}"#).expect("parse");
        let report = inspect_table(&table, &InspectOptions::default());

        assert_eq!(report.summary.rows, 0);
        assert_eq!(report.summary.max_regions_per_image, 0);
        assert!(report.columns.is_empty());
        assert!(report.shapes.is_empty());
        assert!(report.to_string().contains("No regions found."));
    }
}
