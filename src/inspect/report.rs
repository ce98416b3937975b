//! Inspect report types and terminal formatting.

use std::fmt;

use serde::Serialize;

/// The result of inspecting a flattened table.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    /// Summary counts.
    pub summary: SummarySection,
    /// Fill counts per column, in column order.
    pub columns: Vec<ColumnFill>,
    /// Region counts per shape type (sorted by count descending).
    pub shapes: Vec<ShapeCount>,
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Summary counts for the table.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SummarySection {
    /// Total rows (one per region).
    pub rows: usize,
    /// Distinct images contributing at least one row, keyed by
    /// [`Row::image_key`](crate::via::Row::image_key) so `path` attributes do not skew it.
    pub images: usize,
    /// Largest number of regions on a single image.
    pub max_regions_per_image: usize,
    /// Number of columns in the table.
    pub columns: usize,
}

/// How many rows carry a value for one column.
#[derive(Clone, Debug, Serialize)]
pub struct ColumnFill {
    pub name: String,
    /// Rows where the cell is present and not `null`.
    pub filled: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ShapeCount {
    pub shape: String,
    pub count: usize,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "VIA Table Inspection Report")?;
        writeln!(f, "===========================")?;
        writeln!(f)?;

        self.fmt_summary(f)?;
        writeln!(f)?;

        if self.summary.rows == 0 {
            writeln!(f, "No regions found.")?;
            return Ok(());
        }

        self.fmt_shapes(f)?;
        writeln!(f)?;

        self.fmt_columns(f)?;

        Ok(())
    }
}

impl InspectReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;

        writeln!(f, "Summary")?;
        writeln!(f, "  Regions (rows):        {:>8}", format_number(s.rows))?;
        writeln!(f, "  Images with regions:   {:>8}", format_number(s.images))?;
        writeln!(
            f,
            "  Max regions per image: {:>8}",
            format_number(s.max_regions_per_image)
        )?;
        writeln!(f, "  Columns:               {:>8}", format_number(s.columns))?;

        Ok(())
    }

    fn fmt_shapes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Shapes ({})", self.shapes.len())?;

        let max_count = self.shapes.iter().map(|s| s.count).max().unwrap_or(1);
        for entry in &self.shapes {
            writeln!(
                f,
                "  {:<16} {:>7} {:>5}  {}",
                truncate_label(&entry.shape, 16),
                format_number(entry.count),
                fmt_percent(entry.count, self.summary.rows),
                render_bar(entry.count, max_count, self.bar_width)
            )?;
        }

        Ok(())
    }

    fn fmt_columns(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Columns ({})", self.columns.len())?;

        for column in &self.columns {
            writeln!(
                f,
                "  {:<16} {:>7} / {:<7} ({:>5})",
                truncate_label(&column.name, 16),
                format_number(column.filled),
                format_number(self.summary.rows),
                fmt_percent(column.filled, self.summary.rows)
            )?;
        }

        Ok(())
    }
}

/// Formats a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

fn fmt_percent(part: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", part as f64 / total as f64 * 100.0)
}

fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 {
        return String::new();
    }
    let filled = (count * width).div_ceil(max_count);
    "█".repeat(filled.min(width))
}

/// Truncates to `max_chars`, marking the cut with an ellipsis.
fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let mut out: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
