use std::fmt::Write;

use crate::value::{Row, Value};

/// Render rows as an aligned text table with a header and separator line.
///
/// `Null` cells show as `NULL`. Rows shorter than the header are padded
/// with empty cells; extra cells are ignored.
pub fn render_table(header: &[String], rows: &[Row]) -> String {
    if header.is_empty() {
        return "(empty result set)".to_string();
    }

    // Column widths, minimum = header length.
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell_text(cell).chars().count());
        }
    }

    let mut out = String::new();

    for (i, name) in header.iter().enumerate() {
        if i > 0 {
            out.push_str(" | ");
        }
        let _ = write!(out, "{:<width$}", name, width = widths[i]);
    }
    out.push('\n');

    for (i, w) in widths.iter().enumerate() {
        if i > 0 {
            out.push_str("-+-");
        }
        out.push_str(&"-".repeat(*w));
    }
    out.push('\n');

    for row in rows {
        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                out.push_str(" | ");
            }
            let text = row.get(i).map(cell_text).unwrap_or_default();
            let _ = write!(out, "{:<width$}", text, width = *width);
        }
        out.push('\n');
    }

    out
}

fn cell_text(cell: &Value) -> String {
    cell.to_string()
}
