//! Fixed-width table rendering for the query transcript.

use std::fmt::Write as _;

/// Renders column headers and rows as an aligned text table.
///
/// The transcript is advisory output for humans; the structured payload
/// carries the machine-readable data.
#[must_use]
pub fn render_table(columns: &[String], rows: &[Vec<String>]) -> String {
    if columns.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = columns.iter().map(String::len).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.len());
            }
        }
    }

    let mut table = String::new();
    write_row(&mut table, columns, &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    write_row(&mut table, &rule, &widths);
    for row in rows {
        write_row(&mut table, row, &widths);
    }
    table
}

fn write_row(table: &mut String, cells: &[String], widths: &[usize]) {
    for (index, &width) in widths.iter().enumerate() {
        if index > 0 {
            table.push_str("  ");
        }
        let cell = cells.get(index).map_or("", String::as_str);
        let _ = write!(table, "{cell:<width$}");
    }
    // Trailing spaces on the last column are just noise.
    while table.ends_with(' ') {
        table.pop();
    }
    table.push('\n');
}
