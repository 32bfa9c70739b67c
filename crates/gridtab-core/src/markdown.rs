use std::fmt::Write;

use crate::model::Cell;
use crate::parsing::values::display_value;

/// Render rows of display strings as a pipe table. The first row is the
/// header and fixes the separator width.
///
/// Rows shorter than the header are padded with a single space per missing
/// cell; longer rows keep all of their cells. Pipes inside a cell are
/// escaped and line breaks flattened so a cell never breaks the row.
pub fn render_markdown(rows: &[Vec<String>]) -> String {
    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };
    let columns = header.len();
    let mut out = String::new();

    write_row(&mut out, header, columns);
    out.push('|');
    for _ in 0..columns {
        out.push_str(" --- |");
    }
    out.push('\n');
    for row in body {
        write_row(&mut out, row, columns);
    }
    out
}

fn write_row(out: &mut String, row: &[String], columns: usize) {
    out.push('|');
    for cell in row {
        // Writing into a String cannot fail.
        let _ = write!(out, " {} |", escape_cell(cell));
    }
    for _ in row.len()..columns {
        out.push_str("   |");
    }
    out.push('\n');
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Display strings for a block of cells, ready for [`render_markdown`].
pub fn display_rows(cells: &[Vec<Cell>]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|row| row.iter().map(|c| display_value(&c.value)).collect())
        .collect()
}
