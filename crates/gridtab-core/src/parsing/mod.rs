pub mod header;
pub mod values;

use serde_json::{Map, Value};

use crate::model::Cell;
use header::HeaderNode;
use values::{display_value, json_value};

/// The label for the column at 0-based `index`, or `Column{n}` (1-based)
/// when `label` is blank or whitespace.
pub fn column_label(label: &str, index: usize) -> String {
    if label.trim().is_empty() {
        format!("Column{}", index + 1)
    } else {
        label.to_string()
    }
}

/// Labels for a flat table: the display text of each header cell, with the
/// [`column_label`] fallback for blanks.
pub fn flat_column_labels(header_row: &[Cell]) -> Vec<String> {
    header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| column_label(&display_value(&cell.value), i))
        .collect()
}

/// Project a table whose first row holds plain labels.
///
/// Every row after the first becomes one `{label: value}` object. Tables
/// with fewer than two rows produce nothing. A repeated label keeps the
/// value of its rightmost column.
pub fn convert_flat_table(rows: &[Vec<Cell>]) -> Vec<Value> {
    if rows.len() < 2 {
        return Vec::new();
    }
    let labels = flat_column_labels(&rows[0]);

    rows[1..]
        .iter()
        .map(|row| {
            let mut object = Map::new();
            for (i, label) in labels.iter().enumerate() {
                let value = row.get(i).map(|c| json_value(&c.value)).unwrap_or(Value::Null);
                object.insert(label.clone(), value);
            }
            Value::Object(object)
        })
        .collect()
}

/// Project each data row (index >= `depth`) into nested objects following
/// the header paths.
///
/// Non-final path segments become (or reuse) nested objects and the cell
/// value lands at the final segment. When two columns share a path the
/// later column wins, and a leaf standing where an object is needed is
/// replaced by that object.
pub fn convert_nested_table(rows: &[Vec<Cell>], headers: &[HeaderNode], depth: u32) -> Vec<Value> {
    let depth = depth as usize;
    if rows.len() < 2 || depth >= rows.len() {
        return Vec::new();
    }

    rows[depth..]
        .iter()
        .map(|row| {
            let mut root = Map::new();
            for (i, header) in headers.iter().enumerate() {
                let value = row.get(i).map(|c| json_value(&c.value)).unwrap_or(Value::Null);
                insert_path(&mut root, &header.path, value);
            }
            Value::Object(root)
        })
        .collect()
}

fn insert_path(root: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((leaf, parents)) = path.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        let slot = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        node = match slot {
            Value::Object(map) => map,
            _ => return,
        };
    }
    node.insert(leaf.clone(), value);
}
