use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coords::{column_name, to_address};

/// A classified cell value. Every consumer matches on it exhaustively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Number(f64),
    Text(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
    /// A formula together with the value cached by the producing application.
    FormulaResult {
        formula: String,
        result: Option<Box<CellValue>>,
    },
    #[default]
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Boolean(v)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(v: NaiveDateTime) -> Self {
        CellValue::DateTime(v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub address: String,
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
}

/// Inclusive, 1-based rectangle on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl Bounds {
    /// Build bounds from two corners. Corners are reordered so that
    /// start <= end, and zero coordinates are raised to 1.
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        let (r1, r2) = (start_row.max(1), end_row.max(1));
        let (c1, c2) = (start_col.max(1), end_col.max(1));
        Bounds {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn col_count(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.start_row..=self.end_row).contains(&row)
            && (self.start_col..=self.end_col).contains(&col)
    }

    /// True when `other` lies entirely inside `self`.
    pub fn encloses(&self, other: &Bounds) -> bool {
        self.contains(other.start_row, other.start_col)
            && self.contains(other.end_row, other.end_col)
    }
}

fn write_address(f: &mut fmt::Formatter<'_>, row: u32, col: u32) -> fmt::Result {
    match to_address(row, col) {
        Ok(address) => f.write_str(&address),
        // Outside sheet limits; fall back to R1C1 so Display never fails.
        Err(_) => match column_name(col) {
            Ok(letters) => write!(f, "{letters}{row}"),
            Err(_) => write!(f, "R{row}C{col}"),
        },
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_address(f, self.start_row, self.start_col)?;
        if self.row_count() > 1 || self.col_count() > 1 {
            f.write_str(":")?;
            write_address(f, self.end_row, self.end_col)?;
        }
        Ok(())
    }
}

/// A block of cells that behaves as one logical cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRange {
    pub bounds: Bounds,
    /// Value of the top-left cell of the block.
    pub anchor_value: CellValue,
}

impl MergeRange {
    pub fn new(bounds: Bounds, anchor_value: CellValue) -> Self {
        MergeRange {
            bounds,
            anchor_value,
        }
    }

    pub fn col_span(&self) -> u32 {
        self.bounds.col_count()
    }

    pub fn row_span(&self) -> u32 {
        self.bounds.row_count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    pub name: String,
    pub bounds: Bounds,
}

/// One extracted table. Built once by the orchestrator and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub range: String,
    pub column_labels: Vec<String>,
    /// Rectangular: every row has one cell per region column.
    pub grid: Vec<Vec<Cell>>,
    pub merges: Vec<MergeRange>,
    pub has_hierarchical_headers: bool,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Vec<serde_json::Value>>,
}

/// Options accepted by the extraction entry points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Project every table into JSON objects in addition to markdown.
    pub convert_to_json: bool,
    /// Restrict workbook extraction to these sheets, in workbook order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheets: Option<Vec<String>>,
}
