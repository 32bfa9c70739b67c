use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Dimensions, Range, Reader, Xlsx};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::GridtabError;
use crate::extraction::{DecodedWorkbook, SheetData, WorkbookReader};
use crate::grid::CellGrid;
use crate::model::{Bounds, CellValue, MergeRange};

/// Workbook backend for xlsx/xlsm files built on calamine.
///
/// Holds no state; one instance can be shared across threads and calls.
pub struct CalamineReader;

impl CalamineReader {
    pub fn new() -> Self {
        CalamineReader
    }
}

impl Default for CalamineReader {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookReader for CalamineReader {
    fn read_workbook(&self, bytes: &[u8]) -> Result<DecodedWorkbook, GridtabError> {
        let cursor = Cursor::new(bytes);
        let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
            .map_err(|e| GridtabError::Workbook(format!("failed to open xlsx: {e}")))?;

        let mut decoded = DecodedWorkbook::default();
        for name in workbook.sheet_names() {
            let range = match workbook.worksheet_range(&name) {
                Ok(range) => range,
                Err(e) => {
                    tracing::warn!(sheet = %name, error = %e, "skipping unreadable sheet");
                    decoded.warnings.push(format!("sheet '{name}' skipped: {e}"));
                    continue;
                }
            };

            let formulas = match workbook.worksheet_formula(&name) {
                Ok(formulas) => formulas,
                Err(e) => {
                    tracing::warn!(sheet = %name, error = %e, "formulas unreadable");
                    decoded.warnings.push(format!("sheet '{name}': formulas ignored: {e}"));
                    Range::default()
                }
            };

            let regions = match workbook.worksheet_merge_cells(&name) {
                Some(Ok(regions)) => regions,
                Some(Err(e)) => {
                    tracing::warn!(sheet = %name, error = %e, "merged cells unreadable");
                    decoded.warnings.push(format!("sheet '{name}': merges ignored: {e}"));
                    Vec::new()
                }
                None => Vec::new(),
            };

            let grid = build_grid(&name, &range, &formulas);
            let merges = build_merges(&grid, &regions);
            tracing::debug!(
                sheet = %name,
                rows = grid.rows(),
                cols = grid.cols(),
                merges = merges.len(),
                "decoded sheet"
            );
            decoded.sheets.push(SheetData { name, grid, merges });
        }

        Ok(decoded)
    }

    fn backend_name(&self) -> &str {
        "calamine"
    }
}

/// Place every used cell at its absolute 1-based position.
fn build_grid(name: &str, range: &Range<Data>, formulas: &Range<String>) -> CellGrid {
    let formula_at = formula_index(formulas);
    let (row0, col0) = range.start().unwrap_or((0, 0));
    let mut grid = match range.end() {
        Some((r, c)) => CellGrid::new(name, r + 1, c + 1),
        None => CellGrid::new(name, 0, 0),
    };

    for (r, c, data) in range.used_cells() {
        let row = row0 + r as u32 + 1;
        let col = col0 + c as u32 + 1;
        let value = convert_data(data, row, col);
        let value = match formula_at.get(&(row, col)) {
            Some(formula) => CellValue::FormulaResult {
                formula: formula.clone(),
                result: (!value.is_empty()).then(|| Box::new(value)),
            },
            None => value,
        };
        grid.set(row, col, value);
    }

    // Formulas whose cached value is missing never show up in used_cells.
    for (&(row, col), formula) in &formula_at {
        if grid.get(row, col).map_or(true, CellValue::is_empty) {
            grid.set(
                row,
                col,
                CellValue::FormulaResult {
                    formula: formula.clone(),
                    result: None,
                },
            );
        }
    }
    grid
}

fn formula_index(formulas: &Range<String>) -> HashMap<(u32, u32), String> {
    let (row0, col0) = formulas.start().unwrap_or((0, 0));
    formulas
        .used_cells()
        .filter(|(_, _, f)| !f.is_empty())
        .map(|(r, c, f)| ((row0 + r as u32 + 1, col0 + c as u32 + 1), f.clone()))
        .collect()
}

/// Convert calamine merged regions (0-based) into merge ranges carrying the
/// anchor cell's value.
fn build_merges(grid: &CellGrid, regions: &[Dimensions]) -> Vec<MergeRange> {
    regions
        .iter()
        .map(|d| {
            let bounds = Bounds::new(d.start.0 + 1, d.start.1 + 1, d.end.0 + 1, d.end.1 + 1);
            let anchor = grid
                .get(bounds.start_row, bounds.start_col)
                .cloned()
                .unwrap_or_default();
            MergeRange::new(bounds, anchor)
        })
        .collect()
}

/// Classify one calamine value.
///
/// Shapes without a matching variant (error cells, ISO durations, date
/// strings that do not parse) are kept as their text form.
fn convert_data(data: &Data, row: u32, col: u32) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::DateTime(value),
            None => unrecognized(data, row, col),
        },
        Data::DateTimeIso(s) => match parse_iso_datetime(s) {
            Some(value) => CellValue::DateTime(value),
            None => unrecognized(data, row, col),
        },
        Data::DurationIso(_) | Data::Error(_) => unrecognized(data, row, col),
        Data::Empty => CellValue::Empty,
    }
}

fn unrecognized(data: &Data, row: u32, col: u32) -> CellValue {
    tracing::debug!(row, col, value = %data, "coercing unrecognized cell shape to text");
    CellValue::Text(data.to_string())
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local()))
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
