//! Dense, 1-based container of classified cell values for one sheet.

use crate::coords::to_address;
use crate::model::{Bounds, Cell, CellValue};

/// A rectangular grid of cell values anchored at A1.
///
/// Positions outside the grid read as missing; the grid never reports
/// ragged rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellGrid {
    name: String,
    rows: u32,
    cols: u32,
    values: Vec<CellValue>,
}

impl CellGrid {
    /// An all-empty grid of `rows` x `cols` cells.
    pub fn new(name: impl Into<String>, rows: u32, cols: u32) -> Self {
        CellGrid {
            name: name.into(),
            rows,
            cols,
            values: vec![CellValue::Empty; rows as usize * cols as usize],
        }
    }

    /// Build a grid from row vectors starting at A1. Short rows are padded
    /// with empty cells up to the widest row.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut grid = CellGrid::new(name, rows.len() as u32, width);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                grid.set(r as u32 + 1, c as u32 + 1, value);
            }
        }
        grid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    fn offset(&self, row: u32, col: u32) -> Option<usize> {
        if row == 0 || col == 0 || row > self.rows || col > self.cols {
            return None;
        }
        Some((row as usize - 1) * self.cols as usize + (col as usize - 1))
    }

    /// Value at a 1-based position, or `None` outside the grid.
    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.offset(row, col).map(|i| &self.values[i])
    }

    /// Store a value, growing the grid when the position lies outside it.
    /// Zero coordinates are ignored.
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        if row == 0 || col == 0 {
            return;
        }
        if row > self.rows || col > self.cols {
            self.grow(row.max(self.rows), col.max(self.cols));
        }
        if let Some(i) = self.offset(row, col) {
            self.values[i] = value;
        }
    }

    fn grow(&mut self, rows: u32, cols: u32) {
        let mut values = vec![CellValue::Empty; rows as usize * cols as usize];
        for r in 0..self.rows as usize {
            for c in 0..self.cols as usize {
                let old = r * self.cols as usize + c;
                values[r * cols as usize + c] = std::mem::take(&mut self.values[old]);
            }
        }
        self.values = values;
        self.rows = rows;
        self.cols = cols;
    }

    /// Smallest rectangle enclosing every non-empty value, or `None` when
    /// the grid holds no values at all.
    pub fn occupied_bounds(&self) -> Option<Bounds> {
        let mut found: Option<(u32, u32, u32, u32)> = None;
        for row in 1..=self.rows {
            for col in 1..=self.cols {
                if self.get(row, col).is_some_and(|v| !v.is_empty()) {
                    found = Some(match found {
                        None => (row, col, row, col),
                        Some((r1, c1, r2, c2)) => {
                            (r1.min(row), c1.min(col), r2.max(row), c2.max(col))
                        }
                    });
                }
            }
        }
        found.map(|(r1, c1, r2, c2)| Bounds::new(r1, c1, r2, c2))
    }

    /// Materialise the cells of `bounds` as a rectangular row-major block.
    /// Positions outside the grid come back as empty cells.
    pub fn cells_in(&self, bounds: &Bounds) -> Vec<Vec<Cell>> {
        (bounds.start_row..=bounds.end_row)
            .map(|row| {
                (bounds.start_col..=bounds.end_col)
                    .map(|col| Cell {
                        address: to_address(row, col).unwrap_or_default(),
                        row,
                        col,
                        value: self.get(row, col).cloned().unwrap_or_default(),
                    })
                    .collect()
            })
            .collect()
    }
}
