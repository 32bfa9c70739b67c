use crate::grid::CellGrid;
use crate::model::TableRegion;

/// Find the table region(s) within a sheet.
///
/// A sheet yields one region spanning every occupied cell, named after the
/// sheet, or none when the sheet holds no values. Splitting a sheet into
/// several disjoint tables would happen here without touching the header
/// builder or projectors.
pub fn find_table_regions(grid: &CellGrid) -> Vec<TableRegion> {
    grid.occupied_bounds()
        .map(|bounds| TableRegion {
            name: grid.name().to_string(),
            bounds,
        })
        .into_iter()
        .collect()
}
