use crate::grid::CellGrid;
use crate::merges::MergeRegistry;
use crate::model::{Bounds, MergeRange};
use crate::parsing::values::display_value;

/// Merges anchored this many rows below the region top (or fewer) are
/// treated as header candidates.
const HEADER_SCAN_ROWS: u32 = 2;

/// Header labels of one column, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderNode {
    /// 1-based sheet column.
    pub column: u32,
    pub path: Vec<String>,
}

impl HeaderNode {
    /// Innermost label, written as the leaf key during projection.
    pub fn final_header(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }
}

fn is_header_candidate(merge: &MergeRange, region: &Bounds) -> bool {
    merge.col_span() > 1 && merge.bounds.start_row <= region.start_row + HEADER_SCAN_ROWS
}

/// True when a column-spanning merge starts within the first three rows of
/// the region. `merges` must already be restricted to the region.
pub fn has_hierarchical_headers(region: &Bounds, merges: &[MergeRange]) -> bool {
    merges.iter().any(|m| is_header_candidate(m, region))
}

/// Number of leading header rows in `region`.
///
/// Only column-spanning merges anchored in the first three rows count; the
/// depth reaches down to the lowest bottom edge among them. A vertical-only
/// merge never deepens the header. The result leaves at least one data row.
pub fn infer_header_depth(region: &Bounds, merges: &[MergeRange]) -> u32 {
    let first_row = region.start_row;
    let max_end_row = merges
        .iter()
        .filter(|m| is_header_candidate(m, region))
        .map(|m| m.bounds.end_row)
        .max();

    let depth = match max_end_row {
        Some(end) if end > first_row => end - first_row + 1,
        _ => 1,
    };
    depth.min(region.row_count().saturating_sub(1)).max(1)
}

/// Label path for every column of `region`, using `depth` header rows.
///
/// A covered header position takes the merge's anchor value; otherwise the
/// cell's own value. Missing and blank labels are kept as empty strings.
pub fn build_header_paths(
    grid: &CellGrid,
    region: &Bounds,
    registry: &MergeRegistry,
    depth: u32,
) -> Vec<HeaderNode> {
    (region.start_col..=region.end_col)
        .map(|column| {
            let path = (0..depth)
                .map(|level| {
                    let row = region.start_row + level;
                    match registry.merge_at(row, column) {
                        Some(merge) => display_value(&merge.anchor_value),
                        None => grid.get(row, column).map(display_value).unwrap_or_default(),
                    }
                })
                .collect();
            HeaderNode { column, path }
        })
        .collect()
}
