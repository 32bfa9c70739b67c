//! Row-indexed lookup over a sheet's merged ranges.

use std::collections::HashMap;

use crate::model::{Bounds, MergeRange};

/// Merged ranges bucketed by every row they span.
///
/// `merge_at` scans only the bucket for the requested row, so header
/// construction does not pay a full scan per cell on sheets with many merges.
#[derive(Debug, Clone, Default)]
pub struct MergeRegistry {
    merges: Vec<MergeRange>,
    by_row: HashMap<u32, Vec<usize>>,
}

impl MergeRegistry {
    pub fn new(merges: Vec<MergeRange>) -> Self {
        let mut by_row: HashMap<u32, Vec<usize>> = HashMap::new();
        for (idx, merge) in merges.iter().enumerate() {
            for row in merge.bounds.start_row..=merge.bounds.end_row {
                by_row.entry(row).or_default().push(idx);
            }
        }
        MergeRegistry { merges, by_row }
    }

    /// The merge covering (row, col). Overlapping merges are not validated;
    /// the one registered first wins.
    pub fn merge_at(&self, row: u32, col: u32) -> Option<&MergeRange> {
        self.by_row
            .get(&row)?
            .iter()
            .map(|&idx| &self.merges[idx])
            .find(|m| (m.bounds.start_col..=m.bounds.end_col).contains(&col))
    }

    /// Merges lying entirely inside `bounds`, in registration order.
    pub fn contained_in(&self, bounds: &Bounds) -> Vec<MergeRange> {
        self.merges
            .iter()
            .filter(|m| bounds.encloses(&m.bounds))
            .cloned()
            .collect()
    }
}
