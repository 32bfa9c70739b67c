pub mod calamine_xlsx;
pub mod table;

use crate::error::GridtabError;
use crate::grid::CellGrid;
use crate::model::MergeRange;

/// One decoded worksheet: its values and declared merges.
#[derive(Debug, Clone)]
pub struct SheetData {
    pub name: String,
    pub grid: CellGrid,
    pub merges: Vec<MergeRange>,
}

/// Output of a workbook backend.
#[derive(Debug, Clone, Default)]
pub struct DecodedWorkbook {
    /// Sheets in workbook order.
    pub sheets: Vec<SheetData>,
    /// Sheets the backend had to skip, with the reason.
    pub warnings: Vec<String>,
}

/// Trait for workbook decoding backends.
pub trait WorkbookReader: Send + Sync {
    /// Decode workbook bytes into per-sheet grids and merge lists.
    fn read_workbook(&self, bytes: &[u8]) -> Result<DecodedWorkbook, GridtabError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
