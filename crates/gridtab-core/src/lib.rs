pub mod coords;
pub mod error;
pub mod extraction;
pub mod grid;
pub mod markdown;
pub mod merges;
pub mod model;
pub mod parsing;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use error::GridtabError;
use extraction::table::find_table_regions;
use extraction::{SheetData, WorkbookReader};
use grid::CellGrid;
use merges::MergeRegistry;
use model::{ExtractOptions, MergeRange, Table, TableRegion};
use parsing::header::{build_header_paths, has_hierarchical_headers, infer_header_depth};

pub use markdown::render_markdown;

/// Tables extracted from one sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetTables {
    pub sheet: String,
    pub tables: Vec<Table>,
}

/// Result of extracting a whole workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookTables {
    pub backend: String,
    pub sheets: Vec<SheetTables>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Extract every table region of one sheet.
///
/// Each region is materialised into a rectangular cell block, paired with
/// the merges it fully contains, rendered to markdown and, when
/// `options.convert_to_json` is set, projected into JSON objects.
pub fn extract_tables(
    grid: &CellGrid,
    merges: &[MergeRange],
    options: &ExtractOptions,
) -> Vec<Table> {
    let registry = MergeRegistry::new(merges.to_vec());
    find_table_regions(grid)
        .iter()
        .map(|region| build_table(grid, &registry, region, options))
        .collect()
}

fn build_table(
    grid: &CellGrid,
    registry: &MergeRegistry,
    region: &TableRegion,
    options: &ExtractOptions,
) -> Table {
    let bounds = &region.bounds;
    let cells = grid.cells_in(bounds);
    let contained = registry.contained_in(bounds);
    let hierarchical = has_hierarchical_headers(bounds, &contained);
    let depth = infer_header_depth(bounds, &contained);

    // Header lookups only see merges inside the region.
    let region_registry = MergeRegistry::new(contained.clone());
    let headers = build_header_paths(grid, bounds, &region_registry, depth);

    let column_labels = if hierarchical {
        headers
            .iter()
            .enumerate()
            .map(|(i, node)| parsing::column_label(node.final_header(), i))
            .collect()
    } else {
        cells
            .first()
            .map(|row| parsing::flat_column_labels(row))
            .unwrap_or_default()
    };

    let json = options.convert_to_json.then(|| {
        if hierarchical {
            parsing::convert_nested_table(&cells, &headers, depth)
        } else {
            parsing::convert_flat_table(&cells)
        }
    });

    tracing::debug!(
        table = %region.name,
        range = %bounds,
        depth,
        hierarchical,
        merges = contained.len(),
        "built table"
    );

    Table {
        name: region.name.clone(),
        range: bounds.to_string(),
        column_labels,
        markdown: render_markdown(&markdown::display_rows(&cells)),
        grid: cells,
        merges: contained,
        has_hierarchical_headers: hierarchical,
        json,
    }
}

/// Main API entry point: decode a workbook and extract the tables of its
/// sheets.
///
/// Sheets are processed in parallel and returned in workbook order. When
/// `options.sheets` is set only those sheets are extracted, and naming a
/// sheet the workbook lacks is an error.
pub fn extract_workbook(
    bytes: &[u8],
    reader: &dyn WorkbookReader,
    options: &ExtractOptions,
) -> Result<WorkbookTables, GridtabError> {
    let decoded = reader.read_workbook(bytes)?;
    let sheets = select_sheets(decoded.sheets, options.sheets.as_deref())?;

    let sheets: Vec<SheetTables> = sheets
        .par_iter()
        .map(|sheet| SheetTables {
            sheet: sheet.name.clone(),
            tables: extract_tables(&sheet.grid, &sheet.merges, options),
        })
        .collect();

    Ok(WorkbookTables {
        backend: reader.backend_name().to_string(),
        sheets,
        warnings: decoded.warnings,
    })
}

fn select_sheets(
    sheets: Vec<SheetData>,
    wanted: Option<&[String]>,
) -> Result<Vec<SheetData>, GridtabError> {
    let Some(wanted) = wanted else {
        return Ok(sheets);
    };
    if let Some(missing) = wanted.iter().find(|w| !sheets.iter().any(|s| &s.name == *w)) {
        return Err(GridtabError::SheetNotFound(missing.clone()));
    }
    Ok(sheets
        .into_iter()
        .filter(|s| wanted.contains(&s.name))
        .collect())
}
