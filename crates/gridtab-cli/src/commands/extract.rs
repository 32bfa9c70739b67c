use gridtab_core::error::GridtabError;
use gridtab_core::extraction::calamine_xlsx::CalamineReader;
use gridtab_core::model::ExtractOptions;
use std::path::{Path, PathBuf};

use crate::output;

pub fn run(
    input_file: PathBuf,
    json: bool,
    sheets: Vec<String>,
    config: Option<PathBuf>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), GridtabError> {
    let mut options = match config {
        Some(path) => load_options(&path)?,
        None => ExtractOptions::default(),
    };
    if json {
        options.convert_to_json = true;
    }
    if !sheets.is_empty() {
        options.sheets = Some(sheets);
    }
    // A JSON file or JSON output is only useful with projected rows.
    if output_file.is_some() || output_format == "json" {
        options.convert_to_json = true;
    }

    tracing::info!(
        file = %input_file.display(),
        json = options.convert_to_json,
        "extracting workbook"
    );
    let bytes = std::fs::read(&input_file)?;
    let reader = CalamineReader::new();
    let result = gridtab_core::extract_workbook(&bytes, &reader, &options)?;

    for w in &result.warnings {
        eprintln!("  warning: {w}");
    }

    match output_file {
        Some(path) => {
            let json = serde_json::to_string_pretty(&result)?;
            std::fs::write(&path, json)?;
            let tables: usize = result.sheets.iter().map(|s| s.tables.len()).sum();
            eprintln!(
                "Extracted {} table(s) from {} sheet(s), written to {}",
                tables,
                result.sheets.len(),
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&result)?,
            _ => output::table::print(&result),
        },
    }

    Ok(())
}

fn load_options(path: &Path) -> Result<ExtractOptions, GridtabError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
