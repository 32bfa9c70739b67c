use gridtab_core::error::GridtabError;
use gridtab_core::extraction::calamine_xlsx::CalamineReader;
use gridtab_core::extraction::WorkbookReader;
use std::path::PathBuf;

pub fn run(input_file: PathBuf) -> Result<(), GridtabError> {
    let bytes = std::fs::read(&input_file)?;
    let decoded = CalamineReader::new().read_workbook(&bytes)?;

    let max_name = decoded
        .sheets
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(10);

    for sheet in &decoded.sheets {
        let range = sheet
            .grid
            .occupied_bounds()
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(empty)".into());
        println!(
            "  {:<width$}  {}  ({} merged range(s))",
            sheet.name,
            range,
            sheet.merges.len(),
            width = max_name
        );
    }
    for w in &decoded.warnings {
        eprintln!("  warning: {w}");
    }

    Ok(())
}
