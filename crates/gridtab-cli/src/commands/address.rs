use gridtab_core::coords::parse_range;
use gridtab_core::error::GridtabError;

pub fn run(reference: &str) -> Result<(), GridtabError> {
    let bounds = parse_range(reference.trim())?;
    println!("  reference: {bounds}");
    println!("  rows:      {}..={}", bounds.start_row, bounds.end_row);
    println!("  columns:   {}..={}", bounds.start_col, bounds.end_col);
    println!(
        "  size:      {} x {}",
        bounds.row_count(),
        bounds.col_count()
    );
    Ok(())
}
