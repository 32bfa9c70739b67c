use gridtab_core::error::GridtabError;
use gridtab_core::WorkbookTables;

pub fn print(result: &WorkbookTables) -> Result<(), GridtabError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
