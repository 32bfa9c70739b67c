use gridtab_core::WorkbookTables;

pub fn print(result: &WorkbookTables) {
    let multi_sheet = result.sheets.len() > 1;

    for (i, sheet) in result.sheets.iter().enumerate() {
        if multi_sheet {
            if i > 0 {
                println!();
            }
            println!("--- Sheet: {} ---\n", sheet.sheet);
        }

        if sheet.tables.is_empty() {
            println!("  (no tables)");
            continue;
        }

        for table in &sheet.tables {
            let header_kind = if table.has_hierarchical_headers {
                "hierarchical headers"
            } else {
                "flat headers"
            };
            println!("=== {} ({}, {}) ===\n", table.name, table.range, header_kind);
            print!("{}", table.markdown);
            println!();
        }
    }
}
