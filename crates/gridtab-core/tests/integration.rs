//! Integration tests for extract_workbook() end-to-end pipeline.
//!
//! Most tests use a MockReader that returns pre-built sheets without
//! decoding any file. The calamine tests build small xlsx archives in
//! memory, so no workbook fixtures are checked in.

use std::io::{Cursor, Write};

use gridtab_core::error::GridtabError;
use gridtab_core::extraction::calamine_xlsx::CalamineReader;
use gridtab_core::extraction::{DecodedWorkbook, SheetData, WorkbookReader};
use gridtab_core::grid::CellGrid;
use gridtab_core::model::{Bounds, CellValue, ExtractOptions, MergeRange};
use gridtab_core::{extract_tables, extract_workbook, render_markdown};
use serde_json::json;

struct MockReader {
    sheets: Vec<SheetData>,
    warnings: Vec<String>,
}

impl WorkbookReader for MockReader {
    fn read_workbook(&self, _bytes: &[u8]) -> Result<DecodedWorkbook, GridtabError> {
        Ok(DecodedWorkbook {
            sheets: self.sheets.clone(),
            warnings: self.warnings.clone(),
        })
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct FailingReader;

impl WorkbookReader for FailingReader {
    fn read_workbook(&self, _bytes: &[u8]) -> Result<DecodedWorkbook, GridtabError> {
        Err(GridtabError::Workbook("corrupt archive".into()))
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

fn sheet(name: &str, rows: Vec<Vec<CellValue>>, merges: Vec<MergeRange>) -> SheetData {
    SheetData {
        name: name.to_string(),
        grid: CellGrid::from_rows(name, rows),
        merges,
    }
}

fn json_options() -> ExtractOptions {
    ExtractOptions {
        convert_to_json: true,
        ..Default::default()
    }
}

/// Inventory sheet with a three-level header:
///
/// |        Warehouse        | Item |  Notes   |
/// |  North    |  South      |      |          |
/// | Qty | Cost | Qty | Cost |      |          |
fn inventory_sheet() -> SheetData {
    let e = || CellValue::Empty;
    sheet(
        "Inventory",
        vec![
            vec![text("Warehouse"), e(), e(), e(), text("Item"), text("Notes"), e()],
            vec![text("North"), e(), text("South"), e(), e(), e(), e()],
            vec![text("Qty"), text("Cost"), text("Qty"), text("Cost"), e(), e(), e()],
            vec![num(4.0), num(2.5), num(7.0), num(3.0), text("Bolt"), text("fragile"), e()],
            vec![num(1.0), num(9.0), num(0.0), num(9.5), text("Gear"), e(), text("check")],
        ],
        vec![
            MergeRange::new(Bounds::new(1, 1, 1, 4), text("Warehouse")),
            MergeRange::new(Bounds::new(2, 1, 2, 2), text("North")),
            MergeRange::new(Bounds::new(2, 3, 2, 4), text("South")),
            MergeRange::new(Bounds::new(1, 5, 3, 5), text("Item")),
            MergeRange::new(Bounds::new(1, 6, 3, 7), text("Notes")),
        ],
    )
}

// ---------------------------------------------------------------------------
// Test 1: Three header rows inferred from column-spanning merges
// ---------------------------------------------------------------------------
#[test]
fn three_level_header_nests_values() {
    let reader = MockReader {
        sheets: vec![inventory_sheet()],
        warnings: vec![],
    };

    let result = extract_workbook(&[], &reader, &json_options()).unwrap();

    assert_eq!(result.backend, "mock");
    assert_eq!(result.sheets.len(), 1);
    let table = &result.sheets[0].tables[0];
    assert!(table.has_hierarchical_headers);
    assert_eq!(table.range, "A1:G5");
    assert_eq!(
        table.column_labels,
        vec!["Qty", "Cost", "Qty", "Cost", "Item", "Notes", "Notes"]
    );

    // The "Notes" merge reaches row 3, so rows 1-3 are headers.
    let rows = table.json.as_ref().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        json!({
            "Warehouse": {
                "North": {"Qty": 4, "Cost": 2.5},
                "South": {"Qty": 7, "Cost": 3}
            },
            "Item": {"Item": {"Item": "Bolt"}},
            // Both "Notes" columns share a path; the second (empty) one wins.
            "Notes": {"Notes": {"Notes": null}}
        })
    );
    assert_eq!(rows[1]["Warehouse"]["South"], json!({"Qty": 0, "Cost": 9.5}));
    assert_eq!(rows[1]["Notes"]["Notes"]["Notes"], "check");
}

// ---------------------------------------------------------------------------
// Test 2: Flat sheet without merges
// ---------------------------------------------------------------------------
#[test]
fn flat_sheet_yields_one_object_per_data_row() {
    let reader = MockReader {
        sheets: vec![sheet(
            "Staff",
            vec![
                vec![text("Name"), text("Started"), text("Remote")],
                vec![text("Ada"), num(2019.0), CellValue::Boolean(true)],
                vec![text("Alan"), num(2021.0), CellValue::Boolean(false)],
                vec![text("Grace"), CellValue::Empty, CellValue::Boolean(true)],
            ],
            vec![],
        )],
        warnings: vec![],
    };

    let result = extract_workbook(&[], &reader, &json_options()).unwrap();
    let table = &result.sheets[0].tables[0];
    let rows = table.json.as_ref().unwrap();

    assert!(!table.has_hierarchical_headers);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.as_object().unwrap().len() == 3));
    assert_eq!(rows[2], json!({"Name": "Grace", "Started": null, "Remote": true}));
    assert_eq!(table.column_labels, vec!["Name", "Started", "Remote"]);
}

// ---------------------------------------------------------------------------
// Test 3: Sheet filter keeps workbook order and rejects unknown names
// ---------------------------------------------------------------------------
#[test]
fn sheet_filter_selects_and_validates() {
    let reader = MockReader {
        sheets: vec![
            sheet("A", vec![vec![text("x")], vec![num(1.0)]], vec![]),
            sheet("B", vec![vec![text("y")], vec![num(2.0)]], vec![]),
            sheet("C", vec![vec![text("z")], vec![num(3.0)]], vec![]),
        ],
        warnings: vec![],
    };

    let options = ExtractOptions {
        convert_to_json: false,
        sheets: Some(vec!["C".into(), "A".into()]),
    };
    let result = extract_workbook(&[], &reader, &options).unwrap();
    let names: Vec<&str> = result.sheets.iter().map(|s| s.sheet.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);

    let missing = ExtractOptions {
        convert_to_json: false,
        sheets: Some(vec!["Nope".into()]),
    };
    match extract_workbook(&[], &reader, &missing) {
        Err(GridtabError::SheetNotFound(name)) => assert_eq!(name, "Nope"),
        other => panic!("expected SheetNotFound, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 4: Empty sheets and backend warnings pass through
// ---------------------------------------------------------------------------
#[test]
fn empty_sheet_and_warnings() {
    let reader = MockReader {
        sheets: vec![
            sheet("Blank", vec![vec![CellValue::Empty; 2]; 2], vec![]),
            sheet("Data", vec![vec![text("k")], vec![num(1.0)]], vec![]),
        ],
        warnings: vec!["sheet 'Chart1' skipped: not a worksheet".into()],
    };

    let result = extract_workbook(&[], &reader, &json_options()).unwrap();
    assert_eq!(result.sheets.len(), 2);
    assert!(result.sheets[0].tables.is_empty());
    assert_eq!(result.sheets[1].tables.len(), 1);
    assert_eq!(result.warnings.len(), 1);
}

// ---------------------------------------------------------------------------
// Test 5: Reader failure is propagated
// ---------------------------------------------------------------------------
#[test]
fn reader_failure_is_an_error() {
    let err = extract_workbook(&[], &FailingReader, &json_options()).unwrap_err();
    assert!(err.to_string().contains("corrupt archive"));
}

// ---------------------------------------------------------------------------
// Test 6: Markdown rendering of an extracted table
// ---------------------------------------------------------------------------
#[test]
fn table_markdown_matches_renderer() {
    let data = sheet(
        "Prices",
        vec![
            vec![text("Item"), text("Price")],
            vec![text("Tea | green"), num(3.5)],
            vec![text("Coffee"), num(4.0)],
        ],
        vec![],
    );
    let tables = extract_tables(&data.grid, &data.merges, &ExtractOptions::default());
    let expected = render_markdown(&[
        vec!["Item".to_string(), "Price".to_string()],
        vec!["Tea | green".to_string(), "3.5".to_string()],
        vec!["Coffee".to_string(), "4".to_string()],
    ]);
    assert_eq!(tables[0].markdown, expected);
    assert!(tables[0].markdown.contains("| Tea \\| green | 3.5 |"));
}

// ---------------------------------------------------------------------------
// Test 7: Workbook results serialize to JSON
// ---------------------------------------------------------------------------
#[test]
fn workbook_result_serializes() {
    let reader = MockReader {
        sheets: vec![inventory_sheet()],
        warnings: vec![],
    };
    let result = extract_workbook(&[], &reader, &json_options()).unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["backend"], "mock");
    assert_eq!(value["sheets"][0]["sheet"], "Inventory");
    assert_eq!(value["sheets"][0]["tables"][0]["range"], "A1:G5");
    assert_eq!(
        value["sheets"][0]["tables"][0]["grid"][0][0]["value"],
        json!({"type": "text", "value": "Warehouse"})
    );
    assert!(value.get("warnings").is_none());
}

// ---------------------------------------------------------------------------
// xlsx fixtures built in memory
// ---------------------------------------------------------------------------
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Zip a minimal workbook whose worksheets carry the given raw XML bodies.
fn xlsx(sheets: &[(&str, &str)]) -> Vec<u8> {
    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    );
    let mut workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets>"#
    );
    let mut rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}">"#
    );
    for (i, (name, _)) in sheets.iter().enumerate() {
        let n = i + 1;
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
        workbook.push_str(&format!(r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
    }
    content_types.push_str("</Types>");
    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");
    let root_rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
    );

    let mut files = vec![
        ("[Content_Types].xml".to_string(), content_types),
        ("_rels/.rels".to_string(), root_rels),
        ("xl/workbook.xml".to_string(), workbook),
        ("xl/_rels/workbook.xml.rels".to_string(), rels),
    ];
    for (i, (_, body)) in sheets.iter().enumerate() {
        files.push((format!("xl/worksheets/sheet{}.xml", i + 1), body.to_string()));
    }

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (path, body) in files {
        zip.start_file(path, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn inline(address: &str, text: &str) -> String {
    format!(r#"<c r="{address}" t="inlineStr"><is><t>{text}</t></is></c>"#)
}

fn worksheet(rows: &str, merges: &[&str]) -> String {
    let mut xml = format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{MAIN_NS}"><sheetData>{rows}</sheetData>"#);
    if !merges.is_empty() {
        xml.push_str(&format!(r#"<mergeCells count="{}">"#, merges.len()));
        for m in merges {
            xml.push_str(&format!(r#"<mergeCell ref="{m}"/>"#));
        }
        xml.push_str("</mergeCells>");
    }
    xml.push_str("</worksheet>");
    xml
}

// ---------------------------------------------------------------------------
// Test 8: A corrupt sheet is skipped with a warning; the others still extract
// ---------------------------------------------------------------------------
#[test]
fn corrupt_sheet_is_skipped_with_warning() {
    let good = worksheet(
        &format!(
            r#"<row r="1">{}{}</row><row r="2">{}<c r="B2"><v>4</v></c></row>"#,
            inline("A1", "Name"),
            inline("B1", "Qty"),
            inline("A2", "Bolt"),
        ),
        &[],
    );
    // Cut off inside sheetData.
    let bad = format!(r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="{MAIN_NS}"><sheetData><row r="1">"#);
    let bytes = xlsx(&[("Good", good.as_str()), ("Bad", bad.as_str())]);

    let result = extract_workbook(&bytes, &CalamineReader::new(), &json_options()).unwrap();

    assert_eq!(result.backend, "calamine");
    assert_eq!(result.sheets.len(), 1);
    assert_eq!(result.sheets[0].sheet, "Good");
    assert_eq!(
        result.sheets[0].tables[0].json.as_deref().unwrap(),
        &[json!({"Name": "Bolt", "Qty": 4})]
    );
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("'Bad'"));
}

// ---------------------------------------------------------------------------
// Test 9: Merged header cells read from the sheet drive nesting
// ---------------------------------------------------------------------------
#[test]
fn calamine_merges_build_nested_rows() {
    let rows = format!(
        r#"<row r="1">{}{}</row><row r="2">{}{}</row><row r="3"><c r="A3"><v>100</v></c><c r="B3"><v>200</v></c>{}{}</row>"#,
        inline("A1", "Region"),
        inline("C1", "Notes"),
        inline("A2", "Q1"),
        inline("B2", "Q2"),
        inline("C3", "late"),
        inline("D3", "checked"),
    );
    // C1:D2 spans two header rows, so the header is two rows deep.
    let sheet = worksheet(&rows, &["A1:B1", "C1:D2"]);
    let bytes = xlsx(&[("Sales", sheet.as_str())]);

    let result = extract_workbook(&bytes, &CalamineReader::new(), &json_options()).unwrap();

    assert!(result.warnings.is_empty());
    let table = &result.sheets[0].tables[0];
    assert_eq!(table.range, "A1:D3");
    assert_eq!(table.merges.len(), 2);
    assert!(table.has_hierarchical_headers);
    assert_eq!(
        table.json.as_deref().unwrap(),
        &[json!({"Region": {"Q1": 100, "Q2": 200}, "Notes": {"Notes": "checked"}})]
    );
}
