#[derive(Debug, thiserror::Error)]
pub enum GridtabError {
    #[error("invalid cell address '{0}': expected letters followed by a row number (e.g. B12)")]
    InvalidAddress(String),

    #[error("invalid coordinate (row {row}, column {col}): rows are 1..=1048576, columns 1..=16384")]
    InvalidCoordinate { row: u32, col: u32 },

    #[error("invalid range reference '{0}'")]
    InvalidRange(String),

    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
