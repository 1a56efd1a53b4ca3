use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlokasiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid month '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown report kind: {0}")]
    UnknownKind(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Spreadsheet error: {0}")]
    Xlsx(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AlokasiError>;
