use thiserror::Error;

use schoolroll_store::StoreError;

/// Errors emitted while building or writing the workbook.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid workbook: {0}")]
    InvalidWorkbook(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
