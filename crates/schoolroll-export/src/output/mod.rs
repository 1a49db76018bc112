//! Workbook sinks.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ExportError;
use crate::workbook::Workbook;

pub mod csv;
pub mod xlsx;

pub use self::csv::CsvWriter;
pub use self::xlsx::XlsxWriter;

/// Files produced by a writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub files: Vec<PathBuf>,
    /// Total bytes across `files`, when the writer can tell.
    pub bytes_written: Option<u64>,
}

/// Serializes a [`Workbook`] to disk.
pub trait WorkbookWriter: Send + Sync {
    fn format(&self) -> OutputFormat;

    fn write(&self, workbook: &Workbook, path: &Path) -> Result<WriteOutcome, ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }

    pub fn writer(self) -> Box<dyn WorkbookWriter> {
        match self {
            OutputFormat::Xlsx => Box::new(XlsxWriter::new()),
            OutputFormat::Csv => Box::new(CsvWriter::new()),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
