use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;
use crate::participation::ParticipationSummary;

/// Data row count of an exported sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SheetReport {
    pub sheet: String,
    pub rows: u64,
}

/// Report for an export run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub format: OutputFormat,
    pub files: Vec<PathBuf>,
    pub sheets: Vec<SheetReport>,
    pub participation: ParticipationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_written: Option<u64>,
    pub duration_ms: u64,
}

impl ExportReport {
    pub fn rows(&self, sheet: &str) -> Option<u64> {
        self.sheets
            .iter()
            .find(|report| report.sheet == sheet)
            .map(|report| report.rows)
    }
}
