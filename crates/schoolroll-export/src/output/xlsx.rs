use std::path::Path;

use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use tracing::debug;

use crate::errors::ExportError;
use crate::workbook::{Cell, Sheet, Workbook};

use super::{OutputFormat, WorkbookWriter, WriteOutcome};

/// Single `.xlsx` file with one worksheet per sheet and live formula cells.
#[derive(Debug, Clone, Default)]
pub struct XlsxWriter;

impl XlsxWriter {
    pub fn new() -> Self {
        Self
    }

    fn write_sheet(&self, worksheet: &mut Worksheet, sheet: &Sheet) -> Result<(), ExportError> {
        worksheet.set_name(sheet.name())?;

        let header_format = Format::new().set_bold();
        for (col, header) in sheet.headers().iter().enumerate() {
            worksheet.write_string_with_format(0, to_col(col)?, header, &header_format)?;
        }

        for (idx, cells) in sheet.rows().iter().enumerate() {
            let row = to_row(idx + 1)?;
            for (col, cell) in cells.iter().enumerate() {
                let col = to_col(col)?;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(value) => {
                        worksheet.write_string(row, col, value)?;
                    }
                    Cell::Number(value) => {
                        worksheet.write_number(row, col, *value)?;
                    }
                    Cell::Int(value) => {
                        worksheet.write_number(row, col, *value as f64)?;
                    }
                    Cell::Bool(value) => {
                        worksheet.write_boolean(row, col, *value)?;
                    }
                    Cell::Formula(formula) => {
                        worksheet.write_formula(row, col, formula.as_str())?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl WorkbookWriter for XlsxWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Xlsx
    }

    fn write(&self, workbook: &Workbook, path: &Path) -> Result<WriteOutcome, ExportError> {
        let mut xlsx = XlsxWorkbook::new();
        for sheet in workbook.sheets() {
            let worksheet = xlsx.add_worksheet();
            self.write_sheet(worksheet, sheet)?;
            debug!(sheet = sheet.name(), rows = sheet.len(), "worksheet written");
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let buffer = xlsx.save_to_buffer()?;
        std::fs::write(path, &buffer)?;

        Ok(WriteOutcome {
            files: vec![path.to_path_buf()],
            bytes_written: Some(buffer.len() as u64),
        })
    }
}

fn to_row(index: usize) -> Result<u32, ExportError> {
    u32::try_from(index)
        .map_err(|_| ExportError::InvalidWorkbook(format!("row {index} out of range")))
}

fn to_col(index: usize) -> Result<u16, ExportError> {
    u16::try_from(index)
        .map_err(|_| ExportError::InvalidWorkbook(format!("column {index} out of range")))
}
