use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::ExportError;
use crate::workbook::{Sheet, Workbook};

use super::{OutputFormat, WorkbookWriter, WriteOutcome};

/// One CSV file per sheet, named `<Sheet>.csv`, in a directory named after
/// the file stem of the target path (`SchoolData.xlsx` → `SchoolData/`).
/// Formulas are written as `=...` text.
#[derive(Debug, Clone, Default)]
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn output_dir(path: &Path) -> PathBuf {
        match path.file_stem() {
            Some(stem) => path.with_file_name(stem),
            None => path.to_path_buf(),
        }
    }
}

impl WorkbookWriter for CsvWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write(&self, workbook: &Workbook, path: &Path) -> Result<WriteOutcome, ExportError> {
        let dir = Self::output_dir(path);
        std::fs::create_dir_all(&dir)?;

        let mut outcome = WriteOutcome {
            files: Vec::new(),
            bytes_written: Some(0),
        };
        let mut total = 0_u64;
        for sheet in workbook.sheets() {
            let file = dir.join(format!("{}.csv", sheet.name()));
            total = total.saturating_add(write_sheet_csv(&file, sheet)?);
            outcome.files.push(file);
        }
        outcome.bytes_written = Some(total);
        Ok(outcome)
    }
}

/// Write a sheet with its header row and return the bytes written.
pub fn write_sheet_csv(path: &Path, sheet: &Sheet) -> Result<u64, ExportError> {
    let writer = BufWriter::new(File::create(path)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(counting);

    writer.write_record(sheet.headers())?;
    let width = sheet.headers().len();
    for cells in sheet.rows() {
        let mut record: Vec<String> = cells.iter().map(|cell| cell.to_text()).collect();
        if record.len() < width {
            record.resize(width, String::new());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
