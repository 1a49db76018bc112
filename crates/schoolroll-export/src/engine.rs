use std::path::Path;
use std::time::Instant;

use tracing::info;

use schoolroll_store::Store;

use crate::errors::ExportError;
use crate::model::{ExportReport, SheetReport};
use crate::output::WorkbookWriter;
use crate::participation::{annotate, summarize};
use crate::sheets::build_workbook;
use crate::source::ExportSource;

/// Read every table from `store`, aggregate participation and write the
/// workbook to `path`. The store is only read.
pub async fn export(
    store: &dyn Store,
    writer: &dyn WorkbookWriter,
    path: &Path,
) -> Result<ExportReport, ExportError> {
    let start = Instant::now();
    let source = ExportSource::load(store).await?;

    let participation = summarize(&source.submissions);
    let submissions = annotate(&source.submissions, &participation);
    info!(
        total_families = participation.total_families,
        completed_families = participation.completed_families,
        rate = participation.rate,
        "participation computed"
    );

    let workbook = build_workbook(&source, &submissions)?;
    let outcome = writer.write(&workbook, path)?;

    let sheets = workbook
        .sheets()
        .iter()
        .map(|sheet| SheetReport {
            sheet: sheet.name().to_string(),
            rows: sheet.len() as u64,
        })
        .collect();

    let report = ExportReport {
        format: writer.format(),
        files: outcome.files,
        sheets,
        participation,
        bytes_written: outcome.bytes_written,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        format = %report.format,
        path = %path.display(),
        files = report.files.len(),
        bytes = report.bytes_written.unwrap_or_default(),
        "workbook written"
    );
    Ok(report)
}
