//! Spreadsheet export of a generated school roster.
//!
//! Reads the tables back through the store, computes family participation,
//! lays out one sheet per table with cross-sheet references and hands the
//! result to a [`WorkbookWriter`].

pub mod engine;
pub mod errors;
pub mod model;
pub mod output;
pub mod participation;
pub mod sheets;
pub mod source;
pub mod workbook;

pub use engine::export;
pub use errors::ExportError;
pub use model::{ExportReport, SheetReport};
pub use output::{CsvWriter, OutputFormat, WorkbookWriter, WriteOutcome, XlsxWriter};
pub use participation::{AnnotatedSubmission, ParticipationSummary, annotate, summarize};
pub use sheets::build_workbook;
pub use source::ExportSource;
pub use workbook::{Cell, Sheet, Workbook, column_letter};
