use thiserror::Error;

/// Exit codes for the report tool.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_MALFORMED_EXPORT: i32 = 2;
pub const EXIT_CSV_STRUCTURE: i32 = 3;
pub const EXIT_IO_ERROR: i32 = 4;

/// Structural failures of the export pipeline.
///
/// Per-row payload recovery failures are not represented here: they are
/// contained inside the recovery stage and always resolve to a
/// `StudentWork` sentinel instead of aborting the run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Raw export too short to contain the preamble and header rows.
    #[error("malformed export: {0}")]
    MalformedExport(String),
    /// Header/column count mismatch after structural repair.
    #[error("csv structure: {0}")]
    CsvStructure(String),
    #[error("cannot read export: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv parse: {0}")]
    Csv(#[from] csv::Error),
}

impl ExportError {
    /// Exit code matching the failing stage.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExportError::MalformedExport(_) => EXIT_MALFORMED_EXPORT,
            ExportError::CsvStructure(_) | ExportError::Csv(_) => EXIT_CSV_STRUCTURE,
            ExportError::Io(_) => EXIT_IO_ERROR,
        }
    }
}
