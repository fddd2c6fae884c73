use std::path::{Path, PathBuf};

use crate::report::domain::analysis_report::AnalysisReport;

/// Persists an analysis report into a directory.
pub trait ReportWriter: Send {
    /// File extension of the written report, without the dot.
    fn extension(&self) -> &'static str;

    /// Writes the report into `dir`, creating it if missing, and returns
    /// the path of the new file.
    fn write(&self, dir: &Path, report: &AnalysisReport) -> Result<PathBuf, Box<dyn std::error::Error>>;
}
