use std::path::{Path, PathBuf};

use crate::report::domain::analysis_report::AnalysisReport;
use crate::report::domain::report_writer::ReportWriter;

/// Plain-text report.
pub struct TextReportWriter;

impl ReportWriter for TextReportWriter {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn write(&self, dir: &Path, report: &AnalysisReport) -> Result<PathBuf, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(report.file_name(self.extension()));
        std::fs::write(&path, report.render_text())?;
        log::info!("Report written to {}", path.display());
        Ok(path)
    }
}
