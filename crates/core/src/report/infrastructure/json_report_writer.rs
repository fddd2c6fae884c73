use std::path::{Path, PathBuf};

use crate::report::domain::analysis_report::AnalysisReport;
use crate::report::domain::report_writer::ReportWriter;

/// Pretty-printed JSON report.
pub struct JsonReportWriter;

impl ReportWriter for JsonReportWriter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, dir: &Path, report: &AnalysisReport) -> Result<PathBuf, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(report.file_name(self.extension()));
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), report)?;
        log::info!("Report written to {}", path.display());
        Ok(path)
    }
}
