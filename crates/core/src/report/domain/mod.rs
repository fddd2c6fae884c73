pub mod analysis_report;
pub mod report_writer;
