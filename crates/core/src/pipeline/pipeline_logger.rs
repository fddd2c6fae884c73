use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for pipeline events: progress, stage timings, counters and
/// status messages.
pub trait PipelineLogger: Send {
    /// Report item-level progress (clips evaluated, frames scored, ...).
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took once.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record one observation of a named value (e.g. frames sampled).
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything. Used by tests and library callers that do their
/// own reporting.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Accumulates stage timings and metrics and logs them through `log`.
///
/// Progress lines are throttled to one every `throttle` items plus the last.
pub struct StdoutPipelineLogger {
    throttle: usize,
    timings: BTreeMap<String, Vec<f64>>,
    metrics: BTreeMap<String, Vec<f64>>,
    started: Instant,
    total_items: usize,
    messages: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle: usize) -> Self {
        Self {
            throttle: throttle.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            started: Instant::now(),
            total_items: 0,
            messages: Vec::new(),
        }
    }

    /// Formatted summary, or `None` when nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Pipeline summary ({} items, {:.1}s total):",
            self.total_items,
            elapsed_ms / 1000.0
        )];

        for (stage, durations) in &self.timings {
            let total_ms: f64 = durations.iter().sum();
            lines.push(format!(
                "  {stage:12}: avg {:6.1}ms  total {total_ms:7.0}ms  ({} runs)",
                mean(durations),
                durations.len()
            ));
        }

        for (name, values) in &self.metrics {
            lines.push(format!("  {name}: avg {:.1}", mean(values)));
        }

        if self.total_items > 0 && elapsed_ms > 0.0 {
            let rate = self.total_items as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {rate:.2} items/s"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_items = total;
        if total > 0 && (current % self.throttle == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Progress: {current}/{total} ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_accepts_everything() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("sample", 5.0);
        logger.metric("frames_skipped", 1.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timings_recorded_per_stage() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("sample", 20.0);
        logger.timing("sample", 30.0);
        logger.timing("score", 5.0);

        assert_eq!(logger.timings_for("sample"), Some(&[20.0, 30.0][..]));
        assert_eq!(logger.timings_for("score"), Some(&[5.0][..]));
        assert!(logger.timings_for("missing").is_none());
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(4, 4);
        logger.timing("sample", 12.0);
        logger.metric("frames_sampled", 9.0);
        logger.metric("frames_sampled", 10.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Pipeline summary (4 items"));
        assert!(summary.contains("sample"));
        assert!(summary.contains("frames_sampled: avg 9.5"));
        assert!(summary.contains("items/s"));
    }

    #[test]
    fn test_empty_summary_is_none() {
        assert!(StdoutPipelineLogger::default().summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_total() {
        let mut logger = StdoutPipelineLogger::new(3);
        for i in 1..=7 {
            logger.progress(i, 7);
        }
        assert_eq!(logger.total_items, 7);
    }

    #[test]
    fn test_info_keeps_messages() {
        let mut logger = StdoutPipelineLogger::default();
        logger.info("Sampling clip");
        assert_eq!(logger.messages(), &["Sampling clip".to_string()]);
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_relative_eq!(mean(&[]), 0.0);
        assert_relative_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }
}
