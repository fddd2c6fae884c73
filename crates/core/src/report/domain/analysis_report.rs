use chrono::{DateTime, Local};
use serde::Serialize;

use crate::advice::domain::recommendation::Recommendation;
use crate::classification::domain::skin_condition::SkinCondition;
use crate::shared::constants::REPORT_PREFIX;

const TITLE: &str = "AURA DERM - SKIN ANALYSIS REPORT";
const RULE_WIDTH: usize = 50;
const BAR_WIDTH: usize = 20;
const ANONYMOUS_USER: &str = "anonymous";

/// Everything a skin analysis report shows, stamped with its creation time.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub user: String,
    pub generated_at: DateTime<Local>,
    pub condition: SkinCondition,
    /// Per-class probabilities, most likely first. Empty hides the
    /// confidence section.
    pub probabilities: Vec<(SkinCondition, f32)>,
    pub recommendation: Recommendation,
}

impl AnalysisReport {
    pub fn new(user: &str, condition: SkinCondition, recommendation: Recommendation) -> Self {
        Self {
            user: user.to_string(),
            generated_at: Local::now(),
            condition,
            probabilities: Vec::new(),
            recommendation,
        }
    }

    pub fn with_probabilities(mut self, probabilities: Vec<(SkinCondition, f32)>) -> Self {
        self.probabilities = probabilities;
        self
    }

    pub fn with_timestamp(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// `AuraDerm_{user}_{YYYYmmdd_HHMMSS}.{extension}`
    pub fn file_name(&self, extension: &str) -> String {
        format!(
            "{REPORT_PREFIX}_{}_{}.{extension}",
            sanitize_user(&self.user),
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    pub fn render_text(&self) -> String {
        let rec = &self.recommendation;
        let mut out = String::new();

        out.push_str(TITLE);
        out.push('\n');
        out.push_str(&"=".repeat(RULE_WIDTH));
        out.push('\n');
        out.push_str(&format!(
            "Date: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("User: {}\n\n", self.user));
        out.push_str(&format!("Detected Skin Issue: {}\n\n", self.condition.title()));

        let products: Vec<String> = rec
            .products
            .iter()
            .map(|p| format!("{} ({})", p.name, p.kind))
            .collect();
        push_section(&mut out, "Recommended Products", &products);
        push_section(&mut out, "Recommended Acids", &rec.acids);
        push_section(&mut out, "Foods to Eat", &rec.diet.eat);
        push_section(&mut out, "Foods to Avoid", &rec.diet.avoid);
        out.push_str(&format!("Application Timing: {}\n", rec.timing));

        if !self.probabilities.is_empty() {
            out.push_str("\nPrediction Confidence:\n");
            for (condition, p) in &self.probabilities {
                out.push_str(&format!(
                    "  {:<14}{:>6.1}%  [{}]\n",
                    condition.title(),
                    p * 100.0,
                    confidence_bar(*p)
                ));
            }
        }

        out
    }
}

fn push_section(out: &mut String, heading: &str, items: &[String]) {
    out.push_str(heading);
    out.push_str(":\n");
    for item in items {
        out.push_str("  - ");
        out.push_str(item);
        out.push('\n');
    }
    out.push('\n');
}

/// Fixed-width text bar, `#` for the filled share.
fn confidence_bar(p: f32) -> String {
    let filled = ((p.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Restricts a user name to `[A-Za-z0-9_-]` for use in file names.
pub fn sanitize_user(user: &str) -> String {
    let cleaned: String = user
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        ANONYMOUS_USER.to_string()
    } else {
        cleaned
    }
}
