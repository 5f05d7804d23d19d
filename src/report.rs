//! Rendering of significance test results
//!
//! Text output is a single sentence. JSON output carries the verdict, the
//! same sentence, and every intermediate statistic of the test.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::significance::TestResult;

/// How dataset-2 relates to dataset-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    NoSignificantDifference,
    Smaller { percent: f64 },
    Larger { percent: f64 },
}

impl Verdict {
    pub fn from_result(result: &TestResult) -> Self {
        if !result.significant {
            Verdict::NoSignificantDifference
        } else if result.dataset2_is_smaller {
            Verdict::Smaller {
                percent: result.percent_difference,
            }
        } else {
            Verdict::Larger {
                percent: result.percent_difference,
            }
        }
    }
}

/// Machine-readable report
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub message: String,
    pub result: &'a TestResult,
}

impl<'a> Report<'a> {
    pub fn new(result: &'a TestResult) -> Self {
        Self {
            verdict: Verdict::from_result(result),
            message: message(result),
            result,
        }
    }
}

/// Human-readable conclusion, e.g.
/// "With 95.0% confidence, dataset-2 is smaller than dataset-1 by about 1.1%."
pub fn message(result: &TestResult) -> String {
    let clp = result.confidence.percent();
    match Verdict::from_result(result) {
        Verdict::NoSignificantDifference => format!(
            "With {:.1}% confidence, there is no significant difference between the datasets.",
            clp
        ),
        Verdict::Smaller { percent } => format!(
            "With {:.1}% confidence, dataset-2 is smaller than dataset-1 by about {}%.",
            clp,
            format_percent(percent)
        ),
        Verdict::Larger { percent } => format!(
            "With {:.1}% confidence, dataset-2 is larger than dataset-1 by about {}%.",
            clp,
            format_percent(percent)
        ),
    }
}

/// Render a result in the requested output format
pub fn render(result: &TestResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(message(result)),
        OutputFormat::Json => serde_json::to_string_pretty(&Report::new(result))
            .context("Failed to serialize report"),
    }
}

/// One decimal place with thousands separators: 12345.67 -> "12,345.7"
fn format_percent(value: f64) -> String {
    let formatted = format!("{:.1}", value);
    let (integer, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "0"));
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{}", sign, grouped, fraction)
}
