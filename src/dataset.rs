//! Dataset extraction from text files
//!
//! Each line is split on whitespace and the token in the requested column
//! (1-based) is collected if it is a number. Blank lines, comments and any
//! other non-numeric tokens are skipped, so the output of tools like
//! `/usr/bin/time -p` can be used directly.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::significance::MIN_SAMPLE_SIZE;

/// Values below this are skipped to avoid dividing by (nearly) zero
pub const MIN_VALUE: f64 = 0.0001;

/// Read the numbers in `column` (1-based) of the file at `path`
pub fn read_column<P: AsRef<Path>>(path: P, column: usize) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).with_context(|| format!("could not read file: {}", path.display()))?;

    // Invalid UTF-8 becomes U+FFFD and is skipped like any other non-number
    let content = String::from_utf8_lossy(&bytes);
    parse_column(&content, column, &path.display().to_string())
}

/// Collect the numbers in `column` (1-based) of `content`
///
/// `source` names the input in log and error messages.
///
/// # Example
/// ```
/// use cmpds::dataset::parse_column;
///
/// let text = "# run  v1  v2\n1 10.5 9.8\n2 10.7 9.9\n\n3 10.6 9.7\n";
/// let v2 = parse_column(text, 3, "runs.txt").unwrap();
/// assert_eq!(v2, vec![9.8, 9.9, 9.7]);
/// ```
pub fn parse_column(content: &str, column: usize, source: &str) -> Result<Vec<f64>> {
    if column == 0 {
        bail!("column must be greater than 0");
    }

    let mut values = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let Some(token) = line.split_whitespace().nth(column - 1) else {
            continue;
        };

        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                if value < MIN_VALUE {
                    tracing::trace!(
                        "skipping line {} in {}: number is too small {}",
                        line_number,
                        source,
                        token
                    );
                    continue;
                }
                values.push(value);
            }
            _ => {
                tracing::trace!(
                    "skipping line {} in {}: not a number: {}",
                    line_number,
                    source,
                    token
                );
            }
        }
    }

    if values.len() < MIN_SAMPLE_SIZE {
        bail!(
            "too few data points at column {}, found {}, need at least {} in file: {}",
            column,
            values.len(),
            MIN_SAMPLE_SIZE,
            source
        );
    }

    Ok(values)
}
