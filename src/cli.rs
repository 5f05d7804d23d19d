//! CLI argument parsing for cmpds

use anyhow::{bail, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::significance::{TuningConfig, MAX_INTERVALS, MIN_SND_THRESHOLD};

/// Output format for the test result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable sentence (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

/// Accept only confidence levels strictly between 0 and 1
fn parse_confidence(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!("{} out of range (0..1)", value))
    }
}

#[derive(Parser, Debug)]
#[command(name = "cmpds")]
#[command(version)]
#[command(
    about = "Determine whether two datasets differ significantly at a given confidence level",
    long_about = "Compare two datasets to determine whether there is a significant \
difference between them for a specific confidence level, using the t-test \
methodology for unpaired observations. The standard normal distribution (SND) \
replaces the t-distribution once the effective degrees of freedom exceed the \
SND threshold. Critical values are computed numerically; no table lookups are \
needed.\n\nEach dataset is a column of positive numbers (for example run times \
from /usr/bin/time -p). Non-numeric tokens are ignored, so comments and blank \
lines are allowed. Each dataset needs at least 3 values."
)]
pub struct Cli {
    /// The confidence level such that 0 < c < 1
    #[arg(
        short = 'c',
        long = "conf",
        value_name = "FLOAT",
        default_value = "0.95",
        value_parser = parse_confidence
    )]
    pub conf: f64,

    /// Factors used for internal computations (you should never need to change these)
    #[arg(
        long = "internal",
        num_args = 4,
        value_names = ["TOLERANCE", "LOWER", "UPPER", "INTERVALS"],
        allow_negative_numbers = true
    )]
    pub internal: Option<Vec<f64>>,

    /// TOML file with internal factors (tolerance, lower_bound, upper_bound, intervals)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The columns that define each dataset (first for dataset-1, second for dataset-2)
    #[arg(
        short = 'k',
        long = "cols",
        num_args = 2,
        value_names = ["COL1", "COL2"],
        default_values_t = [1usize, 1]
    )]
    pub cols: Vec<usize>,

    /// Use the SND instead of a t-distribution once the effective DOF exceed this
    #[arg(short = 's', long = "snd-threshold", value_name = "UINT", default_value = "30")]
    pub snd_threshold: u32,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Increase verbosity (-v: computation values, -v -v: z search and skipped input)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Files with the data; a single file supplies both datasets
    #[arg(value_name = "FILES", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Check constraints clap cannot express
    pub fn validate(&self) -> Result<()> {
        if self.files.len() > 2 {
            bail!("only 1 or 2 files may be specified");
        }

        for (i, col) in self.cols.iter().enumerate() {
            if *col < 1 {
                bail!("column {} must be greater than 0", i + 1);
            }
        }

        if self.snd_threshold < MIN_SND_THRESHOLD {
            bail!(
                "it does not make sense to use SND for {} elements",
                self.snd_threshold
            );
        }

        Ok(())
    }

    /// Files for dataset-1 and dataset-2
    pub fn dataset_files(&self) -> (&PathBuf, &PathBuf) {
        let first = &self.files[0];
        let second = self.files.get(1).unwrap_or(first);
        (first, second)
    }

    /// Columns for dataset-1 and dataset-2
    pub fn dataset_columns(&self) -> (usize, usize) {
        (self.cols[0], self.cols[1])
    }

    /// Tuning: defaults, then `--config`, then `--internal`
    pub fn tuning(&self) -> Result<TuningConfig> {
        let mut tuning = match &self.config {
            Some(path) => TuningConfig::from_file(path)?,
            None => TuningConfig::default(),
        };

        if let Some(internal) = &self.internal {
            let intervals = internal[3];
            if !(intervals.fract() == 0.0 && (2.0..=MAX_INTERVALS as f64).contains(&intervals)) {
                bail!(
                    "INTERVALS must be an integer between 2 and {}, got {}",
                    MAX_INTERVALS,
                    intervals
                );
            }
            tuning.tolerance = internal[0];
            tuning.lower_bound = internal[1];
            tuning.upper_bound = internal[2];
            tuning.intervals = intervals as usize;
        }

        tuning.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(tuning)
    }
}
