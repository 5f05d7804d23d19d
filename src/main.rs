use anyhow::Result;
use clap::Parser;
use cmpds::{
    cli::Cli,
    dataset, report,
    significance::{evaluate, ConfidenceLevel, Dataset, Sample, SndThreshold},
};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; -v enables debug, -v -v enables trace
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    args.validate()?;

    init_tracing(args.verbose);

    let tuning = args.tuning()?;
    let confidence = ConfidenceLevel::new(args.conf)?;
    let snd_threshold = SndThreshold::new(args.snd_threshold)?;

    let (file_a, file_b) = args.dataset_files();
    let (col_a, col_b) = args.dataset_columns();
    tracing::debug!("dataset-1: {} column {}", file_a.display(), col_a);
    tracing::debug!("dataset-2: {} column {}", file_b.display(), col_b);

    let sample_a = Sample::new(Dataset::First, dataset::read_column(file_a, col_a)?)?;
    let sample_b = Sample::new(Dataset::Second, dataset::read_column(file_b, col_b)?)?;

    let result = evaluate(&sample_a, &sample_b, confidence, &tuning, snd_threshold)?;
    println!("{}", report::render(&result, args.format)?);

    Ok(())
}
