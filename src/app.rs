use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, error::ErrorKind};
use tracing::info;

use crate::config::{CoresetConfig, ExportOptions};
use crate::constants::transport::DEFAULT_EXPORT_FILENAME;
use crate::coreset::CoresetBuilder;
use crate::data::{Coreset, RecordStore};
use crate::errors::CoresetError;
use crate::metrics::{CoresetSummary, LabelBalance, dataset_label_balance, label_balance};
use crate::source::{FileSource, FileSourceConfig, RecordSource};
use crate::transport::export_coreset;
use crate::utils::format_count;

#[derive(Debug, Parser)]
#[command(
    name = "lightweight-coreset",
    version,
    disable_help_subcommand = true,
    about = "Build a lightweight coreset from a tabular dataset",
    long_about = "Select M records from a whitespace-delimited dataset (group_id example_id label features...) with probabilities biased toward points far from the mean, and export them as tab-delimited rows in selection order.",
    after_help = "Set RUST_LOG (for example RUST_LOG=debug) to adjust progress logging."
)]
/// CLI for `lightweight-coreset`.
///
/// Common usage:
/// - Default export path: `lightweight-coreset bio_train.dat 1000` writes `export.dat`
/// - Reproducible selection: `--seed 7`
/// - Keep sampling weights for downstream training: `--with-weights`
struct CoresetCli {
    #[arg(value_name = "DATASET", help = "Whitespace-delimited dataset file")]
    dataset: PathBuf,
    #[arg(
        value_name = "M",
        value_parser = parse_positive_usize,
        help = "Number of records to select; values at or above the dataset size export everything"
    )]
    target_size: usize,
    #[arg(
        long,
        short = 'o',
        value_name = "PATH",
        default_value = DEFAULT_EXPORT_FILENAME,
        help = "Export file path"
    )]
    output: PathBuf,
    #[arg(
        long,
        help = "Deterministic seed; a random seed is drawn and logged when omitted"
    )]
    seed: Option<u64>,
    #[arg(
        long = "with-weights",
        help = "Append each row's sampling weight as a trailing column"
    )]
    with_weights: bool,
    #[arg(
        long = "features",
        value_name = "COUNT",
        help = "Require exactly COUNT feature columns per row"
    )]
    expected_features: Option<usize>,
    #[arg(
        long = "summary",
        value_name = "PATH",
        help = "Optional path for a JSON run summary"
    )]
    summary: Option<PathBuf>,
}

/// Load, build, and export in one call.
///
/// Nothing is written when loading or construction fails.
pub fn run_pipeline(
    source: &dyn RecordSource,
    config: CoresetConfig,
    output: &Path,
    options: ExportOptions,
) -> Result<CoresetSummary, CoresetError> {
    let started = Instant::now();
    let store = source.load()?;
    let coreset = CoresetBuilder::new(config).build(&store)?;
    export_coreset(&store, &coreset, output, options)?;
    Ok(summarize(
        source.id(),
        &store,
        &config,
        &coreset,
        started.elapsed(),
    ))
}

/// Entry point for the `lightweight-coreset` binary.
pub fn run_coreset<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let started = Instant::now();
    init_tracing();

    let Some(cli) = parse_cli::<CoresetCli, _>(
        std::iter::once("lightweight-coreset".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    if same_file(&cli.output, &cli.dataset) {
        return Err(CoresetError::Configuration(format!(
            "export path {} would overwrite the dataset",
            cli.output.display()
        ))
        .into());
    }

    let seed = match cli.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!(
                "[coreset] no --seed given; drew seed {} (pass --seed {} to reproduce)",
                seed, seed
            );
            seed
        }
    };

    let mut source_config = FileSourceConfig::new(&cli.dataset);
    if let Some(count) = cli.expected_features {
        source_config = source_config.with_expected_features(count);
    }
    let source = FileSource::new(source_config);
    let config = CoresetConfig::new(cli.target_size).with_seed(seed);
    let options = ExportOptions::default().with_weights(cli.with_weights);

    let summary = run_pipeline(&source, config, &cli.output, options)?;
    log_label_balance("dataset", &summary.dataset_labels);
    log_label_balance("coreset", &summary.coreset_labels);

    if let Some(path) = &cli.summary {
        write_summary(&summary, path)?;
        info!("[coreset] summary written to {}", path.display());
    }

    info!(
        "[coreset] elapsed program time: {:.3}s",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

/// True when both paths name the same file, after resolving `.`, `..`, and
/// symlinks for paths that exist.
fn same_file(left: &Path, right: &Path) -> bool {
    if left == right {
        return true;
    }
    match (std::fs::canonicalize(left), std::fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

/// Serialize a run summary as pretty JSON.
pub fn write_summary(summary: &CoresetSummary, path: &Path) -> Result<(), CoresetError> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn summarize(
    source_id: &str,
    store: &RecordStore,
    config: &CoresetConfig,
    coreset: &Coreset,
    elapsed: Duration,
) -> CoresetSummary {
    CoresetSummary {
        source: source_id.to_string(),
        records: store.len(),
        features: store.feature_count(),
        target_size: config.target_size,
        selected: coreset.len(),
        seed: config.seed,
        dataset_labels: dataset_label_balance(store),
        coreset_labels: label_balance(store, coreset.indices.iter().copied()),
        elapsed_ms: elapsed.as_millis(),
    }
}

fn log_label_balance(scope: &str, balance: &LabelBalance) {
    for entry in &balance.per_label {
        info!(
            "[coreset] {} label {}: {} of {} ({:.2}%)",
            scope,
            entry.label,
            format_count(entry.count),
            format_count(balance.total),
            entry.share * 100.0
        );
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw.parse::<usize>().map_err(|_| {
        format!(
            "Could not parse coreset size '{}' as a positive integer",
            raw
        )
    })?;
    if parsed == 0 {
        return Err("coreset size must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
