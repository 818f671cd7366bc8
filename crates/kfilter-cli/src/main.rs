//! kfilter - apply a 3x3 convolution kernel to an image using parallel workers

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kfilter_core::ImageBuffer;
use kfilter_ops::{ExecutionStrategy, FilterConfig, KernelCatalog};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

mod logging;

#[derive(Parser, Debug)]
#[command(name = "kfilter")]
#[command(author, version, about = "Apply a 3x3 convolution kernel to an image")]
#[command(long_about = "
Applies a 3x3 convolution kernel to a PNG or JPEG image with clamp-to-edge
borders and writes the result as PNG. Rows are split evenly across workers.

Kernels:
  edge, sharpen, blur, gaussian-blur (alias: gauss), emboss, identity
  Unknown names fall back to identity.

Examples:
  kfilter photo.jpg blur                # all cores, writes output.png
  kfilter photo.jpg sharpen 4           # 4 workers
  kfilter photo.png edge 8 -s threads   # one OS thread per row range
  kfilter photo.png emboss -o out.png -vv
")]
struct Cli {
    /// Input image (PNG or JPEG)
    filename: PathBuf,

    /// Kernel name
    kernel: String,

    /// Number of workers (omitted, 0 or negative = all cores)
    #[arg(allow_negative_numbers = true)]
    worker_count: Option<i64>,

    /// Output PNG path
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Scheduling strategy
    #[arg(short, long, value_enum, default_value_t = Strategy::Pool)]
    strategy: Strategy,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// Command line spelling of [`ExecutionStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Rayon thread pool, one task per row range
    Pool,
    /// One OS thread per row range
    Threads,
}

impl From<Strategy> for ExecutionStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Pool => ExecutionStrategy::Pool,
            Strategy::Threads => ExecutionStrategy::Threads,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let catalog = KernelCatalog::new();
    let config = FilterConfig::new(&catalog, &cli.kernel, cli.worker_count, cli.strategy.into());

    let source = load_image(&cli.filename)?;
    info!(
        "Filtering {} ({}x{}, {} channels) with {}",
        cli.filename.display(),
        source.width(),
        source.height(),
        source.channels(),
        config.kernel
    );

    let mut output = source
        .zeroed_like()
        .context("Failed to allocate output image")?;
    let kernel = config.kernel.kernel();
    let executor = config.executor();

    let started = Instant::now();
    executor
        .run(&source, &mut output, &kernel)
        .context("Convolution failed")?;
    let elapsed = started.elapsed();
    drop(source);

    save_image(&cli.output, &output)?;
    info!("Wrote {}", cli.output.display());

    println!(
        "Threads: {}, Strategy: {}, Took {:.3} seconds",
        config.workers,
        config.strategy,
        elapsed.as_secs_f64()
    );
    Ok(())
}

fn load_image(path: &Path) -> Result<ImageBuffer> {
    kfilter_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

fn save_image(path: &Path, image: &ImageBuffer) -> Result<()> {
    kfilter_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_minimal_invocation() {
        let cli = Cli::try_parse_from(["kfilter", "in.png", "blur"]).unwrap();
        assert_eq!(cli.filename, PathBuf::from("in.png"));
        assert_eq!(cli.kernel, "blur");
        assert_eq!(cli.worker_count, None);
        assert_eq!(cli.output, PathBuf::from("output.png"));
        assert_eq!(cli.strategy, Strategy::Pool);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.log_json);
    }

    #[test]
    fn test_full_invocation() {
        let cli = Cli::try_parse_from([
            "kfilter", "in.jpg", "edge", "3", "-o", "out.png", "-s", "threads", "-vv", "--log-json",
        ])
        .unwrap();
        assert_eq!(cli.worker_count, Some(3));
        assert_eq!(cli.output, PathBuf::from("out.png"));
        assert_eq!(cli.strategy, Strategy::Threads);
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
    }

    #[test]
    fn test_negative_worker_count_parses() {
        let cli = Cli::try_parse_from(["kfilter", "in.png", "blur", "-2"]).unwrap();
        assert_eq!(cli.worker_count, Some(-2));
    }

    #[test]
    fn test_wrong_argument_count_is_usage_error() {
        assert!(Cli::try_parse_from(["kfilter"]).is_err());
        assert!(Cli::try_parse_from(["kfilter", "in.png"]).is_err());
        let err = Cli::try_parse_from(["kfilter", "in.png", "blur", "2", "extra"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_strategy_maps_to_executor() {
        assert_eq!(ExecutionStrategy::from(Strategy::Pool), ExecutionStrategy::Pool);
        assert_eq!(ExecutionStrategy::from(Strategy::Threads), ExecutionStrategy::Threads);
    }
}
