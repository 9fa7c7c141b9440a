//! `strmatrix` CLI binary (`spec.md` §6 "CLI surface").
//!
//! Wires the engine crates together: an input adapter reads a batch, an
//! optional tokenization pass converts it to tokens, the measure
//! registry selects a compare function, the compute engine fills the
//! matrix in parallel, and an output adapter drains it. `tracing` and
//! `indicatif` supply the ambient logging/progress stack the core
//! deliberately stays free of.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use strmatrix_core::{
    compute, delim, tokenizer, ComputeOptions, HarryError, Matrix, MeasureConfig, MeasureRegistry,
    ProgressSink,
};
use strmatrix_io::{open_output, DirInput, InputAdapter, LineInput};

#[derive(Parser)]
#[command(name = "strmatrix", about = "Parallel pairwise string-similarity matrix engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute a similarity/distance matrix over a batch of strings.
    Compute(ComputeArgs),
}

#[derive(Args)]
struct ComputeArgs {
    /// Name of the measure to apply (falls back to `strmatrix_core::DEFAULT_MEASURE`
    /// on an unknown name).
    #[arg(long, default_value = "levenshtein")]
    measure: String,

    /// Delimiter spec; when set, the batch is tokenized before compute.
    #[arg(long, default_value = "")]
    delim: String,

    /// Row range, `"a:b"`.
    #[arg(long, default_value = "")]
    xrange: String,

    /// Column range, `"a:b"`.
    #[arg(long, default_value = "")]
    yrange: String,

    /// Block split, `"blocks:index"`.
    #[arg(long)]
    split: Option<String>,

    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// How to read `--input`: one string per line of a single file, or
    /// one string per file in a directory.
    #[arg(long, value_enum, default_value = "line")]
    input_format: InputFormat,

    #[arg(long)]
    input: PathBuf,

    #[arg(long)]
    output: PathBuf,

    /// Explicit rayon thread count; defaults to `RAYON_NUM_THREADS` / the
    /// implicit global pool when unset.
    #[arg(long)]
    threads: Option<usize>,

    /// Emit throttled progress updates.
    #[arg(long)]
    verbose: bool,

    /// Emit a periodic log line even without `--verbose`.
    #[arg(long)]
    log: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Format {
    Text,
    Libsvm,
}

impl Format {
    fn as_str(self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Libsvm => "libsvm",
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum InputFormat {
    Line,
    Dir,
}

impl InputFormat {
    fn adapter(self) -> Box<dyn InputAdapter> {
        match self {
            InputFormat::Line => Box::new(LineInput),
            InputFormat::Dir => Box::new(DirInput),
        }
    }
}

struct IndicatifSink {
    bar: ProgressBar,
}

impl ProgressSink for IndicatifSink {
    fn on_progress(&self, done: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(done as u64);
    }

    fn on_log(&self, done: usize, total: usize) {
        tracing::info!(done, total, "compute progress");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let Command::Compute(args) = cli.command;

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to build rayon thread pool")?;
    }

    match run(&args) {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<HarryError>() {
            Some(HarryError::Fatal(msg)) => {
                tracing::error!("{msg}");
                std::process::exit(1);
            }
            Some(HarryError::Resource(msg)) => {
                tracing::error!("{msg}");
                std::process::exit(1);
            }
            _ => Err(e),
        },
    }
}

fn run(args: &ComputeArgs) -> Result<()> {
    let mut batch = args
        .input_format
        .adapter()
        .read(&args.input)
        .map_err(anyhow::Error::from)
        .context("reading input batch")?;

    if batch.is_empty() {
        return Err(HarryError::Fatal("input batch is empty".into()).into());
    }

    if !args.delim.is_empty() {
        delim::set_global(&args.delim);
        let table = delim::global_snapshot();
        for s in &mut batch {
            if let Err(e) = tokenizer::tokenize(s, &table) {
                tracing::warn!(idx = s.idx, error = %e, "skipping tokenization for string");
            }
        }
    }

    let mut registry = MeasureRegistry::new();
    strmatrix_measures::register_all(&mut registry);
    registry.configure(&args.measure, &MeasureConfig::new());
    tracing::info!(measure = registry.active_name(), "configured measure");

    let mut matrix = Matrix::init(&batch);
    if let Err(e) = matrix.set_x_range(&args.xrange) {
        tracing::warn!(error = %e, "invalid --xrange, reverting to full range");
    }
    if let Err(e) = matrix.set_y_range(&args.yrange) {
        tracing::warn!(error = %e, "invalid --yrange, reverting to full range");
    }
    if let Some(split) = &args.split {
        matrix.split(split).map_err(anyhow::Error::from).context("invalid --split")?;
    }
    matrix.allocate();

    let bar = if args.verbose {
        let bar = ProgressBar::new(matrix.size as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };
    let sink = IndicatifSink { bar };
    let cancel = AtomicBool::new(false);

    let options = ComputeOptions {
        verbose: args.verbose,
        log_enabled: args.log,
        sink: &sink,
        cancel: &cancel,
    };

    let outcome = compute(&mut matrix, &batch, &registry, &options);
    sink.bar.finish_and_clear();

    if outcome != strmatrix_core::ComputeOutcome::Completed {
        anyhow::bail!("compute cancelled");
    }

    let mut output = open_output(args.format.as_str());
    output
        .open(&args.output)
        .map_err(anyhow::Error::from)
        .context("opening output destination")?;
    let count = output
        .write(&matrix)
        .map_err(anyhow::Error::from)
        .context("writing matrix")?;
    output.close().map_err(anyhow::Error::from).context("closing output")?;

    tracing::info!(count, "wrote matrix");
    Ok(())
}
