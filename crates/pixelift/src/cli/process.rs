//! The `pixelift process` command for batch image preparation.

use clap::{Args, ValueEnum};
use pixelift_core::output::OutputFormat as CoreOutputFormat;
use pixelift_core::{Config, FileReport, ImagePipeline, OutputWriter, SrEngine};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Directory of images to process in place
    #[arg(required = true)]
    pub input: PathBuf,

    /// Minimum acceptable image height; also the downscale target
    #[arg(long)]
    pub min_height: Option<u32>,

    /// JPEG quality for every JPEG encode (1-100)
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// Directory containing the super-resolution model
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Skip the super-resolution model entirely (images below the minimum
    /// height are left as they are)
    #[arg(long)]
    pub no_upscale: bool,

    /// Report file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

/// Supported report formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs) -> anyhow::Result<()> {
    let pipeline = setup_pipeline(&args)?;

    // A bad directory is fatal: bail before touching anything.
    let files = pipeline.scan(&args.input)?;
    if files.is_empty() {
        tracing::warn!("No supported image files found in {:?}", args.input);
        return Ok(());
    }
    tracing::info!("Found {} image(s) to process", files.len());

    let total = files.len() as u64;
    let progress = create_progress_bar(total);

    let mut processed: u64 = 0;
    let mut skipped: u64 = 0;
    let mut step_failures: u64 = 0;
    let start_time = std::time::Instant::now();
    let mut reports: Vec<FileReport> = Vec::with_capacity(files.len());

    for path in &files {
        match pipeline.process(path).await {
            Ok(report) => {
                processed += 1;
                step_failures += report.failed_steps() as u64;
                reports.push(report);
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping {:?}: {}", path, e);
            }
        }

        // Update progress bar with rate
        progress.inc(1);
        let elapsed = start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            let done = processed + skipped;
            let rate = done as f64 / elapsed;
            progress.set_message(format!("{:.1} img/sec", rate));
        }
    }

    progress.finish_and_clear();

    write_reports(&args, &reports)?;

    let elapsed = start_time.elapsed();
    print_summary(processed, skipped, step_failures, elapsed);

    // Per-file failures never fail the batch; the run completed.
    Ok(())
}

// ── Setup ──────────────────────────────────────────────────────────────────

/// Apply CLI overrides to the config and assemble the pipeline.
fn setup_pipeline(args: &ProcessArgs) -> anyhow::Result<ImagePipeline> {
    let mut config = Config::load()?;

    if let Some(min_height) = args.min_height {
        anyhow::ensure!(min_height > 0, "--min-height must be > 0");
        config.processing.min_height = min_height;
    }
    if let Some(quality) = args.quality {
        anyhow::ensure!(
            (1..=100).contains(&quality),
            "--quality must be between 1 and 100"
        );
        config.processing.jpeg_quality = quality;
    }
    if let Some(ref model_dir) = args.model_dir {
        config.general.model_dir = model_dir.clone();
    }

    let mut pipeline = ImagePipeline::new(&config);

    // Model load failure is fatal unless upscaling was explicitly disabled.
    if args.no_upscale {
        tracing::info!("Upscaling disabled (--no-upscale)");
    } else {
        if !SrEngine::model_exists(&config.sr, &config.model_dir()) {
            anyhow::bail!(
                "Super-resolution model not found at {:?}.\n\n  \
                 Hint: place the model there (see `pixelift models status`) \
                 or run with --no-upscale.",
                SrEngine::model_path(&config.sr, &config.model_dir())
            );
        }
        pipeline.load_sr(&config)?;
    }

    Ok(pipeline)
}

// ── Report output ──────────────────────────────────────────────────────────

/// Write the batch report to the target from `--output`, or stdout.
fn write_reports(args: &ProcessArgs, reports: &[FileReport]) -> anyhow::Result<()> {
    let format = match args.format {
        OutputFormat::Json => CoreOutputFormat::Json,
        OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
    };

    if let Some(ref output_path) = args.output {
        let file = File::create(output_path)?;
        let mut writer = OutputWriter::new(BufWriter::new(file), format, false);
        writer.write_all(reports)?;
        writer.flush()?;
        tracing::info!("Report written to {:?}", output_path);
    } else {
        let stdout = std::io::stdout().lock();
        let mut writer = OutputWriter::new(stdout, format, true);
        writer.write_all(reports)?;
        writer.flush()?;
    }

    Ok(())
}

// ── Progress and summary ───────────────────────────────────────────────────

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after batch processing.
fn print_summary(processed: u64, skipped: u64, step_failures: u64, elapsed: std::time::Duration) {
    let total = processed + skipped;
    let rate = if elapsed.as_secs_f64() > 0.0 {
        total as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Processed:    {:>8}", processed);
    if skipped > 0 {
        eprintln!("    Skipped:      {:>8}", skipped);
    }
    if step_failures > 0 {
        eprintln!("    Step errors:  {:>8}", step_failures);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
}
