//! CLI binary for img2tlf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and reports results.

use anyhow::{Context, Result};
use clap::Parser;
use img2tlf::{
    convert, convert_to_file, default_output_path, inspect, Axis, Channel, ExtractionConfig,
    ExtractionProgressCallback, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar per scan pass, reset when the pass
/// changes, plus a log line as each pass finishes.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Decoding image…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn pass_label(axis: Axis) -> &'static str {
        match axis {
            Axis::Horizontal => "rows",
            Axis::Vertical => "columns",
        }
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, width: u32, height: u32) {
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Scanning {width}x{height} image…"))
        ));
    }

    fn on_pass_start(&self, axis: Axis, lanes: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>5}/{len} {msg}  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_style(style);
        self.bar.set_length(lanes as u64);
        self.bar.set_position(0);
        self.bar.set_prefix("Scanning");
        self.bar.set_message(Self::pass_label(axis));
        self.bar.reset_eta();
    }

    fn on_lane_complete(&self, _axis: Axis, _lane: usize, _lanes: usize) {
        self.bar.inc(1);
    }

    fn on_pass_complete(&self, axis: Axis, segments: usize) {
        self.bar.println(format!(
            "  {} {:<8} {}",
            green("✓"),
            Self::pass_label(axis),
            dim(&format!("{segments:>5} segments")),
        ));
    }

    fn on_extraction_complete(&self, lines: usize) {
        self.bar.finish_and_clear();
        eprintln!("{} {} lines extracted", green("✔"), bold(&lines.to_string()));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a scanned form; writes form.png.tlf next to it
  img2tlf -i form.png

  # Write somewhere else, human-readable JSON
  img2tlf -i form.png -o layouts/form.tlf --pretty

  # Faint pencil lines: raise the darkness cut-off, use luma instead of red
  img2tlf -i sketch.jpg --threshold 250 --channel luma

  # Capture rules that run into the image border
  img2tlf -i cropped.png --flush-line-end

  # Show canvas, scale and thresholds without scanning
  img2tlf -i form.png --inspect-only

TUNING:
  --min-rate        Minimum line length as a percentage of the horizontal
                    scale factor. Raise it to ignore text strokes.
  --snap-tolerance  Canvas units within which perpendicular endpoints are
                    pulled into a shared corner.

ENVIRONMENT VARIABLES:
  RUST_LOG          Override the log filter (e.g. RUST_LOG=img2tlf=trace)
  IMG2TLF_*         Every flag can also be set as IMG2TLF_<FLAG>
"#;

/// Extract ruled lines from a form image into a TLF layout document.
#[derive(Parser, Debug)]
#[command(
    name = "img2tlf",
    version,
    about = "Extract ruled lines from a scanned form into a TLF layout document",
    long_about = "Scan a raster image for long straight horizontal and vertical rules, \
map them onto an A4 canvas, snap near-touching corners together and write the result \
as a TLF layout document.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input image (PNG or JPEG).
    #[arg(short, long, env = "IMG2TLF_INPUT")]
    input: PathBuf,

    /// Output path. Defaults to `<input>.tlf`.
    #[arg(short, long, env = "IMG2TLF_OUTPUT")]
    output: Option<PathBuf>,

    /// Intensities strictly below this are dark (1–255).
    #[arg(long, env = "IMG2TLF_THRESHOLD", default_value_t = 240,
          value_parser = clap::value_parser!(u8).range(1..=255))]
    threshold: u8,

    /// Minimum line length, percent of the horizontal scale factor.
    #[arg(long, env = "IMG2TLF_MIN_RATE", default_value_t = 30,
          value_parser = clap::value_parser!(u32).range(1..))]
    min_rate: u32,

    /// Corner snapping tolerance in canvas units.
    #[arg(long, env = "IMG2TLF_SNAP_TOLERANCE", default_value_t = 3,
          value_parser = clap::value_parser!(i32).range(0..))]
    snap_tolerance: i32,

    /// Page margin in canvas units.
    #[arg(long, env = "IMG2TLF_MARGIN", default_value_t = 20)]
    margin: u32,

    /// Channel sampled for intensity.
    #[arg(long, env = "IMG2TLF_CHANNEL", value_enum, default_value = "red")]
    channel: ChannelArg,

    /// Keep runs still active at the image border instead of dropping them.
    #[arg(long, env = "IMG2TLF_FLUSH_LINE_END")]
    flush_line_end: bool,

    /// Document title.
    #[arg(long, env = "IMG2TLF_TITLE", default_value = "")]
    title: String,

    /// Pretty-print the JSON.
    #[arg(long, env = "IMG2TLF_PRETTY")]
    pretty: bool,

    /// Print the document to stdout instead of writing a file.
    #[arg(long, env = "IMG2TLF_STDOUT")]
    stdout: bool,

    /// Print image metadata only, no scanning.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "IMG2TLF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMG2TLF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "IMG2TLF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ChannelArg {
    Red,
    Luma,
}

impl From<ChannelArg> for Channel {
    fn from(v: ChannelArg) -> Self {
        match v {
            ChannelArg::Red => Channel::Red,
            ChannelArg::Luma => Channel::Luma,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = build_config(&cli, None)?;
        let meta = inspect(&cli.input, &config).context("Failed to inspect image")?;

        if cli.pretty {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            println!("Size:         {}x{}", meta.width, meta.height);
            println!(
                "Canvas:       {} {}x{} (margin {})",
                meta.orientation.as_str(),
                meta.canvas.width,
                meta.canvas.height,
                meta.canvas.margin
            );
            println!("Scale:        x {}  y {}", meta.scale.x, meta.scale.y);
            println!("Min length:   {} px", meta.thresholds.min_line_length);
            println!("Gap:          {} px", meta.thresholds.gap_tolerance);
            println!("Threshold:    {}", meta.thresholds.dark_threshold);
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new();
        Some(cb as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    if cli.stdout {
        let output = convert(&cli.input, &config).context("Conversion failed")?;
        let json = output
            .document
            .to_json(config.pretty)
            .context("Failed to serialise document")?;

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();

        if !cli.quiet && !show_progress {
            eprintln!(
                "Extracted {} lines in {}ms",
                output.stats.total_lines(),
                output.stats.total_duration_ms
            );
        }
        return Ok(());
    }

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));
    let stats = convert_to_file(&cli.input, &output_path, &config).context("Conversion failed")?;

    if !cli.quiet {
        eprintln!(
            "{}  {} horizontal / {} vertical  {}ms  →  {}",
            green("✔"),
            stats.horizontal_segments,
            stats.vertical_segments,
            stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
        eprintln!(
            "   {} canvas, scale {}/{}, {} endpoints snapped",
            dim(stats.orientation.as_str()),
            stats.scale.x,
            stats.scale.y,
            dim(&stats.snapped_endpoints.to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .dark_threshold(cli.threshold)
        .channel(cli.channel.clone().into())
        .min_rate(cli.min_rate)
        .snap_tolerance(cli.snap_tolerance)
        .margin(cli.margin)
        .flush_at_line_end(cli.flush_line_end)
        .title(cli.title.clone())
        .pretty(cli.pretty);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
