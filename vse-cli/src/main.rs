//! VSE004 decoder CLI application.
//!
//! Decodes ifm VSE capture files (.idat) to JSON or CSV.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use vse_core::output::{self, JsonWriter};
use vse_core::{DecoderOptions, OutputFormat, ParseResult, VseDecoder, DEFAULT_TOLERANCE};

/// VSE004 capture decoder for ifm VSE vibration diagnostics units.
///
/// Decodes .idat capture files to JSON, or to CSV views of the raw samples
/// and the data-source descriptors.
#[derive(Parser, Debug)]
#[command(name = "vse")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input VSE004 .idat file path
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (.json, .csv)
    ///
    /// Without an output path, JSON is written to stdout.
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output format.
    ///
    /// - json: the full decoded structure
    /// - csv: raw stream samples as index,value rows
    /// - sources: one CSV row per data source
    ///
    /// Defaults to the output file extension, or json.
    #[arg(short, long)]
    format: Option<String>,

    /// Write single-line JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Magnitude at or below which leading/trailing values count as padding
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Keep the zero padding of parameter and sample arrays
    #[arg(long)]
    no_trim: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Log decoder diagnostics
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "vse_core=debug" } else { "vse_core=warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(default.parse()?))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let format = match (&args.format, &args.output) {
        (Some(name), _) => OutputFormat::from_str(name)
            .context("Invalid output format. Use json, csv or sources")?,
        (None, Some(path)) => OutputFormat::from_extension(path).unwrap_or_default(),
        (None, None) => OutputFormat::Json,
    };

    // Progress goes to stderr and is hidden when JSON is streamed to stdout
    let progress = if args.quiet || args.output.is_none() {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Invalid progress template")?,
        );
        pb
    };

    let start_time = Instant::now();

    progress.set_message(format!(
        "Decoding {:?}...",
        args.input.file_name().unwrap_or_default()
    ));

    let decoder = VseDecoder::with_options(DecoderOptions {
        trim_tolerance: args.tolerance,
        trim: !args.no_trim,
    });
    let result = decoder
        .decode_file(&args.input)
        .context("Failed to decode VSE004 file")?;

    match &args.output {
        Some(path) => {
            progress.set_message(format!(
                "Writing to {:?}...",
                path.file_name().unwrap_or_default()
            ));
            match format {
                OutputFormat::Json => output::write_json(path, &result, !args.compact)
                    .context("Failed to write JSON output")?,
                OutputFormat::Samples => output::write_samples_csv(path, &result)
                    .context("Failed to write samples CSV")?,
                OutputFormat::Sources => output::write_sources_csv(path, &result)
                    .context("Failed to write data sources CSV")?,
            }
        }
        None => {
            anyhow::ensure!(
                format == OutputFormat::Json,
                "CSV output needs an OUTPUT path"
            );
            let mut writer = JsonWriter::new(io::stdout().lock(), !args.compact);
            writer.write(&result).context("Failed to write JSON output")?;
            writer.flush()?;
        }
    }

    let total_duration = start_time.elapsed();

    progress.finish_with_message(format!(
        "Done! Decoded {} data sources in {:.3}s",
        result.data_sources.len(),
        total_duration.as_secs_f64()
    ));

    if !args.quiet {
        print_summary(&args, &result, total_duration.as_secs_f64());
    }

    Ok(())
}

fn print_summary(args: &Args, result: &ParseResult, seconds: f64) {
    let ves = &result.header.ves;
    let df = &result.header.df;
    eprintln!();
    eprintln!("Summary:");
    eprintln!("  Input:        {:?}", args.input);
    if let Some(output) = &args.output {
        eprintln!("  Output:       {:?}", output);
    }
    eprintln!("  Capture:      {} ({})", ves.name, ves.uuid);
    eprintln!(
        "  Time range:   {} - {} (tz {})",
        df.time_range_start, df.time_range_end, df.timezone
    );
    eprintln!(
        "  Sources:      {} of {} declared",
        result.stats.decoded, result.stats.declared
    );
    match &result.raw_data_stream {
        Some(stream) => eprintln!(
            "  Samples:      {} (source {}, divider {})",
            stream.values.len(),
            stream.data_source_handle,
            stream.sample_rate_divider
        ),
        None => eprintln!("  Samples:      none"),
    }
    for notice in &result.notices {
        eprintln!("  Truncated:    {}", notice);
    }
    eprintln!("  Duration:     {:.3}s", seconds);
}
