use anyhow::{Context, Result};
use clap::Parser;
use fixation_tracker::{
    cli::{Cli, OutputFormat},
    config::SessionConfig,
    csv_input,
    csv_output::{CsvIntervalOutput, CsvOutput},
    intervals::FixationInterval,
    json_output::JsonOutput,
    session::{FixationSession, SessionReport},
    tracker::LabeledSample,
};
use std::fs;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn read_input(args: &Cli) -> Result<String> {
    if args.reads_stdin() {
        io::read_to_string(io::stdin()).context("Failed to read gaze stream from stdin")
    } else {
        fs::read_to_string(&args.input)
            .with_context(|| format!("Failed to read gaze stream: {}", args.input.display()))
    }
}

fn load_config(args: &Cli) -> Result<SessionConfig> {
    let base = match &args.config {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::default(),
    };
    let config = args.apply_overrides(base);
    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

fn format_sample_text(sample: &LabeledSample) -> String {
    format!(
        "{:>12.3}  ({}, {})  {}",
        sample.timestamp,
        sample.point.x,
        sample.point.y,
        if sample.is_fixation { "fixation" } else { "saccade" }
    )
}

fn format_interval_text(interval: &FixationInterval) -> String {
    let mut line = format!(
        "fixation {:.3}s - {:.3}s  ({} ms, {} samples) at ({}, {})",
        interval.start_time,
        interval.end_time,
        (interval.duration() * 1000.0).round() as i64,
        interval.sample_count,
        interval.centroid.x,
        interval.centroid.y
    );
    if let Some(roi) = interval.roi {
        line.push_str(&format!("  roi {}", roi));
    }
    line
}

fn render(args: &Cli, config: SessionConfig, report: &SessionReport) -> Result<String> {
    let rendered = match (args.format, args.intervals) {
        (OutputFormat::Json, intervals_only) => {
            JsonOutput::from_report(config, report, !intervals_only).to_json()?
        }
        (OutputFormat::Csv, false) => report.samples.iter().copied().collect::<CsvOutput>().to_csv(),
        (OutputFormat::Csv, true) => report
            .intervals
            .iter()
            .copied()
            .collect::<CsvIntervalOutput>()
            .to_csv(),
        (OutputFormat::Text, false) => report
            .samples
            .iter()
            .map(|s| format_sample_text(s) + "\n")
            .collect(),
        (OutputFormat::Text, true) => report
            .intervals
            .iter()
            .map(|i| format_interval_text(i) + "\n")
            .collect(),
    };
    Ok(rendered)
}

fn write_output(args: &Cli, rendered: &str) -> Result<()> {
    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write output: {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    let input = read_input(&args)?;
    let rows = csv_input::parse_sample_rows(&input).context("Invalid gaze stream")?;
    if rows.is_empty() {
        tracing::warn!("gaze stream contains no frames");
    }

    let mut session = FixationSession::new(config.clone())?;
    for (line, sample) in &rows {
        session.feed_sample(*sample).with_context(|| {
            format!(
                "Rejected frame at line {} (timestamp {})",
                line, sample.timestamp
            )
        })?;
    }
    let report = session.finish();

    write_output(&args, &render(&args, config, &report)?)?;

    if args.summary {
        report.stats.print_summary();
    }

    Ok(())
}
