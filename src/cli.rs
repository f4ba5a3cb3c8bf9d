//! CLI argument parsing for fixation-tracker

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{GapPolicy, SessionConfig, SmoothingConfig};
use crate::point::Metric;

/// Output format for labelled gaze streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format (timestamp,x,y,fixation)
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "fixation-tracker")]
#[command(version)]
#[command(about = "Label recorded gaze streams with dwell-time fixations", long_about = None)]
pub struct Cli {
    /// Recorded gaze stream (timestamp,x,y CSV); `-` reads stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Session configuration file (TOML)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Movement tolerance between consecutive points in pixels (default: 30)
    #[arg(long = "threshold", value_name = "PX")]
    pub threshold: Option<f64>,

    /// Minimum dwell before a fixation is reported in seconds (default: 0.5)
    #[arg(long = "duration", value_name = "SECS")]
    pub duration: Option<f64>,

    /// Distance metric between consecutive points
    #[arg(long = "metric", value_enum)]
    pub metric: Option<Metric>,

    /// Restart dwell timing after a detection gap longer than SECS
    #[arg(long = "max-gap", value_name = "SECS")]
    pub max_gap: Option<f64>,

    /// Exponential smoothing factor applied to raw points, in (0, 1]
    #[arg(long = "smooth", value_name = "ALPHA")]
    pub smooth: Option<f64>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Emit fixation intervals instead of labelled samples
    #[arg(long = "intervals")]
    pub intervals: bool,

    /// Print a statistics summary to stderr
    #[arg(short = 'c', long = "summary")]
    pub summary: bool,

    /// Write output to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Apply explicit flags on top of a base configuration
    pub fn apply_overrides(&self, mut config: SessionConfig) -> SessionConfig {
        if let Some(threshold) = self.threshold {
            config.tracker.distance_threshold_px = threshold;
        }
        if let Some(duration) = self.duration {
            config.tracker.fixation_duration_s = duration;
        }
        if let Some(metric) = self.metric {
            config.tracker.metric = metric;
        }
        if let Some(max_gap_s) = self.max_gap {
            config.tracker.gap_policy = GapPolicy::ResetAfter { max_gap_s };
        }
        if let Some(alpha) = self.smooth {
            config.smoothing = Some(SmoothingConfig { alpha });
        }
        config
    }

    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}
