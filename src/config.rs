//! Tracker and session configuration
//!
//! Configuration is always passed explicitly. The library never consults
//! environment variables; only the binary maps flags and files onto these
//! types.
//!
//! # Example fixation.toml
//!
//! ```toml
//! [tracker]
//! distance_threshold_px = 30.0
//! fixation_duration_s = 0.5
//! metric = "euclidean"
//! gap_policy = { mode = "reset_after", max_gap_s = 0.25 }
//!
//! [smoothing]
//! alpha = 0.18
//!
//! [[roi]]
//! id = 1
//! rect = { left = 120, top = 80, width = 90, height = 90 }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::point::Metric;
use crate::roi::{self, Roi};

/// How a gap in detection (frames with no point) affects dwell timing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GapPolicy {
    /// Absent points never touch dwell state. Two close points separated by
    /// a long dropout still count as one continuous fixation.
    #[default]
    Ignore,
    /// A present point arriving more than `max_gap_s` after the previous
    /// present point starts a fresh run, as if it were the first sample.
    ResetAfter { max_gap_s: f64 },
}

/// Fixation classification parameters, immutable for a tracker's lifetime
///
/// # Example
/// ```
/// use fixation_tracker::config::TrackerConfig;
///
/// let config = TrackerConfig::default();
/// assert_eq!(config.distance_threshold_px, 30.0);
/// assert_eq!(config.fixation_duration_s, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Movement tolerance between consecutive points, in pixels
    ///
    /// A distance strictly below this value is stable; equal or above is
    /// movement.
    pub distance_threshold_px: f64,

    /// Minimum dwell before samples are labelled as fixation, in seconds
    pub fixation_duration_s: f64,

    /// Distance function applied to consecutive points
    pub metric: Metric,

    /// Treatment of detection gaps
    pub gap_policy: GapPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            distance_threshold_px: 30.0,
            fixation_duration_s: 0.5,
            metric: Metric::Euclidean,
            gap_policy: GapPolicy::Ignore,
        }
    }
}

impl TrackerConfig {
    pub fn new(distance_threshold_px: f64, fixation_duration_s: f64) -> Self {
        Self {
            distance_threshold_px,
            fixation_duration_s,
            ..Self::default()
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.distance_threshold_px.is_finite() || self.distance_threshold_px <= 0.0 {
            return Err(format!(
                "distance_threshold_px must be a finite value > 0, got {}",
                self.distance_threshold_px
            ));
        }

        if !self.fixation_duration_s.is_finite() || self.fixation_duration_s <= 0.0 {
            return Err(format!(
                "fixation_duration_s must be a finite value > 0, got {}",
                self.fixation_duration_s
            ));
        }

        if let GapPolicy::ResetAfter { max_gap_s } = self.gap_policy {
            if !max_gap_s.is_finite() || max_gap_s <= 0.0 {
                return Err(format!(
                    "gap_policy.max_gap_s must be a finite value > 0, got {}",
                    max_gap_s
                ));
            }
        }

        Ok(())
    }
}

/// Exponential smoothing applied to raw points before classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothingConfig {
    /// Weight of the newest point, in (0, 1]
    pub alpha: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { alpha: 0.18 }
    }
}

impl SmoothingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(format!(
                "smoothing alpha must be in (0, 1], got {}",
                self.alpha
            ));
        }
        Ok(())
    }
}

/// Everything a [`crate::session::FixationSession`] needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub tracker: TrackerConfig,
    /// Smoothing is disabled when absent
    pub smoothing: Option<SmoothingConfig>,
    /// Target regions for fixation attribution, `[[roi]]` tables in TOML
    #[serde(rename = "roi")]
    pub rois: Vec<Roi>,
}

impl SessionConfig {
    /// Load a session configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate a session configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.tracker.validate()?;
        if let Some(smoothing) = &self.smoothing {
            smoothing.validate()?;
        }
        roi::validate(&self.rois)
    }
}
