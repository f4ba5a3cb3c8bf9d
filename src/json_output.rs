//! JSON output format for fixation reports

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::intervals::FixationInterval;
use crate::session::SessionReport;
use crate::stats::FixationStats;
use crate::tracker::LabeledSample;

/// A fixation interval with its derived duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonInterval {
    pub start_time: f64,
    pub end_time: f64,
    pub duration_s: f64,
    pub sample_count: usize,
    pub centroid_x: i32,
    pub centroid_y: i32,
    /// Region the fixation landed in, `null` when none
    pub roi: Option<u32>,
}

impl From<&FixationInterval> for JsonInterval {
    fn from(interval: &FixationInterval) -> Self {
        Self {
            start_time: interval.start_time,
            end_time: interval.end_time,
            duration_s: interval.duration(),
            sample_count: interval.sample_count,
            centroid_x: interval.centroid.x,
            centroid_y: interval.centroid.y,
            roi: interval.roi,
        }
    }
}

/// Summary statistics for the stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    #[serde(flatten)]
    pub stats: FixationStats,
    pub fixation_ratio: f64,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    pub version: String,
    pub config: SessionConfig,
    /// Omitted when only intervals were requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<LabeledSample>>,
    pub intervals: Vec<JsonInterval>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    pub fn from_report(config: SessionConfig, report: &SessionReport, include_samples: bool) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            samples: include_samples.then(|| report.samples.clone()),
            intervals: report.intervals.iter().map(JsonInterval::from).collect(),
            summary: JsonSummary {
                stats: report.stats,
                fixation_ratio: report.stats.fixation_ratio(),
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
