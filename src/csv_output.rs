//! CSV output for labelled samples and fixation intervals
//!
//! Sample table: `timestamp,x,y,fixation`, one row per labelled sample in
//! arrival order. Timestamps use Rust's shortest round-trip float
//! formatting, so [`crate::csv_input::parse_labeled_csv`] reads back the
//! exact values written.

use crate::intervals::FixationInterval;
use crate::tracker::LabeledSample;

pub const SAMPLE_HEADER: &str = "timestamp,x,y,fixation";
pub const INTERVAL_HEADER: &str =
    "start_time,end_time,duration_ms,sample_count,centroid_x,centroid_y,roi";

/// Fixation flag as written in sample tables
pub fn format_fixation(is_fixation: bool) -> &'static str {
    if is_fixation {
        "True"
    } else {
        "False"
    }
}

/// CSV output formatter for labelled samples
#[derive(Debug, Default)]
pub struct CsvOutput {
    samples: Vec<LabeledSample>,
}

impl CsvOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sample(&mut self, sample: LabeledSample) {
        self.samples.push(sample);
    }

    /// Format a labelled sample as CSV row
    pub fn format_sample(sample: &LabeledSample) -> String {
        format!(
            "{},{},{},{}",
            sample.timestamp,
            sample.point.x,
            sample.point.y,
            format_fixation(sample.is_fixation)
        )
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::with_capacity(32 * (self.samples.len() + 1));
        output.push_str(SAMPLE_HEADER);
        output.push('\n');

        for sample in &self.samples {
            output.push_str(&Self::format_sample(sample));
            output.push('\n');
        }

        output
    }
}

impl FromIterator<LabeledSample> for CsvOutput {
    fn from_iter<I: IntoIterator<Item = LabeledSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// CSV output formatter for fixation intervals
#[derive(Debug, Default)]
pub struct CsvIntervalOutput {
    intervals: Vec<FixationInterval>,
}

impl CsvIntervalOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_interval(&mut self, interval: FixationInterval) {
        self.intervals.push(interval);
    }

    /// The `roi` column is empty for an unattributed interval
    fn format_interval(interval: &FixationInterval) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            interval.start_time,
            interval.end_time,
            (interval.duration() * 1000.0).round() as i64,
            interval.sample_count,
            interval.centroid.x,
            interval.centroid.y,
            interval.roi.map(|id| id.to_string()).unwrap_or_default()
        )
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(INTERVAL_HEADER);
        output.push('\n');

        for interval in &self.intervals {
            output.push_str(&Self::format_interval(interval));
            output.push('\n');
        }

        output
    }
}

impl FromIterator<FixationInterval> for CsvIntervalOutput {
    fn from_iter<I: IntoIterator<Item = FixationInterval>>(iter: I) -> Self {
        Self {
            intervals: iter.into_iter().collect(),
        }
    }
}
