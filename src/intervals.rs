//! Fixation interval aggregation
//!
//! Turns the `is_fixation` label stream into discrete [`FixationInterval`]
//! records. An interval opens on the first fixation-labelled sample of a
//! run and closes on the next non-fixation sample or at end of stream. It
//! covers labelled-fixation samples only, not the dwell that preceded them.
//! When target regions are configured, a closed interval carries the id of
//! the region containing its centroid.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::point::{Point, RunningCentroid};
use crate::roi::{self, Roi};
use crate::tracker::LabeledSample;

/// A maximal run of consecutive fixation-labelled samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixationInterval {
    /// Timestamp of the first fixation sample in the run
    pub start_time: f64,
    /// Timestamp of the last fixation sample in the run
    pub end_time: f64,
    pub sample_count: usize,
    /// Mean position of the run, rounded to integer pixels
    pub centroid: Point,
    /// Region containing the centroid, if any
    #[serde(default)]
    pub roi: Option<u32>,
}

impl FixationInterval {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenInterval {
    start_time: f64,
    end_time: f64,
    centroid: RunningCentroid,
}

impl OpenInterval {
    fn close(self, rois: &[Roi]) -> Option<FixationInterval> {
        let centroid = self.centroid.to_point()?;
        Some(FixationInterval {
            start_time: self.start_time,
            end_time: self.end_time,
            sample_count: self.centroid.count(),
            centroid,
            roi: roi::locate(rois, centroid),
        })
    }
}

/// Edge detector over labelled samples
#[derive(Debug, Clone, Default)]
pub struct IntervalAggregator {
    open: Option<OpenInterval>,
    rois: Vec<Roi>,
}

impl IntervalAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregator that attributes closed intervals to `rois`
    pub fn with_rois(rois: Vec<Roi>) -> Self {
        Self { open: None, rois }
    }

    /// True while a fixation run is in progress
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next labelled sample
    ///
    /// Returns the interval closed by a fixation-to-non-fixation edge.
    pub fn push(&mut self, sample: &LabeledSample) -> Option<FixationInterval> {
        if sample.is_fixation {
            let open = self.open.get_or_insert_with(|| OpenInterval {
                start_time: sample.timestamp,
                end_time: sample.timestamp,
                centroid: RunningCentroid::new(),
            });
            open.end_time = sample.timestamp;
            open.centroid.push(sample.point);
            None
        } else {
            self.close_open()
        }
    }

    /// Close the run in progress at end of stream
    pub fn finish(&mut self) -> Option<FixationInterval> {
        self.close_open()
    }

    /// Aggregate a complete labelled stream
    pub fn collect<'a, I>(samples: I) -> Vec<FixationInterval>
    where
        I: IntoIterator<Item = &'a LabeledSample>,
    {
        let mut aggregator = Self::new();
        let mut intervals: Vec<FixationInterval> = samples
            .into_iter()
            .filter_map(|s| aggregator.push(s))
            .collect();
        intervals.extend(aggregator.finish());
        intervals
    }

    fn close_open(&mut self) -> Option<FixationInterval> {
        let interval = self.open.take()?.close(&self.rois)?;
        debug!(
            start = interval.start_time,
            end = interval.end_time,
            samples = interval.sample_count,
            roi = ?interval.roi,
            "fixation interval closed"
        );
        Some(interval)
    }
}
