//! Dwell-time fixation classifier
//!
//! [`FixationTracker`] consumes one `(timestamp, Option<Point>)` per video
//! frame and labels every present point as fixated or not. A point is
//! stable when it lies strictly within `distance_threshold_px` of the
//! previous present point; once the gaze has stayed stable for
//! `fixation_duration_s` since the last movement, samples are labelled as
//! fixation until the next movement.
//!
//! The tracker is a plain value: no I/O, no global state, no locking. One
//! instance per subject.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{GapPolicy, TrackerConfig};
use crate::point::{DistanceMetric, Metric, Point};

/// Errors returned by [`FixationTracker`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("invalid input: timestamp {current} is earlier than previous timestamp {previous}")]
    NonMonotonicTimestamp { previous: f64, current: f64 },

    #[error("invalid input: timestamp {0} is not finite")]
    NonFiniteTimestamp(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TrackerError {
    /// True for caller contract violations on `process` input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            TrackerError::NonMonotonicTimestamp { .. } | TrackerError::NonFiniteTimestamp(_)
        )
    }
}

/// One upstream frame: a timestamp in seconds and the gaze point, if any
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: f64,
    pub point: Option<Point>,
}

impl Sample {
    pub fn new(timestamp: f64, point: Option<Point>) -> Self {
        Self { timestamp, point }
    }

    pub fn present(timestamp: f64, x: i32, y: i32) -> Self {
        Self::new(timestamp, Some(Point::new(x, y)))
    }

    pub fn absent(timestamp: f64) -> Self {
        Self::new(timestamp, None)
    }
}

/// A classified point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub timestamp: f64,
    pub point: Point,
    pub is_fixation: bool,
}

/// Mutable classifier state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackerState {
    /// Most recent present point
    pub last_point: Option<Point>,
    /// Time of the last movement (or of the first point of a run)
    pub fixation_anchor_time: Option<f64>,
    /// Timestamp of the first sample of the fixation in progress
    pub current_fixation_start: Option<f64>,
    /// Timestamp of `last_point`
    pub last_point_time: Option<f64>,
}

/// Stateful fixation classifier
///
/// Generic over the distance function; the default dispatches on the
/// [`Metric`] named in the configuration.
///
/// # Example
/// ```
/// use fixation_tracker::config::TrackerConfig;
/// use fixation_tracker::point::Point;
/// use fixation_tracker::tracker::FixationTracker;
///
/// let mut tracker = FixationTracker::new(TrackerConfig::new(30.0, 0.5)).unwrap();
/// let labels: Vec<bool> = [(0.0, 100, 100), (0.2, 105, 102), (0.4, 98, 101), (0.6, 101, 99)]
///     .iter()
///     .map(|&(t, x, y)| tracker.process(t, Some(Point::new(x, y))).unwrap().unwrap().is_fixation)
///     .collect();
/// assert_eq!(labels, vec![false, false, false, true]);
/// ```
#[derive(Debug, Clone)]
pub struct FixationTracker<M: DistanceMetric = Metric> {
    config: TrackerConfig,
    metric: M,
    state: TrackerState,
    /// Latest timestamp seen on any call, present point or not
    watermark: Option<f64>,
}

impl FixationTracker<Metric> {
    /// Create a tracker using the metric named in `config`
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        Self::with_metric(config, config.metric)
    }
}

impl<M: DistanceMetric> FixationTracker<M> {
    /// Create a tracker with a custom distance function
    ///
    /// `config.metric` is ignored in favour of `metric`.
    pub fn with_metric(config: TrackerConfig, metric: M) -> Result<Self, TrackerError> {
        config.validate().map_err(TrackerError::InvalidConfig)?;
        Ok(Self {
            config,
            metric,
            state: TrackerState::default(),
            watermark: None,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// True while the most recent labelled sample was a fixation
    pub fn in_fixation(&self) -> bool {
        self.state.current_fixation_start.is_some()
    }

    /// Classify one frame
    ///
    /// Returns `Ok(None)` for an absent point, leaving the classifier state
    /// untouched. A timestamp earlier than any previously seen timestamp is
    /// rejected and leaves all state untouched.
    pub fn process(
        &mut self,
        timestamp: f64,
        point: Option<Point>,
    ) -> Result<Option<LabeledSample>, TrackerError> {
        self.check_timestamp(timestamp)?;
        self.watermark = Some(timestamp);

        let Some(point) = point else {
            trace!(timestamp, "no gaze point");
            return Ok(None);
        };

        if self.gap_exceeded(timestamp) {
            debug!(timestamp, "detection gap exceeded, starting new run");
            self.state.last_point = None;
        }

        let is_fixation = self.classify(timestamp, point);

        if is_fixation {
            if self.state.current_fixation_start.is_none() {
                debug!(timestamp, x = point.x, y = point.y, "fixation onset");
                self.state.current_fixation_start = Some(timestamp);
            }
        } else {
            self.state.current_fixation_start = None;
        }

        self.state.last_point = Some(point);
        self.state.last_point_time = Some(timestamp);

        trace!(timestamp, x = point.x, y = point.y, is_fixation, "labelled sample");
        Ok(Some(LabeledSample {
            timestamp,
            point,
            is_fixation,
        }))
    }

    /// Convenience wrapper over [`FixationTracker::process`]
    pub fn process_sample(&mut self, sample: Sample) -> Result<Option<LabeledSample>, TrackerError> {
        self.process(sample.timestamp, sample.point)
    }

    /// Forget all history, as if freshly constructed
    pub fn reset(&mut self) {
        self.state = TrackerState::default();
        self.watermark = None;
    }

    /// Check a timestamp against the input contract without consuming it
    pub fn check_timestamp(&self, timestamp: f64) -> Result<(), TrackerError> {
        if !timestamp.is_finite() {
            return Err(TrackerError::NonFiniteTimestamp(timestamp));
        }
        match self.watermark {
            Some(previous) if timestamp < previous => Err(TrackerError::NonMonotonicTimestamp {
                previous,
                current: timestamp,
            }),
            _ => Ok(()),
        }
    }

    fn gap_exceeded(&self, timestamp: f64) -> bool {
        match (self.config.gap_policy, self.state.last_point_time) {
            (GapPolicy::ResetAfter { max_gap_s }, Some(last)) => timestamp - last > max_gap_s,
            _ => false,
        }
    }

    fn classify(&mut self, timestamp: f64, point: Point) -> bool {
        let Some(last) = self.state.last_point else {
            self.state.fixation_anchor_time = Some(timestamp);
            return false;
        };

        let d = self.metric.distance(point, last);
        if d < self.config.distance_threshold_px {
            match self.state.fixation_anchor_time {
                None => {
                    self.state.fixation_anchor_time = Some(timestamp);
                    false
                }
                Some(anchor) => timestamp - anchor >= self.config.fixation_duration_s,
            }
        } else {
            if self.state.current_fixation_start.is_some() {
                debug!(timestamp, distance = d, "movement ended fixation");
            }
            self.state.fixation_anchor_time = Some(timestamp);
            false
        }
    }
}
