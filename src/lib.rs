//! fixation-tracker - dwell-time fixation detection for gaze point streams
//!
//! This library classifies a live sequence of estimated gaze positions into
//! fixation and saccade samples, aggregates fixation intervals, and reads
//! and writes the tabular event log. Gaze estimation itself (camera
//! capture, face and eye detection) happens upstream; the core consumes one
//! `(timestamp, Option<Point>)` per frame.

pub mod cli;
pub mod config;
pub mod csv_input;
pub mod csv_output;
pub mod intervals;
pub mod json_output;
pub mod point;
pub mod roi;
pub mod session;
pub mod smoothing;
pub mod stats;
pub mod tracker;

pub use config::{GapPolicy, SessionConfig, TrackerConfig};
pub use intervals::{FixationInterval, IntervalAggregator};
pub use point::{DistanceMetric, Metric, Point};
pub use roi::{Rect, Roi};
pub use session::{FixationSession, SessionReport};
pub use tracker::{FixationTracker, LabeledSample, Sample, TrackerError};
