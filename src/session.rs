//! Per-frame pipeline: smoothing, classification and interval aggregation
//!
//! [`FixationSession::new`] keeps every labelled sample and interval for the
//! final [`SessionReport`]; it backs [`replay`]. A live capture loop should
//! use [`FixationSession::streaming`], which keeps only running statistics
//! and hands each sample and closed interval back through [`SessionStep`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SessionConfig;
use crate::intervals::{FixationInterval, IntervalAggregator};
use crate::point::Point;
use crate::smoothing::GazeSmoother;
use crate::stats::FixationStats;
use crate::tracker::{FixationTracker, LabeledSample, Sample, TrackerError};

/// Output of a single [`FixationSession::feed`] call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStep {
    /// Present when the frame carried a point
    pub labeled: Option<LabeledSample>,
    /// Present when this frame ended a fixation
    pub closed: Option<FixationInterval>,
}

/// Everything produced by a finished session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub samples: Vec<LabeledSample>,
    pub intervals: Vec<FixationInterval>,
    pub stats: FixationStats,
}

/// Fixation session for one subject
#[derive(Debug, Clone)]
pub struct FixationSession {
    smoother: Option<GazeSmoother>,
    tracker: FixationTracker,
    aggregator: IntervalAggregator,
    retain: bool,
    samples: Vec<LabeledSample>,
    intervals: Vec<FixationInterval>,
    stats: FixationStats,
}

impl FixationSession {
    /// Session that records its full output for [`FixationSession::finish`]
    pub fn new(config: SessionConfig) -> Result<Self, TrackerError> {
        Self::build(config, true)
    }

    /// Session with memory bounded by its configuration
    ///
    /// Nothing per frame is kept. The report from
    /// [`FixationSession::finish`] has no samples, and its only interval is
    /// the one still open at end of stream.
    pub fn streaming(config: SessionConfig) -> Result<Self, TrackerError> {
        Self::build(config, false)
    }

    fn build(config: SessionConfig, retain: bool) -> Result<Self, TrackerError> {
        let tracker = FixationTracker::new(config.tracker)?;
        let smoother = config
            .smoothing
            .map(GazeSmoother::new)
            .transpose()
            .map_err(TrackerError::InvalidConfig)?;
        crate::roi::validate(&config.rois).map_err(TrackerError::InvalidConfig)?;
        Ok(Self {
            smoother,
            tracker,
            aggregator: IntervalAggregator::with_rois(config.rois),
            retain,
            samples: Vec::new(),
            intervals: Vec::new(),
            stats: FixationStats::default(),
        })
    }

    pub fn tracker(&self) -> &FixationTracker {
        &self.tracker
    }

    /// Labelled samples recorded so far, always empty when streaming
    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    /// Closed intervals recorded so far, always empty when streaming
    pub fn intervals(&self) -> &[FixationInterval] {
        &self.intervals
    }

    /// Running statistics
    pub fn stats(&self) -> &FixationStats {
        &self.stats
    }

    /// Process one frame
    ///
    /// A rejected frame is not counted and leaves the session unchanged.
    pub fn feed(&mut self, timestamp: f64, point: Option<Point>) -> Result<SessionStep, TrackerError> {
        // Validate before smoothing so a rejected frame cannot move the filter.
        self.tracker.check_timestamp(timestamp)?;

        let point = match self.smoother.as_mut() {
            Some(smoother) => smoother.smooth(point),
            None => point,
        };

        let labeled = self.tracker.process(timestamp, point)?;
        self.stats.record_frame(labeled.as_ref());

        let closed = labeled.as_ref().and_then(|s| self.aggregator.push(s));
        if let Some(interval) = &closed {
            self.stats.record_interval(interval);
        }

        if self.retain {
            self.samples.extend(labeled);
            self.intervals.extend(closed);
        }

        Ok(SessionStep { labeled, closed })
    }

    pub fn feed_sample(&mut self, sample: Sample) -> Result<SessionStep, TrackerError> {
        self.feed(sample.timestamp, sample.point)
    }

    /// Close any open interval and return the report
    pub fn finish(mut self) -> SessionReport {
        if let Some(interval) = self.aggregator.finish() {
            self.stats.record_interval(&interval);
            self.intervals.push(interval);
        }
        debug!(
            frames = self.stats.total_frames,
            fixations = self.stats.interval_count,
            "session finished"
        );
        SessionReport {
            samples: self.samples,
            intervals: self.intervals,
            stats: self.stats,
        }
    }
}

/// Run a recorded stream through a fresh session
pub fn replay(samples: &[Sample], config: SessionConfig) -> Result<SessionReport, TrackerError> {
    let mut session = FixationSession::new(config)?;
    for sample in samples {
        session.feed_sample(*sample)?;
    }
    Ok(session.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SmoothingConfig, TrackerConfig};
    use crate::roi::{Rect, Roi};

    fn config() -> SessionConfig {
        SessionConfig {
            tracker: TrackerConfig::new(30.0, 0.5),
            ..SessionConfig::default()
        }
    }

    fn smoothed(alpha: f64) -> SessionConfig {
        SessionConfig {
            smoothing: Some(SmoothingConfig { alpha }),
            ..config()
        }
    }

    #[test]
    fn test_feed_labels_and_closes_interval() {
        let mut session = FixationSession::new(config()).unwrap();
        session.feed(0.0, Some(Point::new(100, 100))).unwrap();
        let step = session.feed(0.5, Some(Point::new(101, 100))).unwrap();
        assert!(step.labeled.unwrap().is_fixation);
        assert_eq!(step.closed, None);

        let step = session.feed(0.75, None).unwrap();
        assert_eq!(step, SessionStep::default());

        let step = session.feed(1.0, Some(Point::new(400, 400))).unwrap();
        let closed = step.closed.unwrap();
        assert_eq!(closed.start_time, 0.5);
        assert_eq!(closed.end_time, 0.5);
        assert_eq!(closed.centroid, Point::new(101, 100));
        assert_eq!(session.intervals().len(), 1);
    }

    #[test]
    fn test_finish_flushes_open_interval() {
        let samples = vec![
            Sample::present(0.0, 10, 10),
            Sample::present(0.5, 10, 10),
            Sample::present(1.0, 10, 10),
        ];
        let report = replay(&samples, config()).unwrap();
        assert_eq!(report.samples.len(), 3);
        assert_eq!(report.intervals.len(), 1);
        assert_eq!(report.intervals[0].sample_count, 2);
        assert_eq!(report.stats.interval_count, 1);
        assert_eq!(report.stats.total_fixation_time_s, 0.5);
    }

    #[test]
    fn test_absent_frames_counted_in_stats() {
        let samples = vec![
            Sample::present(0.0, 10, 10),
            Sample::absent(0.1),
            Sample::absent(0.2),
        ];
        let report = replay(&samples, config()).unwrap();
        assert_eq!(report.stats.total_frames, 3);
        assert_eq!(report.stats.frames_with_point, 1);
    }

    #[test]
    fn test_non_monotonic_frame_rejected_without_side_effects() {
        let mut session = FixationSession::new(smoothed(0.5)).unwrap();
        session.feed(1.0, Some(Point::new(0, 0))).unwrap();
        let err = session.feed(0.5, Some(Point::new(100, 100))).unwrap_err();
        assert!(err.is_invalid_input());

        // filter state untouched: a repeat of the first point stays put
        let step = session.feed(1.5, Some(Point::new(0, 0))).unwrap();
        assert_eq!(step.labeled.unwrap().point, Point::new(0, 0));
        assert!(step.labeled.unwrap().is_fixation);
        assert_eq!(session.samples().len(), 2);
    }

    #[test]
    fn test_smoothing_applied_before_tracking() {
        let mut session = FixationSession::new(smoothed(0.5)).unwrap();
        session.feed(0.0, Some(Point::new(0, 0))).unwrap();
        let step = session.feed(0.1, Some(Point::new(40, 0))).unwrap();
        // raw jump is 40px, smoothed jump is 20px
        assert_eq!(step.labeled.unwrap().point, Point::new(20, 0));
        assert_eq!(session.tracker().state().fixation_anchor_time, Some(0.0));
    }

    #[test]
    fn test_invalid_smoothing_config_rejected() {
        let result = FixationSession::new(smoothed(0.0));
        assert!(matches!(result, Err(TrackerError::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_roi_ids_rejected() {
        let roi = Roi::new(1, Rect::new(0, 0, 10, 10));
        let result = FixationSession::streaming(SessionConfig {
            rois: vec![roi, roi],
            ..config()
        });
        assert!(matches!(result, Err(TrackerError::InvalidConfig(_))));
    }

    #[test]
    fn test_intervals_attributed_to_configured_rois() {
        let samples = vec![
            Sample::present(0.0, 140, 120),
            Sample::present(0.5, 142, 121),
            Sample::present(0.75, 600, 400),
            Sample::present(1.25, 601, 400),
        ];
        let report = replay(
            &samples,
            SessionConfig {
                rois: vec![Roi::new(4, Rect::new(120, 80, 90, 90))],
                ..config()
            },
        )
        .unwrap();
        assert_eq!(report.intervals.len(), 2);
        assert_eq!(report.intervals[0].roi, Some(4));
        assert_eq!(report.intervals[1].roi, None);
    }

    #[test]
    fn test_streaming_session_keeps_no_history() {
        let mut session = FixationSession::streaming(config()).unwrap();
        let mut closed = Vec::new();
        for i in 0..40 {
            let t = f64::from(i) * 0.125;
            // two fixations separated by a jump at frame 20
            let x = if i < 20 { 100 } else { 500 };
            let step = session.feed(t, Some(Point::new(x, 100))).unwrap();
            closed.extend(step.closed);
        }
        assert!(session.samples().is_empty());
        assert!(session.intervals().is_empty());
        assert_eq!(session.stats().frames_with_point, 40);

        let report = session.finish();
        assert!(report.samples.is_empty());
        assert_eq!(closed.len(), 1);
        assert_eq!(report.intervals.len(), 1);
        assert_eq!(report.stats.interval_count, 2);
        assert_eq!(report.stats.total_frames, 40);
    }

    #[test]
    fn test_streaming_stats_match_replay() {
        let samples: Vec<Sample> = (0..30)
            .map(|i| {
                let t = f64::from(i) * 0.125;
                if i % 4 == 1 {
                    Sample::absent(t)
                } else {
                    Sample::present(t, 100 + (i / 12) * 60, 100)
                }
            })
            .collect();

        let mut session = FixationSession::streaming(config()).unwrap();
        for s in &samples {
            session.feed_sample(*s).unwrap();
        }
        assert_eq!(session.finish().stats, replay(&samples, config()).unwrap().stats);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let samples: Vec<Sample> = (0..40)
            .map(|i| {
                let t = f64::from(i) * 0.05;
                if i % 7 == 3 {
                    Sample::absent(t)
                } else {
                    Sample::present(t, 100 + (i / 10) * 50, 100)
                }
            })
            .collect();
        let a = replay(&samples, config()).unwrap();
        let b = replay(&samples, config()).unwrap();
        assert_eq!(a, b);
    }
}
