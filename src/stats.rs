//! Fixation statistics for -c mode

use serde::{Deserialize, Serialize};

use crate::intervals::FixationInterval;
use crate::tracker::LabeledSample;

/// Summary of a processed gaze stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FixationStats {
    /// Frames fed to the session, with or without a point
    pub total_frames: u64,
    /// Frames that carried a point (one labelled sample each)
    pub frames_with_point: u64,
    /// Labelled samples marked as fixation
    pub fixation_samples: u64,
    pub interval_count: u64,
    /// Sum of interval durations (end - start), seconds
    pub total_fixation_time_s: f64,
    pub mean_fixation_duration_s: f64,
    pub longest_fixation_s: f64,
}

impl FixationStats {
    /// Count one processed frame and its labelled sample, if any
    pub fn record_frame(&mut self, labeled: Option<&LabeledSample>) {
        self.total_frames += 1;
        if let Some(sample) = labeled {
            self.frames_with_point += 1;
            if sample.is_fixation {
                self.fixation_samples += 1;
            }
        }
    }

    /// Fold one closed interval into the duration figures
    pub fn record_interval(&mut self, interval: &FixationInterval) {
        let duration = interval.duration();
        self.interval_count += 1;
        self.total_fixation_time_s += duration;
        self.longest_fixation_s = self.longest_fixation_s.max(duration);
        self.mean_fixation_duration_s = self.total_fixation_time_s / self.interval_count as f64;
    }

    /// Compute statistics from a finished stream
    pub fn compute(
        total_frames: u64,
        samples: &[LabeledSample],
        intervals: &[FixationInterval],
    ) -> Self {
        let mut stats = Self::default();
        for sample in samples {
            stats.record_frame(Some(sample));
        }
        stats.total_frames = total_frames;
        for interval in intervals {
            stats.record_interval(interval);
        }
        stats
    }

    /// Fraction of labelled samples marked as fixation
    pub fn fixation_ratio(&self) -> f64 {
        if self.frames_with_point == 0 {
            0.0
        } else {
            self.fixation_samples as f64 / self.frames_with_point as f64
        }
    }

    /// Frames where upstream detection produced no point
    pub fn dropped_frames(&self) -> u64 {
        self.total_frames.saturating_sub(self.frames_with_point)
    }

    /// Print summary table to stderr
    pub fn print_summary(&self) {
        eprintln!("\n=== Fixation Summary ===");
        eprintln!("{:<24} {:>12}", "frames", self.total_frames);
        eprintln!("{:<24} {:>12}", "frames with gaze", self.frames_with_point);
        eprintln!("{:<24} {:>12}", "dropped frames", self.dropped_frames());
        eprintln!("{:<24} {:>12}", "fixation samples", self.fixation_samples);
        eprintln!(
            "{:<24} {:>11.1}%",
            "fixation ratio",
            self.fixation_ratio() * 100.0
        );
        eprintln!("{:<24} {:>12}", "fixations", self.interval_count);
        eprintln!(
            "{:<24} {:>11.3}s",
            "total fixation time", self.total_fixation_time_s
        );
        eprintln!(
            "{:<24} {:>11.3}s",
            "mean fixation", self.mean_fixation_duration_s
        );
        eprintln!(
            "{:<24} {:>11.3}s",
            "longest fixation", self.longest_fixation_s
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    fn labeled(t: f64, is_fixation: bool) -> LabeledSample {
        LabeledSample {
            timestamp: t,
            point: Point::new(0, 0),
            is_fixation,
        }
    }

    fn interval(start: f64, end: f64, count: usize) -> FixationInterval {
        FixationInterval {
            start_time: start,
            end_time: end,
            sample_count: count,
            centroid: Point::new(0, 0),
            roi: None,
        }
    }

    #[test]
    fn test_empty_stream() {
        let stats = FixationStats::compute(0, &[], &[]);
        assert_eq!(stats, FixationStats::default());
        assert_eq!(stats.fixation_ratio(), 0.0);
    }

    #[test]
    fn test_counts_and_durations() {
        let samples = vec![
            labeled(0.0, false),
            labeled(0.5, true),
            labeled(1.0, true),
            labeled(1.5, false),
        ];
        let intervals = vec![interval(0.5, 1.0, 2), interval(2.0, 3.5, 4)];
        let stats = FixationStats::compute(6, &samples, &intervals);

        assert_eq!(stats.total_frames, 6);
        assert_eq!(stats.frames_with_point, 4);
        assert_eq!(stats.dropped_frames(), 2);
        assert_eq!(stats.fixation_samples, 2);
        assert_eq!(stats.interval_count, 2);
        assert_eq!(stats.total_fixation_time_s, 2.0);
        assert_eq!(stats.mean_fixation_duration_s, 1.0);
        assert_eq!(stats.longest_fixation_s, 1.5);
        assert_eq!(stats.fixation_ratio(), 0.5);
    }

    #[test]
    fn test_incremental_matches_compute() {
        let samples = vec![labeled(0.0, false), labeled(0.5, true)];
        let intervals = vec![interval(0.5, 0.75, 1), interval(1.0, 2.0, 3)];

        let mut stats = FixationStats::default();
        stats.record_frame(Some(&samples[0]));
        stats.record_frame(None);
        stats.record_frame(Some(&samples[1]));
        for i in &intervals {
            stats.record_interval(i);
        }

        assert_eq!(stats, FixationStats::compute(3, &samples, &intervals));
        assert_eq!(stats.dropped_frames(), 1);
        assert_eq!(stats.longest_fixation_s, 1.0);
        assert_eq!(stats.mean_fixation_duration_s, 0.625);
    }
}
