//! Property-based tests for the fixation core
//!
//! Covers:
//! 1. Stability: a run of close points becomes a fixation exactly at the
//!    first sample dwelling `fixation_duration_s` and stays fixated
//! 2. Movement reset
//! 3. First-sample rule
//! 4. Absence neutrality
//! 5. Deterministic replay
//! 6. CSV round-trip of labelled samples
//! 7. Interval invariants

use fixation_tracker::csv_input::parse_labeled_csv;
use fixation_tracker::csv_output::CsvOutput;
use fixation_tracker::{
    FixationTracker, IntervalAggregator, LabeledSample, Point, Sample, SessionConfig,
    TrackerConfig,
};
use proptest::prelude::*;

const THRESHOLD: f64 = 30.0;
const DURATION: f64 = 0.5;

fn tracker() -> FixationTracker {
    FixationTracker::new(TrackerConfig::new(THRESHOLD, DURATION)).unwrap()
}

/// Monotonic timestamps built from non-negative increments
fn timestamps(steps: &[f64]) -> Vec<f64> {
    steps
        .iter()
        .scan(0.0, |t, dt| {
            *t += dt;
            Some(*t)
        })
        .collect()
}

/// Gaze stream with jitter, jumps and dropouts
fn arb_stream() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec(
        (
            0.0f64..0.2,
            prop::option::weighted(0.85, (-2000i32..2000, -2000i32..2000)),
        ),
        0..120,
    )
    .prop_map(|frames| {
        let steps: Vec<f64> = frames.iter().map(|(dt, _)| *dt).collect();
        timestamps(&steps)
            .into_iter()
            .zip(frames)
            .map(|(t, (_, p))| Sample::new(t, p.map(Point::from)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_stable_run_fixates_at_dwell(
        origin in (-500i32..500, -500i32..500),
        jitter in prop::collection::vec((-10i32..=10, -10i32..=10), 1..60),
        steps in prop::collection::vec(0.0f64..0.1, 1..60),
    ) {
        // Points within 10px per axis of a common origin are < 30px apart.
        let n = jitter.len().min(steps.len());
        let mut ts = timestamps(&steps[..n]);
        let first = ts[0];
        for t in ts.iter_mut() {
            *t -= first;
        }

        let mut t = tracker();
        let mut seen_fixation = false;
        for (i, &time) in ts.iter().enumerate() {
            let p = Point::new(origin.0 + jitter[i].0, origin.1 + jitter[i].1);
            let s = t.process(time, Some(p)).unwrap().unwrap();
            let expected = i > 0 && time - ts[0] >= DURATION;
            prop_assert_eq!(s.is_fixation, expected);
            if seen_fixation {
                prop_assert!(s.is_fixation);
            }
            seen_fixation |= s.is_fixation;
        }
    }

    #[test]
    fn prop_movement_resets_dwell(
        stream in arb_stream(),
        jump_at in 0.0f64..5.0,
        after in prop::collection::vec(0.0f64..0.1, 1..30),
    ) {
        let mut t = tracker();
        let mut last_time = 0.0;
        for s in &stream {
            t.process_sample(*s).unwrap();
            last_time = s.timestamp;
        }
        let base = t.state().last_point.unwrap_or(Point::new(0, 0));
        let jump = Point::new(base.x.saturating_add(1000), base.y);
        let reset_time = last_time + jump_at;
        t.process(reset_time, Some(jump)).unwrap();

        for time in timestamps(&after).into_iter().map(|dt| reset_time + dt) {
            let s = t.process(time, Some(jump)).unwrap().unwrap();
            if time - reset_time < DURATION {
                prop_assert!(!s.is_fixation);
            }
        }
    }

    #[test]
    fn prop_first_sample_never_fixated(
        time in -1.0e9f64..1.0e9,
        x in any::<i32>(),
        y in any::<i32>(),
    ) {
        let mut t = tracker();
        let s = t.process(time, Some(Point::new(x, y))).unwrap().unwrap();
        prop_assert!(!s.is_fixation);
    }

    #[test]
    fn prop_absent_frames_are_neutral(stream in arb_stream()) {
        let mut with_gaps = tracker();
        let mut without_gaps = tracker();

        let a: Vec<LabeledSample> = stream
            .iter()
            .filter_map(|s| with_gaps.process_sample(*s).unwrap())
            .collect();
        let b: Vec<LabeledSample> = stream
            .iter()
            .filter(|s| s.point.is_some())
            .filter_map(|s| without_gaps.process_sample(*s).unwrap())
            .collect();

        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_replay_is_deterministic(stream in arb_stream()) {
        let first = fixation_tracker::session::replay(&stream, SessionConfig::default()).unwrap();
        let second = fixation_tracker::session::replay(&stream, SessionConfig::default()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_labeled_csv_round_trip(stream in arb_stream(), epoch in 0.0f64..2.0e9) {
        let mut t = tracker();
        let labeled: Vec<LabeledSample> = stream
            .iter()
            .map(|s| Sample::new(s.timestamp + epoch, s.point))
            .filter_map(|s| t.process_sample(s).unwrap())
            .collect();

        let csv = labeled.iter().copied().collect::<CsvOutput>().to_csv();
        let parsed = parse_labeled_csv(&csv).unwrap();
        prop_assert_eq!(parsed, labeled);
    }

    #[test]
    fn prop_interval_invariants(stream in arb_stream()) {
        let mut t = tracker();
        let labeled: Vec<LabeledSample> = stream
            .iter()
            .filter_map(|s| t.process_sample(*s).unwrap())
            .collect();
        let intervals = IntervalAggregator::collect(&labeled);

        let fixation_samples = labeled.iter().filter(|s| s.is_fixation).count();
        prop_assert_eq!(
            intervals.iter().map(|i| i.sample_count).sum::<usize>(),
            fixation_samples
        );

        for interval in &intervals {
            prop_assert!(interval.sample_count > 0);
            prop_assert!(interval.end_time >= interval.start_time);
        }
        for pair in intervals.windows(2) {
            prop_assert!(pair[0].end_time <= pair[1].start_time);
            prop_assert!(pair[0].start_time <= pair[1].start_time);
        }
    }
}
