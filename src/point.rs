//! Pixel points, distance metrics and centroid accumulation
//!
//! All arithmetic is plain scalar f64 on two coordinates. Coordinate
//! differences are taken after widening to f64 so that extreme i32 inputs
//! cannot overflow.

use serde::{Deserialize, Serialize};

/// A gaze position in integer pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Arithmetic mean of a set of points, `None` if the slice is empty
    pub fn centroid(points: &[Point]) -> Option<Point> {
        let mut acc = RunningCentroid::new();
        for p in points {
            acc.push(*p);
        }
        acc.to_point()
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Distance between two gaze points, in pixels
pub trait DistanceMetric {
    fn distance(&self, a: Point, b: Point) -> f64;
}

/// Straight-line distance (the L2 norm of the difference)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

/// Sum of absolute axis differences (L1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

/// Largest absolute axis difference (L-infinity)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chebyshev;

fn deltas(a: Point, b: Point) -> (f64, f64) {
    (
        f64::from(a.x) - f64::from(b.x),
        f64::from(a.y) - f64::from(b.y),
    )
}

impl DistanceMetric for Euclidean {
    fn distance(&self, a: Point, b: Point) -> f64 {
        let (dx, dy) = deltas(a, b);
        dx.hypot(dy)
    }
}

impl DistanceMetric for Manhattan {
    fn distance(&self, a: Point, b: Point) -> f64 {
        let (dx, dy) = deltas(a, b);
        dx.abs() + dy.abs()
    }
}

impl DistanceMetric for Chebyshev {
    fn distance(&self, a: Point, b: Point) -> f64 {
        let (dx, dy) = deltas(a, b);
        dx.abs().max(dy.abs())
    }
}

/// Runtime-selectable metric, used by configuration files and the CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Euclidean,
    Manhattan,
    Chebyshev,
}

impl DistanceMetric for Metric {
    fn distance(&self, a: Point, b: Point) -> f64 {
        match self {
            Metric::Euclidean => Euclidean.distance(a, b),
            Metric::Manhattan => Manhattan.distance(a, b),
            Metric::Chebyshev => Chebyshev.distance(a, b),
        }
    }
}

/// Incremental arithmetic mean of a stream of points
///
/// Uses `mean += (v - mean) / n` per axis, so no running sum is kept and
/// long fixations cannot overflow an accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningCentroid {
    count: usize,
    mean_x: f64,
    mean_y: f64,
}

impl RunningCentroid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, p: Point) {
        self.count += 1;
        let n = self.count as f64;
        self.mean_x += (f64::from(p.x) - self.mean_x) / n;
        self.mean_y += (f64::from(p.y) - self.mean_y) / n;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Exact mean, `None` before the first point
    pub fn mean(&self) -> Option<(f64, f64)> {
        (self.count > 0).then_some((self.mean_x, self.mean_y))
    }

    /// Mean rounded half away from zero to integer pixels
    pub fn to_point(&self) -> Option<Point> {
        self.mean()
            .map(|(x, y)| Point::new(x.round() as i32, y.round() as i32))
    }
}
