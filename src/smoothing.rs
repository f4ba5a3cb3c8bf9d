//! Exponential smoothing of raw gaze points
//!
//! `s = s + (p - s) * alpha`, seeded with the first point. Absent frames
//! pass through and leave the filter untouched.

use crate::config::SmoothingConfig;
use crate::point::Point;

#[derive(Debug, Clone)]
pub struct GazeSmoother {
    alpha: f64,
    state: Option<(f64, f64)>,
}

impl GazeSmoother {
    pub fn new(config: SmoothingConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self {
            alpha: config.alpha,
            state: None,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn smooth(&mut self, point: Option<Point>) -> Option<Point> {
        let p = point?;
        let (px, py) = (f64::from(p.x), f64::from(p.y));
        let (sx, sy) = self.state.unwrap_or((px, py));
        let next = (sx + (px - sx) * self.alpha, sy + (py - sy) * self.alpha);
        self.state = Some(next);
        Some(Point::new(next.0.round() as i32, next.1.round() as i32))
    }
}
