//! Regions of interest and fixation attribution
//!
//! A region is an axis-aligned target rectangle widened on every side by
//! `tolerance_px`. The hit test is inclusive on all four edges. A closed
//! fixation interval is attributed to the first region, in configuration
//! order, that contains its centroid.
//!
//! # Example fixation.toml
//!
//! ```toml
//! [[roi]]
//! id = 1
//! rect = { left = 120, top = 80, width = 90, height = 90 }
//! tolerance_px = 18.0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::point::Point;

/// Target rectangle in pixel coordinates, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        f64::from(self.left) + f64::from(self.width)
    }

    pub fn bottom(&self) -> f64 {
        f64::from(self.top) + f64::from(self.height)
    }
}

fn default_tolerance_px() -> f64 {
    18.0
}

/// A target the subject is asked to look at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Roi {
    pub id: u32,
    pub rect: Rect,
    /// Slack added around the rectangle, in pixels
    #[serde(default = "default_tolerance_px")]
    pub tolerance_px: f64,
}

impl Roi {
    pub fn new(id: u32, rect: Rect) -> Self {
        Self {
            id,
            rect,
            tolerance_px: default_tolerance_px(),
        }
    }

    pub fn with_tolerance(mut self, tolerance_px: f64) -> Self {
        self.tolerance_px = tolerance_px;
        self
    }

    /// Inclusive hit test against the widened rectangle
    pub fn contains(&self, point: Point) -> bool {
        let (x, y) = (f64::from(point.x), f64::from(point.y));
        let tol = self.tolerance_px;
        x >= f64::from(self.rect.left) - tol
            && x <= self.rect.right() + tol
            && y >= f64::from(self.rect.top) - tol
            && y <= self.rect.bottom() + tol
    }
}

/// Id of the first region containing `point`
pub fn locate(rois: &[Roi], point: Point) -> Option<u32> {
    rois.iter().find(|r| r.contains(point)).map(|r| r.id)
}

/// Reject negative or non-finite tolerances and duplicate ids
pub fn validate(rois: &[Roi]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(rois.len());
    for roi in rois {
        if !roi.tolerance_px.is_finite() || roi.tolerance_px < 0.0 {
            return Err(format!(
                "roi {}: tolerance_px must be a finite value >= 0, got {}",
                roi.id, roi.tolerance_px
            ));
        }
        if !seen.insert(roi.id) {
            return Err(format!("roi {}: duplicate id", roi.id));
        }
    }
    Ok(())
}
