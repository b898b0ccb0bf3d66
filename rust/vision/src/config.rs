// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tunable parameters for the classical room detection pipeline

use blueprint_rooms_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Version tag written into every result produced by this pipeline
pub const MODEL_VERSION: &str = "phase_1_opencv";

/// Configuration for the room detection pipeline.
///
/// Deserializes from partial JSON: missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// CLAHE clip limit, relative to a uniform histogram
    pub clahe_clip_limit: f64,
    /// CLAHE tiles along each axis
    pub clahe_tile_grid: u32,
    /// Gaussian blur kernel size (must be odd)
    pub blur_kernel_size: u32,
    /// Canny edge detection low threshold
    pub canny_low: f32,
    /// Canny edge detection high threshold
    pub canny_high: f32,
    /// Side of the square structuring element (must be odd)
    pub morph_kernel_size: u32,
    /// Dilations applied to connect broken wall lines
    pub dilate_iterations: u32,
    /// Erosions applied afterwards to thin the edges back
    pub erode_iterations: u32,
    /// Absolute minimum room area (square pixels)
    pub min_room_area: f64,
    /// Minimum room area as a fraction of the image area
    pub min_area_fraction: f64,
    /// Absolute maximum room area (square pixels)
    pub max_room_area: f64,
    /// Maximum room area as a fraction of the image area
    pub max_area_fraction: f64,
    /// Polygon simplification tolerance as a fraction of the arc length
    pub polygon_epsilon_fraction: f64,
    /// Confidence every candidate starts from
    pub base_confidence: f64,
    /// Added when the simplified polygon has exactly four vertices
    pub rectangle_bonus: f64,
    /// Added when the simplified polygon is convex
    pub convex_bonus: f64,
    /// Upper bound for classical detections
    pub max_confidence: f64,
    /// Boxes overlapping a stronger detection by more than this are dropped
    pub iou_threshold: f64,
    /// Drop rooms scoring below this after merging
    pub min_confidence: Option<f64>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            clahe_clip_limit: 2.0,
            clahe_tile_grid: 8,
            blur_kernel_size: 5,
            canny_low: 50.0,
            canny_high: 150.0,
            morph_kernel_size: 5,
            dilate_iterations: 2,
            erode_iterations: 1,
            min_room_area: 5000.0,
            min_area_fraction: 0.005,
            max_room_area: 500_000.0,
            max_area_fraction: 0.4,
            polygon_epsilon_fraction: 0.02,
            base_confidence: 0.7,
            rectangle_bonus: 0.15,
            convex_bonus: 0.1,
            max_confidence: 0.95,
            iou_threshold: 0.3,
            min_confidence: None,
        }
    }
}

impl DetectionConfig {
    /// Reject parameter combinations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: impl Into<String>) -> Result<()> {
            Err(Error::InvalidConfig(msg.into()))
        }

        if !(self.clahe_clip_limit > 0.0) {
            return invalid("clahe_clip_limit must be positive");
        }
        if self.clahe_tile_grid == 0 {
            return invalid("clahe_tile_grid must be at least 1");
        }
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return invalid(format!(
                "blur_kernel_size must be odd, got {}",
                self.blur_kernel_size
            ));
        }
        if self.morph_kernel_size == 0 || self.morph_kernel_size % 2 == 0 {
            return invalid(format!(
                "morph_kernel_size must be odd, got {}",
                self.morph_kernel_size
            ));
        }
        // imageproc takes the structuring element radius as a u8
        if self.morph_kernel_size / 2 > u8::MAX as u32 {
            return invalid("morph_kernel_size is too large");
        }
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return invalid(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} / {}",
                self.canny_low, self.canny_high
            ));
        }
        if !(self.min_room_area >= 0.0 && self.min_room_area < self.max_room_area) {
            return invalid("min_room_area must be non-negative and below max_room_area");
        }
        if !(0.0..=1.0).contains(&self.min_area_fraction)
            || !(0.0..=1.0).contains(&self.max_area_fraction)
        {
            return invalid("area fractions must lie in [0, 1]");
        }
        if !(self.polygon_epsilon_fraction >= 0.0) {
            return invalid("polygon_epsilon_fraction must be non-negative");
        }
        if !(0.0..=1.0).contains(&self.base_confidence)
            || !(0.0..=1.0).contains(&self.max_confidence)
            || self.base_confidence > self.max_confidence
        {
            return invalid("confidences must satisfy 0 <= base <= max <= 1");
        }
        if !(self.rectangle_bonus >= 0.0 && self.convex_bonus >= 0.0) {
            return invalid("confidence bonuses must be non-negative");
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return invalid("iou_threshold must lie in [0, 1]");
        }
        if let Some(min) = self.min_confidence {
            if !(0.0..=1.0).contains(&min) {
                return invalid("min_confidence must lie in [0, 1]");
            }
        }
        Ok(())
    }

    /// Area bounds for an image of the given size
    pub fn area_bounds(&self, width: u32, height: u32) -> AreaBounds {
        let image_area = width as f64 * height as f64;
        AreaBounds {
            min: self.min_room_area.max(image_area * self.min_area_fraction),
            max: self.max_room_area.min(image_area * self.max_area_fraction),
        }
    }
}

/// Exclusive area range a boundary must fall in to count as a room
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBounds {
    pub min: f64,
    pub max: f64,
}

impl AreaBounds {
    pub fn contains(&self, area: f64) -> bool {
        self.min < area && area < self.max
    }
}
