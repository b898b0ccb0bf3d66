// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Detection result types shared by every room detector

use crate::coordinates::NORMALIZED_RANGE;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Axis-aligned box in source image pixels.
///
/// `x_max`/`y_max` are exclusive: a box covering pixel columns 10..=19 has
/// `x_min = 10, x_max = 20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelBox {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl PixelBox {
    pub fn new(x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> u32 {
        self.x_max.saturating_sub(self.x_min)
    }

    pub fn height(&self) -> u32 {
        self.y_max.saturating_sub(self.y_min)
    }

    /// Area in square pixels
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.x_min >= self.x_max || self.y_min >= self.y_max
    }
}

/// Bounding box in the resolution-independent 0..=1000 space,
/// serialized as `[x_min, y_min, x_max, y_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u32; 4]", into = "[u32; 4]")]
pub struct NormalizedBox {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl NormalizedBox {
    pub fn new(x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> u32 {
        self.x_max.saturating_sub(self.x_min)
    }

    pub fn height(&self) -> u32 {
        self.y_max.saturating_sub(self.y_min)
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// True when the box is non-degenerate and lies inside the normalized range
    pub fn is_valid(&self) -> bool {
        self.x_min < self.x_max
            && self.y_min < self.y_max
            && self.x_max <= NORMALIZED_RANGE
            && self.y_max <= NORMALIZED_RANGE
    }

    /// Intersection over union with another box.
    ///
    /// Boxes that only touch along an edge do not overlap.
    pub fn iou(&self, other: &NormalizedBox) -> f64 {
        let inter_x_min = self.x_min.max(other.x_min);
        let inter_y_min = self.y_min.max(other.y_min);
        let inter_x_max = self.x_max.min(other.x_max);
        let inter_y_max = self.y_max.min(other.y_max);

        if inter_x_max <= inter_x_min || inter_y_max <= inter_y_min {
            return 0.0;
        }

        let inter_area =
            (inter_x_max - inter_x_min) as f64 * (inter_y_max - inter_y_min) as f64;
        let union_area = self.area() as f64 + other.area() as f64 - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

impl From<NormalizedBox> for [u32; 4] {
    fn from(b: NormalizedBox) -> Self {
        [b.x_min, b.y_min, b.x_max, b.y_max]
    }
}

impl TryFrom<[u32; 4]> for NormalizedBox {
    type Error = Error;

    fn try_from(coords: [u32; 4]) -> Result<Self> {
        let [x_min, y_min, x_max, y_max] = coords;
        let b = NormalizedBox::new(x_min, y_min, x_max, y_max);
        if b.is_valid() {
            Ok(b)
        } else {
            Err(Error::Internal(format!(
                "bounding box {:?} outside 0..={}",
                coords, NORMALIZED_RANGE
            )))
        }
    }
}

impl fmt::Display for NormalizedBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.x_min, self.y_min, self.x_max, self.y_max
        )
    }
}

/// Floating-point rectangle in pixel space, used to draw a normalized box
/// over an image of known size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A room reported by a detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedRoom {
    /// Unique within one detection call (`room_000`, `room_001`, ...)
    pub id: String,
    pub bounding_box: NormalizedBox,
    /// Detection confidence (0.0 - 1.0)
    pub confidence: f64,
    /// Free-text room name hint; only learned pipelines populate it
    pub name_hint: Option<String>,
}

/// Complete output of one detection call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Rooms in presentation order
    pub rooms: Vec<DetectedRoom>,
    pub processing_time_ms: u64,
    /// Identifies the pipeline that produced the result
    pub model_version: String,
}

impl DetectionResult {
    /// Check the invariants every detector must uphold: valid boxes,
    /// confidences in `[0, 1]`, and unique ids.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.rooms.len());
        for room in &self.rooms {
            if !room.bounding_box.is_valid() {
                return Err(Error::Internal(format!(
                    "room {} has invalid bounding box {}",
                    room.id, room.bounding_box
                )));
            }
            if !(0.0..=1.0).contains(&room.confidence) {
                return Err(Error::Internal(format!(
                    "room {} has confidence {} outside [0, 1]",
                    room.id, room.confidence
                )));
            }
            if !seen.insert(room.id.as_str()) {
                return Err(Error::Internal(format!("duplicate room id {}", room.id)));
            }
        }
        Ok(())
    }
}

/// Format the id for the room at `index` in emission order
pub fn room_id(index: usize) -> String {
    format!("room_{:03}", index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn room(id: &str, b: NormalizedBox) -> DetectedRoom {
        DetectedRoom {
            id: id.to_string(),
            bounding_box: b,
            confidence: 0.85,
            name_hint: None,
        }
    }

    #[test]
    fn test_iou_identical_and_disjoint() {
        let a = NormalizedBox::new(100, 100, 300, 300);
        let b = NormalizedBox::new(500, 500, 600, 600);
        assert_relative_eq!(a.iou(&a), 1.0);
        assert_relative_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_touching_edges_is_zero() {
        let a = NormalizedBox::new(0, 0, 100, 100);
        let b = NormalizedBox::new(100, 0, 200, 100);
        assert_relative_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_partial_overlap() {
        // 100x100 boxes shifted by 50: inter 5000, union 15000
        let a = NormalizedBox::new(0, 0, 100, 100);
        let b = NormalizedBox::new(50, 0, 150, 100);
        assert_relative_eq!(a.iou(&b), 1.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(b.iou(&a), a.iou(&b));
    }

    #[test]
    fn test_pixel_box_area() {
        let b = PixelBox::new(10, 20, 30, 60);
        assert_eq!(b.width(), 20);
        assert_eq!(b.height(), 40);
        assert_eq!(b.area(), 800);
        assert!(!b.is_empty());
        assert!(PixelBox::new(5, 5, 5, 9).is_empty());
    }

    #[test]
    fn test_room_id_padding() {
        assert_eq!(room_id(0), "room_000");
        assert_eq!(room_id(42), "room_042");
        assert_eq!(room_id(1234), "room_1234");
    }

    #[test]
    fn test_result_json_schema() {
        let result = DetectionResult {
            rooms: vec![room("room_000", NormalizedBox::new(10, 20, 300, 400))],
            processing_time_ms: 12,
            model_version: "phase_1_opencv".into(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rooms": [{
                    "id": "room_000",
                    "bounding_box": [10, 20, 300, 400],
                    "confidence": 0.85,
                    "name_hint": null
                }],
                "processing_time_ms": 12,
                "model_version": "phase_1_opencv"
            })
        );

        let parsed: DetectionResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_box() {
        let bad = serde_json::json!([0, 0, 1200, 50]);
        assert!(serde_json::from_value::<NormalizedBox>(bad).is_err());

        let inverted = serde_json::json!([300, 0, 100, 50]);
        assert!(serde_json::from_value::<NormalizedBox>(inverted).is_err());
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let b = NormalizedBox::new(0, 0, 10, 10);
        let result = DetectionResult {
            rooms: vec![room("room_000", b), room("room_000", b)],
            processing_time_ms: 0,
            model_version: "test".into(),
        };
        assert!(matches!(result.validate(), Err(Error::Internal(_))));
    }
}
