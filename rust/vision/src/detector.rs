// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end classical room detection

use crate::config::{DetectionConfig, MODEL_VERSION};
use crate::contours::{find_room_candidates, CandidateRoom};
use crate::edges::extract_edges;
use crate::merge::{merge_overlapping, ScoredRoom};
use crate::preprocess::preprocess;
use crate::scoring::score_candidate;
use blueprint_rooms_core::{
    normalize_box, room_id, DetectedRoom, DetectionResult, Error, Result, RoomDetector,
};
use image::DynamicImage;
use std::time::Instant;

/// Room detector built from classical image processing.
///
/// Holds only its configuration, so one instance can serve any number of
/// concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ClassicalDetector {
    config: DetectionConfig,
}

impl ClassicalDetector {
    /// Create a detector, rejecting configurations the pipeline cannot run
    pub fn new(config: DetectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect rooms in an already decoded image
    pub fn detect_image(&self, image: &DynamicImage) -> Result<DetectionResult> {
        self.detect_image_since(image, Instant::now())
    }

    /// Decode and detect, timing the call from before decoding starts
    fn detect_bytes_since(&self, image_bytes: &[u8], start: Instant) -> Result<DetectionResult> {
        let image = decode_image(image_bytes)?;
        self.detect_image_since(&image, start)
    }

    fn detect_image_since(&self, image: &DynamicImage, start: Instant) -> Result<DetectionResult> {
        let rooms = self.run_pipeline(image)?;
        let processing_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            width = image.width(),
            height = image.height(),
            rooms = rooms.len(),
            processing_time_ms,
            "Room detection complete"
        );

        Ok(DetectionResult {
            rooms,
            processing_time_ms,
            model_version: MODEL_VERSION.to_string(),
        })
    }

    fn run_pipeline(&self, image: &DynamicImage) -> Result<Vec<DetectedRoom>> {
        let config = &self.config;
        let (width, height) = (image.width(), image.height());

        // Step 1: Grayscale, contrast and smoothing
        let enhanced = preprocess(image, config)?;

        // Step 2: Closed edge mask
        let edges = extract_edges(&enhanced, config);

        // Step 3: Boundaries within the room size range
        let candidates = find_room_candidates(&edges, width, height, config)?;

        // Step 4: Score and move into the normalized space
        let scored = score_and_normalize(&candidates, width, height, config);

        // Step 5: Overlap removal
        let mut merged = merge_overlapping(scored, config.iou_threshold);

        if let Some(min_confidence) = config.min_confidence {
            merged.retain(|room| room.confidence >= min_confidence);
        }

        // Largest first; stable so equal areas keep confidence order
        merged.sort_by(|a, b| b.pixel_box.area().cmp(&a.pixel_box.area()));

        Ok(merged
            .into_iter()
            .enumerate()
            .map(|(index, room)| DetectedRoom {
                id: room_id(index),
                bounding_box: room.bounding_box,
                confidence: room.confidence,
                name_hint: None,
            })
            .collect())
    }
}

/// Score each candidate and map its box into the normalized space.
///
/// Slivers thinner than one normalized unit collapse to an empty box and
/// are dropped.
fn score_and_normalize(
    candidates: &[CandidateRoom],
    width: u32,
    height: u32,
    config: &DetectionConfig,
) -> Vec<ScoredRoom> {
    candidates
        .iter()
        .filter_map(|candidate| {
            let bounding_box = normalize_box(&candidate.bbox, width, height);
            if !bounding_box.is_valid() {
                tracing::debug!(
                    bbox = %bounding_box,
                    hole = candidate.is_hole,
                    "Dropping degenerate box"
                );
                return None;
            }

            let confidence = score_candidate(candidate, config);
            tracing::debug!(
                bbox = %bounding_box,
                hole = candidate.is_hole,
                vertices = candidate.vertex_count,
                confidence,
                "Scored candidate"
            );

            Some(ScoredRoom {
                pixel_box: candidate.bbox,
                bounding_box,
                confidence,
            })
        })
        .collect()
}

impl RoomDetector for ClassicalDetector {
    fn detect(&self, image_bytes: &[u8]) -> Result<DetectionResult> {
        self.detect_bytes_since(image_bytes, Instant::now())
    }

    fn model_version(&self) -> &str {
        MODEL_VERSION
    }
}

/// Decode an encoded raster image (PNG, JPEG or TIFF)
pub fn decode_image(image_bytes: &[u8]) -> Result<DynamicImage> {
    if image_bytes.is_empty() {
        return Err(Error::Decode("empty image payload".into()));
    }
    image::load_from_memory(image_bytes).map_err(|e| Error::Decode(e.to_string()))
}

/// Detect rooms in encoded image bytes with the given configuration
pub fn detect_rooms(image_bytes: &[u8], config: &DetectionConfig) -> Result<DetectionResult> {
    ClassicalDetector::new(config.clone())?.detect(image_bytes)
}
