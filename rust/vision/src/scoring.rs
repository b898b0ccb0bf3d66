// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heuristic confidence for classical detections

use crate::config::DetectionConfig;
use crate::contours::CandidateRoom;

/// Score a candidate from its simplified polygon.
///
/// Four-sided and convex outlines look like walled rooms and earn a bonus
/// each. The result is capped at `max_confidence` and rounded to two
/// decimals.
pub fn score_candidate(candidate: &CandidateRoom, config: &DetectionConfig) -> f64 {
    let mut confidence = config.base_confidence;

    if candidate.vertex_count == 4 {
        confidence += config.rectangle_bonus;
    }
    if candidate.is_convex {
        confidence += config.convex_bonus;
    }

    round_confidence(confidence.min(config.max_confidence))
}

#[inline]
fn round_confidence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
