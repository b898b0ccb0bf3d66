// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Overlap removal between scored detections

use blueprint_rooms_core::{NormalizedBox, PixelBox};
use rustc_hash::FxHashSet;

/// A candidate after scoring and normalization
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRoom {
    /// Box in source pixels, kept for area ordering
    pub pixel_box: PixelBox,
    pub bounding_box: NormalizedBox,
    pub confidence: f64,
}

/// Greedy non-maximum suppression.
///
/// Rooms are stably sorted by confidence (highest first). Each surviving
/// room suppresses every later room whose normalized IoU with it exceeds
/// `iou_threshold`. Suppression is a single pass: a room knocked out by a
/// stronger neighbour no longer suppresses anything itself, so two rooms
/// that both overlap it (but not each other) can both survive.
pub fn merge_overlapping(mut rooms: Vec<ScoredRoom>, iou_threshold: f64) -> Vec<ScoredRoom> {
    if rooms.len() <= 1 {
        return rooms;
    }

    // `sort_by` is stable: equal confidences keep discovery order
    rooms.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut suppressed: FxHashSet<usize> = FxHashSet::default();
    for i in 0..rooms.len() {
        if suppressed.contains(&i) {
            continue;
        }
        for j in (i + 1)..rooms.len() {
            if suppressed.contains(&j) {
                continue;
            }
            if rooms[i].bounding_box.iou(&rooms[j].bounding_box) > iou_threshold {
                suppressed.insert(j);
            }
        }
    }

    let before = rooms.len();
    let merged: Vec<ScoredRoom> = rooms
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !suppressed.contains(idx))
        .map(|(_, room)| room)
        .collect();

    tracing::debug!(before, after = merged.len(), "Merged overlapping rooms");
    merged
}
