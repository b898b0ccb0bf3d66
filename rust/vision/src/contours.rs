// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room candidate discovery from the edge mask

use crate::config::DetectionConfig;
use crate::polygon::Polygon;
use blueprint_rooms_core::{PixelBox, Result};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use nalgebra::Point2;

/// A closed boundary that passed the area filter
#[derive(Debug, Clone)]
pub struct CandidateRoom {
    /// Bounding rectangle of the simplified polygon
    pub bbox: PixelBox,
    /// Area enclosed by the traced boundary (square pixels)
    pub area: f64,
    /// Simplified boundary
    pub polygon: Polygon,
    pub vertex_count: usize,
    pub is_convex: bool,
    /// Outer border or the border of a hole in a foreground region
    pub is_hole: bool,
}

/// Find room candidates in a binary edge mask.
///
/// Every border in the hierarchy is considered, holes included: in filled,
/// colored floor plans the room interior is the hole inside the wall band,
/// not just the outline of the whole band. Candidates come back in border
/// discovery (raster scan) order.
pub fn find_room_candidates(
    edges: &GrayImage,
    width: u32,
    height: u32,
    config: &DetectionConfig,
) -> Result<Vec<CandidateRoom>> {
    let contours = find_contours::<i32>(edges);
    let bounds = config.area_bounds(width, height);

    tracing::debug!(
        total = contours.len(),
        min_area = bounds.min,
        max_area = bounds.max,
        image_area = width as u64 * height as u64,
        "Filtering contours by area"
    );

    let mut candidates = Vec::new();
    for (idx, contour) in contours.into_iter().enumerate() {
        let boundary = Polygon::new(
            contour
                .points
                .iter()
                .map(|p| Point2::new(p.x, p.y))
                .collect(),
        );

        let area = boundary.area();
        if !bounds.contains(area) {
            continue;
        }

        let epsilon = config.polygon_epsilon_fraction * boundary.arc_length();
        let polygon = boundary.simplify(epsilon);
        let bbox = polygon.bounding_box()?;

        tracing::debug!(
            contour = idx,
            area,
            vertices = polygon.len(),
            "Valid contour"
        );

        candidates.push(CandidateRoom {
            bbox,
            area,
            vertex_count: polygon.len(),
            is_convex: polygon.is_convex(),
            is_hole: contour.border_type == BorderType::Hole,
            polygon,
        });
    }

    tracing::debug!(candidates = candidates.len(), "Contour filtering complete");
    Ok(candidates)
}
