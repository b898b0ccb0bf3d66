// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary edge mask extraction

use crate::config::DetectionConfig;
use crate::image_ops::{canny_edges, dilate, erode, morphological_close};
use image::GrayImage;

/// Produce a binary (0/255) edge mask with the same size as `gray`.
///
/// Canny edges are dilated more than they are eroded: the net growth
/// bridges broken wall lines into continuous boundaries, and the final
/// closing fills the small gaps that remain.
pub fn extract_edges(gray: &GrayImage, config: &DetectionConfig) -> GrayImage {
    let edges = canny_edges(gray, config.canny_low, config.canny_high);

    if tracing::enabled!(tracing::Level::DEBUG) {
        let edge_pixels = edges.pixels().filter(|p| p.0[0] > 0).count();
        tracing::debug!(edge_pixels, "Edge detection complete");
    }

    let kernel = config.morph_kernel_size;
    let connected = dilate(&edges, kernel, config.dilate_iterations);
    let thinned = erode(&connected, kernel, config.erode_iterations);
    morphological_close(&thinned, kernel)
}
