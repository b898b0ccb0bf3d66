// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grayscale conversion and contrast normalization ahead of edge detection

use crate::clahe::clahe;
use crate::config::DetectionConfig;
use crate::image_ops::{gaussian_blur, to_grayscale};
use blueprint_rooms_core::{Error, Result};
use image::{DynamicImage, GrayImage};

/// Turn a decoded blueprint into an enhanced grayscale image of the same size.
///
/// 1. Grayscale conversion (multi-channel inputs only)
/// 2. CLAHE to even out scan lighting
/// 3. Gaussian smoothing to suppress scan noise
pub fn preprocess(image: &DynamicImage, config: &DetectionConfig) -> Result<GrayImage> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(Error::InvalidImage { width, height });
    }

    let gray = to_grayscale(image);
    let enhanced = clahe(&gray, config.clahe_clip_limit, config.clahe_tile_grid);
    let blurred = gaussian_blur(&enhanced, config.blur_kernel_size);

    tracing::debug!(width, height, "Preprocessing complete");
    Ok(blurred)
}
