// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between pixel coordinates and the normalized 0..=1000 space

use crate::types::{NormalizedBox, PixelBox, PixelRect};

/// Upper bound of the normalized coordinate space
pub const NORMALIZED_RANGE: u32 = 1000;

/// Scale one pixel coordinate into the normalized space.
///
/// The ratio is computed in `f64` and the fractional part dropped, so a
/// coordinate never rounds up past the pixel it came from.
#[inline]
pub fn normalize_coordinate(value: u32, extent: u32) -> u32 {
    if extent == 0 {
        return 0;
    }
    let scaled = (value as f64 / extent as f64) * NORMALIZED_RANGE as f64;
    (scaled as u32).min(NORMALIZED_RANGE)
}

/// Map a pixel box into the normalized space of an image of the given size.
///
/// X coordinates scale by `width`, Y coordinates by `height`.
pub fn normalize_box(bbox: &PixelBox, width: u32, height: u32) -> NormalizedBox {
    NormalizedBox::new(
        normalize_coordinate(bbox.x_min, width),
        normalize_coordinate(bbox.y_min, height),
        normalize_coordinate(bbox.x_max, width),
        normalize_coordinate(bbox.y_max, height),
    )
}

/// Map a normalized box back onto an image of the given size
pub fn to_pixel_rect(bbox: &NormalizedBox, width: u32, height: u32) -> PixelRect {
    let range = NORMALIZED_RANGE as f64;
    let w = width as f64;
    let h = height as f64;

    PixelRect {
        x: (bbox.x_min as f64 / range) * w,
        y: (bbox.y_min as f64 / range) * h,
        width: (bbox.width() as f64 / range) * w,
        height: (bbox.height() as f64 / range) * h,
    }
}
