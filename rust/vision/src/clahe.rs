// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contrast-limited adaptive histogram equalization (CLAHE)
//!
//! Scanned blueprints are often lit unevenly; equalizing per tile brings
//! faint wall lines in dark corners up to the same contrast as the rest of
//! the sheet, while the clip limit keeps flat paper regions from turning
//! into amplified noise.
//!
//! The image is split into a `grid x grid` set of tiles. Each tile gets its
//! own clipped-histogram lookup table, and every pixel is mapped by
//! bilinear interpolation between the four nearest tile tables.

use image::{GrayImage, Luma};

const HIST_SIZE: usize = 256;

/// Apply CLAHE with the given clip limit and tile grid.
///
/// A `clip_limit` of 2.0 allows each histogram bin twice the count it would
/// hold in a perfectly uniform tile.
pub fn clahe(image: &GrayImage, clip_limit: f64, grid: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || grid == 0 {
        return image.clone();
    }

    let tiles_x = grid as usize;
    let tiles_y = grid as usize;
    let tile_w = (width as usize).div_ceil(tiles_x);
    let tile_h = (height as usize).div_ceil(tiles_y);
    let tile_area = tile_w * tile_h;

    let clip = if clip_limit > 0.0 {
        ((clip_limit * tile_area as f64 / HIST_SIZE as f64) as usize).max(1)
    } else {
        0
    };

    let mut luts = vec![[0u8; HIST_SIZE]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut hist = tile_histogram(image, tx * tile_w, ty * tile_h, tile_w, tile_h);
            if clip > 0 {
                clip_histogram(&mut hist, clip);
            }
            luts[ty * tiles_x + tx] = histogram_lut(&hist, tile_area);
        }
    }

    let x_weights: Vec<TileWeights> = (0..width as usize)
        .map(|x| TileWeights::new(x, tile_w, tiles_x))
        .collect();

    let mut result = GrayImage::new(width, height);
    for y in 0..height as usize {
        let wy = TileWeights::new(y, tile_h, tiles_y);
        let row_top = wy.first * tiles_x;
        let row_bottom = wy.second * tiles_x;

        for (x, wx) in x_weights.iter().enumerate() {
            let value = image.get_pixel(x as u32, y as u32).0[0] as usize;

            let top = luts[row_top + wx.first][value] as f32 * wx.first_weight
                + luts[row_top + wx.second][value] as f32 * wx.second_weight;
            let bottom = luts[row_bottom + wx.first][value] as f32 * wx.first_weight
                + luts[row_bottom + wx.second][value] as f32 * wx.second_weight;
            let mapped = top * wy.first_weight + bottom * wy.second_weight;

            result.put_pixel(x as u32, y as u32, Luma([saturate_u8(mapped)]));
        }
    }

    result
}

/// Interpolation weights between the two tiles whose centres bracket a
/// coordinate along one axis
struct TileWeights {
    first: usize,
    second: usize,
    first_weight: f32,
    second_weight: f32,
}

impl TileWeights {
    fn new(pos: usize, tile_size: usize, tiles: usize) -> Self {
        let t = pos as f32 / tile_size as f32 - 0.5;
        let lower = t.floor();
        let frac = t - lower;
        let lower = lower as i64;

        Self {
            first: lower.max(0) as usize,
            second: ((lower + 1) as usize).min(tiles - 1),
            first_weight: 1.0 - frac,
            second_weight: frac,
        }
    }
}

/// Histogram of one tile. Tiles hanging past the image edge read mirrored
/// pixels so every tile covers the same area.
fn tile_histogram(
    image: &GrayImage,
    x0: usize,
    y0: usize,
    tile_w: usize,
    tile_h: usize,
) -> [usize; HIST_SIZE] {
    let (width, height) = image.dimensions();
    let mut hist = [0usize; HIST_SIZE];

    for dy in 0..tile_h {
        let y = reflect_101(y0 + dy, height as usize);
        for dx in 0..tile_w {
            let x = reflect_101(x0 + dx, width as usize);
            hist[image.get_pixel(x as u32, y as u32).0[0] as usize] += 1;
        }
    }

    hist
}

/// Mirror an out-of-range index back into `0..len` without repeating the
/// edge pixel (`dcb|abcd|cba`)
fn reflect_101(index: usize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let i = index % period;
    if i < len {
        i
    } else {
        period - i
    }
}

/// Clip every bin at `limit` and spread the excess evenly over all bins
fn clip_histogram(hist: &mut [usize; HIST_SIZE], limit: usize) {
    let mut excess = 0;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }

    let batch = excess / HIST_SIZE;
    let mut residual = excess - batch * HIST_SIZE;
    for bin in hist.iter_mut() {
        *bin += batch;
    }

    if residual > 0 {
        let step = (HIST_SIZE / residual).max(1);
        let mut i = 0;
        while i < HIST_SIZE && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// Scaled cumulative histogram
fn histogram_lut(hist: &[usize; HIST_SIZE], tile_area: usize) -> [u8; HIST_SIZE] {
    let scale = 255.0 / tile_area as f32;
    let mut lut = [0u8; HIST_SIZE];
    let mut sum = 0usize;
    for (entry, &count) in lut.iter_mut().zip(hist.iter()) {
        sum += count;
        *entry = saturate_u8(sum as f32 * scale);
    }
    lut
}

#[inline]
fn saturate_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
