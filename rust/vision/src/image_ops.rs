// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image processing primitives used by the detection stages

use image::{DynamicImage, GrayImage};
use imageproc::distance_transform::Norm;

/// Convert any decoded image to single-channel 8-bit grayscale
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        other => other.to_luma8(),
    }
}

/// Sigma used for a Gaussian kernel of the given size when none is supplied
pub fn sigma_for_kernel(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1D Gaussian kernel with `kernel_size` taps
pub fn gaussian_kernel(kernel_size: u32) -> Vec<f32> {
    let sigma = sigma_for_kernel(kernel_size);
    let radius = (kernel_size / 2) as i32;
    let scale = -0.5 / (sigma * sigma);

    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|x| (scale * (x * x) as f32).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Gaussian blur with a square `kernel_size` x `kernel_size` window
pub fn gaussian_blur(image: &GrayImage, kernel_size: u32) -> GrayImage {
    if kernel_size <= 1 {
        return image.clone();
    }
    let kernel = gaussian_kernel(kernel_size);
    imageproc::filter::separable_filter_equal(image, &kernel)
}

/// Apply Canny edge detection
pub fn canny_edges(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    imageproc::edges::canny(image, low_threshold, high_threshold)
}

/// Radius of a square structuring element with the given side length
fn square_radius(kernel_size: u32) -> u8 {
    (kernel_size / 2).min(u8::MAX as u32) as u8
}

/// Morphological dilation with a square structuring element, repeated
pub fn dilate(image: &GrayImage, kernel_size: u32, iterations: u32) -> GrayImage {
    let radius = square_radius(kernel_size);
    let mut result = image.clone();
    for _ in 0..iterations {
        result = imageproc::morphology::dilate(&result, Norm::LInf, radius);
    }
    result
}

/// Morphological erosion with a square structuring element, repeated
pub fn erode(image: &GrayImage, kernel_size: u32, iterations: u32) -> GrayImage {
    let radius = square_radius(kernel_size);
    let mut result = image.clone();
    for _ in 0..iterations {
        result = imageproc::morphology::erode(&result, Norm::LInf, radius);
    }
    result
}

/// Morphological closing (dilate then erode) - fills small gaps
pub fn morphological_close(image: &GrayImage, kernel_size: u32) -> GrayImage {
    let dilated = dilate(image, kernel_size, 1);
    erode(&dilated, kernel_size, 1)
}
