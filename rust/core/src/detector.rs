// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The seam between transport adapters and detection pipelines

use crate::error::Result;
use crate::types::DetectionResult;

/// A pipeline that turns an encoded raster image into detected rooms.
///
/// Implementations are constructed once (loading any model handle they
/// need up front) and are immutable afterwards, so a single instance can be
/// shared across threads and swapped for another implementation without the
/// caller noticing.
pub trait RoomDetector: Send + Sync {
    /// Detect rooms in an encoded image (PNG, JPEG, TIFF, ...)
    fn detect(&self, image_bytes: &[u8]) -> Result<DetectionResult>;

    /// Version tag written into every result
    fn model_version(&self) -> &str;
}

impl<D: RoomDetector + ?Sized> RoomDetector for Box<D> {
    fn detect(&self, image_bytes: &[u8]) -> Result<DetectionResult> {
        (**self).detect(image_bytes)
    }

    fn model_version(&self) -> &str {
        (**self).model_version()
    }
}

impl<D: RoomDetector + ?Sized> RoomDetector for std::sync::Arc<D> {
    fn detect(&self, image_bytes: &[u8]) -> Result<DetectionResult> {
        (**self).detect(image_bytes)
    }

    fn model_version(&self) -> &str {
        (**self).model_version()
    }
}
