// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Blueprint Rooms Core
//!
//! The output contract every blueprint room detector honours, so a transport
//! layer can swap the classical pipeline for a learned one without changing
//! its response format.
//!
//! - [`DetectionResult`] / [`DetectedRoom`]: the serialized result schema
//! - [`NormalizedBox`]: bounding boxes in a 0..=1000 space independent of
//!   the source resolution
//! - [`RoomDetector`]: the trait pipelines implement
//! - [`Error`]: one error type for every failure a detector can report
//!
//! ```rust,ignore
//! use blueprint_rooms_core::RoomDetector;
//!
//! fn handle(detector: &dyn RoomDetector, body: &[u8]) -> String {
//!     match detector.detect(body) {
//!         Ok(result) => serde_json::to_string(&result).unwrap(),
//!         Err(e) if e.is_client_error() => format!("bad request: {}", e),
//!         Err(e) => format!("internal error: {}", e),
//!     }
//! }
//! ```

pub mod coordinates;
pub mod detector;
pub mod error;
pub mod types;

pub use coordinates::{normalize_box, normalize_coordinate, to_pixel_rect, NORMALIZED_RANGE};
pub use detector::RoomDetector;
pub use error::{Error, Result};
pub use types::{room_id, DetectedRoom, DetectionResult, NormalizedBox, PixelBox, PixelRect};
