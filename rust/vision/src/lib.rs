// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classical room detection for raster blueprints
//!
//! Finds enclosed regions bounded by walls using deterministic image
//! processing, no learned model involved:
//! 1. Grayscale conversion, CLAHE and Gaussian smoothing
//! 2. Canny edges, dilated and closed into continuous boundaries
//! 3. Contour tracing with an area filter relative to the image size
//! 4. Polygon simplification and shape-based confidence
//! 5. Overlap removal, then ordering by size
//!
//! Results follow the [`blueprint_rooms_core`] contract: boxes live in a
//! 0..=1000 space independent of the input resolution.
//!
//! # Usage
//!
//! ```rust,ignore
//! use blueprint_rooms_core::RoomDetector;
//! use blueprint_rooms_vision::{ClassicalDetector, DetectionConfig};
//!
//! let detector = ClassicalDetector::new(DetectionConfig::default())?;
//! let result = detector.detect(&std::fs::read("plan.png")?)?;
//! for room in &result.rooms {
//!     println!("{} {} {:.2}", room.id, room.bounding_box, room.confidence);
//! }
//! ```

pub mod clahe;
pub mod config;
pub mod contours;
pub mod detector;
pub mod edges;
pub mod image_ops;
pub mod merge;
pub mod polygon;
pub mod preprocess;
pub mod scoring;

// Re-export commonly used types and functions
pub use config::{AreaBounds, DetectionConfig, MODEL_VERSION};
pub use contours::{find_room_candidates, CandidateRoom};
pub use detector::{decode_image, detect_rooms, ClassicalDetector};
pub use edges::extract_edges;
pub use merge::{merge_overlapping, ScoredRoom};
pub use polygon::Polygon;
pub use preprocess::preprocess;
pub use scoring::score_candidate;
