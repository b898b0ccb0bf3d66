// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for room detection
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while detecting rooms
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    #[error("Invalid detection config: {0}")]
    InvalidConfig(String),

    #[error("Internal pipeline error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the failure was caused by the caller's input rather than
    /// by the pipeline itself.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::Internal(_))
    }
}
