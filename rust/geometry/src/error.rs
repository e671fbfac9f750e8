// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building walls and roofs
///
/// Most variants are soft: they are contained to one building's roof and
/// surface as that building's error flag. [`Error::is_fatal`] marks the ones
/// that indicate a broken invariant and must stop the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Triangulation produced no triangles for {vertices} roof vertices")]
    EmptyTriangulation { vertices: usize },

    #[error("Invalid triangulation: {0}")]
    InvalidTriangulation(String),

    #[error("Degenerate roof bounding box: width {width}, depth {depth}")]
    DegenerateBoundingBox { width: f64, depth: f64 },

    #[error("Roof scratch buffer holds {available} coordinates, need {required}")]
    UndersizedScratchBuffer { required: usize, available: usize },

    #[error("Footprint has {points} point(s), need at least {required}")]
    UnderspecifiedFootprint { points: usize, required: usize },

    #[error("Shared buffer offset {offset} + {vertices} vertices exceeds u32 indexing")]
    IndexOverflow { offset: usize, vertices: usize },
}

impl Error {
    /// Whether this error indicates a programming error rather than bad input
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::UndersizedScratchBuffer { .. } | Error::IndexOverflow { .. }
        )
    }
}
