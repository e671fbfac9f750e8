// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Errors that stop a whole batch.
//!
//! Per-building problems never show up here; they are reported through
//! each building's error flag.

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Geometry error: {0}")]
    Geometry(#[from] roofline_geometry::Error),

    #[error("Map error: {0}")]
    Map(#[from] roofline_core::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(err.to_string())
    }
}
