// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roofline Processing
//!
//! Drives building construction for a whole map:
//!
//! - [`on_object_created`]: the per-building hook (walls + roof)
//! - [`BuildingPipeline`]: awaits map readiness, then builds one footprint
//!   at a time, yielding and checking for cancellation in between
//! - [`build_parallel`]: the same output built on a rayon pool
//! - [`Config`]: environment-driven configuration
//!
//! ```rust,ignore
//! use roofline_processing::{cancellation, BuildingPipeline, Config};
//!
//! let config = Config::from_env();
//! let (_stop, cancel) = cancellation();
//! let output = BuildingPipeline::new(&config).run(&handle, &cancel).await?;
//! println!("{} buildings, {} errored", output.stats.buildings, output.stats.errored);
//! ```

pub mod config;
pub mod error;
pub mod hook;
pub mod parallel;
pub mod pipeline;

pub use config::{Config, RoofSelection};
pub use error::{Error, Result};
pub use hook::{on_object_created, BuildContext};
pub use parallel::build_parallel;
pub use pipeline::{cancellation, BatchOutput, BatchStats, BuildingMesh, BuildingPipeline};
