// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Roofline Core
//!
//! Map-side data model for procedural building generation.
//!
//! ## Overview
//!
//! - **Map model**: nodes keyed by id and ways referencing them ([`MapData`])
//! - **Footprint Source**: the [`FootprintSource`] trait the builders read from
//! - **Footprints**: resolved ground outlines with height ([`Footprint`])
//! - **Readiness**: an async signal the pipeline awaits once ([`map_channel`])
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roofline_core::{map_channel, MapData, Node, Way};
//!
//! let (publisher, handle) = map_channel();
//!
//! let mut map = MapData::new();
//! map.insert_node(Node::new(1, 0.0, 0.0, 0.0));
//! map.insert_node(Node::new(2, 10.0, 0.0, 0.0));
//! map.push_way(Way::building(100, vec![1, 2], 12.0));
//! publisher.publish(map);
//!
//! let map = handle.ready().await?;
//! for way in map.buildings() {
//!     println!("building #{} with {} nodes", way.id, way.node_ids.len());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the map model

pub mod bounds;
pub mod error;
pub mod footprint;
pub mod map;
pub mod ready;

pub use bounds::MapBounds;
pub use error::{Error, Result};
pub use footprint::Footprint;
pub use map::{FootprintSource, MapData, Node, Way};
pub use ready::{map_channel, MapHandle, MapPublisher};
